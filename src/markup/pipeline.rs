//! The ordered rule table that turns markup into an HTML fragment.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Captures;

use super::RenderOptions;
use super::link::{anchor, render_link};
use super::rule::{MarkupRule, Repeat, Rewrite, RuleSpec, Scope, Stage};
use crate::error::PipelineError;

static STANDARD: LazyLock<Pipeline> = LazyLock::new(|| {
    Pipeline::compile(STANDARD_RULES).expect("built-in markup rules must compile")
});

/// Built-in rules in application order.
pub const STANDARD_RULES: &[RuleSpec] = &[
    RuleSpec {
        name: "list",
        stage: Stage::List,
        pattern: r"\[list\](.*?)\[/list\]([ \t]*\r?\n)?",
        scope: Scope::MultiLine,
        repeat: Repeat::Once,
        rewrite: Rewrite::Custom(render_list),
    },
    RuleSpec {
        name: "header-1",
        stage: Stage::Header,
        pattern: r"\[h1\](.+?)\[/h1\]([ \t]*\r?\n)?",
        scope: Scope::MultiLine,
        repeat: Repeat::Fixpoint { open_token: "[h1]" },
        rewrite: Rewrite::Template(r#"<div class="steam__header-1">${1}</div>"#),
    },
    RuleSpec {
        name: "header-2",
        stage: Stage::Header,
        pattern: r"\[h2\](.+?)\[/h2\]([ \t]*\r?\n)?",
        scope: Scope::MultiLine,
        repeat: Repeat::Fixpoint { open_token: "[h2]" },
        rewrite: Rewrite::Template(r#"<div class="steam__header-2">${1}</div>"#),
    },
    RuleSpec {
        name: "header-3",
        stage: Stage::Header,
        pattern: r"\[h3\](.+?)\[/h3\]([ \t]*\r?\n)?",
        scope: Scope::MultiLine,
        repeat: Repeat::Fixpoint { open_token: "[h3]" },
        rewrite: Rewrite::Template(r#"<div class="steam__header-3">${1}</div>"#),
    },
    RuleSpec {
        name: "bold",
        stage: Stage::Inline,
        pattern: r"\[b\](.+?)\[/b\]",
        scope: Scope::MultiLine,
        repeat: Repeat::Fixpoint { open_token: "[b]" },
        rewrite: Rewrite::Template(r#" <b class="steam__bold">${1}</b> "#),
    },
    RuleSpec {
        name: "italic",
        stage: Stage::Inline,
        pattern: r"\[i\](.+?)\[/i\]",
        scope: Scope::MultiLine,
        repeat: Repeat::Fixpoint { open_token: "[i]" },
        rewrite: Rewrite::Template(" <i>${1}</i> "),
    },
    RuleSpec {
        name: "underline",
        stage: Stage::Inline,
        pattern: r"\[u\](.+?)\[/u\]",
        scope: Scope::MultiLine,
        repeat: Repeat::Fixpoint { open_token: "[u]" },
        rewrite: Rewrite::Template(" <u>${1}</u> "),
    },
    RuleSpec {
        name: "strike",
        stage: Stage::Inline,
        pattern: r"\[strike\](.+?)\[/strike\]",
        scope: Scope::MultiLine,
        repeat: Repeat::Fixpoint {
            open_token: "[strike]",
        },
        rewrite: Rewrite::Template(r#" <span class="steam__strike">${1}</span> "#),
    },
    RuleSpec {
        name: "spoiler",
        stage: Stage::Inline,
        pattern: r"\[spoiler\](.+?)\[/spoiler\]",
        scope: Scope::MultiLine,
        repeat: Repeat::Fixpoint {
            open_token: "[spoiler]",
        },
        rewrite: Rewrite::Template(r#"<span class="steam__spoiler"><span>${1}</span></span>"#),
    },
    RuleSpec {
        name: "separator-empty",
        stage: Stage::Separator,
        pattern: r"\[hr\]\s*\[/hr\]",
        scope: Scope::SingleLine,
        repeat: Repeat::Once,
        rewrite: Rewrite::Template(r#"<hr class="steam__separator"/>"#),
    },
    RuleSpec {
        name: "separator",
        stage: Stage::Separator,
        pattern: r"\[hr\](.+?)\[/hr\]",
        scope: Scope::MultiLine,
        repeat: Repeat::Once,
        rewrite: Rewrite::Template(r#"<hr class="steam__separator"/>${1}"#),
    },
    RuleSpec {
        name: "link",
        stage: Stage::Link,
        pattern: r"\[url=([\w:/?=.&%#~+\-]+)\](.+?)\[/url\]",
        scope: Scope::MultiLine,
        repeat: Repeat::Once,
        rewrite: Rewrite::Custom(render_link),
    },
    RuleSpec {
        name: "autolink",
        stage: Stage::Autolink,
        // Existing anchors are matched whole so their text is never wrapped twice.
        pattern: r"(<a\s[^>]*>.*?</a>)|(\w+://[^\s<]+)",
        scope: Scope::MultiLine,
        repeat: Repeat::Once,
        rewrite: Rewrite::Custom(render_autolink),
    },
    RuleSpec {
        name: "line-break",
        stage: Stage::LineBreak,
        pattern: r"\r?\n",
        scope: Scope::SingleLine,
        repeat: Repeat::Once,
        rewrite: Rewrite::Template("<br/>"),
    },
];

/// An ordered list of compiled rules evaluated by one driver.
#[derive(Debug)]
pub struct Pipeline {
    rules: Vec<MarkupRule>,
}

impl Pipeline {
    /// The built-in pipeline, compiled on first use.
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Compile a rule table.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern does not compile or if a rule belongs
    /// to an earlier stage than the rule before it.
    pub fn compile(specs: &[RuleSpec]) -> Result<Self, PipelineError> {
        let mut rules: Vec<MarkupRule> = Vec::with_capacity(specs.len());
        for spec in specs {
            if rules.last().is_some_and(|prev| prev.stage() > spec.stage) {
                return Err(PipelineError::OutOfOrder { name: spec.name });
            }
            rules.push(MarkupRule::compile(*spec)?);
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[MarkupRule] {
        &self.rules
    }

    /// Run every rule in order over `source`.
    pub fn run(&self, source: &str, options: &RenderOptions) -> String {
        let mut text = source.to_owned();
        for rule in &self.rules {
            let rewritten = match rule.apply(&text, options) {
                Cow::Owned(rewritten) => Some(rewritten),
                Cow::Borrowed(_) => None,
            };
            if let Some(rewritten) = rewritten {
                tracing::trace!(rule = rule.name(), len = rewritten.len(), "rule rewrote text");
                text = rewritten;
            }
        }
        text
    }
}

fn render_list(caps: &Captures<'_>, _options: &RenderOptions) -> String {
    let items: String = caps[1]
        .lines()
        .filter_map(|line| line.trim_start().strip_prefix("[*]"))
        .map(|item| format!("<li>{}</li>", item.trim_end()))
        .collect();
    format!("<ul>{items}</ul>")
}

fn render_autolink(caps: &Captures<'_>, _options: &RenderOptions) -> String {
    caps.get(2)
        .map_or_else(|| caps[0].to_owned(), |url| anchor(url.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_rules_compile_in_stage_order() {
        let pipeline = Pipeline::standard();
        assert_eq!(pipeline.rules().len(), STANDARD_RULES.len());
        assert!(pipeline.rules().is_sorted_by_key(MarkupRule::stage));
    }

    #[test]
    fn test_stage_order_is_list_header_inline_separator_link_autolink_break() {
        let mut stages: Vec<Stage> = Pipeline::standard()
            .rules()
            .iter()
            .map(MarkupRule::stage)
            .collect();
        stages.dedup();
        assert_eq!(
            stages,
            vec![
                Stage::List,
                Stage::Header,
                Stage::Inline,
                Stage::Separator,
                Stage::Link,
                Stage::Autolink,
                Stage::LineBreak,
            ]
        );
    }

    #[test]
    fn test_inline_rules_run_bold_italic_underline_strike_spoiler() {
        let names: Vec<&str> = Pipeline::standard()
            .rules()
            .iter()
            .filter(|rule| rule.stage() == Stage::Inline)
            .map(MarkupRule::name)
            .collect();
        assert_eq!(names, ["bold", "italic", "underline", "strike", "spoiler"]);
    }

    #[test]
    fn test_headers_and_inline_styles_run_to_fixpoint() {
        for rule in Pipeline::standard().rules() {
            let fixpoint = matches!(rule.repeat(), Repeat::Fixpoint { .. });
            let expected = matches!(rule.stage(), Stage::Header | Stage::Inline);
            assert_eq!(fixpoint, expected, "rule {}", rule.name());
        }
    }

    #[test]
    fn test_compile_rejects_out_of_order_table() {
        let specs = [STANDARD_RULES[4], STANDARD_RULES[0]];
        let err = Pipeline::compile(&specs).unwrap_err();
        assert!(matches!(err, PipelineError::OutOfOrder { name: "list" }));
    }

    #[test]
    fn test_render_list_drops_lines_without_item_marker() {
        let pipeline = Pipeline::compile(&STANDARD_RULES[..1]).unwrap();
        let out = pipeline.run(
            "[list]\nintro\n  [*]one  \n[*]two\n[/list]",
            &RenderOptions::default(),
        );
        assert_eq!(out, "<ul><li>one</li><li>two</li></ul>");
    }

    #[test]
    fn test_autolink_skips_existing_anchor() {
        let pipeline = Pipeline::compile(&STANDARD_RULES[STANDARD_RULES.len() - 2..]).unwrap();
        let existing = anchor("http://a.com");
        let out = pipeline.run(&existing, &RenderOptions::default());
        assert_eq!(out, existing);
    }
}
