//! Rewrite rules and the driver that applies them.

use std::borrow::Cow;

use regex::{Captures, Regex, RegexBuilder};

use super::RenderOptions;
use crate::error::PipelineError;

/// Pipeline stage a rule belongs to. Stages run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    List,
    Header,
    Inline,
    Separator,
    Link,
    Autolink,
    LineBreak,
}

/// Whether `.` in the pattern may cross line breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    SingleLine,
    MultiLine,
}

/// How often a rule is applied to its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// One non-overlapping pass over the text.
    Once,
    /// Passes until nothing matches. Every productive pass must consume at
    /// least one `open_token`, which bounds the number of passes.
    Fixpoint { open_token: &'static str },
}

/// Custom rewrite from captures to output text.
pub type RewriteFn = fn(&Captures<'_>, &RenderOptions) -> String;

/// Output produced for each match.
#[derive(Debug, Clone, Copy)]
pub enum Rewrite {
    /// Replacement template using `${n}` capture references.
    Template(&'static str),
    Custom(RewriteFn),
}

/// Declarative description of a rule, compiled into a [`MarkupRule`].
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub name: &'static str,
    pub stage: Stage,
    pub pattern: &'static str,
    pub scope: Scope,
    pub repeat: Repeat,
    pub rewrite: Rewrite,
}

/// A compiled rewrite rule.
#[derive(Debug)]
pub struct MarkupRule {
    spec: RuleSpec,
    pattern: Regex,
}

impl MarkupRule {
    /// Compile a rule description.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid regex.
    pub fn compile(spec: RuleSpec) -> Result<Self, PipelineError> {
        let pattern = RegexBuilder::new(spec.pattern)
            .dot_matches_new_line(spec.scope == Scope::MultiLine)
            .build()
            .map_err(|source| PipelineError::Pattern {
                name: spec.name,
                source,
            })?;
        Ok(Self { spec, pattern })
    }

    pub const fn name(&self) -> &'static str {
        self.spec.name
    }

    pub const fn stage(&self) -> Stage {
        self.spec.stage
    }

    pub const fn repeat(&self) -> Repeat {
        self.spec.repeat
    }

    /// Apply the rule. Returns `Cow::Borrowed` when nothing matched.
    pub fn apply<'t>(&self, text: &'t str, options: &RenderOptions) -> Cow<'t, str> {
        match self.spec.repeat {
            Repeat::Once => self.rewrite_pass(text, options),
            Repeat::Fixpoint { open_token } => self.apply_to_fixpoint(text, open_token, options),
        }
    }

    fn rewrite_pass<'t>(&self, text: &'t str, options: &RenderOptions) -> Cow<'t, str> {
        match self.spec.rewrite {
            Rewrite::Template(template) => self.pattern.replace_all(text, template),
            Rewrite::Custom(rewrite) => self
                .pattern
                .replace_all(text, |caps: &Captures<'_>| rewrite(caps, options)),
        }
    }

    fn apply_to_fixpoint<'t>(
        &self,
        text: &'t str,
        open_token: &str,
        options: &RenderOptions,
    ) -> Cow<'t, str> {
        // A pass that matches removes at least one open token and the rewrite
        // never adds one, so the text has at most `budget` productive passes.
        let budget = text.matches(open_token).count();
        let mut current = Cow::Borrowed(text);

        for pass in 0..=budget {
            let rewritten = match self.rewrite_pass(&current, options) {
                Cow::Owned(next) => Some(next),
                Cow::Borrowed(_) => None,
            };
            let Some(next) = rewritten else {
                tracing::trace!(rule = self.spec.name, passes = pass, "fixpoint reached");
                return current;
            };
            if next == current.as_ref() {
                tracing::trace!(rule = self.spec.name, passes = pass, "rewrite made no progress");
                return current;
            }
            current = Cow::Owned(next);
        }

        tracing::warn!(
            rule = self.spec.name,
            budget,
            "fixpoint guard stopped rewriting; remainder left literal"
        );
        current
    }
}
