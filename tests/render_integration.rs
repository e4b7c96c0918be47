//! End-to-end rendering of whole posts.

use std::time::{Duration, Instant};

use steamtext::markup::{RenderOptions, render, render_with};

const LINK_OPEN: &str = r#"<a class="steam__link" href="" target="_blank" rel="noopener">"#;

#[test]
fn test_render_review_post() {
    let source = "\
[h1]Verdict[/h1]
[b]Great[/b] game, [spoiler]the ending[/spoiler] is wild.
[list]
[*]Story
[*]Music
[/list]
More at [url=https://example.com/review]my blog[/url] or https://store.steampowered.com/app/1";

    let expected = [
        r#"<div class="steam__header-1">Verdict</div>"#,
        r#" <b class="steam__bold">Great</b>  game, "#,
        r#"<span class="steam__spoiler"><span>the ending</span></span> is wild.<br/>"#,
        "<ul><li>Story</li><li>Music</li></ul>",
        "More at ",
        LINK_OPEN,
        r#"my blog</a> <span class="steam__link-host">[example.com]</span> or "#,
        LINK_OPEN,
        "https://store.steampowered.com/app/1</a>",
    ]
    .concat();

    assert_eq!(render(source), expected);
}

#[test]
fn test_render_separator_between_paragraphs() {
    assert_eq!(
        render("above\n[hr][/hr]\nbelow"),
        r#"above<br/><hr class="steam__separator"/><br/>below"#
    );
}

#[test]
fn test_render_custom_platform_domain() {
    let options = RenderOptions::with_platform_domain("example.com");
    assert_eq!(
        render_with("[url=example.com/a]a[/url] [url=other.net]b[/url]", &options),
        format!(
            r#"{LINK_OPEN}a</a> {LINK_OPEN}b</a> <span class="steam__link-host">[other.net]</span>"#
        )
    );
}

#[test]
fn test_render_is_stable_on_its_own_output() {
    let first = render("[url=http://a.io]x[/url] http://b.io [b]y[/b]");
    assert_eq!(render(&first), first);
}

#[test]
fn test_render_adversarial_input_completes_quickly() {
    let mut source = String::new();
    for _ in 0..5_000 {
        source.push_str("[b][i][u][strike][spoiler][h1][h2][h3][list][hr][url=x.io]");
    }
    let started = Instant::now();
    let out = render(&source);
    assert_eq!(out, source);
    assert!(
        started.elapsed() < Duration::from_secs(10),
        "render took {:?}",
        started.elapsed()
    );
}

#[test]
fn test_render_many_balanced_spans() {
    let source = "[b]x[/b]".repeat(1_000);
    let out = render(&source);
    assert_eq!(out.matches("<b class=\"steam__bold\">").count(), 1_000);
    assert!(!out.contains("[b]"));
}
