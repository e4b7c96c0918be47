//! Markup rendering.
//!
//! Source text is rewritten by an ordered pipeline of rules:
//! - Lists and headers
//! - Inline styles (bold, italic, underline, strike, spoiler)
//! - Separators, explicit links, then bare URLs
//! - Line breaks
//!
//! Unmatched tags are left in the output as literal text.

mod link;
mod pipeline;
mod rule;

pub use link::{anchor, is_external, resolve_host};
pub use pipeline::{Pipeline, STANDARD_RULES};
pub use rule::{MarkupRule, Repeat, Rewrite, RewriteFn, RuleSpec, Scope, Stage};

/// Host substring that marks a link as pointing at the platform itself.
pub const DEFAULT_PLATFORM_DOMAIN: &str = "steam";

/// Options that affect rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Links whose host contains this substring get no host annotation.
    pub platform_domain: String,
}

impl RenderOptions {
    pub fn with_platform_domain(domain: impl Into<String>) -> Self {
        Self {
            platform_domain: domain.into(),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::with_platform_domain(DEFAULT_PLATFORM_DOMAIN)
    }
}

/// Render markup with default options.
///
/// # Example
///
/// ```
/// let html = steamtext::markup::render("[b]hi[/b]");
/// assert_eq!(html, r#" <b class="steam__bold">hi</b> "#);
/// ```
pub fn render(source: &str) -> String {
    render_with(source, &RenderOptions::default())
}

/// Render markup with explicit options. Empty input renders to an empty string.
pub fn render_with(source: &str, options: &RenderOptions) -> String {
    if source.is_empty() {
        return String::new();
    }
    Pipeline::standard().run(source, options)
}
