// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditOptions)
    clippy::module_name_repetitions
)]

//! # steamtext
//!
//! Renders Steam-style bracket markup (`[b]`, `[h1]`, `[list]`, `[url=...]`,
//! ...) to an HTML fragment, and inserts that markup around a text selection.
//!
//! ## Architecture
//!
//! Two pure components, composed by the host:
//! - **Renderer**: an ordered pipeline of rewrite rules
//! - **Editor**: buffer + selection + command in, buffer + selection out
//!
//! ## Modules
//!
//! - [`markup`]: Rule pipeline and rendering
//! - [`editor`]: Selection-aware tag insertion
//! - [`session`]: Buffer, selection, persistence, and preview together
//! - [`store`]: Key/value persistence of the last text
//! - [`config`]: Saved command-line defaults
//! - [`watcher`]: File watching for live preview

pub mod config;
pub mod editor;
pub mod error;
pub mod markup;
pub mod session;
pub mod store;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::editor::{Command, EditResult, Selection, apply_command};
    pub use crate::markup::{RenderOptions, render};
    pub use crate::session::Session;
    pub use crate::store::{KeyValueStore, MemoryStore};
}
