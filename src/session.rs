//! An editing session: buffer, selection, persistence, and preview.
//!
//! This is the glue a host page or CLI needs around the pure editor and
//! renderer. Every buffer change is written to the store under
//! [`LAST_TEXT_KEY`] so the next session starts where this one stopped.

use crate::editor::{self, Command, EditOptions, EditResult, Selection};
use crate::markup::{self, RenderOptions};
use crate::store::{KeyValueStore, LAST_TEXT_KEY};

/// Shown in place of the preview while the buffer renders to nothing.
pub const PREVIEW_PLACEHOLDER: &str = "Preview of formatted Steam text will appear here...";

/// Options for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub render: RenderOptions,
    pub edit: EditOptions,
}

pub struct Session<S: KeyValueStore> {
    text: String,
    selection: Selection,
    store: S,
    options: SessionOptions,
}

impl<S: KeyValueStore> Session<S> {
    /// Open a session, restoring the last saved text with the caret at its end.
    pub fn open(store: S, options: SessionOptions) -> Self {
        let text = store.get(LAST_TEXT_KEY).unwrap_or_default();
        tracing::debug!(len = text.len(), "restored session text");
        Self {
            selection: Selection::caret(text.len()),
            text,
            store,
            options,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn selection(&self) -> Selection {
        self.selection
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Replace the buffer, as after a keystroke in the text input.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.selection = self.selection.clamp_to(&self.text);
        self.persist();
    }

    /// Move the selection. Out-of-range offsets are clamped.
    pub fn select(&mut self, selection: Selection) {
        self.selection = selection.clamp_to(&self.text);
    }

    /// Apply a command to the current selection.
    pub fn apply(&mut self, command: Command) -> EditResult {
        let result =
            editor::apply_command_with(&self.text, self.selection, command, &self.options.edit);
        self.accept(&result);
        result
    }

    /// Apply a command by name. Unknown names are a no-op.
    pub fn apply_named(&mut self, name: &str) -> EditResult {
        let result =
            editor::apply_named_command(&self.text, self.selection, name, &self.options.edit);
        self.accept(&result);
        result
    }

    /// Handle Alt+`key`. Returns `true` when the buffer changed and the host
    /// should suppress the key's default action.
    pub fn handle_shortcut(&mut self, key: char) -> bool {
        Command::from_shortcut(key).is_some_and(|command| !self.apply(command).is_noop())
    }

    /// Rendered buffer, or [`PREVIEW_PLACEHOLDER`] when there is nothing to show.
    pub fn preview(&self) -> String {
        let html = markup::render_with(&self.text, &self.options.render);
        if html.is_empty() {
            PREVIEW_PLACEHOLDER.to_owned()
        } else {
            html
        }
    }

    fn accept(&mut self, result: &EditResult) {
        if let EditResult::Edited(edit) = result {
            self.text.clone_from(&edit.text);
            self.selection = edit.selection;
            self.persist();
        }
    }

    fn persist(&mut self) {
        if let Err(err) = self.store.set(LAST_TEXT_KEY, &self.text) {
            tracing::warn!(%err, "failed to persist session text");
        }
    }
}
