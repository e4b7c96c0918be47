//! Selections and the splice that applies a command to one.
//!
//! Offsets are bytes into the buffer and must fall on character boundaries.
//! Hosts that count characters convert with [`Selection::from_char_offsets`]
//! and [`Selection::to_char_offsets`].

use serde::{Deserialize, Serialize};

use super::command::{Command, CommandKind};
use crate::error::SelectionError;

const LINK_OPEN: &str = "[url=";
const LINK_REST: &str = "]";
const LINK_CLOSE: &str = "[/url]";
const RULE: &str = "[hr][/hr]";
const LIST_OPEN: &str = "[list]\n[*]";
const LIST_CLOSE: &str = "\n[/list]";

/// A selected byte range in a buffer. `start == end` is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A collapsed selection at `offset`.
    pub const fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub const fn is_collapsed(self) -> bool {
        self.start == self.end
    }

    /// Check that the selection is ordered, inside `text`, and on character
    /// boundaries.
    ///
    /// # Errors
    ///
    /// Returns the first violated condition.
    pub fn check(self, text: &str) -> Result<Self, SelectionError> {
        if self.start > self.end {
            return Err(SelectionError::Inverted {
                start: self.start,
                end: self.end,
            });
        }
        if self.end > text.len() {
            return Err(SelectionError::OutOfBounds {
                start: self.start,
                end: self.end,
                len: text.len(),
            });
        }
        for offset in [self.start, self.end] {
            if !text.is_char_boundary(offset) {
                return Err(SelectionError::NotCharBoundary(offset));
            }
        }
        Ok(self)
    }

    /// Build a selection from character offsets, as counted by text widgets.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is inverted or runs past the end of `text`.
    pub fn from_char_offsets(text: &str, start: usize, end: usize) -> Result<Self, SelectionError> {
        if start > end {
            return Err(SelectionError::Inverted { start, end });
        }
        let out_of_bounds = || SelectionError::OutOfBounds {
            start,
            end,
            len: text.chars().count(),
        };
        let start_byte = char_to_byte(text, start).ok_or_else(out_of_bounds)?;
        let end_byte = char_to_byte(text, end).ok_or_else(out_of_bounds)?;
        Ok(Self::new(start_byte, end_byte))
    }

    /// The selection as `(start, end)` character offsets.
    pub fn to_char_offsets(self, text: &str) -> (usize, usize) {
        (
            text[..self.start].chars().count(),
            text[..self.end].chars().count(),
        )
    }

    /// Pull both ends inside `text` and back onto character boundaries.
    pub fn clamp_to(self, text: &str) -> Self {
        let start = floor_char_boundary(text, self.start.min(self.end));
        let end = floor_char_boundary(text, self.end.max(self.start));
        Self::new(start, end)
    }
}

fn char_to_byte(text: &str, chars: usize) -> Option<usize> {
    text.char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(text.len()))
        .nth(chars)
}

fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// A new buffer and selection produced by a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edit {
    pub text: String,
    pub selection: Selection,
}

/// Outcome of applying a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum EditResult {
    /// The command had no effect; the host may let the key through.
    NoOp,
    Edited(Edit),
}

impl EditResult {
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }

    pub const fn edit(&self) -> Option<&Edit> {
        match self {
            Self::NoOp => None,
            Self::Edited(edit) => Some(edit),
        }
    }
}

/// Options for block commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditOptions {
    /// Surround separators and lists with line breaks when the buffer
    /// already has content.
    pub pad_blocks: bool,
}

/// Where the selection goes after the replacement is spliced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// Select the whole replacement.
    Span,
    /// Collapse to a caret at this offset within the replacement.
    Caret(usize),
}

struct Insertion {
    replacement: String,
    placement: Placement,
}

impl Insertion {
    const fn spanned(replacement: String) -> Self {
        Self {
            replacement,
            placement: Placement::Span,
        }
    }

    const fn caret(replacement: String, offset: usize) -> Self {
        Self {
            replacement,
            placement: Placement::Caret(offset),
        }
    }

    fn caret_at_end(replacement: String) -> Self {
        let offset = replacement.len();
        Self::caret(replacement, offset)
    }
}

/// Apply `command` to `buffer` with default options.
///
/// `selection` must satisfy [`Selection::check`] for `buffer`; use
/// [`try_apply_command`] when it comes from untrusted input.
///
/// # Example
///
/// ```
/// use steamtext::editor::{apply_command, Command, EditResult, Selection};
///
/// let EditResult::Edited(edit) = apply_command("hello world", Selection::new(0, 5), Command::Bold)
/// else {
///     panic!("bold on a selection always edits");
/// };
/// assert_eq!(edit.text, "[b]hello[/b] world");
/// assert_eq!(edit.selection, Selection::new(0, 12));
/// ```
pub fn apply_command(buffer: &str, selection: Selection, command: Command) -> EditResult {
    apply_command_with(buffer, selection, command, &EditOptions::default())
}

/// Apply `command` to `buffer`.
pub fn apply_command_with(
    buffer: &str,
    selection: Selection,
    command: Command,
    options: &EditOptions,
) -> EditResult {
    debug_assert!(
        selection.check(buffer).is_ok(),
        "selection {selection:?} is invalid for a buffer of {} bytes",
        buffer.len()
    );

    let selected = &buffer[selection.start..selection.end];
    let Some(insertion) = plan(buffer, selected, command, options) else {
        tracing::debug!(%command, "command had no effect");
        return EditResult::NoOp;
    };

    let mut text = String::with_capacity(buffer.len() + insertion.replacement.len());
    text.push_str(&buffer[..selection.start]);
    text.push_str(&insertion.replacement);
    text.push_str(&buffer[selection.end..]);

    let selection = match insertion.placement {
        Placement::Span => Selection::new(
            selection.start,
            selection.start + insertion.replacement.len(),
        ),
        Placement::Caret(offset) => Selection::caret(selection.start + offset),
    };
    EditResult::Edited(Edit { text, selection })
}

/// Apply `command` after checking the selection against `buffer`.
///
/// # Errors
///
/// Returns an error if `selection` is not valid for `buffer`.
pub fn try_apply_command(
    buffer: &str,
    selection: Selection,
    command: Command,
    options: &EditOptions,
) -> Result<EditResult, SelectionError> {
    let selection = selection.check(buffer)?;
    Ok(apply_command_with(buffer, selection, command, options))
}

/// Apply a command given by name. Unknown names are a no-op.
pub fn apply_named_command(
    buffer: &str,
    selection: Selection,
    name: &str,
    options: &EditOptions,
) -> EditResult {
    match name.parse::<Command>() {
        Ok(command) => apply_command_with(buffer, selection, command, options),
        Err(err) => {
            tracing::debug!(%err, "ignoring command");
            EditResult::NoOp
        }
    }
}

fn plan(buffer: &str, selected: &str, command: Command, options: &EditOptions) -> Option<Insertion> {
    let pad = options.pad_blocks && !buffer.is_empty();
    let insertion = match command.kind() {
        CommandKind::Wrap { open, close } => {
            if selected.is_empty() {
                return None;
            }
            Insertion::spanned(format!("{open}{selected}{close}"))
        }
        CommandKind::Header { open, close } => {
            let title = selected.trim();
            let replacement = format!("{open}{title}{close}");
            if title.is_empty() {
                Insertion::caret(replacement, open.len())
            } else {
                Insertion::spanned(replacement)
            }
        }
        CommandKind::Link => Insertion::caret(
            format!("{LINK_OPEN}{LINK_REST}{selected}{LINK_CLOSE}"),
            LINK_OPEN.len(),
        ),
        CommandKind::Separator => {
            let replacement = if pad {
                format!("{selected}\n{RULE}\n")
            } else if options.pad_blocks {
                format!("{RULE}\n")
            } else {
                format!("{selected}{RULE}")
            };
            Insertion::caret_at_end(replacement)
        }
        CommandKind::List => {
            let lead = if pad { "\n" } else { "" };
            let head = format!("{lead}{LIST_OPEN}{selected}");
            let caret = head.len();
            Insertion::caret(format!("{head}{LIST_CLOSE}"), caret)
        }
    };
    Some(insertion)
}
