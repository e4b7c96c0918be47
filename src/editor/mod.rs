//! Selection-aware markup insertion.
//!
//! Given a buffer, a selection, and a [`Command`], computes the new buffer
//! and where the selection should land. Wrap commands select what they
//! inserted; link, separator, list, and empty header commands leave a caret
//! where the next keystroke is expected.

mod command;
mod selection;

pub use command::{Command, CommandKind, UnknownCommand};
pub use selection::{
    Edit, EditOptions, EditResult, Selection, apply_command, apply_command_with,
    apply_named_command, try_apply_command,
};
