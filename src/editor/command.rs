//! Editing commands, their names, and their keyboard shortcuts.

use std::fmt;
use std::str::FromStr;

/// An editing intent bound to a toolbar button or keyboard shortcut.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    #[value(name = "h1")]
    Header1,
    #[value(name = "h2")]
    Header2,
    #[value(name = "h3")]
    Header3,
    #[value(name = "b")]
    Bold,
    #[value(name = "i")]
    Italic,
    #[value(name = "u")]
    Underline,
    Strike,
    Spoiler,
    Link,
    Separator,
    List,
}

/// What a command does to the selected text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Wraps a non-empty selection in an open/close pair.
    Wrap { open: &'static str, close: &'static str },
    /// Wraps the trimmed selection in a header pair.
    Header { open: &'static str, close: &'static str },
    Link,
    Separator,
    List,
}

impl Command {
    pub const ALL: [Self; 11] = [
        Self::Header1,
        Self::Header2,
        Self::Header3,
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::Strike,
        Self::Spoiler,
        Self::Link,
        Self::Separator,
        Self::List,
    ];

    /// Short name used by toolbars and the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Header1 => "h1",
            Self::Header2 => "h2",
            Self::Header3 => "h3",
            Self::Bold => "b",
            Self::Italic => "i",
            Self::Underline => "u",
            Self::Strike => "strike",
            Self::Spoiler => "spoiler",
            Self::Link => "link",
            Self::Separator => "separator",
            Self::List => "list",
        }
    }

    pub const fn kind(self) -> CommandKind {
        match self {
            Self::Header1 => CommandKind::Header {
                open: "[h1]",
                close: "[/h1]",
            },
            Self::Header2 => CommandKind::Header {
                open: "[h2]",
                close: "[/h2]",
            },
            Self::Header3 => CommandKind::Header {
                open: "[h3]",
                close: "[/h3]",
            },
            Self::Bold => CommandKind::Wrap {
                open: "[b]",
                close: "[/b]",
            },
            Self::Italic => CommandKind::Wrap {
                open: "[i]",
                close: "[/i]",
            },
            Self::Underline => CommandKind::Wrap {
                open: "[u]",
                close: "[/u]",
            },
            Self::Strike => CommandKind::Wrap {
                open: "[strike]",
                close: "[/strike]",
            },
            Self::Spoiler => CommandKind::Wrap {
                open: "[spoiler]",
                close: "[/spoiler]",
            },
            Self::Link => CommandKind::Link,
            Self::Separator => CommandKind::Separator,
            Self::List => CommandKind::List,
        }
    }

    /// Command bound to Alt+`key`, if any.
    pub const fn from_shortcut(key: char) -> Option<Self> {
        match key {
            '1' => Some(Self::Header1),
            '2' => Some(Self::Header2),
            '3' => Some(Self::Header3),
            'b' => Some(Self::Bold),
            'i' => Some(Self::Italic),
            'u' => Some(Self::Underline),
            'l' => Some(Self::Link),
            'h' => Some(Self::Spoiler),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A command name that matches no [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown command `{0}`")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|command| command.name() == lower)
            .ok_or_else(|| UnknownCommand(s.to_owned()))
    }
}
