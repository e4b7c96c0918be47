//! steamtext - render Steam-style markup and apply formatting commands.
//!
//! # Usage
//!
//! ```bash
//! steamtext render post.txt
//! steamtext render --watch post.txt --output preview.html
//! steamtext apply b --start 0 --end 5 post.txt --write
//! steamtext restore
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use steamtext::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use steamtext::editor::{Command, EditResult, Selection};
use steamtext::session::Session;
use steamtext::store::{FileStore, KeyValueStore, MemoryStore};
use steamtext::watcher::{DEFAULT_DEBOUNCE, SourceWatcher};

/// Render Steam-style markup and apply formatting commands
#[derive(Parser, Debug)]
#[command(name = "steamtext", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    action: Action,

    /// Links whose host contains this text get no external-host note
    #[arg(long, global = true, value_name = "NAME")]
    domain: Option<String>,

    /// Put separators and lists on their own lines when inserting
    #[arg(long, global = true)]
    pad_blocks: bool,

    /// File used to remember the last text
    #[arg(long, global = true, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Do not read or write the store
    #[arg(long, global = true)]
    no_store: bool,

    /// Save current command-line flags as defaults
    #[arg(long, global = true)]
    save: bool,

    /// Clear saved defaults
    #[arg(long, global = true)]
    clear: bool,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Render markup to an HTML fragment
    Render {
        /// Markup file (stdin when omitted)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Write the fragment here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Re-render whenever FILE changes
        #[arg(short, long)]
        watch: bool,
    },
    /// Apply a formatting command to a selection
    Apply {
        #[arg(value_enum)]
        command: Command,

        /// Selection start, in characters
        #[arg(long)]
        start: usize,

        /// Selection end, in characters (defaults to start)
        #[arg(long)]
        end: Option<usize>,

        /// Buffer file (stdin when omitted)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Write the new buffer back to FILE
        #[arg(long)]
        write: bool,

        /// Print the result and new selection as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the last saved text
    Restore,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);
    tracing::debug!(?effective, "effective flags");

    let store = open_store(&effective)?;
    let mut session = Session::open(store, effective.session_options());

    match cli.action {
        Action::Render {
            file,
            output,
            watch,
        } => run_render(
            &mut session,
            file.as_deref(),
            output.as_deref(),
            should_watch(watch, effective.watch, file.as_deref()),
        ),
        Action::Apply {
            command,
            start,
            end,
            file,
            write,
            json,
        } => run_apply(
            &mut session,
            command,
            (start, end.unwrap_or(start)),
            file.as_deref(),
            write,
            json,
        ),
        Action::Restore => {
            print!("{}", session.text());
            io::stdout().flush()?;
            Ok(())
        }
    }
}

fn open_store(flags: &ConfigFlags) -> Result<Box<dyn KeyValueStore>> {
    let Some(path) = flags.store_path() else {
        return Ok(Box::new(MemoryStore::new()));
    };
    let store = FileStore::open(&path)
        .with_context(|| format!("Failed to open store {}", path.display()))?;
    Ok(Box::new(store))
}

fn read_source(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => io::read_to_string(io::stdin()).context("Failed to read stdin"),
    }
}

fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{content}")?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// A saved `--watch` default only applies when there is a file to watch;
/// `--watch` on the command line without one is still an error.
const fn should_watch(cli_watch: bool, saved_watch: bool, file: Option<&Path>) -> bool {
    cli_watch || (saved_watch && file.is_some())
}

fn run_render<S: KeyValueStore>(
    session: &mut Session<S>,
    file: Option<&Path>,
    output: Option<&Path>,
    watch: bool,
) -> Result<()> {
    session.set_text(read_source(file)?);
    emit(&session.preview(), output)?;

    if !watch {
        return Ok(());
    }
    let Some(path) = file else {
        anyhow::bail!("--watch needs a FILE to watch");
    };
    let mut watcher = SourceWatcher::new(path, DEFAULT_DEBOUNCE)
        .with_context(|| format!("Failed to watch {}", path.display()))?;
    loop {
        if !watcher.wait_for_change(None) {
            continue;
        }
        match read_source(Some(watcher.source())) {
            Ok(source) => {
                session.set_text(source);
                emit(&session.preview(), output)?;
            }
            Err(err) => tracing::warn!("{err:#}"),
        }
    }
}

fn run_apply<S: KeyValueStore>(
    session: &mut Session<S>,
    command: Command,
    (start, end): (usize, usize),
    file: Option<&Path>,
    write: bool,
    json: bool,
) -> Result<()> {
    if write && file.is_none() {
        anyhow::bail!("--write needs a FILE");
    }
    let buffer = read_source(file)?;
    let selection = Selection::from_char_offsets(&buffer, start, end)
        .with_context(|| format!("Invalid selection for `{command}`"))?;
    session.set_text(buffer);
    session.select(selection);

    let result = session.apply(command);
    if result.is_noop() {
        eprintln!("{command}: no effect on this selection");
    }

    if json {
        let (start, end) = session.selection().to_char_offsets(session.text());
        let report = serde_json::json!({
            "result": if matches!(result, EditResult::NoOp) { "no_op" } else { "edited" },
            "text": session.text(),
            "start": start,
            "end": end,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    match file {
        Some(path) if write => {
            if !result.is_noop() {
                fs::write(path, session.text())
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            Ok(())
        }
        _ if json => Ok(()),
        _ => {
            print!("{}", session.text());
            io::stdout().flush()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_watch_is_ignored_without_file() {
        assert!(!should_watch(false, true, None));
        assert!(should_watch(false, true, Some(Path::new("post.txt"))));
    }

    #[test]
    fn test_cli_watch_is_kept_without_file() {
        assert!(should_watch(true, false, None));
        assert!(!should_watch(false, false, Some(Path::new("post.txt"))));
    }
}
