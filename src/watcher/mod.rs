//! Live preview: watch a markup source file and report debounced edits.
//!
//! Uses notify for cross-platform file system events.
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

/// Debounce applied by the CLI before re-rendering.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// How often [`SourceWatcher::wait_for_change`] polls for events.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Watches one source file and emits debounced change notifications.
pub struct SourceWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    watch_dir: PathBuf,
    source: PathBuf,
    source_name: Option<OsString>,
    debounce: Duration,
    pending_since: Option<Instant>,
}

impl SourceWatcher {
    /// Start watching `path`.
    ///
    /// # Errors
    /// Returns an error if the watcher cannot be created or the file's
    /// directory cannot be watched.
    pub fn new(path: impl AsRef<Path>, debounce: Duration) -> notify::Result<Self> {
        // Event paths arrive canonical; compare against the canonical form.
        let source = path
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| path.as_ref().to_path_buf());
        let source_name = source.file_name().map(std::ffi::OsStr::to_os_string);
        let watch_dir = parent_dir(&source);

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        // Editors often save by rename, so watch the directory, not the file.
        watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;
        tracing::debug!(source = %source.display(), dir = %watch_dir.display(), "watching source");

        Ok(Self {
            _watcher: watcher,
            rx,
            watch_dir,
            source,
            source_name,
            debounce,
            pending_since: None,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Drain pending events. Returns true once a change has settled for the
    /// debounce period.
    pub fn take_change_ready(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.rx.try_recv() {
            match event {
                Ok(ev) if self.touches_source(&ev) => changed = true,
                Ok(ev) => {
                    tracing::trace!(kind = ?ev.kind, paths = ?ev.paths, "ignoring unrelated event");
                }
                Err(err) => tracing::warn!(%err, "watch error"),
            }
        }

        if changed {
            self.pending_since = Some(Instant::now());
        }
        match self.pending_since {
            Some(since) if since.elapsed() >= self.debounce => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }

    /// Block until a debounced change is ready or `timeout` elapses.
    /// Returns whether a change was seen.
    pub fn wait_for_change(&mut self, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|t| Instant::now() + t);
        loop {
            if self.take_change_ready() {
                return true;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return false;
            }
            std::thread::sleep(POLL_INTERVAL.min(self.debounce.max(Duration::from_millis(10))));
        }
    }

    fn touches_source(&self, event: &Event) -> bool {
        event.paths.iter().any(|path| {
            path == &self.watch_dir
                || path == &self.source
                || self
                    .source_name
                    .as_ref()
                    .is_some_and(|name| path.file_name().is_some_and(|f| f == name))
        })
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::EventKind;
    use tempfile::tempdir;

    fn event_for(path: PathBuf) -> Event {
        Event {
            kind: EventKind::Any,
            paths: vec![path],
            attrs: notify::event::EventAttributes::new(),
        }
    }

    #[test]
    fn test_directory_event_counts_as_source_change() {
        let dir = tempdir().expect("tempdir");
        let canonical_dir = dir.path().canonicalize().expect("canonicalize");
        let path = canonical_dir.join("post.txt");
        std::fs::write(&path, "[b]hi[/b]").expect("write");
        let watcher = SourceWatcher::new(&path, Duration::from_millis(10)).expect("watcher");

        assert!(watcher.touches_source(&event_for(canonical_dir)));
    }

    #[test]
    fn test_sibling_file_event_is_ignored() {
        let dir = tempdir().expect("tempdir");
        let canonical_dir = dir.path().canonicalize().expect("canonicalize");
        let path = canonical_dir.join("post.txt");
        std::fs::write(&path, "x").expect("write");
        let watcher = SourceWatcher::new(&path, Duration::from_millis(10)).expect("watcher");

        assert!(!watcher.touches_source(&event_for(canonical_dir.join("other.txt"))));
    }

    #[test]
    fn test_parent_dir_of_bare_file_name_is_dot() {
        assert_eq!(parent_dir(Path::new("post.txt")), PathBuf::from("."));
    }

    #[test]
    fn test_real_edit_is_detected() {
        let dir = tempdir().expect("tempdir");
        let canonical_dir = dir.path().canonicalize().expect("canonicalize");
        let path = canonical_dir.join("post.txt");
        std::fs::write(&path, "[h1]draft[/h1]").expect("write");

        let mut watcher = SourceWatcher::new(&path, DEFAULT_DEBOUNCE).expect("watcher");

        // Give the backend time to register the watch.
        std::thread::sleep(Duration::from_millis(500));
        std::fs::write(&path, "[h1]final[/h1]").expect("write");

        assert!(
            watcher.wait_for_change(Some(Duration::from_secs(5))),
            "watcher should report the edit within 5 seconds"
        );
    }
}
