//! File watching for live reload.
//!
//! A watcher only delivers the new text. Reparsing and change detection stay
//! with [`crate::MapSession`], so revision ordering lives in one place.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::WardleyError;

/// Callback receiving the full text of the watched file after a change.
pub type ChangeCallback = Box<dyn FnMut(String) + Send>;

/// Source of "the map file changed" notifications.
pub trait FileWatcher {
    /// Starts watching `path`, replacing any previous watch.
    ///
    /// # Errors
    ///
    /// Returns [`WardleyError::Watch`] if the platform watcher cannot be
    /// created or registered.
    fn watch(&mut self, path: &Path, on_change: ChangeCallback) -> Result<(), WardleyError>;

    /// Stops delivering notifications.
    fn stop(&mut self);
}

/// [`FileWatcher`] backed by the platform's native notification API.
#[derive(Default)]
pub struct NotifyWatcher {
    inner: Option<RecommendedWatcher>,
}

impl NotifyWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_watching(&self) -> bool {
        self.inner.is_some()
    }
}

impl FileWatcher for NotifyWatcher {
    fn watch(&mut self, path: &Path, mut on_change: ChangeCallback) -> Result<(), WardleyError> {
        self.stop();

        let target = fs::canonicalize(path)?;
        // Watch the directory so editors that save by rename are still seen.
        let directory = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let file = target.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(err) => {
                        warn!(err:err; "File watch error");
                        return;
                    }
                };
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    return;
                }
                if !event.paths.iter().any(|p| p == &file) {
                    return;
                }
                match fs::read_to_string(&file) {
                    Ok(text) => {
                        debug!(path = file.display().to_string(); "Watched file changed");
                        on_change(text);
                    }
                    Err(err) => warn!(err:err; "Failed to read watched file"),
                }
            },
            Config::default(),
        )?;
        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        debug!(path = target.display().to_string(); "Watching map file");
        self.inner = Some(watcher);
        Ok(())
    }

    fn stop(&mut self) {
        if self.inner.take().is_some() {
            debug!("Stopped watching map file");
        }
    }
}
