//! Interactive editing session over one map.
//!
//! A [`MapSession`] is the single owner of the source text, the current
//! document, the previous document and the glitch tracker. Every change,
//! whether an external reload or a drag edit, is one transaction: replace
//! the text, bump the revision, reparse, diff.
//!
//! Reparsing may also happen elsewhere. [`MapSession::begin_reparse`] hands
//! out a [`PendingParse`] that can run on any thread, and
//! [`MapSession::commit`] drops its result if the text changed meanwhile.

use std::{fs, path::Path};

use log::{debug, info};

use wardley_core::{
    document::Document,
    geometry::{CoordinateMapper, Point},
    glitch::{GlitchEntry, GlitchTracker},
};
use wardley_parser::patch;

use crate::{WardleyError, config::AppConfig};

/// A snapshot of the source waiting to be parsed.
#[derive(Debug, Clone)]
pub struct PendingParse {
    revision: u64,
    text: String,
}

impl PendingParse {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Parses the snapshot.
    pub fn run(self) -> ParsedRevision {
        ParsedRevision {
            revision: self.revision,
            document: wardley_parser::parse(&self.text),
        }
    }
}

/// A document parsed from a known revision of the source.
#[derive(Debug, Clone)]
pub struct ParsedRevision {
    revision: u64,
    document: Document,
}

impl ParsedRevision {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

/// Owner of one map's text, parsed model and change cues.
///
/// # Examples
///
/// ```
/// # use wardley::{MapSession, config::AppConfig};
/// let mut session = MapSession::new(AppConfig::default(), "component Cup [0.73, 0.78]");
/// assert!(session.last_cues().is_empty());
///
/// session.apply_position_edit("Cup", 0.5, 0.5, 1.0).unwrap();
/// assert_eq!(session.text(), "component Cup [0.50, 0.50]");
/// assert_eq!(session.last_cues().len(), 1);
/// assert!(!session.last_cues()[0].is_new());
/// ```
#[derive(Debug)]
pub struct MapSession {
    config: AppConfig,
    text: String,
    revision: u64,
    document: Document,
    document_revision: u64,
    previous: Option<Document>,
    tracker: GlitchTracker,
    last_cues: Vec<GlitchEntry>,
}

impl MapSession {
    /// Starts a session and parses `source`.
    ///
    /// The initial parse never emits cues.
    pub fn new(config: AppConfig, source: impl Into<String>) -> Self {
        let text = source.into();
        let document = wardley_parser::parse(&text);
        let tracker = GlitchTracker::new(config.animation().glitch_duration());
        info!(elements = document.elements().len(); "Map session started");
        Self {
            config,
            text,
            revision: 0,
            document,
            document_revision: 0,
            previous: None,
            tracker,
            last_cues: Vec::new(),
        }
    }

    /// Starts a session from a file.
    ///
    /// # Errors
    ///
    /// Returns [`WardleyError::Io`] if the file cannot be read.
    pub fn open(config: AppConfig, path: impl AsRef<Path>) -> Result<Self, WardleyError> {
        let text = fs::read_to_string(path)?;
        Ok(Self::new(config, text))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Counter bumped on every text replacement.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The document parsed from the latest committed revision.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The document the current one was diffed against.
    pub fn previous(&self) -> Option<&Document> {
        self.previous.as_ref()
    }

    /// Cues emitted by the latest committed parse.
    pub fn last_cues(&self) -> &[GlitchEntry] {
        &self.last_cues
    }

    /// Cues still running at `now`.
    pub fn glitches(&mut self, now: f64) -> impl Iterator<Item = &GlitchEntry> {
        self.tracker.active(now)
    }

    /// Animation progress of the cue for `name` at `now`, if one is running.
    pub fn glitch_progress(&mut self, name: &str, now: f64) -> Option<f64> {
        self.tracker.progress(name, now)
    }

    /// Coordinate mapper for the current document.
    ///
    /// # Errors
    ///
    /// Returns [`WardleyError::Surface`] when the padding leaves no drawable
    /// area.
    pub fn mapper(&self) -> Result<CoordinateMapper, WardleyError> {
        Ok(self
            .config
            .canvas()
            .mapper(self.document.presentation().size())?)
    }

    /// Replaces the text and reparses it immediately.
    pub fn on_text_changed(&mut self, new_text: impl Into<String>, now: f64) -> &Document {
        self.replace_text(new_text);
        let parsed = self.begin_reparse().run();
        self.install(parsed, now);
        &self.document
    }

    /// Replaces the text without reparsing and returns the new revision.
    pub fn replace_text(&mut self, new_text: impl Into<String>) -> u64 {
        self.text = new_text.into();
        self.revision += 1;
        self.revision
    }

    /// Snapshots the current text for parsing.
    pub fn begin_reparse(&self) -> PendingParse {
        PendingParse {
            revision: self.revision,
            text: self.text.clone(),
        }
    }

    /// Installs a parse result if it belongs to the latest revision.
    ///
    /// Returns `None` and leaves the session untouched for a stale or
    /// already committed result.
    pub fn commit(&mut self, parsed: ParsedRevision, now: f64) -> Option<&Document> {
        if parsed.revision != self.revision || parsed.revision == self.document_revision {
            debug!(parsed = parsed.revision, latest = self.revision; "Discarding stale parse");
            return None;
        }
        self.install(parsed, now);
        Some(&self.document)
    }

    /// Moves `name` to `(visibility, maturity)` by patching its declaration.
    ///
    /// Returns `None` without touching the text when nothing declares
    /// `name`.
    pub fn apply_position_edit(
        &mut self,
        name: &str,
        visibility: f64,
        maturity: f64,
        now: f64,
    ) -> Option<&Document> {
        let patched = patch::update_position(&self.text, name, visibility, maturity)?;
        info!(name, visibility, maturity; "Applying position edit");
        Some(self.on_text_changed(patched, now))
    }

    /// Moves the evolved position of `name` to `maturity`.
    pub fn apply_evolve_edit(&mut self, name: &str, maturity: f64, now: f64) -> Option<&Document> {
        let patched = patch::update_evolve_maturity(&self.text, name, maturity)?;
        info!(name, maturity; "Applying evolve edit");
        Some(self.on_text_changed(patched, now))
    }

    /// Moves `name` to where it was dropped on the drawing surface.
    ///
    /// # Errors
    ///
    /// Returns [`WardleyError::Surface`] when the surface is unusable.
    pub fn drag_to(&mut self, name: &str, point: Point, now: f64) -> Result<Option<&Document>, WardleyError> {
        let (visibility, maturity) = self.mapper()?.to_normalized(point);
        Ok(self.apply_position_edit(name, visibility, maturity, now))
    }

    /// Reloads the text from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`WardleyError::Io`] if the file cannot be read; the session
    /// is left unchanged.
    pub fn reload(&mut self, path: impl AsRef<Path>, now: f64) -> Result<&Document, WardleyError> {
        let text = fs::read_to_string(path)?;
        Ok(self.on_text_changed(text, now))
    }

    /// Writes the current text to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`WardleyError::Io`] if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), WardleyError> {
        fs::write(path, &self.text)?;
        Ok(())
    }

    fn install(&mut self, parsed: ParsedRevision, now: f64) {
        let previous = std::mem::replace(&mut self.document, parsed.document);
        self.document_revision = parsed.revision;
        self.last_cues = self.tracker.observe(Some(&previous), &self.document, now);
        self.previous = Some(previous);
        debug!(revision = self.revision, cues = self.last_cues.len(); "Committed parse");
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    const MAP: &str = "component Cup [0.73, 0.78]\ncomponent Tea [0.63, 0.81]\nCup->Tea\n";

    fn session() -> MapSession {
        MapSession::new(AppConfig::default(), MAP)
    }

    #[test]
    fn test_initial_parse_has_no_cues() {
        let mut session = session();
        assert_eq!(session.document().elements().len(), 2);
        assert!(session.last_cues().is_empty());
        assert!(session.previous().is_none());
        assert_eq!(session.glitches(0.0).count(), 0);
    }

    #[test]
    fn test_text_change_emits_new_and_moved_cues() {
        let mut session = session();
        let doc = session.on_text_changed(
            "component Cup [0.70, 0.78]\ncomponent Tea [0.63, 0.81]\ncomponent Water [0.3, 0.8]\n",
            2.0,
        );
        assert_eq!(doc.elements().len(), 3);

        let mut cues: Vec<(&str, bool)> = session
            .last_cues()
            .iter()
            .map(|c| (c.element_name(), c.is_new()))
            .collect();
        cues.sort();
        assert_eq!(cues, [("Cup", false), ("Water", true)]);
        assert!(session.previous().is_some());
        assert_eq!(session.revision(), 1);
    }

    #[test]
    fn test_cues_expire_after_configured_duration() {
        let mut session = session();
        session.apply_position_edit("Tea", 0.1, 0.1, 0.0).unwrap();

        assert_approx_eq!(f64, session.glitch_progress("Tea", 0.4).unwrap(), 0.5);
        assert_eq!(session.glitches(0.79).count(), 1);
        assert_eq!(session.glitches(0.8).count(), 0);
        assert!(session.glitch_progress("Tea", 0.8).is_none());
    }

    #[test]
    fn test_position_edit_is_surgical() {
        let mut session = MapSession::new(
            AppConfig::default(),
            "// shop\ncomponent Cup [0.73, 0.78] label [5, 5] // mug\r\nCup->Tea\r\n",
        );
        session.apply_position_edit("Cup", 0.25, 0.5, 1.0).unwrap();
        assert_eq!(
            session.text(),
            "// shop\ncomponent Cup [0.25, 0.50] label [5, 5] // mug\r\nCup->Tea\r\n"
        );
        assert_approx_eq!(f64, session.document().element("Cup").unwrap().visibility(), 0.25);
    }

    #[test]
    fn test_unknown_name_is_a_no_op() {
        let mut session = session();
        assert!(session.apply_position_edit("Kettle", 0.5, 0.5, 1.0).is_none());
        assert!(session.apply_evolve_edit("Kettle", 0.5, 1.0).is_none());
        assert_eq!(session.text(), MAP);
        assert_eq!(session.revision(), 0);
    }

    #[test]
    fn test_evolve_edit() {
        let mut session = MapSession::new(
            AppConfig::default(),
            "component Kettle [0.43, 0.35]\nevolve Kettle 0.62\n",
        );
        let doc = session.apply_evolve_edit("Kettle", 0.8, 1.0).unwrap();
        assert_approx_eq!(f64, doc.evolved()[0].maturity(), 0.8);
        assert_eq!(session.text(), "component Kettle [0.43, 0.35]\nevolve Kettle 0.80\n");
    }

    #[test]
    fn test_drag_to_surface_point() {
        let mut session = session();
        // default canvas: 800x600 with padding 40
        let doc = session
            .drag_to("Cup", Point::new(400.0, 300.0), 1.0)
            .unwrap()
            .unwrap();
        let cup = doc.element("Cup").unwrap();
        assert_approx_eq!(f64, cup.visibility(), 0.5);
        assert_approx_eq!(f64, cup.maturity(), 0.5);
    }

    #[test]
    fn test_stale_parse_is_discarded() {
        let mut session = session();

        session.replace_text("component Cup [0.1, 0.1]");
        let stale = session.begin_reparse();
        session.replace_text("component Cup [0.2, 0.2]");
        let fresh = session.begin_reparse();

        let stale = std::thread::spawn(move || stale.run()).join().unwrap();
        assert!(session.commit(stale, 1.0).is_none());
        assert_approx_eq!(f64, session.document().element("Cup").unwrap().visibility(), 0.73);

        let fresh = fresh.run();
        let again = fresh.clone();
        assert!(session.commit(fresh, 1.0).is_some());
        assert_approx_eq!(f64, session.document().element("Cup").unwrap().visibility(), 0.2);
        assert!(session.commit(again, 1.0).is_none());
    }

    #[test]
    fn test_reload_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.owm");
        std::fs::write(&path, "component Water [0.38, 0.82]").unwrap();

        let mut session = session();
        let doc = session.reload(&path, 1.0).unwrap();
        assert!(doc.element("Water").is_some());

        session.apply_position_edit("Water", 0.4, 0.9, 2.0).unwrap();
        session.save(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "component Water [0.40, 0.90]");
    }

    #[test]
    fn test_failed_reload_keeps_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session();

        let err = session.reload(dir.path().join("missing.owm"), 1.0).unwrap_err();
        assert!(matches!(err, WardleyError::Io(_)));
        assert_eq!(session.document().elements().len(), 2);
        assert_eq!(session.revision(), 0);
    }
}
