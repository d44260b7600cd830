//! Change detection between successive parses.
//!
//! The [`GlitchTracker`] compares the elements of a new [`Document`] with the
//! previous one, keyed by element name, and emits a transient cue for every
//! element that is new or has moved. Cues expire after a fixed duration and
//! are pruned lazily whenever the tracker is sampled.

use std::collections::HashMap;

use log::{debug, trace};

use crate::document::Document;

/// Default cue lifetime in time units.
pub const DEFAULT_GLITCH_DURATION: f64 = 0.8;

/// Position differences at or below this are not movement.
pub const MOVE_EPSILON: f64 = 1e-3;

/// A transient highlight cue for one element.
#[derive(Debug, Clone, PartialEq)]
pub struct GlitchEntry {
    element_name: String,
    start_time: f64,
    is_new: bool,
}

impl GlitchEntry {
    pub fn new(element_name: impl Into<String>, start_time: f64, is_new: bool) -> Self {
        Self {
            element_name: element_name.into(),
            start_time,
            is_new,
        }
    }

    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// `true` for a newly introduced element, `false` for a moved one.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    fn is_expired(&self, now: f64, duration: f64) -> bool {
        now - self.start_time >= duration
    }
}

/// Tracks active glitch cues across parses.
///
/// # Examples
///
/// ```
/// # use wardley_core::document::{Document, Element, ElementKind};
/// # use wardley_core::glitch::GlitchTracker;
/// let mut before = Document::builder();
/// before.element(Element::new(ElementKind::Component, "Cup", 0.7, 0.7, 1));
/// let before = before.build();
///
/// let mut after = Document::builder();
/// after
///     .element(Element::new(ElementKind::Component, "Cup", 0.7, 0.8, 1))
///     .element(Element::new(ElementKind::Component, "Tea", 0.6, 0.8, 2));
/// let after = after.build();
///
/// let mut tracker = GlitchTracker::default();
/// assert!(tracker.observe(None, &before, 0.0).is_empty());
///
/// let cues = tracker.observe(Some(&before), &after, 1.0);
/// assert_eq!(cues.len(), 2);
/// assert_eq!(tracker.active(2.0).count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct GlitchTracker {
    duration: f64,
    entries: HashMap<String, GlitchEntry>,
}

impl GlitchTracker {
    /// Creates a tracker whose cues last `duration` time units.
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            entries: HashMap::new(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Diffs `current` against `previous` and records cues started at `now`.
    ///
    /// Returns the cues emitted by this call. Nothing is emitted when there
    /// is no previous document, so an initial load never animates.
    pub fn observe(
        &mut self,
        previous: Option<&Document>,
        current: &Document,
        now: f64,
    ) -> Vec<GlitchEntry> {
        self.prune(now);

        let Some(previous) = previous else {
            debug!("No previous document, skipping change detection");
            return Vec::new();
        };

        let before: HashMap<&str, (f64, f64)> = previous
            .elements()
            .iter()
            .map(|e| (e.name(), (e.visibility(), e.maturity())))
            .collect();

        let mut emitted = Vec::new();
        for element in current.elements() {
            let name = element.name();
            match before.get(name) {
                None => {
                    if self.entries.contains_key(name) {
                        continue;
                    }
                    let cue = GlitchEntry::new(name, now, true);
                    self.entries.insert(name.to_string(), cue.clone());
                    emitted.push(cue);
                }
                Some(&(visibility, maturity)) => {
                    let moved = (element.visibility() - visibility).abs() > MOVE_EPSILON
                        || (element.maturity() - maturity).abs() > MOVE_EPSILON;
                    if moved {
                        let cue = GlitchEntry::new(name, now, false);
                        self.entries.insert(name.to_string(), cue.clone());
                        emitted.push(cue);
                    }
                }
            }
        }

        debug!(emitted = emitted.len(), active = self.entries.len(); "Change detection finished");
        trace!(emitted:?; "Emitted glitch cues");
        emitted
    }

    /// Drops cues whose lifetime has elapsed at `now`.
    pub fn prune(&mut self, now: f64) {
        let duration = self.duration;
        self.entries.retain(|_, entry| !entry.is_expired(now, duration));
    }

    /// Prunes expired cues and iterates over the remaining ones.
    pub fn active(&mut self, now: f64) -> impl Iterator<Item = &GlitchEntry> {
        self.prune(now);
        self.entries.values()
    }

    /// Animation progress in `[0, 1)` of the cue for `name`, if active.
    pub fn progress(&mut self, name: &str, now: f64) -> Option<f64> {
        self.prune(now);
        let duration = self.duration;
        self.entries
            .get(name)
            .map(|entry| ((now - entry.start_time) / duration).max(0.0))
    }

    /// Forgets every cue.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for GlitchTracker {
    fn default() -> Self {
        Self::new(DEFAULT_GLITCH_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::document::{Element, ElementKind};

    fn doc(elements: &[(&str, f64, f64)]) -> Document {
        let mut builder = Document::builder();
        for (i, (name, v, m)) in elements.iter().enumerate() {
            builder.element(Element::new(ElementKind::Component, *name, *v, *m, i + 1));
        }
        builder.build()
    }

    #[test]
    fn test_first_parse_emits_nothing() {
        let mut tracker = GlitchTracker::default();
        let current = doc(&[("Cup", 0.7, 0.7), ("Tea", 0.6, 0.8)]);
        assert!(tracker.observe(None, &current, 0.0).is_empty());
        assert_eq!(tracker.active(0.0).count(), 0);
    }

    #[test]
    fn test_new_element_emits_new_cue() {
        let mut tracker = GlitchTracker::default();
        let previous = doc(&[("Cup", 0.7, 0.7)]);
        let current = doc(&[("Cup", 0.7, 0.7), ("Tea", 0.6, 0.8)]);

        let cues = tracker.observe(Some(&previous), &current, 1.0);
        assert_eq!(cues, vec![GlitchEntry::new("Tea", 1.0, true)]);
    }

    #[test]
    fn test_moved_element_emits_changed_cue() {
        let mut tracker = GlitchTracker::default();
        let previous = doc(&[("Cup", 0.7, 0.7)]);
        let current = doc(&[("Cup", 0.7, 0.75)]);

        let cues = tracker.observe(Some(&previous), &current, 1.0);
        assert_eq!(cues.len(), 1);
        assert!(!cues[0].is_new());
    }

    #[test]
    fn test_sub_epsilon_move_is_ignored() {
        let mut tracker = GlitchTracker::default();
        let previous = doc(&[("Cup", 0.7, 0.7)]);
        let current = doc(&[("Cup", 0.7005, 0.7)]);

        assert!(tracker.observe(Some(&previous), &current, 1.0).is_empty());
    }

    #[test]
    fn test_active_new_cue_is_not_reemitted() {
        let mut tracker = GlitchTracker::default();
        let empty = doc(&[]);
        let current = doc(&[("Tea", 0.6, 0.8)]);

        assert_eq!(tracker.observe(Some(&empty), &current, 1.0).len(), 1);
        // Reparse of a buffer where Tea is still absent from the baseline.
        assert!(tracker.observe(Some(&empty), &current, 1.3).is_empty());
        // Once expired it fires again.
        assert_eq!(tracker.observe(Some(&empty), &current, 1.9).len(), 1);
    }

    #[test]
    fn test_cues_expire_at_duration() {
        let mut tracker = GlitchTracker::default();
        let previous = doc(&[]);
        let current = doc(&[("Tea", 0.6, 0.8)]);
        tracker.observe(Some(&previous), &current, 0.0);

        assert_eq!(tracker.active(0.79).count(), 1);
        assert_eq!(tracker.active(0.8).count(), 0);
    }

    #[test]
    fn test_progress() {
        let mut tracker = GlitchTracker::new(2.0);
        let previous = doc(&[]);
        let current = doc(&[("Tea", 0.6, 0.8)]);
        tracker.observe(Some(&previous), &current, 1.0);

        assert_approx_eq!(f64, tracker.progress("Tea", 2.0).unwrap(), 0.5);
        assert_eq!(tracker.progress("Cup", 2.0), None);
        assert_eq!(tracker.progress("Tea", 3.0), None);
    }

    #[test]
    fn test_removed_element_emits_nothing() {
        let mut tracker = GlitchTracker::default();
        let previous = doc(&[("Cup", 0.7, 0.7), ("Tea", 0.6, 0.8)]);
        let current = doc(&[("Cup", 0.7, 0.7)]);
        assert!(tracker.observe(Some(&previous), &current, 1.0).is_empty());
    }
}
