//! Annotations and attitude regions.

use std::fmt;

/// A numbered annotation, placed at one or more map positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    number: u32,
    occurrences: Vec<(f64, f64)>,
    text: String,
    line: usize,
}

impl Annotation {
    pub fn new(number: u32, occurrences: Vec<(f64, f64)>, text: impl Into<String>, line: usize) -> Self {
        Self {
            number,
            occurrences,
            text: text.into(),
            line,
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// `(visibility, maturity)` positions of the numbered marker.
    pub fn occurrences(&self) -> &[(f64, f64)] {
        &self.occurrences
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

/// The three attitudes a team can take towards a part of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttitudeKind {
    Pioneers,
    Settlers,
    Townplanners,
}

impl AttitudeKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "pioneers" => Some(Self::Pioneers),
            "settlers" => Some(Self::Settlers),
            "townplanners" => Some(Self::Townplanners),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Pioneers => "pioneers",
            Self::Settlers => "settlers",
            Self::Townplanners => "townplanners",
        }
    }
}

impl fmt::Display for AttitudeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// How far an attitude region reaches from its first corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttitudeExtent {
    /// Opposite corner in map coordinates: `[v1, m1, v2, m2]`.
    Corner { visibility: f64, maturity: f64 },
    /// Explicit surface size: `[v, m] width height`.
    Size { width: f64, height: f64 },
}

/// A rectangular attitude region.
#[derive(Debug, Clone, PartialEq)]
pub struct Attitude {
    kind: AttitudeKind,
    visibility: f64,
    maturity: f64,
    extent: AttitudeExtent,
    line: usize,
}

impl Attitude {
    pub fn new(kind: AttitudeKind, visibility: f64, maturity: f64, extent: AttitudeExtent, line: usize) -> Self {
        Self {
            kind,
            visibility,
            maturity,
            extent,
            line,
        }
    }

    pub fn kind(&self) -> AttitudeKind {
        self.kind
    }

    pub fn visibility(&self) -> f64 {
        self.visibility
    }

    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    pub fn extent(&self) -> AttitudeExtent {
        self.extent
    }

    pub fn line(&self) -> usize {
        self.line
    }
}
