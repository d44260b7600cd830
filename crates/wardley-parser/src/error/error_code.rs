//! Error codes for the Wardley diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Source preparation (comment stripping, pipeline bodies)
//! - `E1xx` - Statement syntax errors
//! - `E2xx` - Configuration statements
//! - `E3xx` - Unrecognized input

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Source Errors (E0xx)
    // =========================================================================
    /// Unterminated block comment.
    ///
    /// A `/*` was opened but never closed; the rest of the file is ignored.
    E001,

    /// Unclosed pipeline body.
    ///
    /// A pipeline's `{` body was opened but never closed; the rest of the
    /// file is read as the body.
    E002,

    // =========================================================================
    // Statement Errors (E1xx)
    // =========================================================================
    /// Malformed coordinates.
    ///
    /// A coordinate bracket could not be read, or it has the wrong number
    /// of values for the statement.
    E100,

    /// Missing required token.
    ///
    /// A statement is missing its name, text, or coordinate bracket.
    E101,

    /// Malformed link.
    ///
    /// A link statement has no resolvable start or end name.
    E102,

    /// Malformed clause.
    ///
    /// A trailing clause such as `label [x, y]`, `url(...)` or `evolve <m>`
    /// could not be read.
    E103,

    /// Duplicate name.
    ///
    /// A component, submap, anchor or accelerator reuses a name already
    /// declared by the same kind. The first declaration wins.
    E104,

    // =========================================================================
    // Configuration Errors (E2xx)
    // =========================================================================
    /// Invalid evolution stages.
    ///
    /// An `evolution` statement must name exactly four stages separated by
    /// `->`. The default stages are used instead.
    E200,

    /// Invalid canvas size.
    ///
    /// A `size` statement must be `size [<width>, <height>]` with positive
    /// values.
    E201,

    // =========================================================================
    // Unrecognized Input (E3xx)
    // =========================================================================
    /// Unrecognized statement.
    ///
    /// The line starts with no known keyword and contains no link operator.
    E300,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E300 => "E300",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated block comment",
            ErrorCode::E002 => "unclosed pipeline body",
            ErrorCode::E100 => "malformed coordinates",
            ErrorCode::E101 => "missing required token",
            ErrorCode::E102 => "malformed link",
            ErrorCode::E103 => "malformed clause",
            ErrorCode::E104 => "duplicate name",
            ErrorCode::E200 => "invalid evolution stages",
            ErrorCode::E201 => "invalid canvas size",
            ErrorCode::E300 => "unrecognized statement",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
