//! Geometric primitives and the map coordinate transform.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate on the drawing surface
//! - [`Size`] - Width and height dimensions
//! - [`CoordinateMapper`] - Converts between normalized map coordinates and
//!   drawing-surface coordinates
//!
//! # Coordinate Systems
//!
//! Map statements position things with two normalized values:
//!
//! - **visibility** in `[0, 1]`: position in the value chain, `1` is the user
//! - **maturity** in `[0, 1]`: evolutionary stage, `0` is genesis
//!
//! The drawing surface uses the SVG convention:
//!
//! ```text
//!   (0,0) ────────► +X   (maturity grows rightward)
//!     │
//!     │
//!     ▼
//!    +Y                  (visibility grows upward)
//! ```
//!
//! The vertical axis is inverted: fully visible components sit at the top
//! padding edge.

use thiserror::Error;

/// A 2D point on the drawing surface.
///
/// # Examples
///
/// ```
/// # use wardley_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.5);
/// assert_eq!(mid.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// Represents the dimensions of a drawing surface or a box on it
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f64 {
        self.height
    }
}

/// Errors raised when building a [`CoordinateMapper`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    #[error("surface {width}x{height} leaves no drawable area with padding {padding}")]
    NoDrawableArea { width: f64, height: f64, padding: f64 },

    #[error("surface dimensions must be finite")]
    NotFinite,
}

/// Bidirectional transform between normalized map coordinates and a
/// drawing surface.
///
/// `maturity = 0` maps to the left padding edge and `maturity = 1` to
/// `width - padding`. `visibility = 1` maps to the top padding edge and
/// `visibility = 0` to `height - padding`.
///
/// The inverse functions are exact inverses of the forward transform, which
/// lets a drag position be turned back into the authoritative source value.
///
/// # Examples
///
/// ```
/// # use wardley_core::geometry::{CoordinateMapper, Size};
/// let mapper = CoordinateMapper::new(Size::new(500.0, 400.0), 50.0).unwrap();
///
/// let point = mapper.to_surface(1.0, 0.0);
/// assert_eq!(point.x(), 50.0);
/// assert_eq!(point.y(), 50.0);
///
/// assert_eq!(mapper.to_maturity(point.x()), 0.0);
/// assert_eq!(mapper.to_visibility(point.y()), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    surface: Size,
    padding: f64,
}

impl CoordinateMapper {
    /// Creates a mapper for a surface of the given size and uniform padding.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError`] if the padding consumes the whole surface or
    /// any dimension is not finite.
    pub fn new(surface: Size, padding: f64) -> Result<Self, SurfaceError> {
        if !(surface.width().is_finite() && surface.height().is_finite() && padding.is_finite())
        {
            return Err(SurfaceError::NotFinite);
        }
        if surface.width() - 2.0 * padding <= 0.0 || surface.height() - 2.0 * padding <= 0.0 {
            return Err(SurfaceError::NoDrawableArea {
                width: surface.width(),
                height: surface.height(),
                padding,
            });
        }
        Ok(Self { surface, padding })
    }

    /// Returns the full surface size.
    pub fn surface(&self) -> Size {
        self.surface
    }

    /// Returns the padding applied on every side.
    pub fn padding(&self) -> f64 {
        self.padding
    }

    fn drawable_width(&self) -> f64 {
        self.surface.width() - 2.0 * self.padding
    }

    fn drawable_height(&self) -> f64 {
        self.surface.height() - 2.0 * self.padding
    }

    /// Maps a maturity value to the horizontal surface coordinate.
    pub fn to_surface_x(&self, maturity: f64) -> f64 {
        self.padding + maturity * self.drawable_width()
    }

    /// Maps a visibility value to the vertical surface coordinate.
    pub fn to_surface_y(&self, visibility: f64) -> f64 {
        self.padding + (1.0 - visibility) * self.drawable_height()
    }

    /// Maps a `(visibility, maturity)` pair to a surface point.
    pub fn to_surface(&self, visibility: f64, maturity: f64) -> Point {
        Point::new(self.to_surface_x(maturity), self.to_surface_y(visibility))
    }

    /// Inverse of [`Self::to_surface_x`].
    pub fn to_maturity(&self, x: f64) -> f64 {
        (x - self.padding) / self.drawable_width()
    }

    /// Inverse of [`Self::to_surface_y`].
    pub fn to_visibility(&self, y: f64) -> f64 {
        1.0 - (y - self.padding) / self.drawable_height()
    }

    /// Converts a surface point back into `(visibility, maturity)`.
    pub fn to_normalized(&self, point: Point) -> (f64, f64) {
        (self.to_visibility(point.y()), self.to_maturity(point.x()))
    }
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self {
            surface: Size::new(800.0, 600.0),
            padding: 40.0,
        }
    }
}

/// Clamps a normalized coordinate into `[0, 1]`.
///
/// Parsed values are kept verbatim; only drawing code clamps.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn mapper_strategy() -> impl Strategy<Value = CoordinateMapper> {
        (200.0f64..4000.0, 200.0f64..4000.0, 0.0f64..90.0).prop_map(|(w, h, padding)| {
            CoordinateMapper::new(Size::new(w, h), padding).expect("padding below half size")
        })
    }

    /// Surface x then maturity must return the original maturity.
    fn check_maturity_roundtrip(mapper: CoordinateMapper, m: f64) -> Result<(), TestCaseError> {
        let back = mapper.to_maturity(mapper.to_surface_x(m));
        prop_assert!(approx_eq!(f64, back, m, epsilon = 1e-3));
        Ok(())
    }

    /// Surface y then visibility must return the original visibility.
    fn check_visibility_roundtrip(mapper: CoordinateMapper, v: f64) -> Result<(), TestCaseError> {
        let back = mapper.to_visibility(mapper.to_surface_y(v));
        prop_assert!(approx_eq!(f64, back, v, epsilon = 1e-3));
        Ok(())
    }

    /// Higher visibility always lands higher on the surface.
    fn check_visibility_is_monotonic(
        mapper: CoordinateMapper,
        a: f64,
        b: f64,
    ) -> Result<(), TestCaseError> {
        prop_assume!(a < b);
        prop_assert!(mapper.to_surface_y(a) > mapper.to_surface_y(b));
        Ok(())
    }

    proptest! {
        #[test]
        fn maturity_roundtrip(mapper in mapper_strategy(), m in 0.0f64..=1.0) {
            check_maturity_roundtrip(mapper, m)?;
        }

        #[test]
        fn visibility_roundtrip(mapper in mapper_strategy(), v in 0.0f64..=1.0) {
            check_visibility_roundtrip(mapper, v)?;
        }

        #[test]
        fn visibility_is_monotonic(mapper in mapper_strategy(), a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            check_visibility_is_monotonic(mapper, a, b)?;
        }
    }
}
