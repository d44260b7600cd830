//! Wardley Core Types and Definitions
//!
//! This crate provides the foundational types for the Wardley map language:
//!
//! - **Geometry**: surface points and the [`geometry::CoordinateMapper`]
//! - **Colors**: CSS color handling ([`color::Color`])
//! - **Document**: the parsed map model ([`document`] module)
//! - **Glitch**: change detection between parses ([`glitch`] module)

pub mod color;
pub mod document;
pub mod geometry;
pub mod glitch;
