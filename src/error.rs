//! Construction-time geometry errors
//!
//! The shatter animation walks grid lines derived from an entity's extents,
//! so malformed geometry is rejected when the entity is built rather than
//! discovered mid-animation.

use std::fmt;

/// Axis named in a geometry error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
            Axis::Z => f.write_str("z"),
        }
    }
}

/// Reasons an entity cannot be constructed
#[derive(Debug, Clone, PartialEq)]
pub enum EntityError {
    /// A half-extent is zero, negative, or not finite
    BadExtent { axis: Axis, value: f32 },
    /// A shape rectangle has no area
    EmptyRect { index: usize },
    /// A shape rectangle reaches outside the entity's extents
    RectOutsideExtents { index: usize },
    /// The shape has no rectangles at all
    EmptyShape,
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::BadExtent { axis, value } => {
                write!(f, "{axis} extent must be positive and finite, got {value}")
            }
            EntityError::EmptyRect { index } => write!(f, "shape rect {index} has no area"),
            EntityError::RectOutsideExtents { index } => {
                write!(f, "shape rect {index} lies outside the entity extents")
            }
            EntityError::EmptyShape => f.write_str("shape has no rectangles"),
        }
    }
}

impl std::error::Error for EntityError {}
