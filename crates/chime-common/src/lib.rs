//! # Chime Common
//!
//! Validation helpers shared by the widgets of the menu toolkit.
//!
//! This crate provides:
//! - Loosely-typed widget parameters ([`Value`]) and callable detection
//! - Validators for colors, vectors, alignments, orientations and positions
//! - Blank surface construction over a graphics backend
//! - A workaround for spurious key presses reported by the input backend

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod input;
pub mod surface;
pub mod validation;
pub mod value;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::input::*;
    pub use crate::surface::*;
    pub use crate::validation::*;
    pub use crate::value::*;
}

pub use prelude::*;
