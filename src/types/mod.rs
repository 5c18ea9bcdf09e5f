//! Data types for box trees and their placements.

mod geometry;
mod grid_box;
mod placed;

pub use geometry::*;
pub use grid_box::*;
pub use placed::*;
