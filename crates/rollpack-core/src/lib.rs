//! Strip packing of rectangular pieces onto rolls of fixed width.
//!
//! Dimensions enter in meters and are packed in integer sub-units
//! (see [`scale`]). [`Planner`] is the usual entry point.

pub mod compare;
pub mod join;
pub mod packer;
pub mod planner;
pub mod scale;
pub mod types;

pub use compare::{compare, CompareOptions, DEFAULT_PRODUCTION_GAP};
pub use packer::{efficiency_pct, orientations, pack, OrientationPreference, Packer};
pub use planner::Planner;
pub use types::*;
