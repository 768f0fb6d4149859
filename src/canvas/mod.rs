//! Logical ↔ device coordinate mapping.
mod mapper;

pub use mapper::{CanvasConfig, Interval, MAX_SURFACE_PX};
