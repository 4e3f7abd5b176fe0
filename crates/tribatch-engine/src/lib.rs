//! tribatch engine crate.
//!
//! An immediate-mode triangle batcher ([`render::BatchRenderer`]) over a small
//! device adapter trait ([`device::Device`]), with a headless wgpu backend.

pub mod device;
pub mod logging;
pub mod math;
pub mod paint;
pub mod render;
