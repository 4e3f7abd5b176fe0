//! Triangle batching.
//!
//! [`BatchRenderer`] accumulates [`Vertex`] data on the CPU and submits it
//! through a `device::Device` as triangle-list draws.
//!
//! Convention:
//! - positions are logical pixels, origin bottom-left, +Y up
//! - one pair of transform uniforms (projection, model-view) per draw

mod batch;
mod config;
mod error;
mod stats;
mod vertex;

pub use batch::BatchRenderer;
pub use config::{RendererConfig, MIN_CAPACITY};
pub use error::BatchError;
pub use stats::FrameStats;
pub use vertex::{Vertex, DEFAULT_Z};
