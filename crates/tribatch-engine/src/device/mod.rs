//! Device adapter boundary.
//!
//! This module is responsible for:
//! - the [`Device`] trait the batch renderer submits through
//! - target/uniform/attribute descriptor types shared by all backends
//! - a headless wgpu backend ([`WgpuDevice`])
//! - a call recorder for tests and dry runs ([`RecordingDevice`])

mod adapter;
mod gpu;
mod init;
mod recording;

pub use adapter::{
    AttributeKind, ColorFormat, DepthFormat, Device, TargetDesc, UniformLocation, VertexAttribute,
};
pub use gpu::{GpuTarget, WgpuDevice};
pub use init::WgpuDeviceInit;
pub use recording::{DeviceCall, RecordedTarget, RecordingDevice};
