use anyhow::{bail, Result};
use glam::Mat4;

use crate::paint::Color;
use crate::render::Vertex;

use super::{Device, TargetDesc, UniformLocation, VertexAttribute};

/// Target handle issued by [`RecordingDevice`] (index into `targets`).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RecordedTarget(pub usize);

/// One call received by a [`RecordingDevice`], in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    BeginFrame,
    Clear { target: RecordedTarget, color: Color, depth: u32 },
    SetDrawTarget(RecordedTarget),
    UploadMatrix { location: UniformLocation, matrix: Mat4 },
    DrawTriangles(Vec<Vertex>),
    EndFrame,
}

/// Device that records per-frame calls instead of rendering.
///
/// Used as the test double for the batch renderer and for headless dry runs.
/// Knows the same two uniforms as the GPU program: `projection` and `modelView`.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    targets: Vec<TargetDesc>,
    attributes: Vec<VertexAttribute>,
    calls: Vec<DeviceCall>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn targets(&self) -> &[TargetDesc] {
        &self.targets
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    /// Drains the recorded calls.
    pub fn take_calls(&mut self) -> Vec<DeviceCall> {
        std::mem::take(&mut self.calls)
    }

    /// Vertex slices of every recorded draw, in submission order.
    pub fn draws(&self) -> impl Iterator<Item = &[Vertex]> {
        self.calls.iter().filter_map(|c| match c {
            DeviceCall::DrawTriangles(v) => Some(v.as_slice()),
            _ => None,
        })
    }

    pub fn draw_count(&self) -> usize {
        self.draws().count()
    }
}

impl Device for RecordingDevice {
    type Target = RecordedTarget;

    fn create_target(&mut self, desc: &TargetDesc) -> Result<RecordedTarget> {
        if desc.width == 0 || desc.height == 0 {
            bail!("render target has zero size ({}x{})", desc.width, desc.height);
        }
        self.targets.push(*desc);
        Ok(RecordedTarget(self.targets.len() - 1))
    }

    fn uniform_location(&self, name: &str) -> Result<UniformLocation> {
        match name {
            "projection" => Ok(UniformLocation(0)),
            "modelView" => Ok(UniformLocation(1)),
            other => bail!("unknown uniform `{other}`"),
        }
    }

    fn configure_vertex_attributes(&mut self, attributes: &[VertexAttribute]) -> Result<()> {
        self.attributes = attributes.to_vec();
        Ok(())
    }

    fn begin_frame(&mut self) {
        self.calls.push(DeviceCall::BeginFrame);
    }

    fn clear_target(&mut self, target: RecordedTarget, color: Color, depth: u32) {
        self.calls.push(DeviceCall::Clear { target, color, depth });
    }

    fn set_draw_target(&mut self, target: RecordedTarget) {
        self.calls.push(DeviceCall::SetDrawTarget(target));
    }

    fn upload_matrix(&mut self, location: UniformLocation, matrix: &Mat4) {
        self.calls.push(DeviceCall::UploadMatrix { location, matrix: *matrix });
    }

    fn draw_triangles(&mut self, vertices: &[Vertex]) {
        self.calls.push(DeviceCall::DrawTriangles(vertices.to_vec()));
    }

    fn end_frame(&mut self) {
        self.calls.push(DeviceCall::EndFrame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{ColorFormat, DepthFormat};

    #[test]
    fn rejects_unknown_uniform() {
        let dev = RecordingDevice::new();
        assert_eq!(dev.uniform_location("modelView").unwrap(), UniformLocation(1));
        assert!(dev.uniform_location("normalMatrix").is_err());
    }

    #[test]
    fn rejects_zero_sized_target() {
        let mut dev = RecordingDevice::new();
        let desc = TargetDesc {
            width: 0,
            height: 240,
            color: ColorFormat::Rgba8,
            depth: DepthFormat::Depth24Stencil8,
        };
        assert!(dev.create_target(&desc).is_err());
        assert!(dev.targets().is_empty());
    }
}
