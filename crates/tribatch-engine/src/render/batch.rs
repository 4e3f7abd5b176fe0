use anyhow::{Context, Result};
use bytemuck::Zeroable;
use glam::Mat4;

use crate::device::{Device, UniformLocation};
use crate::math;
use crate::paint::Color;

use super::{BatchError, FrameStats, RendererConfig, Vertex};

/// Immediate-mode triangle batcher.
///
/// Pushed vertices accumulate in a fixed buffer allocated once at construction
/// and reach the device as triangle-list draws, in push order. The buffer is
/// flushed when it would overflow, on [`flush`](Self::flush), and at
/// [`end_frame`](Self::end_frame).
///
/// Capacity policy:
/// - a triangle push flushes first when `len + 3 >= capacity`
/// - an array push that does not fit (`len + n >= capacity`) appends vertex by
///   vertex, flushing whenever `len + 1 >= capacity`
///
/// Both checks keep one slot unused. The second one can split an array, even a
/// single triangle, across two draw calls; callers must not assume one push
/// is one draw.
///
/// The renderer owns its device for its whole lifetime.
pub struct BatchRenderer<D: Device> {
    device: D,
    target: D::Target,

    loc_projection: UniformLocation,
    loc_model_view: UniformLocation,

    buffer: Box<[Vertex]>,
    len: usize,

    clear_color: Color,
    projection: Mat4,
    model: Mat4,

    frame_active: bool,
    stats: FrameStats,
}

impl<D: Device> BatchRenderer<D> {
    /// Sets up the device and allocates the batch buffer.
    ///
    /// Any failure here means the device is unusable.
    pub fn new(mut device: D, config: RendererConfig) -> Result<Self> {
        config.validate().context("invalid renderer config")?;

        let target = device
            .create_target(&config.target_desc())
            .context("failed to create render target")?;

        let loc_projection = device
            .uniform_location("projection")
            .context("failed to resolve projection uniform")?;
        let loc_model_view = device
            .uniform_location("modelView")
            .context("failed to resolve modelView uniform")?;

        device
            .configure_vertex_attributes(&Vertex::ATTRIBUTES)
            .context("failed to configure vertex attributes")?;

        let buffer = vec![Vertex::zeroed(); config.capacity].into_boxed_slice();

        log::info!(
            "batch renderer ready: {}x{} target, {} vertex buffer",
            config.width,
            config.height,
            config.capacity
        );

        Ok(Self {
            device,
            target,
            loc_projection,
            loc_model_view,
            buffer,
            len: 0,
            clear_color: config.clear_color,
            projection: config.projection(),
            model: math::identity(),
            frame_active: false,
            stats: FrameStats::default(),
        })
    }

    // ── frame lifecycle ───────────────────────────────────────────────────

    /// Starts a device frame, clears the target to the clear color and binds
    /// it for drawing.
    pub fn begin_frame(&mut self) -> Result<(), BatchError> {
        if self.frame_active {
            return Err(BatchError::FrameAlreadyActive);
        }

        self.stats = FrameStats::default();
        self.device.begin_frame();
        self.device.clear_target(self.target, self.clear_color, 0);
        self.device.set_draw_target(self.target);
        self.frame_active = true;
        Ok(())
    }

    /// Flushes pending vertices and finishes the device frame.
    pub fn end_frame(&mut self) -> Result<(), BatchError> {
        self.ensure_frame()?;

        if self.len > 0 {
            self.flush();
        }
        self.device.end_frame();
        self.frame_active = false;

        log::debug!(
            "frame done: {} draw calls, {} vertices, {} auto flushes",
            self.stats.draw_calls,
            self.stats.vertices_submitted,
            self.stats.auto_flushes
        );
        Ok(())
    }

    // ── pushes ────────────────────────────────────────────────────────────

    /// Appends one triangle.
    pub fn push_triangle(&mut self, v1: Vertex, v2: Vertex, v3: Vertex) -> Result<(), BatchError> {
        self.ensure_frame()?;

        if self.len + 3 >= self.capacity() {
            self.auto_flush();
        }
        self.buffer[self.len..self.len + 3].copy_from_slice(&[v1, v2, v3]);
        self.len += 3;
        Ok(())
    }

    /// Appends a triangle list verbatim.
    pub fn push_vertices(&mut self, vertices: &[Vertex]) -> Result<(), BatchError> {
        self.ensure_frame()?;
        whole_triangles(vertices.len())?;

        self.append(vertices.len(), vertices.iter().copied());
        Ok(())
    }

    /// Appends `vertices[indices[i]]` for each `i`, in index order.
    pub fn push_indexed(&mut self, vertices: &[Vertex], indices: &[u32]) -> Result<(), BatchError> {
        self.ensure_frame()?;
        whole_triangles(indices.len())?;

        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= vertices.len())
        {
            return Err(BatchError::IndexOutOfRange {
                position,
                index,
                len: vertices.len(),
            });
        }

        self.append(indices.len(), indices.iter().map(|&i| vertices[i as usize]));
        Ok(())
    }

    /// Filled axis-aligned rectangle at the default depth.
    ///
    /// Emits `(bl, br, tl)` then `(tl, br, tr)`; both triangles share the
    /// same winding.
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) -> Result<(), BatchError> {
        let bl = Vertex::from_xy(x, y, color);
        let br = Vertex::from_xy(x + w, y, color);
        let tl = Vertex::from_xy(x, y + h, color);
        let tr = Vertex::from_xy(x + w, y + h, color);

        self.push_triangle(bl, br, tl)?;
        self.push_triangle(tl, br, tr)
    }

    /// Submits pending vertices with the current matrices. No-op when empty.
    pub fn flush(&mut self) {
        if self.len == 0 {
            return;
        }

        self.device.upload_matrix(self.loc_projection, &self.projection);
        self.device.upload_matrix(self.loc_model_view, &self.model);
        self.device.draw_triangles(&self.buffer[..self.len]);

        self.stats.draw_calls += 1;
        self.stats.vertices_submitted += self.len as u64;
        log::trace!("flushed {} vertices", self.len);

        self.len = 0;
    }

    // ── state ─────────────────────────────────────────────────────────────

    /// Replaces the clear color, returning the previous one.
    ///
    /// Takes effect at the next `begin_frame`.
    pub fn set_clear_color(&mut self, color: Color) -> Color {
        std::mem::replace(&mut self.clear_color, color)
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// In-place access; edits apply from the next flush.
    pub fn projection_mut(&mut self) -> &mut Mat4 {
        &mut self.projection
    }

    pub fn model(&self) -> &Mat4 {
        &self.model
    }

    /// In-place access; edits apply from the next flush.
    pub fn model_mut(&mut self) -> &mut Mat4 {
        &mut self.model
    }

    /// Pending (not yet submitted) vertex count.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn pending(&self) -> &[Vertex] {
        &self.buffer[..self.len]
    }

    pub fn is_frame_active(&self) -> bool {
        self.frame_active
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn target(&self) -> D::Target {
        self.target
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    // ── internals ─────────────────────────────────────────────────────────

    fn ensure_frame(&self) -> Result<(), BatchError> {
        if self.frame_active {
            Ok(())
        } else {
            Err(BatchError::NoActiveFrame)
        }
    }

    fn auto_flush(&mut self) {
        self.stats.auto_flushes += 1;
        self.flush();
    }

    fn append<I>(&mut self, count: usize, vertices: I)
    where
        I: IntoIterator<Item = Vertex>,
    {
        if self.len + count < self.capacity() {
            for (slot, v) in self.buffer[self.len..self.len + count].iter_mut().zip(vertices) {
                *slot = v;
            }
            self.len += count;
            return;
        }

        for v in vertices {
            if self.len + 1 >= self.capacity() {
                self.auto_flush();
            }
            self.buffer[self.len] = v;
            self.len += 1;
        }
    }
}

fn whole_triangles(count: usize) -> Result<(), BatchError> {
    if count % 3 == 0 {
        Ok(())
    } else {
        Err(BatchError::IncompleteTriangle { count })
    }
}
