/// Submission counters for the current (or last finished) frame.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Draw calls issued to the device.
    pub draw_calls: u32,

    /// Vertices handed to the device across all draw calls.
    pub vertices_submitted: u64,

    /// Flushes forced by a full buffer, as opposed to `flush()`/`end_frame()`.
    pub auto_flushes: u32,
}
