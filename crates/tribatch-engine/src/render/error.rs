use std::fmt;

/// Contract violation reported by `BatchRenderer` push and frame calls.
///
/// A call that returns an error has not touched the batch buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// Push or `end_frame` without a matching `begin_frame`.
    NoActiveFrame,
    /// `begin_frame` while a frame is already open.
    FrameAlreadyActive,
    /// Vertex count that does not form whole triangles.
    IncompleteTriangle { count: usize },
    /// `indices[position]` does not address a vertex.
    IndexOutOfRange { position: usize, index: u32, len: usize },
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::NoActiveFrame => write!(f, "no frame is active"),
            BatchError::FrameAlreadyActive => write!(f, "a frame is already active"),
            BatchError::IncompleteTriangle { count } => {
                write!(f, "{count} vertices do not form whole triangles")
            }
            BatchError::IndexOutOfRange { position, index, len } => write!(
                f,
                "index {index} at position {position} is out of range for {len} vertices"
            ),
        }
    }
}

impl std::error::Error for BatchError {}
