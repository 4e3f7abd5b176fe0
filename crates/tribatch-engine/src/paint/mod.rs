//! Paint model shared by the batch renderer and device backends.
//!
//! Scope is deliberately narrow: a packed 8-bit RGBA color. Per-vertex float
//! colors live on `render::Vertex`.

mod color;

pub use color::Color;
