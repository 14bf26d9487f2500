//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Byte stride of one vertex in an upload buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// Raw bytes of a vertex batch, ready for a GPU buffer
pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Colors for game elements
pub mod colors {
    pub const HUMAN_SHIP: [f32; 4] = [0.2, 0.8, 0.3, 1.0];
    pub const CPU_SHIP: [f32; 4] = [1.0, 0.55, 0.1, 1.0];
    pub const THRUST: [f32; 4] = [0.95, 0.15, 0.1, 1.0];
    pub const METEOR: [f32; 4] = [0.6, 0.6, 0.6, 1.0];
    pub const BULLET: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const TEXT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BANNER: [f32; 4] = [1.0, 0.85, 0.3, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
}
