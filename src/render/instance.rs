//! Packed instance data for GPU-style backends.

use bytemuck::{Pod, Zeroable};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u32)]
pub enum ShapeType {
    Disc = 0,
    Ring = 1,
    Rect = 2,
}

/// One primitive, 24 bytes, tightly packed.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ShapeInstance {
    /// Center in world units
    pub position: [f32; 2],
    /// Disc: [radius, radius]; Ring: [inner, outer]; Rect: [width, height]
    pub size: [f32; 2],
    /// Packed RGBA color (see Color::to_u32).
    pub color: u32,
    pub shape_type: u32,
}

impl ShapeInstance {
    pub fn new(position: [f32; 2], size: [f32; 2], color: u32, shape: ShapeType) -> Self {
        Self {
            position,
            size,
            color,
            shape_type: shape as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_size() {
        assert_eq!(std::mem::size_of::<ShapeInstance>(), 24);
    }

    #[test]
    fn test_instance_alignment() {
        assert_eq!(std::mem::align_of::<ShapeInstance>(), 4);
    }

    #[test]
    fn test_instances_cast_to_bytes() {
        let instances = [ShapeInstance::new([1.0, 2.0], [4.0, 4.0], 0xFF00FFFF, ShapeType::Disc); 3];
        let bytes: &[u8] = bytemuck::cast_slice(&instances);
        assert_eq!(bytes.len(), 72);
    }
}
