//! Renderer: wgpu device setup and upload of loaded scenes into GPU buffers
//! and textures.
//! wgpu = 26.x

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use wgpu::{
    Adapter, Backends, Device, DeviceDescriptor, Instance, InstanceDescriptor, Limits,
    PowerPreference, Queue, VertexBufferLayout, VertexStepMode,
};

use asset::MeshVertex;

pub mod scene;

pub use scene::{GpuMaterial, GpuMesh, GpuScene, TextureSource, plan_material_textures};

/// Vertex: position (w kept) + normal + tangent + uv.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 4],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl GpuVertex {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: std::mem::size_of::<GpuVertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![
            0 => Float32x4,
            1 => Float32x3,
            2 => Float32x3,
            3 => Float32x2
        ],
    };
}

impl From<&MeshVertex> for GpuVertex {
    fn from(v: &MeshVertex) -> Self {
        Self {
            position: v.position.to_array(),
            normal: v.normal.to_array(),
            tangent: v.tangent.to_array(),
            tex_coord: v.tex_coord.to_array(),
        }
    }
}

/// Device and queue without a presentation surface.
pub struct GpuContext {
    pub adapter: Adapter,
    pub device: Device,
    pub queue: Queue,
}

impl GpuContext {
    /// Blocking adapter/device request on the given backends.
    pub fn headless(backends: Backends) -> Result<Self> {
        pollster::block_on(Self::new_headless(backends))
    }

    async fn new_headless(backends: Backends) -> Result<Self> {
        let instance = Instance::new(&InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable GPU adapter")?;
        log::info!("Using adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("ShaderDemo Device"),
                required_limits: Limits::downlevel_defaults().using_resolution(adapter.limits()),
                ..Default::default()
            })
            .await
            .context("request_device failed")?;

        Ok(Self {
            adapter,
            device,
            queue,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3, Vec4};

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<GpuVertex>(), 48);
        assert_eq!(GpuVertex::LAYOUT.array_stride, 48);
        let offsets: Vec<u64> = GpuVertex::LAYOUT.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 16, 28, 40]);
    }

    #[test]
    fn converts_mesh_vertex() {
        let mut v = MeshVertex::new(Vec4::new(1.0, 2.0, 3.0, 1.0), Vec3::Z, Vec2::new(0.5, 0.25));
        v.tangent = Vec3::X;
        let g = GpuVertex::from(&v);
        assert_eq!(g.position, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(g.normal, [0.0, 0.0, 1.0]);
        assert_eq!(g.tangent, [1.0, 0.0, 0.0]);
        assert_eq!(g.tex_coord, [0.5, 0.25]);
        assert_eq!(bytemuck::bytes_of(&g).len(), 48);
    }
}
