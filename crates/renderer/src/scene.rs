//! GPU-side copy of a loaded scene: vertex/index buffers per mesh and
//! submesh, textures per material slot.

use std::collections::HashMap;

use anyhow::Result;
use wgpu::{
    Buffer, BufferUsages, Extent3d, Texture, TextureDescriptor, TextureDimension, TextureFormat,
    TextureUsages, TextureView, TextureViewDescriptor,
    util::{BufferInitDescriptor, DeviceExt, TextureDataOrder},
};

use asset::{Fallback, Material, Scene, TextureData, TextureSlot};

use crate::{GpuContext, GpuVertex};

/// Where a material slot's texels come from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureSource {
    File(String),
    Fallback(Fallback),
}

/// Texture source for each of the seven slots, in [`TextureSlot::ALL`] order.
pub fn plan_material_textures(material: &Material) -> Vec<(TextureSlot, TextureSource)> {
    TextureSlot::ALL
        .into_iter()
        .map(|slot| {
            let source = match material.texture_map(slot) {
                Some(file) if !file.is_empty() => TextureSource::File(file.to_owned()),
                _ => TextureSource::Fallback(slot.fallback()),
            };
            (slot, source)
        })
        .collect()
}

pub struct GpuTexture {
    pub texture: Texture,
    pub view: TextureView,
}

pub struct GpuSubMesh {
    pub index_buf: Buffer,
    pub index_count: u32,
    pub material: Option<String>,
}

pub struct GpuMesh {
    pub name: String,
    pub vertex_buf: Buffer,
    pub sub_meshes: Vec<GpuSubMesh>,
}

/// Per-slot indices into [`GpuScene::textures`].
pub struct GpuMaterial {
    pub textures: HashMap<TextureSlot, usize>,
    pub shininess: f32,
}

pub struct GpuScene {
    pub meshes: Vec<GpuMesh>,
    pub materials: HashMap<String, GpuMaterial>,
    pub textures: Vec<GpuTexture>,
}

impl GpuScene {
    /// Upload every mesh, submesh and referenced texture of `scene`.
    pub fn upload(ctx: &GpuContext, scene: &Scene) -> Result<Self> {
        let mut textures = Vec::new();
        let mut by_source: HashMap<TextureSource, usize> = HashMap::new();

        let mut materials = HashMap::new();
        for (name, material) in scene.materials() {
            let mut slots = HashMap::new();
            for (slot, source) in plan_material_textures(material) {
                let index = match by_source.get(&source) {
                    Some(&i) => i,
                    None => {
                        let data = load_texture_data(scene, slot, &source);
                        textures.push(create_texture(ctx, &data, &texture_label(&source)));
                        by_source.insert(source, textures.len() - 1);
                        textures.len() - 1
                    }
                };
                slots.insert(slot, index);
            }
            materials.insert(
                name.clone(),
                GpuMaterial {
                    textures: slots,
                    shininess: material.shininess,
                },
            );
        }

        let meshes = scene
            .meshes()
            .iter()
            .map(|mesh| {
                let vertices: Vec<GpuVertex> = mesh.vertices.iter().map(GpuVertex::from).collect();
                let vertex_buf = ctx.device.create_buffer_init(&BufferInitDescriptor {
                    label: Some(&mesh.name),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: BufferUsages::VERTEX,
                });
                let sub_meshes = mesh
                    .sub_meshes
                    .iter()
                    .map(|sub| GpuSubMesh {
                        index_buf: ctx.device.create_buffer_init(&BufferInitDescriptor {
                            label: Some(&sub.name),
                            contents: bytemuck::cast_slice(&sub.indices),
                            usage: BufferUsages::INDEX,
                        }),
                        index_count: sub.indices.len() as u32,
                        material: sub.material.clone(),
                    })
                    .collect();
                GpuMesh {
                    name: mesh.name.clone(),
                    vertex_buf,
                    sub_meshes,
                }
            })
            .collect();

        log::info!(
            "Uploaded scene: {} meshes, {} materials, {} textures",
            scene.meshes().len(),
            materials.len(),
            textures.len()
        );
        Ok(Self {
            meshes,
            materials,
            textures,
        })
    }

    /// Release every buffer and texture now instead of at drop.
    pub fn destroy(self) {
        for mesh in &self.meshes {
            mesh.vertex_buf.destroy();
            for sub in &mesh.sub_meshes {
                sub.index_buf.destroy();
            }
        }
        for tex in &self.textures {
            tex.texture.destroy();
        }
        log::info!(
            "Destroyed GPU scene ({} meshes, {} textures)",
            self.meshes.len(),
            self.textures.len()
        );
    }
}

fn texture_label(source: &TextureSource) -> String {
    match source {
        TextureSource::File(file) => file.clone(),
        TextureSource::Fallback(kind) => format!("{:?} fallback", kind),
    }
}

/// Decode a slot's texture; unreadable files fall back to the slot default.
fn load_texture_data(scene: &Scene, slot: TextureSlot, source: &TextureSource) -> TextureData {
    match source {
        TextureSource::File(file) => match TextureData::load_png(scene.resolve(file)) {
            Ok(data) => data,
            Err(err) => {
                log::warn!("{:?} map '{}': {:#}; using fallback", slot, file, err);
                TextureData::fallback(slot.fallback())
            }
        },
        TextureSource::Fallback(kind) => TextureData::fallback(*kind),
    }
}

fn create_texture(ctx: &GpuContext, data: &TextureData, label: &str) -> GpuTexture {
    let texture = ctx.device.create_texture_with_data(
        &ctx.queue,
        &TextureDescriptor {
            label: Some(label),
            size: Extent3d {
                width: data.width,
                height: data.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8UnormSrgb,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        &data.data,
    );
    let view = texture.create_view(&TextureViewDescriptor::default());
    GpuTexture { texture, view }
}
