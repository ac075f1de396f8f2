use std::collections::HashSet;
use std::num::NonZeroU64;
use std::ops::Range;

use crate::math::Mat3;

use super::error::{ShaderError, Stage};
use super::interface::{CompiledStage, link};
use super::uniforms::{UniformBlock, UniformLayout};
use super::{FRAGMENT_ENTRY, VERTEX_ENTRY};

/// A linked vertex + fragment program and its uniform block.
///
/// Owns the pipeline, the uniform buffer, and the bind group exposing it.
/// `destroy` releases them; a later `load_shaders` may link a new program.
pub struct ShaderProgram {
    surface_format: wgpu::TextureFormat,
    linked: Option<LinkedProgram>,
    /// Uniform names already reported as missing.
    warned: HashSet<String>,
}

struct LinkedProgram {
    pipeline: wgpu::RenderPipeline,
    block: UniformBlock,
    /// `None` when neither stage declares a uniform block.
    uniforms: Option<UniformBinding>,
}

struct UniformBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ShaderProgram {
    /// Creates a program with nothing linked, targeting `surface_format`.
    pub fn new(surface_format: wgpu::TextureFormat) -> Self {
        Self {
            surface_format,
            linked: None,
            warned: HashSet::new(),
        }
    }

    /// Compiles both stages, links them against `vertex_layouts`, and builds
    /// the pipeline.
    ///
    /// On success the new program replaces any previously linked one. On
    /// failure the previous program (if any) is left untouched.
    pub fn load_shaders(
        &mut self,
        device: &wgpu::Device,
        vertex_src: &str,
        fragment_src: &str,
        vertex_layouts: &[wgpu::VertexBufferLayout<'_>],
    ) -> Result<(), ShaderError> {
        let vertex = CompiledStage::compile(Stage::Vertex, vertex_src)?;
        let fragment = CompiledStage::compile(Stage::Fragment, fragment_src)?;

        let inputs: Vec<wgpu::VertexAttribute> = vertex_layouts
            .iter()
            .flat_map(|l| l.attributes.iter().copied())
            .collect();
        let layout = link(&vertex, &fragment, &inputs)?;

        let linked = self.build(device, vertex_src, fragment_src, vertex_layouts, layout);
        if let Some(previous) = self.linked.replace(linked) {
            log::debug!("shader program relinked; releasing the previous one");
            previous.release();
        }
        self.warned.clear();

        log::info!("shader program linked");
        Ok(())
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.linked.is_some()
    }

    /// Uniform layout of the linked program.
    pub fn uniform_layout(&self) -> Option<&UniformLayout> {
        self.linked.as_ref().map(|l| l.block.layout())
    }

    /// Makes this program the active one in `rpass`.
    ///
    /// Returns `false` (and binds nothing) when no program is linked; the
    /// caller must not draw in that case.
    pub fn use_program(&self, rpass: &mut wgpu::RenderPass<'_>) -> bool {
        let Some(linked) = self.linked.as_ref() else {
            return false;
        };

        rpass.set_pipeline(&linked.pipeline);
        if let Some(uniforms) = &linked.uniforms {
            rpass.set_bind_group(0, &uniforms.bind_group, &[]);
        }
        true
    }

    /// Uploads a float uniform. Unknown names are ignored.
    pub fn set_uniform_1f(&mut self, queue: &wgpu::Queue, name: &str, value: f32) {
        let written = self
            .linked
            .as_mut()
            .and_then(|l| l.block.set_f32(name, value).map(|range| l.upload(queue, range)));

        if written.is_none() {
            self.report_missing(name);
        }
    }

    /// Uploads a `mat3x3<f32>` uniform. Unknown names are ignored.
    pub fn set_uniform_matrix3fv(&mut self, queue: &wgpu::Queue, name: &str, value: &Mat3) {
        let written = self
            .linked
            .as_mut()
            .and_then(|l| l.block.set_mat3(name, value).map(|range| l.upload(queue, range)));

        if written.is_none() {
            self.report_missing(name);
        }
    }

    /// Releases the pipeline and uniform resources.
    pub fn destroy(&mut self) {
        match self.linked.take() {
            Some(linked) => {
                linked.release();
                log::debug!("shader program destroyed");
            }
            None => log::debug!("destroy on a shader program with nothing linked"),
        }
    }

    fn report_missing(&mut self, name: &str) {
        if self.warned.insert(name.to_string()) {
            log::debug!("uniform `{name}` not found in the linked program; ignoring");
        }
    }

    fn build(
        &self,
        device: &wgpu::Device,
        vertex_src: &str,
        fragment_src: &str,
        vertex_layouts: &[wgpu::VertexBufferLayout<'_>],
        layout: UniformLayout,
    ) -> LinkedProgram {
        let vs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quadspin vertex shader"),
            source: wgpu::ShaderSource::Wgsl(vertex_src.into()),
        });
        let fs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quadspin fragment shader"),
            source: wgpu::ShaderSource::Wgsl(fragment_src.into()),
        });

        let block = UniformBlock::new(layout);

        let uniform_bgl = NonZeroU64::new(uniform_buffer_size(block.layout())).map(|size| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("quadspin uniforms bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(size),
                    },
                    count: None,
                }],
            })
        });

        let bind_group_layouts: Vec<&wgpu::BindGroupLayout> = uniform_bgl.iter().collect();
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quadspin pipeline layout"),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quadspin pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: vertex_layouts,
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs_module,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let uniforms = uniform_bgl.as_ref().map(|bgl| {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("quadspin uniforms ubo"),
                size: uniform_buffer_size(block.layout()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("quadspin uniforms bind group"),
                layout: bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });

            UniformBinding { buffer, bind_group }
        });

        LinkedProgram {
            pipeline,
            block,
            uniforms,
        }
    }
}

impl LinkedProgram {
    fn upload(&self, queue: &wgpu::Queue, range: Range<usize>) {
        if let Some(uniforms) = &self.uniforms {
            queue.write_buffer(&uniforms.buffer, range.start as u64, &self.block.bytes()[range]);
        }
    }

    fn release(self) {
        if let Some(uniforms) = self.uniforms {
            uniforms.buffer.destroy();
        }
    }
}

/// Uniform buffers are sized in 16-byte steps; 0 means "no block".
fn uniform_buffer_size(layout: &UniformLayout) -> u64 {
    (layout.size() as u64).next_multiple_of(16)
}
