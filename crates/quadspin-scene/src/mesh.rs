use wgpu::util::DeviceExt;

use crate::geometry::QuadGeometry;

/// GPU copy of a `QuadGeometry`: positions, colors and indices in three
/// immutable buffers.
///
/// Buffers are uploaded once by `upload` and destroyed once by `release`,
/// which consumes the mesh.
pub struct QuadMesh {
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

impl QuadMesh {
    const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
        0 => Float32x3 // x, y, w
    ];
    const COLOR_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
        1 => Float32x3 // rgb
    ];

    /// Vertex-array state: slot 0 feeds `@location(0)`, slot 1 `@location(1)`.
    pub fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
        [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &Self::POSITION_ATTRS,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &Self::COLOR_ATTRS,
            },
        ]
    }

    pub fn upload(device: &wgpu::Device, geometry: &QuadGeometry) -> Self {
        debug_assert!(geometry.is_valid());

        let positions = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quadspin square vbo"),
            contents: bytemuck::cast_slice(&geometry.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let colors = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quadspin color vbo"),
            contents: bytemuck::cast_slice(&geometry.colors),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quadspin square ibo"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!("quad mesh uploaded ({} indices)", geometry.index_count());

        Self {
            positions,
            colors,
            indices,
            index_count: geometry.index_count(),
        }
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Binds vertex and index buffers to `rpass`.
    pub fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.positions.slice(..));
        rpass.set_vertex_buffer(1, self.colors.slice(..));
        rpass.set_index_buffer(self.indices.slice(..), wgpu::IndexFormat::Uint32);
    }

    /// Destroys the three buffers.
    pub fn release(self) {
        self.positions.destroy();
        self.colors.destroy();
        self.indices.destroy();
        log::debug!("quad mesh released");
    }
}
