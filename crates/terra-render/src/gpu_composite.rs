//! GPU-resident composite mesh: vertex and index buffers for one region.

use terra_mesh::{CompositeMesh, TerrainVertex};
use wgpu::util::DeviceExt;

/// A composite uploaded to the GPU.
pub struct GpuCompositeMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub vertex_count: u32,
    vertex_buffer_size: u64,
    index_buffer_size: u64,
}

impl GpuCompositeMesh {
    /// Upload `mesh` into freshly created buffers.
    pub fn upload(device: &wgpu::Device, mesh: &CompositeMesh) -> Self {
        let vertices = mesh.interleaved();
        let vertex_bytes: &[u8] = bytemuck::cast_slice(&vertices);
        let index_bytes: &[u8] = bytemuck::cast_slice(&mesh.indices);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("terrain_composite_vertices"),
            contents: vertex_bytes,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("terrain_composite_indices"),
            contents: index_bytes,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count() as u32,
            vertex_count: vertices.len() as u32,
            vertex_buffer_size: vertex_bytes.len() as u64,
            index_buffer_size: index_bytes.len() as u64,
        }
    }

    /// Write `mesh` into the existing buffers when it fits, otherwise
    /// recreate them. Returns `true` if the buffers were reused.
    pub fn reupload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, mesh: &CompositeMesh) -> bool {
        let vertices = mesh.interleaved();
        let vertex_bytes: &[u8] = bytemuck::cast_slice(&vertices);
        let index_bytes: &[u8] = bytemuck::cast_slice(&mesh.indices);

        if vertex_bytes.len() as u64 <= self.vertex_buffer_size
            && index_bytes.len() as u64 <= self.index_buffer_size
        {
            queue.write_buffer(&self.vertex_buffer, 0, vertex_bytes);
            queue.write_buffer(&self.index_buffer, 0, index_bytes);
            self.vertex_count = vertices.len() as u32;
            self.index_count = mesh.index_count() as u32;
            true
        } else {
            *self = Self::upload(device, mesh);
            false
        }
    }

    /// Bytes held by both buffers, including unused capacity after a reuse.
    pub fn total_gpu_bytes(&self) -> u64 {
        self.vertex_buffer_size + self.index_buffer_size
    }

    pub fn bind<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        let vertex_bytes = u64::from(self.vertex_count) * size_of::<TerrainVertex>() as u64;
        let index_bytes = u64::from(self.index_count) * size_of::<u32>() as u64;
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..vertex_bytes));
        render_pass.set_index_buffer(self.index_buffer.slice(..index_bytes), wgpu::IndexFormat::Uint32);
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_device;
    use glam::{Vec2, Vec3};
    use terra_mesh::{CompositeKey, RegionSlot, TileMesh};

    fn strip(quads: usize) -> CompositeMesh {
        let mut tile = TileMesh::new();
        for i in 0..=quads {
            for z in 0..2 {
                tile.positions.push(Vec3::new(i as f32, 0.0, z as f32));
                tile.normals.push(Vec3::Y);
                tile.uvs.push(Vec2::new(i as f32, z as f32));
            }
        }
        for i in 0..quads as u32 {
            let v = i * 2;
            tile.indices.extend_from_slice(&[v, v + 1, v + 2, v + 2, v + 1, v + 3]);
        }
        let mut composite = CompositeMesh::new(CompositeKey::new(0, RegionSlot::Center));
        composite.combine([&tile]);
        composite
    }

    #[test]
    fn test_upload_sizes_match_data() {
        let Some((device, _queue)) = test_device() else {
            return;
        };
        let gpu = GpuCompositeMesh::upload(&device, &strip(3));
        assert_eq!(gpu.vertex_count, 8);
        assert_eq!(gpu.index_count, 18);
        assert_eq!(gpu.total_gpu_bytes(), 8 * 32 + 18 * 4);
    }

    #[test]
    fn test_reupload_reuses_when_smaller() {
        let Some((device, queue)) = test_device() else {
            return;
        };
        let mut gpu = GpuCompositeMesh::upload(&device, &strip(6));
        assert!(gpu.reupload(&device, &queue, &strip(2)));
        assert_eq!(gpu.vertex_count, 6);
        assert_eq!(gpu.index_count, 12);
        assert_eq!(gpu.total_gpu_bytes(), 14 * 32 + 36 * 4);
    }

    #[test]
    fn test_reupload_grows_when_larger() {
        let Some((device, queue)) = test_device() else {
            return;
        };
        let mut gpu = GpuCompositeMesh::upload(&device, &strip(1));
        assert!(!gpu.reupload(&device, &queue, &strip(4)));
        assert_eq!(gpu.vertex_count, 10);
        assert_eq!(gpu.total_gpu_bytes(), 10 * 32 + 24 * 4);
    }
}
