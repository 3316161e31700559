//! GPU copies of every attached composite.

use rustc_hash::FxHashMap;
use terra_mesh::{CompositeKey, CompositeMesh, RenderAttachment};

use crate::gpu_composite::GpuCompositeMesh;

/// Render-side attachment target: keeps one [`GpuCompositeMesh`] per
/// composite key and draws them all.
pub struct GpuTerrain {
    device: wgpu::Device,
    queue: wgpu::Queue,
    meshes: FxHashMap<CompositeKey, GpuCompositeMesh>,
}

impl GpuTerrain {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            meshes: FxHashMap::default(),
        }
    }

    pub fn get(&self, key: CompositeKey) -> Option<&GpuCompositeMesh> {
        self.meshes.get(&key)
    }

    /// Number of non-empty composites resident on the GPU.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn total_gpu_bytes(&self) -> u64 {
        self.meshes.values().map(GpuCompositeMesh::total_gpu_bytes).sum()
    }

    /// Bind and draw every resident composite. The terrain pipeline and its
    /// camera bind group must already be set on `render_pass`.
    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        for mesh in self.meshes.values() {
            mesh.bind(render_pass);
            mesh.draw(render_pass);
        }
    }
}

impl RenderAttachment for GpuTerrain {
    fn attach(&mut self, mesh: &CompositeMesh) {
        let key = mesh.key();
        if mesh.is_empty() {
            if self.meshes.remove(&key).is_some() {
                log::debug!("Released GPU buffers for {key}");
            }
            return;
        }
        match self.meshes.get_mut(&key) {
            Some(gpu) => {
                if !gpu.reupload(&self.device, &self.queue, mesh) {
                    log::debug!("Grew GPU buffers for {key} to {} bytes", gpu.total_gpu_bytes());
                }
            }
            None => {
                let gpu = GpuCompositeMesh::upload(&self.device, mesh);
                log::debug!("Uploaded {key}: {} vertices", gpu.vertex_count);
                self.meshes.insert(key, gpu);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_device;
    use glam::Vec3;
    use terra_mesh::{RegionSlot, build_tile_mesh};
    use terra_tiles::{SeamMask, TileCoord, TileStore};

    fn composite(key: CompositeKey, level: Option<u8>) -> CompositeMesh {
        let mut store = TileStore::new(Box::new(|x: f32, _: f32| x * 0.1), 4.0, 4);
        let coord = TileCoord::new(0, 0);
        store.load(coord);
        let tile = build_tile_mesh(store.get(coord).unwrap(), Vec3::ZERO, 4.0, 4, level, SeamMask::NONE);
        let mut composite = CompositeMesh::new(key);
        composite.combine([&tile]);
        composite
    }

    #[test]
    fn test_attach_uploads_and_replaces() {
        let Some((device, queue)) = test_device() else {
            return;
        };
        let mut terrain = GpuTerrain::new(device, queue);
        let key = CompositeKey::new(1, RegionSlot::Left);

        terrain.attach(&composite(key, Some(0)));
        assert_eq!(terrain.len(), 1);
        assert_eq!(terrain.get(key).unwrap().vertex_count, 25);

        terrain.attach(&composite(key, Some(1)));
        assert_eq!(terrain.len(), 1);
        assert_eq!(terrain.get(key).unwrap().vertex_count, 9);
    }

    #[test]
    fn test_empty_composite_releases_buffers() {
        let Some((device, queue)) = test_device() else {
            return;
        };
        let mut terrain = GpuTerrain::new(device, queue);
        let key = CompositeKey::new(0, RegionSlot::Center);
        terrain.attach(&composite(key, Some(0)));
        terrain.attach(&composite(key, None));
        assert!(terrain.is_empty());
        assert_eq!(terrain.total_gpu_bytes(), 0);
    }
}
