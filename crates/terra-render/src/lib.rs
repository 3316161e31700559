//! GPU resources for streamed terrain: uploaded composites and the pipeline
//! that draws them.

pub mod gpu_composite;
pub mod pipeline;
pub mod terrain;

pub use gpu_composite::GpuCompositeMesh;
pub use pipeline::{CameraUniform, TERRAIN_SHADER_SOURCE, TerrainPipeline};
pub use terrain::GpuTerrain;

#[cfg(test)]
pub(crate) fn test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok()?;
        adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .ok()
    })
}
