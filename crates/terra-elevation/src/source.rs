//! The elevation capability consumed by the tile store.

/// A deterministic height field over world-space `(x, z)`.
///
/// Implementations are configured once with [`init`](Self::init) and then
/// queried from the streaming worker thread, hence `Send + Sync`.
pub trait ElevationSource: Send + Sync {
    /// Configure the generator. Called once before any [`height`](Self::height) query.
    fn init(&mut self, seed: u32, world_size: f32);

    /// Elevation at world coordinates `(x, z)`. Must be a pure function of its
    /// inputs; it is called at arbitrary non-integer offsets.
    fn height(&self, x: f32, z: f32) -> f32;
}

/// Plain closures are height fields with nothing to configure.
impl<F> ElevationSource for F
where
    F: Fn(f32, f32) -> f32 + Send + Sync,
{
    fn init(&mut self, _seed: u32, _world_size: f32) {}

    fn height(&self, x: f32, z: f32) -> f32 {
        self(x, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_an_elevation_source() {
        let mut source: Box<dyn ElevationSource> = Box::new(|x: f32, z: f32| x * 2.0 + z);
        source.init(7, 100.0);
        assert_eq!(source.height(1.0, 3.0), 5.0);
        assert_eq!(source.height(0.5, 0.25), 1.25);
    }
}
