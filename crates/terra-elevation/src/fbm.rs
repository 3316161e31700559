//! Layered simplex noise height field.
//!
//! Coordinates are normalised by the world size so the terrain keeps its shape
//! when the world is scaled. Each octave is remapped to `[0, 1]` before
//! weighting, and the sum is shaped by a power curve that flattens valleys and
//! sharpens peaks.

use noise::{NoiseFn, Simplex};
use terra_config::HeightmapConfig;

use crate::source::ElevationSource;

/// Configuration for the layered noise.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightmapParams {
    /// Number of noise octaves to composite.
    pub octaves: u32,
    /// Frequency of the first octave, in cycles per world size.
    pub base_frequency: f64,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// Weight multiplier between successive octaves.
    pub persistence: f64,
    /// Power applied to the weighted sum.
    pub exponent: f64,
    /// Height scale in world units.
    pub amplitude: f64,
}

impl Default for HeightmapParams {
    fn default() -> Self {
        Self::from(&HeightmapConfig::default())
    }
}

impl From<&HeightmapConfig> for HeightmapParams {
    fn from(config: &HeightmapConfig) -> Self {
        Self {
            octaves: config.octaves,
            base_frequency: config.base_frequency,
            lacunarity: config.lacunarity,
            persistence: config.persistence,
            exponent: config.exponent,
            amplitude: config.amplitude,
        }
    }
}

/// Fractal simplex height field implementing [`ElevationSource`].
pub struct FbmElevation {
    noise: Simplex,
    params: HeightmapParams,
    world_size: f64,
}

impl FbmElevation {
    /// Create a source with the given parameters. Call
    /// [`ElevationSource::init`] before sampling to set seed and world size.
    pub fn new(params: HeightmapParams) -> Self {
        Self {
            noise: Simplex::new(0),
            params,
            world_size: 1.0,
        }
    }

    /// Sum of all octave weights, i.e. the largest normalised value before shaping.
    fn weight_sum(&self) -> f64 {
        let mut sum = 0.0;
        let mut weight = 1.0;
        for _ in 0..self.params.octaves {
            sum += weight;
            weight *= self.params.persistence;
        }
        sum
    }

    /// Theoretical maximum height. Every sample lies in `[0, max_height()]`.
    pub fn max_height(&self) -> f64 {
        self.params.amplitude * self.weight_sum().powf(self.params.exponent)
    }

    /// Return a reference to the current parameters.
    pub fn params(&self) -> &HeightmapParams {
        &self.params
    }

    fn sample(&self, x: f64, z: f64) -> f64 {
        let nx = x / self.world_size;
        let nz = z / self.world_size;

        let mut total = 0.0;
        let mut frequency = self.params.base_frequency;
        let mut weight = 1.0;
        for _ in 0..self.params.octaves {
            let n = self.noise.get([nx * frequency, nz * frequency]);
            total += weight * ((n + 1.0) * 0.5).clamp(0.0, 1.0);

            frequency *= self.params.lacunarity;
            weight *= self.params.persistence;
        }

        self.params.amplitude * total.powf(self.params.exponent)
    }
}

impl Default for FbmElevation {
    fn default() -> Self {
        Self::new(HeightmapParams::default())
    }
}

impl ElevationSource for FbmElevation {
    fn init(&mut self, seed: u32, world_size: f32) {
        self.noise = Simplex::new(seed);
        self.world_size = f64::from(world_size);
    }

    fn height(&self, x: f32, z: f32) -> f32 {
        self.sample(f64::from(x), f64::from(z)) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u32, world_size: f32) -> FbmElevation {
        let mut source = FbmElevation::default();
        source.init(seed, world_size);
        source
    }

    #[test]
    fn test_determinism_same_seed_same_coord() {
        let a = seeded(42, 1024.0);
        let b = seeded(42, 1024.0);
        assert_eq!(a.height(100.25, 200.5), b.height(100.25, 200.5));
    }

    #[test]
    fn test_different_seeds_produce_different_heights() {
        let a = seeded(1, 1024.0);
        let b = seeded(999, 1024.0);
        let differs = (0..32).any(|i| {
            let p = i as f32 * 13.7;
            (a.height(p, p * 0.5) - b.height(p, p * 0.5)).abs() > 1e-4
        });
        assert!(differs, "different seeds should give a different field");
    }

    #[test]
    fn test_height_within_expected_range() {
        let source = seeded(3, 512.0);
        let max = source.max_height() as f32;
        for x in (0..64).map(|i| i as f32 * 8.0) {
            for z in (0..64).map(|i| i as f32 * 8.0) {
                let h = source.height(x, z);
                assert!(
                    (0.0..=max + 1e-3).contains(&h),
                    "height {h} outside [0, {max}] at ({x}, {z})"
                );
            }
        }
    }

    #[test]
    fn test_field_scales_with_world_size() {
        let small = seeded(11, 500.0);
        let large = seeded(11, 1000.0);
        let h_small = small.height(123.0, 321.0);
        let h_large = large.height(246.0, 642.0);
        assert!((h_small - h_large).abs() < 1e-3, "{h_small} vs {h_large}");
    }

    #[test]
    fn test_max_height_calculation() {
        let source = FbmElevation::new(HeightmapParams {
            octaves: 3,
            persistence: 0.5,
            exponent: 1.0,
            amplitude: 10.0,
            ..Default::default()
        });
        assert!((source.max_height() - 17.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_amplitude_returns_zero() {
        let mut source = FbmElevation::new(HeightmapParams {
            amplitude: 0.0,
            ..Default::default()
        });
        source.init(5, 100.0);
        assert_eq!(source.height(12.0, 34.0), 0.0);
    }

    #[test]
    fn test_params_from_config() {
        let config = HeightmapConfig {
            octaves: 5,
            amplitude: 42.0,
            ..Default::default()
        };
        let params = HeightmapParams::from(&config);
        assert_eq!(params.octaves, 5);
        assert_eq!(params.amplitude, 42.0);
        assert_eq!(params.exponent, 1.5);
    }
}
