//! Scripted observer path for the headless demo.

use glam::Vec3;

/// Walks an observer around a circle centered on the world.
pub struct Walker {
    center: Vec3,
    radius: f32,
    angle: f32,
    speed: f32,
}

impl Walker {
    /// A walker circling at a quarter of `world_size` from the center, moving
    /// `speed` world units per second.
    pub fn new(world_size: f32, speed: f32) -> Self {
        let half = world_size * 0.5;
        Self {
            center: Vec3::new(half, 0.0, half),
            radius: world_size * 0.25,
            angle: 0.0,
            speed,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.center + Vec3::new(self.angle.cos(), 0.0, self.angle.sin()) * self.radius
    }

    /// Move along the path for `dt` seconds and return the new position.
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        if self.radius > 0.0 {
            self.angle = (self.angle + self.speed * dt / self.radius) % std::f32::consts::TAU;
        }
        self.position()
    }
}
