//! Bullet spread — случайное направление внутри конуса вокруг aim direction
//!
//! Распределение равномерное по телесному углу:
//! - cos θ ~ U[cos(half_angle), 1]
//! - φ ~ U[0, 2π)
//!
//! RNG детерминистичный (ChaCha8, seed): одинаковый seed → одинаковые выстрелы.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Sampler направления выстрела (один на оружие)
#[derive(Debug, Clone)]
pub struct SpreadSampler {
    rng: ChaCha8Rng,
}

impl SpreadSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Направление внутри конуса half-angle = `spread_degrees`
    ///
    /// `spread_degrees <= 0` → возвращаем `aim` без изменений (и RNG не трогаем).
    pub fn sample_direction(&mut self, aim: Vec3, spread_degrees: f32) -> Vec3 {
        if !(spread_degrees > 0.0) {
            return aim;
        }

        let axis = aim.normalize_or_zero();
        if axis == Vec3::ZERO {
            return aim;
        }

        let half_angle = spread_degrees.to_radians().min(std::f32::consts::PI);
        let cos_max = half_angle.cos();

        let cos_theta = 1.0 - self.rng.gen::<f32>() * (1.0 - cos_max);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let phi = self.rng.gen::<f32>() * std::f32::consts::TAU;

        let (u, v) = axis.any_orthonormal_pair();
        let offset = (u * phi.cos() + v * phi.sin()) * sin_theta;

        (axis * cos_theta + offset).normalize()
    }
}
