use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Star {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) radius: f32,
}

impl Star {
    /// Phase offset, derived from the x coordinate.
    pub(crate) fn phase(&self) -> f64 {
        self.x as f64 / 100.0
    }

    /// Smooth oscillation in [0, 1].
    pub(crate) fn brightness(&self, t_ms: f64) -> f64 {
        (0.5 + 0.5 * (t_ms / 500.0 + self.phase()).sin()).clamp(0.0, 1.0)
    }

    pub(crate) fn alpha(&self, t_ms: f64) -> u8 {
        (self.brightness(t_ms) * 255.0).round() as u8
    }
}

/// Uniformly placed stars inside `0..=width` × `0..=height`.
pub(crate) fn generate<R: Rng>(count: usize, width: i32, height: i32, rng: &mut R) -> Vec<Star> {
    let mut stars = Vec::with_capacity(count);
    if width <= 0 || height <= 0 {
        return stars;
    }
    for _ in 0..count {
        stars.push(Star {
            x: rng.gen_range(0..=width),
            y: rng.gen_range(0..=height),
            radius: rng.gen_range(1..=2) as f32,
        });
    }
    stars
}
