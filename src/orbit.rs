use crate::catalog::{BodyId, Registry};
use crate::draw::Point;
use rand::Rng;

/// Angular position of every body, in degrees within [0, 360).
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct OrbitState {
    angles: Vec<f64>,
}

impl OrbitState {
    pub(crate) fn new(angles: Vec<f64>) -> Self {
        Self { angles: angles.into_iter().map(|a| a.rem_euclid(360.0)).collect() }
    }

    /// Uniformly random starting angles, one per body.
    pub(crate) fn random<R: Rng>(registry: &Registry, rng: &mut R) -> Self {
        Self::new((0..registry.len()).map(|_| rng.gen_range(0.0..360.0)).collect())
    }

    pub(crate) fn angle(&self, id: BodyId) -> f64 {
        self.angles[id.0]
    }

    /// One frame of motion. Suspended unless `enabled`.
    pub(crate) fn advance(&mut self, registry: &Registry, enabled: bool) {
        if !enabled {
            return;
        }
        for ((_, body), angle) in registry.iter().zip(self.angles.iter_mut()) {
            *angle = (*angle + body.angular_speed).rem_euclid(360.0);
            // rem_euclid can round up to exactly 360 for tiny negatives
            if *angle >= 360.0 {
                *angle = 0.0;
            }
        }
    }
}

/// Screen position on a circle around `center`. Angle 0 points along +x and
/// increasing angles turn toward +y (downwards on screen).
pub(crate) fn project(center: Point, radius: f32, angle_deg: f64) -> Point {
    let a = angle_deg.to_radians();
    Point {
        x: center.x + (a.cos() as f32) * radius,
        y: center.y + (a.sin() as f32) * radius,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn registry() -> Registry {
        Registry::builtin(350).unwrap()
    }

    fn angle_diff(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    #[test]
    fn advance_accumulates_speed_modulo_360() {
        let reg = registry();
        let mut rng = StdRng::seed_from_u64(7);
        let start = OrbitState::random(&reg, &mut rng);
        let mut st = start.clone();
        for k in 1..=2000u32 {
            st.advance(&reg, true);
            if k % 250 == 0 {
                for (id, b) in reg.iter() {
                    let want = (start.angle(id) + k as f64 * b.angular_speed).rem_euclid(360.0);
                    assert!(angle_diff(st.angle(id), want) < 1e-6, "k={k} body={}", b.name);
                    assert!((0.0..360.0).contains(&st.angle(id)));
                }
            }
        }
    }

    #[test]
    fn disabled_advance_freezes_angles() {
        let reg = registry();
        let mut st = OrbitState::new(vec![10.0; reg.len()]);
        let before = st.clone();
        for _ in 0..10 {
            st.advance(&reg, false);
        }
        assert_eq!(st, before);
    }

    #[test]
    fn wraps_negative_speeds() {
        let reg = Registry::from_entries(
            &[crate::catalog::BodyEntry {
                name: "Retro".into(),
                distance: 100.0,
                size: 5.0,
                speed: -3.0,
                image: "r.png".into(),
                diameter_km: 1,
                satellites: 0,
                aspect: 1.0,
            }],
            350,
        )
        .unwrap();
        let mut st = OrbitState::new(vec![1.0]);
        st.advance(&reg, true);
        assert!((st.angle(BodyId(0)) - 358.0).abs() < 1e-9);
    }

    #[test]
    fn projection_lies_on_orbit_circle() {
        let c = Point::new(682.0, 390.0);
        for i in 0..720 {
            let a = i as f64 * 0.5;
            let p = project(c, 148.0, a);
            let r = ((p.x - c.x).powi(2) + (p.y - c.y).powi(2)).sqrt();
            assert!((r - 148.0).abs() < 1e-3, "angle {a}");
        }
    }

    #[test]
    fn projection_turns_toward_positive_y() {
        let c = Point::new(0.0, 0.0);
        let p0 = project(c, 10.0, 0.0);
        let p90 = project(c, 10.0, 90.0);
        assert!((p0.x - 10.0).abs() < 1e-4 && p0.y.abs() < 1e-4);
        assert!(p90.x.abs() < 1e-4 && (p90.y - 10.0).abs() < 1e-4);
    }
}
