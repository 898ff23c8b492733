use crate::draw::Size;
use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path};

/// Catalog distance that maps onto the largest orbit that fits the screen.
pub(crate) const ORBIT_REFERENCE: f32 = 850.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct BodyId(pub(crate) usize);

/// One row of the catalog table, in catalog units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct BodyEntry {
    pub(crate) name: String,
    pub(crate) distance: f32,
    pub(crate) size: f32,
    /// degrees per frame
    pub(crate) speed: f64,
    pub(crate) image: String,
    pub(crate) diameter_km: u32,
    pub(crate) satellites: u32,
    /// width / height of every rendering of the body
    #[serde(default = "unit_aspect")]
    pub(crate) aspect: f32,
}

fn unit_aspect() -> f32 {
    1.0
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Body {
    pub(crate) name: String,
    pub(crate) orbit_radius: f32,
    pub(crate) base_size: f32,
    pub(crate) angular_speed: f64,
    pub(crate) diameter_km: u32,
    pub(crate) satellite_count: u32,
    pub(crate) image: String,
    pub(crate) aspect: f32,
}

impl Body {
    /// On-screen box for a rendering of the given height.
    pub(crate) fn draw_size(&self, height: f32) -> Size {
        Size { w: height * self.aspect, h: height }
    }
}

/// Immutable, ordered set of bodies. Orbit radii strictly increase with index.
#[derive(Clone, Debug)]
pub(crate) struct Registry {
    bodies: Vec<Body>,
}

impl Registry {
    pub(crate) fn from_entries(entries: &[BodyEntry], max_orbit: i32) -> Result<Self> {
        ensure!(!entries.is_empty(), "body catalog is empty");
        let scale = max_orbit as f32 / ORBIT_REFERENCE;

        let mut seen = HashSet::new();
        let mut bodies: Vec<Body> = Vec::with_capacity(entries.len());
        for e in entries {
            ensure!(!e.name.trim().is_empty(), "body with empty name in catalog");
            ensure!(seen.insert(e.name.clone()), "duplicate body name '{}'", e.name);
            ensure!(
                e.distance.is_finite() && e.distance > 0.0,
                "body '{}': distance must be positive",
                e.name
            );
            ensure!(e.size.is_finite() && e.size > 0.0, "body '{}': size must be positive", e.name);
            ensure!(e.speed.is_finite(), "body '{}': speed must be finite", e.name);
            ensure!(
                e.aspect.is_finite() && e.aspect > 0.0,
                "body '{}': aspect must be positive",
                e.name
            );

            let orbit_radius = (e.distance * scale).floor();
            if let Some(prev) = bodies.last() {
                ensure!(
                    orbit_radius > prev.orbit_radius,
                    "body '{}' (orbit {orbit_radius}px) must orbit outside '{}' ({}px)",
                    e.name,
                    prev.name,
                    prev.orbit_radius
                );
            }

            bodies.push(Body {
                name: e.name.clone(),
                orbit_radius,
                base_size: e.size,
                angular_speed: e.speed,
                diameter_km: e.diameter_km,
                satellite_count: e.satellites,
                image: e.image.clone(),
                aspect: e.aspect,
            });
        }
        Ok(Self { bodies })
    }

    pub(crate) fn builtin(max_orbit: i32) -> Result<Self> {
        Self::from_entries(&default_entries(), max_orbit)
    }

    pub(crate) fn load(path: &Path, max_orbit: i32) -> Result<Self> {
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading body catalog {}", path.display()))?;
        let entries: Vec<BodyEntry> = serde_json::from_str(&s)
            .with_context(|| format!("parsing body catalog {}", path.display()))?;
        Self::from_entries(&entries, max_orbit)
            .with_context(|| format!("invalid body catalog {}", path.display()))
    }

    pub(crate) fn len(&self) -> usize {
        self.bodies.len()
    }

    pub(crate) fn get(&self, id: BodyId) -> &Body {
        &self.bodies[id.0]
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies.iter().enumerate().map(|(i, b)| (BodyId(i), b))
    }

    #[cfg(test)]
    pub(crate) fn find(&self, name: &str) -> Option<BodyId> {
        self.bodies.iter().position(|b| b.name == name).map(BodyId)
    }
}

/// Largest orbit radius (px) that fits beside the sidebar.
pub(crate) fn max_orbit_radius(width: i32, height: i32, sidebar_width: i32) -> i32 {
    (width - sidebar_width).min(height) / 2 - 40
}

fn entry(
    name: &str,
    distance: f32,
    size: f32,
    speed: f64,
    diameter_km: u32,
    satellites: u32,
    aspect: f32,
) -> BodyEntry {
    BodyEntry {
        name: name.to_string(),
        distance,
        size,
        speed,
        image: format!("{name}.png"),
        diameter_km,
        satellites,
        aspect,
    }
}

pub(crate) fn default_entries() -> Vec<BodyEntry> {
    vec![
        entry("Mercury", 120.0, 10.0, 2.0, 4879, 0, 1.0),
        entry("Venus", 200.0, 20.0, 1.5, 12104, 0, 1.0),
        entry("Vulcan", 280.0, 20.0, 1.3, 5000, 0, 1.0),
        entry("Earth", 360.0, 20.0, 1.0, 12742, 1, 1.0),
        entry("Mars", 450.0, 10.0, 0.8, 6779, 2, 1.0),
        entry("Jupiter", 550.0, 60.0, 0.5, 139820, 79, 1.0),
        // rings: drawn twice as wide as tall
        entry("Saturn", 670.0, 50.0, 0.3, 116460, 82, 2.0),
        entry("Uranus", 780.0, 40.0, 0.2, 50724, 27, 1.0),
        entry("Neptune", 900.0, 40.0, 0.1, 49244, 14, 1.0),
    ]
}
