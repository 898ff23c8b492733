//! Pre-scaled pictures for every `ImageKey`, either decoded from PNG files
//! or painted procedurally.

use crate::catalog::{BodyId, Registry};
use crate::draw::{ImageKey, Rgba};
use crate::hit::{Layout, ICON_SIZE, SUN_SIZE};
use anyhow::{bail, Context, Result};
use image::imageops::FilterType;
use std::{collections::HashMap, path::Path};

pub(crate) const SUN_FILE: &str = "Sun.png";
pub(crate) const BACKGROUND_FILE: &str = "background.png";

/// Painted sprites never need more detail than this; the canvas rescales.
const PROCEDURAL_MAX: u32 = 256;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Sprite {
    pub(crate) w: u32,
    pub(crate) h: u32,
    pub(crate) px: Vec<Rgba>,
}

impl Sprite {
    pub(crate) fn new(w: u32, h: u32) -> Self {
        Self { w, h, px: vec![Rgba::default(); (w as usize) * (h as usize)] }
    }

    pub(crate) fn get(&self, x: u32, y: u32) -> Rgba {
        self.px[(y as usize) * (self.w as usize) + (x as usize)]
    }

    fn set(&mut self, x: u32, y: u32, c: Rgba) {
        let i = (y as usize) * (self.w as usize) + (x as usize);
        self.px[i] = c;
    }

    fn from_image(img: &image::DynamicImage, w: u32, h: u32) -> Self {
        let scaled = img.resize_exact(w.max(1), h.max(1), FilterType::Triangle).to_rgba8();
        Self {
            w: scaled.width(),
            h: scaled.height(),
            px: scaled.pixels().map(|p| Rgba { r: p[0], g: p[1], b: p[2], a: p[3] }).collect(),
        }
    }
}

#[derive(Default)]
pub(crate) struct Assets {
    sprites: HashMap<ImageKey, Sprite>,
}

impl Assets {
    pub(crate) fn get(&self, key: ImageKey) -> Option<&Sprite> {
        self.sprites.get(&key)
    }

    pub(crate) fn insert(&mut self, key: ImageKey, sprite: Sprite) {
        self.sprites.insert(key, sprite);
    }

    pub(crate) fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Every key the compositor can ask for with this catalog.
    pub(crate) fn required_keys(registry: &Registry) -> Vec<ImageKey> {
        let mut keys = vec![ImageKey::Background, ImageKey::Sun];
        for (id, _) in registry.iter() {
            keys.extend([ImageKey::Orbit(id), ImageKey::Icon(id), ImageKey::Expanded(id)]);
        }
        keys
    }

    /// Fails on the first picture the catalog needs but the set lacks.
    pub(crate) fn verify(&self, registry: &Registry) -> Result<()> {
        for key in Self::required_keys(registry) {
            if self.sprites.contains_key(&key) {
                continue;
            }
            match key {
                ImageKey::Orbit(id) | ImageKey::Icon(id) | ImageKey::Expanded(id) => {
                    let b = registry.get(id);
                    bail!("missing image {key:?} for body '{}' ({})", b.name, b.image);
                }
                _ => bail!("missing image {key:?}"),
            }
        }
        Ok(())
    }

    /// Decodes PNGs from `dir` and pre-scales them to their three sizes.
    pub(crate) fn load_dir(dir: &Path, registry: &Registry, layout: &Layout) -> Result<Self> {
        let mut assets = Self::default();
        let open = |file: &str| -> Result<image::DynamicImage> {
            let path = dir.join(file);
            image::open(&path).with_context(|| format!("loading image {}", path.display()))
        };

        let bg = open(BACKGROUND_FILE)?;
        assets.insert(
            ImageKey::Background,
            Sprite::from_image(&bg, layout.width as u32, layout.height as u32),
        );
        let sun = open(SUN_FILE)?;
        assets.insert(ImageKey::Sun, Sprite::from_image(&sun, SUN_SIZE as u32, SUN_SIZE as u32));

        let expanded = layout.expanded_size() as u32;
        for (id, b) in registry.iter() {
            let img = open(&b.image).with_context(|| format!("image for body '{}'", b.name))?;
            let orbit = b.base_size.round() as u32;
            assets.insert(ImageKey::Orbit(id), Sprite::from_image(&img, orbit, orbit));
            assets.insert(ImageKey::Icon(id), Sprite::from_image(&img, ICON_SIZE as u32, ICON_SIZE as u32));
            assets.insert(ImageKey::Expanded(id), Sprite::from_image(&img, expanded, expanded));
        }
        log::info!("assets: loaded {} sprites from {}", assets.len(), dir.display());
        Ok(assets)
    }

    /// Paints every sprite; used when no asset directory is given.
    pub(crate) fn procedural(registry: &Registry, layout: &Layout, seed: u64) -> Self {
        let mut assets = Self::default();
        let seed = (seed ^ (seed >> 32)) as u32;

        let bw = (layout.width as u32 / 4).max(1);
        let bh = (layout.height as u32 / 4).max(1);
        assets.insert(ImageKey::Background, paint_background(bw, bh, seed));
        assets.insert(ImageKey::Sun, paint_sun(SUN_SIZE as u32));

        let expanded = (layout.expanded_size() as u32).min(PROCEDURAL_MAX);
        for (id, b) in registry.iter() {
            let style = PlanetStyle::for_body(id, &b.name, b.base_size, b.aspect, seed);
            let orbit = (b.base_size.round() as u32).max(2);
            assets.insert(ImageKey::Orbit(id), paint_planet(orbit, &style));
            assets.insert(ImageKey::Icon(id), paint_planet(ICON_SIZE as u32, &style));
            assets.insert(ImageKey::Expanded(id), paint_planet(expanded, &style));
        }
        log::info!("assets: painted {} procedural sprites", assets.len());
        assets
    }
}

// -------------------- Procedural noise (value noise + fbm) --------------------
fn hash_u32(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

fn hash2(ix: i32, iy: i32, seed: u32) -> u32 {
    let mut h = seed ^ 0x9e37_79b9;
    h ^= (ix as u32).wrapping_mul(0x85eb_ca6b);
    h = hash_u32(h);
    h ^= (iy as u32).wrapping_mul(0xc2b2_ae35);
    hash_u32(h)
}

fn hash_str(s: &str) -> u32 {
    s.bytes().fold(0x811c_9dc5u32, |h, b| (h ^ b as u32).wrapping_mul(0x0100_0193))
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn value_noise_2d(x: f32, y: f32, seed: u32) -> f32 {
    let ix = x.floor() as i32;
    let iy = y.floor() as i32;
    let sx = smoothstep(x - ix as f32);
    let sy = smoothstep(y - iy as f32);
    let v = |dx: i32, dy: i32| hash2(ix + dx, iy + dy, seed) as f32 / u32::MAX as f32;
    lerp(lerp(v(0, 0), v(1, 0), sx), lerp(v(0, 1), v(1, 1), sx), sy)
}

fn fbm_2d(x: f32, y: f32, seed: u32, octaves: usize) -> f32 {
    let mut amp = 0.55;
    let mut freq = 1.0;
    let mut sum = 0.0;
    let mut norm = 0.0;
    for o in 0..octaves {
        let s = seed.wrapping_add((o as u32).wrapping_mul(0x9e37_79b9));
        sum += value_noise_2d(x * freq, y * freq, s) * amp;
        norm += amp;
        amp *= 0.52;
        freq *= 2.03;
    }
    (sum / norm).clamp(0.0, 1.0)
}

// -------------------- Painting --------------------
#[derive(Clone, Copy, Debug)]
struct PlanetStyle {
    base: [f32; 3],
    accent: [f32; 3],
    seed: u32,
    bands: f32,
    ring: bool,
}

impl PlanetStyle {
    fn for_body(id: BodyId, name: &str, size: f32, aspect: f32, seed: u32) -> Self {
        let h = hash_u32(hash_str(name) ^ seed);
        let hue = (h % 360) as f32;
        Self {
            base: hsv(hue, 0.45, 0.85),
            accent: hsv((hue + 35.0) % 360.0, 0.55, 0.55),
            seed: h ^ id.0 as u32,
            // gas giants get stripes
            bands: if size >= 40.0 { 9.0 } else { 0.0 },
            ring: aspect > 1.0,
        }
    }
}

fn hsv(h: f32, s: f32, v: f32) -> [f32; 3] {
    let c = v * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    [r + m, g + m, b + m]
}

fn to_rgba(c: [f32; 3], a: f32) -> Rgba {
    let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba { r: q(c[0]), g: q(c[1]), b: q(c[2]), a: q(a) }
}

fn paint_planet(size: u32, style: &PlanetStyle) -> Sprite {
    let mut sp = Sprite::new(size, size);
    let half = size as f32 / 2.0;
    // ringed bodies keep room for the ring around the disc
    let disc = if style.ring { 0.55 } else { 1.0 };
    let aa = 1.5 / half;

    for y in 0..size {
        for x in 0..size {
            let dx = (x as f32 + 0.5 - half) / half;
            let dy = (y as f32 + 0.5 - half) / half;
            let (px, py) = (dx / disc, dy / disc);
            let r2 = px * px + py * py;

            let ring_d = (dx * dx + (dy * 3.5) * (dy * 3.5)).sqrt();
            let on_ring = style.ring && (0.68..0.98).contains(&ring_d) && (dy > 0.0 || r2 > 1.0);

            if on_ring {
                let t = ((ring_d - 0.68) / 0.30 * 6.0).sin() * 0.5 + 0.5;
                let c = [
                    lerp(style.accent[0], 0.9, t),
                    lerp(style.accent[1], 0.85, t),
                    lerp(style.accent[2], 0.7, t),
                ];
                sp.set(x, y, to_rgba(c, 0.85));
                continue;
            }
            if r2 > 1.0 {
                continue;
            }

            let nz = (1.0 - r2).sqrt();
            let light = (nz * 0.75 + (-px * 0.35 - py * 0.25)).clamp(0.12, 1.0);
            let n = fbm_2d(px * 3.0 + 7.0, py * 3.0 + 3.0, style.seed, 4);
            let band = if style.bands > 0.0 {
                ((py * style.bands + n * 2.0).sin() * 0.5 + 0.5) * 0.6
            } else {
                0.0
            };
            let t = (n * 0.8 + band).clamp(0.0, 1.0);
            let c = [
                lerp(style.base[0], style.accent[0], t) * light,
                lerp(style.base[1], style.accent[1], t) * light,
                lerp(style.base[2], style.accent[2], t) * light,
            ];
            let edge = ((1.0 - r2.sqrt()) / aa).clamp(0.0, 1.0);
            sp.set(x, y, to_rgba(c, edge));
        }
    }
    sp
}

fn paint_sun(size: u32) -> Sprite {
    let mut sp = Sprite::new(size, size);
    let half = size as f32 / 2.0;
    for y in 0..size {
        for x in 0..size {
            let dx = (x as f32 + 0.5 - half) / half;
            let dy = (y as f32 + 0.5 - half) / half;
            let d = (dx * dx + dy * dy).sqrt();
            if d > 1.0 {
                continue;
            }
            let core = (1.0 - d / 0.7).clamp(0.0, 1.0);
            let c = [1.0, lerp(0.62, 0.95, core), lerp(0.15, 0.6, core)];
            let a = if d < 0.7 { 1.0 } else { ((1.0 - d) / 0.3).powf(1.5) };
            sp.set(x, y, to_rgba(c, a));
        }
    }
    sp
}

fn paint_background(w: u32, h: u32, seed: u32) -> Sprite {
    let mut sp = Sprite::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let u = x as f32 / w as f32;
            let v = y as f32 / h as f32;
            let n = fbm_2d(u * 4.0, v * 2.5, seed, 3);
            let neb = smoothstep(((n - 0.45) * 2.2).clamp(0.0, 1.0));
            let c = [
                0.01 + 0.10 * neb * (1.0 - v),
                0.01 + 0.03 * neb,
                0.04 + 0.12 * neb * v + 0.03 * (1.0 - v),
            ];
            sp.set(x, y, to_rgba(c, 1.0));
        }
    }
    sp
}
