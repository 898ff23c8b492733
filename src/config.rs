use anyhow::{ensure, Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::view::DEFAULT_EXPAND_STEP;

#[derive(Parser, Debug)]
#[command(name = "solarium", about = "Interactive solar system in the terminal")]
pub(crate) struct Cli {
    /// directory with Sun.png, background.png and one PNG per body
    #[arg(long)]
    pub(crate) assets: Option<PathBuf>,

    /// JSON body catalog replacing the built-in nine bodies
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,

    /// seed for star placement and starting angles (default: clock)
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// number of background stars
    #[arg(long)]
    pub(crate) stars: Option<usize>,

    /// frame rate cap
    #[arg(long)]
    pub(crate) fps: Option<u32>,

    /// logical screen width in pixels
    #[arg(long)]
    pub(crate) width: Option<i32>,

    /// logical screen height in pixels
    #[arg(long)]
    pub(crate) height: Option<i32>,

    /// log file (default: solarium.log in the data directory)
    #[arg(long)]
    pub(crate) log_file: Option<PathBuf>,

    /// write the merged settings back to settings.json
    #[arg(long, default_value_t = false)]
    pub(crate) save_settings: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) sidebar_width: i32,
    pub(crate) fps: u32,
    pub(crate) star_count: usize,
    pub(crate) seed: Option<u64>,
    pub(crate) expand_step: f32,
    pub(crate) asset_dir: Option<PathBuf>,
    pub(crate) catalog_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 1365,
            height: 780,
            sidebar_width: 200,
            fps: 60,
            star_count: 200,
            seed: None,
            expand_step: DEFAULT_EXPAND_STEP,
            asset_dir: None,
            catalog_path: None,
        }
    }
}

impl Settings {
    /// Command-line values win over the file.
    pub(crate) fn merge(mut self, cli: &Cli) -> Self {
        if let Some(p) = &cli.assets {
            self.asset_dir = Some(p.clone());
        }
        if let Some(p) = &cli.catalog {
            self.catalog_path = Some(p.clone());
        }
        self.seed = cli.seed.or(self.seed);
        self.star_count = cli.stars.unwrap_or(self.star_count);
        self.fps = cli.fps.unwrap_or(self.fps);
        self.width = cli.width.unwrap_or(self.width);
        self.height = cli.height.unwrap_or(self.height);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        ensure!(self.fps > 0, "fps must be positive");
        ensure!(self.sidebar_width > 0, "sidebar width must be positive");
        ensure!(
            self.width - self.sidebar_width >= 200 && self.height >= 200,
            "screen {}x{} leaves no room for orbits beside a {}px sidebar",
            self.width,
            self.height,
            self.sidebar_width
        );
        ensure!(
            self.expand_step > 0.0 && self.expand_step <= 1.0,
            "expand_step must be in (0, 1], got {}",
            self.expand_step
        );
        Ok(())
    }
}

pub(crate) struct Paths {
    pub(crate) settings_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "solarium", "Solarium")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir).ok();
    Ok(Paths {
        settings_path: dir.join("settings.json"),
        log_path: dir.join("solarium.log"),
    })
}

/// Missing or unreadable files fall back to defaults.
pub(crate) fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        match serde_json::from_str::<Settings>(&s) {
            Ok(v) => return v,
            Err(e) => log::warn!("ignoring {}: {e}", path.display()),
        }
    }
    Settings::default()
}

pub(crate) fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // rename does not replace on every platform
    if to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to)?;
    Ok(())
}
