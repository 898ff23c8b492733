use crate::assets::Assets;
use crate::catalog::{max_orbit_radius, Registry};
use crate::config::{load_settings, project_paths, save_settings_atomic, Cli, Settings};
use crate::hit::Layout;
use crate::input::collect_nonblocking;
use crate::logging;
use crate::raster::{Raster, RasterCanvas};
use crate::sim::{FrameInput, Simulation};
use crate::term::Terminal;
use crate::view::Action;
use anyhow::Context;
use clap::Parser;
use log::{debug, error, info};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

pub(crate) struct App {
    settings: Settings,
    sim: Simulation,
    assets: Assets,
    raster: Raster,
    term: Terminal,
    should_quit: bool,
    started: Instant,
    frames: u64,
}

impl App {
    fn init() -> anyhow::Result<Self> {
        let cli = Cli::parse();
        let paths = project_paths()?;
        let log_path = cli.log_file.clone().unwrap_or_else(|| paths.log_path.clone());
        logging::init(&log_path)?;

        let settings = load_settings(&paths.settings_path).merge(&cli);
        settings.validate()?;
        if cli.save_settings {
            save_settings_atomic(&paths.settings_path, &settings)?;
            info!("settings saved to {}", paths.settings_path.display());
        }

        let seed = settings.seed.unwrap_or_else(clock_seed);
        info!(
            "startup: {}x{} logical pixels, {} stars, seed {seed}",
            settings.width, settings.height, settings.star_count
        );

        let layout = Layout::new(settings.width, settings.height, settings.sidebar_width);
        let max_orbit = max_orbit_radius(settings.width, settings.height, settings.sidebar_width);
        let registry = match &settings.catalog_path {
            Some(p) => Registry::load(p, max_orbit)?,
            None => Registry::builtin(max_orbit)?,
        };
        info!("catalog: {} bodies, outermost orbit {max_orbit}px", registry.len());

        let assets = match &settings.asset_dir {
            Some(dir) => Assets::load_dir(dir, &registry, &layout)?,
            None => Assets::procedural(&registry, &layout, seed),
        };
        assets.verify(&registry).context("asset check failed")?;

        let sim = Simulation::new(registry, layout, settings.star_count, settings.expand_step, seed);

        // everything fallible above runs before the terminal is taken over
        let term = Terminal::begin()?;
        let raster = Raster::new(term.cols, term.rows, layout.width, layout.height);

        Ok(Self {
            settings,
            sim,
            assets,
            raster,
            term,
            should_quit: false,
            started: Instant::now(),
            frames: 0,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps.clamp(1, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
        let mut pointer_cell = None;
        let mut full_redraw = true;

        while !self.should_quit {
            let frame_start = Instant::now();

            if self.term.resize_if_needed()? {
                self.raster = Raster::new(
                    self.term.cols,
                    self.term.rows,
                    self.sim.layout.width,
                    self.sim.layout.height,
                );
                full_redraw = true;
            }

            let events = collect_nonblocking(frame_dt)?;
            if events.quit {
                self.should_quit = true;
                break;
            }
            if events.pointer.is_some() {
                pointer_cell = events.pointer;
            }

            let to_screen = |(c, r): (u16, u16)| self.raster.cell_to_screen(c, r);
            let input = FrameInput {
                pointer: pointer_cell.map(to_screen).unwrap_or((-1, -1)),
                click: events.click.map(to_screen),
                t_ms: self.started.elapsed().as_secs_f64() * 1000.0,
            };

            let (list, action) = self.sim.frame(&input);
            if action != Action::None {
                debug!("click at {:?} -> {action:?}", input.click);
            }

            self.raster.clear();
            list.replay(&mut RasterCanvas { raster: &mut self.raster, assets: &self.assets });
            self.raster.to_cells(&mut self.term.cur);
            self.term.present(full_redraw)?;
            full_redraw = false;
            self.frames += 1;

            spin_sleep(frame_dt, frame_start);
        }

        self.term.end()?;
        info!("shutdown after {} frames", self.frames);
        Ok(())
    }
}

pub(crate) fn run() -> anyhow::Result<()> {
    let mut app = App::init()?;
    let res = app.run();
    if let Err(e) = &res {
        error!("{e:#}");
    }
    // restores the terminal before main prints the error
    drop(app);
    res
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_nanos() as u64
}

fn spin_sleep(target: Duration, start: Instant) {
    let end = start + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        if end - t > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
