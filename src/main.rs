mod app;
mod assets;
mod catalog;
mod compose;
mod config;
mod draw;
mod hit;
mod input;
mod logging;
mod orbit;
mod raster;
mod sim;
mod stars;
mod term;
mod view;

use anyhow::Result;

fn main() -> Result<()> {
    app::run()
}
