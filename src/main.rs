use std::env;

use angular_gradient::{render_bitmap, render_scaled, GpuContext};
use anyhow::bail;
use config::Config;

mod config;

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_module(env!("CARGO_CRATE_NAME"), log::LevelFilter::Debug)
        .parse_default_env()
        .init();

    let config = match &*env::args_os().skip(1).collect::<Vec<_>>() {
        [path] => Config::load(path)?,
        _ => {
            bail!("usage: {} <gradient.toml>", env!("CARGO_PKG_NAME"));
        }
    };

    let ctx = GpuContext::new()?;
    let stops = config.gradient();
    let bitmap = match config.scale {
        Some(scale) => render_scaled(&ctx, config.size, &stops, &config.options, scale)?.bitmap,
        None => render_bitmap(&ctx, config.size.round() as u32, &stops, &config.options)?,
    };

    bitmap.write_png(&config.output)?;
    log::info!(
        "wrote {}x{} gradient to `{}`",
        bitmap.width(),
        bitmap.height(),
        config.output.display(),
    );
    Ok(())
}
