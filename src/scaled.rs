use anyhow::bail;

use crate::{
    bitmap::Bitmap,
    context::GpuContext,
    gradient::{GradientStop, RenderOptions},
    renderer::render_bitmap,
};

/// A bitmap rendered for a display with `scale` device pixels per logical pixel.
#[derive(Debug, Clone)]
pub struct ScaledBitmap {
    pub bitmap: Bitmap,
    pub scale: f32,
}

impl ScaledBitmap {
    /// Size in logical (display-independent) units.
    pub fn logical_size(&self) -> (f32, f32) {
        (
            self.bitmap.width() as f32 / self.scale,
            self.bitmap.height() as f32 / self.scale,
        )
    }
}

/// Converts a logical size and ring radii into device pixels.
pub fn scale_request(
    size: f32,
    options: &RenderOptions,
    scale: f32,
) -> anyhow::Result<(u32, RenderOptions)> {
    if !(scale.is_finite() && scale > 0.0) {
        bail!("display scale must be a positive number (got {scale})");
    }
    let pixels = (size * scale).round();
    if !(pixels >= 1.0 && pixels <= u32::MAX as f32) {
        bail!("{size} at scale {scale} does not give a usable pixel size");
    }
    let options = RenderOptions {
        inner_radius: options.inner_radius * scale,
        outer_radius: options.outer_radius * scale,
        ..*options
    };
    Ok((pixels as u32, options))
}

/// Renders a gradient `size` logical units wide for a display with the given pixel density.
pub fn render_scaled(
    ctx: &GpuContext,
    size: f32,
    stops: &[GradientStop],
    options: &RenderOptions,
    scale: f32,
) -> anyhow::Result<ScaledBitmap> {
    let (pixels, options) = scale_request(size, options, scale)?;
    log::debug!("rendering {size} logical units at {scale}x ({pixels}px)");
    let bitmap = render_bitmap(ctx, pixels, stops, &options)?;
    Ok(ScaledBitmap { bitmap, scale })
}
