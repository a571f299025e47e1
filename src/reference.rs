//! CPU evaluation of the gradient kernel.
//!
//! This mirrors `gradient.wgsl` step for step and is used to check GPU output, and to exercise
//! the gradient math on machines without a GPU.

use crate::{
    bitmap::{Bitmap, BYTES_PER_PIXEL},
    gradient::{self, GradientStop, RenderOptions, RenderParameters},
    math::{ease, lerp, turns, vec2, Vec4f},
};

/// Color at fraction `t` (in `0.0..1.0`) of the sweep, in straight alpha.
///
/// `stops` must not be empty.
pub(crate) fn sample(stops: &[GradientStop], t: f32) -> [f32; 4] {
    let mut lower: Option<usize> = None;
    let mut upper: Option<usize> = None;
    let (mut first, mut last) = (0, 0);
    for (i, stop) in stops.iter().enumerate() {
        let f = stop.fraction;
        if f <= t && lower.map_or(true, |l| f >= stops[l].fraction) {
            lower = Some(i);
        }
        if f > t && upper.map_or(true, |u| f < stops[u].fraction) {
            upper = Some(i);
        }
        if f < stops[first].fraction {
            first = i;
        }
        if f >= stops[last].fraction {
            last = i;
        }
    }

    // Wrap around the seam.
    let (lower, lower_frac) = match lower {
        Some(l) => (l, stops[l].fraction),
        None => (last, stops[last].fraction - 1.0),
    };
    let (upper, upper_frac) = match upper {
        Some(u) => (u, stops[u].fraction),
        None => (first, stops[first].fraction + 1.0),
    };

    let span = upper_frac - lower_frac;
    let u = if span > 0.0 {
        ((t - lower_frac) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let u = ease(stops[lower].bias, u);
    let from = Vec4f::from(stops[lower].color);
    let to = Vec4f::from(stops[upper].color);
    lerp(from..=to, u).into()
}

/// Computes the premultiplied RGBA8 value the kernel writes for pixel `(x, y)`.
pub(crate) fn shade(params: &RenderParameters, stops: &[GradientStop], x: u32, y: u32) -> [u8; 4] {
    let mut d = vec2(x as f32 + 0.5, y as f32 + 0.5) - params.center;
    if params.is_flipped != 0 {
        d = vec2(d.x(), -d.y());
    }

    let r = d.length();
    if r < params.inner_radius || (params.outer_radius > 0.0 && r > params.outer_radius) {
        return [0; 4];
    }

    let mut angle = if r > 0.0 { d.y().atan2(d.x()) } else { 0.0 };
    if params.is_clockwise == 0 {
        angle = -angle;
    }
    let t = turns(angle - params.initial_angle);

    let [r, g, b, mut a] = sample(stops, t);
    if params.is_opaque != 0 {
        a = 1.0;
    }
    [r * a, g * a, b * a, a].map(unorm8)
}

/// Renders the same image as [`render_bitmap`](crate::render_bitmap), on the CPU.
pub fn render_reference(
    size: u32,
    stops: &[GradientStop],
    options: &RenderOptions,
) -> anyhow::Result<Bitmap> {
    gradient::validate(size, stops)?;
    let params = RenderParameters::new(size, stops.len(), options);

    let mut data = Vec::with_capacity(size as usize * size as usize * BYTES_PER_PIXEL as usize);
    for y in 0..size {
        for x in 0..size {
            data.extend_from_slice(&shade(&params, stops, x, y));
        }
    }
    Ok(Bitmap::from_raw(size, size, data))
}

/// Float to `unorm8`, rounding like a GPU storage write does.
fn unorm8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
