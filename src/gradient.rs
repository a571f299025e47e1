//! Gradient description and the fixed-layout records shared with `gradient.wgsl`.

use std::mem;

use bytemuck::NoUninit;
use serde::Deserialize;

use crate::math::{vec2, Vec2f};

/// One control point of an angular gradient.
///
/// This is uploaded verbatim into the kernel's stop buffer, so the layout must match
/// `struct GradientStop` in `gradient.wgsl` (`vec4<f32>, f32, f32`, aligned to 16 bytes).
#[derive(Debug, Clone, Copy, PartialEq, NoUninit)]
#[repr(C)]
pub struct GradientStop {
    /// Straight (non-premultiplied) RGBA, each channel in range 0-1.
    pub color: [f32; 4],
    /// Position along the sweep, in range 0-1.
    pub fraction: f32,
    /// Easing bias towards the next stop. `0.5` interpolates linearly.
    pub bias: f32,
    _padding: [f32; 2],
}

const _: () = assert!(mem::size_of::<GradientStop>() == 32);

impl GradientStop {
    pub const DEFAULT_BIAS: f32 = 0.5;

    pub fn new(color: [f32; 4], fraction: f32) -> Self {
        Self::with_bias(color, fraction, Self::DEFAULT_BIAS)
    }

    pub fn with_bias(color: [f32; 4], fraction: f32, bias: f32) -> Self {
        Self {
            color,
            fraction,
            bias,
            _padding: [0.0; 2],
        }
    }
}

/// Caller-facing geometry and flags for a render.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Angle of the gradient seam, in radians.
    pub initial_angle: f32,
    pub inner_radius: f32,
    /// Outer edge of the ring, in pixels. Values `<= 0` leave the ring unbounded, so every
    /// pixel at or beyond `inner_radius` is painted.
    pub outer_radius: f32,
    /// Forces the alpha of every painted pixel to 1.
    pub is_opaque: bool,
    pub is_clockwise: bool,
    /// Mirrors the gradient vertically.
    pub is_flipped: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            initial_angle: 0.0,
            inner_radius: 0.0,
            outer_radius: 0.0,
            is_opaque: false,
            is_clockwise: true,
            is_flipped: false,
        }
    }
}

/// Kernel parameter block; must match `struct Params` in `gradient.wgsl`.
///
/// Flags are `u32` since `bool` is not host-shareable in WGSL.
#[derive(Debug, Clone, Copy, NoUninit)]
#[repr(C)]
pub struct RenderParameters {
    pub center: Vec2f,
    pub initial_angle: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub is_opaque: u32,
    pub is_clockwise: u32,
    pub is_flipped: u32,
    pub stop_count: i32,
    _padding: [u32; 3],
}

const _: () = assert!(mem::size_of::<RenderParameters>() == 48);

impl RenderParameters {
    /// Builds the parameter block for a `size`x`size` texture holding `stop_count` stops.
    pub fn new(size: u32, stop_count: usize, options: &RenderOptions) -> Self {
        let half = size as f32 / 2.0;
        Self {
            center: vec2(half, half),
            initial_angle: options.initial_angle,
            inner_radius: options.inner_radius,
            outer_radius: options.outer_radius,
            is_opaque: options.is_opaque.into(),
            is_clockwise: options.is_clockwise.into(),
            is_flipped: options.is_flipped.into(),
            stop_count: stop_count as i32,
            _padding: [0; 3],
        }
    }
}

/// Checks the inputs shared by the GPU and CPU renderers.
pub(crate) fn validate(size: u32, stops: &[GradientStop]) -> anyhow::Result<()> {
    if size == 0 {
        anyhow::bail!("gradient size must be at least 1 pixel");
    }
    if stops.is_empty() {
        anyhow::bail!("a gradient needs at least one stop");
    }
    if stops.len() > i32::MAX as usize {
        anyhow::bail!("too many gradient stops ({})", stops.len());
    }
    Ok(())
}
