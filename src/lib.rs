//! Renders angular (conic) gradients with a GPU compute kernel and reads them back as RGBA8
//! bitmaps.
//!
//! ```no_run
//! use angular_gradient::{render_bitmap, GpuContext, GradientStop, RenderOptions};
//!
//! # fn main() -> anyhow::Result<()> {
//! let ctx = GpuContext::new()?;
//! let stops = [
//!     GradientStop::new([1.0, 0.0, 0.0, 1.0], 0.0),
//!     GradientStop::new([0.0, 0.0, 1.0, 1.0], 1.0),
//! ];
//! let bitmap = render_bitmap(&ctx, 256, &stops, &RenderOptions::default())?;
//! bitmap.write_png("gradient.png")?;
//! # Ok(())
//! # }
//! ```

mod bitmap;
mod context;
mod gradient;
mod kernel;
mod math;
mod readback;
mod reference;
mod renderer;
mod scaled;

pub use bitmap::{AlphaInfo, Bitmap, ByteOrder};
pub use context::GpuContext;
pub use gradient::{GradientStop, RenderOptions, RenderParameters};
pub use kernel::{ENTRY_POINT, SHADER_SOURCE, WORKGROUP_SIZE};
pub use readback::to_bitmap;
pub use reference::render_reference;
pub use renderer::{render, render_bitmap};
pub use scaled::{render_scaled, scale_request, ScaledBitmap};
