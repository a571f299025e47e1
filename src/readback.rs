use std::sync::mpsc;

use anyhow::Context as _;
use wgpu::{
    BufferDescriptor, BufferUsages, CommandEncoderDescriptor, MapMode, PollType,
    TexelCopyBufferInfo, TexelCopyBufferLayout, Texture, TextureDimension,
    COPY_BYTES_PER_ROW_ALIGNMENT,
};

use crate::{
    bitmap::{Bitmap, BYTES_PER_PIXEL},
    context::GpuContext,
    kernel::OUTPUT_FORMAT,
};

/// Copies the contents of a gradient texture into a [`Bitmap`].
///
/// # Panics
///
/// Panics if `texture` is not a single-level 2D `Rgba8Unorm` texture created with `COPY_SRC`
/// usage, which is what [`render`](crate::render) produces.
pub fn to_bitmap(ctx: &GpuContext, texture: &Texture) -> anyhow::Result<Bitmap> {
    assert_eq!(texture.dimension(), TextureDimension::D2, "texture must be 2D");
    assert_eq!(texture.format(), OUTPUT_FORMAT, "unsupported texture format");
    assert_eq!(texture.mip_level_count(), 1, "texture must have one mip level");
    assert_eq!(texture.depth_or_array_layers(), 1, "texture must have one layer");

    let (width, height) = (texture.width(), texture.height());
    let row_bytes = width * BYTES_PER_PIXEL;
    // Buffer copies need rows aligned to 256 bytes; the padding is dropped below.
    let padded_row_bytes = row_bytes.next_multiple_of(COPY_BYTES_PER_ROW_ALIGNMENT);
    log::trace!("reading back {width}x{height} texture ({padded_row_bytes} bytes per padded row)");

    let device = ctx.device();
    let buffer = device.create_buffer(&BufferDescriptor {
        label: Some("gradient_readback"),
        size: u64::from(padded_row_bytes) * u64::from(height),
        usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut enc = device.create_command_encoder(&CommandEncoderDescriptor {
        label: Some("gradient_readback"),
    });
    enc.copy_texture_to_buffer(
        texture.as_image_copy(),
        TexelCopyBufferInfo {
            buffer: &buffer,
            layout: TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_row_bytes),
                rows_per_image: None,
            },
        },
        texture.size(),
    );
    ctx.queue().submit([enc.finish()]);

    let slice = buffer.slice(..);
    let (sender, receiver) = mpsc::channel();
    slice.map_async(MapMode::Read, move |res| drop(sender.send(res)));
    device.poll(PollType::Wait)?;
    receiver
        .recv()
        .context("readback buffer was dropped before it was mapped")?
        .context("failed to map readback buffer")?;

    let mapped = slice.get_mapped_range();
    let mut data = Vec::with_capacity(row_bytes as usize * height as usize);
    for row in mapped.chunks_exact(padded_row_bytes as usize) {
        data.extend_from_slice(&row[..row_bytes as usize]);
    }
    drop(mapped);
    buffer.unmap();

    Ok(Bitmap::from_raw(width, height, data))
}

#[cfg(test)]
mod tests {
    use std::panic::{self, AssertUnwindSafe};

    use super::*;
    use crate::{
        context::tests::gpu,
        gradient::{GradientStop, RenderOptions},
        renderer::render,
    };

    #[test]
    #[cfg_attr(skip_gpu_tests, ignore)]
    fn reads_back_premultiplied_pixels() {
        let Some(ctx) = gpu() else { return };
        let stops = [GradientStop::new([1.0, 0.5, 0.0, 0.5], 0.0)];
        let texture = render(&ctx, 5, &stops, &RenderOptions::default()).unwrap();
        let bitmap = to_bitmap(&ctx, &texture).unwrap();
        for px in bitmap.data().chunks_exact(4) {
            assert!(px[0].abs_diff(128) <= 1, "{px:?}");
            assert!(px[1].abs_diff(64) <= 1, "{px:?}");
            assert_eq!(px[2], 0);
            assert!(px[3].abs_diff(128) <= 1, "{px:?}");
        }
    }

    #[test]
    #[cfg_attr(skip_gpu_tests, ignore)]
    fn rejects_other_formats() {
        let Some(ctx) = gpu() else { return };
        let texture = ctx.device().create_texture(&wgpu::TextureDescriptor {
            label: None,
            size: wgpu::Extent3d {
                width: 4,
                height: 4,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let err = panic::catch_unwind(AssertUnwindSafe(|| to_bitmap(&ctx, &texture)))
            .expect_err("readback of an R8 texture should panic");
        let msg = err
            .downcast_ref::<String>()
            .map(String::as_str)
            .unwrap_or_default();
        assert!(msg.contains("unsupported texture format"), "{msg}");
    }
}
