use anyhow::bail;
use wgpu::{
    util::{BufferInitDescriptor, DeviceExt},
    BindGroupDescriptor, BindGroupEntry, BindingResource, BufferUsages, CommandEncoderDescriptor,
    ComputePassDescriptor, Extent3d, PollType, Texture, TextureDescriptor, TextureDimension,
    TextureUsages,
};

use crate::{
    bitmap::Bitmap,
    context::GpuContext,
    gradient::{self, GradientStop, RenderOptions, RenderParameters},
    kernel::{self, OUTPUT_FORMAT},
    readback,
};

/// Paints an angular gradient into a new `size`x`size` texture.
///
/// Blocks until the GPU has finished, so the returned texture can be read back immediately.
/// Fails if `stops` is empty or `size` is zero or exceeds the device's texture limit.
pub fn render(
    ctx: &GpuContext,
    size: u32,
    stops: &[GradientStop],
    options: &RenderOptions,
) -> anyhow::Result<Texture> {
    gradient::validate(size, stops)?;
    if size > ctx.max_size() {
        bail!(
            "gradient size {size} exceeds the device limit of {}",
            ctx.max_size()
        );
    }

    let device = ctx.device();
    let params = RenderParameters::new(size, stops.len(), options);
    let params_buf = device.create_buffer_init(&BufferInitDescriptor {
        label: Some("gradient_params"),
        contents: bytemuck::bytes_of(&params),
        usage: BufferUsages::UNIFORM,
    });
    let stops_buf = device.create_buffer_init(&BufferInitDescriptor {
        label: Some("gradient_stops"),
        contents: bytemuck::cast_slice(stops),
        usage: BufferUsages::STORAGE,
    });

    let texture = device.create_texture(&TextureDescriptor {
        label: Some("gradient"),
        size: Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: OUTPUT_FORMAT,
        usage: TextureUsages::STORAGE_BINDING | TextureUsages::COPY_SRC,
        view_formats: &[],
    });

    let bind_group = device.create_bind_group(&BindGroupDescriptor {
        label: Some("angular_gradient"),
        layout: &ctx.kernel.bind_group_layout,
        entries: &[
            BindGroupEntry {
                binding: 0,
                resource: BindingResource::TextureView(&texture.create_view(&Default::default())),
            },
            BindGroupEntry {
                binding: 1,
                resource: params_buf.as_entire_binding(),
            },
            BindGroupEntry {
                binding: 2,
                resource: stops_buf.as_entire_binding(),
            },
        ],
    });

    let groups = kernel::workgroup_count(size);
    log::debug!(
        "dispatching {groups}x{groups} workgroups for a {size}x{size} gradient with {} stops",
        stops.len(),
    );

    let mut enc = device.create_command_encoder(&CommandEncoderDescriptor {
        label: Some("angular_gradient"),
    });
    let mut pass = enc.begin_compute_pass(&ComputePassDescriptor {
        label: Some("angular_gradient"),
        timestamp_writes: None,
    });
    pass.set_pipeline(&ctx.kernel.pipeline);
    pass.set_bind_group(0, &bind_group, &[]);
    pass.dispatch_workgroups(groups, groups, 1);
    drop(pass);

    let submission = ctx.queue().submit([enc.finish()]);
    device.poll(PollType::WaitForSubmissionIndex(submission))?;

    Ok(texture)
}

/// Renders a gradient and reads it back in one go.
pub fn render_bitmap(
    ctx: &GpuContext,
    size: u32,
    stops: &[GradientStop],
    options: &RenderOptions,
) -> anyhow::Result<Bitmap> {
    let texture = render(ctx, size, stops, options)?;
    readback::to_bitmap(ctx, &texture)
}
