use anyhow::Context as _;
use wgpu::{
    Backends, Device, DeviceDescriptor, InstanceDescriptor, MemoryHints, PowerPreference, Queue,
    RequestAdapterOptions,
};

use crate::kernel::GradientKernel;

/// Everything that outlives a single render: the device, its queue, and the compiled kernel.
///
/// Create one up front and pass it to every render call. Nothing in here is mutated after
/// construction, so a context can be shared between threads.
pub struct GpuContext {
    device: Device,
    queue: Queue,
    pub(crate) kernel: GradientKernel,
}

impl GpuContext {
    /// Picks an adapter, opens a device on it and builds the gradient kernel.
    ///
    /// The backend set can be narrowed with `WGPU_BACKEND` (eg. `vulkan`, `gl`) and the adapter
    /// preference with `WGPU_POWER_PREF`.
    pub fn new() -> anyhow::Result<Self> {
        let backends = Backends::from_env().unwrap_or(Backends::PRIMARY);
        let instance = wgpu::Instance::new(&InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&RequestAdapterOptions {
            power_preference: PowerPreference::from_env().unwrap_or_default(),
            ..Default::default()
        }))
        .context("failed to find a supported graphics adapter")?;
        let info = adapter.get_info();
        log::debug!(
            "using adapter '{}' ({:?}, {:?})",
            info.name,
            info.backend,
            info.device_type,
        );

        let (device, queue) = pollster::block_on(adapter.request_device(&DeviceDescriptor {
            label: Some("angular_gradient"),
            memory_hints: MemoryHints::MemoryUsage,
            ..Default::default()
        }))
        .context("failed to open graphics device")?;

        let kernel = GradientKernel::new(&device);

        Ok(Self {
            device,
            queue,
            kernel,
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Largest texture edge the device accepts.
    pub fn max_size(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }
}
