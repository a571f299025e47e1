use wgpu::{
    BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType,
    BufferBindingType, ComputePipeline, ComputePipelineDescriptor, Device,
    PipelineCompilationOptions, PipelineLayoutDescriptor, ShaderModuleDescriptor, ShaderSource,
    ShaderStages, StorageTextureAccess, TextureFormat, TextureViewDimension,
};

/// WGSL source of the gradient kernel.
pub const SHADER_SOURCE: &str = include_str!("gradient.wgsl");
pub const ENTRY_POINT: &str = "angular_gradient";
/// Edge length of a workgroup; matches `@workgroup_size` in the shader.
pub const WORKGROUP_SIZE: u32 = 8;
/// Format of the texture the kernel writes.
pub const OUTPUT_FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;

/// The compiled gradient kernel and the layout its resources are bound with.
///
/// Bindings (all in group 0):
/// - 0: output storage texture
/// - 1: `RenderParameters` uniform
/// - 2: `GradientStop` storage array
pub(crate) struct GradientKernel {
    pub(crate) pipeline: ComputePipeline,
    pub(crate) bind_group_layout: BindGroupLayout,
}

impl GradientKernel {
    pub(crate) fn new(device: &Device) -> Self {
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("angular_gradient"),
            source: ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("angular_gradient"),
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    count: None,
                    visibility: ShaderStages::COMPUTE,
                    ty: BindingType::StorageTexture {
                        access: StorageTextureAccess::WriteOnly,
                        format: OUTPUT_FORMAT,
                        view_dimension: TextureViewDimension::D2,
                    },
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    count: None,
                    visibility: ShaderStages::COMPUTE,
                    ty: BindingType::Buffer {
                        ty: BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                },
                BindGroupLayoutEntry {
                    binding: 2,
                    count: None,
                    visibility: ShaderStages::COMPUTE,
                    ty: BindingType::Buffer {
                        ty: BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                },
            ],
        });

        let pipeline = device.create_compute_pipeline(&ComputePipelineDescriptor {
            label: Some("angular_gradient"),
            layout: Some(&device.create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some("angular_gradient"),
                bind_group_layouts: &[&bind_group_layout],
                ..Default::default()
            })),
            module: &shader,
            entry_point: Some(ENTRY_POINT),
            compilation_options: PipelineCompilationOptions::default(),
            cache: None,
        });
        log::debug!("created gradient pipeline (entry point `{ENTRY_POINT}`)");

        Self {
            pipeline,
            bind_group_layout,
        }
    }
}

/// Number of workgroups needed along one axis to cover `size` pixels.
pub fn workgroup_count(size: u32) -> u32 {
    size.div_ceil(WORKGROUP_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workgroups_cover_texture() {
        assert_eq!(workgroup_count(1), 1);
        assert_eq!(workgroup_count(8), 1);
        assert_eq!(workgroup_count(9), 2);
        assert_eq!(workgroup_count(64), 8);
        assert_eq!(workgroup_count(257), 33);
    }

    #[test]
    fn shader_validates() {
        let module = naga::front::wgsl::parse_str(SHADER_SOURCE).expect("shader should parse");
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .expect("shader should validate");

        let entry = module
            .entry_points
            .iter()
            .find(|ep| ep.name == ENTRY_POINT)
            .expect("missing entry point");
        assert_eq!(entry.stage, naga::ShaderStage::Compute);
        assert_eq!(entry.workgroup_size, [WORKGROUP_SIZE, WORKGROUP_SIZE, 1]);
    }

    #[test]
    fn shader_struct_sizes_match_host() {
        let module = naga::front::wgsl::parse_str(SHADER_SOURCE).unwrap();
        let size_of = |name: &str| {
            let (_, ty) = module
                .types
                .iter()
                .find(|(_, ty)| ty.name.as_deref() == Some(name))
                .unwrap_or_else(|| panic!("missing struct `{name}`"));
            match ty.inner {
                naga::TypeInner::Struct { span, .. } => span as usize,
                _ => panic!("`{name}` is not a struct"),
            }
        };
        assert_eq!(
            size_of("Params"),
            std::mem::size_of::<crate::gradient::RenderParameters>()
        );
        assert_eq!(
            size_of("GradientStop"),
            std::mem::size_of::<crate::gradient::GradientStop>()
        );
    }
}
