use std::collections::{BTreeMap, BTreeSet};

use naga::{AddressSpace, Binding, Handle, Module, ResourceBinding, Scalar, Type, TypeInner, VectorSize};

use super::error::{ShaderError, Stage};
use super::uniforms::{UniformKind, UniformLayout};
use super::{FRAGMENT_ENTRY, VERTEX_ENTRY};

/// Group/binding of the program's uniform block.
const UNIFORM_BINDING: ResourceBinding = ResourceBinding { group: 0, binding: 0 };

/// One stage, parsed and validated.
#[derive(Debug)]
pub struct CompiledStage {
    stage: Stage,
    module: Module,
}

impl CompiledStage {
    /// Parses and validates WGSL `source` for `stage`.
    pub fn compile(stage: Stage, source: &str) -> Result<Self, ShaderError> {
        if source.trim().is_empty() {
            return Err(ShaderError::compile(stage, "source is empty"));
        }

        let module = naga::front::wgsl::parse_str(source)
            .map_err(|e| ShaderError::compile(stage, e.emit_to_string(source)))?;

        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .map_err(|e| ShaderError::compile(stage, e.to_string()))?;

        Ok(Self { stage, module })
    }

    fn entry_point(&self) -> Result<&naga::EntryPoint, ShaderError> {
        let (name, wanted) = match self.stage {
            Stage::Vertex => (VERTEX_ENTRY, naga::ShaderStage::Vertex),
            Stage::Fragment => (FRAGMENT_ENTRY, naga::ShaderStage::Fragment),
        };

        self.module
            .entry_points
            .iter()
            .find(|ep| ep.name == name && ep.stage == wanted)
            .ok_or_else(|| {
                ShaderError::link(format!("{} stage has no `{name}` entry point", self.stage))
            })
    }

    /// `@location`s read by the entry point, with their types.
    fn inputs(&self) -> Result<Vec<(u32, Handle<Type>)>, ShaderError> {
        let ep = self.entry_point()?;
        Ok(ep
            .function
            .arguments
            .iter()
            .flat_map(|arg| located(&self.module, arg.ty, arg.binding.as_ref()))
            .collect())
    }

    fn input_locations(&self) -> Result<BTreeSet<u32>, ShaderError> {
        Ok(self.inputs()?.into_iter().map(|(location, _)| location).collect())
    }

    /// `@location`s written by the entry point.
    fn output_locations(&self) -> Result<BTreeSet<u32>, ShaderError> {
        let ep = self.entry_point()?;
        Ok(ep
            .function
            .result
            .iter()
            .flat_map(|res| located(&self.module, res.ty, res.binding.as_ref()))
            .map(|(location, _)| location)
            .collect())
    }

    /// Reflects the uniform block at `@group(0) @binding(0)`, if declared.
    pub fn uniform_layout(&self) -> UniformLayout {
        let Some(var) = self.module.global_variables.iter().find_map(|(_, var)| {
            (var.space == AddressSpace::Uniform && var.binding == Some(UNIFORM_BINDING))
                .then_some(var)
        }) else {
            return UniformLayout::default();
        };

        let ty = &self.module.types[var.ty];
        let size = ty.inner.size(self.module.to_ctx());

        match &ty.inner {
            TypeInner::Struct { members, .. } => {
                let mut layout = UniformLayout::new(size);
                for member in members {
                    let Some(name) = member.name.as_deref() else { continue };
                    match uniform_kind(&self.module.types[member.ty].inner) {
                        Some(kind) => layout = layout.with_slot(name, member.offset, kind),
                        None => log::debug!(
                            "{} stage: uniform member `{name}` has a type with no setter",
                            self.stage
                        ),
                    }
                }
                layout
            }
            inner => match (var.name.as_deref(), uniform_kind(inner)) {
                (Some(name), Some(kind)) => UniformLayout::new(size).with_slot(name, 0, kind),
                _ => UniformLayout::new(size),
            },
        }
    }
}

/// Checks that the two stages form a program fed by `vertex_inputs`
/// (the attributes provided by the vertex buffers) and returns the combined
/// uniform layout.
pub fn link(
    vertex: &CompiledStage,
    fragment: &CompiledStage,
    vertex_inputs: &[wgpu::VertexAttribute],
) -> Result<UniformLayout, ShaderError> {
    if vertex.stage != Stage::Vertex || fragment.stage != Stage::Fragment {
        return Err(ShaderError::link("stages passed in the wrong order"));
    }

    let provided: BTreeMap<u32, wgpu::VertexFormat> = vertex_inputs
        .iter()
        .map(|a| (a.shader_location, a.format))
        .collect();
    for (location, ty) in vertex.inputs()? {
        let Some(&format) = provided.get(&location) else {
            return Err(ShaderError::link(format!(
                "vertex input @location({location}) is not fed by any vertex buffer"
            )));
        };
        if !format_feeds(format, &vertex.module.types[ty].inner) {
            return Err(ShaderError::link(format!(
                "vertex input @location({location}) cannot be fed from a {format:?} attribute"
            )));
        }
    }

    let varyings = vertex.output_locations()?;
    if let Some(missing) = fragment.input_locations()?.difference(&varyings).next() {
        return Err(ShaderError::link(format!(
            "fragment input @location({missing}) is not written by the vertex stage"
        )));
    }

    if !fragment.output_locations()?.contains(&0) {
        return Err(ShaderError::link("fragment stage does not write @location(0)"));
    }

    vertex
        .uniform_layout()
        .merge(&fragment.uniform_layout())
        .map_err(ShaderError::link)
}

/// `@location`s carried by a binding, or by the members of a struct type.
fn located(module: &Module, ty: Handle<Type>, binding: Option<&Binding>) -> Vec<(u32, Handle<Type>)> {
    match binding {
        Some(Binding::Location { location, .. }) => vec![(*location, ty)],
        Some(Binding::BuiltIn(_)) => Vec::new(),
        None => match &module.types[ty].inner {
            TypeInner::Struct { members, .. } => members
                .iter()
                .filter_map(|m| match m.binding {
                    Some(Binding::Location { location, .. }) => Some((location, m.ty)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        },
    }
}

/// Whether an attribute of `format` can feed a shader input of type `inner`.
///
/// Only the scalar type must agree; WGSL fills or drops extra components.
/// Formats without a listed scalar are left to wgpu.
fn format_feeds(format: wgpu::VertexFormat, inner: &TypeInner) -> bool {
    let scalar = match *inner {
        TypeInner::Scalar(s) | TypeInner::Vector { scalar: s, .. } => s,
        _ => return false,
    };
    format_scalar(format).is_none_or(|expected| expected == scalar)
}

fn format_scalar(format: wgpu::VertexFormat) -> Option<Scalar> {
    use wgpu::VertexFormat as F;
    match format {
        F::Float32 | F::Float32x2 | F::Float32x3 | F::Float32x4 => Some(Scalar::F32),
        F::Uint32 | F::Uint32x2 | F::Uint32x3 | F::Uint32x4 => Some(Scalar::U32),
        F::Sint32 | F::Sint32x2 | F::Sint32x3 | F::Sint32x4 => Some(Scalar::I32),
        _ => None,
    }
}

fn uniform_kind(inner: &TypeInner) -> Option<UniformKind> {
    match *inner {
        TypeInner::Scalar(s) if s == Scalar::F32 => Some(UniformKind::F32),
        TypeInner::Matrix {
            columns: VectorSize::Tri,
            rows: VectorSize::Tri,
            scalar,
        } if scalar == Scalar::F32 => Some(UniformKind::Mat3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = include_str!("../../assets/shaders/spinning-square/basic.vert.wgsl");
    const FS: &str = include_str!("../../assets/shaders/spinning-square/basic.frag.wgsl");

    const ATTRS: [wgpu::VertexAttribute; 2] = [
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 0,
        },
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 1,
        },
    ];

    fn vs() -> CompiledStage {
        CompiledStage::compile(Stage::Vertex, VS).unwrap()
    }

    fn fs() -> CompiledStage {
        CompiledStage::compile(Stage::Fragment, FS).unwrap()
    }

    #[test]
    fn bundled_shaders_link() {
        let layout = link(&vs(), &fs(), &ATTRS).unwrap();

        let model = layout.find("u_model").unwrap();
        assert_eq!((model.offset, model.kind), (0, UniformKind::Mat3));

        let aspect = layout.find("u_aspectRatio").unwrap();
        assert_eq!((aspect.offset, aspect.kind), (48, UniformKind::F32));

        assert_eq!(layout.size(), 64);
    }

    #[test]
    fn empty_source_is_a_compile_error() {
        let err = CompiledStage::compile(Stage::Vertex, "  \n").unwrap_err();
        assert!(matches!(err, ShaderError::Compile { stage: Stage::Vertex, .. }));
    }

    #[test]
    fn syntax_error_is_a_compile_error() {
        let err = CompiledStage::compile(Stage::Fragment, "fn fs_main( {").unwrap_err();
        assert!(matches!(err, ShaderError::Compile { stage: Stage::Fragment, .. }));
    }

    #[test]
    fn type_error_is_a_compile_error() {
        let src = "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1u; }";
        assert!(CompiledStage::compile(Stage::Fragment, src).is_err());
    }

    #[test]
    fn missing_vertex_buffer_is_a_link_error() {
        let err = link(&vs(), &fs(), &ATTRS[..1]).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }), "{err}");
    }

    #[test]
    fn integer_input_fed_by_float_buffer_is_a_link_error() {
        let src = "@vertex fn vs_main(@location(0) position: vec3<i32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(vec3<f32>(position), 1.0);
        }";
        let vs = CompiledStage::compile(Stage::Vertex, src).unwrap();
        let fs = CompiledStage::compile(
            Stage::Fragment,
            "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }",
        )
        .unwrap();

        let err = link(&vs, &fs, &ATTRS).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }), "{err}");
        assert!(err.to_string().contains("@location(0)"), "{err}");
    }

    #[test]
    fn float_input_accepts_any_float32_width() {
        let src = "@vertex fn vs_main(@location(0) position: vec4<f32>) -> @builtin(position) vec4<f32> {
            return position;
        }";
        let vs = CompiledStage::compile(Stage::Vertex, src).unwrap();
        let fs = CompiledStage::compile(
            Stage::Fragment,
            "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }",
        )
        .unwrap();

        assert!(link(&vs, &fs, &ATTRS[..1]).is_ok());
    }

    #[test]
    fn unmatched_varying_is_a_link_error() {
        let src = "@fragment fn fs_main(@location(3) c: vec3<f32>) -> @location(0) vec4<f32> {
            return vec4<f32>(c, 1.0);
        }";
        let fs = CompiledStage::compile(Stage::Fragment, src).unwrap();
        assert!(matches!(link(&vs(), &fs, &ATTRS), Err(ShaderError::Link { .. })));
    }

    #[test]
    fn wrong_entry_point_name_is_a_link_error() {
        let src = "@fragment fn main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";
        let fs = CompiledStage::compile(Stage::Fragment, src).unwrap();
        let err = link(&vs(), &fs, &ATTRS).unwrap_err();
        assert!(err.to_string().contains(FRAGMENT_ENTRY), "{err}");
    }

    #[test]
    fn stages_in_wrong_order_fail_to_link() {
        assert!(link(&fs(), &vs(), &ATTRS).is_err());
    }

    #[test]
    fn bare_uniform_variable_is_reflected() {
        let src = "@group(0) @binding(0) var<uniform> u_aspectRatio: f32;
            @fragment fn fs_main() -> @location(0) vec4<f32> {
                return vec4<f32>(u_aspectRatio);
            }";
        let fs = CompiledStage::compile(Stage::Fragment, src).unwrap();
        let layout = fs.uniform_layout();
        assert_eq!(layout.find("u_aspectRatio").map(|s| s.offset), Some(0));
    }

    #[test]
    fn stage_without_uniforms_has_empty_layout() {
        assert!(fs().uniform_layout().is_empty());
    }
}
