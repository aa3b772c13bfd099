//! Static catalog translating DSL type names into their host, shader and wire representations.
//!
//! This table is the single place where one DSL name is turned into three independent
//! representations. The host storage (`HostScalar` x `element_count`), the shader keyword and
//! the vertex format must describe the same bytes, or the consumer silently reads garbage.

/// Scalar storage type used for a field in the generated host struct.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HostScalar {
    Float,
    Double,
    Int,
    UInt,
    I8,
    U8,
    I16,
    U16,
    U32,
}

/// Numeric class a shader or a vertex format interprets its components as.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ScalarClass {
    Float,
    Int,
    UInt,
}

/// Wire format of a vertex attribute as read by the input assembler.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VertexFormat {
    /// No direct binary format (matrices, doubles).
    Unknown,

    // 32-bit
    R32Float,
    Rg32Float,
    Rgb32Float,
    Rgba32Float,
    R32SInt,
    Rg32SInt,
    Rgb32SInt,
    Rgba32SInt,
    R32UInt,
    Rg32UInt,
    Rgb32UInt,
    Rgba32UInt,

    // 16-bit
    R16SInt,
    Rg16SInt,
    Rgba16SInt,
    R16UInt,
    Rg16UInt,
    Rgba16UInt,
    R16Unorm,
    Rg16Unorm,
    Rgba16Unorm,
    R16Snorm,
    Rg16Snorm,
    Rgba16Snorm,
    R16Float,
    Rg16Float,
    Rgba16Float,

    // 8-bit
    R8SInt,
    Rg8SInt,
    Rgba8SInt,
    R8UInt,
    Rg8UInt,
    Rgba8UInt,
    R8Unorm,
    Rg8Unorm,
    Rgba8Unorm,
    R8Snorm,
    Rg8Snorm,
    Rgba8Snorm,
    Rgba8UnormSrgb,
    Bgra8Unorm,
    Bgra8UnormSrgb,
    Bgrx8Unorm,

    // Packed
    Rgb10A2Unorm,
    Rgb10A2UInt,
    Rg11B10Float,
    Rgb9E5SharedExp,
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    pub dsl_name: &'static str,
    pub host: HostScalar,
    /// Number of `host` scalars stored for the field. `1` for scalars.
    pub element_count: usize,
    pub shader_type: &'static str,
    pub format: VertexFormat,
}

/// Result of resolving a DSL type name.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TypeResolution {
    Found(&'static TypeMapping),
    /// The name is not in the catalog. Carries the `float4` fallback.
    Fallback(&'static TypeMapping),
}

impl HostScalar {
    pub fn to_c(self) -> &'static str {
        match self {
            HostScalar::Float => "float",
            HostScalar::Double => "double",
            HostScalar::Int => "int",
            HostScalar::UInt => "unsigned int",
            HostScalar::I8 => "int8_t",
            HostScalar::U8 => "uint8_t",
            HostScalar::I16 => "int16_t",
            HostScalar::U16 => "uint16_t",
            HostScalar::U32 => "uint32_t",
        }
    }

    #[inline(always)]
    pub fn size(self) -> usize {
        match self {
            HostScalar::I8 | HostScalar::U8 => 1,
            HostScalar::I16 | HostScalar::U16 => 2,
            HostScalar::Float | HostScalar::Int | HostScalar::UInt | HostScalar::U32 => 4,
            HostScalar::Double => 8,
        }
    }

    /// Scalars are naturally aligned on every target the header is compiled for.
    #[inline(always)]
    pub fn align(self) -> usize {
        self.size()
    }
}

impl VertexFormat {
    pub fn to_dxgi(self) -> &'static str {
        match self {
            VertexFormat::Unknown => "DXGI_FORMAT_UNKNOWN",
            VertexFormat::R32Float => "DXGI_FORMAT_R32_FLOAT",
            VertexFormat::Rg32Float => "DXGI_FORMAT_R32G32_FLOAT",
            VertexFormat::Rgb32Float => "DXGI_FORMAT_R32G32B32_FLOAT",
            VertexFormat::Rgba32Float => "DXGI_FORMAT_R32G32B32A32_FLOAT",
            VertexFormat::R32SInt => "DXGI_FORMAT_R32_SINT",
            VertexFormat::Rg32SInt => "DXGI_FORMAT_R32G32_SINT",
            VertexFormat::Rgb32SInt => "DXGI_FORMAT_R32G32B32_SINT",
            VertexFormat::Rgba32SInt => "DXGI_FORMAT_R32G32B32A32_SINT",
            VertexFormat::R32UInt => "DXGI_FORMAT_R32_UINT",
            VertexFormat::Rg32UInt => "DXGI_FORMAT_R32G32_UINT",
            VertexFormat::Rgb32UInt => "DXGI_FORMAT_R32G32B32_UINT",
            VertexFormat::Rgba32UInt => "DXGI_FORMAT_R32G32B32A32_UINT",
            VertexFormat::R16SInt => "DXGI_FORMAT_R16_SINT",
            VertexFormat::Rg16SInt => "DXGI_FORMAT_R16G16_SINT",
            VertexFormat::Rgba16SInt => "DXGI_FORMAT_R16G16B16A16_SINT",
            VertexFormat::R16UInt => "DXGI_FORMAT_R16_UINT",
            VertexFormat::Rg16UInt => "DXGI_FORMAT_R16G16_UINT",
            VertexFormat::Rgba16UInt => "DXGI_FORMAT_R16G16B16A16_UINT",
            VertexFormat::R16Unorm => "DXGI_FORMAT_R16_UNORM",
            VertexFormat::Rg16Unorm => "DXGI_FORMAT_R16G16_UNORM",
            VertexFormat::Rgba16Unorm => "DXGI_FORMAT_R16G16B16A16_UNORM",
            VertexFormat::R16Snorm => "DXGI_FORMAT_R16_SNORM",
            VertexFormat::Rg16Snorm => "DXGI_FORMAT_R16G16_SNORM",
            VertexFormat::Rgba16Snorm => "DXGI_FORMAT_R16G16B16A16_SNORM",
            VertexFormat::R16Float => "DXGI_FORMAT_R16_FLOAT",
            VertexFormat::Rg16Float => "DXGI_FORMAT_R16G16_FLOAT",
            VertexFormat::Rgba16Float => "DXGI_FORMAT_R16G16B16A16_FLOAT",
            VertexFormat::R8SInt => "DXGI_FORMAT_R8_SINT",
            VertexFormat::Rg8SInt => "DXGI_FORMAT_R8G8_SINT",
            VertexFormat::Rgba8SInt => "DXGI_FORMAT_R8G8B8A8_SINT",
            VertexFormat::R8UInt => "DXGI_FORMAT_R8_UINT",
            VertexFormat::Rg8UInt => "DXGI_FORMAT_R8G8_UINT",
            VertexFormat::Rgba8UInt => "DXGI_FORMAT_R8G8B8A8_UINT",
            VertexFormat::R8Unorm => "DXGI_FORMAT_R8_UNORM",
            VertexFormat::Rg8Unorm => "DXGI_FORMAT_R8G8_UNORM",
            VertexFormat::Rgba8Unorm => "DXGI_FORMAT_R8G8B8A8_UNORM",
            VertexFormat::R8Snorm => "DXGI_FORMAT_R8_SNORM",
            VertexFormat::Rg8Snorm => "DXGI_FORMAT_R8G8_SNORM",
            VertexFormat::Rgba8Snorm => "DXGI_FORMAT_R8G8B8A8_SNORM",
            VertexFormat::Rgba8UnormSrgb => "DXGI_FORMAT_R8G8B8A8_UNORM_SRGB",
            VertexFormat::Bgra8Unorm => "DXGI_FORMAT_B8G8R8A8_UNORM",
            VertexFormat::Bgra8UnormSrgb => "DXGI_FORMAT_B8G8R8A8_UNORM_SRGB",
            VertexFormat::Bgrx8Unorm => "DXGI_FORMAT_B8G8R8X8_UNORM",
            VertexFormat::Rgb10A2Unorm => "DXGI_FORMAT_R10G10B10A2_UNORM",
            VertexFormat::Rgb10A2UInt => "DXGI_FORMAT_R10G10B10A2_UINT",
            VertexFormat::Rg11B10Float => "DXGI_FORMAT_R11G11B10_FLOAT",
            VertexFormat::Rgb9E5SharedExp => "DXGI_FORMAT_R9G9B9E5_SHAREDEXP",
        }
    }

    /// Size in bytes of one attribute in this format. `None` for `Unknown`.
    pub fn size(self) -> Option<usize> {
        let size = match self {
            VertexFormat::Unknown => return None,
            VertexFormat::R8SInt
            | VertexFormat::R8UInt
            | VertexFormat::R8Unorm
            | VertexFormat::R8Snorm => 1,
            VertexFormat::R16SInt
            | VertexFormat::R16UInt
            | VertexFormat::R16Unorm
            | VertexFormat::R16Snorm
            | VertexFormat::R16Float
            | VertexFormat::Rg8SInt
            | VertexFormat::Rg8UInt
            | VertexFormat::Rg8Unorm
            | VertexFormat::Rg8Snorm => 2,
            VertexFormat::R32Float
            | VertexFormat::R32SInt
            | VertexFormat::R32UInt
            | VertexFormat::Rg16SInt
            | VertexFormat::Rg16UInt
            | VertexFormat::Rg16Unorm
            | VertexFormat::Rg16Snorm
            | VertexFormat::Rg16Float
            | VertexFormat::Rgba8SInt
            | VertexFormat::Rgba8UInt
            | VertexFormat::Rgba8Unorm
            | VertexFormat::Rgba8Snorm
            | VertexFormat::Rgba8UnormSrgb
            | VertexFormat::Bgra8Unorm
            | VertexFormat::Bgra8UnormSrgb
            | VertexFormat::Bgrx8Unorm
            | VertexFormat::Rgb10A2Unorm
            | VertexFormat::Rgb10A2UInt
            | VertexFormat::Rg11B10Float
            | VertexFormat::Rgb9E5SharedExp => 4,
            VertexFormat::Rg32Float
            | VertexFormat::Rg32SInt
            | VertexFormat::Rg32UInt
            | VertexFormat::Rgba16SInt
            | VertexFormat::Rgba16UInt
            | VertexFormat::Rgba16Unorm
            | VertexFormat::Rgba16Snorm
            | VertexFormat::Rgba16Float => 8,
            VertexFormat::Rgb32Float | VertexFormat::Rgb32SInt | VertexFormat::Rgb32UInt => 12,
            VertexFormat::Rgba32Float | VertexFormat::Rgba32SInt | VertexFormat::Rgba32UInt => 16,
        };

        Some(size)
    }

    /// Number of components the shader observes. Padding channels (`X`) are not counted.
    pub fn components(self) -> Option<usize> {
        let components = match self {
            VertexFormat::Unknown => return None,
            VertexFormat::R32Float
            | VertexFormat::R32SInt
            | VertexFormat::R32UInt
            | VertexFormat::R16SInt
            | VertexFormat::R16UInt
            | VertexFormat::R16Unorm
            | VertexFormat::R16Snorm
            | VertexFormat::R16Float
            | VertexFormat::R8SInt
            | VertexFormat::R8UInt
            | VertexFormat::R8Unorm
            | VertexFormat::R8Snorm => 1,
            VertexFormat::Rg32Float
            | VertexFormat::Rg32SInt
            | VertexFormat::Rg32UInt
            | VertexFormat::Rg16SInt
            | VertexFormat::Rg16UInt
            | VertexFormat::Rg16Unorm
            | VertexFormat::Rg16Snorm
            | VertexFormat::Rg16Float
            | VertexFormat::Rg8SInt
            | VertexFormat::Rg8UInt
            | VertexFormat::Rg8Unorm
            | VertexFormat::Rg8Snorm => 2,
            VertexFormat::Rgb32Float
            | VertexFormat::Rgb32SInt
            | VertexFormat::Rgb32UInt
            | VertexFormat::Bgrx8Unorm
            | VertexFormat::Rg11B10Float
            | VertexFormat::Rgb9E5SharedExp => 3,
            VertexFormat::Rgba32Float
            | VertexFormat::Rgba32SInt
            | VertexFormat::Rgba32UInt
            | VertexFormat::Rgba16SInt
            | VertexFormat::Rgba16UInt
            | VertexFormat::Rgba16Unorm
            | VertexFormat::Rgba16Snorm
            | VertexFormat::Rgba16Float
            | VertexFormat::Rgba8SInt
            | VertexFormat::Rgba8UInt
            | VertexFormat::Rgba8Unorm
            | VertexFormat::Rgba8Snorm
            | VertexFormat::Rgba8UnormSrgb
            | VertexFormat::Bgra8Unorm
            | VertexFormat::Bgra8UnormSrgb
            | VertexFormat::Rgb10A2Unorm
            | VertexFormat::Rgb10A2UInt => 4,
        };

        Some(components)
    }

    /// How the shader interprets the components. Normalized formats read as floats.
    pub fn class(self) -> Option<ScalarClass> {
        match self {
            VertexFormat::Unknown => None,
            VertexFormat::R32SInt
            | VertexFormat::Rg32SInt
            | VertexFormat::Rgb32SInt
            | VertexFormat::Rgba32SInt
            | VertexFormat::R16SInt
            | VertexFormat::Rg16SInt
            | VertexFormat::Rgba16SInt
            | VertexFormat::R8SInt
            | VertexFormat::Rg8SInt
            | VertexFormat::Rgba8SInt => Some(ScalarClass::Int),
            VertexFormat::R32UInt
            | VertexFormat::Rg32UInt
            | VertexFormat::Rgb32UInt
            | VertexFormat::Rgba32UInt
            | VertexFormat::R16UInt
            | VertexFormat::Rg16UInt
            | VertexFormat::Rgba16UInt
            | VertexFormat::R8UInt
            | VertexFormat::Rg8UInt
            | VertexFormat::Rgba8UInt
            | VertexFormat::Rgb10A2UInt => Some(ScalarClass::UInt),
            _ => Some(ScalarClass::Float),
        }
    }
}

impl TypeMapping {
    const fn new(
        dsl_name: &'static str,
        host: HostScalar,
        element_count: usize,
        shader_type: &'static str,
        format: VertexFormat,
    ) -> Self {
        Self {
            dsl_name,
            host,
            element_count,
            shader_type,
            format,
        }
    }

    #[inline(always)]
    pub fn host_type(&self) -> &'static str {
        self.host.to_c()
    }

    #[inline(always)]
    pub fn format_tag(&self) -> &'static str {
        self.format.to_dxgi()
    }

    /// Bytes the field occupies in the host struct, excluding padding.
    #[inline(always)]
    pub fn host_size(&self) -> usize {
        self.host.size() * self.element_count
    }

    #[inline(always)]
    pub fn host_align(&self) -> usize {
        self.host.align()
    }
}

impl TypeResolution {
    #[inline(always)]
    pub fn mapping(&self) -> &'static TypeMapping {
        match *self {
            TypeResolution::Found(mapping) | TypeResolution::Fallback(mapping) => mapping,
        }
    }

    #[inline(always)]
    pub fn is_fallback(&self) -> bool {
        matches!(self, TypeResolution::Fallback(_))
    }
}

/// Mapping used for names missing from the catalog.
pub static FALLBACK: TypeMapping = TypeMapping::new(
    "unknown",
    HostScalar::Float,
    4,
    "float4",
    VertexFormat::Rgba32Float,
);

use HostScalar as H;
use VertexFormat as F;

static TYPE_MAPPINGS: &[TypeMapping] = &[
    TypeMapping::new("matrix", H::Float, 16, "matrix", F::Unknown),
    // 32-bit float
    TypeMapping::new("float4", H::Float, 4, "float4", F::Rgba32Float),
    TypeMapping::new("float3", H::Float, 3, "float3", F::Rgb32Float),
    TypeMapping::new("float2", H::Float, 2, "float2", F::Rg32Float),
    TypeMapping::new("float", H::Float, 1, "float", F::R32Float),
    // 32-bit integer
    TypeMapping::new("int4", H::Int, 4, "int4", F::Rgba32SInt),
    TypeMapping::new("int3", H::Int, 3, "int3", F::Rgb32SInt),
    TypeMapping::new("int2", H::Int, 2, "int2", F::Rg32SInt),
    TypeMapping::new("int", H::Int, 1, "int", F::R32SInt),
    TypeMapping::new("uint4", H::UInt, 4, "uint4", F::Rgba32UInt),
    TypeMapping::new("uint3", H::UInt, 3, "uint3", F::Rgb32UInt),
    TypeMapping::new("uint2", H::UInt, 2, "uint2", F::Rg32UInt),
    TypeMapping::new("uint", H::UInt, 1, "uint", F::R32UInt),
    // 16-bit integer
    TypeMapping::new("i16x4", H::I16, 4, "int4", F::Rgba16SInt),
    TypeMapping::new("i16x2", H::I16, 2, "int2", F::Rg16SInt),
    TypeMapping::new("i16", H::I16, 1, "int", F::R16SInt),
    TypeMapping::new("u16x4", H::U16, 4, "uint4", F::Rgba16UInt),
    TypeMapping::new("u16x2", H::U16, 2, "uint2", F::Rg16UInt),
    TypeMapping::new("u16", H::U16, 1, "uint", F::R16UInt),
    TypeMapping::new("u16x4_norm", H::U16, 4, "float4", F::Rgba16Unorm),
    TypeMapping::new("u16x2_norm", H::U16, 2, "float2", F::Rg16Unorm),
    TypeMapping::new("u16_norm", H::U16, 1, "float", F::R16Unorm),
    TypeMapping::new("i16x4_norm", H::I16, 4, "float4", F::Rgba16Snorm),
    TypeMapping::new("i16x2_norm", H::I16, 2, "float2", F::Rg16Snorm),
    TypeMapping::new("i16_norm", H::I16, 1, "float", F::R16Snorm),
    // 8-bit integer
    TypeMapping::new("i8x4", H::I8, 4, "int4", F::Rgba8SInt),
    TypeMapping::new("i8x2", H::I8, 2, "int2", F::Rg8SInt),
    TypeMapping::new("i8", H::I8, 1, "int", F::R8SInt),
    // `u8x4` reads as normalized floats, the raw integer form is `u8x4_uint`.
    TypeMapping::new("u8x4", H::U8, 4, "float4", F::Rgba8Unorm),
    TypeMapping::new("u8x4_uint", H::U8, 4, "uint4", F::Rgba8UInt),
    TypeMapping::new("u8x2", H::U8, 2, "uint2", F::Rg8UInt),
    TypeMapping::new("u8", H::U8, 1, "uint", F::R8UInt),
    TypeMapping::new("u8x4_norm", H::U8, 4, "float4", F::Rgba8Unorm),
    TypeMapping::new("u8x2_norm", H::U8, 2, "float2", F::Rg8Unorm),
    TypeMapping::new("u8_norm", H::U8, 1, "float", F::R8Unorm),
    TypeMapping::new("i8x4_norm", H::I8, 4, "float4", F::Rgba8Snorm),
    TypeMapping::new("i8x2_norm", H::I8, 2, "float2", F::Rg8Snorm),
    TypeMapping::new("i8_norm", H::I8, 1, "float", F::R8Snorm),
    // Half precision. Stored as raw bits on the host.
    TypeMapping::new("half4", H::U16, 4, "float4", F::Rgba16Float),
    TypeMapping::new("half2", H::U16, 2, "float2", F::Rg16Float),
    TypeMapping::new("half", H::U16, 1, "float", F::R16Float),
    // Packed
    TypeMapping::new("u10u10u10u2", H::U32, 1, "float4", F::Rgb10A2Unorm),
    TypeMapping::new("u10u10u10u2_uint", H::U32, 1, "uint4", F::Rgb10A2UInt),
    TypeMapping::new("u11u11u10", H::U32, 1, "float3", F::Rg11B10Float),
    TypeMapping::new("r9g9b9e5", H::U32, 1, "float3", F::Rgb9E5SharedExp),
    // Color
    TypeMapping::new("color", H::U8, 4, "float4", F::Rgba8Unorm),
    TypeMapping::new("color_bgra", H::U8, 4, "float4", F::Bgra8Unorm),
    TypeMapping::new("bgra8", H::U8, 4, "float4", F::Bgra8Unorm),
    TypeMapping::new("bgrx8", H::U8, 4, "float3", F::Bgrx8Unorm),
    TypeMapping::new("rgba8_srgb", H::U8, 4, "float4", F::Rgba8UnormSrgb),
    TypeMapping::new("bgra8_srgb", H::U8, 4, "float4", F::Bgra8UnormSrgb),
    // Double precision
    TypeMapping::new("double4", H::Double, 4, "double4", F::Unknown),
    TypeMapping::new("double2", H::Double, 2, "double2", F::Unknown),
    TypeMapping::new("double", H::Double, 1, "double", F::Unknown),
    // Semantic aliases
    TypeMapping::new("normal", H::I8, 4, "float4", F::Rgba8Snorm),
    TypeMapping::new("normal16", H::I16, 4, "float4", F::Rgba16Snorm),
    TypeMapping::new("bone_weights", H::U8, 4, "float4", F::Rgba8Unorm),
    TypeMapping::new("bone_indices", H::U8, 4, "uint4", F::Rgba8UInt),
    TypeMapping::new("index16", H::U16, 1, "uint", F::R16UInt),
    TypeMapping::new("index32", H::U32, 1, "uint", F::R32UInt),
];

/// Every mapping in the catalog, in table order.
#[inline(always)]
pub fn mappings() -> &'static [TypeMapping] {
    TYPE_MAPPINGS
}

/// Finds the mapping for `dsl_type`. Returns `None` if the name is not in the catalog.
pub fn lookup(dsl_type: &str) -> Option<&'static TypeMapping> {
    TYPE_MAPPINGS.iter().find(|m| m.dsl_name == dsl_type)
}

/// Resolves `dsl_type`, falling back to `float4` for names the catalog does not know.
///
/// Never fails. Callers that surface diagnostics should check
/// [`TypeResolution::is_fallback`].
pub fn resolve(dsl_type: &str) -> TypeResolution {
    match lookup(dsl_type) {
        Some(mapping) => TypeResolution::Found(mapping),
        None => TypeResolution::Fallback(&FALLBACK),
    }
}
