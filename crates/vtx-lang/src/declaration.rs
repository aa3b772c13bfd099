use crate::{diagnostics::DiagnosticKind, layout::is_identifier};

/// The five declaration keywords.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Vertex,
    Pixel,
    Buffer,
    Sampler,
    Texture,
}

/// Which side of the application a declaration is meaningful to.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HostVisibility {
    /// No side was named. No tag produces this; it is only set programmatically. Only the
    /// one-sided variants exclude an output, so this is emitted to both.
    None,
    /// `@cpu`
    CpuOnly,
    /// `@gpu`
    GpuOnly,
    /// `@cpu_gpu`, or no visibility tag at all.
    #[default]
    Both,
}

/// What a declaration refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclarationTarget {
    /// Name of a layout. Used by vertex, pixel and buffer declarations.
    Layout(String),
    /// Name of the shader resource. Used by texture and sampler declarations.
    Resource(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub target: DeclarationTarget,
    /// Binding tag exactly as written, e.g. `@b3`.
    pub binding: Option<String>,
    pub is_vertex_stage: bool,
    pub is_pixel_stage: bool,
    pub is_input: bool,
    pub host_visibility: HostVisibility,
    /// 1-based source line.
    pub line: usize,
}

/// Prefix of a binding tag.
const BINDING_PREFIX: &str = "@b";

impl DeclarationKind {
    pub const ALL: [DeclarationKind; 5] = [
        DeclarationKind::Vertex,
        DeclarationKind::Pixel,
        DeclarationKind::Buffer,
        DeclarationKind::Sampler,
        DeclarationKind::Texture,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            DeclarationKind::Vertex => "vertex",
            DeclarationKind::Pixel => "pixel",
            DeclarationKind::Buffer => "buffer",
            DeclarationKind::Sampler => "sampler",
            DeclarationKind::Texture => "texture",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    /// Returns `true` if the declaration names a layout rather than a raw resource.
    #[inline(always)]
    pub fn references_layout(self) -> bool {
        matches!(
            self,
            DeclarationKind::Vertex | DeclarationKind::Pixel | DeclarationKind::Buffer
        )
    }
}

impl HostVisibility {
    /// Whether the generated header should describe the declaration. Only `GpuOnly` is
    /// excluded.
    #[inline(always)]
    pub fn is_cpu_visible(self) -> bool {
        self != HostVisibility::GpuOnly
    }

    /// Whether the generated shader should describe the declaration. Only `CpuOnly` is
    /// excluded.
    #[inline(always)]
    pub fn is_gpu_visible(self) -> bool {
        self != HostVisibility::CpuOnly
    }
}

impl Declaration {
    /// Parses the remainder of a declaration line, i.e. everything after `kind`'s keyword.
    ///
    /// The first token is the layout or resource name; every other token is an attribute tag.
    /// Tags are independent and order-free. Unrecognized tags are ignored.
    pub fn parse(kind: DeclarationKind, rest: &str, line: usize) -> Result<Self, DiagnosticKind> {
        let mut tokens = rest
            .split(|c: char| c.is_whitespace() || c == ';')
            .filter(|t| !t.is_empty());

        let target = match tokens.next() {
            Some(name) if is_identifier(name) => name.to_owned(),
            _ => {
                return Err(DiagnosticKind::MalformedDeclaration(
                    format!("{} {}", kind.keyword(), rest.trim()).trim().into(),
                ))
            }
        };

        let mut decl = Declaration {
            kind,
            target: if kind.references_layout() {
                DeclarationTarget::Layout(target)
            } else {
                DeclarationTarget::Resource(target)
            },
            binding: None,
            is_vertex_stage: false,
            is_pixel_stage: false,
            is_input: false,
            host_visibility: HostVisibility::default(),
            line,
        };

        for token in tokens {
            match token {
                "@vertex" => decl.is_vertex_stage = true,
                "@pixel" => decl.is_pixel_stage = true,
                "@input" => decl.is_input = true,
                "@cpu" => decl.host_visibility = HostVisibility::CpuOnly,
                "@gpu" => decl.host_visibility = HostVisibility::GpuOnly,
                "@cpu_gpu" => decl.host_visibility = HostVisibility::Both,
                _ if is_binding_tag(token) => decl.binding = Some(token.to_owned()),
                _ => {}
            }
        }

        Ok(decl)
    }

    /// Name of the referenced layout, for vertex, pixel and buffer declarations.
    pub fn layout_ref(&self) -> Option<&str> {
        match &self.target {
            DeclarationTarget::Layout(name) => Some(name),
            DeclarationTarget::Resource(_) => None,
        }
    }

    /// Name of the resource, for texture and sampler declarations.
    pub fn resource_name(&self) -> Option<&str> {
        match &self.target {
            DeclarationTarget::Resource(name) => Some(name),
            DeclarationTarget::Layout(_) => None,
        }
    }

    /// The layout or resource name, whichever the declaration carries.
    pub fn target_name(&self) -> &str {
        match &self.target {
            DeclarationTarget::Layout(name) | DeclarationTarget::Resource(name) => name,
        }
    }

    /// The register number encoded in the binding tag.
    ///
    /// `None` if there is no binding tag. `Some(Err(_))` if the tag has digits that do not form
    /// a register number, e.g. `@b2x`.
    pub fn register(&self) -> Option<Result<u32, DiagnosticKind>> {
        self.binding.as_deref().map(parse_register)
    }
}

/// A binding tag is `@b` immediately followed by a digit.
fn is_binding_tag(token: &str) -> bool {
    token
        .strip_prefix(BINDING_PREFIX)
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_digit())
}

/// Reads the register out of a binding tag: everything after `@b` must be digits.
fn parse_register(binding: &str) -> Result<u32, DiagnosticKind> {
    binding
        .strip_prefix(BINDING_PREFIX)
        .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| DiagnosticKind::MalformedBinding(binding.into()))
}
