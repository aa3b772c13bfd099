//! HLSL generation: stage input structs, constant buffers and resource bindings.

use std::fmt::{self, Write};

use super::{write_banner, Emitted, StructCodeGen};
use crate::{
    declaration::{Declaration, DeclarationKind},
    diagnostics::{DiagnosticKind, Diagnostics},
    layout::Field,
    module::ParsedModule,
};

/// Name of the struct generated for a vertex stage input declaration.
pub const VS_INPUT: &str = "VS_INPUT";
/// Name of the struct generated for a pixel stage input declaration.
pub const PS_INPUT: &str = "PS_INPUT";

/// The HLSL construct a layout is rendered as.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HlslBlock {
    /// `struct <name> { <type> <field> : <SEMANTIC><index>; }` under a fixed stage name.
    StageInput(&'static str),
    /// `cbuffer <layout> : register(b<n>) { <type> <field>; }`.
    ConstantBuffer { register: u32 },
}

pub struct HlslStructCodeGen<'w, W: Write> {
    out: &'w mut W,
    block: HlslBlock,
}

pub struct ShaderEmitter<'a> {
    module: &'a ParsedModule,
    input_path: &'a str,
}

impl<'w, W: Write> HlslStructCodeGen<'w, W> {
    pub fn new(out: &'w mut W, block: HlslBlock) -> Self {
        Self { out, block }
    }
}

impl<'w, W: Write> StructCodeGen for HlslStructCodeGen<'w, W> {
    fn begin_struct(&mut self, name: &str) -> fmt::Result {
        match self.block {
            HlslBlock::StageInput(stage) => writeln!(self.out, "struct {stage} {{"),
            HlslBlock::ConstantBuffer { register } => {
                writeln!(self.out, "cbuffer {name} : register(b{register}) {{")
            }
        }
    }

    fn write_field(&mut self, field: &Field) -> fmt::Result {
        let ty = field.mapping.shader_type;
        match self.block {
            HlslBlock::StageInput(_) if !field.semantic.is_empty() => writeln!(
                self.out,
                "    {ty} {} : {}{};",
                field.name, field.semantic, field.semantic_index
            ),
            _ => writeln!(self.out, "    {ty} {};", field.name),
        }
    }

    fn end_struct(&mut self, _name: &str) -> fmt::Result {
        writeln!(self.out, "}};\n")
    }
}

impl<'a> ShaderEmitter<'a> {
    pub fn new(module: &'a ParsedModule, input_path: &'a str) -> Self {
        Self { module, input_path }
    }

    /// Emits the shader fragment. Output order follows declaration order exactly.
    pub fn emit(&self, diagnostics: &mut Diagnostics) -> Result<Emitted, fmt::Error> {
        let mut out = String::default();
        let mut items = 0;
        let mut vs_input = false;
        let mut ps_input = false;

        write_banner(&mut out, self.input_path)?;

        for decl in self.module.declarations() {
            if !decl.host_visibility.is_gpu_visible() {
                diagnostics.warn(
                    Some(decl.line),
                    DiagnosticKind::NotGpuVisible(decl.target_name().into()),
                );
                continue;
            }

            if matches!(
                decl.kind,
                DeclarationKind::Texture | DeclarationKind::Sampler
            ) {
                write_resource(&mut out, decl, diagnostics)?;
                items += 1;
                continue;
            }

            // Unresolved references were reported while parsing
            let Some(layout) = self.module.layout_of(decl) else {
                continue;
            };

            let block = match decl.kind {
                DeclarationKind::Vertex if decl.is_input => {
                    if std::mem::replace(&mut vs_input, true) {
                        diagnostics.warn(
                            Some(decl.line),
                            DiagnosticKind::DuplicateStageInput(VS_INPUT),
                        );
                    }
                    HlslBlock::StageInput(VS_INPUT)
                }
                DeclarationKind::Pixel if decl.is_input => {
                    if std::mem::replace(&mut ps_input, true) {
                        diagnostics.warn(
                            Some(decl.line),
                            DiagnosticKind::DuplicateStageInput(PS_INPUT),
                        );
                    }
                    HlslBlock::StageInput(PS_INPUT)
                }
                DeclarationKind::Buffer => HlslBlock::ConstantBuffer {
                    register: register_of(decl, diagnostics),
                },
                // Non-input stage data has no shader-side form
                _ => continue,
            };

            layout.gen(&mut HlslStructCodeGen::new(&mut out, block))?;
            items += 1;
        }

        Ok(Emitted { text: out, items })
    }
}

fn write_resource(
    out: &mut String,
    decl: &Declaration,
    diagnostics: &mut Diagnostics,
) -> fmt::Result {
    let (ty, class) = match decl.kind {
        DeclarationKind::Texture => ("Texture2D", 't'),
        _ => ("SamplerState", 's'),
    };
    let register = register_of(decl, diagnostics);
    writeln!(
        out,
        "{ty} {} : register({class}{register});",
        decl.target_name()
    )
}

/// Register of `decl`. Absent bindings silently map to register 0; malformed ones map to 0 with
/// a warning.
fn register_of(decl: &Declaration, diagnostics: &mut Diagnostics) -> u32 {
    match decl.register() {
        Some(Ok(register)) => register,
        Some(Err(err)) => {
            diagnostics.warn(Some(decl.line), err);
            0
        }
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::Limits;

    fn emit(source: &str) -> (Emitted, Diagnostics) {
        let module = ParsedModule::parse_str(source, &Limits::default());
        let mut diagnostics = Diagnostics::new();
        let emitted = ShaderEmitter::new(&module, "test.vtx")
            .emit(&mut diagnostics)
            .unwrap();
        (emitted, diagnostics)
    }

    #[test]
    fn vertex_input_struct() {
        let (emitted, _) = emit(
            "layout Vtx {\n  float3 pos : POSITION;\n  float3 col : COLOR;\n}\nvertex Vtx @vertex @input\n",
        );
        assert!(emitted.text.contains(
            "struct VS_INPUT {\n    float3 pos : POSITION0;\n    float3 col : COLOR0;\n};\n"
        ));
        assert_eq!(emitted.items, 1);
    }

    #[test]
    fn pixel_input_struct() {
        let (emitted, _) = emit(
            "layout P { float4 pos : SV_Position; float2 uv : TEXCOORD1; }\npixel P @pixel @input\n",
        );
        assert!(emitted.text.contains(
            "struct PS_INPUT {\n    float4 pos : SV_Position0;\n    float2 uv : TEXCOORD1;\n};\n"
        ));
    }

    #[test]
    fn constant_buffer() {
        let (emitted, _) = emit("layout Xform {\n  matrix mvp;\n}\nbuffer Xform @cpu_gpu @b0\n");
        assert!(emitted
            .text
            .contains("cbuffer Xform : register(b0) {\n    matrix mvp;\n};\n"));
        assert!(!emitted.text.contains(" : mvp"));
    }

    #[test]
    fn constant_buffer_drops_semantics() {
        let (emitted, _) = emit("layout Vtx { float3 pos : POSITION; }\nbuffer Vtx @b3\n");
        assert!(emitted
            .text
            .contains("cbuffer Vtx : register(b3) {\n    float3 pos;\n};\n"));
    }

    #[test]
    fn resources() {
        let (emitted, diagnostics) =
            emit("texture diffuseMap @b2\nsampler linearClamp @b1\nsampler pointWrap\n");
        assert!(diagnostics.is_empty());
        assert!(emitted.text.contains(
            "Texture2D diffuseMap : register(t2);\nSamplerState linearClamp : register(s1);\nSamplerState pointWrap : register(s0);\n"
        ));
        assert_eq!(emitted.items, 3);
    }

    #[test]
    fn malformed_binding_defaults_to_zero() {
        let (emitted, diagnostics) = emit("texture t @b4x\n");
        assert!(emitted.text.contains("Texture2D t : register(t0);"));
        assert!(diagnostics.any(|k| *k == DiagnosticKind::MalformedBinding("@b4x".into())));
    }

    #[test]
    fn cpu_only_is_skipped() {
        let (emitted, diagnostics) = emit("layout A { float a; }\nbuffer A @cpu @b0\n");
        assert!(!emitted.text.contains("cbuffer"));
        assert_eq!(emitted.items, 0);
        assert!(diagnostics.any(|k| *k == DiagnosticKind::NotGpuVisible("A".into())));
    }

    #[test]
    fn unknown_layout_is_skipped() {
        let (emitted, _) = emit("buffer Missing @b0\ntexture t @b1\n");
        assert!(!emitted.text.contains("Missing"));
        assert!(emitted.text.contains("Texture2D t : register(t1);"));
    }

    #[test]
    fn source_order_is_preserved() {
        let (emitted, _) = emit(
            "layout B { float4 tint; }\nlayout V { float3 pos : POSITION; }\n\
             texture a @b0\nbuffer B @b1\nsampler s @b0\nvertex V @input\ntexture z @b1\n",
        );
        let text = emitted.text;
        let positions: Vec<_> = [
            "Texture2D a",
            "cbuffer B",
            "SamplerState s",
            "struct VS_INPUT",
            "Texture2D z",
        ]
        .iter()
        .map(|needle| text.find(needle).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn duplicate_stage_input_is_reported() {
        let (emitted, diagnostics) = emit(
            "layout A { float3 p : POSITION; }\nlayout B { float3 q : POSITION; }\nvertex A @input\nvertex B @input\n",
        );
        assert_eq!(emitted.text.matches("struct VS_INPUT").count(), 2);
        assert!(diagnostics.any(|k| *k == DiagnosticKind::DuplicateStageInput(VS_INPUT)));
    }

    #[test]
    fn non_input_stage_declaration_has_no_shader_form() {
        let (emitted, diagnostics) = emit("layout A { float3 p : POSITION; }\nvertex A @vertex\n");
        assert_eq!(emitted.items, 0);
        assert!(diagnostics.is_empty());
    }
}
