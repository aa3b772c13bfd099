//! C header generation: one `typedef struct` per host-visible layout and a
//! `D3D11_INPUT_ELEMENT_DESC` table for every layout used as vertex input.

use std::{
    collections::HashSet,
    fmt::{self, Write},
};

use super::{write_banner, Emitted, StructCodeGen};
use crate::{
    declaration::DeclarationKind,
    diagnostics::{DiagnosticKind, Diagnostics},
    layout::{Field, Layout},
    module::ParsedModule,
};

/// Writes a layout as a C struct.
pub struct CStructCodeGen<'w, W: Write> {
    out: &'w mut W,
}

/// Layout checks go through this macro so the header compiles as both C11 and C++.
pub const STATIC_ASSERT_MACRO: &str = "VTX_STATIC_ASSERT";

const STATIC_ASSERT_PRELUDE: &str = "\
#ifndef VTX_STATIC_ASSERT
#ifdef __cplusplus
#define VTX_STATIC_ASSERT(cond, msg) static_assert(cond, msg)
#else
#define VTX_STATIC_ASSERT(cond, msg) _Static_assert(cond, msg)
#endif
#endif

";

pub struct HeaderEmitter<'a> {
    module: &'a ParsedModule,
    input_path: &'a str,
    guard: &'a str,
}

impl<'w, W: Write> CStructCodeGen<'w, W> {
    pub fn new(out: &'w mut W) -> Self {
        Self { out }
    }
}

impl<'w, W: Write> StructCodeGen for CStructCodeGen<'w, W> {
    fn begin_struct(&mut self, name: &str) -> fmt::Result {
        writeln!(self.out, "typedef struct {name} {{")
    }

    fn write_field(&mut self, field: &Field) -> fmt::Result {
        let mapping = field.mapping;
        if mapping.element_count > 1 {
            writeln!(
                self.out,
                "    {} {}[{}];",
                mapping.host_type(),
                field.name,
                mapping.element_count
            )
        } else {
            writeln!(self.out, "    {} {};", mapping.host_type(), field.name)
        }
    }

    fn end_struct(&mut self, name: &str) -> fmt::Result {
        writeln!(self.out, "}} {name};")
    }
}

impl<'a> HeaderEmitter<'a> {
    pub fn new(module: &'a ParsedModule, input_path: &'a str, guard: &'a str) -> Self {
        Self {
            module,
            input_path,
            guard,
        }
    }

    /// Emits the header. Declarations are walked in source order. Each layout gets at most one
    /// struct and at most one element table no matter how many declarations reference it.
    pub fn emit(&self, diagnostics: &mut Diagnostics) -> Result<Emitted, fmt::Error> {
        let guard = self.guard;
        let mut out = String::default();
        let mut items = 0;

        write_banner(&mut out, self.input_path)?;
        write!(out, "#ifndef {guard}\n#define {guard}\n\n")?;
        write!(
            out,
            "#include <stdint.h>\n#include <d3d11.h>\n#include <stddef.h>\n\n"
        )?;
        out.push_str(STATIC_ASSERT_PRELUDE);

        let mut structs = HashSet::<&str>::default();
        let mut tables = HashSet::<&str>::default();

        for decl in self.module.declarations() {
            if !decl.host_visibility.is_cpu_visible() {
                continue;
            }

            // Unresolved references were reported while parsing
            let Some(layout) = self.module.layout_of(decl) else {
                continue;
            };

            if structs.insert(layout.name()) {
                write_struct(&mut out, layout)?;
                items += 1;
            }

            if decl.kind == DeclarationKind::Vertex
                && decl.is_input
                && tables.insert(layout.name())
                && write_element_table(&mut out, layout, diagnostics)?
            {
                items += 1;
            }
        }

        writeln!(out, "#endif // {guard}")?;

        Ok(Emitted { text: out, items })
    }
}

/// Derives an include guard from an output basename: the final path component, upper-cased,
/// with every non-alphanumeric character replaced by `_`, suffixed with `_H_`.
pub fn header_guard(output_basename: &str) -> String {
    let base = output_basename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(output_basename);

    let mut guard: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    guard.push_str("_H_");
    guard
}

fn write_struct(out: &mut String, layout: &Layout) -> fmt::Result {
    layout.gen(&mut CStructCodeGen::new(out))?;

    let name = layout.name();
    let size = layout.host_layout().size;
    writeln!(
        out,
        "{STATIC_ASSERT_MACRO}(sizeof({name}) == {size}, \"{name} does not match its generated layout\");\n"
    )
}

/// Writes the element table for `layout`. Returns `false` if nothing was written because no
/// field carries a semantic.
fn write_element_table(
    out: &mut String,
    layout: &Layout,
    diagnostics: &mut Diagnostics,
) -> Result<bool, fmt::Error> {
    let name = layout.name();
    let host = layout.host_layout();

    let elements: Vec<_> = layout
        .fields()
        .iter()
        .zip(host.offsets.iter().copied())
        .filter(|(field, _)| !field.semantic.is_empty())
        .collect();

    if elements.is_empty() {
        diagnostics.warn(None, DiagnosticKind::NoSemantics(name.into()));
        return Ok(false);
    }

    let mut seen = HashSet::<(&str, u32)>::default();
    for (field, _) in &elements {
        if !seen.insert((field.semantic.as_str(), field.semantic_index)) {
            diagnostics.warn(
                None,
                DiagnosticKind::DuplicateSemantic {
                    layout: name.into(),
                    semantic: field.semantic.clone(),
                    index: field.semantic_index,
                },
            );
        }
    }

    writeln!(
        out,
        "static const D3D11_INPUT_ELEMENT_DESC {name}_desc[] = {{"
    )?;
    for (field, offset) in &elements {
        writeln!(
            out,
            "    {{ \"{}\", {}, {}, 0, {offset}, D3D11_INPUT_PER_VERTEX_DATA, 0 }},",
            field.semantic,
            field.semantic_index,
            field.mapping.format_tag()
        )?;
    }
    writeln!(out, "}};")?;
    writeln!(
        out,
        "static const unsigned int {name}_desc_count = sizeof({name}_desc) / sizeof({name}_desc[0]);"
    )?;

    for (field, offset) in &elements {
        writeln!(
            out,
            "{STATIC_ASSERT_MACRO}(offsetof({name}, {field}) == {offset}, \"{name}.{field} does not match its element offset\");",
            field = field.name
        )?;
    }
    writeln!(out)?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::Limits;

    fn emit(source: &str) -> (Emitted, Diagnostics) {
        let module = ParsedModule::parse_str(source, &Limits::default());
        let mut diagnostics = Diagnostics::new();
        let emitted = HeaderEmitter::new(&module, "test.vtx", "TEST_H_")
            .emit(&mut diagnostics)
            .unwrap();
        (emitted, diagnostics)
    }

    fn position_of(text: &str, needle: &str) -> usize {
        text.find(needle)
            .unwrap_or_else(|| panic!("`{needle}` missing from:\n{text}"))
    }

    #[test]
    fn guard_from_basename() {
        assert_eq!(header_guard("geometry_3d_pass.vtx"), "GEOMETRY_3D_PASS_VTX_H_");
        assert_eq!(header_guard("out/gen/ui-pass"), "UI_PASS_H_");
        assert_eq!(header_guard("code\\render\\ui pass"), "UI_PASS_H_");
    }

    #[test]
    fn vertex_input_struct_and_table() {
        let (emitted, diagnostics) = emit(
            "layout Vtx {\n  float3 pos : POSITION;\n  float3 col : COLOR;\n}\nvertex Vtx @vertex @input\n",
        );
        assert!(diagnostics.is_empty());
        assert_eq!(emitted.items, 2);

        let text = emitted.text;
        assert!(text.contains("typedef struct Vtx {\n    float pos[3];\n    float col[3];\n} Vtx;\n"));
        assert!(text.contains(
            "    { \"POSITION\", 0, DXGI_FORMAT_R32G32B32_FLOAT, 0, 0, D3D11_INPUT_PER_VERTEX_DATA, 0 },\n"
        ));
        assert!(text.contains(
            "    { \"COLOR\", 0, DXGI_FORMAT_R32G32B32_FLOAT, 0, 12, D3D11_INPUT_PER_VERTEX_DATA, 0 },\n"
        ));
        assert_eq!(text.matches("D3D11_INPUT_PER_VERTEX_DATA").count(), 2);
        assert!(text.contains("VTX_STATIC_ASSERT(sizeof(Vtx) == 24,"));
        assert!(text.contains("VTX_STATIC_ASSERT(offsetof(Vtx, col) == 12,"));
        assert!(text.contains("#ifndef TEST_H_\n#define TEST_H_\n"));
        assert!(text.ends_with("#endif // TEST_H_\n"));
    }

    #[test]
    fn static_asserts_compile_as_c_and_cpp() {
        let (emitted, _) = emit("layout Xform { matrix mvp; }\nbuffer Xform @b0\n");
        let text = emitted.text;

        let prelude = position_of(
            &text,
            "#ifdef __cplusplus\n\
             #define VTX_STATIC_ASSERT(cond, msg) static_assert(cond, msg)\n\
             #else\n\
             #define VTX_STATIC_ASSERT(cond, msg) _Static_assert(cond, msg)\n\
             #endif\n",
        );
        assert!(prelude > position_of(&text, "#include <stddef.h>"));
        assert!(prelude < position_of(&text, "typedef struct Xform"));

        // The raw C11 keyword only appears inside the macro definition
        assert_eq!(text.matches("_Static_assert").count(), 1);
        assert!(text.contains("VTX_STATIC_ASSERT(sizeof(Xform) == 64,"));
    }

    #[test]
    fn table_skips_fields_without_semantic() {
        let (emitted, _) = emit(
            "layout V {\n  float4 pos : SV_Position;\n  uint id;\n  float2 uv : TEXCOORD3;\n}\nvertex V @input\n",
        );
        let text = emitted.text;
        assert_eq!(text.matches("D3D11_INPUT_PER_VERTEX_DATA").count(), 2);
        assert!(text.contains("{ \"TEXCOORD\", 3, DXGI_FORMAT_R32G32_FLOAT, 0, 20,"));
    }

    #[test]
    fn shared_layout_emitted_once() {
        let (emitted, _) = emit(
            "layout Vtx { float3 pos : POSITION; }\nvertex Vtx @vertex @input\npixel Vtx @pixel @input\nbuffer Vtx @b1\n",
        );
        assert_eq!(emitted.text.matches("typedef struct Vtx {").count(), 1);
        assert_eq!(emitted.text.matches("Vtx_desc[] =").count(), 1);
    }

    #[test]
    fn table_follows_later_vertex_input() {
        let (emitted, _) = emit(
            "layout Vtx { float3 pos : POSITION; }\nbuffer Vtx\nvertex Vtx @input\n",
        );
        assert_eq!(emitted.text.matches("typedef struct Vtx {").count(), 1);
        assert_eq!(emitted.text.matches("Vtx_desc[] =").count(), 1);
    }

    #[test]
    fn gpu_only_and_resources_are_skipped() {
        let (emitted, _) = emit(
            "layout A { float a; }\nbuffer A @gpu\ntexture diffuseMap @b2\nsampler linear @b0\n",
        );
        assert_eq!(emitted.items, 0);
        assert!(!emitted.text.contains("typedef"));
        assert!(!emitted.text.contains("diffuseMap"));
    }

    #[test]
    fn matrix_buffer() {
        let (emitted, _) = emit("layout Xform {\n  matrix mvp;\n}\nbuffer Xform @cpu_gpu @b0\n");
        assert!(emitted
            .text
            .contains("typedef struct Xform {\n    float mvp[16];\n} Xform;\n"));
        assert!(!emitted.text.contains("Xform_desc"));
    }

    #[test]
    fn scalar_fields_have_no_array() {
        let (emitted, _) = emit("layout T { float time; index32 id; }\nbuffer T\n");
        assert!(emitted.text.contains("    float time;\n    uint32_t id;\n"));
    }

    #[test]
    fn input_without_semantics_has_no_table() {
        let (emitted, diagnostics) = emit("layout A { float a; }\nvertex A @input\n");
        assert!(!emitted.text.contains("A_desc"));
        assert!(diagnostics.any(|k| *k == DiagnosticKind::NoSemantics("A".into())));
    }

    #[test]
    fn duplicate_semantic_is_reported() {
        let (_, diagnostics) =
            emit("layout A { float a : TEXCOORD; float b : TEXCOORD0; }\nvertex A @input\n");
        assert!(diagnostics.any(|k| matches!(k, DiagnosticKind::DuplicateSemantic { .. })));
    }
}
