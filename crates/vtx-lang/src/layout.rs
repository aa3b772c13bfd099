use crate::{
    catalog::{self, TypeMapping},
    diagnostics::{DiagnosticKind, Diagnostics},
    limits::Limits,
    scanner::Line,
};

/// Describes what kind of record a layout holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    /// At least one field carries a semantic.
    Vertex,
    /// No field carries a semantic. Only usable as plain data.
    Buffer,
}

/// A typed field of a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Type name as written in the source.
    pub dsl_type: String,
    /// Resolved catalog entry. The `float4` fallback for unknown types.
    pub mapping: &'static TypeMapping,
    pub name: String,
    /// Semantic without its index. Empty if the field has none.
    pub semantic: String,
    pub semantic_index: u32,
    pub is_normalized: bool,
}

/// A named, ordered list of fields. Field order is both struct member order and input slot
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    name: String,
    kind: LayoutKind,
    fields: Vec<Field>,
}

/// Byte placement of a layout's fields in the generated host struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLayout {
    /// Offset of every field, in field order.
    pub offsets: Vec<usize>,
    pub size: usize,
    pub align: usize,
}

/// Consumes the body of one `layout` block.
pub struct LayoutParser<'a> {
    limits: &'a Limits,
}

/// Field parsed from text, before type resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldSyntax<'a> {
    dsl_type: &'a str,
    name: &'a str,
    semantic: &'a str,
    semantic_index: u32,
    is_normalized: bool,
}

impl Layout {
    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    #[inline(always)]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Computes field offsets the way a C compiler lays out the generated struct. Every field is
    /// an array of one naturally aligned scalar, so each is placed at the next multiple of its
    /// scalar size and the struct is padded to its largest alignment.
    pub fn host_layout(&self) -> HostLayout {
        let mut offsets = Vec::with_capacity(self.fields.len());
        let mut cursor: usize = 0;
        let mut align: usize = 1;

        for field in &self.fields {
            let field_align = field.mapping.host_align();
            cursor = cursor.next_multiple_of(field_align);
            offsets.push(cursor);
            cursor += field.mapping.host_size();
            align = align.max(field_align);
        }

        HostLayout {
            offsets,
            size: cursor.next_multiple_of(align),
            align,
        }
    }
}

impl<'a> LayoutParser<'a> {
    pub fn new(limits: &'a Limits) -> Self {
        Self { limits }
    }

    /// Parses the block of layout `name`.
    ///
    /// `header_rest` is whatever followed the name on the `layout` line. The opening brace may
    /// be there or on any later line. Lines are consumed up to and including the closing `}`.
    /// Malformed field lines are reported to `diagnostics` and skipped. An `Err` means the whole
    /// layout must be dropped.
    pub fn parse<'s>(
        &self,
        name: &str,
        header_line: usize,
        header_rest: &'s str,
        lines: &mut impl Iterator<Item = Line<'s>>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Layout, DiagnosticKind> {
        let mut builder = LayoutBuilder {
            name,
            max_fields: self.limits.max_fields,
            fields: Vec::default(),
            overflowed: false,
        };

        // Find the opening brace
        let (open_line, after_brace) = match header_rest.split_once('{') {
            Some((_, after)) => (header_line, after),
            None => loop {
                match lines.next() {
                    Some(line) => {
                        if let Some((_, after)) = line.text.split_once('{') {
                            break (line.number, after);
                        }
                    }
                    None => return Err(DiagnosticKind::MissingLayoutBody(name.into())),
                }
            },
        };

        // Whole body on one line
        if let Some((body, _)) = after_brace.split_once('}') {
            for statement in body.split(';') {
                if !statement.trim().is_empty() {
                    builder.add(statement, Some(open_line), diagnostics);
                }
            }
            return builder.build();
        }

        if !after_brace.trim().is_empty() {
            builder.add(after_brace, Some(open_line), diagnostics);
        }

        let mut closed = false;
        for line in lines.by_ref() {
            if line.text.starts_with('}') {
                closed = true;
                break;
            }
            builder.add(line.text, Some(line.number), diagnostics);
        }

        if !closed {
            diagnostics.warn(None, DiagnosticKind::UnterminatedLayout(name.into()));
        }

        builder.build()
    }
}

struct LayoutBuilder<'n> {
    name: &'n str,
    max_fields: usize,
    fields: Vec<Field>,
    overflowed: bool,
}

impl<'n> LayoutBuilder<'n> {
    fn add(&mut self, text: &str, line: Option<usize>, diagnostics: &mut Diagnostics) {
        // Keep consuming the block after overflowing so the rest of it isn't read as top level
        if self.overflowed {
            return;
        }

        if self.fields.len() >= self.max_fields {
            self.overflowed = true;
            return;
        }

        let Some(syntax) = parse_field(text) else {
            diagnostics.warn(line, DiagnosticKind::MalformedField(text.trim().into()));
            return;
        };

        if self.fields.iter().any(|f| f.name == syntax.name) {
            diagnostics.warn(
                line,
                DiagnosticKind::DuplicateField {
                    layout: self.name.into(),
                    field: syntax.name.into(),
                },
            );
            return;
        }

        let resolution = catalog::resolve(syntax.dsl_type);
        if resolution.is_fallback() {
            diagnostics.warn(line, DiagnosticKind::UnknownType(syntax.dsl_type.into()));
        }

        self.fields.push(Field {
            dsl_type: syntax.dsl_type.into(),
            mapping: resolution.mapping(),
            name: syntax.name.into(),
            semantic: syntax.semantic.into(),
            semantic_index: syntax.semantic_index,
            is_normalized: syntax.is_normalized,
        });
    }

    fn build(self) -> Result<Layout, DiagnosticKind> {
        if self.overflowed {
            return Err(DiagnosticKind::TooManyFields {
                layout: self.name.into(),
                max: self.max_fields,
            });
        }

        if self.fields.is_empty() {
            return Err(DiagnosticKind::EmptyLayout(self.name.into()));
        }

        let kind = if self.fields.iter().any(|f| !f.semantic.is_empty()) {
            LayoutKind::Vertex
        } else {
            LayoutKind::Buffer
        };

        Ok(Layout {
            name: self.name.into(),
            kind,
            fields: self.fields,
        })
    }
}

/// Returns `true` if `s` is a C-style identifier.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Parses `<type> <name> [: <SEMANTIC>[<index>] [normalized|norm]] [;]`.
fn parse_field(text: &str) -> Option<FieldSyntax<'_>> {
    // Anything after the terminator is ignored
    let text = text.split(';').next().unwrap_or_default();

    let (decl, semantic_clause) = match text.split_once(':') {
        Some((decl, clause)) => (decl, Some(clause)),
        None => (text, None),
    };

    let mut tokens = decl.split_whitespace();
    let (Some(dsl_type), Some(name), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return None;
    };

    if !is_identifier(dsl_type) || !is_identifier(name) {
        return None;
    }

    let mut field = FieldSyntax {
        dsl_type,
        name,
        semantic: "",
        semantic_index: 0,
        is_normalized: false,
    };

    let Some(clause) = semantic_clause else {
        return Some(field);
    };

    let mut tokens = clause.split_whitespace();
    let semantic_token = tokens.next()?;

    // A trailing run of digits is the semantic index
    let semantic = semantic_token.trim_end_matches(|c: char| c.is_ascii_digit());
    if !is_identifier(semantic) {
        return None;
    }

    let digits = &semantic_token[semantic.len()..];
    if !digits.is_empty() {
        field.semantic_index = digits.parse().ok()?;
    }

    field.semantic = semantic;
    field.is_normalized = tokens.any(|t| t == "normalized" || t == "norm");

    Some(field)
}
