use std::path::Path;

use crate::{
    declaration::{Declaration, DeclarationKind},
    diagnostics::{DiagnosticKind, Diagnostics},
    error::CompileError,
    layout::{Layout, LayoutParser},
    limits::Limits,
    scanner::{Line, LineScanner},
};

/// Keyword opening a layout block.
pub const LAYOUT_KEYWORD: &str = "layout";

/// Shape of one top-level line, decided once from its leading keyword.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Statement<'a> {
    /// `layout <name> ...`. `rest` is everything after the keyword.
    Layout { rest: &'a str },
    /// `<keyword> <ref> <attrs...>`. `rest` is everything after the keyword.
    Declaration {
        kind: DeclarationKind,
        rest: &'a str,
    },
    /// Anything else.
    Unrecognized,
}

/// One compilation unit: every layout and declaration of a single input.
#[derive(Debug, Default)]
pub struct ParsedModule {
    layouts: Vec<Layout>,
    declarations: Vec<Declaration>,
    diagnostics: Diagnostics,
}

impl<'a> Statement<'a> {
    pub fn classify(text: &'a str) -> Self {
        let (keyword, rest) = match text.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest),
            None => (text, ""),
        };

        // Allow `layout Name{` and `layout{` to reach the layout parser
        if keyword == LAYOUT_KEYWORD {
            return Statement::Layout { rest };
        }
        if let Some(rest) = keyword
            .strip_prefix(LAYOUT_KEYWORD)
            .filter(|rest| rest.starts_with('{'))
        {
            return Statement::Layout { rest };
        }

        match DeclarationKind::from_keyword(keyword.trim_end_matches(';')) {
            Some(kind) => Statement::Declaration { kind, rest },
            None => Statement::Unrecognized,
        }
    }
}

impl ParsedModule {
    /// Reads and parses the file at `path`. Failing to read it is the only fatal error.
    pub fn parse_file(path: impl AsRef<Path>, limits: &Limits) -> Result<Self, CompileError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| CompileError::ReadInput {
            path: path.into(),
            source,
        })?;
        Ok(Self::parse_str(&source, limits))
    }

    /// Parses `source`. Never fails; every problem is recorded in [`ParsedModule::diagnostics`]
    /// and the offending unit is dropped.
    pub fn parse_str(source: &str, limits: &Limits) -> Self {
        let mut module = ParsedModule::default();
        let layout_parser = LayoutParser::new(limits);
        let mut lines = LineScanner::new(source);

        while let Some(line) = lines.next() {
            match Statement::classify(line.text) {
                Statement::Layout { rest } => {
                    module.parse_layout(&layout_parser, line, rest, &mut lines, limits)
                }
                Statement::Declaration { kind, rest } => {
                    module.parse_declaration(kind, line, rest, limits)
                }
                Statement::Unrecognized => {}
            }
        }

        module.check_references();
        module
    }

    fn parse_layout<'s>(
        &mut self,
        parser: &LayoutParser,
        header: Line<'s>,
        rest: &'s str,
        lines: &mut LineScanner<'s>,
        limits: &Limits,
    ) {
        let head = rest.split('{').next().unwrap_or_default();
        let name = head.split_whitespace().next();
        let header_rest = match name {
            Some(name) => rest.split_once(name).map(|(_, after)| after).unwrap_or(rest),
            None => rest,
        };

        // The block is consumed even when the layout ends up dropped
        let layout = parser.parse(
            name.unwrap_or_default(),
            header.number,
            header_rest,
            lines,
            &mut self.diagnostics,
        );

        if name.is_none() {
            self.diagnostics
                .error(Some(header.number), DiagnosticKind::MissingLayoutName);
            return;
        }

        let layout = match layout {
            Ok(layout) => layout,
            Err(err) => {
                self.diagnostics.error(Some(header.number), err);
                return;
            }
        };

        if self.layout(layout.name()).is_some() {
            self.diagnostics.error(
                Some(header.number),
                DiagnosticKind::DuplicateLayout(layout.name().into()),
            );
            return;
        }

        if self.layouts.len() >= limits.max_layouts {
            self.diagnostics.error(
                Some(header.number),
                DiagnosticKind::TooManyLayouts(limits.max_layouts),
            );
            return;
        }

        self.layouts.push(layout);
    }

    fn parse_declaration(
        &mut self,
        kind: DeclarationKind,
        line: Line,
        rest: &str,
        limits: &Limits,
    ) {
        if self.declarations.len() >= limits.max_declarations {
            self.diagnostics.error(
                Some(line.number),
                DiagnosticKind::TooManyDeclarations(limits.max_declarations),
            );
            return;
        }

        match Declaration::parse(kind, rest, line.number) {
            Ok(decl) => self.declarations.push(decl),
            Err(err) => self.diagnostics.error(Some(line.number), err),
        }
    }

    /// Layouts may be defined after the declarations using them, so references are only checked
    /// once the whole input is read.
    fn check_references(&mut self) {
        for decl in &self.declarations {
            let Some(layout_ref) = decl.layout_ref() else {
                continue;
            };

            if !self.layouts.iter().any(|l| l.name() == layout_ref) {
                self.diagnostics.warn(
                    Some(decl.line),
                    DiagnosticKind::UnknownLayout(layout_ref.into()),
                );
            }
        }
    }

    /// Finds a layout by name.
    pub fn layout(&self, name: &str) -> Option<&Layout> {
        self.layouts.iter().find(|l| l.name() == name)
    }

    /// The layout a declaration refers to, if it names one that exists.
    pub fn layout_of(&self, decl: &Declaration) -> Option<&Layout> {
        decl.layout_ref().and_then(|name| self.layout(name))
    }

    #[inline(always)]
    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    /// Declarations in source order.
    #[inline(always)]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    #[inline(always)]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::HostVisibility;

    #[test]
    fn classify_statements() {
        assert_eq!(
            Statement::classify("layout Vtx {"),
            Statement::Layout { rest: "Vtx {" }
        );
        assert_eq!(
            Statement::classify("layout{"),
            Statement::Layout { rest: "{" }
        );
        assert_eq!(
            Statement::classify("texture diffuse @b2"),
            Statement::Declaration {
                kind: DeclarationKind::Texture,
                rest: "diffuse @b2"
            }
        );
        assert_eq!(
            Statement::classify("vertex"),
            Statement::Declaration {
                kind: DeclarationKind::Vertex,
                rest: ""
            }
        );
        assert_eq!(Statement::classify("layouts Vtx"), Statement::Unrecognized);
        assert_eq!(Statement::classify("}"), Statement::Unrecognized);
    }

    #[test]
    fn forward_references_resolve() {
        let module = ParsedModule::parse_str(
            "vertex Vtx @vertex @input\nlayout Vtx\n{\n  float3 pos : POSITION;\n}\n",
            &Limits::default(),
        );
        assert!(module.diagnostics().is_empty());
        let decl = &module.declarations()[0];
        assert_eq!(module.layout_of(decl).unwrap().name(), "Vtx");
    }

    #[test]
    fn unknown_layout_is_reported_once() {
        let module = ParsedModule::parse_str("buffer Missing @b0\n", &Limits::default());
        assert_eq!(module.declarations().len(), 1);
        assert_eq!(module.diagnostics().len(), 1);
        assert!(module
            .diagnostics()
            .any(|k| *k == DiagnosticKind::UnknownLayout("Missing".into())));
    }

    #[test]
    fn empty_layout_does_not_abort() {
        let module = ParsedModule::parse_str(
            "layout Empty {\n  nonsense\n}\nlayout Vtx { float a : A; }\nbuffer Vtx\n",
            &Limits::default(),
        );
        assert_eq!(module.layouts().len(), 1);
        assert!(module.layout("Empty").is_none());
        assert!(module
            .diagnostics()
            .any(|k| *k == DiagnosticKind::EmptyLayout("Empty".into())));
        assert_eq!(module.declarations().len(), 1);
    }

    #[test]
    fn keyword_without_reference_is_rejected() {
        let module = ParsedModule::parse_str(
            "vertex\npixel ;\ntexture t @b1\n",
            &Limits::default(),
        );
        assert_eq!(module.declarations().len(), 1);
        assert_eq!(module.declarations()[0].resource_name(), Some("t"));
        let malformed = module
            .diagnostics()
            .iter()
            .filter(|d| matches!(d.kind, DiagnosticKind::MalformedDeclaration(_)))
            .count();
        assert_eq!(malformed, 2);
    }

    #[test]
    fn capacity_overflow_drops_only_the_excess() {
        let limits = Limits {
            max_layouts: 1,
            max_fields: 32,
            max_declarations: 2,
        };
        let module = ParsedModule::parse_str(
            "layout A {\nfloat a;\n}\nlayout B {\nfloat b;\n}\n\
             texture t0\ntexture t1\ntexture t2\ntexture t3\n",
            &limits,
        );
        assert_eq!(module.layouts().len(), 1);
        assert_eq!(module.layouts()[0].name(), "A");
        assert_eq!(module.declarations().len(), 2);
        assert!(module
            .diagnostics()
            .any(|k| *k == DiagnosticKind::TooManyLayouts(1)));
        let overflowed = module
            .diagnostics()
            .iter()
            .filter(|d| d.kind == DiagnosticKind::TooManyDeclarations(2))
            .count();
        assert_eq!(overflowed, 2);
    }

    #[test]
    fn unterminated_layout_swallows_the_rest() {
        let module = ParsedModule::parse_str(
            "layout V {\n float3 p : POSITION;\nvertex V @input\n",
            &Limits::default(),
        );
        assert_eq!(module.layouts().len(), 1);
        assert_eq!(module.layouts()[0].fields().len(), 1);
        assert!(module.declarations().is_empty());
        assert!(module
            .diagnostics()
            .any(|k| *k == DiagnosticKind::MalformedField("vertex V @input".into())));
        assert!(module
            .diagnostics()
            .any(|k| *k == DiagnosticKind::UnterminatedLayout("V".into())));
    }

    #[test]
    fn duplicate_layout_keeps_first() {
        let module = ParsedModule::parse_str(
            "layout A { float a; }\nlayout A { int b; }\n",
            &Limits::default(),
        );
        assert_eq!(module.layouts().len(), 1);
        assert_eq!(module.layouts()[0].fields()[0].name, "a");
        assert!(module
            .diagnostics()
            .any(|k| *k == DiagnosticKind::DuplicateLayout("A".into())));
    }

    #[test]
    fn missing_layout_name_skips_block() {
        let module = ParsedModule::parse_str(
            "layout {\nfloat a;\n}\ntexture t\n",
            &Limits::default(),
        );
        assert!(module.layouts().is_empty());
        assert_eq!(module.declarations().len(), 1);
        assert!(module
            .diagnostics()
            .any(|k| *k == DiagnosticKind::MissingLayoutName));
    }

    #[test]
    fn comments_are_ignored_everywhere() {
        let module = ParsedModule::parse_str(
            "// top\nlayout X {\n// inside\nmatrix mvp;\n}\n// vertex Nope\nbuffer X @cpu_gpu @b0\n",
            &Limits::default(),
        );
        assert!(module.diagnostics().is_empty());
        assert_eq!(module.declarations().len(), 1);
        assert_eq!(
            module.declarations()[0].host_visibility,
            HostVisibility::Both
        );
    }
}
