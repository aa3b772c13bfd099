pub mod c_header;
pub mod hlsl;

use std::fmt;

use crate::layout::{Field, Layout};

pub trait StructCodeGen {
    fn begin_struct(&mut self, name: &str) -> fmt::Result;
    fn write_field(&mut self, field: &Field) -> fmt::Result;
    fn end_struct(&mut self, name: &str) -> fmt::Result;
}

/// Text produced by an emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    pub text: String,
    /// Number of structs, tables, buffers and resources written. Zero means the output holds
    /// nothing but boilerplate.
    pub items: usize,
}

impl Layout {
    pub fn gen(&self, code_gen: &mut impl StructCodeGen) -> fmt::Result {
        code_gen.begin_struct(self.name())?;
        for field in self.fields() {
            code_gen.write_field(field)?;
        }
        code_gen.end_struct(self.name())
    }
}

/// Writes the comment block every generated file opens with.
pub(crate) fn write_banner(out: &mut impl fmt::Write, input_path: &str) -> fmt::Result {
    write!(
        out,
        "/**\n * @file\n * @brief Auto-generated file from {input_path}.\n * Do not edit manually.\n */\n\n"
    )
}
