//! Compiler for `.vtx` shader interface descriptions.
//!
//! A `.vtx` file declares record layouts and binds them (or raw resources) to shader stages.
//! From one such file the compiler generates a C header describing the host-side structs and
//! vertex input elements, and an HLSL fragment declaring the matching stage inputs, constant
//! buffers and resources. Both outputs are derived from the same parsed module, so shared
//! layouts always agree on field order, count and semantics.

pub mod catalog;
pub mod code_gen;
pub mod compile;
pub mod declaration;
pub mod diagnostics;
pub mod error;
pub mod layout;
pub mod limits;
pub mod module;
pub mod scanner;

pub mod prelude {
    pub use crate::{
        catalog::{HostScalar, TypeMapping, TypeResolution, VertexFormat},
        code_gen::{
            c_header::{header_guard, HeaderEmitter},
            hlsl::ShaderEmitter,
            Emitted, StructCodeGen,
        },
        compile::{Compiled, Compiler, OutputPaths},
        declaration::{Declaration, DeclarationKind, DeclarationTarget, HostVisibility},
        diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity},
        error::CompileError,
        layout::{Field, HostLayout, Layout, LayoutKind, LayoutParser},
        limits::Limits,
        module::ParsedModule,
        scanner::{Line, LineScanner},
    };
}
