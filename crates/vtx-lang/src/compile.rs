use std::path::{Path, PathBuf};

use vtx_log::info;

use crate::{
    code_gen::{
        c_header::{header_guard, HeaderEmitter},
        hlsl::ShaderEmitter,
        Emitted,
    },
    diagnostics::Diagnostics,
    error::CompileError,
    limits::Limits,
    module::ParsedModule,
};

/// Extension of the generated host header.
pub const HEADER_EXTENSION: &str = ".h";
/// Extension of the generated shader fragment.
pub const SHADER_EXTENSION: &str = ".hlsl";

/// Runs the parser and both emitters over one input.
#[derive(Debug, Default, Clone)]
pub struct Compiler {
    limits: Limits,
}

/// Both generated texts for one input, plus every diagnostic raised producing them.
#[derive(Debug)]
pub struct Compiled {
    pub header: Emitted,
    pub shader: Emitted,
    pub layout_count: usize,
    pub declaration_count: usize,
    pub diagnostics: Diagnostics,
}

/// Paths of the two generated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub header: PathBuf,
    pub shader: PathBuf,
}

impl OutputPaths {
    /// Appends the extensions to `output_basename`. No directories are created.
    pub fn new(output_basename: &str) -> Self {
        Self {
            header: format!("{output_basename}{HEADER_EXTENSION}").into(),
            shader: format!("{output_basename}{SHADER_EXTENSION}").into(),
        }
    }
}

impl Compiler {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    #[inline(always)]
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Compiles `source` in memory. `input_path` is only used in the generated banners and
    /// `output_basename` only to derive the include guard.
    pub fn compile_str(
        &self,
        source: &str,
        input_path: &str,
        output_basename: &str,
    ) -> Result<Compiled, CompileError> {
        let module = ParsedModule::parse_str(source, &self.limits);
        self.emit(module, input_path, output_basename)
    }

    /// Reads `input`, compiles it and writes `<output_basename>.h` and
    /// `<output_basename>.hlsl`.
    pub fn compile_file(
        &self,
        input: &Path,
        output_basename: &str,
    ) -> Result<(Compiled, OutputPaths), CompileError> {
        let module = ParsedModule::parse_file(input, &self.limits)?;
        let input_path = input.display().to_string();

        info!(
            "Parsed {input_path}: {} layouts and {} declarations.",
            module.layouts().len(),
            module.declarations().len()
        );

        let compiled = self.emit(module, &input_path, output_basename)?;
        let paths = OutputPaths::new(output_basename);
        write_outputs(&paths, &compiled)?;

        info!(
            "Successfully generated: {} and {}",
            paths.header.display(),
            paths.shader.display()
        );

        Ok((compiled, paths))
    }

    fn emit(
        &self,
        module: ParsedModule,
        input_path: &str,
        output_basename: &str,
    ) -> Result<Compiled, CompileError> {
        let guard = header_guard(output_basename);
        let mut diagnostics = Diagnostics::new();

        let header = HeaderEmitter::new(&module, input_path, &guard).emit(&mut diagnostics)?;
        let shader = ShaderEmitter::new(&module, input_path).emit(&mut diagnostics)?;

        if header.items == 0 && shader.items == 0 {
            return Err(CompileError::NothingToEmit(input_path.into()));
        }

        let layout_count = module.layouts().len();
        let declaration_count = module.declarations().len();

        // Parse diagnostics come first so the record stays in pipeline order
        let mut all = module.into_diagnostics();
        all.extend(diagnostics);

        Ok(Compiled {
            header,
            shader,
            layout_count,
            declaration_count,
            diagnostics: all,
        })
    }
}

/// Writes both outputs next to their final paths and renames them into place only once both
/// writes succeeded, so a failure never leaves one half-written file behind. If the header is
/// already in place when the shader rename fails, the header is removed again so a fresh header
/// never sits next to a stale shader.
fn write_outputs(paths: &OutputPaths, compiled: &Compiled) -> Result<(), CompileError> {
    let header_tmp = staging_path(&paths.header);
    let shader_tmp = staging_path(&paths.shader);

    let result = write(&header_tmp, &compiled.header.text)
        .and_then(|_| write(&shader_tmp, &compiled.shader.text))
        .and_then(|_| rename(&header_tmp, &paths.header))
        .and_then(|_| {
            rename(&shader_tmp, &paths.shader).map_err(|err| {
                let _ = std::fs::remove_file(&paths.header);
                err
            })
        });

    if result.is_err() {
        let _ = std::fs::remove_file(&header_tmp);
        let _ = std::fs::remove_file(&shader_tmp);
    }

    result
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    staging.into()
}

fn write(path: &Path, contents: &str) -> Result<(), CompileError> {
    std::fs::write(path, contents).map_err(|source| CompileError::WriteOutput {
        path: path.into(),
        source,
    })
}

fn rename(from: &Path, to: &Path) -> Result<(), CompileError> {
    std::fs::rename(from, to).map_err(|source| CompileError::WriteOutput {
        path: to.into(),
        source,
    })
}
