//! Wrapper around the downstream rule-set compilers.
//!
//! The merge never depends on this step. `rsm compile` runs it afterwards to
//! turn each written document into the binary form its client loads:
//!
//! | Format | Compiler | Command                                             |
//! |--------|----------|-----------------------------------------------------|
//! | JSON   | sing-box | `sing-box rule-set compile <in> -o <in>.srs`        |
//! | YAML   | mihomo   | `mihomo convert-ruleset <type> yaml <in> <in>.mrs`  |

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use rsm_types::Format;

use crate::config::CompilerSettings;
use crate::error::CompileError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompilerKind {
    SingBox,
    Mihomo,
}

impl CompilerKind {
    pub fn for_format(format: Format) -> Self {
        match format {
            Format::Json => Self::SingBox,
            Format::Yaml => Self::Mihomo,
        }
    }

    /// Extension of the compiled binary rule-set.
    pub fn output_extension(self) -> &'static str {
        match self {
            Self::SingBox => "srs",
            Self::Mihomo => "mrs",
        }
    }
}

/// A successful compile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOutcome {
    pub output: PathBuf,
    /// Whatever the compiler printed to stdout.
    pub stdout: String,
}

#[derive(Clone, Debug)]
pub struct Compiler {
    kind: CompilerKind,
    executable: PathBuf,
    rule_type: String,
}

impl Compiler {
    pub fn new(kind: CompilerKind, executable: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            executable: executable.into(),
            rule_type: "domain".to_string(),
        }
    }

    pub fn from_settings(format: Format, settings: &CompilerSettings) -> Self {
        Self::new(CompilerKind::for_format(format), &settings.executable)
            .with_rule_type(settings.rule_type.clone())
    }

    /// Rule behavior for mihomo. Ignored by sing-box.
    pub fn with_rule_type(mut self, rule_type: impl Into<String>) -> Self {
        self.rule_type = rule_type.into();
        self
    }

    pub fn kind(&self) -> CompilerKind {
        self.kind
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// The compiled file written next to `input`.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        input.with_extension(self.kind.output_extension())
    }

    /// Arguments passed to the executable for `input`.
    pub fn command_args(&self, input: &Path) -> Vec<OsString> {
        let output = self.output_path(input);
        match self.kind {
            CompilerKind::SingBox => vec![
                "rule-set".into(),
                "compile".into(),
                input.into(),
                "-o".into(),
                output.into(),
            ],
            CompilerKind::Mihomo => vec![
                "convert-ruleset".into(),
                self.rule_type.clone().into(),
                "yaml".into(),
                input.into(),
                output.into(),
            ],
        }
    }

    /// Compile one document, capturing the compiler's output.
    pub fn compile(&self, input: &Path) -> Result<CompileOutcome, CompileError> {
        if !self.executable.is_file() {
            return Err(CompileError::MissingExecutable(self.executable.clone()));
        }
        if !input.is_file() {
            return Err(CompileError::MissingInput(input.to_path_buf()));
        }

        tracing::debug!(
            executable = %self.executable.display(),
            input = %input.display(),
            "running compiler"
        );
        let output = Command::new(&self.executable)
            .args(self.command_args(input))
            .output()
            .map_err(|source| CompileError::Spawn {
                executable: self.executable.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CompileError::Failed {
                input: input.to_path_buf(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(CompileOutcome {
            output: self.output_path(input),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        })
    }
}
