//! Wrappers around external command-line tools.
//!
//! Each wrapper validates its filesystem preconditions, assembles a command
//! line from typed parameters, spawns the tool, and hands back the exit
//! code unchanged. A non-zero exit code is a value, not an error; only
//! precondition and launch failures produce `Err`.

pub mod cutadapt;
pub mod star;

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use flate2::read::MultiGzDecoder;
use tempfile::TempPath;
use thiserror::Error;
use tracing::debug;

/// Errors raised by the external-tool wrappers.
#[derive(Debug, Error)]
pub enum ExternalsError {
    /// The output directory must exist before the tool is invoked.
    #[error("Output directory does not exist. Make sure it does.")]
    OutputDirMissing,

    /// The genome index directory must exist before mapping.
    #[error("Directory with genome index does not exist. Make sure it does.")]
    GenomeIndexMissing,

    /// The executable could not be found on `PATH`.
    #[error("`{0}` executable not found on PATH")]
    ToolMissing(&'static str),

    /// The process could not be spawned or awaited.
    #[error("failed to run `{tool}`")]
    Launch {
        /// Executable name.
        tool: &'static str,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The tool produced output the wrapper could not interpret.
    #[error("unexpected output from `{tool}`: {detail}")]
    UnexpectedOutput {
        /// Executable name.
        tool: &'static str,
        /// What was wrong with the output.
        detail: String,
    },

    /// An input file could not be read or parsed.
    #[error("invalid input {path}: {detail}")]
    Input {
        /// Offending file.
        path: PathBuf,
        /// Parse or I/O failure description.
        detail: String,
    },

    /// Filesystem error while staging inputs or publishing outputs.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// True when `tool` can be launched from `PATH`.
pub fn is_available(tool: &str) -> bool {
    Command::new(tool)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Spawn `tool` with `args`, wait for it, and return its exit code.
///
/// Stdio is inherited so the tool's own progress output reaches the user.
/// Termination by signal has no code to propagate and maps to `-1`.
pub(crate) fn run_tool(tool: &'static str, args: &[OsString]) -> Result<i32, ExternalsError> {
    debug!(tool, ?args, "invoking external tool");
    let status = Command::new(tool)
        .args(args)
        .status()
        .map_err(|err| launch_error(tool, err))?;
    Ok(status.code().unwrap_or(-1))
}

/// Run `tool <flag>` and return the first trimmed line of its stdout.
pub(crate) fn query_version(tool: &'static str, flag: &str) -> Result<String, ExternalsError> {
    let output = Command::new(tool)
        .arg(flag)
        .output()
        .map_err(|err| launch_error(tool, err))?;
    if !output.status.success() {
        return Err(ExternalsError::UnexpectedOutput {
            tool,
            detail: format!("version query exited with {}", output.status),
        });
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    match stdout.lines().map(str::trim).find(|line| !line.is_empty()) {
        Some(version) => Ok(version.to_string()),
        None => Err(ExternalsError::UnexpectedOutput {
            tool,
            detail: "empty version output".to_string(),
        }),
    }
}

fn launch_error(tool: &'static str, err: io::Error) -> ExternalsError {
    if err.kind() == io::ErrorKind::NotFound {
        ExternalsError::ToolMissing(tool)
    } else {
        ExternalsError::Launch { tool, source: err }
    }
}

/// A tool input staged as a plain (uncompressed) file.
///
/// Gzip inputs are decompressed into a named temporary file that is removed
/// when the guard drops; plain inputs pass through untouched.
pub(crate) enum StagedInput {
    Plain(PathBuf),
    Decompressed(TempPath),
}

impl StagedInput {
    pub(crate) fn path(&self) -> &Path {
        match self {
            StagedInput::Plain(path) => path,
            StagedInput::Decompressed(temp) => temp,
        }
    }
}

/// Stage `path` for a tool that only reads plain files.
pub(crate) fn stage_input(path: &Path) -> Result<StagedInput, ExternalsError> {
    if path.extension().and_then(|e| e.to_str()) != Some("gz") {
        return Ok(StagedInput::Plain(path.to_path_buf()));
    }

    debug!(path = %path.display(), "decompressing gzip input to a temporary file");
    let file = File::open(path)?;
    let mut decoder = MultiGzDecoder::new(BufReader::new(file));

    // Keep the inner extension (`reads.fastq.gz` stages as `*.fastq`) for
    // tools that sniff formats by suffix.
    let inner_ext = path
        .file_stem()
        .map(Path::new)
        .and_then(|stem| stem.extension())
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let mut temp = tempfile::Builder::new()
        .prefix("clipline-")
        .suffix(&inner_ext)
        .tempfile()?;
    io::copy(&mut decoder, temp.as_file_mut())?;

    Ok(StagedInput::Decompressed(temp.into_temp_path()))
}
