//! Wrapper for the `cutadapt` adapter trimmer.
//!
//! Removes a known 3' adapter from FASTQ reads. The tool reads gzip input
//! natively, so no staging is needed here.

use std::ffi::OsString;
use std::path::Path;

use tracing::info;

use super::{query_version, run_tool, ExternalsError};

const EXECUTABLE: &str = "cutadapt";

/// Parameters for a trimming run.
///
/// Optional fields that are `None` are omitted from the command line and
/// the tool's own defaults apply.
#[derive(Debug, Clone)]
pub struct TrimConfig {
    /// 3' adapter sequence to remove.
    pub adapter: String,
    /// Quality cutoff for trimming low-quality 3' ends before adapter
    /// removal (`-q`).
    pub qual_trim: Option<u32>,
    /// Discard reads shorter than this after trimming (`-m`).
    pub minimum_length: Option<u32>,
    /// Maximum allowed error rate in the adapter match (`-e`).
    pub error_rate: Option<f64>,
    /// Minimum overlap between read and adapter (`-O`).
    pub overlap: Option<u32>,
    /// Redirect reads without an adapter hit to this file
    /// (`--untrimmed-output`).
    pub untrimmed_output: Option<std::path::PathBuf>,
}

impl TrimConfig {
    /// Trim `adapter` with the tool's default settings.
    pub fn new(adapter: impl Into<String>) -> Self {
        Self {
            adapter: adapter.into(),
            qual_trim: None,
            minimum_length: None,
            error_rate: None,
            overlap: None,
            untrimmed_output: None,
        }
    }
}

/// Report the installed cutadapt version, e.g. `4.4`.
pub fn get_version() -> Result<String, ExternalsError> {
    query_version(EXECUTABLE, "--version")
}

/// True when cutadapt can be launched from `PATH`.
pub fn is_available() -> bool {
    super::is_available(EXECUTABLE)
}

/// Trim the adapter from every read in `reads`, writing to `reads_trimmed`.
///
/// Returns the tool's exit code unchanged.
pub fn run(
    reads: &Path,
    reads_trimmed: &Path,
    config: &TrimConfig,
) -> Result<i32, ExternalsError> {
    info!(
        reads = %reads.display(),
        output = %reads_trimmed.display(),
        adapter = %config.adapter,
        "trimming adapters"
    );
    run_tool(EXECUTABLE, &trim_args(reads, reads_trimmed, config))
}

/// Trim in place: `reads` is replaced by its trimmed version on success.
///
/// Trims into a temporary sibling file and renames it over the input only
/// when the tool exits with code 0. Any other outcome leaves the input
/// untouched.
pub fn run_overwrite(reads: &Path, config: &TrimConfig) -> Result<i32, ExternalsError> {
    let dir = reads.parent().filter(|p| !p.as_os_str().is_empty());
    let temp = tempfile::Builder::new()
        .prefix(".clipline-trim-")
        .suffix(".fastq")
        .tempfile_in(dir.unwrap_or_else(|| Path::new(".")))?;

    let code = run(reads, temp.path(), config)?;
    if code == 0 {
        temp.persist(reads).map_err(|err| ExternalsError::Io(err.error))?;
    }
    Ok(code)
}

fn trim_args(reads: &Path, reads_trimmed: &Path, config: &TrimConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--quiet".into(),
        "-a".into(),
        config.adapter.clone().into(),
    ];
    if let Some(qual) = config.qual_trim {
        args.push("-q".into());
        args.push(qual.to_string().into());
    }
    if let Some(min_len) = config.minimum_length {
        args.push("-m".into());
        args.push(min_len.to_string().into());
    }
    if let Some(rate) = config.error_rate {
        args.push("-e".into());
        args.push(rate.to_string().into());
    }
    if let Some(overlap) = config.overlap {
        args.push("-O".into());
        args.push(overlap.to_string().into());
    }
    if let Some(untrimmed) = &config.untrimmed_output {
        args.push("--untrimmed-output".into());
        args.push(untrimmed.into());
    }
    args.push("-o".into());
    args.push(reads_trimmed.into());
    args.push(reads.into());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn as_strings(args: &[OsString]) -> Vec<String> {
        args.iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn minimal_command_line() {
        let config = TrimConfig::new("AAAATTTTCCCCGGGG");
        let args = trim_args(
            Path::new("reads.fastq"),
            Path::new("trimmed.fastq"),
            &config,
        );
        assert_eq!(
            as_strings(&args),
            vec![
                "--quiet",
                "-a",
                "AAAATTTTCCCCGGGG",
                "-o",
                "trimmed.fastq",
                "reads.fastq",
            ]
        );
    }

    #[test]
    fn optional_parameters_appear_when_set() {
        let config = TrimConfig {
            qual_trim: Some(20),
            minimum_length: Some(17),
            error_rate: Some(0.1),
            overlap: Some(3),
            untrimmed_output: Some(PathBuf::from("untrimmed.fastq")),
            ..TrimConfig::new("ACGT")
        };
        let args = as_strings(&trim_args(
            Path::new("in.fastq"),
            Path::new("out.fastq"),
            &config,
        ));
        assert_eq!(
            args,
            vec![
                "--quiet",
                "-a",
                "ACGT",
                "-q",
                "20",
                "-m",
                "17",
                "-e",
                "0.1",
                "-O",
                "3",
                "--untrimmed-output",
                "untrimmed.fastq",
                "-o",
                "out.fastq",
                "in.fastq",
            ]
        );
    }
}
