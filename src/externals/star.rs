//! Wrapper for the `STAR` spliced aligner.
//!
//! Two operations: building a genome index from a FASTA reference
//! (optionally splice-aware via a GTF annotation) and mapping reads against
//! an existing index. Both check their directory preconditions before any
//! process is spawned, and both accept gzip-compressed inputs by staging
//! them as plain temporary files.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{query_version, run_tool, stage_input, ExternalsError};
use crate::fastx;

const EXECUTABLE: &str = "STAR";

/// Largest suffix-array pre-index size the aligner accepts by default.
const MAX_SA_INDEX_NBASES: u32 = 14;

/// Parameters for genome index construction.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// GTF annotation enabling splice-junction aware indexing.
    pub annotation: Option<PathBuf>,
    /// Bases to index on each side of annotated junctions
    /// (`--sjdbOverhang`); ideally read length minus one.
    pub overhang: u32,
    /// Minimum overhang for spliced alignments (`--alignSJoverhangMin`).
    pub overhang_min: u32,
    /// Worker threads handed to the tool (`--runThreadN`).
    pub threads: u32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            annotation: None,
            overhang: 100,
            overhang_min: 8,
            threads: 1,
        }
    }
}

/// Parameters for mapping reads against an index.
#[derive(Debug, Clone)]
pub struct MapConfig {
    /// GTF annotation for on-the-fly junction insertion.
    pub annotation: Option<PathBuf>,
    /// Maximum number of loci a read may map to
    /// (`--outFilterMultimapNmax`).
    pub multimax: u32,
    /// Maximum mismatches per read pair (`--outFilterMismatchNmax`).
    pub mismatches: u32,
    /// Worker threads handed to the tool (`--runThreadN`).
    pub threads: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            annotation: None,
            multimax: 10,
            mismatches: 2,
            threads: 1,
        }
    }
}

/// Report the installed STAR version, e.g. `2.7.10b` or `STAR_2.5.0a`.
pub fn get_version() -> Result<String, ExternalsError> {
    query_version(EXECUTABLE, "--version")
}

/// True when STAR can be launched from `PATH`.
pub fn is_available() -> bool {
    super::is_available(EXECUTABLE)
}

/// Build a genome index for `genome` inside `index_dir`.
///
/// `index_dir` must already exist. Returns the tool's exit code unchanged.
pub fn build_index(
    genome: &Path,
    index_dir: &Path,
    config: &IndexConfig,
) -> Result<i32, ExternalsError> {
    if !index_dir.is_dir() {
        debug!(path = %index_dir.display(), "index output directory missing");
        return Err(ExternalsError::OutputDirMissing);
    }

    let genome_staged = stage_input(genome)?;
    let genome_length = fastx::total_sequence_length(genome_staged.path()).map_err(|err| {
        ExternalsError::Input {
            path: genome.to_path_buf(),
            detail: format!("{err:#}"),
        }
    })?;
    let annotation_staged = config
        .annotation
        .as_deref()
        .map(stage_input)
        .transpose()?;

    let args = index_args(
        genome_staged.path(),
        index_dir,
        sa_index_nbases(genome_length),
        annotation_staged.as_ref().map(|staged| staged.path()),
        config,
    );
    info!(
        genome = %genome.display(),
        index = %index_dir.display(),
        genome_length,
        "building genome index"
    );
    run_tool(EXECUTABLE, &args)
}

/// Map `reads` against the index in `index_dir`, writing into `out_dir`.
///
/// Both directories must already exist. Output files carry the `out_dir`
/// prefix; alignments are written as coordinate-sorted BAM. Returns the
/// tool's exit code unchanged.
pub fn map_reads(
    reads: &Path,
    index_dir: &Path,
    out_dir: &Path,
    config: &MapConfig,
) -> Result<i32, ExternalsError> {
    if !index_dir.is_dir() {
        debug!(path = %index_dir.display(), "genome index directory missing");
        return Err(ExternalsError::GenomeIndexMissing);
    }
    if !out_dir.is_dir() {
        debug!(path = %out_dir.display(), "mapping output directory missing");
        return Err(ExternalsError::OutputDirMissing);
    }

    let reads_staged = stage_input(reads)?;
    let annotation_staged = config
        .annotation
        .as_deref()
        .map(stage_input)
        .transpose()?;

    let args = map_args(
        reads_staged.path(),
        index_dir,
        out_dir,
        annotation_staged.as_ref().map(|staged| staged.path()),
        config,
    );
    info!(
        reads = %reads.display(),
        index = %index_dir.display(),
        out = %out_dir.display(),
        "mapping reads"
    );
    run_tool(EXECUTABLE, &args)
}

/// Suffix-array pre-index size scaled down for small genomes:
/// `min(14, log2(length) / 2 - 1)`.
///
/// The tool's default of 14 makes index construction on the kilobase-scale
/// references used in tests pathologically slow, so the wrapper always
/// derives this from the actual genome length.
fn sa_index_nbases(genome_length: u64) -> u32 {
    if genome_length < 16 {
        return 2;
    }
    let scaled = ((genome_length as f64).log2() / 2.0 - 1.0).floor() as i64;
    scaled.clamp(2, i64::from(MAX_SA_INDEX_NBASES)) as u32
}

fn index_args(
    genome: &Path,
    index_dir: &Path,
    sa_nbases: u32,
    annotation: Option<&Path>,
    config: &IndexConfig,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--runMode".into(),
        "genomeGenerate".into(),
        "--runThreadN".into(),
        config.threads.to_string().into(),
        "--genomeDir".into(),
        index_dir.into(),
        "--genomeFastaFiles".into(),
        genome.into(),
        "--genomeSAindexNbases".into(),
        sa_nbases.to_string().into(),
        "--alignSJoverhangMin".into(),
        config.overhang_min.to_string().into(),
    ];
    if let Some(annotation) = annotation {
        args.push("--sjdbGTFfile".into());
        args.push(annotation.into());
        args.push("--sjdbOverhang".into());
        args.push(config.overhang.to_string().into());
    }
    args
}

fn map_args(
    reads: &Path,
    index_dir: &Path,
    out_dir: &Path,
    annotation: Option<&Path>,
    config: &MapConfig,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--runMode".into(),
        "alignReads".into(),
        "--runThreadN".into(),
        config.threads.to_string().into(),
        "--genomeDir".into(),
        index_dir.into(),
        "--readFilesIn".into(),
        reads.into(),
        "--outFileNamePrefix".into(),
        out_prefix(out_dir),
        "--outSAMtype".into(),
        "BAM".into(),
        "SortedByCoordinate".into(),
        "--outFilterMultimapNmax".into(),
        config.multimax.to_string().into(),
        "--outFilterMismatchNmax".into(),
        config.mismatches.to_string().into(),
        "--alignEndsType".into(),
        "EndToEnd".into(),
    ];
    if let Some(annotation) = annotation {
        args.push("--sjdbGTFfile".into());
        args.push(annotation.into());
    }
    args
}

/// Output directory as a tool prefix: the tool concatenates file names onto
/// this string, so it must end with a separator.
fn out_prefix(out_dir: &Path) -> OsString {
    let mut prefix: OsString = out_dir.into();
    prefix.push(std::path::MAIN_SEPARATOR.to_string());
    prefix
}
