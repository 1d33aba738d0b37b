//! # clipline: external-tool plumbing for iCLIP sequencing pipelines
//!
//! Thin, typed wrappers around two third-party command-line tools: the
//! `cutadapt` adapter trimmer and the `STAR` spliced aligner. The wrappers
//! validate filesystem preconditions before anything is spawned, assemble
//! command lines from typed configuration, and propagate the tool's exit
//! code unchanged. A deterministic fixture simulator
//! ([`fastx::simulate`]) generates the small FASTA/FASTQ/annotation files
//! needed to exercise them.
//!
//! ## Usage Example
//!
//! ```no_run
//! use clipline::externals::cutadapt::{self, TrimConfig};
//! use clipline::externals::star::{self, IndexConfig};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), clipline::ExternalsError> {
//! let trim = TrimConfig {
//!     minimum_length: Some(17),
//!     ..TrimConfig::new("AAAATTTTCCCCGGGG")
//! };
//! let code = cutadapt::run(
//!     Path::new("reads.fastq"),
//!     Path::new("trimmed.fastq"),
//!     &trim,
//! )?;
//! assert_eq!(code, 0);
//!
//! let code = star::build_index(
//!     Path::new("genome.fasta"),
//!     Path::new("index"),
//!     &IndexConfig::default(),
//! )?;
//! assert_eq!(code, 0);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod externals;
pub mod fastx;
/// Version-string derivation from `git describe` metadata.
pub mod version;

pub use externals::ExternalsError;

/// Crate version derived from git metadata at build time; falls back to the
/// package version outside a git checkout.
pub const VERSION: &str = env!("CLIPLINE_VERSION");
