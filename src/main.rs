use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use clipline::externals::cutadapt::{self, TrimConfig};
use clipline::externals::star::{self, IndexConfig, MapConfig};
use clipline::fastx::simulate::{self, FastqSim};

#[derive(Parser, Debug)]
#[command(
    name = "clipline",
    version = clipline::VERSION,
    about = "External-tool plumbing for iCLIP sequencing pipelines"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Trim a 3' adapter off sequencing reads with cutadapt.
    Trim {
        /// FASTQ reads to trim (gzip accepted).
        reads: PathBuf,
        /// Adapter sequence to remove.
        adapter: String,
        /// Where to write trimmed reads.
        #[arg(long, short = 'o', conflicts_with = "overwrite")]
        output: Option<PathBuf>,
        /// Replace the input file with the trimmed reads.
        #[arg(long)]
        overwrite: bool,
        /// Quality cutoff for 3' quality trimming.
        #[arg(long)]
        qual_trim: Option<u32>,
        /// Discard reads shorter than this after trimming.
        #[arg(long)]
        minimum_length: Option<u32>,
        /// Maximum allowed error rate in the adapter match.
        #[arg(long)]
        error_rate: Option<f64>,
        /// Minimum read/adapter overlap.
        #[arg(long)]
        overlap: Option<u32>,
    },
    /// Build a STAR genome index from a FASTA reference.
    Index {
        /// Reference genome FASTA (gzip accepted).
        genome: PathBuf,
        /// Existing directory to hold the index.
        index_dir: PathBuf,
        /// GTF annotation for splice-aware indexing.
        #[arg(long)]
        annotation: Option<PathBuf>,
        /// Splice-junction overhang to index.
        #[arg(long, default_value_t = 100)]
        overhang: u32,
        /// Minimum overhang for spliced alignments.
        #[arg(long, default_value_t = 8)]
        overhang_min: u32,
        /// Threads handed to the aligner.
        #[arg(long, short = 't', default_value_t = 1)]
        threads: u32,
    },
    /// Map reads against a STAR genome index.
    Map {
        /// FASTQ reads to map (gzip accepted).
        reads: PathBuf,
        /// Directory holding the genome index.
        index_dir: PathBuf,
        /// Existing directory for mapping output.
        out_dir: PathBuf,
        /// GTF annotation for on-the-fly junction insertion.
        #[arg(long)]
        annotation: Option<PathBuf>,
        /// Maximum loci a read may map to.
        #[arg(long, default_value_t = 10)]
        multimax: u32,
        /// Maximum mismatches per read.
        #[arg(long, default_value_t = 2)]
        mismatches: u32,
        /// Threads handed to the aligner.
        #[arg(long, short = 't', default_value_t = 1)]
        threads: u32,
    },
    /// Report the versions of the external tools.
    Tools,
    /// Generate deterministic test fixtures.
    #[command(subcommand)]
    Sim(SimCommands),
}

#[derive(Subcommand, Debug)]
enum SimCommands {
    /// Random FASTA genome with numeric sequence names.
    Fasta {
        /// Output path.
        out: PathBuf,
        /// Number of sequences.
        #[arg(long, default_value_t = 2)]
        num_seqs: usize,
        /// Length of each sequence.
        #[arg(long, default_value_t = 1000)]
        seq_len: usize,
        /// Seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// FASTQ reads, random or sampled from a genome.
    Fastq {
        /// Output path.
        out: PathBuf,
        /// Number of reads.
        #[arg(long, default_value_t = 100)]
        num_reads: usize,
        /// Read length before the adapter is appended.
        #[arg(long, default_value_t = 50)]
        read_len: usize,
        /// Sample read sequences from this FASTA genome.
        #[arg(long)]
        genome: Option<PathBuf>,
        /// Adapter appended to the 3' end of every read.
        #[arg(long)]
        adapter: Option<String>,
        /// Seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// GTF-style annotation with one gene, transcript, and exon.
    Annotation {
        /// Output path.
        out: PathBuf,
        /// Sequence (chromosome) name.
        #[arg(long, default_value = "1")]
        seqname: String,
        /// Feature start coordinate.
        #[arg(long, default_value_t = 10)]
        start: u64,
        /// Feature end coordinate.
        #[arg(long, default_value_t = 20)]
        end: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let code = run(cli.command)?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn run(command: Commands) -> Result<i32> {
    match command {
        Commands::Trim {
            reads,
            adapter,
            output,
            overwrite,
            qual_trim,
            minimum_length,
            error_rate,
            overlap,
        } => {
            let config = TrimConfig {
                qual_trim,
                minimum_length,
                error_rate,
                overlap,
                ..TrimConfig::new(adapter)
            };
            match (output, overwrite) {
                (Some(output), _) => Ok(cutadapt::run(&reads, &output, &config)?),
                (None, true) => Ok(cutadapt::run_overwrite(&reads, &config)?),
                (None, false) => bail!("pass --output FILE or --overwrite"),
            }
        }
        Commands::Index {
            genome,
            index_dir,
            annotation,
            overhang,
            overhang_min,
            threads,
        } => {
            let config = IndexConfig {
                annotation,
                overhang,
                overhang_min,
                threads,
            };
            Ok(star::build_index(&genome, &index_dir, &config)?)
        }
        Commands::Map {
            reads,
            index_dir,
            out_dir,
            annotation,
            multimax,
            mismatches,
            threads,
        } => {
            let config = MapConfig {
                annotation,
                multimax,
                mismatches,
                threads,
            };
            Ok(star::map_reads(&reads, &index_dir, &out_dir, &config)?)
        }
        Commands::Tools => {
            println!("clipline {}", clipline::VERSION);
            report_tool("cutadapt", cutadapt::get_version());
            report_tool("STAR", star::get_version());
            Ok(0)
        }
        Commands::Sim(sim) => {
            run_sim(sim)?;
            Ok(0)
        }
    }
}

fn report_tool(name: &str, version: Result<String, clipline::ExternalsError>) {
    match version {
        Ok(version) => println!("{name} {version}"),
        Err(err) => println!("{name} unavailable ({err})"),
    }
}

fn run_sim(command: SimCommands) -> Result<()> {
    match command {
        SimCommands::Fasta {
            out,
            num_seqs,
            seq_len,
            seed,
        } => simulate::simulate_fasta(&out, num_seqs, seq_len, seed),
        SimCommands::Fastq {
            out,
            num_reads,
            read_len,
            genome,
            adapter,
            seed,
        } => simulate::simulate_fastq(
            &out,
            &FastqSim {
                num_reads,
                read_len,
                genome,
                adapter,
                seed,
            },
        ),
        SimCommands::Annotation {
            out,
            seqname,
            start,
            end,
        } => simulate::simulate_annotation(&out, &seqname, start, end),
    }
}
