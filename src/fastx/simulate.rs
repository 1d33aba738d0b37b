//! Deterministic fixture generation.
//!
//! Produces small FASTA genomes, FASTQ read sets, and GTF-style annotation
//! files for exercising the external-tool wrappers. All randomness flows
//! through a single seeded generator, so the same seed yields byte-identical
//! files.

use super::{read_fasta, write_fasta, write_fastq, write_tsv, FastaRecord, FastqRecord};
use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};

const BASES: &[u8] = b"ACGT";

/// Create a generator, seeded for reproducibility when `seed` is given.
pub fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// A uniformly random nucleotide sequence of `len` bases.
pub fn random_sequence(len: usize, rng: &mut StdRng) -> String {
    (0..len)
        .map(|_| BASES[rng.gen_range(0..BASES.len())] as char)
        .collect()
}

/// Write a FASTA file of `num_seqs` random sequences named `1`, `2`, ...
///
/// The numeric names line up with the seqname column written by
/// [`simulate_annotation`].
pub fn simulate_fasta(
    path: impl AsRef<Path>,
    num_seqs: usize,
    seq_len: usize,
    seed: Option<u64>,
) -> Result<()> {
    let mut rng = create_rng(seed);
    let records: Vec<FastaRecord> = (1..=num_seqs)
        .map(|i| FastaRecord {
            name: i.to_string(),
            seq: random_sequence(seq_len, &mut rng),
        })
        .collect();
    write_fasta(path, &records)
}

/// Parameters for simulated FASTQ reads.
#[derive(Debug, Clone)]
pub struct FastqSim {
    /// Number of reads to generate.
    pub num_reads: usize,
    /// Read length before any adapter is appended.
    pub read_len: usize,
    /// Sample read sequences from this FASTA genome instead of generating
    /// them at random.
    pub genome: Option<PathBuf>,
    /// Adapter appended verbatim to the 3' end of every read.
    pub adapter: Option<String>,
    /// Seed for reproducible output.
    pub seed: Option<u64>,
}

impl Default for FastqSim {
    fn default() -> Self {
        Self {
            num_reads: 100,
            read_len: 50,
            genome: None,
            adapter: None,
            seed: None,
        }
    }
}

/// Write a FASTQ file of simulated reads.
///
/// Quality strings are random Phred+33 characters in the Q20..=Q40 range,
/// matching the final read length (adapter included).
pub fn simulate_fastq(path: impl AsRef<Path>, sim: &FastqSim) -> Result<()> {
    let mut rng = create_rng(sim.seed);

    let genome = match &sim.genome {
        Some(genome_path) => {
            let records = read_fasta(genome_path)?;
            if records.iter().all(|r| r.seq.is_empty()) {
                bail!("genome {} has no sequence to sample", genome_path.display());
            }
            Some(records)
        }
        None => None,
    };

    let mut reads = Vec::with_capacity(sim.num_reads);
    for i in 0..sim.num_reads {
        let mut seq = match &genome {
            Some(records) => sample_from_genome(records, sim.read_len, &mut rng),
            None => random_sequence(sim.read_len, &mut rng),
        };
        if let Some(adapter) = &sim.adapter {
            seq.push_str(adapter);
        }
        let qual = random_quality(seq.len(), &mut rng);
        reads.push(FastqRecord {
            name: format!("read-{:04}", i + 1),
            seq,
            qual,
        });
    }

    write_fastq(path, &reads)
}

fn sample_from_genome(records: &[FastaRecord], read_len: usize, rng: &mut StdRng) -> String {
    // Retry empty records; the caller already guaranteed at least one
    // non-empty sequence exists.
    loop {
        let record = &records[rng.gen_range(0..records.len())];
        if record.seq.is_empty() {
            continue;
        }
        let len = read_len.min(record.seq.len());
        let start = rng.gen_range(0..=record.seq.len() - len);
        return record.seq[start..start + len].to_string();
    }
}

fn random_quality(len: usize, rng: &mut StdRng) -> String {
    // Phred+33 scores in the Q20..=Q40 band.
    (0..len)
        .map(|_| rng.gen_range(b'5'..=b'I') as char)
        .collect()
}

/// Write a GTF-style annotation describing one gene with a single
/// transcript and exon on the `+` strand of `seqname`.
pub fn simulate_annotation(
    path: impl AsRef<Path>,
    seqname: &str,
    start: u64,
    end: u64,
) -> Result<()> {
    let row = |feature: &str, attributes: &str| -> Vec<String> {
        vec![
            seqname.to_string(),
            ".".to_string(),
            feature.to_string(),
            start.to_string(),
            end.to_string(),
            ".".to_string(),
            "+".to_string(),
            ".".to_string(),
            attributes.to_string(),
        ]
    };
    let rows = vec![
        row("gene", r#"gene_id "A";"#),
        row("transcript", r#"gene_id "A"; transcript_id "AA";"#),
        row(
            "exon",
            r#"gene_id "A"; transcript_id "AA"; exon_number "1";"#,
        ),
    ];
    write_tsv(path, &rows)
}
