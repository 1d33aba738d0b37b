//! Minimal FASTA/FASTQ input and output.
//!
//! Covers what the wrappers and the fixture simulator need: streaming
//! readers with gzip support, plain writers, and tab-delimited helpers for
//! annotation-style files. Files ending in `.gz` are decompressed
//! transparently on read.

pub mod simulate;

use anyhow::{bail, Context, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// A FASTA record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// Sequence identifier (header text up to the first whitespace).
    pub name: String,
    /// Nucleotide sequence, concatenated across wrapped lines.
    pub seq: String,
}

/// A FASTQ record. `qual` is Phred+33 encoded and matches `seq` in length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    /// Read identifier (header text after `@`).
    pub name: String,
    /// Nucleotide sequence.
    pub seq: String,
    /// Quality string.
    pub qual: String,
}

fn open_text(path: &Path) -> Result<Box<dyn BufRead>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Streaming FASTA reader over a plain or gzip-compressed file.
pub struct FastaReader {
    reader: Box<dyn BufRead>,
    pending: Option<String>,
    line: String,
}

impl FastaReader {
    /// Open a FASTA file and position the reader on the first record.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = Self {
            reader: open_text(path)?,
            pending: None,
            line: String::new(),
        };
        loop {
            reader.line.clear();
            if reader.reader.read_line(&mut reader.line)? == 0 {
                break;
            }
            let line = reader.line.trim_end();
            if line.is_empty() {
                continue;
            }
            match line.strip_prefix('>') {
                Some(header) => {
                    reader.pending = Some(header_name(header));
                    break;
                }
                None => bail!(
                    "{}: expected a FASTA header, found {line:?}",
                    path.display()
                ),
            }
        }
        Ok(reader)
    }

    /// Read the next record, or `None` at end of input.
    pub fn read_next(&mut self) -> Result<Option<FastaRecord>> {
        let Some(name) = self.pending.take() else {
            return Ok(None);
        };
        let mut seq = String::new();
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                break;
            }
            let line = self.line.trim_end();
            if let Some(header) = line.strip_prefix('>') {
                self.pending = Some(header_name(header));
                break;
            }
            seq.push_str(line);
        }
        Ok(Some(FastaRecord { name, seq }))
    }
}

impl Iterator for FastaReader {
    type Item = Result<FastaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}

impl std::fmt::Debug for FastaReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastaReader")
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

fn header_name(header: &str) -> String {
    header.split_whitespace().next().unwrap_or("").to_string()
}

/// Streaming FASTQ reader over a plain or gzip-compressed file.
pub struct FastqReader {
    reader: Box<dyn BufRead>,
    line: String,
}

impl FastqReader {
    /// Open a FASTQ file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            reader: open_text(path.as_ref())?,
            line: String::new(),
        })
    }

    /// Read the next four-line record, or `None` at end of input.
    pub fn read_next(&mut self) -> Result<Option<FastqRecord>> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        let header = self.line.trim_end();
        let Some(name) = header.strip_prefix('@') else {
            bail!("expected a FASTQ header, found {header:?}");
        };
        let name = name.to_string();

        let seq = self.required_line("sequence", &name)?;
        let sep = self.required_line("separator", &name)?;
        if !sep.starts_with('+') {
            bail!("record {name:?}: expected `+` separator, found {sep:?}");
        }
        let qual = self.required_line("quality", &name)?;
        if qual.len() != seq.len() {
            bail!(
                "record {name:?}: quality length {} does not match sequence length {}",
                qual.len(),
                seq.len()
            );
        }

        Ok(Some(FastqRecord { name, seq, qual }))
    }

    fn required_line(&mut self, what: &str, record: &str) -> Result<String> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            bail!("record {record:?}: truncated before {what} line");
        }
        Ok(self.line.trim_end().to_string())
    }
}

impl Iterator for FastqReader {
    type Item = Result<FastqRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}

impl std::fmt::Debug for FastqReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastqReader").finish_non_exhaustive()
    }
}

/// Read an entire FASTA file into memory.
pub fn read_fasta(path: impl AsRef<Path>) -> Result<Vec<FastaRecord>> {
    FastaReader::open(path)?.collect()
}

/// Read an entire FASTQ file into memory.
pub fn read_fastq(path: impl AsRef<Path>) -> Result<Vec<FastqRecord>> {
    FastqReader::open(path)?.collect()
}

/// Write FASTA records, one sequence line per record.
pub fn write_fasta(path: impl AsRef<Path>, records: &[FastaRecord]) -> Result<()> {
    let path = path.as_ref();
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for record in records {
        writeln!(writer, ">{}", record.name)?;
        writeln!(writer, "{}", record.seq)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write FASTQ records in the standard four-line layout.
pub fn write_fastq(path: impl AsRef<Path>, records: &[FastqRecord]) -> Result<()> {
    let path = path.as_ref();
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for record in records {
        writeln!(writer, "@{}", record.name)?;
        writeln!(writer, "{}", record.seq)?;
        writeln!(writer, "+")?;
        writeln!(writer, "{}", record.qual)?;
    }
    writer.flush()?;
    Ok(())
}

/// Total number of sequence bases in a FASTA file.
pub fn total_sequence_length(path: impl AsRef<Path>) -> Result<u64> {
    let mut total = 0u64;
    let mut reader = FastaReader::open(path)?;
    while let Some(record) = reader.read_next()? {
        total += record.seq.len() as u64;
    }
    Ok(total)
}

/// Write rows as tab-delimited lines.
pub fn write_tsv(path: impl AsRef<Path>, rows: &[Vec<String>]) -> Result<()> {
    let path = path.as_ref();
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for row in rows {
        writeln!(writer, "{}", row.join("\t"))?;
    }
    writer.flush()?;
    Ok(())
}

/// Read tab-delimited lines back into rows.
pub fn read_tsv(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut reader = open_text(path.as_ref())?;
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            continue;
        }
        rows.push(trimmed.split('\t').map(str::to_string).collect());
    }
    Ok(rows)
}
