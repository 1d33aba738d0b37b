//! Integration tests for the fixture simulator.

use tempfile::TempDir;

use clipline::fastx::{self, simulate::{self, FastqSim}};

#[test]
fn same_seed_reproduces_identical_files() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.fasta");
    let b = dir.path().join("b.fasta");
    simulate::simulate_fasta(&a, 2, 500, Some(7)).unwrap();
    simulate::simulate_fasta(&b, 2, 500, Some(7)).unwrap();
    assert_eq!(
        std::fs::read(&a).unwrap(),
        std::fs::read(&b).unwrap()
    );

    let fa = dir.path().join("a.fastq");
    let fb = dir.path().join("b.fastq");
    let sim = FastqSim {
        num_reads: 10,
        read_len: 30,
        adapter: Some("ACGTACGT".to_string()),
        seed: Some(7),
        genome: None,
    };
    simulate::simulate_fastq(&fa, &sim).unwrap();
    simulate::simulate_fastq(&fb, &sim).unwrap();
    assert_eq!(
        std::fs::read(&fa).unwrap(),
        std::fs::read(&fb).unwrap()
    );
}

#[test]
fn different_seeds_produce_different_genomes() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.fasta");
    let b = dir.path().join("b.fasta");
    simulate::simulate_fasta(&a, 1, 500, Some(1)).unwrap();
    simulate::simulate_fasta(&b, 1, 500, Some(2)).unwrap();
    assert_ne!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
}

#[test]
fn simulated_genome_has_requested_shape() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("genome.fasta");
    simulate::simulate_fasta(&path, 3, 250, Some(0)).unwrap();

    let records = fastx::read_fasta(&path).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(
        records.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        vec!["1", "2", "3"]
    );
    assert!(records.iter().all(|r| r.seq.len() == 250));
    assert!(records
        .iter()
        .all(|r| r.seq.bytes().all(|b| b"ACGT".contains(&b))));
}

#[test]
fn adapter_is_appended_to_every_read() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reads.fastq");
    let adapter = "AAAATTTTCCCCGGGG";
    simulate::simulate_fastq(
        &path,
        &FastqSim {
            num_reads: 20,
            read_len: 40,
            adapter: Some(adapter.to_string()),
            seed: Some(0),
            genome: None,
        },
    )
    .unwrap();

    let reads = fastx::read_fastq(&path).unwrap();
    assert_eq!(reads.len(), 20);
    for read in &reads {
        assert!(read.seq.ends_with(adapter), "read {} lacks adapter", read.name);
        assert_eq!(read.seq.len(), 40 + adapter.len());
        assert_eq!(read.qual.len(), read.seq.len());
    }
}

#[test]
fn genome_sampled_reads_are_substrings_of_the_genome() {
    let dir = TempDir::new().unwrap();
    let genome_path = dir.path().join("genome.fasta");
    simulate::simulate_fasta(&genome_path, 2, 1000, Some(0)).unwrap();
    let genome = fastx::read_fasta(&genome_path).unwrap();

    let reads_path = dir.path().join("reads.fastq");
    simulate::simulate_fastq(
        &reads_path,
        &FastqSim {
            num_reads: 50,
            read_len: 50,
            genome: Some(genome_path.clone()),
            adapter: None,
            seed: Some(0),
        },
    )
    .unwrap();

    for read in fastx::read_fastq(&reads_path).unwrap() {
        assert_eq!(read.seq.len(), 50);
        assert!(
            genome.iter().any(|rec| rec.seq.contains(&read.seq)),
            "read {} not found in genome",
            read.name
        );
    }
}

#[test]
fn annotation_has_gene_transcript_and_exon_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("genes.gtf");
    simulate::simulate_annotation(&path, "1", 10, 20).unwrap();

    let rows = fastx::read_tsv(&path).unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.len() == 9));
    assert_eq!(
        rows.iter().map(|row| row[2].as_str()).collect::<Vec<_>>(),
        vec!["gene", "transcript", "exon"]
    );
    for row in &rows {
        assert_eq!(row[0], "1");
        assert_eq!(row[3], "10");
        assert_eq!(row[4], "20");
        assert!(row[8].contains(r#"gene_id "A";"#));
    }
}
