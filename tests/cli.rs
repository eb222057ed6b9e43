//! Command-line tests against the built `peaksense` binary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{NamedTempFile, TempDir};

fn write_reads(dir: &Path, name: &str, lines: &[String]) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    path
}

/// Ten nested reads with a single-base summit of depth 10.
fn nested_reads(chrom: &str, summit: u64) -> Vec<String> {
    (0..10)
        .map(|k| format!("{}\t{}\t{}\tr{}\t60", chrom, summit - k * 5, summit + 1 + k * 5, k))
        .collect()
}

fn peaksense(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_peaksense"))
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to run peaksense")
}

#[test]
fn test_writes_bed_to_explicit_output() {
    let dir = TempDir::new().unwrap();
    let sample = write_reads(dir.path(), "sample.bed", &nested_reads("chr1", 500));
    let control = write_reads(dir.path(), "control.bed", &["chr1\t0\t1000\tc\t60".to_string()]);
    let out = dir.path().join("peaks.bed");

    let output = peaksense(&[
        sample.to_str().unwrap(),
        control.to_str().unwrap(),
        "-s",
        "1",
        "-o",
        out.to_str().unwrap(),
    ]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let bed = std::fs::read_to_string(&out).unwrap();
    assert_eq!(bed, "chr1\t463\t464\t45\n");
}

#[test]
fn test_default_output_next_to_sample() {
    let dir = TempDir::new().unwrap();
    let sample = write_reads(dir.path(), "chip.sorted.bed", &nested_reads("chr1", 500));
    let control = write_reads(dir.path(), "input.bed", &["chr1\t0\t1000\tc\t60".to_string()]);

    let output = peaksense(&[
        sample.to_str().unwrap(),
        control.to_str().unwrap(),
        "--smoothing-factor",
        "1",
        "--width-peaks",
        "1",
    ]);

    assert!(output.status.success());
    let bed = std::fs::read_to_string(dir.path().join("chip.peaksense.bed")).unwrap();
    assert_eq!(bed, "chr1\t500\t501\t45\n");
}

#[test]
fn test_unknown_chromosome_fails() {
    let dir = TempDir::new().unwrap();
    let sample = write_reads(dir.path(), "s.bed", &nested_reads("chr1", 500));
    let control = write_reads(dir.path(), "c.bed", &["chr2\t0\t1000\tc\t60".to_string()]);

    let output = peaksense(&[
        sample.to_str().unwrap(),
        control.to_str().unwrap(),
        "-c",
        "chr1",
        "chr2",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Chromosome chr2 does not exist in sample"),
        "stderr: {}",
        stderr
    );
    // Nothing is written on failure
    assert!(!dir.path().join("s.peaksense.bed").exists());
}

#[test]
fn test_rejects_non_positive_parameters() {
    let sample = NamedTempFile::new().unwrap();
    let control = NamedTempFile::new().unwrap();

    for flag in ["-s", "-m", "-w"] {
        let output = peaksense(&[
            sample.path().to_str().unwrap(),
            control.path().to_str().unwrap(),
            flag,
            "0",
        ]);
        assert!(!output.status.success(), "{} 0 should be rejected", flag);
    }

    let output = peaksense(&[
        sample.path().to_str().unwrap(),
        control.path().to_str().unwrap(),
        "-H=-1",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("harmonic_threshold"), "stderr: {}", stderr);
}

#[test]
fn test_malformed_reads_report_line() {
    let dir = TempDir::new().unwrap();
    let sample = write_reads(
        dir.path(),
        "s.bed",
        &["chr1\t0\t10\tr\t60".to_string(), "chr1\t20\t20\tr\t60".to_string()],
    );
    let control = write_reads(dir.path(), "c.bed", &["chr1\t0\t10\tc\t60".to_string()]);

    let output = peaksense(&[sample.to_str().unwrap(), control.to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"), "stderr: {}", stderr);
}

/// The same nested reads as SAM records under a `chr1` header.
fn nested_sam(summit: u64) -> Vec<String> {
    let mut lines = vec!["@SQ\tSN:chr1\tLN:2000".to_string()];
    lines.extend((0..10).map(|k| {
        format!(
            "r{}\t0\tchr1\t{}\t60\t{}M\t*\t0\t0\t*\t*",
            k,
            summit - k * 5 + 1,
            10 * k + 1
        )
    }));
    lines
}

#[test]
fn test_sam_input_matches_text_input() {
    let dir = TempDir::new().unwrap();
    let sample = write_reads(dir.path(), "chip.sam", &nested_sam(500));
    let control = write_reads(
        dir.path(),
        "input.sam",
        &[
            "@SQ\tSN:chr1\tLN:2000".to_string(),
            "c\t0\tchr1\t1\t60\t1000M\t*\t0\t0\t*\t*".to_string(),
        ],
    );
    let out = dir.path().join("peaks.bed");

    let output = peaksense(&[
        sample.to_str().unwrap(),
        control.to_str().unwrap(),
        "-s",
        "1",
        "-o",
        out.to_str().unwrap(),
    ]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "chr1\t463\t464\t45\n");
}
