//! Aligned-read input: parsing, quality filtering and per-chromosome grouping.
//!
//! The input format is chosen from the file extension (see [`InputFormat`]).
//! `.bam` and `.sam` files are decoded by [`crate::alignments`]; anything
//! else is read as tab-delimited text in the column layout written by
//! `bedtools bamtobed`:
//!
//! ```text
//! chrom  start  end  [name]  [mapq]  [strand ...]
//! ```
//!
//! The fifth (score) column carries the mapping quality. It is optional; when
//! missing or not an integer in `0..=255` the read's quality is unknown.

use crate::alignments;
use crate::interval::{AlignedRead, ReadInterval};
use log::info;
use memchr::memchr;
use memmap2::Mmap;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// Files at or above this size are memory-mapped instead of buffered.
const MMAP_THRESHOLD: u64 = 1024 * 1024;

/// Errors that can occur while reading aligned reads.
#[derive(Error, Debug)]
pub enum ReadsError {
    /// The file could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A text line that could not be parsed.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A BAM/SAM record that could not be decoded.
    #[error("Invalid alignment record {record}: {message}")]
    Alignment { record: usize, message: String },
}

/// Result type for reads input.
pub type Result<T> = std::result::Result<T, ReadsError>;

/// Fast u64 parsing: digits only, no sign, no whitespace.
#[inline(always)]
fn parse_u64_fast(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() || bytes.len() > 19 {
        return None;
    }
    let mut n: u64 = 0;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        n = n * 10 + d as u64;
    }
    Some(n)
}

/// Header, comment and blank lines carry no reads.
#[inline]
fn should_skip_line(line: &[u8]) -> bool {
    line.is_empty()
        || line[0] == b'#'
        || line.starts_with(b"track")
        || line.starts_with(b"browser")
}

/// Strip a trailing `\n` / `\r\n` and surrounding ASCII whitespace.
#[inline]
fn trim_line(line: &[u8]) -> &[u8] {
    line.trim_ascii()
}

/// Split off the next tab-delimited field.
#[inline]
fn next_field<'a>(rest: &mut &'a [u8]) -> Option<&'a [u8]> {
    if rest.is_empty() {
        return None;
    }
    let line = *rest;
    match memchr(b'\t', line) {
        Some(tab) => {
            *rest = &line[tab + 1..];
            Some(&line[..tab])
        }
        None => {
            *rest = &[];
            Some(line)
        }
    }
}

/// Parse one non-skipped line into an [`AlignedRead`].
fn parse_line(line: &[u8], line_number: usize) -> Result<AlignedRead> {
    let parse_err = |message: String| ReadsError::Parse {
        line: line_number,
        message,
    };

    let mut rest = line;
    let chrom = next_field(&mut rest);
    let start = next_field(&mut rest);
    let end = next_field(&mut rest);
    let (chrom, start, end) = match (chrom, start, end) {
        (Some(c), Some(s), Some(e)) => (c, s, e),
        _ => {
            return Err(parse_err(format!(
                "Expected at least 3 fields, got {}",
                line.split(|&b| b == b'\t').count()
            )))
        }
    };

    let chrom = std::str::from_utf8(chrom)
        .map_err(|_| parse_err("Chromosome name is not valid UTF-8".to_string()))?;
    if chrom.is_empty() {
        return Err(parse_err("Empty chromosome name".to_string()));
    }

    let start = parse_u64_fast(start).ok_or_else(|| {
        parse_err(format!(
            "Invalid start position: '{}'",
            String::from_utf8_lossy(start)
        ))
    })?;
    let end = parse_u64_fast(end).ok_or_else(|| {
        parse_err(format!(
            "Invalid end position: '{}'",
            String::from_utf8_lossy(end)
        ))
    })?;

    let interval = ReadInterval::new(start, end)
        .ok_or_else(|| parse_err(format!("Empty read interval: start ({}) >= end ({})", start, end)))?;

    // name column, then score column holding MAPQ
    let _name = next_field(&mut rest);
    let mapq = next_field(&mut rest)
        .and_then(parse_u64_fast)
        .and_then(|q| u8::try_from(q).ok());

    Ok(AlignedRead::new(chrom, interval, mapq))
}

/// A streaming reads reader.
pub struct ReadsReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    buffer: Vec<u8>,
}

impl ReadsReader<File> {
    /// Open a reads file from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> ReadsReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_capacity(64 * 1024, reader)
    }

    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
            line_number: 0,
            buffer: Vec::with_capacity(256),
        }
    }

    /// Read the next aligned read, skipping header and comment lines.
    pub fn read_record(&mut self) -> Result<Option<AlignedRead>> {
        loop {
            self.buffer.clear();
            let bytes_read = self.reader.read_until(b'\n', &mut self.buffer)?;
            if bytes_read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = trim_line(&self.buffer);
            if should_skip_line(line) {
                continue;
            }

            return parse_line(line, self.line_number).map(Some);
        }
    }

    /// Get an iterator over all records.
    pub fn records(self) -> ReadsIter<R> {
        ReadsIter { reader: self }
    }
}

/// Iterator over aligned reads.
pub struct ReadsIter<R: Read> {
    reader: ReadsReader<R>,
}

impl<R: Read> Iterator for ReadsIter<R> {
    type Item = Result<AlignedRead>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record() {
            Ok(Some(read)) => Some(Ok(read)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Parse every read held in an in-memory buffer.
pub fn parse_reads_bytes(data: &[u8]) -> Result<Vec<AlignedRead>> {
    let mut reads = Vec::new();
    let mut offset = 0;
    let mut line_number = 0;

    while offset < data.len() {
        let line_end = memchr(b'\n', &data[offset..])
            .map(|i| offset + i)
            .unwrap_or(data.len());
        line_number += 1;

        let line = trim_line(&data[offset..line_end]);
        if !should_skip_line(line) {
            reads.push(parse_line(line, line_number)?);
        }
        offset = line_end + 1;
    }

    Ok(reads)
}

/// Parse reads from a string (useful for testing).
pub fn parse_reads(content: &str) -> Result<Vec<AlignedRead>> {
    parse_reads_bytes(content.as_bytes())
}

/// On-disk layout of a reads file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// BGZF-compressed binary alignments.
    Bam,
    /// Plain-text alignments with an `@` header.
    Sam,
    /// `bedtools bamtobed` style text.
    Text,
}

impl InputFormat {
    /// Pick the format from the file extension, case-insensitively.
    /// Unrecognised extensions fall back to [`InputFormat::Text`].
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bam") => Self::Bam,
            Some(ext) if ext.eq_ignore_ascii_case("sam") => Self::Sam,
            _ => Self::Text,
        }
    }
}

/// Read all aligned reads from a file, in whichever [`InputFormat`] its
/// extension names.
pub fn read_aligned_reads<P: AsRef<Path>>(path: P) -> Result<Vec<AlignedRead>> {
    let path = path.as_ref();
    match InputFormat::from_path(path) {
        InputFormat::Bam => alignments::read_bam(path),
        InputFormat::Sam => alignments::read_sam(path),
        InputFormat::Text => read_text_reads(path),
    }
}

/// Read all aligned reads from a `bamtobed` text file.
///
/// Large files are memory-mapped; small ones go through [`ReadsReader`].
pub fn read_text_reads<P: AsRef<Path>>(path: P) -> Result<Vec<AlignedRead>> {
    let file = File::open(path)?;
    let file_size = file.metadata()?.len();

    if file_size >= MMAP_THRESHOLD {
        // SAFETY: the mapping is read-only and dropped before returning.
        let mmap = unsafe { Mmap::map(&file)? };
        parse_reads_bytes(&mmap)
    } else {
        ReadsReader::new(file).records().collect()
    }
}

/// Mapping-quality filter applied before coverage is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityFilter {
    /// Reads with a known MAPQ below this are dropped.
    pub min_mapq: u8,
}

impl Default for QualityFilter {
    fn default() -> Self {
        Self { min_mapq: 35 }
    }
}

impl QualityFilter {
    pub fn new(min_mapq: u8) -> Self {
        Self { min_mapq }
    }

    /// Reads with unknown mapping quality always pass.
    #[inline]
    pub fn passes(&self, read: &AlignedRead) -> bool {
        read.mapq.is_none_or(|q| q >= self.min_mapq)
    }

    pub fn apply(&self, reads: Vec<AlignedRead>) -> Vec<AlignedRead> {
        reads.into_iter().filter(|r| self.passes(r)).collect()
    }
}

/// Descriptive statistics for a loaded read collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadSetSummary {
    pub reads: usize,
    pub chromosomes: usize,
    pub mean_read_length: f64,
    /// Mean over reads that carry a mapping quality.
    pub mean_mapq: Option<f64>,
}

impl ReadSetSummary {
    pub fn from_reads(reads: &[AlignedRead]) -> Self {
        if reads.is_empty() {
            return Self::default();
        }

        let mut chroms: FxHashSet<&str> = FxHashSet::default();
        let mut total_length: u64 = 0;
        let mut mapq_sum: u64 = 0;
        let mut mapq_count: usize = 0;

        for read in reads {
            chroms.insert(read.chrom());
            total_length += read.len();
            if let Some(q) = read.mapq {
                mapq_sum += q as u64;
                mapq_count += 1;
            }
        }

        Self {
            reads: reads.len(),
            chromosomes: chroms.len(),
            mean_read_length: total_length as f64 / reads.len() as f64,
            mean_mapq: (mapq_count > 0).then(|| mapq_sum as f64 / mapq_count as f64),
        }
    }
}

impl fmt::Display for ReadSetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reads: {}, chromosomes: {}, mean read length: {:.2}",
            self.reads, self.chromosomes, self.mean_read_length
        )?;
        match self.mean_mapq {
            Some(q) => write!(f, ", mean MAPQ: {:.2}", q),
            None => write!(f, ", mean MAPQ: n/a"),
        }
    }
}

/// Read intervals grouped by chromosome.
///
/// Preserves the order in which chromosomes were first seen.
#[derive(Debug, Clone, Default)]
pub struct ReadSet {
    intervals: FxHashMap<String, Vec<ReadInterval>>,
    order: Vec<String>,
}

impl ReadSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_reads<I>(reads: I) -> Self
    where
        I: IntoIterator<Item = AlignedRead>,
    {
        let mut set = Self::new();
        for read in reads {
            set.insert(read.chrom, read.interval);
        }
        set
    }

    /// Add an interval, appending the chromosome to the order if new.
    pub fn insert(&mut self, chrom: String, interval: ReadInterval) {
        if let Some(bucket) = self.intervals.get_mut(&chrom) {
            bucket.push(interval);
            return;
        }
        self.order.push(chrom.clone());
        self.intervals.insert(chrom, vec![interval]);
    }

    /// Intervals for a chromosome; empty when the chromosome is absent.
    pub fn get(&self, chrom: &str) -> &[ReadInterval] {
        self.intervals.get(chrom).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when at least one interval exists on `chrom`.
    #[inline]
    pub fn has_chrom(&self, chrom: &str) -> bool {
        self.intervals.contains_key(chrom)
    }

    /// Chromosome names in first-appearance order.
    pub fn chromosomes(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    /// Number of chromosomes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of intervals across all chromosomes.
    pub fn total_reads(&self) -> usize {
        self.intervals.values().map(Vec::len).sum()
    }
}

/// Load, quality-filter and group one reads file.
pub fn load_read_set<P: AsRef<Path>>(path: P, filter: &QualityFilter) -> Result<ReadSet> {
    let path = path.as_ref();
    let reads = read_aligned_reads(path)?;
    let raw = reads.len();
    let summary = ReadSetSummary::from_reads(&reads);
    info!("{}: {}", path.display(), summary);

    let reads = filter.apply(reads);
    info!(
        "{}: {} of {} reads pass MAPQ >= {}",
        path.display(),
        reads.len(),
        raw,
        filter.min_mapq
    );

    Ok(ReadSet::from_reads(reads))
}
