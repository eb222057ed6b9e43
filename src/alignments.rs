//! BAM and SAM input.
//!
//! Every mapped record becomes one [`AlignedRead`] covering its reference
//! span: `[alignment_start - 1, alignment_end)` in 0-based half-open
//! coordinates. Unmapped records, and records without a reference position
//! or with an empty reference span, carry no coverage and are skipped. A
//! MAPQ of 255 means "unavailable" and reads as unknown quality.

use crate::interval::{AlignedRead, ReadInterval};
use crate::reads::{ReadsError, Result};
use log::debug;
use noodles::bam;
use noodles::sam;
use noodles::sam::alignment::Record as SamRecord;
use std::io;
use std::path::Path;

/// Read every mapped alignment from a BGZF-compressed BAM file.
pub fn read_bam<P: AsRef<Path>>(path: P) -> Result<Vec<AlignedRead>> {
    let path = path.as_ref();
    let mut reader = bam::io::reader::Builder::default().build_from_path(path)?;
    let header = reader.read_header()?;

    let mut record = bam::Record::default();
    let mut collector = Collector::default();
    while read_next(collector.seen + 1, reader.read_record(&mut record))? {
        collector.push(&header, &record)?;
    }

    collector.finish(path)
}

/// Read every mapped alignment from a SAM file.
pub fn read_sam<P: AsRef<Path>>(path: P) -> Result<Vec<AlignedRead>> {
    let path = path.as_ref();
    let mut reader = sam::io::reader::Builder::default().build_from_path(path)?;
    let header = reader.read_header()?;

    let mut record = sam::Record::default();
    let mut collector = Collector::default();
    while read_next(collector.seen + 1, reader.read_record(&mut record))? {
        collector.push(&header, &record)?;
    }

    collector.finish(path)
}

/// `true` while the reader produced a record, `false` at end of input.
fn read_next(record: usize, result: io::Result<usize>) -> Result<bool> {
    result
        .map(|bytes| bytes != 0)
        .map_err(|e| alignment_error(record, e))
}

fn alignment_error(record: usize, error: io::Error) -> ReadsError {
    ReadsError::Alignment {
        record,
        message: error.to_string(),
    }
}

/// Accumulates converted reads and counts what was skipped.
#[derive(Default)]
struct Collector {
    reads: Vec<AlignedRead>,
    seen: usize,
    skipped: usize,
}

impl Collector {
    fn push<R: SamRecord>(&mut self, header: &sam::Header, record: &R) -> Result<()> {
        self.seen += 1;
        match to_aligned_read(header, record).map_err(|e| alignment_error(self.seen, e))? {
            Some(read) => self.reads.push(read),
            None => self.skipped += 1,
        }
        Ok(())
    }

    fn finish(self, path: &Path) -> Result<Vec<AlignedRead>> {
        debug!(
            "{}: {} alignment records, {} unmapped or without reference span",
            path.display(),
            self.seen,
            self.skipped
        );
        Ok(self.reads)
    }
}

/// Convert one alignment record; `None` when it covers no reference bases.
fn to_aligned_read<R: SamRecord>(
    header: &sam::Header,
    record: &R,
) -> io::Result<Option<AlignedRead>> {
    if record.flags()?.is_unmapped() {
        return Ok(None);
    }

    let Some(id) = record.reference_sequence_id(header).transpose()? else {
        return Ok(None);
    };
    let (Some(start), Some(end)) = (
        record.alignment_start().transpose()?,
        record.alignment_end().transpose()?,
    ) else {
        return Ok(None);
    };

    let chrom = header
        .reference_sequences()
        .get_index(id)
        .map(|(name, _)| name.to_string())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("reference sequence {} missing from header", id),
            )
        })?;

    // 1-based inclusive [start, end] to 0-based half-open
    let Some(interval) = ReadInterval::new(start.get() as u64 - 1, end.get() as u64) else {
        return Ok(None);
    };
    let mapq = record.mapping_quality().transpose()?.map(|q| q.get());

    Ok(Some(AlignedRead::new(chrom, interval, mapq)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use noodles::sam::alignment::io::Write as _;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    const SAM: &str = "@HD\tVN:1.6\tSO:unsorted\n\
        @SQ\tSN:chr1\tLN:1000\n\
        @SQ\tSN:chr2\tLN:500\n\
        r1\t0\tchr1\t11\t60\t10M\t*\t0\t0\tACGTACGTAC\t*\n\
        r2\t16\tchr2\t101\t5\t3M2D3M\t*\t0\t0\tACGACG\t*\n\
        r3\t4\t*\t0\t0\t*\t*\t0\t0\tACGT\t*\n\
        r4\t0\tchr1\t51\t255\t2S4M\t*\t0\t0\tACGTAC\t*\n";

    fn write_sam(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("reads.sam");
        let mut file = File::create(&path).unwrap();
        file.write_all(SAM.as_bytes()).unwrap();
        path
    }

    fn expected() -> Vec<AlignedRead> {
        vec![
            AlignedRead::new("chr1", ReadInterval::new(10, 20).unwrap(), Some(60)),
            // Deletions count towards the reference span
            AlignedRead::new("chr2", ReadInterval::new(100, 108).unwrap(), Some(5)),
            // Soft clips do not
            AlignedRead::new("chr1", ReadInterval::new(50, 54).unwrap(), None),
        ]
    }

    #[test]
    fn test_read_sam() {
        let dir = TempDir::new().unwrap();
        let reads = read_sam(write_sam(&dir)).unwrap();
        assert_eq!(reads, expected());
    }

    #[test]
    fn test_read_bam() {
        let dir = TempDir::new().unwrap();
        let sam_path = write_sam(&dir);
        let bam_path = dir.path().join("reads.bam");

        let mut reader = sam::io::reader::Builder::default()
            .build_from_path(&sam_path)
            .unwrap();
        let header = reader.read_header().unwrap();
        let mut writer = bam::io::Writer::new(File::create(&bam_path).unwrap());
        writer.write_alignment_header(&header).unwrap();
        let mut record = sam::Record::default();
        while reader.read_record(&mut record).unwrap() != 0 {
            writer.write_alignment_record(&header, &record).unwrap();
        }
        writer.finish(&header).unwrap();
        drop(writer);

        assert_eq!(read_bam(&bam_path).unwrap(), expected());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = read_bam(dir.path().join("absent.bam"));
        assert!(matches!(result, Err(ReadsError::Io(_))));
    }
}
