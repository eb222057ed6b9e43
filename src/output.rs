//! BED output for called peaks.
//!
//! Uses itoa for coordinates and ryu for scores to avoid allocation per line.

use crate::peak::Peak;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffer size for PeakWriter (1MB default).
const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// File-name components dropped when deriving the output name.
const STRIPPED_COMPONENTS: [&str; 4] = ["bam", "sam", "bed", "sorted"];

/// Buffered BED4 writer: `chrom  start  end  score`.
pub struct PeakWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
    ryu_buf: ryu::Buffer,
    written: usize,
}

impl<W: Write> PeakWriter<W> {
    /// Wrap `output` with a 1 MiB buffer.
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, output)
    }

    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            itoa_buf: itoa::Buffer::new(),
            ryu_buf: ryu::Buffer::new(),
            written: 0,
        }
    }

    /// Write one peak as a BED4 line.
    #[inline]
    pub fn write_peak(&mut self, peak: &Peak) -> io::Result<()> {
        self.writer.write_all(peak.chrom.as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer
            .write_all(self.itoa_buf.format(peak.start).as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(self.itoa_buf.format(peak.end).as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.write_score(peak.score)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Scores print without a trailing `.0` when integral.
    #[inline]
    fn write_score(&mut self, score: f64) -> io::Result<()> {
        if score.is_finite() && score.fract() == 0.0 && score.abs() < 1e15 {
            self.writer
                .write_all(self.itoa_buf.format(score as i64).as_bytes())
        } else {
            self.writer.write_all(self.ryu_buf.format(score).as_bytes())
        }
    }

    /// Write peaks in iteration order.
    pub fn write_peaks<'a, I>(&mut self, peaks: I) -> io::Result<()>
    where
        I: IntoIterator<Item = &'a Peak>,
    {
        for peak in peaks {
            self.write_peak(peak)?;
        }
        Ok(())
    }

    /// Number of peaks written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush buffered output.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Output path next to the sample file: `data/x.sorted.bam` becomes
/// `data/x.peaksense.bed`.
pub fn default_output_path(sample: &Path) -> PathBuf {
    let name = sample
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut parts: Vec<&str> = name
        .split('.')
        .filter(|part| !part.is_empty() && !STRIPPED_COMPONENTS.contains(part))
        .collect();
    if parts.is_empty() {
        parts.push("sample");
    }
    parts.extend(["peaksense", "bed"]);

    sample.with_file_name(parts.join("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(chrom: &str, start: u64, score: f64) -> Peak {
        Peak {
            chrom: chrom.to_string(),
            start,
            end: start + 1,
            score,
        }
    }

    #[test]
    fn test_write_bed4() {
        let mut out = Vec::new();
        {
            let mut writer = PeakWriter::new(&mut out);
            writer
                .write_peaks(&[peak("chr1", 63, 36.0), peak("chr2", 0, 20.25)])
                .unwrap();
            assert_eq!(writer.written(), 2);
            writer.flush().unwrap();
        }

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "chr1\t63\t64\t36\nchr2\t0\t1\t20.25\n"
        );
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("data/sample.sorted.bam")),
            PathBuf::from("data/sample.peaksense.bed")
        );
        assert_eq!(
            default_output_path(Path::new("ctcf.rep1.bed")),
            PathBuf::from("ctcf.rep1.peaksense.bed")
        );
        assert_eq!(
            default_output_path(Path::new("reads.tsv")),
            PathBuf::from("reads.tsv.peaksense.bed")
        );
    }

    #[test]
    fn test_default_output_path_only_stripped_parts() {
        assert_eq!(
            default_output_path(Path::new("out/sorted.bam")),
            PathBuf::from("out/sample.peaksense.bed")
        );
    }
}
