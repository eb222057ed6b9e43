//! Per-chromosome peak calling with Rayon.
//!
//! Chromosomes share no state: each one runs coverage, smoothing, contrast,
//! extrema detection and filtering in sequence on its own arrays, and the
//! arrays are dropped as soon as its peaks are assembled. Results are merged
//! in the resolved chromosome order.

use crate::config::{ConfigError, PeakCallConfig};
use crate::interval::ReadInterval;
use crate::peak::Peak;
use crate::reads::ReadSet;
use crate::signal::{
    build_coverage, contrast, filter_candidates, find_candidates, moving_average, CoveragePair,
    FilterReport,
};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::fmt;

/// What happened on one chromosome.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromosomeReport {
    pub chrom: String,
    /// Sample reads on this chromosome after quality filtering.
    pub sample_reads: usize,
    /// Control reads on this chromosome after quality filtering.
    pub control_reads: usize,
    /// Length of the shared depth arrays.
    pub coverage_len: usize,
    /// Length of the smoothed and contrast signals.
    pub signal_len: usize,
    /// Candidate counts around the contrast threshold.
    pub filter: FilterReport,
    /// Maxima that passed the threshold but sit closer than `width / 2` to
    /// the chromosome start, so their anchor has no valid coordinate.
    pub before_chrom_start: usize,
}

impl fmt::Display for ChromosomeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "chromosome {}: {} sample / {} control reads, {} bp, {}",
            self.chrom, self.sample_reads, self.control_reads, self.coverage_len, self.filter
        )?;
        if self.before_chrom_start > 0 {
            write!(
                f,
                ", {} dropped before chromosome start",
                self.before_chrom_start
            )?;
        }
        Ok(())
    }
}

/// Peaks and report for one chromosome.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromosomeResult {
    pub peaks: Vec<Peak>,
    pub report: ChromosomeReport,
}

/// Peaks across all processed chromosomes, in resolved chromosome order and
/// ascending position within a chromosome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeakCallResult {
    pub peaks: Vec<Peak>,
    pub reports: Vec<ChromosomeReport>,
}

impl PeakCallResult {
    /// Candidates seen before thresholding, over all chromosomes.
    pub fn total_candidates(&self) -> usize {
        self.reports.iter().map(|r| r.filter.before).sum()
    }
}

impl FromIterator<ChromosomeResult> for PeakCallResult {
    fn from_iter<I: IntoIterator<Item = ChromosomeResult>>(iter: I) -> Self {
        let mut merged = PeakCallResult::default();
        for result in iter {
            merged.peaks.extend(result.peaks);
            merged.reports.push(result.report);
        }
        merged
    }
}

/// Sample-vs-control peak caller.
#[derive(Debug, Clone)]
pub struct PeakCaller {
    config: PeakCallConfig,
}

impl PeakCaller {
    /// Validates the configuration up front.
    pub fn new(config: PeakCallConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PeakCallConfig {
        &self.config
    }

    /// Call peaks on every selected chromosome in parallel.
    ///
    /// Chromosome selection is resolved before any array is allocated.
    pub fn call(&self, sample: &ReadSet, control: &ReadSet) -> Result<PeakCallResult, ConfigError> {
        let chroms = self.config.chromosomes.resolve(sample)?;
        info!("Calling peaks on {} chromosome(s)", chroms.len());

        let results: Vec<ChromosomeResult> = chroms
            .par_iter()
            .map(|chrom| self.call_chromosome(chrom, sample.get(chrom), control.get(chrom)))
            .collect();

        let merged: PeakCallResult = results.into_iter().collect();
        info!(
            "Called {} peaks from {} candidates",
            merged.peaks.len(),
            merged.total_candidates()
        );
        Ok(merged)
    }

    /// Run all stages on one chromosome's read intervals.
    pub fn call_chromosome(
        &self,
        chrom: &str,
        sample: &[ReadInterval],
        control: &[ReadInterval],
    ) -> ChromosomeResult {
        let coverage = build_coverage(sample, control);
        let mut result = self.call_coverage(chrom, coverage);
        result.report.sample_reads = sample.len();
        result.report.control_reads = control.len();
        result
    }

    /// Run smoothing onwards on precomputed depth arrays.
    ///
    /// Takes ownership so the depth arrays are freed once smoothed.
    pub fn call_coverage(&self, chrom: &str, coverage: CoveragePair) -> ChromosomeResult {
        let coverage_len = coverage.len();
        let window = self.config.smoothing_factor;

        let smoothed_sample = moving_average(coverage.sample(), window);
        let smoothed_control = moving_average(coverage.control(), window);
        drop(coverage);

        let harmonic = contrast(&smoothed_sample, &smoothed_control);
        drop(smoothed_sample);
        drop(smoothed_control);
        debug!(
            "{}: {} bp depth, {} bp contrast signal",
            chrom,
            coverage_len,
            harmonic.len()
        );

        let candidates = find_candidates(&harmonic, self.config.maxima_order);
        let signal_len = harmonic.len();
        drop(harmonic);

        let (kept, filter) = filter_candidates(candidates, self.config.harmonic_threshold);
        let peaks: Vec<Peak> = kept
            .into_iter()
            .filter_map(|c| c.into_peak(chrom, self.config.width))
            .collect();
        let before_chrom_start = filter.after - peaks.len();
        if before_chrom_start > 0 {
            warn!(
                "{}: {} peak(s) within {} bp of the chromosome start dropped",
                chrom,
                before_chrom_start,
                self.config.width / 2
            );
        }

        let report = ChromosomeReport {
            chrom: chrom.to_string(),
            sample_reads: 0,
            control_reads: 0,
            coverage_len,
            signal_len,
            filter,
            before_chrom_start,
        };
        info!("{}", report);

        ChromosomeResult { peaks, report }
    }
}
