//! Peak-calling parameters and chromosome selection.
//!
//! Everything here is validated once, before any coverage array is
//! allocated, so a bad parameter never costs a pass over the data.

use crate::reads::ReadSet;
use thiserror::Error;

/// Configuration errors. Each names the offending parameter or chromosome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A numeric parameter outside its domain.
    #[error("Invalid value for `{parameter}`: {message}")]
    InvalidParameter {
        parameter: &'static str,
        message: String,
    },

    /// An explicitly requested chromosome with no sample reads.
    #[error("Chromosome {0} does not exist in sample")]
    UnknownChromosome(String),
}

/// Which chromosomes to call peaks on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChromosomeSelection {
    /// Every chromosome present in the sample reads, in first-appearance order.
    #[default]
    AllChromosomes,
    /// An explicit list, processed in the given order (duplicates ignored).
    ExplicitSet(Vec<String>),
}

impl ChromosomeSelection {
    /// Build a selection from command-line style names, where a lone `all`
    /// selects every sample chromosome.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() || (names.len() == 1 && names[0].eq_ignore_ascii_case("all")) {
            ChromosomeSelection::AllChromosomes
        } else {
            ChromosomeSelection::ExplicitSet(names)
        }
    }

    /// Resolve against the sample reads into a concrete, ordered list.
    ///
    /// Fails on the first explicitly named chromosome without sample reads.
    pub fn resolve(&self, sample: &ReadSet) -> Result<Vec<String>, ConfigError> {
        match self {
            ChromosomeSelection::AllChromosomes => Ok(sample.chromosomes().cloned().collect()),
            ChromosomeSelection::ExplicitSet(names) => {
                let mut resolved: Vec<String> = Vec::with_capacity(names.len());
                for name in names {
                    if !sample.has_chrom(name) {
                        return Err(ConfigError::UnknownChromosome(name.clone()));
                    }
                    if !resolved.contains(name) {
                        resolved.push(name.clone());
                    }
                }
                Ok(resolved)
            }
        }
    }
}

/// Parameters for [`crate::pipeline::PeakCaller`].
#[derive(Debug, Clone, PartialEq)]
pub struct PeakCallConfig {
    /// Moving-average window over raw depth.
    pub smoothing_factor: usize,
    /// Half-width of the local-maximum neighbourhood.
    pub maxima_order: usize,
    /// Minimum contrast score for a maximum to be kept.
    pub harmonic_threshold: f64,
    /// Peak width; the emitted anchor base sits `width / 2` before the maximum.
    pub width: usize,
    /// Chromosomes to process, resolved against the sample reads.
    pub chromosomes: ChromosomeSelection,
}

impl Default for PeakCallConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: 3,
            maxima_order: 10,
            harmonic_threshold: 20.0,
            width: 75,
            chromosomes: ChromosomeSelection::AllChromosomes,
        }
    }
}

impl PeakCallConfig {
    /// Default parameters: 3, 10, 20.0, 75, every chromosome.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_smoothing_factor(mut self, smoothing_factor: usize) -> Self {
        self.smoothing_factor = smoothing_factor;
        self
    }

    pub fn with_maxima_order(mut self, maxima_order: usize) -> Self {
        self.maxima_order = maxima_order;
        self
    }

    pub fn with_harmonic_threshold(mut self, harmonic_threshold: f64) -> Self {
        self.harmonic_threshold = harmonic_threshold;
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_chromosomes(mut self, chromosomes: ChromosomeSelection) -> Self {
        self.chromosomes = chromosomes;
        self
    }

    /// Check every parameter against its domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("smoothing_factor", self.smoothing_factor)?;
        positive("maxima_order", self.maxima_order)?;
        positive("width", self.width)?;

        if !self.harmonic_threshold.is_finite() || self.harmonic_threshold < 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "harmonic_threshold",
                message: format!(
                    "must be a non-negative number, got {}",
                    self.harmonic_threshold
                ),
            });
        }

        if let ChromosomeSelection::ExplicitSet(names) = &self.chromosomes {
            if names.is_empty() {
                return Err(ConfigError::InvalidParameter {
                    parameter: "chromosomes",
                    message: "explicit chromosome list is empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn positive(parameter: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::InvalidParameter {
            parameter,
            message: "must be a positive integer".to_string(),
        })
    } else {
        Ok(())
    }
}
