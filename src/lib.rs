//! PeakSense: contrast-based peak calling for transcription factor binding data.
//!
//! Given aligned reads for a sample and a paired control, PeakSense builds
//! per-base depth for each chromosome, smooths it, scores sample enrichment
//! over control at every position, and reports strict local maxima whose
//! score clears a threshold.
//!
//! # Features
//!
//! - **BAM, SAM or text input**: alignments are decoded with noodles;
//!   `bedtools bamtobed` output is parsed directly
//! - **Parallel processing**: chromosomes are called independently with Rayon
//! - **Linear-time stages**: difference-array coverage, running-sum smoothing
//!   and a skip-ahead maxima scan
//! - **No console output**: progress and per-chromosome statistics go through
//!   the `log` facade and are also returned as [`pipeline::ChromosomeReport`]s
//!
//! # Example
//!
//! ```rust,no_run
//! use peaksense::prelude::*;
//!
//! let filter = QualityFilter::new(35);
//! let sample = load_read_set("sample.bam", &filter).unwrap();
//! let control = load_read_set("control.bam", &filter).unwrap();
//!
//! let caller = PeakCaller::new(PeakCallConfig::default()).unwrap();
//! let result = caller.call(&sample, &control).unwrap();
//!
//! let mut writer = PeakWriter::new(std::io::stdout());
//! writer.write_peaks(&result.peaks).unwrap();
//! writer.flush().unwrap();
//! ```

pub mod alignments;
pub mod config;
pub mod error;
pub mod interval;
pub mod output;
pub mod peak;
pub mod pipeline;
pub mod reads;
pub mod signal;

// Re-export commonly used types
pub use config::{ChromosomeSelection, ConfigError, PeakCallConfig};
pub use error::PeakError;
pub use interval::{AlignedRead, ReadInterval};
pub use peak::{CandidatePeak, Peak};
pub use pipeline::{ChromosomeReport, PeakCallResult, PeakCaller};
pub use reads::{load_read_set, InputFormat, QualityFilter, ReadSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{ChromosomeSelection, PeakCallConfig};
    pub use crate::interval::{AlignedRead, ReadInterval};
    pub use crate::output::{default_output_path, PeakWriter};
    pub use crate::peak::{CandidatePeak, Peak};
    pub use crate::pipeline::{PeakCallResult, PeakCaller};
    pub use crate::reads::{load_read_set, parse_reads, QualityFilter, ReadSet};
}
