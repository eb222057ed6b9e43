//! Per-chromosome signal stages.
//!
//! Each stage consumes the complete output of the previous one:
//!
//! - [`coverage`]: read intervals to equal-length depth arrays
//! - [`smooth`]: moving-average ("valid" convolution) of a depth array
//! - [`contrast`]: sample-vs-control enrichment score per position
//! - [`extrema`]: strict local maxima of the contrast signal
//! - [`filter`]: threshold on the contrast score, with a reduction report

pub mod contrast;
pub mod coverage;
pub mod extrema;
pub mod filter;
pub mod smooth;

pub use contrast::contrast;
pub use coverage::{build_coverage, depth_array, shared_length, CoveragePair};
pub use extrema::{find_candidates, strict_local_maxima};
pub use filter::{filter_candidates, FilterReport};
pub use smooth::moving_average;
