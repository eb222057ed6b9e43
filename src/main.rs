//! PeakSense: contrast-based peak calling
//!
//! Usage: peaksense <SAMPLE> <CONTROL> [OPTIONS]

use clap::Parser;
use env_logger::Env;
use log::info;
use std::fs::File;
use std::path::PathBuf;
use std::process;

use peaksense::error::Result;
use peaksense::output::{default_output_path, PeakWriter};
use peaksense::{load_read_set, ChromosomeSelection, PeakCallConfig, PeakCaller, QualityFilter};

#[derive(Parser)]
#[command(name = "peaksense")]
#[command(version)]
#[command(about = "Perform peak finding on transcription factors", long_about = None)]
struct Cli {
    /// Sample reads: BAM, SAM, or tab-delimited chrom, start, end, name, MAPQ
    /// (`bedtools bamtobed` output)
    sample: PathBuf,

    /// Control reads, same format as the sample
    control: PathBuf,

    /// Peak width to report
    #[arg(short = 'w', long = "width-peaks", default_value_t = 75,
          value_parser = clap::value_parser!(u64).range(1..))]
    width: u64,

    /// Chromosome names to analyze, separated by spaces; `all` selects every sample chromosome
    #[arg(short = 'c', long, num_args = 1.., default_value = "all")]
    chromosomes: Vec<String>,

    /// Reads with mapping quality below this threshold are discarded
    #[arg(short = 'q', long = "quality-threshold", default_value_t = 35)]
    quality_threshold: u8,

    /// Moving-average window; higher values give smoother coverage
    #[arg(short = 's', long = "smoothing-factor", default_value_t = 3,
          value_parser = clap::value_parser!(u64).range(1..))]
    smoothing_factor: u64,

    /// Neighbourhood half-width in which a peak must be the strict maximum
    #[arg(short = 'm', long = "maxima-order", default_value_t = 10,
          value_parser = clap::value_parser!(u64).range(1..))]
    maxima_order: u64,

    /// Minimum contrast score; lower-scoring maxima are discarded
    #[arg(short = 'H', long = "harmonic-threshold", default_value_t = 20.0)]
    harmonic_threshold: f64,

    /// Output BED file (default: derived from the sample file name)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Number of threads to use (default: number of CPUs)
    #[arg(long, short = 't')]
    threads: Option<usize>,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Configure thread pool if --threads specified
    if let Some(n) = cli.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
        {
            eprintln!("Error: failed to initialize thread pool: {}", e);
            process::exit(1);
        }
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = PeakCallConfig::new()
        .with_smoothing_factor(cli.smoothing_factor as usize)
        .with_maxima_order(cli.maxima_order as usize)
        .with_harmonic_threshold(cli.harmonic_threshold)
        .with_width(cli.width as usize)
        .with_chromosomes(ChromosomeSelection::from_names(cli.chromosomes));

    // Reject bad parameters before reading any input
    let caller = PeakCaller::new(config)?;

    let filter = QualityFilter::new(cli.quality_threshold);
    let sample = load_read_set(&cli.sample, &filter)?;
    let control = load_read_set(&cli.control, &filter)?;

    let result = caller.call(&sample, &control)?;
    drop(sample);
    drop(control);

    let output_path = cli
        .output
        .unwrap_or_else(|| default_output_path(&cli.sample));
    let mut writer = PeakWriter::new(File::create(&output_path)?);
    writer.write_peaks(&result.peaks)?;
    writer.flush()?;

    info!(
        "File generated: {} ({} peaks)",
        output_path.display(),
        writer.written()
    );
    Ok(())
}
