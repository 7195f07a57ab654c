//! somafilt: post-processing filters for somatic variant calls
//!
//! Usage: somafilt <COMMAND> [OPTIONS]

use clap::{ArgGroup, Parser, Subcommand};
use log::{info, Level};
use std::path::PathBuf;
use std::process;

use somafilt::commands::{
    BreakpointFilterCommand, BreakpointSimplifyCommand, NinFilterCommand, NormalSample,
};
use somafilt::config::OutputConfig;
use somafilt::FilterError;

#[derive(Parser)]
#[command(name = "somafilt")]
#[command(version)]
#[command(about = "Post-processing filters for somatic SNV and SV call files", long_about = None)]
struct Cli {
    /// Only log warnings and errors
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drop calls with variant support in the normal sample
    #[command(group(
        ArgGroup::new("normal")
            .required(true)
            .args(["normal_column", "tumor_sample"]),
    ))]
    NinFilter {
        /// Input VCF (e.g. Mutect output)
        #[arg(short, long, visible_alias = "mutect")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// 0-based sample column of the normal (after FORMAT)
        #[arg(short, long)]
        normal_column: Option<usize>,

        /// Name of the tumor sample; the normal is the other column
        #[arg(short = 's', long)]
        tumor_sample: Option<String>,

        /// Maximum allele fraction allowed in the normal
        #[arg(short, long)]
        threshold: f64,

        /// FORMAT field holding the allele fraction
        #[arg(long, default_value = "FA")]
        format_key: String,

        /// Log filter statistics
        #[arg(long)]
        stats: bool,
    },

    /// Reduce a breakpoint table to chr1, pos1, chr2, pos2
    BpSimplify {
        /// Breakpoint table (bp1, bp2, svtype, sample)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Log row count
        #[arg(long)]
        stats: bool,
    },

    /// Keep SV records whose first breakpoint is in a breakpoint table
    BpFilter {
        /// SV VCF to filter
        #[arg(short, long)]
        vcf: PathBuf,

        /// Breakpoint table (bp1, bp2, svtype, sample)
        #[arg(short, long)]
        filtered_tsv: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Accept records within this many bases of a breakpoint
        #[arg(short, long)]
        window: Option<u64>,

        /// Log filter statistics
        #[arg(long)]
        stats: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet { Level::Warn } else { Level::Info };
    if let Err(e) = simple_logger::init_with_level(level) {
        eprintln!("Error: failed to initialise logging: {}", e);
        process::exit(1);
    }

    let result = match cli.command {
        Commands::NinFilter {
            input,
            output_dir,
            normal_column,
            tumor_sample,
            threshold,
            format_key,
            stats,
        } => run_nin_filter(
            input,
            output_dir,
            normal_column,
            tumor_sample,
            threshold,
            format_key,
            stats,
        ),

        Commands::BpSimplify {
            input,
            output_dir,
            stats,
        } => run_bp_simplify(input, output_dir, stats),

        Commands::BpFilter {
            vcf,
            filtered_tsv,
            output_dir,
            window,
            stats,
        } => run_bp_filter(vcf, filtered_tsv, output_dir, window, stats),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_nin_filter(
    input: PathBuf,
    output_dir: PathBuf,
    normal_column: Option<usize>,
    tumor_sample: Option<String>,
    threshold: f64,
    format_key: String,
    stats: bool,
) -> Result<(), FilterError> {
    let normal = match (normal_column, tumor_sample) {
        (Some(column), _) => NormalSample::Column(column),
        (None, Some(name)) => NormalSample::OtherThan(name),
        (None, None) => {
            return Err(FilterError::InvalidArgument(
                "one of --normal-column or --tumor-sample is required".to_string(),
            ))
        }
    };

    let cmd = NinFilterCommand::new(normal, threshold)?.with_format_key(format_key);
    let (path, result) = cmd.run(&input, &OutputConfig::new(output_dir))?;

    if stats {
        info!("Normal-VAF filter stats: {}", result);
    }
    info!("Wrote {}", path.display());

    Ok(())
}

fn run_bp_simplify(input: PathBuf, output_dir: PathBuf, stats: bool) -> Result<(), FilterError> {
    let cmd = BreakpointSimplifyCommand::new();
    let (path, rows) = cmd.run(&input, &OutputConfig::new(output_dir))?;

    if stats {
        info!("Breakpoint simplify stats: Rows: {}", rows);
    }
    info!("Wrote {}", path.display());

    Ok(())
}

fn run_bp_filter(
    vcf: PathBuf,
    filtered_tsv: PathBuf,
    output_dir: PathBuf,
    window: Option<u64>,
    stats: bool,
) -> Result<(), FilterError> {
    let cmd = BreakpointFilterCommand::new().with_window(window);
    let (path, result) = cmd.run(&vcf, &filtered_tsv, &OutputConfig::new(output_dir))?;

    if stats {
        info!("Breakpoint filter stats: {}", result);
    }
    info!("Wrote {}", path.display());

    Ok(())
}
