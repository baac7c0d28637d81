//! Command-line front end for svdpress.
//!
//! `compress` mirrors one submission of the upload form: sweep stale files,
//! accept the input into upload storage, compress into output storage, and
//! print the statistics. `sweep` runs the retention sweep on its own.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::LevelFilter;

use svdpress::logging::init_logging;
use svdpress::storage::{accept_upload, output_file_name, sweep_stale_files, DEFAULT_MAX_AGE};
use svdpress::utils::format_size;
use svdpress::{compress_image, CompressionConfig, CompressionResult, OutputFormat, RankSpec, SvdPressError};

#[derive(Parser, Debug)]
#[command(name = "svdpress", version, about = "Low-rank SVD image compression")]
struct Cli {
    /// Log progress (quality trials, per-channel ranks) to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Append log output to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress one image.
    Compress(CompressArgs),
    /// Delete stale files from storage directories.
    Sweep(SweepArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Jpg,
    Png,
    Webp,
    Bmp,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Jpg => OutputFormat::Jpeg,
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Webp => OutputFormat::WebP,
            FormatArg::Bmp => OutputFormat::Bmp,
        }
    }
}

#[derive(Args, Debug)]
struct CompressArgs {
    /// Image to compress.
    input: PathBuf,

    /// Components kept per channel: a positive integer, or `auto` for the
    /// energy-retention rank.
    #[arg(short, long, default_value = "50")]
    rank: RankSpec,

    /// Output codec.
    #[arg(short, long, value_enum, default_value_t = FormatArg::Jpg)]
    format: FormatArg,

    #[arg(long, default_value = "static/uploads")]
    upload_dir: PathBuf,

    #[arg(long, default_value = "static/outputs")]
    output_dir: PathBuf,

    /// JSON configuration file (retention, quality search settings).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Age in seconds after which stored files are swept.
    #[arg(long, default_value_t = DEFAULT_MAX_AGE.as_secs())]
    max_age: u64,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct SweepArgs {
    #[arg(required = true)]
    dirs: Vec<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_MAX_AGE.as_secs())]
    max_age: u64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = init_logging(level, cli.log_file.as_deref()) {
        eprintln!("{} {}", "error:".red().bold(), e);
        return ExitCode::FAILURE;
    }

    let outcome = match cli.command {
        Command::Compress(args) => run_compress(args),
        Command::Sweep(args) => run_sweep(args),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn sweep_quietly(dir: &Path, max_age: Duration) {
    if !dir.exists() {
        return;
    }
    if let Err(e) = sweep_stale_files(dir, max_age) {
        log::warn!("error accessing folder '{}': {}", dir.display(), e);
    }
}

fn run_compress(args: CompressArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => CompressionConfig::from_json_file(path)
            .with_context(|| format!("loading config '{}'", path.display()))?,
        None => CompressionConfig::default(),
    };

    let max_age = Duration::from_secs(args.max_age);
    sweep_quietly(&args.upload_dir, max_age);
    sweep_quietly(&args.output_dir, max_age);

    let original_name = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .context("input path has no usable file name")?;
    let upload = accept_upload(&args.input, original_name, &args.upload_dir)?;

    let format = OutputFormat::from(args.format);
    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating '{}'", args.output_dir.display()))?;
    let output_path = args
        .output_dir
        .join(output_file_name(upload.stem(), args.rank, format));

    let result = match compress_image(&upload.path, args.rank, &output_path, &config) {
        Ok(result) => result,
        Err(SvdPressError::UnsupportedFormat { channels }) => {
            anyhow::bail!("unsupported image format ({} channels)", channels)
        }
        Err(e) => return Err(e).context("error processing image"),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result, &output_path);
    }
    Ok(())
}

fn print_summary(result: &CompressionResult, output_path: &Path) {
    let percentage = format!("{:.2}%", result.compression_percentage);
    let percentage = if result.compression_percentage >= 0.0 {
        percentage.green()
    } else {
        percentage.red()
    };

    println!("{}", "Compression complete".bold());
    println!("  output            {}", output_path.display());
    println!("  rank (k)          {} (requested {})", result.k, result.requested_rank);
    println!("  recommended k     {}", result.recommended_k);
    println!("  original size     {}", format_size(result.original_size));
    println!("  compressed size   {}", format_size(result.compressed_size));
    println!("  reduction         {}", percentage);
    println!("  frobenius error   {:.2}", result.frobenius_error);
    println!("  quality used      {}", result.quality_used);
    if !result.saved {
        println!("  {}", "output could not be written".yellow());
    }
}

fn run_sweep(args: SweepArgs) -> Result<()> {
    let max_age = Duration::from_secs(args.max_age);
    for dir in &args.dirs {
        let report = sweep_stale_files(dir, max_age)
            .with_context(|| format!("sweeping '{}'", dir.display()))?;
        println!(
            "{}: removed {}, failed {}",
            dir.display(),
            report.removed.len(),
            report.failed.len()
        );
    }
    Ok(())
}
