use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use console::style;
use tracing::{debug, trace, warn};
use tracing_subscriber::EnvFilter;

use adf2tiff::config;
use adf2tiff::cpl::CslStringList;
use adf2tiff::errors::CplErrType;
use adf2tiff::version;
use adf2tiff::{
    default_output_path, open_source, resolve_input, write_geotiff, AdfInput, Compression,
    ConversionReport, DatasetSummary, InputKind,
};

const RULE_WIDTH: usize = 60;

const EXAMPLES: &str = "\
Examples:
  adf2tiff /path/to/grid
  adf2tiff /path/to/grid output.tif
  adf2tiff /path/to/grid output.tif DEFLATE
  adf2tiff /path/to/grid/hdr.adf --config GDAL_CACHEMAX=512

All grid files must be in the same directory: hdr.adf, w001001.adf, sta.adf, ...";

#[derive(Parser)]
#[command(name = "adf2tiff")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert ESRI ArcInfo binary grids (ADF) to GeoTIFF")]
#[command(after_long_help = EXAMPLES)]
struct Cli {
    /// Grid directory containing hdr.adf, or a file inside it
    input: PathBuf,

    /// Output GeoTIFF [default: <input name>_converted.tif]
    output: Option<PathBuf>,

    /// LZW, DEFLATE or NONE; anything else falls back to LZW [default: LZW]
    compression: Option<String>,

    /// GDAL configuration option, may be repeated
    #[arg(long = "config", value_name = "KEY=VALUE")]
    config: Vec<String>,

    /// Log more, repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print errors only
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return parse_failure(err),
    };

    init_tracing(cli.verbose, cli.quiet);
    config::set_error_handler(forward_gdal_message);

    let result = run(&cli);
    config::remove_error_handler();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!("{err:?}");
            eprintln!("\n{} {err:#}", style("Error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    apply_gdal_config(&cli.config)?;
    let runtime = version::runtime_version()?;
    debug!(build = version::BUILD_VERSION, %runtime, "GDAL version");

    let compression = Compression::parse_or_default(cli.compression.as_deref());
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));

    if !cli.quiet {
        print_banner();
    }

    let context = || format!("converting {}", cli.input.display());
    let input = resolve_input(&cli.input).with_context(context)?;
    if !cli.quiet {
        print_input(&input, &output, compression);
    }

    let (source, summary) = open_source(&input.grid_dir).with_context(context)?;
    if !cli.quiet {
        print_summary(&summary);
    }

    let report = write_geotiff(source, summary, &output, compression).with_context(context)?;
    if !cli.quiet {
        print_report(&report);
    }
    Ok(())
}

/// `--help` and `--version` succeed; every other parse failure exits with 1.
fn parse_failure(err: clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            ExitCode::SUCCESS
        }
        ErrorKind::MissingRequiredArgument => {
            print_usage_guide();
            ExitCode::FAILURE
        }
        _ => {
            let _ = err.print();
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

/// GDAL failures come back as `Err` values as well, so they are only logged at debug level.
fn forward_gdal_message(class: CplErrType, number: i32, msg: &str) {
    match class {
        CplErrType::Warning => warn!(target: "gdal", number, "{msg}"),
        CplErrType::Debug | CplErrType::Failure | CplErrType::Fatal => {
            debug!(target: "gdal", ?class, number, "{msg}")
        }
        CplErrType::None => trace!(target: "gdal", number, "{msg}"),
    }
}

fn apply_gdal_config(pairs: &[String]) -> Result<()> {
    let mut options = CslStringList::new();
    for pair in pairs {
        options
            .add_name_value_pair(pair)
            .with_context(|| format!("invalid --config value '{pair}'"))?;
    }
    config::apply_config_options(&options)?;
    if !options.is_empty() {
        debug!(%options, "applied GDAL configuration");
    }
    Ok(())
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn print_banner() {
    println!();
    println!("{}", rule());
    println!("{}", style("ADF to GeoTIFF Converter").cyan().bold());
    println!("{}", rule());
    println!();
}

fn print_input(input: &AdfInput, output: &Path, compression: Compression) {
    match &input.kind {
        InputKind::Directory => println!("Input:       {}", input.grid_dir.display()),
        InputKind::File(file) => {
            println!("Input:       {}", file.display());
            println!("Using:       {}", input.grid_dir.display());
        }
    }
    println!("Header:      {}", input.header.display());
    println!("Output:      {}", output.display());
    println!("Compression: {compression}");
}

fn print_summary(summary: &DatasetSummary) {
    println!();
    println!("{}", style("Dataset Information:").cyan().bold());
    print!("{summary}");
}

fn print_report(report: &ConversionReport) {
    println!();
    println!("{}", style("Conversion successful!").green());
    println!("   Output size: {:.2} MB", report.output_megabytes());

    match report.verified {
        Some((width, height)) => {
            println!("{}", style("Output file verified").green());
            println!("   Size: {width} x {height} pixels");
        }
        None => println!(
            "[!] {}",
            style("Warning: could not verify output file").yellow()
        ),
    }

    println!();
    println!("{}", rule());
    println!("{}", style("CONVERSION COMPLETE!").green().bold());
    println!("{}", rule());
    println!();
    println!("Your GeoTIFF is ready: {}", report.output.display());
    println!("You can now open it in ArcGIS Pro, QGIS, or any GIS software.");
    println!();
}

fn print_usage_guide() {
    println!("{}", style("adf2tiff - ADF to GeoTIFF converter").cyan().bold());
    println!();
    println!("Usage:");
    println!("  adf2tiff <INPUT> [OUTPUT] [COMPRESSION] [--config KEY=VALUE]... [-v|-q]");
    println!();
    println!("Arguments:");
    println!("  INPUT       : Grid directory containing hdr.adf, or a file in it (required)");
    println!("  OUTPUT      : Path for the output .tif file (optional)");
    println!("                Default: <input name>_converted.tif");
    println!("  COMPRESSION : Compression method (optional)");
    println!("                Options: LZW, DEFLATE, NONE");
    println!("                Default: LZW");
    println!();
    println!("{EXAMPLES}");
    println!();
}
