//! updxml CLI - UPD spreadsheet to ON_NSCHFDOPPR XML converter

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use updxml::detect::is_supported_extension;
use updxml::{
    BatchConverter, ConverterConfig, FileStatus, JsonFormat, OutputEncoding, UpdConverter,
};

#[derive(Parser)]
#[command(name = "updxml")]
#[command(version)]
#[command(about = "Convert UPD spreadsheets to ON_NSCHFDOPPR XML", long_about = None)]
struct Cli {
    /// Input spreadsheet files
    #[arg(value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE", env = "UPDXML_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert spreadsheets to XML files
    Convert {
        /// Input spreadsheet files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (current directory if not specified)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// JSON configuration file
        #[arg(short, long, value_name = "FILE", env = "UPDXML_CONFIG")]
        config: Option<PathBuf>,

        /// Output encoding label (overrides the configuration)
        #[arg(short, long, value_name = "LABEL")]
        encoding: Option<String>,

        /// Write a JSON report of per-file results
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Print the XML for one spreadsheet without writing files
    Preview {
        /// Input spreadsheet file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// JSON configuration file
        #[arg(short, long, value_name = "FILE", env = "UPDXML_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Print extracted document fields, items and totals as JSON
    Inspect {
        /// Input spreadsheet file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// JSON configuration file
        #[arg(short, long, value_name = "FILE", env = "UPDXML_CONFIG")]
        config: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the default configuration as JSON
    Config,

    /// Show version information
    Version,
}

type CmdResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            inputs,
            output,
            config,
            encoding,
            report,
        }) => cmd_convert(
            &inputs,
            output.as_deref(),
            config.as_deref(),
            encoding.as_deref(),
            report.as_deref(),
        ),
        Some(Commands::Preview { input, config }) => cmd_preview(&input, config.as_deref()),
        Some(Commands::Inspect {
            input,
            config,
            compact,
        }) => cmd_inspect(&input, config.as_deref(), compact),
        Some(Commands::Config) => cmd_config(),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if cli.inputs.is_empty() {
                println!("{}", "Usage: updxml <FILE>... [-o DIR]".yellow());
                println!("       updxml --help for more information");
                Ok(())
            } else {
                cmd_convert(
                    &cli.inputs,
                    cli.output.as_deref(),
                    cli.config.as_deref(),
                    None,
                    None,
                )
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<ConverterConfig, updxml::Error> {
    match path {
        Some(path) => {
            log::debug!("Loading configuration from {}", path.display());
            ConverterConfig::from_json_file(path)
        }
        None => Ok(ConverterConfig::default()),
    }
}

fn cmd_convert(
    inputs: &[PathBuf],
    output: Option<&Path>,
    config: Option<&Path>,
    encoding: Option<&str>,
    report_path: Option<&Path>,
) -> CmdResult {
    let mut config = load_config(config)?;
    if let Some(label) = encoding {
        config = config.with_encoding(OutputEncoding::from_label(label)?);
    }
    let output_dir = output.unwrap_or_else(|| Path::new("."));

    let (inputs, skipped): (Vec<&PathBuf>, Vec<&PathBuf>) = inputs.iter().partition(|path| {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(is_supported_extension)
    });
    for path in &skipped {
        eprintln!(
            "{} {} (not a spreadsheet extension)",
            "Skipping".yellow(),
            path.display()
        );
    }
    if inputs.is_empty() {
        return Err("no spreadsheet files to convert".into());
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let batch = BatchConverter::new(UpdConverter::new(config));
    let report = batch.convert_all(&inputs, output_dir, |progress| {
        pb.set_position((progress.current - 1) as u64);
        pb.set_message(progress.file_name.clone());
    })?;
    pb.set_position(inputs.len() as u64);
    pb.finish_with_message("Done!");

    println!("\n{}", "Results:".green().bold());
    let last = report.outcomes.len().saturating_sub(1);
    for (index, outcome) in report.outcomes.iter().enumerate() {
        let branch = if index == last { "└─" } else { "├─" };
        match &outcome.status {
            FileStatus::Success {
                output_path,
                item_count,
                ..
            } => println!(
                "  {} {} {} {} ({} items)",
                branch.dimmed(),
                "✓".green(),
                outcome.file_name,
                output_path.display().to_string().dimmed(),
                item_count
            ),
            FileStatus::Failed { message } => println!(
                "  {} {} {}: {}",
                branch.dimmed(),
                "✗".red(),
                outcome.file_name,
                message.red()
            ),
        }
    }

    println!(
        "\n{} converted, {} failed",
        report.succeeded().to_string().green().bold(),
        if report.failed() > 0 {
            report.failed().to_string().red().bold()
        } else {
            report.failed().to_string().normal()
        }
    );

    if let Some(path) = report_path {
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        println!("{} {}", "Report saved to".green(), path.display());
    }

    if !report.all_succeeded() || !skipped.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_preview(input: &Path, config: Option<&Path>) -> CmdResult {
    let converter = UpdConverter::new(load_config(config)?);
    let result = converter.preview(input)?;
    println!(
        "{}",
        result.to_document_string(converter.config().xml_encoding)
    );
    Ok(())
}

fn cmd_inspect(input: &Path, config: Option<&Path>, compact: bool) -> CmdResult {
    let converter = UpdConverter::new(load_config(config)?);
    let doc = converter.extract_file(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    println!("{}", updxml::render::to_json(&doc, format)?);

    if doc.items.is_empty() {
        eprintln!("{}", "No goods table found".yellow());
    }
    Ok(())
}

fn cmd_config() -> CmdResult {
    println!("{}", ConverterConfig::default().to_json_pretty()?);
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "updxml".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("UPD spreadsheet to ON_NSCHFDOPPR XML converter");
    println!();
    println!("Input: xlsx, xlsm, xlsb, xls, ods");
    println!("License: MIT");
}
