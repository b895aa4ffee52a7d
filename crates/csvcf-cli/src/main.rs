//! csvcf CLI
//!
//! Command-line tool for converting, merging and renaming contact lists.

use clap::{Parser, Subcommand, ValueEnum};
use csvcf_core::{
    collect_inputs, concatenate_two, convert, make_dataset, merge_ordered, parse_csv, save,
    ConvertJob, ConvertOptions, ConvertReport, Direction, FileOutcome, LoadReport, NamingSequence,
    SessionState,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "csvcf")]
#[command(about = "Convert, merge and rename CSV and vCard contact lists", long_about = None)]
#[command(version)]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Target format of a conversion
#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Vcf,
    Csv,
}

impl From<Format> for Direction {
    fn from(format: Format) -> Self {
        match format {
            Format::Vcf => Direction::ToVcard,
            Format::Csv => Direction::ToTabular,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert CSV files to vCard, or vCard files to CSV
    Convert {
        /// Target format
        #[arg(long, value_enum)]
        to: Format,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Stop at the first file that fails
        #[arg(long)]
        fail_fast: bool,

        /// Write a JSON report of the run
        #[arg(long)]
        report: Option<PathBuf>,

        /// Input files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Merge numbered CSV files in numeric file-name order
    Merge {
        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Input files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Rename the first column of loaded CSV files and save them merged
    Rename {
        /// Name prefix
        #[arg(short, long)]
        prefix: String,

        /// Starting index
        #[arg(short, long, default_value = "1")]
        start: String,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Input files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Build a contact CSV from phone numbers, one per line
    Make {
        /// Name prefix
        #[arg(short, long, default_value = "BET GROUP 1")]
        prefix: String,

        /// Starting index
        #[arg(short, long, default_value = "1")]
        start: String,

        /// File with phone numbers (stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Append the records of one CSV file to another
    Concat {
        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// File whose records come first
        first: PathBuf,

        /// File whose records are appended
        second: PathBuf,
    },

    /// Display loaded CSV files as one table
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Maximum number of rows to display
        #[arg(short, long)]
        limit: Option<usize>,

        /// Input files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Run a conversion job file
    RunJob {
        /// Path to job file (JSON)
        #[arg(short, long)]
        job: PathBuf,

        /// Write a JSON report of the run
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Create a conversion job file
    CreateJob {
        /// Output path for the job file
        #[arg(short, long)]
        output: PathBuf,

        /// Target format
        #[arg(long, value_enum)]
        to: Format,

        /// Output directory for converted files
        #[arg(long)]
        export_dir: PathBuf,

        /// Stop at the first file that fails
        #[arg(long)]
        fail_fast: bool,

        /// Input files or directories
        inputs: Vec<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(command: Commands) -> csvcf_core::Result<()> {
    match command {
        Commands::Convert {
            to,
            output,
            fail_fast,
            report,
            inputs,
        } => cmd_convert(to.into(), &inputs, &output, fail_fast, report.as_deref()),
        Commands::Merge { output, inputs } => cmd_merge(&inputs, &output),
        Commands::Rename {
            prefix,
            start,
            output,
            inputs,
        } => cmd_rename(&inputs, &prefix, &start, &output),
        Commands::Make {
            prefix,
            start,
            input,
            output,
        } => cmd_make(&prefix, &start, input.as_deref(), &output),
        Commands::Concat {
            output,
            first,
            second,
        } => cmd_concat(&first, &second, &output),
        Commands::Show {
            json,
            limit,
            inputs,
        } => cmd_show(&inputs, json, limit),
        Commands::RunJob { job, report } => cmd_run_job(&job, report.as_deref()),
        Commands::CreateJob {
            output,
            to,
            export_dir,
            fail_fast,
            inputs,
        } => cmd_create_job(&output, to.into(), &export_dir, fail_fast, inputs),
    }
}

fn cmd_convert(
    direction: Direction,
    inputs: &[PathBuf],
    output_dir: &Path,
    fail_fast: bool,
    report_path: Option<&Path>,
) -> csvcf_core::Result<()> {
    let files = collect_inputs(inputs, direction.source_extension())?;
    let report = convert(&files, direction, output_dir, ConvertOptions { fail_fast })?;
    finish_conversion(&report, report_path)
}

fn cmd_run_job(job_path: &Path, report_path: Option<&Path>) -> csvcf_core::Result<()> {
    let job = ConvertJob::load(job_path)?;
    println!(
        "Loaded job with {} input(s), writing to {}",
        job.inputs.len(),
        job.output_dir.display()
    );

    let report = job.run()?;
    finish_conversion(&report, report_path)
}

fn finish_conversion(report: &ConvertReport, report_path: Option<&Path>) -> csvcf_core::Result<()> {
    print_report(report);

    if let Some(path) = report_path {
        report.save(path)?;
        println!("Report written to {}", path.display());
    }

    if report.failure_count() > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn print_report(report: &ConvertReport) {
    let converted = report.converted_files();
    println!(
        "Converted {} of {} file(s) into {}",
        converted.len(),
        report.outcomes.len(),
        report.output_dir.display()
    );

    for outcome in &report.outcomes {
        match outcome {
            FileOutcome::Converted {
                output, records, ..
            } => println!("  {} ({} contacts)", output.display(), records),
            FileOutcome::Failed { input, message, .. } => {
                println!("  FAILED {}: {}", input.display(), message)
            }
        }
    }
}

fn cmd_merge(inputs: &[PathBuf], output: &Path) -> csvcf_core::Result<()> {
    let files = collect_inputs(inputs, "csv")?;
    let merged = merge_ordered(&files)?;
    save(&merged, output)?;

    println!(
        "Merged {} files ({} rows) into {}",
        files.len(),
        merged.record_count(),
        output.display()
    );
    Ok(())
}

fn cmd_rename(inputs: &[PathBuf], prefix: &str, start: &str, output: &Path) -> csvcf_core::Result<()> {
    let seq = NamingSequence::parse(prefix, start)?;
    let mut session = load_session(inputs)?;

    session.rename(&seq)?;
    let merged = session.save_merged(output)?;

    println!(
        "Renamed {} rows starting at '{}', saved to {}",
        merged.record_count(),
        seq.name(0),
        output.display()
    );
    Ok(())
}

fn cmd_make(prefix: &str, start: &str, input: Option<&Path>, output: &Path) -> csvcf_core::Result<()> {
    let seq = NamingSequence::parse(prefix, start)?;

    let text = match input {
        Some(path) => std::fs::read_to_string(path).map_err(|e| csvcf_core::Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let dataset = make_dataset(&text, &seq)?;
    save(&dataset, output)?;

    println!("Created {} contacts in {}", dataset.record_count(), output.display());
    Ok(())
}

fn cmd_concat(first: &Path, second: &Path, output: &Path) -> csvcf_core::Result<()> {
    let a = parse_csv(first)?;
    let b = parse_csv(second)?;
    let joined = concatenate_two(&a, &b)?;
    save(&joined, output)?;

    println!(
        "Concatenated {} + {} rows into {}",
        a.record_count(),
        b.record_count(),
        output.display()
    );
    Ok(())
}

fn cmd_show(inputs: &[PathBuf], json: bool, limit: Option<usize>) -> csvcf_core::Result<()> {
    let session = load_session(inputs)?;
    let view = session.view();

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("{}", view.headers.join("\t"));
    println!("{}", "-".repeat(view.headers.len() * 12));

    let row_limit = limit.unwrap_or(view.row_count());
    for row in view.rows.iter().take(row_limit) {
        println!("{}", row.join("\t"));
    }

    if view.row_count() > row_limit {
        println!("... ({} more rows)", view.row_count() - row_limit);
    }

    Ok(())
}

fn cmd_create_job(
    output: &Path,
    direction: Direction,
    export_dir: &Path,
    fail_fast: bool,
    inputs: Vec<PathBuf>,
) -> csvcf_core::Result<()> {
    let inputs = if inputs.is_empty() {
        vec![PathBuf::from(format!("contacts.{}", direction.source_extension()))]
    } else {
        inputs
    };

    let job = ConvertJob {
        direction,
        inputs,
        output_dir: export_dir.to_path_buf(),
        fail_fast,
    };

    job.save(output)?;
    println!("Created job file: {}", output.display());
    println!();
    println!("Edit the file to configure your inputs, then run:");
    println!("  csvcf run-job --job {}", output.display());

    Ok(())
}

/// One line per file that failed to load, naming the file and the reason
fn skipped_lines(report: &LoadReport) -> Vec<String> {
    report
        .failures
        .iter()
        .map(|(path, err)| format!("Skipped {}: {}", path.display(), err))
        .collect()
}

/// Load CSV inputs into a fresh session, reporting files that failed
fn load_session(inputs: &[PathBuf]) -> csvcf_core::Result<SessionState> {
    let files = collect_inputs(inputs, "csv")?;
    let mut session = SessionState::new();
    let report = session.load(&files)?;

    for line in skipped_lines(&report) {
        println!("{}", line);
    }

    if session.is_empty() {
        return Err(csvcf_core::Error::config("none of the selected files could be loaded"));
    }
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_lines_name_each_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");

        let mut session = SessionState::new();
        let report = session.load(&[&a, &b]).unwrap();
        let lines = skipped_lines(&report);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(&format!("Skipped {}: ", a.display())));
        assert!(lines[1].starts_with(&format!("Skipped {}: ", b.display())));
    }
}
