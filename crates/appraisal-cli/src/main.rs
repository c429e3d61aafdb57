mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::appraisal::{AppraiseArgs, EvaluateArgs, ProjectArgs};
use commands::extraction::{ExtractArgs, PromptArgs};
use commands::sensitivity::SensitivityArgs;

/// Investment appraisal of business-plan projects
#[derive(Parser)]
#[command(
    name = "appraise",
    version,
    about = "Investment appraisal of business-plan projects",
    long_about = "Projects steady-state yearly cash flows from six plan parameters \
                  (investment, life, revenue, cost, tax rate, WACC) and evaluates \
                  NPV, IRR, payback and discounted payback with decimal precision. \
                  Set RUST_LOG=debug for diagnostics on stderr."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the year-by-year cash-flow table
    Project(ProjectArgs),
    /// Evaluate NPV, IRR, PP and DPP for an explicit cash-flow series
    Evaluate(EvaluateArgs),
    /// Project cash flows and evaluate them in one step
    Appraise(AppraiseArgs),
    /// Decode the reply of the document-understanding service into parameters
    Extract(ExtractArgs),
    /// Print the extraction prompt for a plain-text business plan
    Prompt(PromptArgs),
    /// NPV grid over discount rate and revenue change
    Sensitivity(SensitivityArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Project(args) => commands::appraisal::run_project(args),
        Commands::Evaluate(args) => commands::appraisal::run_evaluate(args),
        Commands::Appraise(args) => commands::appraisal::run_appraise(args),
        Commands::Extract(args) => commands::extraction::run_extract(args),
        Commands::Prompt(args) => commands::extraction::run_prompt(args),
        Commands::Sensitivity(args) => commands::sensitivity::run_sensitivity(args),
        Commands::Version => {
            println!("appraise {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
