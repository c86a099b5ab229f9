use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

mod audit;
mod catalogue;
mod config;
mod flags;
mod report;

pub use audit::Audit;
pub use catalogue::FileCatalogue;
pub use config::{AuditConfig, CONFIG_FILE_NAME};

use flags::FormatFlag;

/// Exit code when coverage is below `--min-coverage`.
pub const EXIT_THRESHOLD: u8 = 2;

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| {
            if text.ends_with('\n') {
                Ok(())
            } else {
                stdout.write_all(b"\n")
            }
        })
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "agent-coverage")]
#[command(about = "Audit agent contracts against a repository file tree", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit every contract against the file tree
    Audit(AuditArgs),

    /// Show which agents know, write, and read one file
    File(FileArgs),

    /// Show what one agent knows, may write, and may read
    Agent(AgentArgs),
}

#[derive(Args)]
struct TargetArgs {
    /// Repository root (defaults to current directory)
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Config file (defaults to <root>/agent-coverage.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Contracts directory (overrides `contracts_dir` from the config)
    #[arg(long)]
    contracts: Option<PathBuf>,
}

impl TargetArgs {
    fn prepare(&self) -> Result<Audit> {
        Audit::prepare(&self.root, self.config.as_deref(), self.contracts.as_deref())
    }
}

#[derive(Args)]
struct AuditArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: FormatFlag,

    /// Write the report to this file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,

    /// Fail with exit code 2 when coverage is below this percentage
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    min_coverage: Option<u32>,
}

#[derive(Args)]
struct FileArgs {
    /// Catalogue path, relative to the root
    path: String,

    #[command(flatten)]
    target: TargetArgs,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct AgentArgs {
    /// Contract name
    name: String,

    #[command(flatten)]
    target: TargetArgs,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

pub fn main_entry() -> Result<ExitCode> {
    let mut cli = Cli::parse();

    // stdout carries the JSON document, keep logs down
    let json_output = match &cli.command {
        Commands::Audit(args) => args.format.is_json() && args.out.is_none(),
        Commands::File(args) => args.json,
        Commands::Agent(args) => args.json,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Audit(args) => run_audit(args),
        Commands::File(args) => run_file(args),
        Commands::Agent(args) => run_agent(args),
    }
}

fn run_audit(args: AuditArgs) -> Result<ExitCode> {
    let audit = args.target.prepare()?;
    let report = audit.run()?;

    let rendered = match args.format {
        FormatFlag::Table => report::render_table(audit.root(), &report),
        FormatFlag::Markdown => report::render_markdown(audit.root(), &report),
        FormatFlag::Json => serde_json::to_string_pretty(&report)?,
    };

    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            log::info!("Report written to {}", path.display());
        }
        None => print_stdout(&rendered)?,
    }

    if let Some(min) = args.min_coverage {
        if !report.meets_threshold(min) {
            log::error!(
                "Coverage {}% is below the required {min}%",
                report.stats.coverage_percent
            );
            return Ok(ExitCode::from(EXIT_THRESHOLD));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_file(args: FileArgs) -> Result<ExitCode> {
    let audit = args.target.prepare()?;
    let report = audit.run()?;
    let file = audit
        .analyzer()
        .file_report(&report, &args.path)
        .with_context(|| format!("{} is not in the file catalogue", args.path))?;

    let rendered = if args.json {
        serde_json::to_string_pretty(&file)?
    } else {
        report::render_file(&file)
    };
    print_stdout(&rendered)?;
    Ok(ExitCode::SUCCESS)
}

fn run_agent(args: AgentArgs) -> Result<ExitCode> {
    let audit = args.target.prepare()?;
    let report = audit.run()?;
    let agent = audit
        .analyzer()
        .agent_report(&report, &args.name)
        .with_context(|| format!("No contract named {}", args.name))?;

    let rendered = if args.json {
        serde_json::to_string_pretty(&agent)?
    } else {
        report::render_agent(&agent)
    };
    print_stdout(&rendered)?;
    Ok(ExitCode::SUCCESS)
}
