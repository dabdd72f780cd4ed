use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use kira_kb_collector::app::{App, LogSink, RunResult};
use kira_kb_collector::client::SparqlHttpClient;
use kira_kb_collector::config::{ConfigLoader, ResolvedConfig};
use kira_kb_collector::domain::{Dataset, OutputFormat};
use kira_kb_collector::error::KiraError;
use kira_kb_collector::output::{JsonOutput, OutputMode};

#[derive(Parser)]
#[command(name = "kira-kb")]
#[command(about = "Collect UniProt and Rhea tables over SPARQL and save them as CSV/XLSX")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    non_interactive: bool,

    #[arg(long, global = true)]
    config: Option<String>,

    #[arg(long, global = true)]
    output_dir: Option<String>,

    #[arg(long, global = true)]
    batch_size: Option<usize>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Collect every dataset (default)")]
    All,
    #[command(about = "Organism, kingdom and superkingdom per protein")]
    Taxa,
    #[command(about = "Recommended and submitted protein names")]
    Names,
    #[command(about = "Pfam families per protein")]
    Pfams,
    #[command(about = "Protein sequences")]
    Sequences,
    #[command(about = "Catalysed Rhea reactions joined with participants")]
    Reactions,
    #[command(about = "Print the UniProt SPARQL query of a dataset without sending it")]
    Query(QueryArgs),
}

#[derive(Args)]
struct QueryArgs {
    #[arg(value_enum)]
    dataset: Dataset,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(kira) = report.downcast_ref::<KiraError>() {
            return ExitCode::from(map_exit_code(kira));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &KiraError) -> u8 {
    match error {
        KiraError::InvalidBatchSize(_)
        | KiraError::InvalidPfamId(_)
        | KiraError::ConfigRead(_)
        | KiraError::ConfigParse(_)
        | KiraError::UnsupportedOutputFormat(_) => 2,
        KiraError::SparqlHttp(_) | KiraError::SparqlStatus { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    let config = resolve_config(&cli)?;

    let datasets = match cli.command.unwrap_or(Commands::All) {
        Commands::All => Dataset::ALL.to_vec(),
        Commands::Taxa => vec![Dataset::Taxa],
        Commands::Names => vec![Dataset::Names],
        Commands::Pfams => vec![Dataset::Pfams],
        Commands::Sequences => vec![Dataset::Sequences],
        Commands::Reactions => vec![Dataset::Reactions],
        Commands::Query(args) => {
            let client = SparqlHttpClient::new(config.timeout)?;
            let app = App::new(client, config);
            print!("{}", app.preview(args.dataset));
            return Ok(());
        }
    };

    let client = SparqlHttpClient::new(config.timeout)?;
    let app = App::new(client, config);
    let result = app.run(&datasets, cli.format, &LogSink)?;

    match output_mode {
        OutputMode::NonInteractive => JsonOutput::print_run(&result).into_diagnostic()?,
        OutputMode::Interactive => print_run_summary(&result),
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> miette::Result<ResolvedConfig> {
    let mut config = ConfigLoader::resolve(cli.config.as_deref())?;
    if let Some(dir) = &cli.output_dir {
        config.output_dir = Utf8PathBuf::from(dir);
    }
    if let Some(size) = cli.batch_size {
        if size < 1 {
            return Err(KiraError::InvalidBatchSize(size).into());
        }
        config.batch_size = size;
    }
    Ok(config)
}

fn print_run_summary(result: &RunResult) {
    let green = "\x1b[32m";
    let cyan = "\x1b[36m";
    let reset = "\x1b[0m";

    println!("{cyan}KIRA-KB summary{reset}");
    println!("{green}Saved datasets: {}{reset}", result.items.len());
    for item in &result.items {
        println!(
            "{green}  {} rows={} ({} ms){reset}",
            item.dataset, item.rows, item.elapsed_ms
        );
        println!("{green}    file: {}{reset}", item.path);
    }
}
