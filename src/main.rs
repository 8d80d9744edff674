use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dollar_suite::chart::{ChartOptions, TimeSeries, render_svg};
use dollar_suite::ingestion::{IngestionOptions, TracingObserver, ingest_from_path};
use dollar_suite::preview::format_table;
use dollar_suite::processing::{CleaningPipeline, PipelineConfig, describe};
use dollar_suite::store::{TableStore, WriteMode, table_name_for_upload};
use dollar_suite::types::DataSet;

#[derive(Parser)]
#[command(name = "dollar-suite", version)]
#[command(about = "Clean locale-formatted financial exports, store them in SQLite and chart a series")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "DOLLAR_SUITE_DB", default_value = "datos_proyecto.db", global = true)]
    db: PathBuf,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct FileArgs {
    /// Delimited export to load
    file: PathBuf,

    /// The first line is data, not column names
    #[arg(long)]
    no_header: bool,
}

#[derive(Args)]
struct InputArgs {
    #[command(flatten)]
    source: FileArgs,

    /// Pipeline config (JSON). Without one, every column but the first is normalized.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the raw file as loaded, before any cleaning
    Preview {
        #[command(flatten)]
        input: FileArgs,
        #[arg(long, default_value_t = 50)]
        rows: usize,
    },
    /// Run the cleaning pipeline and optionally save the result
    Clean {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, default_value_t = 50)]
        rows: usize,
        /// Write the cleaned table to the database
        #[arg(long)]
        save: bool,
        /// Table name (default: derived from the file name)
        #[arg(long)]
        table: Option<String>,
        /// Append to the table instead of replacing it
        #[arg(long)]
        append: bool,
    },
    /// List stored tables
    Tables,
    /// Print a stored table
    Show {
        table: String,
        #[arg(long, default_value_t = 50)]
        rows: usize,
    },
    /// Drop a stored table
    Drop { table: String },
    /// Render a cleaned column against the time column as SVG
    Chart {
        #[command(flatten)]
        input: InputArgs,
        /// Value column to plot
        #[arg(long)]
        column: String,
        /// Time column (default: the first column)
        #[arg(long)]
        time_column: Option<String>,
        #[arg(long)]
        out: PathBuf,
    },
    /// Summary statistics of a cleaned column
    Stats {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        column: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Preview { input, rows } => {
            let ds = load(&input)?;
            print!("{}", format_table(&ds, rows));
        }
        Command::Clean {
            input,
            rows,
            save,
            table,
            append,
        } => {
            let ds = load_clean(&input)?;
            print!("{}", format_table(&ds, rows));
            if save {
                let name = match table {
                    Some(t) => t,
                    None => table_name_for_upload(&input.source.file.to_string_lossy())?,
                };
                let mode = if append { WriteMode::Append } else { WriteMode::Replace };
                let mut store = open_store(&cli.db)?;
                let n = store
                    .save(&name, &ds, mode)
                    .with_context(|| format!("saving table '{name}'"))?;
                println!("saved {n} rows to table '{name}'");
            }
        }
        Command::Tables => {
            let tables = open_store(&cli.db)?.list_tables()?;
            if tables.is_empty() {
                println!("database is empty");
            }
            for t in tables {
                println!("{t}");
            }
        }
        Command::Show { table, rows } => {
            let ds = open_store(&cli.db)?
                .load(&table)
                .with_context(|| format!("reading table '{table}'"))?;
            print!("{}", format_table(&ds, rows));
        }
        Command::Drop { table } => {
            open_store(&cli.db)?.drop_table(&table)?;
            println!("dropped '{table}'");
        }
        Command::Chart {
            input,
            column,
            time_column,
            out,
        } => {
            let ds = load_clean(&input)?;
            let time_column = match time_column {
                Some(t) => t,
                None => first_column(&ds)?,
            };
            info!(time = %time_column, value = %column, "time axis");
            let series = TimeSeries::from_dataset(&ds, &time_column, &column)?;
            std::fs::write(&out, render_svg(&series, &ChartOptions::default()))
                .with_context(|| format!("writing {}", out.display()))?;
            println!("wrote {}", out.display());
        }
        Command::Stats { input, column } => {
            let ds = load_clean(&input)?;
            match describe(&ds, &column) {
                Some(summary) => println!("{summary}"),
                None => bail!("column '{column}' has no numeric values; check the pipeline's numeric_columns"),
            }
        }
    }
    Ok(())
}

fn load(input: &FileArgs) -> Result<DataSet> {
    let opts = IngestionOptions {
        has_headers: !input.no_header,
        observer: Some(Arc::new(TracingObserver)),
        ..Default::default()
    };
    ingest_from_path(&input.file, &opts).with_context(|| format!("loading {}", input.file.display()))
}

fn load_clean(input: &InputArgs) -> Result<DataSet> {
    let config = match &input.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    let raw = load(&input.source)?;
    Ok(CleaningPipeline::new(config).run(&raw)?)
}

fn open_store(path: &Path) -> Result<TableStore> {
    TableStore::open(path).with_context(|| format!("opening database {}", path.display()))
}

fn first_column(ds: &DataSet) -> Result<String> {
    match ds.schema.fields.first() {
        Some(f) => Ok(f.name.clone()),
        None => bail!("table has no columns"),
    }
}
