use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use topicscan::config::{load_config, validate_config};
use topicscan::{ConfigError, RunConfig, TransportKind};

#[derive(Debug, Parser)]
#[command(
    name = "topicscan",
    version,
    about = "Classify documents against a keyword catalog"
)]
pub struct Cli {
    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify documents with a manager and a pool of workers
    Run(RunArgs),
    /// Classify documents in this process and report the dominant topics
    Sequential(RunArgs),
    /// Serve as a worker process for `run --transport processes`
    #[command(hide = true)]
    Worker {
        /// Worker index assigned by the manager
        #[arg(long)]
        id: usize,
    },
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// JSON or YAML file with run settings; flags below override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Catalog source file (one `Topic@%kw1,kw2` line per topic)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Directory holding the documents
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// File the result lines are appended to
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of workers
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Allowed document extension, repeatable (e.g. --extension .txt)
    #[arg(long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// How workers are run
    #[arg(long, value_enum)]
    pub transport: Option<TransportArg>,

    /// Empty the output file before writing
    #[arg(long)]
    pub truncate: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TransportArg {
    Threads,
    Processes,
}

impl From<TransportArg> for TransportKind {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Threads => TransportKind::Threads,
            TransportArg::Processes => TransportKind::Processes,
        }
    }
}

impl RunArgs {
    /// Builds the effective configuration: file values first, then flags.
    pub fn resolve(&self) -> Result<RunConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => RunConfig::default(),
        };

        if let Some(catalog) = &self.catalog {
            config.catalog_path = catalog.clone();
        }
        if let Some(input) = &self.input {
            config.input_directory = input.clone();
        }
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(workers) = self.workers {
            config.worker_count = workers;
        }
        if !self.extensions.is_empty() {
            config.extensions = self.extensions.clone();
        }
        if let Some(transport) = self.transport {
            config.transport = transport.into();
        }
        if self.truncate {
            config.truncate_output = true;
        }

        validate_config(&config)?;
        Ok(config)
    }
}
