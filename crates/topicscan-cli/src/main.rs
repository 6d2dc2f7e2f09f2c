mod cli;

use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, RunArgs};
use topicscan::protocol::run_stdio_worker;
use topicscan::{
    open_output, ConfigError, Orchestrator, ProcessTransport, RunError, SequentialRunner,
    SinkError, ThreadTransport, Transport, TransportError, TransportKind, WorkerError,
};

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Run(#[from] RunError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Worker(#[from] WorkerError),
}

fn init_logging(verbose: u8, json: bool) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // The library logs through `log`; route it into tracing.
    let _ = tracing_log::LogTracer::init();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    if let Err(e) = installed {
        eprintln!("failed to install log subscriber: {}", e);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    let outcome = match cli.command {
        Command::Run(args) => run_distributed(&args),
        Command::Sequential(args) => run_sequential(&args),
        Command::Worker { id } => run_stdio_worker(id).map(|_| ()).map_err(AppError::from),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("topicscan: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_distributed(args: &RunArgs) -> Result<(), AppError> {
    let config = args.resolve()?;
    let transport: Box<dyn Transport> = match config.transport {
        TransportKind::Threads => Box::new(ThreadTransport::new()),
        TransportKind::Processes => Box::new(ProcessTransport::current_exe()?),
    };
    info!(
        "Classifying {} with {:?} transport",
        config.input_directory.display(),
        config.transport
    );

    let mut sink = open_output(&config.output_path, config.truncate_output)?;
    let output_path = config.output_path.clone();
    let orchestrator = Orchestrator::new(config, transport);
    let report = orchestrator.run(&mut sink)?;
    sink.finish()?;

    println!(
        "Classified {} of {} documents with {} workers into {}",
        report.documents_classified,
        report.documents_dispatched,
        report.worker_count,
        output_path.display()
    );
    for skipped in &report.skipped {
        println!("Skipped {}: {}", skipped.document, skipped.reason);
    }
    println!("{:.3}s", report.elapsed.as_secs_f64());
    Ok(())
}

fn run_sequential(args: &RunArgs) -> Result<(), AppError> {
    let config = args.resolve()?;
    let mut sink = open_output(&config.output_path, config.truncate_output)?;
    let report = SequentialRunner::new(config).run(&mut sink)?;
    sink.finish()?;

    for result in &report.results {
        println!("{}", result.document);
        for entry in &result.counts {
            println!("Topic: {}, Count: {}", entry.topic, entry.count);
        }
        println!();
    }
    for (document, topic) in report.summary.iter() {
        println!(
            "Document: {}, Relevant Topic: {}",
            document,
            topic.unwrap_or("(none)")
        );
    }
    for skipped in &report.skipped {
        println!("Skipped {}: {}", skipped.document, skipped.reason);
    }
    println!("{:.3}s", report.elapsed.as_secs_f64());
    Ok(())
}
