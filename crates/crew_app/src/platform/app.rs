use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use crew_client::{
    export_records, CrewApi, JobPoller, PollerEvent, ReqwestCrewApi, ResearchRequest,
};
use crew_core::{CanonicalRecord, JobId};
use crew_logging::{crew_info, LogDestination};
use log::LevelFilter;
use tokio::runtime::Handle;

use super::cli::{Cli, Command};
use super::config::AppConfig;
use super::render::{render_event, render_records};

/// Exit status after Ctrl-C, following the shell convention for SIGINT.
const INTERRUPTED_EXIT: u8 = 130;

pub async fn run_app() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli)?;
    initialize_logging(&config, cli.verbose);
    if let Some(source) = &config.source {
        crew_info!("Loaded settings from {:?}", source);
    }

    let api = Arc::new(
        ReqwestCrewApi::new(config.api.clone()).context("configuring backend client")?,
    );

    let (job_id, output) = match cli.command {
        Command::Research {
            companies,
            positions,
            output,
        } => {
            let request = ResearchRequest::new(companies, positions)?;
            println!(
                "Researching {} companies x {} positions ({} combinations)...",
                request.companies().len(),
                request.positions().len(),
                request.expected_records()
            );
            let job_id = api
                .submit(&request)
                .await
                .context("starting research job")?;
            (job_id, output)
        }
        Command::Track { job_id, output } => (JobId::new(job_id), output),
    };
    println!("Job ID: {job_id}");

    let mut poller = JobPoller::new(api, config.poll, Handle::current());
    poller.start(job_id);
    track(&mut poller, output.as_deref()).await
}

fn initialize_logging(config: &AppConfig, verbose: bool) {
    match &config.log_file {
        Some(path) => {
            let level = if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            };
            crew_logging::initialize(LogDestination::File(path.clone()), level);
        }
        None => {
            let level = if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Warn
            };
            crew_logging::initialize(LogDestination::Terminal, level);
        }
    }
}

async fn track(poller: &mut JobPoller, output: Option<&Path>) -> anyhow::Result<ExitCode> {
    let mut printed_events = 0;
    loop {
        let next = tokio::select! {
            event = poller.recv() => Some(event),
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(event) = next else {
            crew_info!("Interrupted; stopping poller");
            poller.stop();
            println!("Stopped tracking.");
            return Ok(ExitCode::from(INTERRUPTED_EXIT));
        };

        match event {
            Some(PollerEvent::Snapshot(snapshot)) => {
                for event in snapshot.events.iter().skip(printed_events) {
                    println!("{}", render_event(event));
                }
                printed_events = printed_events.max(snapshot.events.len());
            }
            Some(PollerEvent::Completed { records, .. }) => {
                print!("\n{}", render_records(&records));
                if let Some(path) = output {
                    export(path, &records)?;
                }
                return Ok(ExitCode::SUCCESS);
            }
            Some(PollerEvent::Failed { reason, .. }) => {
                eprintln!("Research failed: {reason}");
                return Ok(ExitCode::FAILURE);
            }
            None => return Ok(ExitCode::SUCCESS),
        }
    }
}

fn export(path: &Path, records: &[CanonicalRecord]) -> anyhow::Result<()> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("{} is not a file path", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let written = export_records(dir, filename, records)
        .with_context(|| format!("exporting records to {}", path.display()))?;
    println!("Saved {} records to {}", records.len(), written.display());
    Ok(())
}
