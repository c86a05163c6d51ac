mod telemetry;

use attestation_scheduler_api::{run_scheduler, AttestationJobScheduler};
use attestation_scheduler_infra::{setup_context, AttestationContext};
use clap::{Parser, Subcommand};
use telemetry::{get_subscriber, init_subscriber};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "attestation_scheduler")]
#[command(about = "Sends attestation campaign reminders and escalations, and closes ended campaigns", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run every stage once, print the report as JSON and exit
    RunOnce,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    openssl_probe::init_ssl_cert_env_vars();

    let subscriber = get_subscriber("attestation_scheduler".into(), "info".into());
    init_subscriber(subscriber)?;

    let cli = Cli::parse();
    let context = setup_context().await?;

    match cli.command {
        Some(Command::RunOnce) => run_once(&context).await,
        None => run_timer(context).await,
    }
}

async fn run_once(context: &AttestationContext) -> anyhow::Result<()> {
    let report = run_scheduler(context).await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.success {
        std::process::exit(1);
    }
    Ok(())
}

async fn run_timer(context: AttestationContext) -> anyhow::Result<()> {
    if !context.config.scheduler_enabled {
        info!(
            "ATTESTATION_SCHEDULER_ENABLED is not set. The scheduler is dormant, use `run-once` to run it explicitly."
        );
        return Ok(());
    }

    let mut scheduler = AttestationJobScheduler::new(context);
    scheduler.start();

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Unable to listen for shutdown signal: {:?}", e);
    }
    info!("Shutdown signal received");
    scheduler.stop().await;
    Ok(())
}
