//! remote_server: arbitrate one facility for clients connecting over TCP.
//!
//! Runs until Ctrl-C, then denies every waiting client, prints how many
//! actors of each class were admitted, and exits.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use fc_admission::AdmissionController;
use fc_core::{Class, FacilityConfig, TieBreak};
use fc_net::{DEFAULT_PORT, Server};

#[derive(Parser, Debug)]
#[command(name = "remote_server")]
#[command(about = "Two-class facility arbitration server", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value_t = format!("127.0.0.1:{DEFAULT_PORT}"))]
    addr: String,

    /// Slots in the facility
    #[arg(long, default_value = "4")]
    capacity: u32,

    /// Consecutive admissions of one class before a handover is forced
    #[arg(long, default_value = "5")]
    threshold: u32,

    /// Empty-facility tie-break: first-woken, majority or alternate
    #[arg(long, default_value = "majority")]
    tie_break: TieBreak,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let config = FacilityConfig::new(args.capacity, args.threshold).with_tie_break(args.tie_break);
    let facility = Arc::new(AdmissionController::new(config)?);
    let server = Server::bind(args.addr.as_str(), Arc::clone(&facility)).await?;
    println!("=== remote_server on {} (Ctrl-C to stop) ===", server.local_addr()?);

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "cannot listen for Ctrl-C");
            }
        })
        .await?;

    let snap = facility.snapshot();
    println!();
    println!("=== statistics ===");
    println!("Total admitted: {}", snap.admitted(Class::A) + snap.admitted(Class::B));
    println!("  class A:      {}", snap.admitted(Class::A));
    println!("  class B:      {}", snap.admitted(Class::B));
    println!("Handovers:      {}", snap.handovers);
    println!("Still inside:   {}", snap.occupied);
    Ok(())
}
