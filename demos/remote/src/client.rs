//! remote_client: one or many simulated actors using a remote facility.
//!
//! Single mode enters once with the given class.  `--multi N` spawns `N`
//! concurrent clients whose class is drawn with probability `--ratio` of
//! being A.  Every client holds its slot for a random 1–4 s.

use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use fc_core::{ActorId, ActorRng, Class};
use fc_net::{Client, DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(name = "remote_client")]
#[command(about = "Simulated actors for the two-class facility server", long_about = None)]
struct Args {
    /// Server address
    #[arg(long, default_value_t = format!("127.0.0.1:{DEFAULT_PORT}"))]
    addr: String,

    /// Class for single mode (A or B)
    #[arg(long, default_value = "A")]
    class: Class,

    /// Run this many concurrent clients instead of one
    #[arg(long)]
    multi: Option<u32>,

    /// Probability that a simulated client belongs to class A
    #[arg(long, default_value = "0.5")]
    ratio: f64,

    /// Seed for class and occupation-time draws
    #[arg(long, default_value = "42")]
    seed: u64,
}

/// Occupation time in whole seconds, 1 to 4.
fn service_time(rng: &mut ActorRng) -> Duration {
    Duration::from_secs(rng.gen_range(1..=4))
}

/// Enter, occupy, and exit once.  Returns the wait before admission, or
/// `None` if the server shut down first.
async fn visit(addr: &str, id: u32, class: Class, service: Duration) -> Result<Option<Duration>> {
    let mut client = Client::connect(addr, id as i32).await?;
    let status = client.status().await?;
    info!(client = id, %class, occupied = status.occupied, capacity = status.capacity, "requesting entry");

    let t0 = Instant::now();
    if !client.enter(class).await? {
        info!(client = id, %class, "denied: server shutting down");
        return Ok(None);
    }
    let waited = t0.elapsed();
    info!(client = id, %class, waited_ms = waited.as_millis() as u64, "inside");

    tokio::time::sleep(service).await;
    if !client.exit(class).await? {
        bail!("client {id}: server did not accept exit");
    }
    info!(client = id, %class, "left");
    Ok(Some(waited))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let Some(n) = args.multi else {
        let mut rng = ActorRng::new(args.seed, ActorId(0));
        let waited = visit(&args.addr, 0, args.class, service_time(&mut rng)).await?;
        match waited {
            Some(w) => println!("Admitted after {:.2} s", w.as_secs_f64()),
            None => println!("Denied"),
        }
        return Ok(());
    };

    println!("=== remote_client: {n} clients, class A ratio {:.2} ===", args.ratio);
    let mut tasks = Vec::with_capacity(n as usize);
    for id in 0..n {
        let mut rng = ActorRng::new(args.seed, ActorId(id));
        let class = if rng.gen_bool(args.ratio) { Class::A } else { Class::B };
        let service = service_time(&mut rng);
        let addr = args.addr.clone();
        tasks.push((id, class, tokio::spawn(async move { visit(&addr, id, class, service).await })));
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    println!();
    println!("{:<8} {:<6} {:>10}", "Client", "Class", "Wait s");
    println!("{}", "-".repeat(26));
    let mut total = Duration::ZERO;
    let mut admitted = 0u32;
    for (id, class, task) in tasks {
        match task.await? {
            Ok(Some(w)) => {
                println!("{id:<8} {class:<6} {:>10.2}", w.as_secs_f64());
                total += w;
                admitted += 1;
            }
            Ok(None) => println!("{id:<8} {class:<6} {:>10}", "denied"),
            Err(e) => println!("{id:<8} {class:<6} {:>10}  ({e})", "error"),
        }
    }
    if admitted > 0 {
        println!();
        println!("Average wait: {:.2} s over {admitted} clients", (total / admitted).as_secs_f64());
    }
    Ok(())
}
