//! `fc-net`: serve one facility to many remote actors over TCP.
//!
//! Each remote client is one actor.  The server keeps a single
//! [`AdmissionController`][fc_admission::AdmissionController] and runs every
//! blocking ENTER on tokio's blocking pool, so one slow facility never stalls
//! the accept loop.
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`protocol`] | 16-byte frames, `Command`, `Request`, `Reply`, `Status` |
//! | [`server`]   | `Server::bind` / `run_until`                          |
//! | [`client`]   | `Client::connect`, `check`, `enter`, `exit`, `status` |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let facility = Arc::new(AdmissionController::new(FacilityConfig::new(4, 5))?);
//! let server = Server::bind("127.0.0.1:4567", facility).await?;
//! server.run_until(async { tokio::signal::ctrl_c().await.ok(); }).await?;
//! ```

pub mod client;
pub mod error;
pub mod protocol;
pub mod server;


pub use client::Client;
pub use error::{NetError, NetResult};
pub use protocol::{Command, Reply, Request, Status};
pub use server::Server;

/// Port the demos listen on when none is given.
pub const DEFAULT_PORT: u16 = 4567;
