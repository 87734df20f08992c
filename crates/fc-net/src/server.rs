//! The arbitration server: one tokio task per connection, one shared
//! [`AdmissionController`].

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use fc_admission::{AdmissionController, Entry};
use fc_core::Class;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tracing::{debug, info, instrument, warn};

use crate::protocol::{Command, Frame, FRAME_LEN, Reply, Request, Status};
use crate::NetResult;

/// A bound listener plus the facility it arbitrates.
pub struct Server {
    listener: TcpListener,
    facility: Arc<AdmissionController>,
}

impl Server {
    pub async fn bind(addr: impl ToSocketAddrs, facility: Arc<AdmissionController>) -> NetResult<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "listening");
        Ok(Self { listener, facility })
    }

    pub fn local_addr(&self) -> NetResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn facility(&self) -> &Arc<AdmissionController> {
        &self.facility
    }

    /// Accept connections until `shutdown` completes, then shut the facility
    /// down.
    ///
    /// Connections already open keep being served: their blocked ENTERs are
    /// answered DENIED and their EXITs still release.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> NetResult<()> {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            warn!(error = %e, "accept failed");
                            continue;
                        }
                    };
                    let facility = Arc::clone(&self.facility);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, peer, facility).await {
                            warn!(%peer, error = %e, "connection closed with error");
                        }
                    });
                }
                () = &mut shutdown => break,
            }
        }
        info!("shutdown requested");
        self.facility.shutdown();
        Ok(())
    }
}

/// Serve one client.  Slots the client still holds when the connection ends,
/// cleanly or not, are released.
///
/// An ENTER that is blocked when its client goes away cannot be cancelled:
/// the departed client stays counted as a waiter (and can still arm a
/// handover) until it is admitted, and the slot is then released at once.
#[instrument(skip_all, fields(%peer))]
async fn handle_connection(
    mut stream: TcpStream,
    peer:       SocketAddr,
    facility:   Arc<AdmissionController>,
) -> NetResult<()> {
    info!("client connected");
    let mut held: Vec<Class> = Vec::new();

    let result = serve(&mut stream, &facility, &mut held).await;

    for class in held.drain(..) {
        warn!(%class, "releasing slot held by departed client");
        facility.release(class);
    }
    info!("client disconnected");
    result
}

async fn serve(
    stream:   &mut TcpStream,
    facility: &Arc<AdmissionController>,
    held:     &mut Vec<Class>,
) -> NetResult<()> {
    let mut frame: Frame = [0; FRAME_LEN];
    loop {
        match stream.read_exact(&mut frame).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(()),
            Err(e) => return Err(e.into()),
        }

        let response = match Request::decode(&frame) {
            Ok(request) => dispatch(request, facility, held).await?,
            Err(e) => {
                warn!(error = %e, "malformed request");
                Reply::Denied.encode()
            }
        };
        stream.write_all(&response).await?;
    }
}

async fn dispatch(
    request:  Request,
    facility: &Arc<AdmissionController>,
    held:     &mut Vec<Class>,
) -> NetResult<Frame> {
    let client = request.client_id;

    let frame = match (request.command, request.class) {
        (Command::Status, _) => {
            let snap = facility.snapshot();
            Status {
                active:   snap.active,
                occupied: snap.occupied,
                capacity: snap.capacity,
            }
            .encode()
        }
        (command, None) => {
            warn!(client, ?command, "request without a class");
            Reply::Denied.encode()
        }
        (Command::Check, Some(class)) => Reply::from_bool(facility.would_admit(class)).encode(),
        (Command::Enter, Some(class)) => {
            let f = Arc::clone(facility);
            let entry = tokio::task::spawn_blocking(move || f.request_entry(class)).await?;
            if entry == Entry::Admitted {
                held.push(class);
            }
            debug!(client, %class, ?entry, "enter");
            Reply::from_bool(entry.is_admitted()).encode()
        }
        (Command::Exit, Some(class)) => match held.iter().position(|&c| c == class) {
            Some(i) => {
                held.swap_remove(i);
                facility.release(class);
                debug!(client, %class, "exit");
                Reply::Ok.encode()
            }
            None => {
                warn!(client, %class, "exit without a held slot");
                Reply::Denied.encode()
            }
        },
    };
    Ok(frame)
}
