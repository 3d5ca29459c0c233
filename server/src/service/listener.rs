use std::{io, net::SocketAddr, time::Duration};

use log::{error, info, warn};
use tokio::{
    net::{TcpListener, TcpStream, ToSocketAddrs},
    task::JoinSet,
    time,
};
use tokio_util::sync::CancellationToken;

use super::ClientSession;
use crate::{
    error::{Result, ServerErr},
    gate::ReadinessGate,
};

/// Pause before accepting again after the process ran out of resources,
/// such as file descriptors.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

// Resource exhaustion errno values, `io::ErrorKind` has no variant for most of them.
const ENOMEM: i32 = 12;
const ENFILE: i32 = 23;
const EMFILE: i32 = 24;
#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd"
))]
const ENOBUFS: i32 = 55;
#[cfg(not(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd"
)))]
const ENOBUFS: i32 = 105;

/// How the accept loop reacts to a failed `accept`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AcceptFailure {
    /// Only the incoming connection is lost, keep accepting.
    Connection,
    /// The process is out of resources, retry after `ACCEPT_BACKOFF`.
    Exhausted,
    /// The listener itself is broken.
    Fatal,
}

/// Accepts prediction clients and runs one `ClientSession` task per connection.
pub struct ConnectionServer {
    listener: TcpListener,
    gate: ReadinessGate,
    sessions: JoinSet<()>,
}

impl ConnectionServer {
    /// Binds a new `ConnectionServer` to `addr`.
    ///
    /// # Arguments
    /// * `addr` - The address to listen at.
    /// * `gate` - The gate every session will read the model from.
    ///
    /// # Returns
    /// The server or a `Bind` error if the address can't be bound.
    pub async fn bind<A>(addr: A, gate: ReadinessGate) -> Result<Self>
    where
        A: ToSocketAddrs + ToString,
    {
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerErr::Bind {
                addr: addr.to_string(),
                source,
            })?;

        Ok(Self::from_listener(listener, gate))
    }

    /// Creates a new `ConnectionServer` over an already bound listener.
    pub fn from_listener(listener: TcpListener, gate: ReadinessGate) -> Self {
        Self {
            listener,
            gate,
            sessions: JoinSet::new(),
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until `shutdown` is cancelled.
    ///
    /// Errors that only concern the incoming connection are logged and skipped,
    /// running out of resources backs off and retries. Any other accept error
    /// means the listener is broken and ends the loop. Either way, the sessions
    /// still open are aborted and awaited before returning.
    ///
    /// # Arguments
    /// * `shutdown` - Stops the accept loop when cancelled.
    ///
    /// # Returns
    /// The amount of connections accepted, or a `Listener` error if the
    /// listener failed.
    pub async fn run(mut self, shutdown: CancellationToken) -> Result<usize> {
        let mut accepted = 0;
        let mut outcome = Ok(());

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,

                res = self.listener.accept() => match res {
                    Ok((stream, peer)) => {
                        accepted += 1;
                        self.spawn(stream, peer);
                    }
                    Err(e) => match classify(&e) {
                        AcceptFailure::Connection => {
                            warn!("dropped an incoming connection: {e}");
                        }
                        AcceptFailure::Exhausted => {
                            warn!("failed to accept a connection, backing off: {e}");
                            time::sleep(ACCEPT_BACKOFF).await;
                        }
                        AcceptFailure::Fatal => {
                            error!("listener failed, no more connections will be accepted: {e}");
                            outcome = Err(ServerErr::Listener(e));
                            break;
                        }
                    },
                },

                Some(res) = self.sessions.join_next() => {
                    if let Err(e) = res {
                        warn!("session task failed: {e}");
                    }
                }
            }
        }

        info!(accepted = accepted, open = self.sessions.len(); "shutting down listener");
        self.sessions.shutdown().await;
        outcome.map(|_| accepted)
    }

    /// Hands a freshly accepted connection to its own session task.
    fn spawn(&mut self, stream: TcpStream, peer: SocketAddr) {
        if let Err(e) = stream.set_nodelay(true) {
            warn!("failed to set TCP_NODELAY for {peer}: {e}");
        }

        let (rx, tx) = stream.into_split();
        let (rx, tx) = comms::channel(rx, tx);
        let session = ClientSession::new(rx, tx, self.gate.clone());

        self.sessions.spawn(async move {
            info!("session opened: peer={peer}");

            match session.run().await {
                Ok(served) => info!(served = served; "session closed: peer={peer}"),
                Err(e) => warn!("session ended with error: peer={peer} {e}"),
            }
        });
    }
}

fn classify(e: &io::Error) -> AcceptFailure {
    match e.kind() {
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::Interrupted
        | io::ErrorKind::WouldBlock => AcceptFailure::Connection,
        io::ErrorKind::OutOfMemory => AcceptFailure::Exhausted,
        _ => match e.raw_os_error() {
            Some(ENOMEM | ENFILE | EMFILE | ENOBUFS) => AcceptFailure::Exhausted,
            _ => AcceptFailure::Fatal,
        },
    }
}
