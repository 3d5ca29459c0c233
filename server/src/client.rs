use std::io;

use comms::{
    LineReceiver, LineSender,
    msg::{Reply, Request},
};
use log::debug;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt},
    net::{
        TcpStream, ToSocketAddrs,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
};

/// The connecting side of the prediction protocol.
///
/// Contract:
/// - send one request line
/// - wait for exactly one reply line
pub struct PeerClient<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    rx: LineReceiver<R>,
    tx: LineSender<W>,
}

impl PeerClient<OwnedReadHalf, OwnedWriteHalf> {
    /// Dials a prediction node.
    ///
    /// # Arguments
    /// * `addr` - The `host:port` of the remote node.
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;

        let (rx, tx) = stream.into_split();
        let (rx, tx) = comms::channel(rx, tx);
        Ok(Self::new(rx, tx))
    }
}

/// Dials the node at `addr` and relays every line of `input` to it, writing
/// each reply to `output`.
///
/// A failure here only concerns the relay, the caller decides what else to
/// stop.
///
/// # Returns
/// The amount of requests relayed once `input` is exhausted, or the error that
/// broke the connection to the node.
pub async fn relay_to_peer<A, I, O>(addr: A, input: I, output: O) -> io::Result<usize>
where
    A: ToSocketAddrs,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let mut client = PeerClient::connect(addr).await?;
    client.relay(input, output).await
}

impl<R, W> PeerClient<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(rx: LineReceiver<R>, tx: LineSender<W>) -> Self {
        Self { rx, tx }
    }

    /// Sends a raw request line and waits for its reply.
    ///
    /// The line is sent as is, so malformed input reaches the server and comes
    /// back as `Reply::NotANumber`.
    ///
    /// # Returns
    /// The parsed reply, `UnexpectedEof` if the node hung up before replying or
    /// `InvalidInput` if `line` spans more than one line.
    pub async fn request(&mut self, line: &str) -> io::Result<Reply> {
        self.tx.send(line).await?;

        match self.rx.recv().await? {
            Some(reply) => reply.parse(),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "the node closed the connection before replying",
            )),
        }
    }

    /// Asks the node for the prediction of `x`.
    pub async fn predict(&mut self, x: f64) -> io::Result<Reply> {
        self.request(&Request(x).to_string()).await
    }

    /// Forwards every line of `input` to the node and writes each reply to `output`.
    ///
    /// # Returns
    /// The amount of requests relayed once `input` is exhausted.
    pub async fn relay<I, O>(&mut self, input: I, mut output: O) -> io::Result<usize>
    where
        I: AsyncBufRead + Unpin,
        O: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut relayed = 0;

        while let Some(line) = lines.next_line().await? {
            let reply = self.request(line.trim_end()).await?;
            debug!("relayed {line:?} -> {reply}");

            output.write_all(format!("{reply}\n").as_bytes()).await?;
            output.flush().await?;
            relayed += 1;
        }

        Ok(relayed)
    }
}
