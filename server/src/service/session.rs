use std::io;

use comms::{
    LineReceiver, LineSender,
    msg::{Reply, Request},
};
use log::debug;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::gate::ReadinessGate;

/// The request/reply loop of a single connection.
///
/// Every line is answered with exactly one reply line: a prediction, a
/// not-a-number rejection or a not-ready notice. Malformed lines never end the
/// session, only a closed or broken connection does.
pub struct ClientSession<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    rx: LineReceiver<R>,
    tx: LineSender<W>,
    gate: ReadinessGate,
}

impl<R, W> ClientSession<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a new `ClientSession`.
    ///
    /// # Arguments
    /// * `rx` - The receiving end of the connection.
    /// * `tx` - The sending end of the connection.
    /// * `gate` - Where the trained model shows up once it's ready.
    pub fn new(rx: LineReceiver<R>, tx: LineSender<W>, gate: ReadinessGate) -> Self {
        Self { rx, tx, gate }
    }

    /// Serves requests until the peer disconnects.
    ///
    /// Both halves of the connection are dropped when this returns, whatever the
    /// outcome.
    ///
    /// # Returns
    /// The amount of replies sent, or the `io::Error` that broke the connection.
    pub async fn run(mut self) -> io::Result<usize> {
        let mut served = 0;

        while let Some(line) = self.rx.recv().await? {
            let reply = respond(&self.gate, &line);
            debug!("request {line:?} -> {reply}");

            self.tx.send(&reply).await?;
            served += 1;
        }

        Ok(served)
    }
}

/// Computes the reply for a single request line.
fn respond(gate: &ReadinessGate, line: &str) -> Reply {
    let Ok(Request(x)) = line.parse::<Request>() else {
        return Reply::NotANumber;
    };

    match gate.try_get() {
        Some(model) => Reply::Prediction(model.predict(x)),
        None => Reply::NotReady,
    }
}

#[cfg(test)]
mod tests {
    use comms::msg::{NOT_A_NUMBER, NOT_READY};
    use machine_learning::RegressionModel;
    use tokio::io as tokio_io;
    use tokio_test::io::Builder;

    use super::*;

    fn line(s: &str) -> Vec<u8> {
        format!("{s}\n").into_bytes()
    }

    fn session<T>(
        stream: T,
        gate: ReadinessGate,
    ) -> ClientSession<tokio_io::ReadHalf<T>, tokio_io::WriteHalf<T>>
    where
        T: AsyncRead + AsyncWrite,
    {
        let (rx, tx) = tokio_io::split(stream);
        let (rx, tx) = comms::channel(rx, tx);
        ClientSession::new(rx, tx, gate)
    }

    #[test]
    fn respond_covers_every_reply() {
        let gate = ReadinessGate::new();
        assert_eq!(respond(&gate, "50"), Reply::NotReady);
        assert_eq!(respond(&gate, "abc"), Reply::NotANumber);

        gate.publish(RegressionModel::new(1.8, 32.0)).unwrap();
        assert_eq!(respond(&gate, " 50 "), Reply::Prediction(122.0));
        assert_eq!(respond(&gate, "-4e1"), Reply::Prediction(1.8 * -40.0 + 32.0));
        assert_eq!(respond(&gate, ""), Reply::NotANumber);
    }

    #[tokio::test]
    async fn untrained_session_transcript() {
        let mock = Builder::new()
            .read(&line("50"))
            .write(&line(NOT_READY))
            .read(&line("abc"))
            .write(&line(NOT_A_NUMBER))
            .build();

        let served = session(mock, ReadinessGate::new()).run().await.unwrap();
        assert_eq!(served, 2);
    }

    #[tokio::test]
    async fn trained_session_transcript() {
        let gate = ReadinessGate::new();
        gate.publish(RegressionModel::new(1.8, 32.0)).unwrap();

        let mock = Builder::new()
            .read(&line("50"))
            .write(&line("122.00"))
            .read(b"oops\r\n")
            .write(&line(NOT_A_NUMBER))
            .read(&line("100"))
            .write(&line("212.00"))
            .build();

        let served = session(mock, gate).run().await.unwrap();
        assert_eq!(served, 3);
    }

    #[tokio::test]
    async fn read_error_closes_session() {
        let mock = Builder::new()
            .read(&line("1"))
            .write(&line(NOT_READY))
            .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            .build();

        let err = session(mock, ReadinessGate::new()).run().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }
}
