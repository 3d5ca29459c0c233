//! The implementation of the sending end of the line protocol.

use std::{
    fmt::Display,
    io::{self, Write},
};

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::DELIMITER;

/// The sending end handle of the communication.
pub struct LineSender<W>
where
    W: AsyncWrite + Unpin,
{
    tx: W,
    buf: Vec<u8>,
}

impl<W: AsyncWrite + Unpin> LineSender<W> {
    /// Creates a new `LineSender` instance.
    ///
    /// # Arguments
    /// * `tx` - The underlying writer.
    pub(super) fn new(tx: W) -> Self {
        Self {
            tx,
            buf: Vec::new(),
        }
    }

    /// Sends `msg` followed by the delimiter through the inner sender.
    ///
    /// # Arguments
    /// * `msg` - Anything displayable that renders on a single line.
    ///
    /// # Returns
    /// An `io::Error` of kind `InvalidInput` if the rendered message contains the
    /// delimiter, or the underlying error if writing fails.
    pub async fn send<T: Display + ?Sized>(&mut self, msg: &T) -> io::Result<()> {
        let Self { tx, buf } = self;

        buf.clear();
        write!(buf, "{msg}")?;

        if buf.contains(&DELIMITER) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "a message can't span more than one line",
            ));
        }

        buf.push(DELIMITER);
        tx.write_all(buf).await?;
        tx.flush().await
    }
}
