use std::{borrow::Cow, io};

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

use crate::{DELIMITER, MAX_LINE};

/// The receiving end handle of the communication.
pub struct LineReceiver<R: AsyncRead + Unpin> {
    rx: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LineReceiver<R> {
    /// Creates a new `LineReceiver` instance.
    ///
    /// # Arguments
    /// * `rx` - The underlying reader.
    pub(super) fn new(rx: R) -> Self {
        Self {
            rx: BufReader::new(rx),
            buf: Vec::new(),
        }
    }

    /// Waits to receive the next line from the inner receiver.
    ///
    /// The delimiter and a trailing carriage return are stripped. Bytes that are
    /// not valid UTF-8 are replaced, so a garbled line still reaches the caller
    /// as a line instead of tearing down the connection.
    ///
    /// # Returns
    /// `Some(line)` on success, `None` once the peer closed the connection or an
    /// `io::Error` if the read failed. A final line without delimiter is still
    /// returned before `None`. A line longer than `MAX_LINE` bytes fails with
    /// `InvalidData` once the limit is crossed, without buffering the rest.
    pub async fn recv(&mut self) -> io::Result<Option<Cow<'_, str>>> {
        self.buf.clear();

        let limit = MAX_LINE as u64 + 1;
        let read = (&mut self.rx)
            .take(limit)
            .read_until(DELIMITER, &mut self.buf)
            .await?;

        if read == 0 {
            return Ok(None);
        }

        if self.buf.len() > MAX_LINE && self.buf.last() != Some(&DELIMITER) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Received a line longer than {MAX_LINE} bytes"),
            ));
        }

        let mut line = self.buf.as_slice();
        if let Some(rest) = line.strip_suffix(&[DELIMITER]) {
            line = rest;
        }
        if let Some(rest) = line.strip_suffix(b"\r") {
            line = rest;
        }

        Ok(Some(String::from_utf8_lossy(line)))
    }
}
