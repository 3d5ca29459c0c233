pub mod msg;
mod receiver;
mod sender;

use tokio::io::{AsyncRead, AsyncWrite};

pub use receiver::LineReceiver;
pub use sender::LineSender;

/// The byte that terminates every request and reply on the wire.
pub const DELIMITER: u8 = b'\n';

/// The longest line accepted by a `LineReceiver`, delimiter excluded.
pub const MAX_LINE: usize = 4096;

/// Creates both `LineReceiver` and `LineSender` network channel parts.
///
/// Given a reader and a writer creates and returns both ends of the communication.
///
/// # Arguments
/// * `rx` - An async readable.
/// * `tx` - An async writable.
///
/// # Returns
/// A communication stream in the form of a line receiver and sender.
pub fn channel<R, W>(rx: R, tx: W) -> (LineReceiver<R>, LineSender<W>)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    (LineReceiver::new(rx), LineSender::new(tx))
}
