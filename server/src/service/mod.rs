mod listener;
mod session;

pub use listener::ConnectionServer;
pub use session::ClientSession;
