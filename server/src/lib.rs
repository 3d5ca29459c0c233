pub mod client;
pub mod config;
pub mod error;
pub mod gate;
pub mod service;
pub mod training;

pub use client::PeerClient;
pub use config::ServerConfig;
pub use error::{Result, ServerErr};
pub use gate::ReadinessGate;
pub use service::{ClientSession, ConnectionServer};
