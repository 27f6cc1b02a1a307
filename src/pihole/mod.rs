pub mod client;
pub mod connection;
pub mod session;
pub mod types;

pub use client::PiholeClient;
pub use session::Session;
