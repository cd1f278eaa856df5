pub mod client;
pub mod transport;

pub use client::HttpCompressionClient;
pub use transport::{BatchRequest, CompressionTransport, TransportResponse};

#[cfg(test)]
pub use transport::MockCompressionTransport;
