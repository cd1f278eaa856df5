// src/integrations/mod.rs
//
// External Integrations Module

pub mod compression;

pub use compression::{BatchRequest, CompressionTransport, HttpCompressionClient, TransportResponse};
