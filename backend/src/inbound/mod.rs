//! Inbound adapters that translate external requests into users service calls
//! while keeping framework details at the edge.

pub mod http;
