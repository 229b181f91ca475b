//! Document input
//!
//! - BufferedReader: drains a `Read` source chunk by chunk

pub mod buffered;
