//! # LNS Bridge Client
//!
//! REST client for a LoRaWAN network server: node listing, uplink payload
//! retrieval, downlink submission and pushmode (webhook) registration.
//!
//! ## Layers
//!
//! - [`LnsClient`]: one method per remote operation. Validates parameters,
//!   builds a [`RequestDescriptor`] and hands it to a [`Transport`].
//! - [`HttpTransport`]: reqwest-backed transport with Basic auth.
//!
//! Responses are returned as-is; the client never interprets them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod encoding;
pub mod error;
pub mod model;
pub mod request;
pub mod transport;

pub use client::LnsClient;
pub use config::ClientConfig;
pub use encoding::{decode_payload, encode_payload};
pub use error::{ClientError, ParamCode};
pub use model::{Callback, Downlink, RetryPolicy};
pub use request::{ApiResponse, Method, RequestDescriptor};
pub use transport::{HttpTransport, Transport};
