//! Core library for the `vedur` CLI.
//!
//! Fetches Icelandic weather data from the Met Office XML service and the
//! station overview page, and reshapes it into flat JSON records.
//!
//! This crate defines:
//! - Request builders and the static measurement catalog
//! - The transport abstraction and its reqwest implementation
//! - XML tree parsing, response normalization and station scraping
//! - Configuration handling
//!
//! It is used by `vedur-cli`, but can also be reused by other binaries or services.

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod request;
pub mod stations;
pub mod transport;
pub mod xml;

pub use catalog::{Descriptions, TEXT_TYPES, measurements};
pub use client::{VedurClient, info};
pub use config::Config;
pub use error::VedurError;
pub use model::{
    Envelope, ForecastOptions, Lang, ObservationOptions, Record, StationRecord, TextOptions,
};
pub use transport::{ClientConfig, HttpTransport, Transport};
