//! Core library for the `crypto-snapshot` and `weather-lookup` tools.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The HTTP transport seam and typed fetch errors
//! - The market snapshot fetcher and the weather lookup pipeline
//!
//! It is used by `probe-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod transport;
pub mod units;

pub use config::{Config, ProviderConfig};
pub use error::{FetchError, TransportError, TransportKind};
pub use model::{FieldBag, GeoCoordinate, LocationQuery, WeatherReport};
pub use provider::{
    ProviderId, coinmarketcap::MarketSnapshotFetcher, openweather::WeatherLookupPipeline,
};
pub use transport::{ApiRequest, HttpTransport, Transport};
