//! Core library for `weatherboard`.
//!
//! This crate defines:
//! - Environment-sourced configuration and location resolution
//! - The upstream One Call provider and a per-location TTL cache
//! - Normalization of raw payloads into display-ready records
//!
//! It is used by `weatherboard-cli`, but any presentation layer can drive
//! [`WeatherService`] directly.

pub mod cache;
pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod service;

pub use cache::WeatherCache;
pub use config::{Config, ConfigSource, MapSource, ProcessEnv};
pub use error::{FetchError, ServiceError};
pub use location::{Location, SingleLocation, resolve};
pub use model::{CurrentConditions, DailyPoint, Dashboard, HourlyPoint, LocationWeather, WeatherRecord};
pub use normalize::{normalize, normalize_in};
pub use provider::{OneCallRequest, WeatherProvider, openweather::OpenWeatherProvider};
pub use service::WeatherService;
