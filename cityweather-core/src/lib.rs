//! Core library for the `cityweather` terminal app.
//!
//! This crate defines:
//! - Location resolution (fixed cities and host geolocation)
//! - The OpenWeather current-conditions client
//! - The view state machine and the session that drives it
//! - Configuration & credentials handling
//!
//! It is used by `cityweather-cli`, but holds no terminal code itself.

pub mod condition;
pub mod config;
pub mod error;
pub mod locale;
pub mod location;
pub mod model;
pub mod provider;
pub mod session;
pub mod view;

pub use condition::WeatherIcon;
pub use config::{Config, GeolocationConfig};
pub use error::{ErrorKind, WeatherError};
pub use locale::Locale;
pub use location::{
    CITIES, DisabledGeolocator, FixedGeolocator, Geolocator, IpGeolocator, LocationError,
    LocationSource, NamedLocation, Resolver,
};
pub use model::{Coordinate, WeatherSnapshot};
pub use provider::{OpenWeatherProvider, WeatherProvider};
pub use session::{Completion, Session};
pub use view::{Phase, ViewState};
