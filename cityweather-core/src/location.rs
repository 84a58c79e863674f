//! Location resolution: fixed cities and the host's geolocation capability.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::{config::GeolocationConfig, locale::Locale, model::Coordinate};

pub mod ip;

pub use ip::IpGeolocator;

/// A city with a fixed position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamedLocation {
    pub name: &'static str,
    /// Korean display name.
    pub local_name: &'static str,
    pub coordinate: Coordinate,
}

impl NamedLocation {
    const fn new(name: &'static str, local_name: &'static str, lat: f64, lon: f64) -> Self {
        Self {
            name,
            local_name,
            coordinate: Coordinate::new(lat, lon),
        }
    }

    pub fn display_name(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::English => self.name,
            Locale::Korean => self.local_name,
        }
    }

    fn matches(&self, query: &str) -> bool {
        self.name.eq_ignore_ascii_case(query) || self.local_name == query
    }
}

pub static CITIES: [NamedLocation; 7] = [
    NamedLocation::new("Suwon", "수원", 37.2911, 127.0089),
    NamedLocation::new("Tokyo", "도쿄", 35.6762, 139.6503),
    NamedLocation::new("Beijing", "베이징", 39.9042, 116.4074),
    NamedLocation::new("LA", "LA", 34.0522, -118.2437),
    NamedLocation::new("Rome", "로마", 41.9028, 12.4964),
    NamedLocation::new("Paris", "파리", 48.8566, 2.3522),
    NamedLocation::new("London", "런던", 51.5074, -0.1278),
];

pub fn find_city(query: &str) -> Option<&'static NamedLocation> {
    let query = query.trim();
    CITIES.iter().find(|city| city.matches(query))
}

/// Where the coordinates for a load come from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationSource {
    CurrentLocation,
    City(&'static NamedLocation),
}

impl LocationSource {
    /// Parse a user-entered source name. Returns `None` for unknown names.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let lower = input.to_lowercase();
        match lower.as_str() {
            "current" | "current location" | "here" | "현재위치" => {
                Some(LocationSource::CurrentLocation)
            }
            _ => find_city(input).map(LocationSource::City),
        }
    }

    pub fn display_name(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (LocationSource::CurrentLocation, Locale::English) => "Current location",
            (LocationSource::CurrentLocation, Locale::Korean) => "현재위치",
            (LocationSource::City(city), _) => city.display_name(locale),
        }
    }
}

/// Why the host could not report a position.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("geolocation is disabled")]
    Disabled,

    #[error("geolocation request failed")]
    Request(#[from] reqwest::Error),

    #[error("geolocation service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("geolocation service could not locate this host: {0}")]
    Rejected(String),
}

/// Single-shot access to the host's position.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinate, LocationError>;
}

/// Always reports the configured position.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator {
    coordinate: Coordinate,
}

impl FixedGeolocator {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn locate(&self) -> Result<Coordinate, LocationError> {
        Ok(self.coordinate)
    }
}

/// Behaves like a host that refused location access.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGeolocator;

#[async_trait]
impl Geolocator for DisabledGeolocator {
    async fn locate(&self) -> Result<Coordinate, LocationError> {
        Err(LocationError::Disabled)
    }
}

/// Turns a [`LocationSource`] into coordinates.
#[derive(Debug)]
pub struct Resolver {
    geolocator: Box<dyn Geolocator>,
}

impl Resolver {
    pub fn new(geolocator: Box<dyn Geolocator>) -> Self {
        Self { geolocator }
    }

    /// Cities resolve immediately and never fail; the current location asks
    /// the geolocator exactly once, without retrying.
    pub async fn resolve(&self, source: &LocationSource) -> Result<Coordinate, LocationError> {
        match source {
            LocationSource::City(city) => Ok(city.coordinate),
            LocationSource::CurrentLocation => {
                let coordinate = self.geolocator.locate().await?;
                debug!(%coordinate, "Resolved current location");
                Ok(coordinate)
            }
        }
    }
}

/// Construct a geolocator from config.
pub fn geolocator_from_config(
    config: &GeolocationConfig,
    timeout: Duration,
) -> anyhow::Result<Box<dyn Geolocator>> {
    let boxed: Box<dyn Geolocator> = match config {
        GeolocationConfig::Ip { url } => Box::new(IpGeolocator::new(url.clone(), timeout)?),
        GeolocationConfig::Fixed {
            latitude,
            longitude,
        } => Box::new(FixedGeolocator::new(Coordinate::new(*latitude, *longitude))),
        GeolocationConfig::Disabled => Box::new(DisabledGeolocator),
    };

    Ok(boxed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Debug, Default)]
    struct CountingGeolocator {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Geolocator for CountingGeolocator {
        async fn locate(&self) -> Result<Coordinate, LocationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Coordinate::new(37.5, 127.0))
        }
    }

    #[test]
    fn find_city_by_english_and_korean_name() {
        assert_eq!(find_city("tokyo").map(|c| c.name), Some("Tokyo"));
        assert_eq!(find_city("  LONDON ").map(|c| c.name), Some("London"));
        assert_eq!(find_city("파리").map(|c| c.name), Some("Paris"));
        assert!(find_city("Atlantis").is_none());
    }

    #[test]
    fn parse_current_location_aliases() {
        for input in ["current", "Current Location", "here", "현재위치"] {
            assert_eq!(
                LocationSource::parse(input),
                Some(LocationSource::CurrentLocation),
                "input: {input}"
            );
        }
    }

    #[test]
    fn parse_city_and_unknown() {
        assert_eq!(
            LocationSource::parse("rome"),
            Some(LocationSource::City(&CITIES[4]))
        );
        assert_eq!(LocationSource::parse("nowhere"), None);
    }

    #[test]
    fn display_names_follow_locale() {
        let tokyo = LocationSource::City(&CITIES[1]);
        assert_eq!(tokyo.display_name(Locale::English), "Tokyo");
        assert_eq!(tokyo.display_name(Locale::Korean), "도쿄");
        assert_eq!(
            LocationSource::CurrentLocation.display_name(Locale::Korean),
            "현재위치"
        );
    }

    #[tokio::test]
    async fn cities_resolve_without_geolocator() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = Resolver::new(Box::new(CountingGeolocator {
            calls: calls.clone(),
        }));

        for city in &CITIES {
            let coordinate = resolver
                .resolve(&LocationSource::City(city))
                .await
                .expect("cities never fail");
            assert_eq!(coordinate, city.coordinate);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn current_location_asks_geolocator_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = Resolver::new(Box::new(CountingGeolocator {
            calls: calls.clone(),
        }));

        let coordinate = resolver
            .resolve(&LocationSource::CurrentLocation)
            .await
            .expect("counting geolocator succeeds");

        assert_eq!(coordinate, Coordinate::new(37.5, 127.0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn disabled_geolocator_fails() {
        let resolver = Resolver::new(Box::new(DisabledGeolocator));
        let err = resolver
            .resolve(&LocationSource::CurrentLocation)
            .await
            .unwrap_err();
        assert!(matches!(err, LocationError::Disabled));
    }

    #[test]
    fn request_error_message_is_not_repeated_in_chain() {
        let transport = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        let transport_message = transport.to_string();

        let err = LocationError::from(transport);
        assert_eq!(err.to_string(), "geolocation request failed");

        let chain = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(chain.matches(transport_message.as_str()).count(), 1, "{chain}");
    }

    #[tokio::test]
    async fn fixed_geolocator_from_config() {
        let config = GeolocationConfig::Fixed {
            latitude: 48.8566,
            longitude: 2.3522,
        };
        let geolocator =
            geolocator_from_config(&config, Duration::from_secs(1)).expect("fixed never fails");
        let coordinate = geolocator.locate().await.expect("fixed never fails");
        assert_eq!(coordinate, Coordinate::new(48.8566, 2.3522));
    }
}
