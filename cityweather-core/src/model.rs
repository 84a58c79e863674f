use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::condition::WeatherIcon;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Current conditions for one place, normalized from the provider response.
///
/// A snapshot is always replaced as a whole; no field is updated on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub temperature_celsius: f64,
    pub condition_code: i64,
    pub condition_description: String,
    pub humidity_percent: u8,
    /// Metres per second (the provider is always queried in metric units).
    pub wind_speed: f64,
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherSnapshot {
    pub fn rounded_celsius(&self) -> i64 {
        round_half_up(self.temperature_celsius)
    }

    pub fn temperature_fahrenheit(&self) -> i64 {
        round_half_up(celsius_to_fahrenheit(self.temperature_celsius))
    }

    /// e.g. `20°C / 68°F`
    pub fn temperature_line(&self) -> String {
        format!(
            "{}°C / {}°F",
            self.rounded_celsius(),
            self.temperature_fahrenheit()
        )
    }

    pub fn humidity_line(&self) -> String {
        format!("{}%", self.humidity_percent)
    }

    pub fn wind_line(&self) -> String {
        format!("{} m/s", self.wind_speed)
    }

    pub fn icon(&self) -> WeatherIcon {
        WeatherIcon::from_condition_code(self.condition_code)
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

// Ties go towards positive infinity, so -0.5 becomes 0 rather than -1.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
