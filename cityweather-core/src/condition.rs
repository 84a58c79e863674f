/// Icon category for an OpenWeather condition code.
///
/// See <https://openweathermap.org/weather-conditions> for the code groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherIcon {
    Storm,
    Rain,
    Snow,
    Mist,
    Clear,
    Cloud,
    Unknown,
}

impl WeatherIcon {
    pub fn from_condition_code(code: i64) -> Self {
        match code {
            200..=299 => Self::Storm,
            300..=399 | 500..=599 => Self::Rain,
            600..=699 => Self::Snow,
            700..=799 => Self::Mist,
            800 => Self::Clear,
            801..=899 => Self::Cloud,
            // 9xx were the retired "extreme" and "additional" groups.
            _ => Self::Unknown,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Storm => "⛈️",
            Self::Rain => "🌧️",
            Self::Snow => "❄️",
            Self::Mist => "🌫️",
            Self::Clear => "☀️",
            Self::Cloud => "☁️",
            Self::Unknown => "❓",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Storm => "storm",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Mist => "mist",
            Self::Clear => "clear",
            Self::Cloud => "cloud",
            Self::Unknown => "unknown",
        }
    }
}
