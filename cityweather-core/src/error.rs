use thiserror::Error;

use crate::{location::LocationError, locale::Locale};

/// Why a load attempt failed.
///
/// The display text is the user-facing banner; the source chain carries the
/// diagnostic detail and is only meant for logs.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("failed to retrieve location information")]
    LocationUnavailable(#[source] LocationError),

    #[error("failed to retrieve weather information")]
    WeatherFetchFailed(#[source] anyhow::Error),
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::LocationUnavailable(_) => ErrorKind::LocationUnavailable,
            WeatherError::WeatherFetchFailed(_) => ErrorKind::WeatherFetchFailed,
        }
    }
}

impl From<LocationError> for WeatherError {
    fn from(err: LocationError) -> Self {
        WeatherError::LocationUnavailable(err)
    }
}

/// The error half of the view state: which failure happened, without detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    LocationUnavailable,
    WeatherFetchFailed,
}

impl ErrorKind {
    pub fn message(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (ErrorKind::LocationUnavailable, Locale::English) => {
                "failed to retrieve location information"
            }
            (ErrorKind::LocationUnavailable, Locale::Korean) => {
                "위치 정보를 가져오는데 실패했습니다."
            }
            (ErrorKind::WeatherFetchFailed, Locale::English) => {
                "failed to retrieve weather information"
            }
            (ErrorKind::WeatherFetchFailed, Locale::Korean) => {
                "날씨 정보를 가져오는데 실패했습니다."
            }
        }
    }
}
