use std::fmt::{self, Write};

use chrono::Local;
use cityweather_core::{CITIES, Locale, LocationSource, ViewState};

struct Labels {
    loading: &'static str,
    humidity: &'static str,
    wind: &'static str,
    updated: &'static str,
    refresh: &'static str,
    quit: &'static str,
}

impl Labels {
    fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::English => Labels {
                loading: "Loading...",
                humidity: "Humidity",
                wind: "Wind",
                updated: "Updated",
                refresh: "refresh",
                quit: "quit",
            },
            Locale::Korean => Labels {
                loading: "로딩중...",
                humidity: "습도",
                wind: "풍속",
                updated: "업데이트",
                refresh: "새로고침",
                quit: "종료",
            },
        }
    }
}

/// Text rendering of the whole view: header, loading line, error banner and
/// the weather card.
pub struct Card<'a> {
    state: &'a ViewState,
    locale: Locale,
}

impl<'a> Card<'a> {
    pub fn new(state: &'a ViewState, locale: Locale) -> Self {
        Self { state, locale }
    }
}

impl fmt::Display for Card<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = Labels::for_locale(self.locale);

        if let Some(source) = self.state.selected_source {
            writeln!(f, "── {} ──", source.display_name(self.locale))?;
        }

        if self.state.is_loading {
            writeln!(f, "{}", labels.loading)?;
        }

        if let Some(kind) = self.state.error {
            writeln!(f, "[!] {}", kind.message(self.locale))?;
        }

        if let Some(snapshot) = &self.state.snapshot {
            writeln!(f, "{}  {}", snapshot.icon().symbol(), snapshot.location_name)?;
            writeln!(f, "    {}", snapshot.temperature_line())?;
            writeln!(f, "    {}", snapshot.condition_description)?;
            writeln!(
                f,
                "    {} {}   {} {}",
                labels.humidity,
                snapshot.humidity_line(),
                labels.wind,
                snapshot.wind_line()
            )?;
            if let Some(observed_at) = snapshot.observed_at {
                writeln!(
                    f,
                    "    {} {}",
                    labels.updated,
                    observed_at.with_timezone(&Local).format("%H:%M")
                )?;
            }
        }

        Ok(())
    }
}

/// Numbered source list shown by the interactive loop.
pub fn menu(locale: Locale) -> String {
    let labels = Labels::for_locale(locale);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "  0) {}",
        LocationSource::CurrentLocation.display_name(locale)
    );
    for (i, city) in CITIES.iter().enumerate() {
        let _ = writeln!(out, "  {}) {}", i + 1, city.display_name(locale));
    }
    let _ = writeln!(out, "  r) {}   q) {}", labels.refresh, labels.quit);

    out
}
