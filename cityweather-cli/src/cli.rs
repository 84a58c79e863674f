use std::process::ExitCode;

use anyhow::{Context, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use cityweather_core::{
    CITIES, Config, GeolocationConfig, Locale, LocationSource, Session, ViewState,
};
use inquire::{CustomType, Password, PasswordDisplayMode, Select};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::render::{self, Card};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "cityweather",
    version,
    about = "Current weather for your location or a few fixed cities"
)]
pub struct Cli {
    /// More log output on stderr (-v, -vv). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Message language ("en" or "ko"); defaults to the configured one.
    #[arg(long, global = true)]
    pub lang: Option<Locale>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Pick locations interactively. This is the default.
    Interactive,

    /// Show the weather once and exit.
    Show {
        /// City name, menu number, or "current".
        #[arg(default_value = "current")]
        source: String,
    },

    /// List the built-in cities.
    Cities,

    /// Configure the API key, language and geolocation.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let config = Config::load()?;
        let locale = self.lang.unwrap_or(config.language);

        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(config),
            Command::Cities => {
                print_cities(locale);
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { source } => {
                let config = config.with_env_overrides(|key| std::env::var(key).ok());
                show(&config, locale, &source).await
            }
            Command::Interactive => {
                let config = config.with_env_overrides(|key| std::env::var(key).ok());
                interactive(&config, locale).await
            }
        }
    }
}

/// One line of interactive input.
#[derive(Debug, PartialEq)]
enum Input {
    Select(LocationSource),
    Refresh,
    Menu,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line.to_lowercase().as_str() {
        "" => Input::Empty,
        "q" | "quit" | "exit" => Input::Quit,
        "r" | "refresh" => Input::Refresh,
        "?" | "h" | "help" | "menu" => Input::Menu,
        _ => parse_source(line)
            .map(Input::Select)
            .unwrap_or_else(|| Input::Unknown(line.to_string())),
    }
}

/// A menu number (0 is the current location), a city name, or "current".
fn parse_source(input: &str) -> Option<LocationSource> {
    match input.trim().parse::<usize>() {
        Ok(0) => Some(LocationSource::CurrentLocation),
        Ok(n) => CITIES.get(n - 1).map(LocationSource::City),
        Err(_) => LocationSource::parse(input),
    }
}

async fn show(config: &Config, locale: Locale, source: &str) -> anyhow::Result<ExitCode> {
    let source = parse_source(source).ok_or_else(|| {
        anyhow!("Unknown location '{source}'.\nHint: run `cityweather cities` to list the choices.")
    })?;

    let mut session = Session::from_config(config)?;
    session.select(source);
    let state = session.settle().await;

    print!("{}", Card::new(state, locale));

    Ok(exit_code(state))
}

/// Failure when the settled view ended on an error.
fn exit_code(state: &ViewState) -> ExitCode {
    if state.error.is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn interactive(config: &Config, locale: Locale) -> anyhow::Result<ExitCode> {
    let mut session = Session::from_config(config)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("{}", render::menu(locale));
    session.select(LocationSource::CurrentLocation);
    print!("{}", Card::new(session.state(), locale));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };

                match parse_input(&line) {
                    Input::Quit => break,
                    Input::Empty => continue,
                    Input::Menu => {
                        print!("{}", render::menu(locale));
                        continue;
                    }
                    Input::Unknown(input) => {
                        println!("?? {input}");
                        continue;
                    }
                    Input::Refresh => session.refresh(),
                    Input::Select(source) => session.select(source),
                }
                print!("{}", Card::new(session.state(), locale));
            }
            Some(completion) = session.next_completion() => {
                if session.complete(completion) {
                    print!("{}", Card::new(session.state(), locale));
                } else {
                    debug!("Ignored completion of a superseded load");
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_cities(locale: Locale) {
    for (i, city) in CITIES.iter().enumerate() {
        println!(
            "{:>2}) {:<10} {}",
            i + 1,
            city.display_name(locale),
            city.coordinate
        );
    }
}

fn configure(mut config: Config) -> anyhow::Result<ExitCode> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let languages = Locale::all().to_vec();
    let current = languages
        .iter()
        .position(|l| *l == config.language)
        .unwrap_or(0);
    config.language = Select::new("Language:", languages)
        .with_starting_cursor(current)
        .prompt()
        .context("Failed to read language")?;

    let kinds = vec!["ip", "fixed", "disabled"];
    let kind = Select::new("Current location comes from:", kinds)
        .prompt()
        .context("Failed to read geolocation provider")?;
    config.geolocation = match kind {
        "fixed" => GeolocationConfig::Fixed {
            latitude: CustomType::<f64>::new("Latitude:")
                .prompt()
                .context("Failed to read latitude")?,
            longitude: CustomType::<f64>::new("Longitude:")
                .prompt()
                .context("Failed to read longitude")?,
        },
        "disabled" => GeolocationConfig::Disabled,
        _ => match config.geolocation {
            ip @ GeolocationConfig::Ip { .. } => ip,
            _ => GeolocationConfig::default(),
        },
    };

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(ExitCode::SUCCESS)
}
