use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use probe_core::{
    Config, FetchError, HttpTransport, MarketSnapshotFetcher, ProviderId, WeatherLookupPipeline,
    provider::coinmarketcap::describe_failure,
};

use crate::prompt;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the provider API key in the config file.
    Configure,
}

/// `crypto-snapshot` arguments. Without a subcommand, prints the snapshot.
#[derive(Debug, Parser)]
#[command(name = "crypto-snapshot", version, about = "Global crypto market snapshot from CoinMarketCap")]
pub struct CryptoCli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// `weather-lookup` arguments. Without a subcommand, prompts for a location.
#[derive(Debug, Parser)]
#[command(name = "weather-lookup", version, about = "Current weather for a place, via OpenWeatherMap")]
pub struct WeatherCli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl CryptoCli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Some(Command::Configure) => configure(ProviderId::CoinMarketCap),
            None => {
                show_market_snapshot().await;
                Ok(())
            }
        }
    }
}

impl WeatherCli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Some(Command::Configure) => configure(ProviderId::OpenWeather),
            None => {
                if let Err(err) = show_weather().await {
                    tracing::debug!(error = ?err, "weather lookup failed");
                    eprintln!("{}", weather_failure_message(&err));
                }
                Ok(())
            }
        }
    }
}

/// Every failure ends up as a message; nothing escapes to the exit code.
async fn show_market_snapshot() {
    let api_key = load_config().resolve_api_key(ProviderId::CoinMarketCap);
    let fetcher = MarketSnapshotFetcher::new(HttpTransport::new(), api_key);

    match fetcher.fetch().await {
        Ok(fields) => print!("{fields}"),
        Err(err) => {
            tracing::debug!(error = ?err, "market snapshot failed");
            eprintln!("{}", describe_failure(&err));
        }
    }
}

async fn show_weather() -> Result<()> {
    let api_key = load_config().resolve_api_key(ProviderId::OpenWeather);
    let query = prompt::read_location()?;
    let pipeline = WeatherLookupPipeline::new(HttpTransport::new(), api_key);

    let coordinate = pipeline.resolve_location(&query).await?;
    println!("Latitude : {}", coordinate.latitude);
    println!("Longitude : {}", coordinate.longitude);

    let fields = pipeline.fetch_weather(coordinate).await?;
    println!("\nWeather Information:");
    print!("{fields}");

    Ok(())
}

/// Input problems are labeled apart from every other failure.
pub fn weather_failure_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<FetchError>() {
        Some(fetch) if fetch.is_input_error() => format!("Input Error: {fetch}"),
        _ => format!("Error: {err}"),
    }
}

fn load_config() -> Config {
    Config::load().unwrap_or_else(|err| {
        tracing::warn!("ignoring config file: {err:#}");
        Config::default()
    })
}

fn configure(provider: ProviderId) -> Result<()> {
    let mut config = Config::load()?;

    let api_key = prompt::ask_secret(&format!("{provider} API key:"))?;
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    config.upsert_provider_api_key(provider, api_key);
    let path = config.save()?;
    println!("Saved {provider} API key to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use probe_core::{TransportError, TransportKind};

    #[test]
    fn parsers_are_well_formed() {
        CryptoCli::command().debug_assert();
        WeatherCli::command().debug_assert();
    }

    #[test]
    fn no_arguments_means_lookup() {
        let cli = CryptoCli::try_parse_from(["crypto-snapshot"]).unwrap();
        assert!(cli.command.is_none());

        let cli = WeatherCli::try_parse_from(["weather-lookup"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn configure_subcommand_parses() {
        let cli = WeatherCli::try_parse_from(["weather-lookup", "configure"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Configure)));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(CryptoCli::try_parse_from(["crypto-snapshot", "--city", "x"]).is_err());
    }

    #[test]
    fn input_errors_get_their_own_label() {
        let err = anyhow::Error::new(FetchError::InvalidInput(
            "City name and country code are required.".into(),
        ));
        assert_eq!(
            weather_failure_message(&err),
            "Input Error: City name and country code are required."
        );
    }

    #[test]
    fn other_errors_are_plain() {
        let err = anyhow::Error::new(FetchError::Network {
            what: "geo data",
            source: TransportError::new(TransportKind::Connect, "refused"),
        });
        assert_eq!(weather_failure_message(&err), "Error: Network error while fetching geo data.");

        let err = anyhow::Error::new(FetchError::Resolution);
        assert_eq!(weather_failure_message(&err), "Error: Could not fetch latitude and longitude.");
    }
}
