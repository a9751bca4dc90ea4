use std::convert::TryFrom;

pub mod coinmarketcap;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    CoinMarketCap,
    OpenWeather,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::CoinMarketCap => "coinmarketcap",
            ProviderId::OpenWeather => "openweather",
        }
    }

    /// Environment variable the API key is read from.
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderId::CoinMarketCap => "COINMARTKETCAP_API",
            ProviderId::OpenWeather => "WEATHER_API",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::CoinMarketCap, ProviderId::OpenWeather]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "coinmarketcap" => Ok(ProviderId::CoinMarketCap),
            "openweather" => Ok(ProviderId::OpenWeather),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: coinmarketcap, openweather."
            )),
        }
    }
}
