//! `weather-lookup`: asks for a city, state code and country code, then
//! prints the current weather there.
//!
//! The API key comes from `WEATHER_API` (a `.env` file is honored) or from
//! the config file written by `weather-lookup configure`.

use clap::Parser;
use probe_cli::{cli::WeatherCli, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let cmd = WeatherCli::parse();
    cmd.run().await
}
