//! `crypto-snapshot`: prints global crypto market metrics from CoinMarketCap.
//!
//! The API key comes from `COINMARTKETCAP_API` (a `.env` file is honored) or
//! from the config file written by `crypto-snapshot configure`.

use clap::Parser;
use probe_cli::{cli::CryptoCli, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let cmd = CryptoCli::parse();
    cmd.run().await
}
