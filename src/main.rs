use chrono::Local;
use log::info;
use tracing::error;

use crate::domain::{Currency, Zone};
use crate::setup::Config;

mod currency;
mod domain;
mod entsoe;
mod pipeline;
mod setup;

const APP_NAME: &str = "dayahead";

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    info!("Starting {}", APP_NAME);

    let config = Config::from_env();
    let today = Local::now().date_naive();

    match pipeline::fetch_price_data(Zone::No4, today, Currency::Nok, &config).await {
        Ok(Some(series)) => {
            println!("{:?}", series.prices);
            println!("{}", series.resolution);
            println!("{}", series.description);
        }
        Ok(None) => {
            // no token configured, the advisory has already been logged
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
