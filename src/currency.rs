use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDate;
use log::info;
use reqwest::Client;
use serde_derive::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::Currency;

const API_URL: &str = "https://api.currencyapi.com/v3/latest";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub(crate) enum ConversionError {
    #[error("failed to reach the currency api: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("could not decode the rates payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no rate for {0} in the rates payload")]
    MissingRate(Currency),
}

/// Outcome of a conversion-factor lookup. A missing API key degrades to
/// `Skipped` rather than an error; the caller leaves the series untouched.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Conversion {
    Converted { factor: f64 },
    Skipped { reason: String },
}

/// Look up the same-day factor for converting `from` prices into `to`.
pub(crate) async fn fetch_conversion_factor(
    from: Currency,
    to: Currency,
    date: NaiveDate,
    api_key: Option<&str>,
) -> Result<Conversion, ConversionError> {
    let Some(api_key) = api_key else {
        return Ok(Conversion::Skipped {
            reason: "no currencyapi key configured, leaving prices unconverted".to_string(),
        });
    };

    info!("Fetching {}->{} conversion rate for {}", from, to, date);

    let url = rates_url(from, date, api_key);

    let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

    let body = client.get(url).send().await?.error_for_status()?.text().await?;

    let factor = extract_factor(&body, to)?;

    Ok(Conversion::Converted { factor })
}

fn rates_url(base: Currency, date: NaiveDate, api_key: &str) -> Url {
    Url::parse_with_params(
        API_URL,
        &[
            ("apikey", api_key),
            ("base_currency", base.code()),
            ("date", &date.format("%Y-%m-%d").to_string()),
        ],
    )
    .expect("the rates api base url is valid")
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    data: HashMap<String, Rate>,
}

#[derive(Debug, Deserialize)]
struct Rate {
    value: f64,
}

fn extract_factor(body: &str, target: Currency) -> Result<f64, ConversionError> {
    let response = serde_json::from_str::<RatesResponse>(body)?;

    response
        .data
        .get(target.code())
        .map(|rate| rate.value)
        .ok_or(ConversionError::MissingRate(target))
}
