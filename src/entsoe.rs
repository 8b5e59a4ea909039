use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use log::info;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::domain::{PriceSeries, Zone};

const API_URL: &str = "https://web-api.tp.entsoe.eu/api";

/// Timestamps in the day-ahead document carry minute precision and a
/// literal Zulu suffix.
const TIMESTAMP_LAYOUT: &str = "%Y-%m-%dT%H:%MZ";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub(crate) enum EntsoeError {
    #[error("failed to reach the ENTSO-E api: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed day-ahead document: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed value in <{tag}>: {value}")]
    Value { tag: &'static str, value: String },
    #[error("timestamp does not match YYYY-MM-DDTHH:MMZ: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

/// Fetch the day-ahead prices for one zone and date and build the series.
pub(crate) async fn fetch_day_ahead(
    zone: Zone,
    price_date: NaiveDate,
    security_token: &str,
) -> Result<PriceSeries, EntsoeError> {
    info!("Fetching day-ahead prices for {:?} on {}", zone, price_date);

    let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

    let body = client
        .get(day_ahead_url(zone, price_date, security_token))
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    let document = parse_day_ahead(&body)?;

    info!("Fetched {} day-ahead prices", document.prices.len());

    build_series(document, price_date)
}

fn day_ahead_url(zone: Zone, price_date: NaiveDate, security_token: &str) -> Url {
    let day = price_date.format("%Y%m%d");

    Url::parse_with_params(
        API_URL,
        &[
            ("documentType", "A44"),
            ("In_Domain", zone.code()),
            ("out_Domain", zone.code()),
            ("periodStart", &format!("{}0100", day)),
            ("periodEnd", &format!("{}2200", day)),
            ("securityToken", security_token),
        ],
    )
    .expect("the api base url is valid")
}

/// Fields accumulated while streaming over the day-ahead document.
#[derive(Debug, Default)]
struct DayAheadDocument {
    resolution: String,
    positions: Vec<i64>,
    prices: Vec<f64>,
    start: String,
    end: String,
}

/// Stream over the XML response and accumulate the recognized leaf tags.
///
/// A single current-tag cursor is set on every element start and cleared
/// on every element end; the recognized tags never nest, so no depth
/// tracking is needed. Text under any other tag is ignored. The single
/// value fields keep the last occurrence.
fn parse_day_ahead(xml: &[u8]) -> Result<DayAheadDocument, EntsoeError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut document = DayAheadDocument::default();
    let mut current_tag = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(element) => {
                current_tag =
                    String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
            }
            Event::End(_) => current_tag.clear(),
            Event::Text(text) => {
                let content = text.unescape()?;

                match current_tag.as_str() {
                    "resolution" => document.resolution = content.into_owned(),
                    "position" => document.positions.push(parse_number("position", &content)?),
                    "price.amount" => {
                        document.prices.push(parse_number("price.amount", &content)?)
                    }
                    "start" => document.start = content.into_owned(),
                    "end" => document.end = content.into_owned(),
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    Ok(document)
}

fn parse_number<T: std::str::FromStr>(tag: &'static str, content: &str) -> Result<T, EntsoeError> {
    content.trim().parse().map_err(|_| EntsoeError::Value {
        tag,
        value: content.to_string(),
    })
}

/// Combine the accumulated document with the requested date into a series.
fn build_series(document: DayAheadDocument, price_date: NaiveDate) -> Result<PriceSeries, EntsoeError> {
    let start_time = NaiveDateTime::parse_from_str(&document.start, TIMESTAMP_LAYOUT)?;
    let end_time = NaiveDateTime::parse_from_str(&document.end, TIMESTAMP_LAYOUT)?;

    Ok(PriceSeries::new(
        document.prices,
        document.positions,
        document.resolution,
        price_date,
        start_time,
        end_time,
    ))
}
