use chrono::{Local, NaiveDate};
use tracing::warn;

use crate::currency::{self, Conversion};
use crate::domain::{Currency, PriceSeries, Zone};
use crate::entsoe::{self, EntsoeError};
use crate::setup::Config;

/// Run one retrieval: fetch the day-ahead document for the zone and date,
/// build the series and convert it to the requested currency when possible.
///
/// Returns `Ok(None)` when no ENTSO-E security token is configured; that is
/// the normal "unavailable" outcome, not a failure. A failed or skipped
/// currency conversion keeps the series in its original EUR unit.
pub(crate) async fn fetch_price_data(
    zone: Zone,
    price_date: NaiveDate,
    currency: Currency,
    config: &Config,
) -> Result<Option<PriceSeries>, EntsoeError> {
    let Some(security_token) = config.entsoe_token.as_deref() else {
        warn!("no ENTSO-E security token configured, skipping price retrieval");
        return Ok(None);
    };

    let mut series = entsoe::fetch_day_ahead(zone, price_date, security_token).await?;

    if series.currency != currency {
        let lookup = currency::fetch_conversion_factor(
            series.currency,
            currency,
            Local::now().date_naive(),
            config.currencyapi_key.as_deref(),
        )
        .await;

        match lookup {
            Ok(Conversion::Converted { factor }) => series.apply_conversion(currency, factor),
            Ok(Conversion::Skipped { reason }) => warn!("{}", reason),
            Err(error) => warn!(
                "currency conversion failed, keeping prices in {}: {}",
                series.currency, error
            ),
        }
    }

    Ok(Some(series))
}
