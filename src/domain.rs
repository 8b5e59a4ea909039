use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Norwegian bidding zones, identified by their EIC area codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Zone {
    No1,
    No2,
    No3,
    No4,
    No5,
}

impl Zone {
    pub(crate) fn code(&self) -> &'static str {
        match self {
            Zone::No1 => "10YNO-1--------2",
            Zone::No2 => "10YNO-2--------T",
            Zone::No3 => "10YNO-3--------J",
            Zone::No4 => "10YNO-4--------9",
            Zone::No5 => "10Y1001A1001A48H",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Currency {
    Nok,
    Eur,
    Usd,
    Gbp,
}

impl Currency {
    pub(crate) fn code(&self) -> &'static str {
        match self {
            Currency::Nok => "NOK",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
        }
    }

    /// Display label for prices in this currency, e.g. "EUR/MWh".
    pub(crate) fn unit_label(&self) -> String {
        format!("{}/MWh", self.code())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One day-ahead retrieval: hourly prices with their reporting positions
/// and the local timestamps they apply to.
///
/// Immutable after construction except for the currency/prices/description
/// triple, which [`PriceSeries::apply_conversion`] updates together.
#[derive(Debug, Clone)]
pub(crate) struct PriceSeries {
    pub(crate) prices: Vec<f64>,
    pub(crate) positions: Vec<i64>,
    pub(crate) resolution: String,
    pub(crate) price_date: NaiveDate,
    pub(crate) currency: Currency,
    pub(crate) description: String,
    pub(crate) start_time: NaiveDateTime,
    pub(crate) end_time: NaiveDateTime,
    pub(crate) time_array: Vec<NaiveDateTime>,
}

impl PriceSeries {
    /// Build a series from accumulated document fields. Prices arrive in
    /// EUR, the native unit of the ENTSO-E response.
    pub(crate) fn new(
        prices: Vec<f64>,
        positions: Vec<i64>,
        resolution: String,
        price_date: NaiveDate,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> Self {
        let time_array = build_time_array(start_time, end_time);

        Self {
            prices,
            positions,
            resolution,
            price_date,
            currency: Currency::Eur,
            description: Currency::Eur.unit_label(),
            start_time,
            end_time,
            time_array,
        }
    }

    /// Rescale every price by `factor` and switch the series over to the
    /// target currency, keeping the description in sync.
    pub(crate) fn apply_conversion(&mut self, target: Currency, factor: f64) {
        for price in &mut self.prices {
            *price *= factor;
        }
        self.currency = target;
        self.description = target.unit_label();
    }
}

/// One local timestamp per whole hour of the reported validity window.
///
/// ENTSO-E reports the window in UTC while the market publishes in a +2
/// convention, hence the fixed two-hour shift. This is not a timezone
/// conversion and does not follow daylight-saving transitions; it
/// reproduces the upstream convention as-is.
fn build_time_array(start: NaiveDateTime, end: NaiveDateTime) -> Vec<NaiveDateTime> {
    let hours = (end - start).num_hours();

    (0..hours).map(|x| start + Duration::hours(x + 2)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series_of(prices: Vec<f64>) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        let positions = (1..=prices.len() as i64).collect();

        PriceSeries::new(
            prices,
            positions,
            "PT60M".to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            start,
            end,
        )
    }

    #[test]
    fn test_new_series_starts_in_eur() {
        let series = series_of(vec![10.0, 20.0]);

        assert_eq!(series.currency, Currency::Eur);
        assert_eq!(series.description, "EUR/MWh");
    }

    #[test]
    fn test_time_array_spans_window_with_fixed_shift() {
        let series = series_of(vec![0.0; 24]);

        assert_eq!(series.time_array.len(), 24);
        assert_eq!(
            series.time_array[0],
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(1, 0, 0)
                .unwrap()
        );
        assert_eq!(
            series.time_array[23],
            NaiveDate::from_ymd_opt(2024, 1, 3)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_apply_conversion_rescales_and_relabels() {
        let mut series = series_of(vec![10.0, 20.0]);

        series.apply_conversion(Currency::Nok, 11.5);

        assert_eq!(series.prices, vec![115.0, 230.0]);
        assert_eq!(series.currency, Currency::Nok);
        assert_eq!(series.description, "NOK/MWh");
    }

    #[test]
    fn test_reciprocal_conversion_round_trips() {
        let original = vec![10.0, 20.0, 31.7];
        let mut series = series_of(original.clone());

        series.apply_conversion(Currency::Nok, 11.5);
        series.apply_conversion(Currency::Eur, 1.0 / 11.5);

        for (after, before) in series.prices.iter().zip(original.iter()) {
            assert!((after - before).abs() < 1e-9);
        }
        assert_eq!(series.currency, Currency::Eur);
        assert_eq!(series.description, "EUR/MWh");
    }
}
