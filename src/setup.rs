/// Credentials for the two external APIs. Both are optional: a missing
/// ENTSO-E token makes the retrieval unavailable, a missing currencyapi
/// key skips conversion. Neither is a startup failure.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) entsoe_token: Option<String>,
    pub(crate) currencyapi_key: Option<String>,
}

impl Config {
    pub(crate) fn from_env() -> Self {
        Self {
            entsoe_token: read_credential("ENTSOE_SECURITY_TOKEN"),
            currencyapi_key: read_credential("CURRENCYAPI_KEY"),
        }
    }
}

/// An empty value counts as unset.
fn read_credential(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
