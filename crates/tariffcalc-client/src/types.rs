//! Response envelopes for the tariff backend.
//!
//! ## Observed shapes
//!
//! ### List endpoints
//! `/api/warehouses` and `/api/lockers` answer either
//! `{ "data": { "list": [...] } }` or `{ "data": [...] }` depending on the
//! deployment. `/api/cities` normally answers `{ "data": [...] }`. All three
//! go through [`DataEnvelope`], which accepts both.
//!
//! Items are decoded one by one: a single malformed entry is logged and
//! skipped instead of failing the whole list.
//!
//! ### Calculate endpoint
//! The quote comes back bare or wrapped in `{ "data": {...} }`. Only a few
//! fields are interpreted; everything else is kept in [`TariffQuote::extra`]
//! so callers can show it without this crate knowing about it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// `{ "data": ... }` wrapper around a list.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope {
    pub data: ListPayload,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload {
    Wrapped { list: Vec<serde_json::Value> },
    Bare(Vec<serde_json::Value>),
}

impl ListPayload {
    /// Decodes every entry as `T`, skipping entries that do not fit.
    ///
    /// `context` names the source in the warning logged for each skipped
    /// entry.
    #[must_use]
    pub fn into_items<T: DeserializeOwned>(self, context: &str) -> Vec<T> {
        let raw = match self {
            ListPayload::Wrapped { list } | ListPayload::Bare(list) => list,
        };
        raw.into_iter()
            .enumerate()
            .filter_map(|(position, value)| match serde_json::from_value::<T>(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(context, position, error = %e, "skipping malformed list entry");
                    None
                }
            })
            .collect()
    }
}

/// Price quote returned by `POST /api/calculate-tariff`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffQuote {
    #[serde(
        default,
        alias = "total_price",
        alias = "cost",
        deserialize_with = "de_opt_amount"
    )]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    /// Delivery estimate as sent, e.g. `"2"` or `"2-3"`.
    #[serde(default, alias = "days", deserialize_with = "de_opt_text")]
    pub delivery_days: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum QuoteEnvelope {
    Wrapped { data: TariffQuote },
    Bare(TariffQuote),
}

impl QuoteEnvelope {
    pub(crate) fn into_quote(self) -> TariffQuote {
        match self {
            QuoteEnvelope::Wrapped { data } => data,
            QuoteEnvelope::Bare(quote) => quote,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn de_opt_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(n)) => Some(n),
        Some(NumberOrText::Text(s)) => s.trim().replace(' ', "").parse::<f64>().ok(),
        None => None,
    })
}

fn de_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(n)) => Some(n.to_string()),
        Some(NumberOrText::Text(s)) => Some(s).filter(|s| !s.trim().is_empty()),
        None => None,
    })
}
