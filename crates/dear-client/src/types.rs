//! Wire types for the `saleList` and `sale` endpoints.
//!
//! DEAR uses PascalCase keys and a few all-caps `ID` suffixes. Only the
//! fields reconciliation reads or must carry back are modelled.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const STATUS_VOIDED: &str = "VOIDED";

// ---------------------------------------------------------------------------
// saleList
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SaleListPage {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub sale_list: Vec<SaleListEntry>,
}

impl SaleListPage {
    /// The page came back with `limit` rows, so there may be more behind it.
    pub fn is_full(&self, limit: u32) -> bool {
        self.sale_list.len() >= limit as usize
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SaleListEntry {
    #[serde(rename = "SaleID")]
    pub sale_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub source_channel: Option<String>,
}

impl SaleListEntry {
    /// Not voided and placed through `channel`.
    pub fn is_candidate(&self, channel: &str) -> bool {
        self.status.as_deref() != Some(STATUS_VOIDED)
            && self.source_channel.as_deref() == Some(channel)
    }
}

// ---------------------------------------------------------------------------
// sale
// ---------------------------------------------------------------------------

/// A single sale as returned by `GET /sale`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Sale {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default, rename = "CustomerID")]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "deserialize_dear_datetime")]
    pub ship_by: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tax_rule: Option<String>,
    #[serde(default)]
    pub price_tier: Option<String>,
}

/// Body for `PUT /sale`.
///
/// Customer, tax rule and price tier are echoed back unchanged; DEAR
/// resets them when they are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SaleUpdate {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(rename = "CustomerID", skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub ship_by: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_tier: Option<String>,
    pub note: String,
}

impl SaleUpdate {
    pub fn from_sale(sale: &Sale, ship_by: DateTime<Utc>, note: String) -> Self {
        Self {
            id: sale.id.clone(),
            customer: sale.customer.clone(),
            customer_id: sale.customer_id.clone(),
            ship_by,
            tax_rule: sale.tax_rule.clone(),
            price_tier: sale.price_tier.clone(),
            note,
        }
    }
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Parse the timestamp shapes DEAR emits.
///
/// Most dates come back without an offset (`2024-10-10T00:00:00`); those are
/// taken as UTC. RFC 3339 and bare dates are accepted as well.
pub fn parse_dear_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_dear_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_dear_datetime(s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognised date '{s}'"))),
    }
}
