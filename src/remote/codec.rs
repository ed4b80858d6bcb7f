//! Wire records and payload codec for find and render calls.
//!
//! # Responsibilities
//! - Decode response bodies into path or series records
//! - Form-encode the request parameters both endpoints agree on

use serde::Deserialize;
use url::form_urlencoded;

use crate::remote::types::FederationResult;

/// Codec identifier sent as the `format` parameter.
pub const FORMAT: &str = "json";

/// One resolved path in a find response.
#[derive(Debug, Clone, Deserialize)]
pub struct FindRecord {
    pub metric_path: String,
    #[serde(rename = "isLeaf")]
    pub is_leaf: bool,
}

/// One series in a render response. A `null` value is an absent datapoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesRecord {
    pub name: String,
    pub start: i64,
    pub end: i64,
    pub step: i64,
    pub values: Vec<Option<f64>>,
}

pub fn decode_find(body: &[u8]) -> FederationResult<Vec<FindRecord>> {
    Ok(serde_json::from_slice(body)?)
}

pub fn decode_series(body: &[u8]) -> FederationResult<Vec<SeriesRecord>> {
    Ok(serde_json::from_slice(body)?)
}

/// Form-encode the parameters of a find call.
pub fn find_params(query: &str, leaves_only: bool, delete_found: bool) -> String {
    let mut form = form_urlencoded::Serializer::new(String::new());
    form.append_pair("local", "1");
    form.append_pair("format", FORMAT);
    form.append_pair("query", query);
    form.append_pair("leaves_only", flag(leaves_only));
    form.append_pair("delete_found", flag(delete_found));
    form.finish()
}

/// Form-encode the parameters of a render call, one `target` per path in
/// request order.
pub fn render_params(targets: &[String], start: i64, end: i64, now: Option<i64>) -> String {
    let mut form = form_urlencoded::Serializer::new(String::new());
    form.append_pair("format", FORMAT);
    form.append_pair("from", &start.to_string());
    form.append_pair("until", &end.to_string());
    if let Some(now) = now {
        form.append_pair("now", &now.to_string());
    }
    for target in targets {
        form.append_pair("target", target);
    }
    form.finish()
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}
