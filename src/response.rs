//! Wire types for the service's response envelope.
//!
//! Document-analysis payloads vary in completeness: pages may be `null`,
//! markdown or image maps may be missing, image values may be URLs, bare
//! base64, data URLs, or junk. Every field here therefore deserialises
//! null-tolerantly and degrades to an empty default instead of failing —
//! only the envelope shape itself is enforced (by the client).

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Top-level response: `{errorCode, errorMsg, result}`.
///
/// `errorCode == 0` is the only success condition. A missing code counts as
/// failure, so it defaults to `-1` rather than `0`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    #[serde(default = "default_error_code")]
    pub error_code: i64,
    #[serde(default)]
    pub error_msg: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub result: ResultBody,
}

fn default_error_code() -> i64 {
    -1
}

/// The unwrapped result: an ordered list of per-page results.
///
/// Zero pages is valid ("no content") and never an error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultBody {
    #[serde(default, deserialize_with = "null_default")]
    pub layout_parsing_results: Vec<Option<PageResult>>,
}

/// One recognised page.
///
/// Image maps are `BTreeMap<String, Value>` on purpose: keys iterate in
/// ascending order (the visualization collection order), and non-string
/// values are skipped by the reconstructor rather than rejected here.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    #[serde(default, deserialize_with = "null_default")]
    pub markdown: MarkdownBlock,
    #[serde(default, deserialize_with = "null_default")]
    pub output_images: BTreeMap<String, Value>,
    #[serde(default)]
    pub pruned_result: Value,
}

impl PageResult {
    /// A page that carries no content at all; the reconstructor skips these
    /// the same way it skips `null` pages.
    pub fn is_empty(&self) -> bool {
        self.markdown.text.is_empty()
            && self.markdown.images.is_empty()
            && self.output_images.is_empty()
            && self.pruned_result.is_null()
    }
}

/// A page's markdown text plus its placeholder-path → image-reference map.
#[derive(Debug, Default, Deserialize)]
pub struct MarkdownBlock {
    #[serde(default, deserialize_with = "null_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_default")]
    pub images: BTreeMap<String, Value>,
}

/// Treat an explicit JSON `null` the same as an absent field.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
