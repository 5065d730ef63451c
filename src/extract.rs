//! Embedded app-state extraction.
//!
//! Map listing pages inline their bootstrap data as a JSON array literal
//! inside a script tag. The extractor carves that literal out of the raw
//! HTML, strips the anti-hijacking prefix from the inner payload, and reads
//! business fields out of the positional array structure it decodes to.
//!
//! The payload shape is an undocumented internal format of the upstream
//! service. The numeric offsets below track its current output and may
//! silently shift if that service changes shape; every lookup therefore
//! goes through one bounds/type-checked accessor, and any miss degrades to
//! a null field instead of an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

const STATE_MARKER: &str = ";window.APP_INITIALIZATION_STATE=";
const FLAGS_MARKER: &str = ";window.APP_FLAGS";

/// Anti-JSON-hijacking prefix on the inner payload. One delimiter character
/// follows it, so stripping removes five bytes in total.
const XSSI_PREFIX: &str = ")]}'";

/// Position of the raw inner payload inside the outer state array.
const INNER_PAYLOAD_PATH: &[usize] = &[3, 6];

// Field offsets into the business payload.
const NAME_PATH: &[usize] = &[6, 11];
const ADDRESS_PATH: &[usize] = &[6, 39];
const PHONE_PATH: &[usize] = &[6, 178, 0, 3];
const CATEGORY_PATH: &[usize] = &[6, 13];
const OWNER_PATH: &[usize] = &[6, 57, 1];

/// Business attributes recovered from one listing page. All fields are
/// best-effort: null means absent, unparsable, or format drift.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingFields {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
    pub owner: Option<String>,
}

/// Why no business payload could be recovered from a page. Internal only:
/// callers of [`extract`] see null fields either way, but the reason is
/// logged so format drift stays diagnosable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PayloadMiss {
    /// No `APP_INITIALIZATION_STATE` marker. Normal for pages that simply
    /// do not embed state.
    StateMarkerMissing,
    /// The carved-out literal did not parse as JSON.
    OuterJsonInvalid,
    /// The outer array had no string at the inner payload position.
    InnerPayloadNotString,
    /// The inner payload did not carry the anti-hijacking prefix.
    PrefixMismatch,
    /// The inner payload parsed, minus prefix, was not valid JSON.
    InnerJsonInvalid,
}

/// Extract business attributes from raw listing-page HTML.
///
/// Total function: any failure along the way (marker absent, malformed
/// JSON, shape mismatch, out-of-range offsets) yields null fields, never an
/// error. A page without the expected embedded state is indistinguishable
/// from a page that has no listing data, and that is the intended contract.
///
/// # Examples
/// ```
/// use placegrab::extract::extract;
///
/// let fields = extract("<html><body>no embedded state here</body></html>");
/// assert_eq!(fields.name, None);
/// ```
pub fn extract(html: &str) -> ListingFields {
    match business_payload(html) {
        Ok(payload) => ListingFields {
            name: string_at(&payload, NAME_PATH),
            address: string_at(&payload, ADDRESS_PATH),
            phone: string_at(&payload, PHONE_PATH),
            category: string_at(&payload, CATEGORY_PATH),
            owner: string_at(&payload, OWNER_PATH),
        },
        Err(miss) => {
            debug!(reason = ?miss, "embedded payload unavailable");
            ListingFields::default()
        }
    }
}

/// Locate, carve out, and decode the business payload.
fn business_payload(html: &str) -> std::result::Result<Value, PayloadMiss> {
    let after = match html.split_once(STATE_MARKER) {
        Some((_, rest)) => rest,
        None => return Err(PayloadMiss::StateMarkerMissing),
    };

    // The flags marker normally terminates the state literal. When it is
    // absent the whole remainder is handed to the parser; trailing markup
    // then surfaces as OuterJsonInvalid.
    let literal = match after.split_once(FLAGS_MARKER) {
        Some((head, _)) => head,
        None => {
            debug!("flags marker absent, parsing remainder of document");
            after
        }
    };

    let outer: Value =
        serde_json::from_str(literal).map_err(|_| PayloadMiss::OuterJsonInvalid)?;
    let raw = get_at(&outer, INNER_PAYLOAD_PATH)
        .and_then(Value::as_str)
        .ok_or(PayloadMiss::InnerPayloadNotString)?;

    if !raw.starts_with(XSSI_PREFIX) {
        return Err(PayloadMiss::PrefixMismatch);
    }

    let cleaned = raw.get(XSSI_PREFIX.len() + 1..).unwrap_or("");
    serde_json::from_str(cleaned).map_err(|_| PayloadMiss::InnerJsonInvalid)
}

/// Walk a positional path through nested arrays. None on any out-of-range
/// index or non-array intermediate.
fn get_at<'a>(root: &'a Value, path: &[usize]) -> Option<&'a Value> {
    let mut current = root;
    for &idx in path {
        current = current.as_array()?.get(idx)?;
    }
    Some(current)
}

/// Resolve a path to an owned string. Empty strings count as absent, the
/// same way the upstream payload treats them.
fn string_at(root: &Value, path: &[usize]) -> Option<String> {
    get_at(root, path)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Business payload with the listing fields at their live offsets.
    fn listing_payload() -> Value {
        let mut listing = vec![Value::Null; 200];
        listing[11] = json!("Cafe X");
        listing[13] = json!("Cafe");
        listing[39] = json!("123 Main St");
        listing[57] = json!([null, "Jane Doe"]);
        listing[178] = json!([[null, null, null, "555-1234"]]);

        let mut top = vec![Value::Null; 7];
        top[6] = Value::Array(listing);
        Value::Array(top)
    }

    /// Wrap a business payload into a full page: outer state array with the
    /// prefixed inner payload at [3][6], both markers in place.
    fn page_with(payload: &Value) -> String {
        let raw = format!(")]}}'\n{payload}");
        let outer = json!([null, null, null, [null, null, null, null, null, null, raw]]);
        format!(
            "<html><script>init();window.APP_INITIALIZATION_STATE={outer};window.APP_FLAGS=[1];</script></html>"
        )
    }

    #[test]
    fn state_marker_absent_yields_all_null() {
        let fields = extract("<html><body>plain page</body></html>");
        assert_eq!(fields, ListingFields::default());
    }

    #[test]
    fn invalid_state_json_yields_all_null() {
        let html = "<html>;window.APP_INITIALIZATION_STATE=[broken;window.APP_FLAGS=[1];</html>";
        assert_eq!(extract(html), ListingFields::default());
    }

    #[test]
    fn missing_prefix_yields_all_null() {
        let outer = json!([null, null, null, [null, null, null, null, null, null, "[1,2,3]"]]);
        let html =
            format!(";window.APP_INITIALIZATION_STATE={outer};window.APP_FLAGS=[1];");
        assert_eq!(extract(&html), ListingFields::default());
    }

    #[test]
    fn prefix_only_payload_yields_all_null() {
        // Shorter than prefix + delimiter; the carved substring is empty.
        let outer = json!([null, null, null, [null, null, null, null, null, null, ")]}'"]]);
        let html =
            format!(";window.APP_INITIALIZATION_STATE={outer};window.APP_FLAGS=[1];");
        assert_eq!(extract(&html), ListingFields::default());
    }

    #[test]
    fn inner_payload_not_a_string_yields_all_null() {
        let outer = json!([null, null, null, [null, null, null, null, null, null, 42]]);
        let html =
            format!(";window.APP_INITIALIZATION_STATE={outer};window.APP_FLAGS=[1];");
        assert_eq!(extract(&html), ListingFields::default());
    }

    #[test]
    fn extracts_all_five_fields() {
        let html = page_with(&listing_payload());
        let fields = extract(&html);
        assert_eq!(
            fields,
            ListingFields {
                name: Some("Cafe X".into()),
                address: Some("123 Main St".into()),
                phone: Some("555-1234".into()),
                category: Some("Cafe".into()),
                owner: Some("Jane Doe".into()),
            }
        );
    }

    #[test]
    fn missing_phone_block_leaves_other_fields() {
        let mut payload = listing_payload();
        payload[6][178] = Value::Null;
        let fields = extract(&page_with(&payload));
        assert_eq!(fields.phone, None);
        assert_eq!(fields.name.as_deref(), Some("Cafe X"));
        assert_eq!(fields.address.as_deref(), Some("123 Main St"));
        assert_eq!(fields.category.as_deref(), Some("Cafe"));
        assert_eq!(fields.owner.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn short_listing_array_yields_nulls_not_panics() {
        // Listing array ends before any field offset.
        let mut top = vec![Value::Null; 7];
        top[6] = json!([null, null, null]);
        let fields = extract(&page_with(&Value::Array(top)));
        assert_eq!(fields, ListingFields::default());
    }

    #[test]
    fn empty_string_leaf_counts_as_absent() {
        let mut payload = listing_payload();
        payload[6][11] = json!("");
        let fields = extract(&page_with(&payload));
        assert_eq!(fields.name, None);
        assert_eq!(fields.category.as_deref(), Some("Cafe"));
    }

    #[test]
    fn flags_marker_absent_still_parses_when_literal_ends_the_document() {
        let raw = format!(")]}}'\n{}", listing_payload());
        let outer = json!([null, null, null, [null, null, null, null, null, null, raw]]);
        let html = format!("<html>;window.APP_INITIALIZATION_STATE={outer}");
        let fields = extract(&html);
        assert_eq!(fields.name.as_deref(), Some("Cafe X"));
    }

    #[test]
    fn flags_marker_absent_with_trailing_markup_yields_all_null() {
        let raw = format!(")]}}'\n{}", listing_payload());
        let outer = json!([null, null, null, [null, null, null, null, null, null, raw]]);
        let html = format!("<html>;window.APP_INITIALIZATION_STATE={outer};</script></html>");
        assert_eq!(extract(&html), ListingFields::default());
    }

    #[test]
    fn get_at_tolerates_non_array_intermediates() {
        let value = json!({"not": "an array"});
        assert_eq!(get_at(&value, &[0]), None);
        let value = json!([[1, 2], "leaf"]);
        assert_eq!(get_at(&value, &[1, 0]), None);
        assert_eq!(get_at(&value, &[0, 1]), Some(&json!(2)));
    }
}
