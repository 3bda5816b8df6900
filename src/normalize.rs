//! Recursive normalization of raw results JSON
//!
//! The external experiment binary serializes Rust `Duration` values as
//! `{"secs": u64, "nanos": u32}` objects and the results document keys
//! groups by wire names containing hyphens (`bloom-filter`). This module
//! rewrites a decoded [`serde_json::Value`] tree into canonical form:
//!
//! - every object key has `-` replaced with `_`;
//! - every object whose key set is exactly `{secs, nanos}` is collapsed
//!   into a single integer nanosecond count;
//! - arrays keep their order, scalars pass through.
//!
//! Both rewrites are applied together in one bottom-up walk, so duration
//! objects are detected at any nesting depth and the walk is idempotent
//! on already-normalized data.

use serde_json::{Map, Value};

const SECS_KEY: &str = "secs";
const NANOS_KEY: &str = "nanos";

/// Canonicalize one key: every `-` becomes `_`.
///
/// Total and idempotent; keys without hyphens are returned unchanged.
#[must_use]
pub fn canonical_key(key: &str) -> String {
    key.replace('-', "_")
}

/// Normalize a decoded JSON tree, bottom-up.
#[must_use]
pub fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => normalize_object(map),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        scalar => scalar,
    }
}

fn normalize_object(map: Map<String, Value>) -> Value {
    let rebuilt: Map<String, Value> = map
        .into_iter()
        .map(|(k, v)| (canonical_key(&k), normalize(v)))
        .collect();
    if is_duration_shaped(&rebuilt) {
        Value::from(duration_nanos(&rebuilt))
    } else {
        Value::Object(rebuilt)
    }
}

/// A duration marker is an object whose key set is exactly
/// `{secs, nanos}`. Detection is structural only; value types are not
/// inspected (see `duration_nanos` for the lenient read policy).
fn is_duration_shaped(map: &Map<String, Value>) -> bool {
    map.len() == 2 && map.contains_key(SECS_KEY) && map.contains_key(NANOS_KEY)
}

/// Total nanoseconds of a duration-shaped object, saturating at `u64::MAX`.
///
/// Non-numeric components read as zero rather than failing, so documents
/// with degenerate duration markers normalize instead of aborting.
fn duration_nanos(map: &Map<String, Value>) -> u64 {
    let secs = map.get(SECS_KEY).and_then(Value::as_u64).unwrap_or(0);
    let nanos = map.get(NANOS_KEY).and_then(Value::as_u64).unwrap_or(0);
    secs.saturating_mul(1_000_000_000).saturating_add(nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_duration_object_collapses_to_nanos() {
        let input = json!({"query_duration": {"secs": 1, "nanos": 500_000_000}});
        let expected = json!({"query_duration": 1_500_000_000u64});
        assert_eq!(normalize(input), expected);
    }

    #[test]
    fn test_duration_detected_at_depth() {
        let input = json!({
            "runs": [
                {"timings": {"positives-query-duration": {"secs": 0, "nanos": 42}}}
            ]
        });
        let expected = json!({
            "runs": [
                {"timings": {"positives_query_duration": 42u64}}
            ]
        });
        assert_eq!(normalize(input), expected);
    }

    #[test]
    fn test_hyphenated_keys_rewritten() {
        let input = json!({"bloom-filter": [{"false-positive-count": 5}]});
        let expected = json!({"bloom_filter": [{"false_positive_count": 5}]});
        assert_eq!(normalize(input), expected);
    }

    #[test]
    fn test_extra_keys_disqualify_duration() {
        // Three keys: not a duration marker, recursed into instead.
        let input = json!({"secs": 1, "nanos": 2, "label": "x"});
        assert_eq!(normalize(input.clone()), input);
    }

    #[test]
    fn test_lenient_non_numeric_components() {
        // Key-presence-only detection: still converted, components read
        // as zero.
        let input = json!({"d": {"secs": "x", "nanos": "y"}});
        assert_eq!(normalize(input), json!({"d": 0u64}));
    }

    #[test]
    fn test_scalars_and_order_pass_through() {
        let input = json!([1, "two", 3.5, null, true]);
        assert_eq!(normalize(input.clone()), input);
    }

    #[test]
    fn test_idempotent_on_normalized_data() {
        let input = json!({
            "bloom-filter": [{
                "name": "bloom-filter",
                "positives-query-duration": {"secs": 2, "nanos": 1},
                "false_positive_count": 7
            }]
        });
        let once = normalize(input);
        let twice = normalize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_canonical_key_total_and_idempotent() {
        assert_eq!(canonical_key("a-b-c"), "a_b_c");
        assert_eq!(canonical_key("a_b_c"), "a_b_c");
        assert_eq!(canonical_key("plain"), "plain");
    }

    #[test]
    fn test_saturating_nanos() {
        let input = json!({"d": {"secs": u64::MAX, "nanos": 999_999_999}});
        assert_eq!(normalize(input), json!({"d": u64::MAX}));
    }
}
