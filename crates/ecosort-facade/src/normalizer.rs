//! Raw document to [`NormalizedState`].
//!
//! The device writes whatever it has; fields come and go and nothing is
//! typed remotely. Each field is copied only when present with the expected
//! JSON type and defaults otherwise. `system` and `bin` are handled
//! independently, so a broken namespace never blanks the other one.

use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{LinkStatus, NormalizedState, STATE_IDLE, WASTE_NONE};

type Object = Map<String, Value>;

/// Normalize a raw root document.
///
/// `None` (or JSON `null`) means the store was unreachable or empty and
/// yields the offline defaults.
pub fn normalize(raw: Option<&Value>) -> NormalizedState {
    let Some(doc) = raw.filter(|v| !v.is_null()) else {
        return NormalizedState::offline();
    };

    let mut state = NormalizedState {
        system_state: STATE_IDLE.to_string(),
        wifi_status: "Connected".to_string(),
        connection_status: LinkStatus::Online,
        ..NormalizedState::offline()
    };

    if let Some(system) = namespace(doc, "system") {
        apply_system(&mut state, system);
    }
    if let Some(bin) = namespace(doc, "bin") {
        apply_bin(&mut state, bin);
    }

    debug!(
        raw = %doc,
        system_state = %state.system_state,
        last_waste = %state.last_waste,
        "Normalized remote state"
    );

    state
}

/// Object-valued child of the root; anything else counts as absent.
fn namespace<'a>(doc: &'a Value, key: &str) -> Option<&'a Object> {
    doc.get(key).and_then(Value::as_object)
}

fn apply_system(state: &mut NormalizedState, system: &Object) {
    if let Some(s) = string_field(system, "state") {
        state.system_state = s;
    }
    if let Some(wifi) = string_field(system, "wifi") {
        state.wifi_status = wifi;
    }
    state.ssid = string_field(system, "ssid");
}

fn apply_bin(state: &mut NormalizedState, bin: &Object) {
    state.last_waste = string_field(bin, "lastWaste").unwrap_or_else(|| WASTE_NONE.to_string());
    state.wet_full = bin.get("wetFull").and_then(Value::as_bool).unwrap_or(false);
    state.dry_full = bin.get("dryFull").and_then(Value::as_bool).unwrap_or(false);
    state.wet_count = count_field(bin, "wetCount");
    state.dry_count = count_field(bin, "dryCount");
    state.last_updated = bin
        .get("lastUpdated")
        .filter(|v| v.is_string() || v.is_number())
        .cloned();
}

fn string_field(obj: &Object, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Non-negative integer counter. Integral floats (`3.0`) are accepted since
/// some clients write every number as a double.
pub(crate) fn count_field(obj: &Object, key: &str) -> u64 {
    let Some(value) = obj.get(key) else {
        return 0;
    };
    if let Some(n) = value.as_u64() {
        return n;
    }
    match value.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
            f as u64
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_bin_defaults(state: &NormalizedState) {
        assert_eq!(state.last_waste, "NONE");
        assert!(!state.wet_full);
        assert!(!state.dry_full);
        assert_eq!(state.wet_count, 0);
        assert_eq!(state.dry_count, 0);
        assert_eq!(state.last_updated, None);
    }

    #[test]
    fn test_unreachable_is_offline() {
        assert_eq!(normalize(None), NormalizedState::offline());
        assert_eq!(normalize(Some(&Value::Null)), NormalizedState::offline());
    }

    #[test]
    fn test_offline_exact_payload() {
        let value = serde_json::to_value(normalize(None)).unwrap();
        assert_eq!(
            value,
            json!({
                "systemState": "OFFLINE",
                "lastWaste": "NONE",
                "wetFull": false,
                "dryFull": false,
                "wetCount": 0,
                "dryCount": 0,
                "connection_status": "Offline",
                "wifi_status": "Unknown",
                "lastUpdated": null
            })
        );
    }

    #[test]
    fn test_full_document() {
        let doc = json!({
            "system": {"state": "SORTING", "wifi": "Connected", "ssid": "lab-net"},
            "bin": {
                "lastWaste": "WET",
                "wetFull": true,
                "dryFull": false,
                "wetCount": 7,
                "dryCount": 2,
                "lastUpdated": "2024-03-01T10:00:00Z"
            }
        });
        let state = normalize(Some(&doc));

        assert_eq!(state.connection_status, LinkStatus::Online);
        assert_eq!(state.system_state, "SORTING");
        assert_eq!(state.wifi_status, "Connected");
        assert_eq!(state.ssid.as_deref(), Some("lab-net"));
        assert_eq!(state.last_waste, "WET");
        assert!(state.wet_full);
        assert!(!state.dry_full);
        assert_eq!(state.wet_count, 7);
        assert_eq!(state.dry_count, 2);
        assert_eq!(state.last_updated, Some(json!("2024-03-01T10:00:00Z")));
    }

    #[test]
    fn test_reachable_but_empty() {
        let state = normalize(Some(&json!({})));
        assert_eq!(state.connection_status, LinkStatus::Online);
        assert_eq!(state.system_state, "IDLE");
        assert_eq!(state.wifi_status, "Connected");
        assert_eq!(state.ssid, None);
        assert_bin_defaults(&state);
    }

    #[test]
    fn test_missing_system_only() {
        let state = normalize(Some(&json!({"bin": {"lastWaste": "DRY", "dryCount": 3}})));
        assert_eq!(state.system_state, "IDLE");
        assert_eq!(state.wifi_status, "Connected");
        assert_eq!(state.last_waste, "DRY");
        assert_eq!(state.dry_count, 3);
    }

    #[test]
    fn test_missing_bin_only() {
        let state = normalize(Some(&json!({"system": {"state": "ANALYZING"}})));
        assert_eq!(state.system_state, "ANALYZING");
        assert_eq!(state.wifi_status, "Connected");
        assert_bin_defaults(&state);
    }

    #[test]
    fn test_non_object_namespaces_degrade_independently() {
        let state = normalize(Some(&json!({"system": "broken", "bin": {"wetCount": 5}})));
        assert_eq!(state.connection_status, LinkStatus::Online);
        assert_eq!(state.system_state, "IDLE");
        assert_eq!(state.wet_count, 5);

        let state = normalize(Some(&json!({"system": {"state": "COOLDOWN"}, "bin": [1, 2, 3]})));
        assert_eq!(state.system_state, "COOLDOWN");
        assert_bin_defaults(&state);
    }

    #[test]
    fn test_non_object_root() {
        for doc in [json!("hello"), json!(42), json!([1, 2]), json!(true)] {
            let state = normalize(Some(&doc));
            assert_eq!(state.connection_status, LinkStatus::Online);
            assert_eq!(state.system_state, "IDLE");
            assert_bin_defaults(&state);
        }
    }

    #[test]
    fn test_wrong_field_types_default_per_field() {
        let doc = json!({
            "system": {"state": 5, "wifi": null, "ssid": 12},
            "bin": {
                "lastWaste": false,
                "wetFull": "yes",
                "dryFull": true,
                "wetCount": "3",
                "dryCount": -4,
                "lastUpdated": {"seconds": 1}
            }
        });
        let state = normalize(Some(&doc));
        assert_eq!(state.system_state, "IDLE");
        assert_eq!(state.wifi_status, "Connected");
        assert_eq!(state.ssid, None);
        assert_eq!(state.last_waste, "NONE");
        assert!(!state.wet_full);
        assert!(state.dry_full);
        assert_eq!(state.wet_count, 0);
        assert_eq!(state.dry_count, 0);
        assert_eq!(state.last_updated, None);
    }

    #[test]
    fn test_numeric_timestamp_passes_through() {
        let state = normalize(Some(&json!({"bin": {"lastUpdated": 1709287200}})));
        assert_eq!(state.last_updated, Some(json!(1709287200)));
    }

    #[test]
    fn test_integral_float_counts() {
        let state = normalize(Some(&json!({"bin": {"wetCount": 3.0, "dryCount": 2.5}})));
        assert_eq!(state.wet_count, 3);
        assert_eq!(state.dry_count, 0);
    }

    #[test]
    fn test_ssid_omitted_when_absent() {
        let state = normalize(Some(&json!({"system": {"state": "IDLE"}})));
        let value = serde_json::to_value(state).unwrap();
        assert!(value.get("ssid").is_none());
    }
}
