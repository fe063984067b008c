//! Per-record date normalization.
//!
//! Each fetched feature carries its incident date as a string. This module
//! parses it under the fixed pattern and writes the derived numeric fields
//! back in place. A record whose date string fails to parse is flagged
//! invalid (derived fields stay `None`) and the rest of the collection
//! still normalizes; the caller decides how loudly to surface the count.

use gv_dashboard_datetime::{epoch_ms, ms_since_midnight, parse_time, weekday_index};
use gv_dashboard_models::{FeatureCollection, ShootingVictimProperties};

/// Derives `date_in_ms`, `time_in_ms`, and `weekday` from the record's date
/// string. Returns `false` (leaving all three `None`) when the string does
/// not match the expected pattern.
pub fn normalize_record(properties: &mut ShootingVictimProperties) -> bool {
    match parse_time(&properties.date) {
        Ok(dt) => {
            properties.date_in_ms = Some(epoch_ms(dt));
            properties.time_in_ms = Some(ms_since_midnight(dt));
            properties.weekday = Some(weekday_index(dt));
            true
        }
        Err(_) => {
            properties.date_in_ms = None;
            properties.time_in_ms = None;
            properties.weekday = None;
            false
        }
    }
}

/// Normalizes every record in place, preserving order. Returns the number
/// of records whose date string failed to parse.
pub fn normalize_collection(
    collection: &mut FeatureCollection<ShootingVictimProperties>,
) -> usize {
    collection
        .features
        .iter_mut()
        .map(|feature| normalize_record(&mut feature.properties))
        .filter(|valid| !valid)
        .count()
}
