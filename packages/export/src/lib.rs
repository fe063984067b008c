#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Export shaping for the download panel.
//!
//! Reshapes the in-memory feature collection into a download payload:
//! standards-shaped GeoJSON text or flat CSV text with synthesized `lng`/
//! `lat` columns, with optional column trimming, plus the local save step.

use std::path::Path;

use gv_dashboard_models::filters::DownloadConfig;
use gv_dashboard_models::{
    DownloadFormat, Feature, FeatureCollection, FeatureId, FeatureTag, GenericProperties,
};
use serde::Serialize;

/// Errors from export shaping or the save step.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// JSON serialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV rendering failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing the exported file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A feature's properties did not serialize to a JSON object.
    #[error("feature properties are not a JSON object")]
    NonObjectProperties,
}

/// A ready-to-save export: text content plus its MIME type and filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPayload {
    /// UTF-8 file content.
    pub content: String,
    /// MIME type, e.g. `text/csv`.
    pub content_type: String,
    /// Target filename including extension.
    pub file_name: String,
}

impl DownloadPayload {
    /// Builds a payload for `format`, deriving the MIME type and the
    /// `{stem}.{ext}` filename.
    pub fn new(format: DownloadFormat, stem: &str, content: String) -> Self {
        Self {
            content,
            content_type: format.content_type().to_owned(),
            file_name: format!("{stem}.{}", format.extension()),
        }
    }
}

/// Returns a new mapping holding only `allowed` keys, in `allowed` order.
///
/// Keys absent on the input are skipped, never inserted as null; this is a
/// trim, not a fill.
#[must_use]
pub fn select_columns(properties: &GenericProperties, allowed: &[&str]) -> GenericProperties {
    allowed
        .iter()
        .filter_map(|key| {
            properties
                .get(*key)
                .map(|value| ((*key).to_owned(), value.clone()))
        })
        .collect()
}

/// Returns a new mapping with keys renamed per `renames` (internal key,
/// output label), preserving entry order. Keys without a rename pass
/// through unchanged.
#[must_use]
pub fn rename_columns(
    properties: &GenericProperties,
    renames: &[(&str, &str)],
) -> GenericProperties {
    properties
        .iter()
        .map(|(key, value)| {
            let renamed = renames
                .iter()
                .find(|(from, _)| from == key)
                .map_or(key.as_str(), |(_, to)| *to);
            (renamed.to_owned(), value.clone())
        })
        .collect()
}

/// Returns a new mapping with the config's excluded columns dropped and its
/// per-column literal overrides applied, preserving entry order.
#[must_use]
pub fn apply_download_config(
    properties: &GenericProperties,
    config: &DownloadConfig,
) -> GenericProperties {
    properties
        .iter()
        .filter(|(key, _)| !config.exclude.iter().any(|name| name == *key))
        .map(|(key, value)| {
            let value = config.overrides.get(key).unwrap_or(value);
            (key.clone(), value.clone())
        })
        .collect()
}

/// Serializes features into standards-shaped GeoJSON `FeatureCollection`
/// text.
///
/// Features gain sequential numeric ids. When `columns` is given, each
/// feature's properties are trimmed first via [`select_columns`].
///
/// # Errors
///
/// Returns [`ExportError`] if a feature's properties do not serialize to a
/// JSON object.
pub fn to_geojson_text<P: Serialize>(
    features: &[Feature<P>],
    columns: Option<&[&str]>,
) -> Result<String, ExportError> {
    let shaped: Vec<Feature<GenericProperties>> = features
        .iter()
        .enumerate()
        .map(|(i, feature)| {
            let mut properties = flatten_properties(&feature.properties)?;
            if let Some(allowed) = columns {
                properties = select_columns(&properties, allowed);
            }
            Ok(Feature {
                tag: FeatureTag::Feature,
                id: Some(FeatureId::Number(i as u64)),
                geometry: feature.geometry.clone(),
                properties,
            })
        })
        .collect::<Result<_, ExportError>>()?;

    let collection = FeatureCollection {
        features: shaped,
        ..FeatureCollection::default()
    };
    Ok(serde_json::to_string(&collection)?)
}

/// Renders features as CSV text: one row per feature, header row from the
/// first record's keys.
///
/// Each feature's properties are flattened and two columns are synthesized:
/// `lng` and `lat` from `geometry.coordinates[0]`/`[1]`, empty when the
/// geometry is absent. When `columns` is given the row is then trimmed to
/// it, in its order (include `lng`/`lat` in the list to keep them).
///
/// # Errors
///
/// Returns [`ExportError`] if properties do not serialize to a JSON object
/// or CSV rendering fails.
pub fn to_csv_text<P: Serialize>(
    features: &[Feature<P>],
    columns: Option<&[&str]>,
) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut header: Option<Vec<String>> = None;

    for feature in features {
        let mut row = flatten_properties(&feature.properties)?;
        let (lng, lat) = feature
            .geometry
            .as_ref()
            .and_then(gv_dashboard_models::Geometry::point)
            .map_or((serde_json::Value::Null, serde_json::Value::Null), |p| {
                (p[0].into(), p[1].into())
            });
        row.insert("lng".to_owned(), lng);
        row.insert("lat".to_owned(), lat);

        if let Some(allowed) = columns {
            row = select_columns(&row, allowed);
        }

        // Header comes from the first record's keys.
        if header.is_none() {
            let keys: Vec<String> = row.keys().cloned().collect();
            writer.write_record(&keys)?;
            header = Some(keys);
        }

        let record: Vec<String> = header
            .iter()
            .flatten()
            .map(|key| row.get(key).map_or_else(String::new, render_csv_value))
            .collect();
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(std::io::Error::other(e.to_string())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Saves a payload under `dir`, the native counterpart of the browser's
/// save-as trigger.
///
/// # Errors
///
/// Returns [`ExportError`] if the write fails.
pub fn write_download(dir: &Path, payload: &DownloadPayload) -> Result<(), ExportError> {
    std::fs::create_dir_all(dir)?;
    std::fs::write(dir.join(&payload.file_name), &payload.content)?;
    Ok(())
}

/// Serializes typed properties to an ordered JSON mapping.
fn flatten_properties<P: Serialize>(properties: &P) -> Result<GenericProperties, ExportError> {
    match serde_json::to_value(properties)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(ExportError::NonObjectProperties),
    }
}

fn render_csv_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use gv_dashboard_models::Geometry;

    use super::*;

    fn feature(n: i64, with_geometry: bool) -> Feature<GenericProperties> {
        let properties = serde_json::json!({
            "dc_key": format!("2020{n:08}"),
            "race": "B",
            "fatal": n % 2 == 0,
            "age": serde_json::Value::Null
        });
        let serde_json::Value::Object(properties) = properties else {
            unreachable!()
        };
        Feature {
            tag: FeatureTag::Feature,
            id: None,
            geometry: with_geometry.then(|| Geometry::Point {
                coordinates: [-75.16, 39.95],
            }),
            properties,
        }
    }

    #[test]
    fn select_columns_preserves_allowed_order() {
        let trimmed = select_columns(&feature(1, true).properties, &["fatal", "dc_key"]);
        let keys: Vec<&String> = trimmed.keys().collect();
        assert_eq!(keys, vec!["fatal", "dc_key"]);
    }

    #[test]
    fn select_columns_skips_absent_keys() {
        let trimmed = select_columns(&feature(1, true).properties, &["dc_key", "no_such_column"]);
        assert_eq!(trimmed.len(), 1);
        assert!(!trimmed.contains_key("no_such_column"));
    }

    #[test]
    fn download_config_excludes_and_overrides_columns() {
        let config: DownloadConfig = serde_json::from_value(serde_json::json!({
            "exclude": ["age"],
            "overrides": { "race": "Redacted" }
        }))
        .unwrap();

        let shaped = apply_download_config(&feature(1, true).properties, &config);
        let keys: Vec<&String> = shaped.keys().collect();
        assert_eq!(keys, vec!["dc_key", "race", "fatal"]);
        assert_eq!(shaped["race"], "Redacted");
    }

    #[test]
    fn rename_columns_maps_labels_in_place() {
        let renamed = rename_columns(
            &feature(1, true).properties,
            &[("dc_key", "Police Incident Number"), ("race", "Race/Ethnicity")],
        );
        let keys: Vec<&String> = renamed.keys().collect();
        assert_eq!(
            keys,
            vec!["Police Incident Number", "Race/Ethnicity", "fatal", "age"]
        );
    }

    #[test]
    fn geojson_round_trips_feature_count() {
        let features = vec![feature(1, true), feature(2, false), feature(3, true)];
        let text = to_geojson_text(&features, None).unwrap();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"].as_array().unwrap().len(), 3);
        assert_eq!(value["features"][1]["id"], 1);
        assert!(value["features"][1]["geometry"].is_null());
    }

    #[test]
    fn geojson_trims_to_allowed_keys() {
        let features = vec![feature(1, true)];
        let text = to_geojson_text(&features, Some(&["dc_key", "fatal"])).unwrap();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let properties = value["features"][0]["properties"].as_object().unwrap();
        let keys: Vec<&String> = properties.keys().collect();
        assert_eq!(keys, vec!["dc_key", "fatal"]);
    }

    #[test]
    fn csv_has_header_plus_one_row_per_feature() {
        let features = vec![feature(1, true), feature(2, true)];
        let text = to_csv_text(&features, None).unwrap();
        assert_eq!(text.trim_end().lines().count(), 3);
    }

    #[test]
    fn csv_synthesizes_lng_lat_from_geometry() {
        let features = vec![feature(1, true)];
        let text = to_csv_text(&features, Some(&["dc_key", "lng", "lat"])).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "dc_key,lng,lat");
        assert_eq!(lines.next().unwrap(), "202000000001,-75.16,39.95");
    }

    #[test]
    fn csv_leaves_lng_lat_empty_without_geometry() {
        let features = vec![feature(1, false)];
        let text = to_csv_text(&features, Some(&["dc_key", "lng", "lat"])).unwrap();

        let row = text.lines().nth(1).unwrap();
        assert_eq!(row, "202000000001,,");
    }

    #[test]
    fn csv_of_no_features_is_empty() {
        let text = to_csv_text::<GenericProperties>(&[], None).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn payload_derives_name_and_type() {
        let payload = DownloadPayload::new(DownloadFormat::Csv, "shootings_2020", String::new());
        assert_eq!(payload.file_name, "shootings_2020.csv");
        assert_eq!(payload.content_type, "text/csv");
    }

    #[test]
    fn writes_download_to_disk() {
        let dir = std::env::temp_dir().join(format!(
            "gv_dashboard_export_test_{}",
            std::process::id()
        ));
        let payload = DownloadPayload::new(
            DownloadFormat::GeoJson,
            "shootings_2020",
            r#"{"type":"FeatureCollection","features":[]}"#.to_owned(),
        );
        write_download(&dir, &payload).unwrap();

        let written = std::fs::read_to_string(dir.join("shootings_2020.geojson")).unwrap();
        assert_eq!(written, payload.content);
        std::fs::remove_dir_all(&dir).ok();
    }
}
