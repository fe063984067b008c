#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared data types for the gun-violence dashboard data core.
//!
//! Defines the GeoJSON-shaped [`Feature`]/[`FeatureCollection`] containers,
//! the typed [`ShootingVictimProperties`] schema for incident records, and
//! the filter/download configuration types consumed by the presentation
//! layer.

pub mod filters;
pub mod layers;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Loosely-typed feature properties: an ordered mapping of column name to
/// JSON value. Used for feature-server responses whose schema is not known
/// ahead of time.
pub type GenericProperties = serde_json::Map<String, serde_json::Value>;

/// A single WGS84 position, longitude first.
pub type Position = [f64; 2];

/// A feature's geometry, tagged GeoJSON-style.
///
/// Incident records only ever carry points; the other variants cover the
/// boundary and street layers returned by feature-server queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A single position.
    Point {
        /// The position.
        coordinates: Position,
    },
    /// A list of positions.
    MultiPoint {
        /// The positions.
        coordinates: Vec<Position>,
    },
    /// A connected sequence of positions.
    LineString {
        /// The path positions, in order.
        coordinates: Vec<Position>,
    },
    /// Several line strings.
    MultiLineString {
        /// One position list per line string.
        coordinates: Vec<Vec<Position>>,
    },
    /// An outer ring with optional holes.
    Polygon {
        /// Outer ring first, then holes.
        coordinates: Vec<Vec<Position>>,
    },
    /// Several polygons.
    MultiPolygon {
        /// One ring list per polygon.
        coordinates: Vec<Vec<Vec<Position>>>,
    },
}

impl Geometry {
    /// The position when this is a point geometry, `None` otherwise.
    #[must_use]
    pub const fn point(&self) -> Option<Position> {
        match self {
            Self::Point { coordinates } => Some(*coordinates),
            _ => None,
        }
    }
}

/// The GeoJSON `"type": "Feature"` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureTag {
    /// The only valid value.
    #[default]
    Feature,
}

/// The GeoJSON `"type": "FeatureCollection"` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureCollectionTag {
    /// The only valid value.
    #[default]
    FeatureCollection,
}

/// A feature identifier, numeric or text (RFC 7946 §3.2 allows either).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    /// Numeric identifier.
    Number(u64),
    /// Text identifier.
    Text(String),
}

/// One incident record: an optional point geometry plus a property mapping.
///
/// Some incidents lack a resolved location, so `geometry` is nullable. The
/// property type is generic: [`GenericProperties`] for raw feature-server
/// records, [`ShootingVictimProperties`] for the dashboard's own dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature<P> {
    /// Always `"Feature"`.
    #[serde(rename = "type", default)]
    pub tag: FeatureTag,
    /// Optional feature identifier.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<FeatureId>,
    /// Point location, or `None` when the incident was not geocoded.
    pub geometry: Option<Geometry>,
    /// The record's attribute columns.
    pub properties: P,
}

/// An ordered sequence of features.
///
/// Insertion order is the server's return order and is preserved through
/// normalization and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection<P> {
    /// Always `"FeatureCollection"`.
    #[serde(rename = "type", default)]
    pub tag: FeatureCollectionTag,
    /// The member features, in server return order.
    pub features: Vec<Feature<P>>,
}

impl<P> Default for FeatureCollection<P> {
    fn default() -> Self {
        Self {
            tag: FeatureCollectionTag::FeatureCollection,
            features: Vec::new(),
        }
    }
}

impl<P> FeatureCollection<P> {
    /// Number of member features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// `true` when the collection holds no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Victim race, as encoded in the source dataset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum Race {
    /// Black
    B,
    /// Hispanic
    H,
    /// White
    W,
    /// Asian
    A,
    /// Race not recorded or outside the listed categories
    #[serde(rename = "Other/Unknown")]
    #[strum(serialize = "Other/Unknown")]
    OtherUnknown,
}

/// Victim sex.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum Sex {
    /// Male
    M,
    /// Female
    F,
}

/// Victim age bucket, as encoded in the source dataset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum AgeGroup {
    /// Younger than 18
    #[serde(rename = "Younger than 18")]
    #[strum(serialize = "Younger than 18")]
    Younger18,
    /// 18 to 30
    #[serde(rename = "18 to 30")]
    #[strum(serialize = "18 to 30")]
    From18To30,
    /// 31 to 45
    #[serde(rename = "31 to 45")]
    #[strum(serialize = "31 to 45")]
    From31To45,
    /// Older than 45
    #[serde(rename = "Older than 45")]
    #[strum(serialize = "Older than 45")]
    Older45,
    /// Age not recorded
    Unknown,
}

/// The typed property schema for one shooting victim record.
///
/// Known keys are modeled as fields; anything else the upstream dataset adds
/// passes through `extra` untouched. The three derived numeric fields are
/// `None` until date normalization runs, and stay `None` when the record's
/// date string fails to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShootingVictimProperties {
    /// The unique incident number.
    pub dc_key: String,
    /// The victim's race.
    pub race: Race,
    /// The victim's sex.
    pub sex: Sex,
    /// The victim's age; missing for some records.
    pub age: Option<f64>,
    /// The victim's age bucket.
    pub age_group: AgeGroup,
    /// Whether the shooting was fatal.
    pub fatal: bool,
    /// Whether the incident has an associated court case.
    pub has_court_case: bool,
    /// The incident date string, `YYYY/MM/DD HH:MM:SS`.
    pub date: String,
    /// Name of the street where the incident occurred.
    pub street_name: Option<String>,
    /// Block number where the incident occurred.
    pub block_number: Option<f64>,
    /// ID of the street segment where the incident occurred.
    pub segment_id: Option<String>,
    /// ZIP code where the incident occurred.
    pub zip_code: Option<String>,
    /// Council district where the incident occurred.
    pub council_district: Option<String>,
    /// Police district where the incident occurred.
    pub police_district: Option<String>,
    /// Neighborhood where the incident occurred.
    pub neighborhood: Option<String>,
    /// Elementary school catchment.
    pub school_name: Option<String>,
    /// PA House district.
    pub house_district: Option<String>,
    /// PA Senate district.
    pub senate_district: Option<String>,
    /// The incident instant as Unix epoch milliseconds (derived).
    #[serde(rename = "dateInMs", skip_serializing_if = "Option::is_none", default)]
    pub date_in_ms: Option<i64>,
    /// Milliseconds since midnight, `[0, 86_400_000)` (derived).
    #[serde(rename = "timeInMs", skip_serializing_if = "Option::is_none", default)]
    pub time_in_ms: Option<i64>,
    /// Weekday index, Sunday = 0 through Saturday = 6 (derived).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub weekday: Option<u32>,
    /// Unanticipated columns, passed through untouched.
    #[serde(flatten)]
    pub extra: GenericProperties,
}

/// An export format offered by the download panel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DownloadFormat {
    /// Comma-separated text with synthesized `lng`/`lat` columns.
    Csv,
    /// A standards-shaped GeoJSON `FeatureCollection`.
    GeoJson,
}

impl DownloadFormat {
    /// The MIME type sent with the exported file.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::GeoJson => "application/geo+json",
        }
    }

    /// The file extension for the exported file.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::GeoJson => "geojson",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> serde_json::Value {
        serde_json::json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [-75.1635, 39.9523] },
            "properties": {
                "dc_key": "202001012345",
                "race": "B",
                "sex": "M",
                "age": 24.0,
                "age_group": "18 to 30",
                "fatal": true,
                "has_court_case": false,
                "date": "2020/06/15 21:30:00",
                "street_name": "MARKET ST",
                "block_number": 100.0,
                "segment_id": null,
                "zip_code": "19107",
                "council_district": "1",
                "police_district": "6",
                "neighborhood": "Center City",
                "school_name": null,
                "house_district": "182",
                "senate_district": "1",
                "point_source": "geocoded"
            }
        })
    }

    #[test]
    fn deserializes_victim_feature() {
        let feature: Feature<ShootingVictimProperties> =
            serde_json::from_value(sample_record()).unwrap();
        assert_eq!(feature.properties.race, Race::B);
        assert_eq!(feature.properties.age_group, AgeGroup::From18To30);
        assert!(feature.properties.fatal);
        assert_eq!(feature.properties.date_in_ms, None);
    }

    #[test]
    fn unknown_keys_pass_through_extra() {
        let feature: Feature<ShootingVictimProperties> =
            serde_json::from_value(sample_record()).unwrap();
        assert_eq!(
            feature.properties.extra.get("point_source"),
            Some(&serde_json::Value::String("geocoded".to_owned()))
        );

        let back = serde_json::to_value(&feature).unwrap();
        assert_eq!(back["properties"]["point_source"], "geocoded");
    }

    #[test]
    fn point_geometry_exposes_its_position() {
        let feature: Feature<ShootingVictimProperties> =
            serde_json::from_value(sample_record()).unwrap();
        let [lng, lat] = feature.geometry.unwrap().point().unwrap();
        assert!((lng - -75.1635).abs() < f64::EPSILON);
        assert!((lat - 39.9523).abs() < f64::EPSILON);
    }

    #[test]
    fn polygon_geometry_round_trips() {
        let body = serde_json::json!({
            "type": "Polygon",
            "coordinates": [[[-75.2, 39.9], [-75.1, 39.9], [-75.1, 40.0], [-75.2, 39.9]]]
        });
        let geometry: Geometry = serde_json::from_value(body.clone()).unwrap();
        assert!(geometry.point().is_none());
        assert_eq!(serde_json::to_value(&geometry).unwrap(), body);
    }

    #[test]
    fn derived_fields_are_omitted_until_set() {
        let feature: Feature<ShootingVictimProperties> =
            serde_json::from_value(sample_record()).unwrap();
        let back = serde_json::to_value(&feature).unwrap();
        assert!(back["properties"].get("dateInMs").is_none());
        assert!(back["properties"].get("timeInMs").is_none());
    }

    #[test]
    fn race_string_round_trip() {
        assert_eq!(Race::OtherUnknown.to_string(), "Other/Unknown");
        assert_eq!("Other/Unknown".parse::<Race>().unwrap(), Race::OtherUnknown);
    }

    #[test]
    fn collection_preserves_order() {
        let body = serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": null, "properties": { "n": 1 } },
                { "type": "Feature", "geometry": null, "properties": { "n": 2 } },
                { "type": "Feature", "geometry": null, "properties": { "n": 3 } }
            ]
        });
        let collection: FeatureCollection<GenericProperties> =
            serde_json::from_value(body).unwrap();
        let order: Vec<i64> = collection
            .features
            .iter()
            .map(|f| f.properties["n"].as_i64().unwrap())
            .collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn download_format_metadata() {
        assert_eq!(DownloadFormat::Csv.content_type(), "text/csv");
        assert_eq!(DownloadFormat::GeoJson.content_type(), "application/geo+json");
        assert_eq!(DownloadFormat::GeoJson.extension(), "geojson");
    }
}
