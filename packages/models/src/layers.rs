//! Map layer endpoints and export column labels.
//!
//! The boundary overlays and the street hot-spot layer are served from the
//! city's ArcGIS organization; the URLs here are the layer roots that
//! feature-server queries append `/query` to.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Street centerline layer, queried in batches by `segment_id` for the
/// hot-spots-by-street-block view.
pub const STREET_CENTERLINE_URL: &str = "https://services.arcgis.com/fLeGjb7u4uXqeF9q/arcgis/rest/services/Street_Centerline/FeatureServer/0";

/// A boundary overlay the dashboard can aggregate incidents by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BoundaryLayer {
    /// Police districts.
    Police,
    /// Council districts.
    Council,
    /// ZIP codes.
    Zip,
    /// Neighborhoods.
    Hood,
    /// PA House districts.
    HouseDistrict,
    /// Elementary school catchments.
    School,
}

impl BoundaryLayer {
    /// The feature-server layer URL for this boundary set.
    #[must_use]
    pub const fn url(self) -> &'static str {
        match self {
            Self::Police => "https://services.arcgis.com/fLeGjb7u4uXqeF9q/arcgis/rest/services/Boundaries_District/FeatureServer/0",
            Self::Council => "https://services.arcgis.com/fLeGjb7u4uXqeF9q/arcgis/rest/services/Council_Districts_2016/FeatureServer/0",
            Self::Zip => "https://services.arcgis.com/fLeGjb7u4uXqeF9q/arcgis/rest/services/Philadelphia_ZCTA_2018/FeatureServer/0",
            Self::Hood => "https://services.arcgis.com/fLeGjb7u4uXqeF9q/arcgis/rest/services/Philly_NTAs/FeatureServer/0",
            Self::HouseDistrict => "https://services.arcgis.com/fLeGjb7u4uXqeF9q/arcgis/rest/services/PA_House_Districts/FeatureServer/0",
            Self::School => "https://services.arcgis.com/fLeGjb7u4uXqeF9q/arcgis/rest/services/Philadelphia_Elementary_School_Catchments_SY_2019_2020/FeatureServer/0",
        }
    }

    /// Display label for the layer picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Police => "Police Districts",
            Self::Council => "Council Districts",
            Self::Zip => "ZIP Codes",
            Self::Hood => "Neighborhoods",
            Self::HouseDistrict => "PA House Districts",
            Self::School => "Elementary School Catchments",
        }
    }
}

/// Download column order and human-readable header labels, internal key
/// first.
pub const OUTPUT_COLUMNS: &[(&str, &str)] = &[
    ("dc_key", "Police Incident Number"),
    ("race", "Race/Ethnicity"),
    ("sex", "Gender"),
    ("age", "Age"),
    ("fatal", "Outcome"),
    ("date", "Date"),
    ("block_number", "Block Number"),
    ("street_name", "Street Name"),
    ("has_court_case", "Associated Court Case"),
    ("zip_code", "ZIP Code"),
    ("council_district", "Council District"),
    ("police_district", "Police District"),
    ("neighborhood", "Neighborhood"),
    ("school_name", "Elementary School Catchment"),
    ("house_district", "PA House District"),
    ("lat", "Latitude"),
    ("lng", "Longitude"),
];

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn boundary_layers_carry_arcgis_urls() {
        for layer in BoundaryLayer::iter() {
            assert!(layer.url().contains("/FeatureServer/"));
            assert!(!layer.label().is_empty());
        }
    }

    #[test]
    fn layer_names_use_snake_case() {
        assert_eq!(BoundaryLayer::HouseDistrict.to_string(), "house_district");
        assert_eq!(
            "house_district".parse::<BoundaryLayer>().unwrap(),
            BoundaryLayer::HouseDistrict
        );
    }

    #[test]
    fn output_columns_end_with_coordinates() {
        let keys: Vec<&str> = OUTPUT_COLUMNS.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys.last(), Some(&"lng"));
        assert!(keys.contains(&"dc_key"));
    }
}
