#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Fetch orchestration and in-memory dataset state.
//!
//! [`DatasetAssembler`] ties the pipeline together: it pulls named JSON
//! documents through [`gv_dashboard_fetch`], runs date normalization over
//! each year's features, and holds the results in [`DatasetState`] for the
//! view layer to read.

pub mod normalize;
pub mod state;

use gv_dashboard_fetch::feature_server::{
    self, BatchedQuery, FeatureServerQuery, QueryError,
};
use gv_dashboard_fetch::{DataRepoClient, FetchError};
use gv_dashboard_models::layers::{BoundaryLayer, STREET_CENTERLINE_URL};
use gv_dashboard_models::{FeatureCollection, GenericProperties, ShootingVictimProperties};

pub use state::DatasetState;

/// Filename of the available-years document.
pub const DATA_YEARS_FILE: &str = "data_years.json";

/// Filename of the aggregate homicide-totals document.
pub const HOMICIDE_TOTALS_FILE: &str = "homicide_totals.json";

/// Filename of the daily-cumulative shootings document.
pub const DAILY_FILE: &str = "shootings_cumulative_daily.json";

/// Filename of the per-year feature document.
#[must_use]
pub fn year_file(year: i32) -> String {
    format!("shootings_{year}.json")
}

/// Errors from an assembler operation.
///
/// A failed operation leaves the corresponding state slot untouched; the
/// dataset is absent rather than corrupt.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// A named-JSON fetch failed.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// A feature-server query failed.
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// A fetched document did not decode into the expected shape.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Fetches, normalizes, and stores the dashboard dataset.
///
/// Operations take `&mut self` and await sequentially; nothing here is
/// designed for concurrent calls against the same state.
#[derive(Debug, Default)]
pub struct DatasetAssembler {
    client: DataRepoClient,
    state: DatasetState,
}

impl DatasetAssembler {
    /// Creates an assembler against the default data repository with empty
    /// state.
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(DataRepoClient::new())
    }

    /// Creates an assembler against a specific client (e.g. a different
    /// content root).
    #[must_use]
    pub fn with_client(client: DataRepoClient) -> Self {
        Self {
            client,
            state: DatasetState::new(),
        }
    }

    /// Read access to the dataset state.
    #[must_use]
    pub const fn state(&self) -> &DatasetState {
        &self.state
    }

    /// Mutable access for view-driven state changes (year selection).
    pub const fn state_mut(&mut self) -> &mut DatasetState {
        &mut self.state
    }

    /// Fetches the available-years document and stores it; the first listed
    /// year becomes the default selection.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the fetch fails or the document is not a
    /// list of years. There is no fallback years list.
    pub async fn fetch_years(&mut self) -> Result<&[i32], DatasetError> {
        let value = self.client.fetch_named_json(DATA_YEARS_FILE).await?;
        let years: Vec<i32> = serde_json::from_value(value)?;

        log::info!("Data years loaded: {years:?}");
        self.state.set_years(years);
        Ok(self.state.years())
    }

    /// Fetches the feature document for `year`, normalizes each record's
    /// date fields in place, and stores the collection keyed by `year`.
    ///
    /// Always re-fetches; callers wanting the cached copy check
    /// [`DatasetState::cached_year`] first. Records with malformed date
    /// strings are kept with their derived fields unset.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the fetch fails or the document is not a
    /// feature collection.
    pub async fn fetch_year_data(
        &mut self,
        year: i32,
    ) -> Result<&FeatureCollection<ShootingVictimProperties>, DatasetError> {
        let value = self.client.fetch_named_json(&year_file(year)).await?;
        let mut collection: FeatureCollection<ShootingVictimProperties> =
            serde_json::from_value(value)?;

        let invalid = normalize::normalize_collection(&mut collection);
        if invalid > 0 {
            log::warn!("{year}: {invalid} records with unparseable date strings");
        }
        log::info!("{year}: {} records loaded", collection.len());

        Ok(self.state.insert_year(year, collection))
    }

    /// Fetches the aggregate homicide-totals document and stores it
    /// unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the fetch fails.
    pub async fn fetch_homicide_totals(&mut self) -> Result<&serde_json::Value, DatasetError> {
        let value = self.client.fetch_named_json(HOMICIDE_TOTALS_FILE).await?;
        Ok(self.state.set_homicide_totals(value))
    }

    /// Fetches the daily-cumulative document and stores it unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the fetch fails.
    pub async fn fetch_daily_data(&mut self) -> Result<&serde_json::Value, DatasetError> {
        let value = self.client.fetch_named_json(DAILY_FILE).await?;
        Ok(self.state.set_daily(value))
    }

    /// Fetches the street-centerline segments for the hot-spots-by-block
    /// layer, batched by segment id.
    ///
    /// Not stored: the segment set follows the active filter selection, so
    /// the view layer owns the result.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if any batch query fails; partial results
    /// are discarded.
    pub async fn fetch_street_hotspots(
        &self,
        segment_ids: Vec<String>,
    ) -> Result<FeatureCollection<GenericProperties>, DatasetError> {
        let query = BatchedQuery::new(STREET_CENTERLINE_URL, "segment_id", segment_ids)
            .with_out_fields("segment_id");
        let collection =
            feature_server::query_feature_server_batched(self.client.http_client(), &query)
                .await?;
        Ok(collection)
    }

    /// Fetches a boundary overlay's features (districts, ZIP codes, etc.).
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the query fails.
    pub async fn fetch_boundary_layer(
        &self,
        layer: BoundaryLayer,
    ) -> Result<FeatureCollection<GenericProperties>, DatasetError> {
        let query = FeatureServerQuery::new(layer.url());
        let collection =
            feature_server::query_feature_server(self.client.http_client(), &query).await?;
        Ok(collection)
    }
}
