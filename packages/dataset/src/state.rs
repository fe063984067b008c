//! Process-wide dataset state.
//!
//! An explicit, owned object rather than an ambient global; the assembler's
//! fetch operations are the only mutators, and every mutator takes `&mut
//! self`, so same-state races are ruled out by the borrow checker.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use gv_dashboard_models::{FeatureCollection, ShootingVictimProperties};

/// The in-memory dataset consumed by the view layer.
///
/// Initialized empty at process start and lives for the session; there is
/// no teardown. A year's collection, once stored, is only replaced when a
/// caller explicitly re-fetches that year.
#[derive(Debug, Default)]
pub struct DatasetState {
    years: Vec<i32>,
    selected_year: Option<i32>,
    collections: BTreeMap<i32, FeatureCollection<ShootingVictimProperties>>,
    homicide_totals: Option<serde_json::Value>,
    daily: Option<serde_json::Value>,
    ready: bool,
}

impl DatasetState {
    /// Creates the empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Available data years, in the order the server lists them.
    #[must_use]
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// The currently selected year; defaults to the first listed year once
    /// the years document has loaded.
    #[must_use]
    pub const fn selected_year(&self) -> Option<i32> {
        self.selected_year
    }

    /// The cached collection for `year`, if it has been fetched.
    #[must_use]
    pub fn cached_year(&self, year: i32) -> Option<&FeatureCollection<ShootingVictimProperties>> {
        self.collections.get(&year)
    }

    /// Sorted unique street segment ids in the cached collection for
    /// `year`; the WHERE values for the street hot-spots query. Empty when
    /// the year has not been fetched.
    #[must_use]
    pub fn segment_ids(&self, year: i32) -> Vec<String> {
        let mut ids = std::collections::BTreeSet::new();
        if let Some(collection) = self.collections.get(&year) {
            for feature in &collection.features {
                if let Some(id) = &feature.properties.segment_id {
                    ids.insert(id.clone());
                }
            }
        }
        ids.into_iter().collect()
    }

    /// The aggregate homicide-totals document, if fetched. Opaque JSON.
    #[must_use]
    pub const fn homicide_totals(&self) -> Option<&serde_json::Value> {
        self.homicide_totals.as_ref()
    }

    /// The daily-cumulative document, if fetched. Opaque JSON.
    #[must_use]
    pub const fn daily(&self) -> Option<&serde_json::Value> {
        self.daily.as_ref()
    }

    /// `true` once the years document has loaded.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    /// Selects a year the view should display. Returns `false` (and leaves
    /// the selection unchanged) when the year is not in the years list.
    pub fn select_year(&mut self, year: i32) -> bool {
        if self.years.contains(&year) {
            self.selected_year = Some(year);
            true
        } else {
            false
        }
    }

    pub(crate) fn set_years(&mut self, years: Vec<i32>) {
        self.selected_year = years.first().copied();
        self.years = years;
        self.ready = true;
    }

    pub(crate) fn insert_year(
        &mut self,
        year: i32,
        collection: FeatureCollection<ShootingVictimProperties>,
    ) -> &FeatureCollection<ShootingVictimProperties> {
        match self.collections.entry(year) {
            Entry::Occupied(mut entry) => {
                entry.insert(collection);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(collection),
        }
    }

    pub(crate) fn set_homicide_totals(&mut self, totals: serde_json::Value) -> &serde_json::Value {
        self.homicide_totals.insert(totals)
    }

    pub(crate) fn set_daily(&mut self, daily: serde_json::Value) -> &serde_json::Value {
        self.daily.insert(daily)
    }
}
