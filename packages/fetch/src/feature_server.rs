//! ArcGIS-style feature-server queries.
//!
//! A single query POSTs form-encoded parameters to `{url}/query` and decodes
//! the GeoJSON response. The batched variant partitions a list of WHERE
//! values into bounded chunks, one `<key> IN (...)` query per chunk, issued
//! strictly sequentially so the remote endpoint sees at most one in-flight
//! request and result order is the concatenation of chunk order.

use gv_dashboard_models::{FeatureCollection, GenericProperties};

/// Default maximum number of WHERE values per batched request. Matches the
/// record cap commonly configured on ArcGIS endpoints.
pub const DEFAULT_BATCH_SIZE: usize = 2000;

/// Errors from a feature-server query.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response parsed as JSON but carried no `features` array.
    #[error("feature server response has no `features` array")]
    MissingFeatures,
}

/// Parameters for a single feature-server query.
#[derive(Debug, Clone)]
pub struct FeatureServerQuery {
    /// Layer URL; `/query` is appended on submit.
    pub url: String,
    /// Comma-separated output fields, `*` for all.
    pub out_fields: String,
    /// Decimal places kept on returned coordinates.
    pub geometry_precision: u8,
    /// SQL-like WHERE clause; `1=1` selects everything.
    pub where_clause: String,
}

impl FeatureServerQuery {
    /// Creates a query for `url` with the server defaults: all fields,
    /// 5-digit coordinate precision, unfiltered.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            out_fields: "*".to_owned(),
            geometry_precision: 5,
            where_clause: "1=1".to_owned(),
        }
    }

    /// Restricts the returned attribute columns.
    #[must_use]
    pub fn with_out_fields(mut self, out_fields: impl Into<String>) -> Self {
        self.out_fields = out_fields.into();
        self
    }

    /// Sets the coordinate precision.
    #[must_use]
    pub const fn with_geometry_precision(mut self, digits: u8) -> Self {
        self.geometry_precision = digits;
        self
    }

    /// Sets the WHERE clause.
    #[must_use]
    pub fn with_where_clause(mut self, where_clause: impl Into<String>) -> Self {
        self.where_clause = where_clause.into();
        self
    }
}

/// Parameters for a batched feature-server query.
///
/// WHERE values are embedded verbatim into the generated `IN (...)`
/// clauses; no escaping is applied. Values are application-controlled
/// identifiers (segment IDs, incident keys), never user input.
#[derive(Debug, Clone)]
pub struct BatchedQuery {
    /// Layer URL; `/query` is appended on submit.
    pub url: String,
    /// Column name matched by the `IN (...)` clause.
    pub where_key: String,
    /// Values to select, partitioned into chunks of at most `batch_size`.
    pub where_values: Vec<String>,
    /// Comma-separated output fields, `*` for all.
    pub out_fields: String,
    /// Decimal places kept on returned coordinates.
    pub geometry_precision: u8,
    /// Maximum values per chunk.
    pub batch_size: usize,
}

impl BatchedQuery {
    /// Creates a batched query with the server defaults and
    /// [`DEFAULT_BATCH_SIZE`].
    pub fn new(
        url: impl Into<String>,
        where_key: impl Into<String>,
        where_values: Vec<String>,
    ) -> Self {
        Self {
            url: url.into(),
            where_key: where_key.into(),
            where_values,
            out_fields: "*".to_owned(),
            geometry_precision: 5,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Restricts the returned attribute columns.
    #[must_use]
    pub fn with_out_fields(mut self, out_fields: impl Into<String>) -> Self {
        self.out_fields = out_fields.into();
        self
    }

    /// Sets the maximum values per chunk.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// Builds a `<key> IN (v1,v2,...)` clause.
#[must_use]
pub fn where_in_clause(key: &str, values: &[String]) -> String {
    format!("{key} IN ({})", values.join(","))
}

/// Partitions `values` into consecutive chunks of at most `batch_size` and
/// builds one `IN (...)` clause per chunk. Empty input yields no clauses.
#[must_use]
pub fn chunk_clauses(key: &str, values: &[String], batch_size: usize) -> Vec<String> {
    values
        .chunks(batch_size.max(1))
        .map(|chunk| where_in_clause(key, chunk))
        .collect()
}

/// Submits one query to `{url}/query` and decodes the GeoJSON response.
///
/// # Errors
///
/// Returns [`QueryError`] on transport failure, a non-JSON body, or a body
/// lacking a `features` array.
pub async fn query_feature_server(
    client: &reqwest::Client,
    query: &FeatureServerQuery,
) -> Result<FeatureCollection<GenericProperties>, QueryError> {
    let precision = query.geometry_precision.to_string();
    let params = [
        ("f", "geojson"),
        ("outFields", query.out_fields.as_str()),
        ("geometryPrecision", precision.as_str()),
        ("where", query.where_clause.as_str()),
    ];

    let response = client
        .post(format!("{}/query", query.url))
        .form(&params)
        .send()
        .await?;
    let body = response.text().await?;
    decode_collection(&body)
}

/// Submits the batched query, one chunk at a time, and concatenates chunk
/// results in chunk order.
///
/// Chunks are issued strictly sequentially: each request starts only after
/// the previous response is fully consumed. A failure in any chunk aborts
/// the whole operation and partial results are discarded.
///
/// # Errors
///
/// Returns [`QueryError`] if any chunk query fails.
pub async fn query_feature_server_batched(
    client: &reqwest::Client,
    batched: &BatchedQuery,
) -> Result<FeatureCollection<GenericProperties>, QueryError> {
    let clauses = chunk_clauses(&batched.where_key, &batched.where_values, batched.batch_size);

    let mut collection = FeatureCollection::default();
    for (i, where_clause) in clauses.iter().enumerate() {
        log::info!(
            "Feature server batch {}/{}: {} values total",
            i + 1,
            clauses.len(),
            batched.where_values.len(),
        );

        let query = FeatureServerQuery::new(batched.url.as_str())
            .with_out_fields(batched.out_fields.as_str())
            .with_geometry_precision(batched.geometry_precision)
            .with_where_clause(where_clause.as_str());

        let result = query_feature_server(client, &query).await?;
        collection.features.extend(result.features);
    }

    Ok(collection)
}

/// Decodes a feature-server response body.
fn decode_collection(body: &str) -> Result<FeatureCollection<GenericProperties>, QueryError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if value.get("features").and_then(serde_json::Value::as_array).is_none() {
        return Err(QueryError::MissingFeatures);
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(n: usize) -> Vec<String> {
        (0..n).map(|i| i.to_string()).collect()
    }

    #[test]
    fn builds_in_clause() {
        let clause = where_in_clause("segment_id", &values(3));
        assert_eq!(clause, "segment_id IN (0,1,2)");
    }

    #[test]
    fn partitions_five_thousand_values_into_three_chunks() {
        let clauses = chunk_clauses("segment_id", &values(5000), 2000);
        assert_eq!(clauses.len(), 3);

        let sizes: Vec<usize> = clauses
            .iter()
            .map(|c| c.matches(',').count() + 1)
            .collect();
        assert_eq!(sizes, vec![2000, 2000, 1000]);
    }

    #[test]
    fn empty_values_yield_no_chunks() {
        assert!(chunk_clauses("segment_id", &[], 2000).is_empty());
    }

    #[test]
    fn chunks_preserve_value_order() {
        let clauses = chunk_clauses("id", &values(5), 2);
        assert_eq!(
            clauses,
            vec!["id IN (0,1)", "id IN (2,3)", "id IN (4)"]
        );
    }

    #[test]
    fn decodes_valid_collection() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [-75.16, 39.95] },
                    "properties": { "segment_id": "12345" }
                }
            ]
        }"#;
        let collection = decode_collection(body).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.features[0].properties["segment_id"], "12345");
    }

    #[test]
    fn rejects_body_without_features() {
        let err = decode_collection(r#"{"error": {"code": 400}}"#).unwrap_err();
        assert!(matches!(err, QueryError::MissingFeatures));
    }

    #[test]
    fn rejects_non_json_body() {
        let err = decode_collection("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, QueryError::Json(_)));
    }

    #[test]
    fn query_defaults_match_server_conventions() {
        let query = FeatureServerQuery::new("https://example.com/FeatureServer/0");
        assert_eq!(query.out_fields, "*");
        assert_eq!(query.geometry_precision, 5);
        assert_eq!(query.where_clause, "1=1");
    }
}
