//! Request handling shared by every measurement endpoint.
//!
//! The per-measurement handlers in [`super::measurements`] only pick the
//! service and the path; creating an entry and paging through history are
//! written once here.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Json, Query},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};

use health_log_domain::auth::logging::log_access_denied;
use health_log_domain::auth::UserInfo;
use health_log_domain::entities::{
    BloodGlucoseEntry, BloodPressureEntry, InsulinEntry, MealEntry, WaterEntry, WeightEntry,
};
use health_log_domain::services::{parse_payload, LogEntryServiceTrait, LogPayload, LogServiceError};
use health_log_domain::EntryFilter;

use crate::api::error::ApiError;

/// Page size when `limit` is not given
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Largest page a client may request
pub const MAX_PAGE_SIZE: usize = 1000;

/// Largest offset passed on to storage; SQL offsets are signed 64-bit
pub const MAX_OFFSET: usize = i64::MAX as usize;

/// Query parameters for retrieving entry history
#[derive(Debug, Deserialize, Clone, Default, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct HistoryQueryParams {
    /// ISO 8601 start date, inclusive
    pub start_date: Option<String>,

    /// ISO 8601 end date, inclusive
    pub end_date: Option<String>,

    /// Maximum number of results (default: 100, max: 1000)
    pub limit: Option<usize>,

    /// Pagination offset (default: 0)
    pub offset: Option<usize>,

    /// Sort direction (asc/desc, default: desc)
    pub sort: Option<String>,
}

impl HistoryQueryParams {
    /// Page size; `limit=0` falls back to the default
    pub fn limit(&self) -> usize {
        self.limit
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> usize {
        self.offset.unwrap_or(0).min(MAX_OFFSET)
    }

    /// Newest first unless `sort=asc`
    pub fn sort_desc(&self) -> bool {
        !matches!(self.sort.as_deref(), Some(sort) if sort.eq_ignore_ascii_case("asc"))
    }

    pub fn to_filter(&self) -> EntryFilter {
        EntryFilter {
            start: self.start_date.clone(),
            end: self.end_date.clone(),
            limit: Some(self.limit()),
            offset: Some(self.offset()),
            sort_desc: Some(self.sort_desc()),
        }
    }

    /// Query string for the same search at another offset
    fn query_string(&self, offset: usize, limit: usize) -> String {
        let mut parts = Vec::new();

        if let Some(start) = &self.start_date {
            parts.push(format!("start_date={}", urlencoding::encode(start)));
        }
        if let Some(end) = &self.end_date {
            parts.push(format!("end_date={}", urlencoding::encode(end)));
        }
        parts.push(format!("limit={}", limit));
        parts.push(format!("offset={}", offset));
        if let Some(sort) = &self.sort {
            parts.push(format!("sort={}", urlencoding::encode(sort)));
        }

        format!("?{}", parts.join("&"))
    }
}

/// Paginated response for entry history
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    GlucosePage = PaginatedResponse<BloodGlucoseEntry>,
    BloodPressurePage = PaginatedResponse<BloodPressureEntry>,
    MealPage = PaginatedResponse<MealEntry>,
    WaterPage = PaginatedResponse<WaterEntry>,
    InsulinPage = PaginatedResponse<InsulinEntry>,
    WeightPage = PaginatedResponse<WeightEntry>
)]
pub struct PaginatedResponse<T> {
    /// Total count of items matching the filter
    pub total_count: usize,

    /// Current offset
    pub offset: usize,

    /// Current limit
    pub limit: usize,

    /// URL for the next page (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,

    /// URL for the previous page (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,

    /// Entries on this page
    pub data: Vec<T>,
}

/// Links to the neighbouring pages, if there are any
pub fn pagination_links(
    total_count: usize,
    limit: usize,
    offset: usize,
    base_url: &str,
    params: &HistoryQueryParams,
) -> (Option<String>, Option<String>) {
    let next_offset = offset.saturating_add(limit);
    let next = (limit > 0 && next_offset < total_count)
        .then(|| format!("{}{}", base_url, params.query_string(next_offset, limit)));

    let previous = (offset > 0)
        .then(|| format!("{}{}", base_url, params.query_string(offset.saturating_sub(limit), limit)));

    (next, previous)
}

/// Check, validate and store one entry for the session user
pub async fn create_entry<P: LogPayload>(
    service: &dyn LogEntryServiceTrait<P>,
    user: &UserInfo,
    body: Result<Json<Value>, JsonRejection>,
    resource: &str,
) -> Result<(StatusCode, Json<P::Entry>), ApiError> {
    let Json(body) = body?;

    let payload = parse_payload::<P>(body, &user.user_id).map_err(|e| {
        if let LogServiceError::Forbidden(reason) = &e {
            log_access_denied(&user.user_id, resource, reason);
        }
        e
    })?;
    let entry = service.log(&user.user_id, payload).await?;

    info!("Created {} entry for user {}", P::KIND, user.user_id);
    Ok((StatusCode::CREATED, Json(entry)))
}

/// One page of the session user's entries
pub async fn entry_history<P: LogPayload>(
    service: &dyn LogEntryServiceTrait<P>,
    user: &UserInfo,
    params: Result<Query<HistoryQueryParams>, QueryRejection>,
    base_url: &str,
) -> Result<Json<PaginatedResponse<P::Entry>>, ApiError> {
    let Query(params) = params?;
    let limit = params.limit();
    let offset = params.offset();

    let (data, total_count) = service.history(&user.user_id, params.to_filter()).await?;
    debug!("Fetched {} of {} {} entries", data.len(), total_count, P::KIND);

    let (next, previous) = pagination_links(total_count, limit, offset, base_url, &params);

    Ok(Json(PaginatedResponse {
        total_count,
        offset,
        limit,
        next,
        previous,
        data,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;
    use health_log_domain::entities::LogWaterRequest;
    use health_log_domain::services::create_mock_log_service;
    use health_log_domain::testing::MockLogService;
    use serde_json::json;

    fn params() -> HistoryQueryParams {
        HistoryQueryParams {
            start_date: Some("2024-01-01T00:00:00Z".to_string()),
            end_date: Some("2024-02-01T00:00:00Z".to_string()),
            limit: Some(10),
            offset: Some(20),
            sort: Some("desc".to_string()),
        }
    }

    #[test]
    fn test_pagination_links() {
        let (next, prev) = pagination_links(50, 10, 20, "/api/v1/water", &params());
        let next = next.unwrap();
        let prev = prev.unwrap();

        assert!(next.starts_with("/api/v1/water?start_date=2024-01-01T00:00:00Z"));
        assert!(next.contains("offset=30"));
        assert!(prev.contains("offset=10"));

        let (next, prev) = pagination_links(50, 10, 0, "/api/v1/water", &params());
        assert!(next.is_some());
        assert!(prev.is_none());

        let (next, prev) = pagination_links(50, 10, 40, "/api/v1/water", &params());
        assert!(next.is_none());
        assert!(prev.is_some());
    }

    #[test]
    fn test_limit_is_capped() {
        let mut params = HistoryQueryParams::default();
        assert_eq!(params.limit(), DEFAULT_PAGE_SIZE);

        params.limit = Some(5000);
        assert_eq!(params.limit(), MAX_PAGE_SIZE);

        params.limit = Some(0);
        assert_eq!(params.limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_extreme_offset_is_clamped() {
        let params = HistoryQueryParams {
            offset: Some(usize::MAX),
            ..Default::default()
        };
        assert_eq!(params.offset(), MAX_OFFSET);

        let (next, prev) = pagination_links(3, usize::MAX, usize::MAX, "/api/v1/water", &params);
        assert!(next.is_none());
        assert!(prev.unwrap().contains("offset=0"));
    }

    #[test]
    fn test_links_encode_offset_timestamps() {
        let params = HistoryQueryParams {
            start_date: Some("2024-03-01T00:00:00+02:00".to_string()),
            limit: Some(1),
            ..Default::default()
        };

        let (next, _) = pagination_links(2, 1, 0, "/api/v1/water", &params);
        let next = next.unwrap();
        assert!(next.contains("start_date=2024-03-01T00%3A00%3A00%2B02%3A00"));

        let uri: Uri = next.parse().unwrap();
        let Query(parsed) = Query::<HistoryQueryParams>::try_from_uri(&uri).unwrap();
        assert_eq!(parsed.start_date.as_deref(), Some("2024-03-01T00:00:00+02:00"));
        assert_eq!(parsed.offset, Some(1));
    }

    #[test]
    fn test_sort_direction() {
        let mut params = HistoryQueryParams::default();
        assert!(params.sort_desc());

        params.sort = Some("ASC".to_string());
        assert!(!params.sort_desc());

        params.sort = Some("sideways".to_string());
        assert!(params.sort_desc());
    }

    fn water_entry(id: &str) -> WaterEntry {
        WaterEntry {
            id: id.to_string(),
            user_id: "alice".to_string(),
            ml: 250,
            timestamp: "2024-03-01T08:00:00.000Z".to_string(),
            created_at: "2024-03-01T08:00:01.000Z".to_string(),
        }
    }

    fn alice() -> UserInfo {
        UserInfo {
            user_id: "alice".to_string(),
            auth_source: "jwt".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_entry_refuses_foreign_owner() {
        let service = create_mock_log_service::<LogWaterRequest>();
        let body = json!({ "ml": 250, "timestamp": "2024-03-01T08:00:00Z", "user_id": "mallory" });

        let err = create_entry::<LogWaterRequest>(&service, &alice(), Ok(Json(body)), "/api/v1/water")
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert!(service.entries().is_empty());
    }

    #[tokio::test]
    async fn test_create_entry_reports_validation_failure() {
        let service = MockLogService::<LogWaterRequest>::new().with_validation_failure();
        let body = json!({ "ml": 250, "timestamp": "2024-03-01T08:00:00Z" });

        let err = create_entry::<LogWaterRequest>(&service, &alice(), Ok(Json(body)), "/api/v1/water")
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_entry_history_pages_and_links() {
        let service = MockLogService::<LogWaterRequest>::new()
            .with_entries(vec![water_entry("a"), water_entry("b"), water_entry("c")]);
        let params = HistoryQueryParams {
            limit: Some(2),
            offset: Some(1),
            ..Default::default()
        };

        let Json(page) = entry_history::<LogWaterRequest>(&service, &alice(), Ok(Query(params)), "/api/v1/water")
            .await
            .unwrap();

        assert_eq!(page.total_count, 3);
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].id, "b");
        assert!(page.next.is_none());
        assert!(page.previous.unwrap().contains("offset=0"));
    }

    #[test]
    fn test_to_filter() {
        let filter = params().to_filter();
        assert_eq!(filter.start.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(filter.limit, Some(10));
        assert_eq!(filter.offset, Some(20));
        assert_eq!(filter.sort_desc, Some(true));
    }
}
