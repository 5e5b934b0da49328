use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    AppState,
    error::QueryResult,
    models::{
        CrossTab, FilterOptions, GenreStat, LibraryEntry, PLATFORMS, PlatformCount,
        PlatformCounts, SearchPage, Selection, SortKey, YearRange,
    },
    query,
};

// Full extent of the year slider; missing bounds mean "everything".
const YEAR_MIN: i16 = 1900;
const YEAR_MAX: i16 = 2020;

fn default_lo() -> i16 {
    YEAR_MIN
}

fn default_hi() -> i16 {
    YEAR_MAX
}

fn default_page() -> usize {
    1
}

fn default_true() -> bool {
    true
}

/// Splits a comma-separated filter parameter; absent means no filter.
fn split_filter(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| s.split(',').map(|v| v.trim().to_string()).collect()).unwrap_or_default()
}

/// A malformed selection gets a neutral empty payload instead of an
/// error response; one bad slider state must not break the session.
fn recover<T>(result: QueryResult<T>, facet: &str, empty: impl FnOnce() -> T) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!(facet = facet, error = %err, "substituting empty result");
            empty()
        },
    }
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    #[serde(default = "default_lo")]
    lo: i16,
    #[serde(default = "default_hi")]
    hi: i16,
}

impl RangeQuery {
    fn range(&self) -> YearRange {
        YearRange::new(self.lo, self.hi)
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn platform_counts(
    State(state): State<Arc<AppState>>,
    Query(q): Query<RangeQuery>,
) -> Json<PlatformCounts> {
    let result = query::platform_counts(&state.catalog, q.range());
    Json(recover(result, "platform-counts", || PlatformCounts {
        total: 0,
        platforms: PLATFORMS
            .iter()
            .map(|p| PlatformCount { platform: p.to_string(), count: 0 })
            .collect(),
    }))
}

pub async fn top_rated(
    State(state): State<Arc<AppState>>,
    Query(q): Query<RangeQuery>,
) -> Json<Vec<LibraryEntry>> {
    let result = query::top_rated(&state.catalog, q.range(), query::RANKED_LIMIT);
    Json(recover(result, "top-rated", Vec::new))
}

pub async fn most_recent(
    State(state): State<Arc<AppState>>,
    Query(q): Query<RangeQuery>,
) -> Json<Vec<LibraryEntry>> {
    let result = query::most_recent(&state.catalog, q.range(), query::RANKED_LIMIT);
    Json(recover(result, "most-recent", Vec::new))
}

#[derive(Debug, Deserialize)]
pub struct TopGenresQuery {
    #[serde(default = "default_lo")]
    lo: i16,
    #[serde(default = "default_hi")]
    hi: i16,
    platforms: Option<String>,
    #[serde(default)]
    by_rating: bool,
}

pub async fn top_genres(
    State(state): State<Arc<AppState>>,
    Query(q): Query<TopGenresQuery>,
) -> Json<Vec<GenreStat>> {
    let filter = split_filter(q.platforms.as_deref());
    let result = query::top_genres(
        &state.catalog,
        YearRange::new(q.lo, q.hi),
        &filter,
        q.by_rating,
        query::GENRE_LIMIT,
    );
    Json(recover(result, "top-genres", Vec::new))
}

#[derive(Debug, Deserialize)]
pub struct CrossTabQuery {
    #[serde(default = "default_lo")]
    lo: i16,
    #[serde(default = "default_hi")]
    hi: i16,
    #[serde(default)]
    by_rating: bool,
}

/// The heatmap renders in two stacked panels, so the genre rows ship
/// pre-split down the middle.
#[derive(Debug, Serialize)]
pub struct CrossTabResponse {
    pub first: CrossTab,
    pub second: CrossTab,
}

pub async fn genre_platform(
    State(state): State<Arc<AppState>>,
    Query(q): Query<CrossTabQuery>,
) -> Json<CrossTabResponse> {
    let result = query::genre_platform_crosstab(
        &state.catalog,
        YearRange::new(q.lo, q.hi),
        q.by_rating,
    );
    let tab = recover(result, "genre-platform", || CrossTab {
        genres: Vec::new(),
        platforms: PLATFORMS.iter().map(|p| p.to_string()).collect(),
        cells: Vec::new(),
    });
    let (first, second) = tab.split_rows();
    Json(CrossTabResponse { first, second })
}

pub async fn filter_options(
    State(state): State<Arc<AppState>>,
    Query(q): Query<RangeQuery>,
) -> Json<FilterOptions> {
    let genres = recover(
        query::distinct_genres(&state.catalog, q.range()),
        "filter-options",
        Vec::new,
    );
    let platforms = recover(
        query::distinct_platforms(&state.catalog, q.range()),
        "filter-options",
        Vec::new,
    );
    Json(FilterOptions { genres, platforms })
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default = "default_lo")]
    lo: i16,
    #[serde(default = "default_hi")]
    hi: i16,
    sort_by: Option<String>,
    #[serde(default = "default_true")]
    ascending: bool,
    genres: Option<String>,
    platforms: Option<String>,
    #[serde(default = "default_page")]
    page: usize,
}

impl SearchQuery {
    fn selection(&self) -> Selection {
        // Unknown sort columns normalize to the title default.
        let sort_by = match self.sort_by.as_deref() {
            Some("Year") => SortKey::Year,
            Some("IMDb") => SortKey::Imdb,
            _ => SortKey::Title,
        };
        Selection {
            year_range: YearRange::new(self.lo, self.hi),
            sort_by,
            sort_ascending: self.ascending,
            genre_filter: split_filter(self.genres.as_deref()),
            platform_filter: split_filter(self.platforms.as_deref()),
            search_page: self.page,
        }
    }
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> Json<SearchPage> {
    let selection = q.selection();
    let result = query::search(&state.catalog, &selection, query::PAGE_SIZE);
    Json(recover(result, "search", || SearchPage {
        page: selection.search_page.max(1),
        page_size: query::PAGE_SIZE,
        total: 0,
        total_pages: 0,
        rows: Vec::new(),
    }))
}
