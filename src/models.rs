use serde::{Deserialize, Serialize};

/// Platforms reported by the counts facet, in display order. Counts
/// for these are always present, zero when nothing matches.
pub const PLATFORMS: [&str; 4] = ["Netflix", "Hulu", "Prime Video", "Disney+"];

/// One movie fact row, keyed by ID in the catalog.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Movie {
    #[serde(rename = "ID")]
    pub id: u32,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: Option<i16>,
    #[serde(rename = "Runtime")]
    pub runtime: Option<i32>,
    #[serde(rename = "IMDb")]
    pub imdb: Option<f64>,
}

/// A row of the denormalized library view. `directors`, `genres` and
/// `platforms` are comma-joined multi-values, kept as loaded because
/// the search facet matches substrings against the joined strings.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LibraryEntry {
    #[serde(rename = "ID")]
    pub id: u32,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: Option<i16>,
    #[serde(rename = "Directors")]
    pub directors: Option<String>,
    #[serde(rename = "Runtime")]
    pub runtime: Option<i32>,
    #[serde(rename = "IMDb")]
    pub imdb: Option<f64>,
    #[serde(rename = "Genres")]
    pub genres: Option<String>,
    #[serde(rename = "Platform")]
    pub platforms: Option<String>,
}

/// One (movie, value) pair of a many-to-many relation. A movie absent
/// from a relation simply has no value for that attribute.
#[derive(Clone, Debug)]
pub struct Assignment {
    pub movie_id: u32,
    pub value: String,
}

/// Inclusive year bounds from the range slider.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct YearRange {
    pub lo: i16,
    pub hi: i16,
}

impl YearRange {
    pub fn new(lo: i16, hi: i16) -> Self {
        Self { lo, hi }
    }

    /// Missing years never match a range.
    pub fn contains(&self, year: Option<i16>) -> bool {
        year.map(|y| self.lo <= y && y <= self.hi).unwrap_or(false)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub enum SortKey {
    #[default]
    Title,
    Year,
    #[serde(rename = "IMDb", alias = "Imdb")]
    Imdb,
}

/// The current values of all UI filter and sort controls, treated as
/// the query input. Empty filter sets mean "no filter".
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Selection {
    pub year_range: YearRange,
    pub sort_by: SortKey,
    pub sort_ascending: bool,
    pub genre_filter: Vec<String>,
    pub platform_filter: Vec<String>,
    pub search_page: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlatformCount {
    pub platform: String,
    pub count: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlatformCounts {
    /// Distinct movies in range appearing on at least one platform.
    pub total: u64,
    pub platforms: Vec<PlatformCount>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GenreStat {
    pub genre: String,
    pub count: u64,
    pub mean_rating: Option<f64>,
}

/// Two-dimensional aggregation keyed by genre and platform. Cells for
/// pairs with no movies are `None`, which renders empty, not zero.
#[derive(Clone, Debug, Serialize)]
pub struct CrossTab {
    pub genres: Vec<String>,
    pub platforms: Vec<String>,
    /// Indexed `cells[genre][platform]`; counts or mean ratings.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl CrossTab {
    /// Splits the genre rows into the two panels of the heatmap
    /// display: first `ceil(n/2)` rows, then the remainder. Purely a
    /// layout split; together the halves carry every genre once.
    pub fn split_rows(&self) -> (CrossTab, CrossTab) {
        let mid = self.genres.len().div_ceil(2);
        let first = CrossTab {
            genres: self.genres[..mid].to_vec(),
            platforms: self.platforms.clone(),
            cells: self.cells[..mid].to_vec(),
        };
        let second = CrossTab {
            genres: self.genres[mid..].to_vec(),
            platforms: self.platforms.clone(),
            cells: self.cells[mid..].to_vec(),
        };
        (first, second)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchPage {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
    pub rows: Vec<LibraryEntry>,
}

#[derive(Clone, Debug, Serialize)]
pub struct FilterOptions {
    pub genres: Vec<String>,
    pub platforms: Vec<String>,
}
