use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
};

use crate::{
    catalog::Catalog,
    error::{QueryError, QueryResult},
    models::{
        CrossTab, GenreStat, LibraryEntry, PLATFORMS, PlatformCount, PlatformCounts, SearchPage,
        Selection, SortKey, YearRange,
    },
};

pub const RANKED_LIMIT: usize = 3;
pub const GENRE_LIMIT: usize = 10;
pub const PAGE_SIZE: usize = 10;

fn check_range(range: YearRange) -> QueryResult<()> {
    if range.lo > range.hi {
        return Err(QueryError::InvalidSelection(format!(
            "inverted year range {}..{}",
            range.lo, range.hi
        )));
    }
    Ok(())
}

/// The common filter primitive every facet composes on: movie IDs
/// whose year lies in the inclusive range. Missing years are excluded.
fn ids_in_range(catalog: &Catalog, range: YearRange) -> BTreeSet<u32> {
    catalog.library.iter().filter(|e| range.contains(e.year)).map(|e| e.id).collect()
}

fn normalize(filter: &[String]) -> Vec<&str> {
    filter.iter().map(|f| f.trim()).filter(|f| !f.is_empty()).collect()
}

/// Missing ratings order below any present rating.
fn cmp_rating(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Distinct-movie count per platform over the fixed platform set,
/// plus the distinct count of movies on at least one platform.
pub fn platform_counts(catalog: &Catalog, range: YearRange) -> QueryResult<PlatformCounts> {
    check_range(range)?;
    let ids = ids_in_range(catalog, range);

    let mut per: Vec<BTreeSet<u32>> = vec![BTreeSet::new(); PLATFORMS.len()];
    let mut on_any = BTreeSet::new();

    for assignment in &catalog.platforms {
        if !ids.contains(&assignment.movie_id) {
            continue;
        }
        if let Some(idx) = PLATFORMS.iter().position(|p| *p == assignment.value) {
            per[idx].insert(assignment.movie_id);
            on_any.insert(assignment.movie_id);
        }
    }

    let platforms = PLATFORMS
        .iter()
        .zip(&per)
        .map(|(platform, movies)| PlatformCount {
            platform: platform.to_string(),
            count: movies.len() as u64,
        })
        .collect();

    Ok(PlatformCounts { total: on_any.len() as u64, platforms })
}

/// Highest-rated titles in range: IMDb descending, year descending as
/// tie-break, missing ratings last.
pub fn top_rated(
    catalog: &Catalog,
    range: YearRange,
    limit: usize,
) -> QueryResult<Vec<LibraryEntry>> {
    check_range(range)?;
    let mut rows: Vec<&LibraryEntry> =
        catalog.library.iter().filter(|e| range.contains(e.year)).collect();
    rows.sort_by(|a, b| {
        cmp_rating(b.imdb, a.imdb).then_with(|| b.year.cmp(&a.year))
    });
    Ok(rows.into_iter().take(limit).cloned().collect())
}

/// Most recently released titles in range: year descending, IMDb
/// descending as tie-break.
pub fn most_recent(
    catalog: &Catalog,
    range: YearRange,
    limit: usize,
) -> QueryResult<Vec<LibraryEntry>> {
    check_range(range)?;
    let mut rows: Vec<&LibraryEntry> =
        catalog.library.iter().filter(|e| range.contains(e.year)).collect();
    rows.sort_by(|a, b| {
        b.year.cmp(&a.year).then_with(|| cmp_rating(b.imdb, a.imdb))
    });
    Ok(rows.into_iter().take(limit).cloned().collect())
}

#[derive(Default)]
struct Aggregate {
    count: u64,
    sum: f64,
    rated: u64,
}

impl Aggregate {
    fn add(&mut self, rating: Option<f64>) {
        self.count += 1;
        if let Some(r) = rating {
            self.sum += r;
            self.rated += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.rated > 0).then(|| self.sum / self.rated as f64)
    }
}

/// Genre popularity within range, optionally restricted to movies on
/// at least one of the given platforms.
///
/// Sorted ascending by the chosen metric with the last `limit` groups
/// kept, matching the bar chart's bottom-to-top layout. Grouping is by
/// genre name and the metric sort is stable, so equal metrics
/// tie-break lexicographically. A genre with no rated titles has no
/// mean and ranks below every rated genre when sorting by rating.
pub fn top_genres(
    catalog: &Catalog,
    range: YearRange,
    platform_filter: &[String],
    sort_by_rating: bool,
    limit: usize,
) -> QueryResult<Vec<GenreStat>> {
    check_range(range)?;
    let mut ids = ids_in_range(catalog, range);

    let filter = normalize(platform_filter);
    if !filter.is_empty() {
        let mut on_platform = BTreeSet::new();
        for assignment in &catalog.platforms {
            if filter.contains(&assignment.value.as_str()) {
                on_platform.insert(assignment.movie_id);
            }
        }
        ids.retain(|id| on_platform.contains(id));
    }

    let mut groups: BTreeMap<&str, Aggregate> = BTreeMap::new();
    for assignment in &catalog.genres {
        if !ids.contains(&assignment.movie_id) {
            continue;
        }
        let rating = catalog.movies.get(&assignment.movie_id).and_then(|m| m.imdb);
        groups.entry(assignment.value.as_str()).or_default().add(rating);
    }

    let mut stats: Vec<GenreStat> = groups
        .into_iter()
        .map(|(genre, agg)| GenreStat {
            genre: genre.to_string(),
            mean_rating: agg.mean(),
            count: agg.count,
        })
        .collect();

    if sort_by_rating {
        stats.sort_by(|a, b| cmp_rating(a.mean_rating, b.mean_rating));
    } else {
        stats.sort_by(|a, b| a.count.cmp(&b.count));
    }

    // Ascending sort, keep the tail: the top N end up last, still in
    // ascending order.
    let cut = stats.len().saturating_sub(limit);
    Ok(stats.split_off(cut))
}

/// Count or mean rating per (genre, platform) cell. Genre rows appear
/// in grouping order (lexicographic); pairs with no movies stay
/// `None`. Genres in range with no platform assignment still get a
/// row of empty cells.
pub fn genre_platform_crosstab(
    catalog: &Catalog,
    range: YearRange,
    aggregate_by_rating: bool,
) -> QueryResult<CrossTab> {
    check_range(range)?;
    let ids = ids_in_range(catalog, range);

    let mut movie_platforms: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for assignment in &catalog.platforms {
        if !ids.contains(&assignment.movie_id) {
            continue;
        }
        if let Some(idx) = PLATFORMS.iter().position(|p| *p == assignment.value) {
            movie_platforms.entry(assignment.movie_id).or_default().push(idx);
        }
    }

    let mut grid: BTreeMap<&str, Vec<Aggregate>> = BTreeMap::new();
    for assignment in &catalog.genres {
        if !ids.contains(&assignment.movie_id) {
            continue;
        }
        let row = grid
            .entry(assignment.value.as_str())
            .or_insert_with(|| (0..PLATFORMS.len()).map(|_| Aggregate::default()).collect());
        let Some(platform_idxs) = movie_platforms.get(&assignment.movie_id) else {
            continue;
        };
        let rating = catalog.movies.get(&assignment.movie_id).and_then(|m| m.imdb);
        for &idx in platform_idxs {
            row[idx].add(rating);
        }
    }

    let mut genres = Vec::with_capacity(grid.len());
    let mut cells = Vec::with_capacity(grid.len());
    for (genre, row) in grid {
        genres.push(genre.to_string());
        cells.push(
            row.iter()
                .map(|agg| {
                    if aggregate_by_rating {
                        agg.mean()
                    } else {
                        (agg.count > 0).then(|| agg.count as f64)
                    }
                })
                .collect(),
        );
    }

    let platforms = PLATFORMS.iter().map(|p| p.to_string()).collect();
    Ok(CrossTab { genres, platforms, cells })
}

/// Genre names present within the range, lexicographically sorted.
pub fn distinct_genres(catalog: &Catalog, range: YearRange) -> QueryResult<Vec<String>> {
    check_range(range)?;
    let ids = ids_in_range(catalog, range);
    let names: BTreeSet<&str> = catalog
        .genres
        .iter()
        .filter(|a| ids.contains(&a.movie_id))
        .map(|a| a.value.as_str())
        .collect();
    Ok(names.into_iter().map(String::from).collect())
}

/// Platform names present within the range, lexicographically sorted.
pub fn distinct_platforms(catalog: &Catalog, range: YearRange) -> QueryResult<Vec<String>> {
    check_range(range)?;
    let ids = ids_in_range(catalog, range);
    let names: BTreeSet<&str> = catalog
        .platforms
        .iter()
        .filter(|a| ids.contains(&a.movie_id))
        .map(|a| a.value.as_str())
        .collect();
    Ok(names.into_iter().map(String::from).collect())
}

/// Keeps a row when any selected value is a substring of the joined
/// multi-value string; an empty filter keeps everything.
fn matches_any(joined: Option<&str>, filter: &[&str]) -> bool {
    if filter.is_empty() {
        return true;
    }
    let Some(joined) = joined else {
        return false;
    };
    filter.iter().any(|f| joined.contains(f))
}

fn cmp_by_key(a: &LibraryEntry, b: &LibraryEntry, key: SortKey) -> Ordering {
    match key {
        SortKey::Title => a.title.cmp(&b.title),
        // None orders first, where an empty string would sort.
        SortKey::Year => a.year.cmp(&b.year),
        SortKey::Imdb => match (a.imdb, b.imdb) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        },
    }
}

/// Filtered, sorted, paginated library rows. Pages are 1-indexed and
/// fixed-size; an out-of-range page yields an empty page with the
/// totals intact, never an error.
pub fn search(
    catalog: &Catalog,
    selection: &Selection,
    page_size: usize,
) -> QueryResult<SearchPage> {
    let range = selection.year_range;
    check_range(range)?;
    if selection.search_page < 1 {
        return Err(QueryError::InvalidSelection(format!(
            "page must be positive, got {}",
            selection.search_page
        )));
    }
    let page_size = page_size.max(1);

    let genre_filter = normalize(&selection.genre_filter);
    let platform_filter = normalize(&selection.platform_filter);

    let mut rows: Vec<&LibraryEntry> = catalog
        .library
        .iter()
        .filter(|e| range.contains(e.year))
        .filter(|e| matches_any(e.genres.as_deref(), &genre_filter))
        .filter(|e| matches_any(e.platforms.as_deref(), &platform_filter))
        .collect();

    rows.sort_by(|a, b| {
        let ord = cmp_by_key(a, b, selection.sort_by);
        if selection.sort_ascending { ord } else { ord.reverse() }
    });

    let total = rows.len();
    let total_pages = total.div_ceil(page_size);
    let start = (selection.search_page - 1).saturating_mul(page_size);
    let page_rows = if start < total {
        rows[start..(start + page_size).min(total)].iter().map(|e| (*e).clone()).collect()
    } else {
        Vec::new()
    };

    Ok(SearchPage {
        page: selection.search_page,
        page_size,
        total,
        total_pages,
        rows: page_rows,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::models::{Assignment, Movie};

    fn entry(
        id: u32,
        title: &str,
        year: Option<i16>,
        imdb: Option<f64>,
        genres: &str,
        platforms: &str,
    ) -> LibraryEntry {
        LibraryEntry {
            id,
            title: title.to_string(),
            year,
            directors: None,
            runtime: Some(100),
            imdb,
            genres: (!genres.is_empty()).then(|| genres.to_string()),
            platforms: (!platforms.is_empty()).then(|| platforms.to_string()),
        }
    }

    fn build_catalog(entries: Vec<LibraryEntry>) -> Catalog {
        let mut movies = BTreeMap::new();
        let mut genres = Vec::new();
        let mut platforms = Vec::new();

        for e in &entries {
            movies.insert(
                e.id,
                Movie {
                    id: e.id,
                    title: e.title.clone(),
                    year: e.year,
                    runtime: e.runtime,
                    imdb: e.imdb,
                },
            );
            if let Some(joined) = &e.genres {
                for g in joined.split(',') {
                    genres.push(Assignment { movie_id: e.id, value: g.to_string() });
                }
            }
            if let Some(joined) = &e.platforms {
                for p in joined.split(',') {
                    platforms.push(Assignment { movie_id: e.id, value: p.to_string() });
                }
            }
        }

        Catalog {
            movies,
            countries: Vec::new(),
            directors: Vec::new(),
            genres,
            languages: Vec::new(),
            platforms,
            library: entries,
        }
    }

    /// The two-movie scenario: A rated and on Netflix, B unrated and
    /// on two platforms.
    fn small_catalog() -> Catalog {
        build_catalog(vec![
            entry(1, "A", Some(2005), Some(8.0), "Drama", "Netflix"),
            entry(2, "B", Some(2012), None, "Comedy", "Hulu,Netflix"),
        ])
    }

    fn range(lo: i16, hi: i16) -> YearRange {
        YearRange::new(lo, hi)
    }

    fn selection(lo: i16, hi: i16, sort_by: SortKey, ascending: bool, page: usize) -> Selection {
        Selection {
            year_range: range(lo, hi),
            sort_by,
            sort_ascending: ascending,
            genre_filter: Vec::new(),
            platform_filter: Vec::new(),
            search_page: page,
        }
    }

    #[test]
    fn platform_counts_reports_zero_for_empty_platforms() {
        let catalog = small_catalog();
        let counts = platform_counts(&catalog, range(2000, 2020)).unwrap();

        assert_eq!(counts.total, 2);
        let by_name: BTreeMap<&str, u64> =
            counts.platforms.iter().map(|p| (p.platform.as_str(), p.count)).collect();
        assert_eq!(by_name["Netflix"], 2);
        assert_eq!(by_name["Hulu"], 1);
        assert_eq!(by_name["Prime Video"], 0);
        assert_eq!(by_name["Disney+"], 0);
    }

    #[test]
    fn platform_counts_sum_is_at_least_total() {
        let catalog = small_catalog();
        let counts = platform_counts(&catalog, range(1900, 2020)).unwrap();
        let sum: u64 = counts.platforms.iter().map(|p| p.count).sum();
        assert!(sum >= counts.total);
    }

    #[test]
    fn inverted_range_is_rejected_everywhere() {
        let catalog = small_catalog();
        let bad = range(2020, 2000);
        assert!(platform_counts(&catalog, bad).is_err());
        assert!(top_rated(&catalog, bad, 3).is_err());
        assert!(most_recent(&catalog, bad, 3).is_err());
        assert!(top_genres(&catalog, bad, &[], false, 10).is_err());
        assert!(genre_platform_crosstab(&catalog, bad, false).is_err());
        assert!(distinct_genres(&catalog, bad).is_err());
        assert!(search(&catalog, &selection(2020, 2000, SortKey::Title, true, 1), 10).is_err());
    }

    #[test]
    fn top_rated_puts_missing_ratings_last() {
        let catalog = small_catalog();
        let rows = top_rated(&catalog, range(2000, 2020), 2).unwrap();
        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["A", "B"]);
    }

    #[test]
    fn top_rated_breaks_rating_ties_by_year() {
        let catalog = build_catalog(vec![
            entry(1, "Old", Some(1995), Some(7.5), "Drama", "Netflix"),
            entry(2, "New", Some(2015), Some(7.5), "Drama", "Netflix"),
            entry(3, "Best", Some(1990), Some(9.0), "Drama", "Netflix"),
        ]);
        let rows = top_rated(&catalog, range(1900, 2020), 3).unwrap();
        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Best", "New", "Old"]);
    }

    #[test]
    fn top_rated_honours_limit_and_range() {
        let catalog = build_catalog(vec![
            entry(1, "In1", Some(2001), Some(6.0), "Drama", "Netflix"),
            entry(2, "In2", Some(2002), Some(7.0), "Drama", "Netflix"),
            entry(3, "Out", Some(1950), Some(9.9), "Drama", "Netflix"),
            entry(4, "NoYear", None, Some(9.5), "Drama", "Netflix"),
        ]);
        let rows = top_rated(&catalog, range(2000, 2010), 1).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "In2");
    }

    #[test]
    fn most_recent_sorts_by_year_then_rating() {
        let catalog = build_catalog(vec![
            entry(1, "A", Some(2010), Some(5.0), "Drama", "Netflix"),
            entry(2, "B", Some(2010), Some(8.0), "Drama", "Netflix"),
            entry(3, "C", Some(2015), Some(3.0), "Drama", "Netflix"),
        ]);
        let rows = most_recent(&catalog, range(1900, 2020), 3).unwrap();
        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["C", "B", "A"]);
    }

    /// Twelve genres with strictly increasing counts: genre g01 has 1
    /// movie, g12 has 12.
    fn genre_ladder_catalog() -> Catalog {
        let mut entries = Vec::new();
        let mut id = 0;
        for g in 1..=12 {
            for _ in 0..g {
                id += 1;
                entries.push(entry(
                    id,
                    &format!("M{id}"),
                    Some(2000),
                    Some(5.0 + g as f64 / 10.0),
                    &format!("g{g:02}"),
                    "Netflix",
                ));
            }
        }
        build_catalog(entries)
    }

    #[test]
    fn top_genres_keeps_the_tail_of_the_ascending_sort() {
        let catalog = genre_ladder_catalog();
        let stats = top_genres(&catalog, range(1900, 2020), &[], false, 10).unwrap();

        assert_eq!(stats.len(), 10);
        // The two smallest groups fall off; order stays ascending.
        assert_eq!(stats.first().unwrap().genre, "g03");
        assert_eq!(stats.last().unwrap().genre, "g12");
        assert!(stats.windows(2).all(|w| w[0].count <= w[1].count));
        assert!(stats.iter().all(|s| s.count >= 1));
    }

    #[test]
    fn top_genres_ties_break_by_genre_name() {
        let catalog = build_catalog(vec![
            entry(1, "A", Some(2000), Some(7.0), "Zebra", "Netflix"),
            entry(2, "B", Some(2000), Some(7.0), "Alpha", "Netflix"),
        ]);
        let stats = top_genres(&catalog, range(1900, 2020), &[], false, 10).unwrap();
        let names: Vec<&str> = stats.iter().map(|s| s.genre.as_str()).collect();
        assert_eq!(names, ["Alpha", "Zebra"]);
    }

    #[test]
    fn top_genres_unrated_ranks_below_rated_when_sorting_by_rating() {
        let catalog = build_catalog(vec![
            entry(1, "A", Some(2000), None, "Unrated", "Netflix"),
            entry(2, "B", Some(2000), Some(6.0), "Rated", "Netflix"),
        ]);
        let stats = top_genres(&catalog, range(1900, 2020), &[], true, 1).unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].genre, "Rated");
        assert_eq!(stats[0].mean_rating, Some(6.0));
    }

    #[test]
    fn top_genres_platform_filter_restricts_membership() {
        let catalog = build_catalog(vec![
            entry(1, "A", Some(2000), Some(7.0), "Drama", "Netflix"),
            entry(2, "B", Some(2000), Some(7.0), "Comedy", "Hulu"),
        ]);
        let filter = vec!["Hulu".to_string()];
        let stats = top_genres(&catalog, range(1900, 2020), &filter, false, 10).unwrap();
        let names: Vec<&str> = stats.iter().map(|s| s.genre.as_str()).collect();
        assert_eq!(names, ["Comedy"]);
    }

    #[test]
    fn top_genres_blank_filter_entries_mean_no_filter() {
        let catalog = small_catalog();
        let filter = vec!["  ".to_string(), String::new()];
        let stats = top_genres(&catalog, range(1900, 2020), &filter, false, 10).unwrap();
        assert_eq!(stats.len(), 2);
    }

    #[test]
    fn crosstab_cells_are_none_for_absent_pairs() {
        let catalog = small_catalog();
        let tab = genre_platform_crosstab(&catalog, range(1900, 2020), false).unwrap();

        assert_eq!(tab.genres, ["Comedy", "Drama"]);
        let netflix = tab.platforms.iter().position(|p| p == "Netflix").unwrap();
        let hulu = tab.platforms.iter().position(|p| p == "Hulu").unwrap();
        let disney = tab.platforms.iter().position(|p| p == "Disney+").unwrap();

        // Comedy row: B on Hulu and Netflix.
        assert_eq!(tab.cells[0][hulu], Some(1.0));
        assert_eq!(tab.cells[0][netflix], Some(1.0));
        assert_eq!(tab.cells[0][disney], None);
        // Drama row: A on Netflix only.
        assert_eq!(tab.cells[1][netflix], Some(1.0));
        assert_eq!(tab.cells[1][hulu], None);
    }

    #[test]
    fn crosstab_mean_rating_skips_unrated_movies() {
        let catalog = build_catalog(vec![
            entry(1, "A", Some(2000), Some(8.0), "Drama", "Netflix"),
            entry(2, "B", Some(2000), Some(6.0), "Drama", "Netflix"),
            entry(3, "C", Some(2000), None, "Comedy", "Hulu"),
        ]);
        let tab = genre_platform_crosstab(&catalog, range(1900, 2020), true).unwrap();
        let netflix = tab.platforms.iter().position(|p| p == "Netflix").unwrap();
        let hulu = tab.platforms.iter().position(|p| p == "Hulu").unwrap();

        let drama = tab.genres.iter().position(|g| g == "Drama").unwrap();
        let comedy = tab.genres.iter().position(|g| g == "Comedy").unwrap();
        assert_eq!(tab.cells[drama][netflix], Some(7.0));
        // The pair exists but carries no rating, so the cell is empty.
        assert_eq!(tab.cells[comedy][hulu], None);
    }

    #[test]
    fn crosstab_halves_cover_every_genre_once() {
        for genre_count in 1..=7u32 {
            let entries = (1..=genre_count)
                .map(|g| {
                    entry(g, &format!("M{g}"), Some(2000), None, &format!("g{g}"), "Netflix")
                })
                .collect();
            let catalog = build_catalog(entries);
            let tab = genre_platform_crosstab(&catalog, range(1900, 2020), false).unwrap();
            let (first, second) = tab.split_rows();

            assert_eq!(first.genres.len(), tab.genres.len().div_ceil(2));
            let mut joined = first.genres.clone();
            joined.extend(second.genres.clone());
            assert_eq!(joined, tab.genres);
        }
    }

    #[test]
    fn distinct_values_are_sorted_and_scoped_to_range() {
        let catalog = build_catalog(vec![
            entry(1, "A", Some(2000), None, "Western,Action", "Netflix"),
            entry(2, "B", Some(1950), None, "Noir", "Hulu"),
        ]);
        assert_eq!(distinct_genres(&catalog, range(1990, 2020)).unwrap(), ["Action", "Western"]);
        assert_eq!(distinct_platforms(&catalog, range(1990, 2020)).unwrap(), ["Netflix"]);
    }

    #[test]
    fn search_sorts_by_year_and_pages_past_the_end_are_empty() {
        let catalog = small_catalog();

        let page = search(&catalog, &selection(2000, 2020, SortKey::Year, true, 1), 10).unwrap();
        let titles: Vec<&str> = page.rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["A", "B"]);
        assert_eq!(page.total, 2);
        assert_eq!(page.total_pages, 1);

        let empty = search(&catalog, &selection(2000, 2020, SortKey::Year, true, 2), 10).unwrap();
        assert!(empty.rows.is_empty());
        assert_eq!(empty.total, 2);
    }

    #[test]
    fn search_rejects_page_zero() {
        let catalog = small_catalog();
        assert!(search(&catalog, &selection(2000, 2020, SortKey::Title, true, 0), 10).is_err());
    }

    #[test]
    fn search_pages_concatenate_to_the_full_result() {
        let entries = (1..=25)
            .map(|i| entry(i, &format!("T{i:02}"), Some(2000), None, "Drama", "Netflix"))
            .collect();
        let catalog = build_catalog(entries);

        let mut seen = Vec::new();
        for page_no in 1..=3 {
            let page =
                search(&catalog, &selection(1900, 2020, SortKey::Title, true, page_no), 10)
                    .unwrap();
            assert_eq!(page.total, 25);
            assert_eq!(page.total_pages, 3);
            seen.extend(page.rows.into_iter().map(|r| r.title));
        }

        let expected: Vec<String> = (1..=25).map(|i| format!("T{i:02}")).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn search_genre_filter_matches_substrings_of_joined_values() {
        let catalog = build_catalog(vec![
            entry(1, "A", Some(2000), None, "Drama,Romance", "Netflix"),
            entry(2, "B", Some(2000), None, "Comedy", "Netflix"),
            entry(3, "C", Some(2000), None, "", "Netflix"),
        ]);
        let mut sel = selection(1900, 2020, SortKey::Title, true, 1);
        sel.genre_filter = vec!["Romance".to_string(), "Horror".to_string()];

        let page = search(&catalog, &sel, 10).unwrap();
        let titles: Vec<&str> = page.rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["A"]);
    }

    #[test]
    fn search_platform_filter_matches_joined_values() {
        let catalog = small_catalog();
        let mut sel = selection(1900, 2020, SortKey::Title, true, 1);
        sel.platform_filter = vec!["Hulu".to_string()];

        let page = search(&catalog, &sel, 10).unwrap();
        let titles: Vec<&str> = page.rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["B"]);
    }

    #[test]
    fn search_descending_rating_puts_missing_last() {
        let catalog = small_catalog();
        let page = search(&catalog, &selection(1900, 2020, SortKey::Imdb, false, 1), 10).unwrap();
        let titles: Vec<&str> = page.rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["A", "B"]);
    }

    #[test]
    fn queries_are_idempotent() {
        let catalog = genre_ladder_catalog();
        let sel = selection(1900, 2020, SortKey::Title, false, 2);

        let a = serde_json::to_value(search(&catalog, &sel, 10).unwrap()).unwrap();
        let b = serde_json::to_value(search(&catalog, &sel, 10).unwrap()).unwrap();
        assert_eq!(a, b);

        let a = top_genres(&catalog, range(1900, 2020), &[], true, 10).unwrap();
        let b = top_genres(&catalog, range(1900, 2020), &[], true, 10).unwrap();
        assert_eq!(serde_json::to_value(a).unwrap(), serde_json::to_value(b).unwrap());
    }
}
