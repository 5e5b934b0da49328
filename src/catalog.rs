use std::{collections::BTreeMap, fs::File, path::Path};

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::{
    error::CatalogError,
    models::{Assignment, LibraryEntry, Movie},
};

const MOVIES_FILE: &str = "Movies.csv";
const COUNTRY_FILE: &str = "Country.csv";
const DIRECTORS_FILE: &str = "Directors.csv";
const GENRES_FILE: &str = "Genres.csv";
const LANGUAGE_FILE: &str = "Language.csv";
const PLATFORM_FILE: &str = "Platform.csv";
const LIBRARY_FILE: &str = "MoviesLibrary.csv";

/// The full in-memory set of loaded tables and relations. Built once
/// at start-up and never mutated; every query is a pure read.
#[derive(Debug)]
pub struct Catalog {
    pub movies: BTreeMap<u32, Movie>,
    pub countries: Vec<Assignment>,
    pub directors: Vec<Assignment>,
    pub genres: Vec<Assignment>,
    pub languages: Vec<Assignment>,
    pub platforms: Vec<Assignment>,
    /// Denormalized view rows, kept in file order.
    pub library: Vec<LibraryEntry>,
}

impl Catalog {
    pub fn load(dir: &Path) -> Result<Self, CatalogError> {
        let movie_rows: Vec<Movie> = read_table(
            dir,
            MOVIES_FILE,
            &["ID", "Title", "Year", "Runtime", "IMDb"],
        )?;
        let mut movies = BTreeMap::new();
        for movie in movie_rows {
            movies.insert(movie.id, movie);
        }
        debug!(rows = movies.len(), table = MOVIES_FILE, "loaded table");

        let countries = read_relation(dir, COUNTRY_FILE, "Country")?;
        let directors = read_relation(dir, DIRECTORS_FILE, "Directors")?;
        let genres = read_relation(dir, GENRES_FILE, "Genres")?;
        let languages = read_relation(dir, LANGUAGE_FILE, "Language")?;
        let platforms = read_relation(dir, PLATFORM_FILE, "Platform")?;

        let library: Vec<LibraryEntry> = read_table(
            dir,
            LIBRARY_FILE,
            &["ID", "Title", "Year", "Directors", "Runtime", "IMDb", "Genres", "Platform"],
        )?;
        debug!(rows = library.len(), table = LIBRARY_FILE, "loaded table");

        info!(
            movies = movies.len(),
            genre_assignments = genres.len(),
            platform_assignments = platforms.len(),
            library_rows = library.len(),
            "catalog loaded"
        );

        Ok(Self { movies, countries, directors, genres, languages, platforms, library })
    }
}

fn open_reader(dir: &Path, file: &str) -> Result<csv::Reader<File>, CatalogError> {
    let path = dir.join(file);
    let reader = File::open(&path).map_err(|err| CatalogError::DataSource {
        path: path.display().to_string(),
        source: anyhow::Error::new(err),
    })?;
    Ok(csv::Reader::from_reader(reader))
}

fn check_columns(
    reader: &mut csv::Reader<File>,
    dir: &Path,
    file: &str,
    required: &[&str],
) -> Result<csv::StringRecord, CatalogError> {
    let path = dir.join(file);
    let headers = reader
        .headers()
        .map_err(|err| CatalogError::DataSource {
            path: path.display().to_string(),
            source: anyhow::Error::new(err),
        })?
        .clone();

    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(CatalogError::Schema {
                table: file.to_string(),
                column: column.to_string(),
            });
        }
    }

    Ok(headers)
}

/// Reads a table whose rows map onto a serde struct. Headers are
/// checked before any row is parsed so a missing column surfaces as a
/// `Schema` error, not a row-level parse failure.
fn read_table<T: DeserializeOwned>(
    dir: &Path,
    file: &str,
    required: &[&str],
) -> Result<Vec<T>, CatalogError> {
    let mut reader = open_reader(dir, file)?;
    check_columns(&mut reader, dir, file, required)?;

    let path = dir.join(file);
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: T = record.map_err(|err| CatalogError::DataSource {
            path: path.display().to_string(),
            source: anyhow::Error::new(err),
        })?;
        rows.push(row);
    }
    Ok(rows)
}

/// Reads one of the many-to-many relation tables (`ID` plus a single
/// value column named after the attribute).
fn read_relation(dir: &Path, file: &str, column: &str) -> Result<Vec<Assignment>, CatalogError> {
    let mut reader = open_reader(dir, file)?;
    let headers = check_columns(&mut reader, dir, file, &["ID", column])?;

    let path = dir.join(file);
    let id_idx = headers.iter().position(|h| h == "ID").unwrap_or(0);
    let value_idx = headers.iter().position(|h| h == column).unwrap_or(1);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| CatalogError::DataSource {
            path: path.display().to_string(),
            source: anyhow::Error::new(err),
        })?;

        let raw_id = record.get(id_idx).unwrap_or("");
        let movie_id: u32 = raw_id.parse().map_err(|err| CatalogError::DataSource {
            path: path.display().to_string(),
            source: anyhow::anyhow!("malformed ID {raw_id:?}: {err}"),
        })?;

        // A blank value means the movie has no entry for this
        // attribute; skip rather than store an empty name.
        let value = record.get(value_idx).unwrap_or("").trim();
        if value.is_empty() {
            continue;
        }

        rows.push(Assignment { movie_id, value: value.to_string() });
    }

    debug!(rows = rows.len(), table = file, "loaded table");
    Ok(rows)
}
