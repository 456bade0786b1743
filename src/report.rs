//! Text rendering of report sections using the [`tabled`] crate.

use std::fmt::{self, Write};
use tabled::builder::Builder;
use tabled::{Table, Tabled};

use crate::data::Movies;
use crate::grouping::GroupStat;

pub const NULL_CELL: &str = "-";
pub const NO_ROWS: &str = "(no rows)";

/// A movie column that can appear in a projected report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Year,
    Runtime,
    Rating,
    Director,
    Votes,
    Gross,
}

impl Field {
    pub fn header(self) -> &'static str {
        match self {
            Field::Title => "Series_Title",
            Field::Year => "Released_Year",
            Field::Runtime => "Runtime",
            Field::Rating => "IMDB_Rating",
            Field::Director => "Director",
            Field::Votes => "No_of_Votes",
            Field::Gross => "Gross",
        }
    }

    pub fn cell(self, movies: &Movies, row: usize) -> String {
        match self {
            Field::Title => movies.title[row].clone(),
            Field::Year => or_null(movies.released_year[row].map(|v| v.to_string())),
            Field::Runtime => or_null(movies.runtime[row].map(|v| v.to_string())),
            Field::Rating => or_null(movies.imdb_rating[row].map(|v| format!("{v:.1}"))),
            Field::Director => or_null(movies.director[row].clone()),
            Field::Votes => or_null(movies.votes[row].map(|v| v.to_string())),
            Field::Gross => or_null(movies.gross[row].map(thousands)),
        }
    }
}

fn or_null(cell: Option<String>) -> String {
    cell.unwrap_or_else(|| NULL_CELL.to_string())
}

/// Format a non-negative amount as a whole number with `,` separators.
pub fn thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0.0 && digits != "0" {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn section(out: &mut impl Write, title: &str) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "----- {title} -----")
}

pub fn labeled(out: &mut impl Write, label: &str, table: &str) -> fmt::Result {
    writeln!(out, "{label}:")?;
    writeln!(out, "{table}")
}

/// Project `rows` of `movies` onto `fields`, in the given row order.
pub fn movie_table(movies: &Movies, rows: &[usize], fields: &[Field]) -> String {
    if rows.is_empty() {
        return NO_ROWS.to_string();
    }
    let mut builder = Builder::default();
    builder.push_record(fields.iter().map(|f| f.header().to_string()));
    for &row in rows {
        builder.push_record(fields.iter().map(|f| f.cell(movies, row)));
    }
    builder.build().to_string()
}

pub fn group_table(key_header: &str, groups: &[GroupStat]) -> String {
    if groups.is_empty() {
        return NO_ROWS.to_string();
    }
    let mut builder = Builder::default();
    builder.push_record([key_header, "avg_rating", "movie_count"].map(String::from));
    for group in groups {
        builder.push_record([
            group.key.clone(),
            or_null(group.avg_rating.map(|v| format!("{v:.2}"))),
            group.movie_count.to_string(),
        ]);
    }
    builder.build().to_string()
}

pub fn rows_table<T: Tabled>(rows: &[T]) -> String {
    if rows.is_empty() {
        return NO_ROWS.to_string();
    }
    Table::new(rows).to_string()
}
