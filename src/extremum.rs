use std::fmt::Write;

use crate::config::Thresholds;
use crate::data::Movies;
use crate::error::Result;
use crate::report::{self, Field};
use crate::stats;

/// Rows whose value equals the column minimum, in source order. Every tie is kept.
pub fn rows_at_min<T: PartialOrd + Copy>(values: &[Option<T>]) -> Vec<usize> {
    rows_equal(values, stats::min(values))
}

/// Rows whose value equals the column maximum, in source order. Every tie is kept.
pub fn rows_at_max<T: PartialOrd + Copy>(values: &[Option<T>]) -> Vec<usize> {
    rows_equal(values, stats::max(values))
}

fn rows_equal<T: PartialOrd + Copy>(values: &[Option<T>], target: Option<T>) -> Vec<usize> {
    let Some(target) = target else {
        return Vec::new();
    };
    values
        .iter()
        .enumerate()
        .filter_map(|(row, v)| (*v == Some(target)).then_some(row))
        .collect()
}

const YEAR_FIELDS: [Field; 3] = [Field::Title, Field::Year, Field::Rating];

const RUNTIME_FIELDS: [Field; 5] = [
    Field::Title,
    Field::Runtime,
    Field::Rating,
    Field::Year,
    Field::Director,
];

pub fn report_oldest_newest(movies: &Movies, _: &Thresholds, out: &mut String) -> Result<()> {
    let oldest = rows_at_min(&movies.released_year);
    let newest = rows_at_max(&movies.released_year);
    report::labeled(out, "Oldest Movie", &report::movie_table(movies, &oldest, &YEAR_FIELDS))?;
    writeln!(out)?;
    report::labeled(out, "Newest Movie", &report::movie_table(movies, &newest, &YEAR_FIELDS))?;
    Ok(())
}

pub fn report_shortest_longest(movies: &Movies, _: &Thresholds, out: &mut String) -> Result<()> {
    let shortest = rows_at_min(&movies.runtime);
    let longest = rows_at_max(&movies.runtime);
    writeln!(out)?;
    report::labeled(
        out,
        "Shortest Movie",
        &report::movie_table(movies, &shortest, &RUNTIME_FIELDS),
    )?;
    writeln!(out)?;
    report::labeled(
        out,
        "Longest Movie",
        &report::movie_table(movies, &longest, &RUNTIME_FIELDS),
    )?;
    Ok(())
}

#[cfg(test)]
mod test_extremum {
    use super::*;
    use crate::data::fixtures::{movies_from, sample};

    #[test]
    fn test_oldest_and_newest() -> Result<()> {
        let movies = sample()?;
        let oldest = rows_at_min(&movies.released_year);
        let newest = rows_at_max(&movies.released_year);
        assert_eq!(oldest.len(), 1);
        assert_eq!(movies.title[oldest[0]], "The Kid");
        assert_eq!(movies.title[newest[0]], "Interstellar");
        Ok(())
    }

    #[test]
    fn test_runtime_extremes_ignore_nulls() -> Result<()> {
        let movies = sample()?;
        let shortest = rows_at_min(&movies.runtime);
        let longest = rows_at_max(&movies.runtime);
        assert_eq!(movies.title[shortest[0]], "Sherlock Jr.");
        assert_eq!(movies.title[longest[0]], "The Godfather");
        Ok(())
    }

    #[test]
    fn test_ties_are_all_returned() -> Result<()> {
        let movies = movies_from(
            "First,1950,U,100 min,Drama,7.0,,A,,,,,10,
Second,1960,U,100 min,Drama,7.5,,B,,,,,10,
Third,1950,U,90 min,Drama,8.0,,C,,,,,10,
Fourth,bad,U,100 min,Drama,8.5,,D,,,,,10,
",
        )?;
        assert_eq!(rows_at_min(&movies.released_year), vec![0, 2]);
        assert_eq!(rows_at_max(&movies.released_year), vec![1]);
        assert_eq!(rows_at_max(&movies.runtime), vec![0, 1, 3]);
        Ok(())
    }

    #[test]
    fn test_all_null_column_is_empty() {
        let values: [Option<i32>; 2] = [None, None];
        assert!(rows_at_min(&values).is_empty());
        assert!(rows_at_max(&values).is_empty());
    }

    #[test]
    fn test_report_sections() -> Result<()> {
        let movies = sample()?;
        let th = Thresholds::default();
        let mut out = String::new();
        report_oldest_newest(&movies, &th, &mut out)?;
        assert!(out.starts_with("Oldest Movie:\n"));
        assert!(out.contains("Newest Movie:\n"));
        assert!(out.contains("The Kid"));
        assert!(out.contains("Interstellar"));
        Ok(())
    }
}
