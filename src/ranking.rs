//! Ordered row selections: top-K by one key, filtered top-K, and two-key sorts.

use std::fmt::Write;

use crate::config::Thresholds;
use crate::data::Movies;
use crate::error::Result;
use crate::report::{self, Field};
use crate::stats::{self, Order, compare_nulls_last};

const RATED_FIELDS: [Field; 4] = [Field::Title, Field::Year, Field::Rating, Field::Director];

const VOTED_FIELDS: [Field; 5] = [
    Field::Title,
    Field::Year,
    Field::Rating,
    Field::Director,
    Field::Votes,
];

const GROSSING_FIELDS: [Field; 5] = [
    Field::Title,
    Field::Year,
    Field::Rating,
    Field::Director,
    Field::Gross,
];

const RATING_GROSS_FIELDS: [Field; 5] = [
    Field::Title,
    Field::Year,
    Field::Rating,
    Field::Gross,
    Field::Director,
];

/// Sort `rows` by `key` (nulls last) and keep at most `k` of them.
pub fn top_k<T: PartialOrd + Copy>(
    mut rows: Vec<usize>,
    key: &[Option<T>],
    order: Order,
    k: Option<usize>,
) -> Vec<usize> {
    stats::sort_rows(&mut rows, key, order);
    if let Some(k) = k {
        rows.truncate(k);
    }
    rows
}

fn all_rows(movies: &Movies) -> Vec<usize> {
    (0..movies.len()).collect()
}

pub fn top_rated(movies: &Movies, k: usize) -> Vec<usize> {
    top_k(all_rows(movies), &movies.imdb_rating, Order::Descending, Some(k))
}

pub fn most_voted(movies: &Movies, k: usize) -> Vec<usize> {
    top_k(all_rows(movies), &movies.votes, Order::Descending, Some(k))
}

pub fn top_grossing(movies: &Movies, k: usize) -> Vec<usize> {
    top_k(all_rows(movies), &movies.gross, Order::Descending, Some(k))
}

/// Highest rated among movies released strictly after `year`.
pub fn top_rated_after(movies: &Movies, year: i32, k: usize) -> Vec<usize> {
    let rows = (0..movies.len())
        .filter(|&row| movies.released_year[row].is_some_and(|y| y > year))
        .collect();
    top_k(rows, &movies.imdb_rating, Order::Descending, Some(k))
}

/// Every movie by `director`, best rated first. No row limit.
pub fn filmography(movies: &Movies, director: &str) -> Vec<usize> {
    let rows = (0..movies.len())
        .filter(|&row| movies.director[row].as_deref() == Some(director))
        .collect();
    top_k(rows, &movies.imdb_rating, Order::Descending, None)
}

/// Sort by rating then gross, each with its own direction and nulls last.
pub fn by_rating_then_gross(movies: &Movies, rating: Order, gross: Order, k: usize) -> Vec<usize> {
    let mut rows = all_rows(movies);
    rows.sort_by(|&a, &b| {
        compare_nulls_last(movies.imdb_rating[a], movies.imdb_rating[b], rating)
            .then_with(|| compare_nulls_last(movies.gross[a], movies.gross[b], gross))
    });
    rows.truncate(k);
    rows
}

fn table(out: &mut String, movies: &Movies, rows: &[usize], fields: &[Field]) -> Result<()> {
    writeln!(out, "{}", report::movie_table(movies, rows, fields))?;
    Ok(())
}

pub fn report_top_rated(movies: &Movies, th: &Thresholds, out: &mut String) -> Result<()> {
    table(out, movies, &top_rated(movies, th.top_k), &RATED_FIELDS)
}

pub fn report_most_voted(movies: &Movies, th: &Thresholds, out: &mut String) -> Result<()> {
    table(out, movies, &most_voted(movies, th.top_k), &VOTED_FIELDS)
}

pub fn report_top_rated_after(movies: &Movies, th: &Thresholds, out: &mut String) -> Result<()> {
    let rows = top_rated_after(movies, th.year_cutoff, th.top_k);
    table(out, movies, &rows, &RATED_FIELDS)
}

pub fn report_filmography(movies: &Movies, th: &Thresholds, out: &mut String) -> Result<()> {
    let rows = filmography(movies, &th.featured_director);
    table(out, movies, &rows, &RATED_FIELDS)
}

pub fn report_top_grossing(movies: &Movies, th: &Thresholds, out: &mut String) -> Result<()> {
    table(out, movies, &top_grossing(movies, th.top_k), &GROSSING_FIELDS)
}

pub fn report_high_rating_low_gross(movies: &Movies, th: &Thresholds, out: &mut String) -> Result<()> {
    let rows = by_rating_then_gross(movies, Order::Descending, Order::Ascending, th.top_k);
    table(out, movies, &rows, &RATING_GROSS_FIELDS)
}

pub fn report_low_rating_high_gross(movies: &Movies, th: &Thresholds, out: &mut String) -> Result<()> {
    let rows = by_rating_then_gross(movies, Order::Ascending, Order::Descending, th.top_k);
    table(out, movies, &rows, &RATING_GROSS_FIELDS)
}

#[cfg(test)]
mod test_ranking {
    use super::*;
    use crate::data::fixtures::{movies_from, sample};

    fn titles<'a>(movies: &'a Movies, rows: &[usize]) -> Vec<&'a str> {
        rows.iter().map(|&r| movies.title[r].as_str()).collect()
    }

    #[test]
    fn test_top_rated() -> Result<()> {
        let movies = sample()?;
        let rows = top_rated(&movies, 3);
        assert_eq!(
            titles(&movies, &rows),
            vec!["The Shawshank Redemption", "The Godfather", "The Dark Knight"]
        );
        Ok(())
    }

    #[test]
    fn test_nan_rating_ranks_last() -> Result<()> {
        let movies = movies_from(
            "Heat,1995,N/A,170 min,\"Action, Crime\",NaN,nan,Michael Mann,Al Pacino,Robert De Niro,Val Kilmer,Jon Voight,577113,\"67,436,818\"\n\
             Casino,1995,A,178 min,\"Crime, Drama\",8.2,73,Martin Scorsese,Robert De Niro,Sharon Stone,Joe Pesci,James Woods,466276,\"42,438,300\"\n\
             Ronin,1998,UA,122 min,\"Action, Crime\",7.2,67,John Frankenheimer,Robert De Niro,Jean Reno,Natascha McElhone,Stellan Skarsgard,196226,\"41,609,593\"\n",
        )?;
        assert_eq!(titles(&movies, &top_rated(&movies, 3)), vec!["Casino", "Ronin", "Heat"]);

        let certs: Vec<String> = crate::grouping::certificate_stats(&movies)
            .into_iter()
            .map(|g| g.key)
            .collect();
        assert!(!certs.iter().any(|c| c == "N/A"));
        assert_eq!(certs.len(), 2);
        Ok(())
    }

    #[test]
    fn test_top_k_returns_min_of_k_and_rows() -> Result<()> {
        let movies = sample()?;
        assert_eq!(top_rated(&movies, 10).len(), 10);
        assert_eq!(top_rated(&movies, 50).len(), movies.len());
        Ok(())
    }

    #[test]
    fn test_most_voted() -> Result<()> {
        let movies = sample()?;
        let rows = most_voted(&movies, 2);
        assert_eq!(
            titles(&movies, &rows),
            vec!["The Shawshank Redemption", "The Dark Knight"]
        );
        Ok(())
    }

    #[test]
    fn test_top_grossing_is_numeric_and_nulls_last() -> Result<()> {
        let movies = sample()?;
        let rows = top_grossing(&movies, movies.len());
        assert_eq!(movies.title[rows[0]], "The Dark Knight");
        assert_eq!(movies.title[rows[1]], "Inception");
        assert_eq!(movies.title[*rows.last().unwrap()], "Zodiac");
        Ok(())
    }

    #[test]
    fn test_top_rated_after_2000() -> Result<()> {
        let movies = sample()?;
        let rows = top_rated_after(&movies, 2000, 10);
        // Memento (2000) is not strictly after the cutoff
        assert_eq!(
            titles(&movies, &rows),
            vec!["The Dark Knight", "Inception", "Interstellar", "Zodiac"]
        );
        Ok(())
    }

    #[test]
    fn test_filmography_has_no_limit() -> Result<()> {
        let rows: String = (0..12)
            .map(|i| {
                format!(
                    "Film {i},{},UA,100 min,Drama,{}.0,,Christopher Nolan,,,,,10,\n",
                    1990 + i,
                    i % 10
                )
            })
            .collect();
        let movies = movies_from(&rows)?;
        let rows = filmography(&movies, "Christopher Nolan");
        assert_eq!(rows.len(), 12);
        assert_eq!(movies.title[rows[0]], "Film 9");
        Ok(())
    }

    #[test]
    fn test_filmography_sample() -> Result<()> {
        let movies = sample()?;
        let rows = filmography(&movies, "Christopher Nolan");
        assert_eq!(
            titles(&movies, &rows),
            vec!["The Dark Knight", "Inception", "Interstellar", "Memento"]
        );
        assert!(filmography(&movies, "Nobody").is_empty());
        Ok(())
    }

    #[test]
    fn test_rating_then_gross() -> Result<()> {
        let movies = movies_from(
            "Rich,2001,U,90 min,Drama,8.0,,A,,,,,10,\"500\"
Poor,2001,U,90 min,Drama,8.0,,A,,,,,10,\"5\"
Unknown,2001,U,90 min,Drama,8.0,,A,,,,,10,
Bad,2001,U,90 min,Drama,6.0,,A,,,,,10,\"900\"
",
        )?;
        let high_low = by_rating_then_gross(&movies, Order::Descending, Order::Ascending, 10);
        assert_eq!(titles(&movies, &high_low), vec!["Poor", "Rich", "Unknown", "Bad"]);

        let low_high = by_rating_then_gross(&movies, Order::Ascending, Order::Descending, 10);
        assert_eq!(titles(&movies, &low_high), vec!["Bad", "Rich", "Poor", "Unknown"]);
        Ok(())
    }
}
