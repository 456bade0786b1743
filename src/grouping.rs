//! Grouped aggregates: per-key movie count and mean rating.
//!
//! Null keys never form a group. Groups come out ascending by key, so every later metric
//! sort (which is stable) breaks ties by key.

use rustc_hash::FxHashMap as HashMap;
use std::fmt::Write;
use std::hash::Hash;
use tabled::Tabled;

use crate::config::Thresholds;
use crate::data::Movies;
use crate::error::Result;
use crate::report;
use crate::stats::{Order, compare_nulls_last};

#[derive(Debug, Clone, PartialEq)]
pub struct GroupStat {
    pub key: String,
    pub avg_rating: Option<f64>,
    pub movie_count: usize,
}

#[derive(Default)]
struct Acc {
    count: usize,
    rated: usize,
    sum: f64,
}

/// Group `(key, rating)` records. `movie_count` counts records, `avg_rating` averages the
/// non-null ratings.
pub fn group_stats<K, I>(records: I) -> Vec<GroupStat>
where
    K: Ord + Hash + ToString,
    I: IntoIterator<Item = (Option<K>, Option<f64>)>,
{
    let mut acc_m: HashMap<K, Acc> = HashMap::default();
    for (key, rating) in records {
        if let Some(key) = key {
            let acc = acc_m.entry(key).or_default();
            acc.count += 1;
            if let Some(rating) = rating {
                acc.sum += rating;
                acc.rated += 1;
            }
        }
    }

    let mut groups: Vec<(K, Acc)> = acc_m.into_iter().collect();
    groups.sort_by(|a, b| a.0.cmp(&b.0));
    groups
        .into_iter()
        .map(|(key, acc)| GroupStat {
            key: key.to_string(),
            avg_rating: (acc.rated > 0).then(|| acc.sum / acc.rated as f64),
            movie_count: acc.count,
        })
        .collect()
}

/// Drop groups with fewer than `min_count` records.
pub fn min_support(groups: Vec<GroupStat>, min_count: usize) -> Vec<GroupStat> {
    groups
        .into_iter()
        .filter(|g| g.movie_count >= min_count)
        .collect()
}

pub fn sort_by_avg_rating(groups: &mut [GroupStat]) {
    groups.sort_by(|a, b| compare_nulls_last(a.avg_rating, b.avg_rating, Order::Descending));
}

pub fn sort_by_count(groups: &mut [GroupStat], order: Order) {
    groups.sort_by(|a, b| compare_nulls_last(Some(a.movie_count), Some(b.movie_count), order));
}

/// Split a `Genre` cell into its trimmed, non-empty tokens.
pub fn genre_tokens(genre: &str) -> impl Iterator<Item = &str> {
    genre.split(',').map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenreRecord<'a> {
    pub title: &'a str,
    pub imdb_rating: Option<f64>,
    pub genre: &'a str,
}

/// One record per (movie, genre token). Movies without a genre contribute nothing.
pub fn explode_genres(movies: &Movies) -> Vec<GenreRecord<'_>> {
    movies
        .genre
        .iter()
        .enumerate()
        .filter_map(|(row, genre)| Some((row, genre.as_deref()?)))
        .flat_map(|(row, genre)| {
            genre_tokens(genre).map(move |genre| GenreRecord {
                title: &movies.title[row],
                imdb_rating: movies.imdb_rating[row],
                genre,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorCredit<'a> {
    pub title: &'a str,
    pub imdb_rating: Option<f64>,
    pub actor: Option<&'a str>,
}

/// Melt the four star slots, slot-major: every Star1, then every Star2, and so on.
/// Empty slots and repeated names are kept.
pub fn unpivot_actors(movies: &Movies) -> Vec<ActorCredit<'_>> {
    movies
        .stars
        .iter()
        .flat_map(|slot| {
            slot.iter().enumerate().map(|(row, actor)| ActorCredit {
                title: &movies.title[row],
                imdb_rating: movies.imdb_rating[row],
                actor: actor.as_deref(),
            })
        })
        .collect()
}

/// Occurrence counts, most frequent first; ties keep first-appearance order.
pub fn value_counts<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Vec<(&'a str, usize)> {
    let mut index_m: HashMap<&str, usize> = HashMap::default();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values.into_iter().flatten() {
        match index_m.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index_m.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct ActorCount {
    #[tabled(rename = "Actor")]
    pub actor: String,
    #[tabled(rename = "count")]
    pub count: usize,
}

pub fn director_stats(movies: &Movies, min_movies: usize, k: usize) -> Vec<GroupStat> {
    let groups = group_stats(
        movies
            .director
            .iter()
            .map(|d| d.as_deref())
            .zip(movies.imdb_rating.iter().copied()),
    );
    let mut groups = min_support(groups, min_movies);
    sort_by_avg_rating(&mut groups);
    groups.truncate(k);
    groups
}

pub fn genre_stats(movies: &Movies, k: usize) -> Vec<GroupStat> {
    let mut groups = group_stats(
        explode_genres(movies)
            .into_iter()
            .map(|r| (Some(r.genre), r.imdb_rating)),
    );
    sort_by_avg_rating(&mut groups);
    groups.truncate(k);
    groups
}

pub fn top_actors_by_count(movies: &Movies, k: usize) -> Vec<ActorCount> {
    value_counts(unpivot_actors(movies).into_iter().map(|c| c.actor))
        .into_iter()
        .take(k)
        .map(|(actor, count)| ActorCount {
            actor: actor.to_string(),
            count,
        })
        .collect()
}

pub fn certificate_stats(movies: &Movies) -> Vec<GroupStat> {
    let mut groups = group_stats(
        movies
            .certificate
            .iter()
            .map(|c| c.as_deref())
            .zip(movies.imdb_rating.iter().copied()),
    );
    sort_by_count(&mut groups, Order::Descending);
    groups
}

pub fn actor_stats(movies: &Movies, min_movies: usize, k: usize) -> Vec<GroupStat> {
    let groups = group_stats(
        unpivot_actors(movies)
            .into_iter()
            .map(|c| (c.actor, c.imdb_rating)),
    );
    let mut groups = min_support(groups, min_movies);
    sort_by_avg_rating(&mut groups);
    groups.truncate(k);
    groups
}

/// Per-year groups: (most productive years, least productive years).
pub fn year_stats(movies: &Movies, k: usize) -> (Vec<GroupStat>, Vec<GroupStat>) {
    let groups = group_stats(
        movies
            .released_year
            .iter()
            .copied()
            .zip(movies.imdb_rating.iter().copied()),
    );
    let mut most = groups.clone();
    sort_by_count(&mut most, Order::Descending);
    most.truncate(k);
    let mut least = groups;
    sort_by_count(&mut least, Order::Ascending);
    least.truncate(k);
    (most, least)
}

pub fn report_director_stats(movies: &Movies, th: &Thresholds, out: &mut String) -> Result<()> {
    let groups = director_stats(movies, th.director_min_movies, th.top_k);
    writeln!(out, "{}", report::group_table("Director", &groups))?;
    Ok(())
}

pub fn report_genre_stats(movies: &Movies, th: &Thresholds, out: &mut String) -> Result<()> {
    let groups = genre_stats(movies, th.top_k);
    writeln!(out, "{}", report::group_table("Genre", &groups))?;
    Ok(())
}

pub fn report_actor_counts(movies: &Movies, th: &Thresholds, out: &mut String) -> Result<()> {
    let counts = top_actors_by_count(movies, th.top_k);
    writeln!(out, "{}", report::rows_table(&counts))?;
    Ok(())
}

pub fn report_certificate_stats(movies: &Movies, _: &Thresholds, out: &mut String) -> Result<()> {
    let groups = certificate_stats(movies);
    writeln!(out, "{}", report::group_table("Certificate", &groups))?;
    Ok(())
}

pub fn report_actor_stats(movies: &Movies, th: &Thresholds, out: &mut String) -> Result<()> {
    let groups = actor_stats(movies, th.actor_min_movies, th.top_k);
    writeln!(out, "{}", report::group_table("Actor", &groups))?;
    Ok(())
}

pub fn report_year_stats(movies: &Movies, th: &Thresholds, out: &mut String) -> Result<()> {
    let (most, least) = year_stats(movies, th.year_view_k);
    report::labeled(out, "Most Movies Produced", &report::group_table("Released_Year", &most))?;
    report::labeled(out, "Least Movies Produced", &report::group_table("Released_Year", &least))?;
    Ok(())
}
