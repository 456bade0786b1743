//! Null-skipping aggregates and ordering helpers.
//!
//! Every function here treats `None` as absent: it never contributes to a min, max, mean or
//! correlation, and it sorts after every present value regardless of direction. A float NaN
//! is treated the same as `None`.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

/// `None` for values that do not compare with themselves (NaN).
fn present<T: PartialOrd>(value: Option<T>) -> Option<T> {
    value.filter(|v| v.partial_cmp(v).is_some())
}

/// Compare two nullable values in `order`, placing `None` last either way.
pub fn compare_nulls_last<T: PartialOrd>(a: Option<T>, b: Option<T>, order: Order) -> Ordering {
    match (present(a), present(b)) {
        (Some(a), Some(b)) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match order {
                Order::Ascending => ord,
                Order::Descending => ord.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of row indices by a single nullable key.
pub fn sort_rows<T: PartialOrd + Copy>(rows: &mut [usize], key: &[Option<T>], order: Order) {
    rows.sort_by(|&a, &b| compare_nulls_last(key[a], key[b], order));
}

pub fn min<T: PartialOrd + Copy>(values: &[Option<T>]) -> Option<T> {
    values.iter().filter_map(|&v| present(v)).fold(None, |acc, v| match acc {
        Some(m) if m <= v => Some(m),
        _ => Some(v),
    })
}

pub fn max<T: PartialOrd + Copy>(values: &[Option<T>]) -> Option<T> {
    values.iter().filter_map(|&v| present(v)).fold(None, |acc, v| match acc {
        Some(m) if m >= v => Some(m),
        _ => Some(v),
    })
}

pub fn mean(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .filter_map(present)
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Sample standard deviation (ddof = 1).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mu = values.iter().sum::<f64>() / n;
    let ss: f64 = values.iter().map(|v| (v - mu) * (v - mu)).sum();
    Some((ss / (n - 1.0)).sqrt())
}

/// Pearson correlation over the rows where both sides are present.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let my = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        sxy += (x - mx) * (y - my);
        sxx += (x - mx) * (x - mx);
        syy += (y - my) * (y - my);
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` bin edges, ascending.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Bin `values` into `bins` equal-width buckets over `[min, max]`, last bin closed.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let values: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if values.is_empty() || bins == 0 {
        return None;
    }
    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for v in &values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some(Histogram { edges, counts })
}

pub fn linspace(lo: f64, hi: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (points - 1) as f64;
            (0..points).map(|i| lo + step * i as f64).collect()
        }
    }
}

/// Gaussian kernel density of `values` evaluated at `grid`, Scott's rule bandwidth.
pub fn gaussian_kde(values: &[f64], grid: &[f64]) -> Option<Vec<f64>> {
    let sd = std_dev(values)?;
    if sd == 0.0 {
        return None;
    }
    let n = values.len() as f64;
    let bw = sd * n.powf(-0.2);
    let norm = n * bw * (2.0 * std::f64::consts::PI).sqrt();
    Some(
        grid.iter()
            .map(|x| {
                values
                    .iter()
                    .map(|v| {
                        let z = (x - v) / bw;
                        (-0.5 * z * z).exp()
                    })
                    .sum::<f64>()
                    / norm
            })
            .collect(),
    )
}
