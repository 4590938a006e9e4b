// src/stats.rs

/// Summary of a value column: count, mean, sample std, min, quartiles, max.
/// Every field but `count` is `None` when there is nothing to summarise.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Describe {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1); needs at least two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

pub fn describe(values: &[f64]) -> Describe {
    let n = values.len();
    if n == 0 {
        return Describe::default();
    }
    let sorted = sorted(values);
    let mean = values.iter().sum::<f64>() / n as f64;
    let std = (n > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    });

    Describe {
        count: n,
        mean: Some(mean),
        std,
        min: sorted.first().copied(),
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}

/// Quantile `q` of ascending `sorted`, linearly interpolated between the two
/// closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

/// Equal-width bins over `[min, max]`; `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// `(low, high, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| (w[0], w[1], c))
    }
}

/// Bin `values` into `bins` equal-width buckets. Every bin is half-open except
/// the last, which also takes `max`. A single distinct value gets the range
/// widened by 0.5 on each side.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    if values.is_empty() || bins == 0 {
        return None;
    }
    let (mut min, mut max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();
    edges[bins] = max;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let mut idx = (((v - min) / width) as usize).min(bins - 1);
        // rounding in the division can land a value on the wrong side of an edge
        while idx > 0 && v < edges[idx] {
            idx -= 1;
        }
        while idx < bins - 1 && v >= edges[idx + 1] {
            idx += 1;
        }
        counts[idx] += 1;
    }
    Some(Histogram { edges, counts })
}

/// Box-and-whisker summary with whiskers at 1.5 IQR.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value no further than 1.5 IQR below `q1`.
    pub whisker_low: f64,
    /// Largest value no further than 1.5 IQR above `q3`.
    pub whisker_high: f64,
    /// Values beyond the whiskers, ascending.
    pub fliers: Vec<f64>,
}

pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    let sorted = sorted(values);
    let q1 = quantile(&sorted, 0.25)?;
    let median = quantile(&sorted, 0.5)?;
    let q3 = quantile(&sorted, 0.75)?;
    let iqr = q3 - q1;
    let low_limit = q1 - 1.5 * iqr;
    let high_limit = q3 + 1.5 * iqr;

    let whisker_low = sorted
        .iter()
        .copied()
        .find(|&v| v >= low_limit)
        .unwrap_or(q1);
    let whisker_high = sorted
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= high_limit)
        .unwrap_or(q3);
    let fliers = sorted
        .iter()
        .copied()
        .filter(|&v| v < whisker_low || v > whisker_high)
        .collect();

    Some(BoxSummary {
        q1,
        median,
        q3,
        whisker_low,
        whisker_high,
        fliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.map_or(false, |a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn test_describe_matches_interpolated_quartiles() {
        let d = describe(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(d.count, 4);
        assert!(close(d.mean, 2.5));
        assert!(close(d.std, (5.0f64 / 3.0).sqrt()));
        assert!(close(d.min, 1.0));
        assert!(close(d.q25, 1.75));
        assert!(close(d.median, 2.5));
        assert!(close(d.q75, 3.25));
        assert!(close(d.max, 4.0));
    }

    #[test]
    fn test_describe_small_inputs() {
        assert_eq!(describe(&[]), Describe::default());
        let one = describe(&[7.0]);
        assert_eq!(one.count, 1);
        assert_eq!(one.std, None);
        assert!(close(one.median, 7.0));
    }

    #[test]
    fn test_histogram_bins_and_closed_last_edge() {
        let h = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0, 10.0], 5).unwrap();
        assert_eq!(h.edges, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(h.counts, vec![2, 2, 1, 0, 1]);
        assert_eq!(h.counts.iter().sum::<usize>(), 6);
        let bins: Vec<_> = h.bins().collect();
        assert_eq!(bins[4], (8.0, 10.0, 1));
    }

    #[test]
    fn test_histogram_value_on_interior_edge_goes_up() {
        let h = histogram(&[0.2, 0.5, 0.8], 2).unwrap();
        assert_eq!(h.counts, vec![1, 2]);
        for (lo, hi, count) in h.bins() {
            let inside = [0.2, 0.5, 0.8]
                .iter()
                .filter(|&&v| v >= lo && (v < hi || hi == h.edges[2]))
                .count();
            assert_eq!(inside, count);
        }

        // counts must agree with the printed edges for every bin
        let values: Vec<f64> = (0..=10).map(|i| i as f64 / 10.0).collect();
        let h = histogram(&values, 10).unwrap();
        let last = h.edges[10];
        for (lo, hi, count) in h.bins() {
            let inside = values
                .iter()
                .filter(|&&v| v >= lo && (v < hi || (hi == last && v == last)))
                .count();
            assert_eq!(inside, count, "bin [{}, {})", lo, hi);
        }
        assert_eq!(h.counts.iter().sum::<usize>(), 11);
    }

    #[test]
    fn test_histogram_single_value_and_empty() {
        let h = histogram(&[5.0, 5.0], 2).unwrap();
        assert_eq!(h.edges, vec![4.5, 5.0, 5.5]);
        assert_eq!(h.counts, vec![0, 2]);
        assert!(histogram(&[], 30).is_none());
        assert!(histogram(&[1.0], 0).is_none());
    }

    #[test]
    fn test_box_summary_whiskers_and_fliers() {
        let b = box_summary(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(b.q1, 2.0);
        assert_eq!(b.median, 3.0);
        assert_eq!(b.q3, 4.0);
        assert_eq!(b.whisker_low, 1.0);
        assert_eq!(b.whisker_high, 4.0);
        assert_eq!(b.fliers, vec![100.0]);
        assert!(box_summary(&[]).is_none());
    }
}
