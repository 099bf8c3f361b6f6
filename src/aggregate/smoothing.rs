//! Centered rolling mean of per-repository label ratios
//!
//! Repositories are ordered by a size metric, each one is reduced to its
//! per-entity distribution, and every label's ratio series is smoothed with a
//! strict centered rolling mean: positions whose window does not fit entirely
//! within the sequence have no smoothed value.

use super::classifier::{corpus_order, Classifier};
use super::distribution::per_entity_distribution_in;
use crate::common::{Repository, RepositoryId};
use core::num::NonZeroUsize;
use core::ops::Range;
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

/// One repository of the size-ordered sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmoothedPoint {
    /// Position in the size-ordered sequence
    pub position: usize,
    pub repository: RepositoryId,
    /// Raw size of the repository
    pub size: u64,
    /// Rolling mean of the size, if the window fits
    pub smoothed_size: Option<f64>,
    /// Rolling mean of every label's ratio, in [`SmoothedSeries::labels`] order, if the window fits
    pub ratios: Option<Vec<f64>>,
}

/// Smoothed stacked ratios over the size-ordered corpus
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmoothedSeries {
    labels: Vec<String>,
    window: usize,
    points: Vec<SmoothedPoint>,
}

/// One smoothed ratio, flattened for output
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct SmoothedRatio {
    #[tabled(rename = "Position")]
    pub position: usize,
    #[tabled(rename = "Size")]
    pub size: f64,
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Ratio")]
    pub ratio: f64,
}

impl SmoothedSeries {
    /// Label order shared by every point.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Every repository in ascending size order, smoothed or not.
    pub fn points(&self) -> &[SmoothedPoint] {
        &self.points
    }

    /// Points with a smoothed value.
    pub fn defined(&self) -> impl Iterator<Item = &SmoothedPoint> {
        self.points.iter().filter(|point| point.ratios.is_some())
    }

    /// One record per defined point and label, keyed by smoothed size.
    pub fn records(&self) -> Vec<SmoothedRatio> {
        let mut records = Vec::new();
        for point in &self.points {
            let (Some(size), Some(ratios)) = (point.smoothed_size, &point.ratios) else {
                continue;
            };
            records.extend(self.labels.iter().zip(ratios).map(|(label, ratio)| SmoothedRatio {
                position: point.position,
                size,
                label: label.clone(),
                ratio: *ratio,
            }));
        }
        records
    }
}

/// Window of a strict centered rolling mean of width `window` at `position`.
///
/// Windows of even width extend one further to the left of the center.
/// Returns [`None`] if the window does not fit within `len` elements.
fn centered_window(position: usize, window: usize, len: usize) -> Option<Range<usize>> {
    let end = position + (window - 1) / 2 + 1;
    let start = end.checked_sub(window)?;
    (end <= len).then_some(start..end)
}

fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    values.sum::<f64>() / count as f64
}

/// Sorts repositories by `size_metric` and smooths their label ratios.
///
/// Repositories of equal size keep their corpus order. All points share the
/// same label order, so every point has the same width; repositories without
/// sub-items contribute ratios of 0. A window wider than the corpus leaves
/// every point undefined.
pub fn smoothed_stacked_ratios<C, F>(
    repositories: &[Repository],
    size_metric: F,
    classifier: &C,
    window: NonZeroUsize,
) -> SmoothedSeries
where
    C: Classifier,
    F: Fn(&Repository) -> u64,
{
    let order = corpus_order(repositories, classifier);

    let mut sorted: Vec<(u64, &Repository)> = repositories
        .iter()
        .map(|repository| (size_metric(repository), repository))
        .collect();
    sorted.sort_by_key(|(size, _)| *size);

    let ratios: Vec<Vec<f64>> = sorted
        .iter()
        .map(|(_, repository)| {
            per_entity_distribution_in(repository, classifier, order.clone())
                .entries()
                .iter()
                .map(|entry| entry.ratio)
                .collect()
        })
        .collect();

    let window = window.get();
    let points: Vec<SmoothedPoint> = sorted
        .iter()
        .enumerate()
        .map(|(position, (size, repository))| {
            let range = centered_window(position, window, sorted.len());
            SmoothedPoint {
                position,
                repository: repository.id,
                size: *size,
                smoothed_size: range
                    .clone()
                    .map(|range| mean(sorted[range].iter().map(|(size, _)| *size as f64), window)),
                ratios: range.map(|range| {
                    (0..order.len())
                        .map(|label| mean(ratios[range.clone()].iter().map(|row| row[label]), window))
                        .collect()
                }),
            }
        })
        .collect();

    debug!(
        repositories = repositories.len(),
        window,
        defined = points.iter().filter(|point| point.ratios.is_some()).count(),
        "computed smoothed ratios"
    );

    SmoothedSeries {
        labels: order.to_order(),
        window,
        points,
    }
}
