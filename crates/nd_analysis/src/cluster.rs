use std::collections::BTreeMap;

use nd_core::{Article, Config};
use tracing::{debug, info};

use crate::timeline::{assign_evolution_indices, GroupingStats};
use crate::vectorizer::{cosine_similarity, TfIdfVectorizer};

/// Label of points that are not density-reachable from any core point.
pub const NOISE: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterParams {
    /// Maximum cosine distance between neighbors.
    pub eps: f64,
    /// Neighborhood size, the point itself included, that makes a core point.
    pub min_samples: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            eps: nd_core::config::DEFAULT_CLUSTER_EPS,
            min_samples: nd_core::config::DEFAULT_CLUSTER_MIN_SAMPLES,
        }
    }
}

impl From<&Config> for ClusterParams {
    fn from(config: &Config) -> Self {
        Self {
            eps: config.cluster_eps,
            min_samples: config.cluster_min_samples,
        }
    }
}

/// Density-based clustering over a precomputed distance matrix.
///
/// Clusters are numbered from 0 in the index order of the core point that
/// seeds them. A border point reachable from several clusters joins the
/// first one that reaches it.
pub fn dbscan(distances: &[Vec<f64>], params: ClusterParams) -> Vec<i64> {
    let n = distances.len();
    let neighborhoods: Vec<Vec<usize>> = (0..n)
        .map(|i| (0..n).filter(|&j| i == j || distances[i][j] <= params.eps).collect())
        .collect();
    let is_core: Vec<bool> = neighborhoods
        .iter()
        .map(|hood| hood.len() >= params.min_samples)
        .collect();

    let mut labels = vec![NOISE; n];
    let mut next_label = 0;
    let mut stack = Vec::new();
    for seed in 0..n {
        if labels[seed] != NOISE || !is_core[seed] {
            continue;
        }
        stack.push(seed);
        while let Some(point) = stack.pop() {
            if labels[point] != NOISE {
                continue;
            }
            labels[point] = next_label;
            if is_core[point] {
                stack.extend(neighborhoods[point].iter().filter(|&&v| labels[v] == NOISE));
            }
        }
        next_label += 1;
    }
    labels
}

/// Cluster labels for a batch of titles by TF-IDF cosine distance.
pub fn cluster_titles<S: AsRef<str>>(titles: &[S], params: ClusterParams) -> Vec<i64> {
    let matrix = TfIdfVectorizer::new()
        .with_english_stop_words()
        .fit_transform(titles);
    let n = matrix.rows.len();
    let mut distances = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = (1.0 - cosine_similarity(&matrix.rows[i], &matrix.rows[j])).max(0.0);
            distances[i][j] = d;
            distances[j][i] = d;
        }
    }
    dbscan(&distances, params)
}

/// Assigns `topic_cluster` by title similarity and a cluster-local
/// `evolution_index` ordered by effective time. Recomputes the whole
/// collection; an empty collection is left untouched.
pub fn build_timeline_by_title_similarity(
    articles: &mut [Article],
    params: ClusterParams,
) -> GroupingStats {
    if articles.is_empty() {
        return GroupingStats::default();
    }

    let titles: Vec<&str> = articles.iter().map(|a| a.title.trim()).collect();
    let labels = cluster_titles(&titles, params);

    let mut clusters: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (idx, &label) in labels.iter().enumerate() {
        clusters.entry(label).or_default().push(idx);
    }

    let mut stats = GroupingStats {
        articles: articles.len(),
        groups: clusters.len(),
        largest_group: 0,
    };
    for (label, members) in clusters.iter_mut() {
        stats.largest_group = stats.largest_group.max(members.len());
        if *label == NOISE {
            debug!("{} articles left unclustered", members.len());
        }
        for &idx in members.iter() {
            articles[idx].topic_cluster = Some(*label);
        }
        assign_evolution_indices(articles, members);
    }

    info!(
        "Title clustering - articles={}, clusters={}, largest={}, eps={}, min_samples={}",
        stats.articles, stats.groups, stats.largest_group, params.eps, params.min_samples
    );
    stats
}
