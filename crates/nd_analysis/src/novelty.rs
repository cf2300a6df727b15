use tracing::warn;

use crate::vectorizer::{similarity_matrix, TfIdfVectorizer};

/// Batch-relative novelty of each title: `1 - mean cosine similarity` to
/// every title in the batch, itself included.
///
/// The same title scores differently depending on the rest of the batch;
/// the score measures divergence from the current news cycle. An empty
/// batch, or one where every title is blank, scores all zeros.
pub fn score_novelty<S: AsRef<str>>(titles: &[S]) -> Vec<f64> {
    if titles.iter().all(|t| t.as_ref().trim().is_empty()) {
        if !titles.is_empty() {
            warn!("All {} titles are blank, novelty scoring skipped", titles.len());
        }
        return vec![0.0; titles.len()];
    }

    let matrix = TfIdfVectorizer::new().fit_transform(titles);
    if matrix.is_empty_vocabulary() {
        warn!("No scorable terms in {} titles, novelty scoring skipped", titles.len());
        return vec![0.0; titles.len()];
    }

    let n = titles.len() as f64;
    similarity_matrix(&matrix.rows)
        .iter()
        .map(|row| (1.0 - row.iter().sum::<f64>() / n).clamp(0.0, 1.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_batch_scores_zero() {
        assert_eq!(score_novelty(&["", "  ", ""]), vec![0.0, 0.0, 0.0]);
        assert!(score_novelty::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_identical_titles_score_low() {
        let scores = score_novelty(&["identical title", "identical title"]);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0], scores[1]);
        assert!(scores[0] < 1e-9);
    }

    #[test]
    fn test_disjoint_titles_score_high() {
        let scores = score_novelty(&["apple banana", "xyz quantum flux"]);
        assert_eq!(scores[0], scores[1]);
        // each title only matches itself: 1 - 1/n
        assert!((scores[0] - 0.5).abs() < 1e-9);

        let many = [
            "apple banana", "xyz quantum flux", "senate vote", "storm warning",
            "market rally", "vaccine trial", "election fraud", "space launch",
            "housing prices", "teacher strike",
        ];
        let scores = score_novelty(&many);
        assert!(scores.iter().all(|s| (s - 0.9).abs() < 1e-9));
    }

    #[test]
    fn test_outlier_scores_above_shared_vocabulary() {
        let titles = [
            "court rules on affirmative action",
            "court rules on affirmative action case",
            "affirmative action court ruling explained",
            "miracle diet pill shocks doctors",
        ];
        let scores = score_novelty(&titles);
        assert!(scores[3] > scores[0]);
        assert!(scores[3] > scores[1]);
        assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn test_blank_title_in_mixed_batch_is_maximally_novel() {
        let scores = score_novelty(&["court ruling", "court ruling", ""]);
        assert_eq!(scores[2], 1.0);
        assert!(scores[0] < scores[2]);
    }
}
