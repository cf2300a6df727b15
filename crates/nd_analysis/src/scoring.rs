use nd_core::{clamp_score, Analysis, Article, Config, ScoringMode, Sentiment, SCORE_MAX};
use tracing::debug;

use crate::novelty::score_novelty;

const STRONG_POLARITY: f64 = 0.7;
const STRONG_SUBJECTIVITY: f64 = 0.8;
const POLARITY_POINTS: f64 = 2.0;
const SUBJECTIVITY_POINTS: f64 = 1.5;
const CLICKBAIT_POINTS: f64 = 1.0;

/// Combines sentiment, bias and headline signals into a manipulation score.
///
/// Two strategies are exposed separately: the per-article [`additive`]
/// heuristic and the batch [`score_novelty`]. [`rescore_batch`] settles
/// which one a cycle keeps.
///
/// [`additive`]: ManipulationScorer::additive
/// [`rescore_batch`]: ManipulationScorer::rescore_batch
#[derive(Debug, Clone)]
pub struct ManipulationScorer {
    threshold: f64,
    novelty_weight: f64,
    clickbait_phrases: Vec<String>,
}

impl ManipulationScorer {
    pub fn new(config: &Config) -> Self {
        Self {
            threshold: config.manipulation_threshold,
            novelty_weight: config.novelty_weight,
            clickbait_phrases: config
                .clickbait_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Number of clickbait phrases found in the lowercased title.
    pub fn clickbait_hits(&self, title: &str) -> usize {
        let title = title.to_lowercase();
        self.clickbait_phrases
            .iter()
            .filter(|phrase| title.contains(phrase.as_str()))
            .count()
    }

    pub fn additive(&self, sentiment: &Sentiment, bias_score: f64, title: &str) -> f64 {
        let mut score = 0.0;
        if sentiment.polarity.abs() >= STRONG_POLARITY {
            score += POLARITY_POINTS;
        }
        if sentiment.subjectivity >= STRONG_SUBJECTIVITY {
            score += SUBJECTIVITY_POINTS;
        }
        score += clamp_score(bias_score);
        score += CLICKBAIT_POINTS * self.clickbait_hits(title) as f64;
        score.min(SCORE_MAX)
    }

    /// Builds the per-article analysis from the collaborator signals.
    pub fn analyze(&self, article: &Article, sentiment: Sentiment, bias_score: f64) -> Analysis {
        let score = self.additive(&sentiment, bias_score, &article.title);
        Analysis::new(sentiment, bias_score, score, self.threshold)
    }

    /// Settles the final score of every analyzed article in a cycle's batch
    /// and recomputes the high-manipulation flag against it.
    ///
    /// Novelty is computed over the titles of the whole batch. Articles
    /// without an analysis are left untouched.
    pub fn rescore_batch(&self, articles: &mut [Article], mode: ScoringMode) {
        let novelty = match mode {
            ScoringMode::Additive => None,
            ScoringMode::Novelty | ScoringMode::Blend => {
                let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
                Some(score_novelty(&titles))
            }
        };

        for (idx, article) in articles.iter_mut().enumerate() {
            let Some(analysis) = article.analysis.as_mut() else {
                continue;
            };
            let additive = analysis.manipulation_score;
            let score = match (mode, &novelty) {
                (ScoringMode::Novelty, Some(novelty)) => novelty[idx],
                (ScoringMode::Blend, Some(novelty)) => {
                    (1.0 - self.novelty_weight) * additive
                        + self.novelty_weight * novelty[idx] * SCORE_MAX
                }
                _ => additive,
            };
            analysis.set_manipulation_score(score, self.threshold);
        }
        debug!("Rescored {} articles with {} strategy", articles.len(), mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> ManipulationScorer {
        ManipulationScorer::new(&Config::default())
    }

    #[test]
    fn test_additive_components() {
        let s = scorer();
        let neutral = Sentiment::new(0.1, 0.2);
        assert_eq!(s.additive(&neutral, 0.0, "Council approves budget"), 0.0);
        assert_eq!(s.additive(&Sentiment::new(-0.7, 0.2), 0.0, "Budget"), 2.0);
        assert_eq!(s.additive(&Sentiment::new(0.0, 0.8), 0.0, "Budget"), 1.5);
        assert_eq!(s.additive(&neutral, 3.0, "Budget"), 3.0);
        assert_eq!(s.additive(&neutral, 0.0, "SHOCKING budget EXPOSED"), 2.0);
    }

    #[test]
    fn test_additive_is_bounded() {
        let s = scorer();
        let everything = Config::default().clickbait_phrases.join(" ");
        let score = s.additive(&Sentiment::new(1.0, 1.0), 10.0, &everything);
        assert_eq!(score, 10.0);
        assert!(s.additive(&Sentiment::new(-1.0, 1.0), 25.0, "") <= 10.0);
        assert!(s.additive(&Sentiment::new(0.0, 0.0), -5.0, "") >= 0.0);
    }

    #[test]
    fn test_analyze_flags_above_threshold() {
        let s = scorer();
        let article = Article::new("https://a.com/x", "Shocking secret revealed");
        let analysis = s.analyze(&article, Sentiment::new(0.9, 0.9), 2.0);
        assert_eq!(analysis.manipulation_score, 8.5);
        assert!(analysis.is_high_manipulation);
        assert_eq!(analysis.bias_score, 2.0);
    }

    fn analyzed(s: &ManipulationScorer, title: &str, bias: f64) -> Article {
        let mut article = Article::new(format!("https://a.com/{}", title.len()), title);
        article.analysis = Some(s.analyze(&article, Sentiment::default(), bias));
        article
    }

    #[test]
    fn test_rescore_novelty_replaces_additive() {
        let s = scorer();
        let mut batch = vec![
            analyzed(&s, "court ruling", 9.0),
            analyzed(&s, "court ruling", 9.0),
        ];
        assert!(batch[0].analysis.as_ref().unwrap().is_high_manipulation);

        s.rescore_batch(&mut batch, ScoringMode::Novelty);
        let analysis = batch[0].analysis.as_ref().unwrap();
        assert!(analysis.manipulation_score < 1e-9);
        assert!(!analysis.is_high_manipulation);
        assert_eq!(analysis.bias_score, 9.0);
    }

    #[test]
    fn test_rescore_additive_and_blend() {
        let s = scorer();
        let mut batch = vec![analyzed(&s, "apple banana", 8.0), analyzed(&s, "quantum flux", 0.0)];

        let mut additive = batch.clone();
        s.rescore_batch(&mut additive, ScoringMode::Additive);
        assert_eq!(additive, batch);

        s.rescore_batch(&mut batch, ScoringMode::Blend);
        // 0.5 * 8 + 0.5 * (0.5 * 10)
        let first = batch[0].analysis.as_ref().unwrap();
        assert!((first.manipulation_score - 6.5).abs() < 1e-9);
        assert!(!first.is_high_manipulation);
        let second = batch[1].analysis.as_ref().unwrap();
        assert!((second.manipulation_score - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_rescore_skips_unanalyzed() {
        let s = scorer();
        let mut batch = vec![Article::new("https://a.com/x", "plain title")];
        s.rescore_batch(&mut batch, ScoringMode::Novelty);
        assert!(batch[0].analysis.is_none());
    }
}
