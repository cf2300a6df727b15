use nd_core::{clamp_score, Article, BiasDetector, Config, KeywordCategory};

/// Counts configured keywords in an article's title and description.
///
/// Matching is a case-sensitive substring test; each hit adds the weight
/// of its category.
#[derive(Debug, Clone)]
pub struct KeywordBiasDetector {
    categories: Vec<KeywordCategory>,
}

impl KeywordBiasDetector {
    pub fn new(config: &Config) -> Self {
        Self {
            categories: config.bias_keywords.clone(),
        }
    }

    pub fn score_text(&self, text: &str) -> f64 {
        let score: f64 = self
            .categories
            .iter()
            .map(|category| {
                let hits = category
                    .keywords
                    .iter()
                    .filter(|k| text.contains(k.as_str()))
                    .count();
                hits as f64 * category.weight
            })
            .sum();
        clamp_score(score)
    }
}

impl BiasDetector for KeywordBiasDetector {
    fn detect(&self, article: &Article) -> f64 {
        self.score_text(&article.analysis_text())
    }
}
