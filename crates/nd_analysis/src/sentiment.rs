use std::collections::HashMap;

use nd_core::{Sentiment, SentimentAnalyzer};

use crate::vectorizer::tokenize;

// (word, polarity, subjectivity)
const LEXICON: &[(&str, f64, f64)] = &[
    ("amazing", 0.6, 0.9),
    ("awful", -1.0, 1.0),
    ("bad", -0.7, 0.67),
    ("best", 1.0, 0.3),
    ("brilliant", 0.9, 1.0),
    ("catastrophic", -0.9, 0.9),
    ("chaos", -0.6, 0.7),
    ("corrupt", -0.8, 0.8),
    ("crisis", -0.5, 0.6),
    ("dangerous", -0.6, 0.9),
    ("devastating", -0.9, 0.9),
    ("disaster", -0.8, 0.8),
    ("disgraceful", -0.9, 1.0),
    ("excellent", 1.0, 1.0),
    ("fair", 0.7, 0.9),
    ("fantastic", 0.4, 0.9),
    ("fraud", -0.7, 0.7),
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("happy", 0.8, 1.0),
    ("historic", 0.3, 0.5),
    ("horrible", -1.0, 1.0),
    ("important", 0.4, 1.0),
    ("incredible", 0.9, 0.9),
    ("outrageous", -0.8, 0.9),
    ("perfect", 1.0, 1.0),
    ("poor", -0.4, 0.6),
    ("sad", -0.5, 1.0),
    ("scandal", -0.6, 0.7),
    ("shocking", -1.0, 1.0),
    ("strong", 0.43, 0.73),
    ("stunning", 0.5, 1.0),
    ("success", 0.7, 0.6),
    ("terrible", -1.0, 1.0),
    ("tragic", -0.75, 0.8),
    ("unfair", -0.5, 0.9),
    ("unbelievable", -0.5, 0.9),
    ("victory", 0.6, 0.5),
    ("weak", -0.375, 0.625),
    ("win", 0.8, 0.4),
    ("wonderful", 1.0, 1.0),
    ("worst", -1.0, 1.0),
    ("wrong", -0.5, 0.9),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("extremely", 1.5),
    ("really", 1.2),
    ("totally", 1.3),
    ("slightly", 0.6),
    ("somewhat", 0.7),
];

const NEGATIONS: &[&str] = &["not", "no", "never", "nor", "isn", "aren", "wasn", "don", "doesn"];

/// Lexicon-based sentiment: averages the polarity and subjectivity of the
/// scored words in the text.
#[derive(Debug, Clone)]
pub struct LexiconSentimentAnalyzer {
    lexicon: HashMap<&'static str, (f64, f64)>,
    intensifiers: HashMap<&'static str, f64>,
    negation_window: usize,
}

impl LexiconSentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().map(|&(w, p, s)| (w, (p, s))).collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            negation_window: 3,
        }
    }

    pub fn with_negation_window(mut self, window: usize) -> Self {
        self.negation_window = window;
        self
    }
}

impl Default for LexiconSentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer for LexiconSentimentAnalyzer {
    fn analyze(&self, text: &str) -> Sentiment {
        let mut polarity = 0.0;
        let mut subjectivity = 0.0;
        let mut matched = 0usize;
        let mut modifier = 1.0;
        let mut since_negation: Option<usize> = None;

        for token in tokenize(text) {
            if NEGATIONS.contains(&token.as_str()) {
                since_negation = Some(0);
                continue;
            }
            if let Some(&m) = self.intensifiers.get(token.as_str()) {
                modifier = m;
                continue;
            }
            if let Some(&(p, s)) = self.lexicon.get(token.as_str()) {
                let mut p = (p * modifier).clamp(-1.0, 1.0);
                if since_negation.is_some_and(|n| n < self.negation_window) {
                    p *= -0.5;
                }
                polarity += p;
                subjectivity += (s * modifier).clamp(0.0, 1.0);
                matched += 1;
                modifier = 1.0;
            }
            since_negation = match since_negation {
                Some(n) if n + 1 < self.negation_window => Some(n + 1),
                _ => None,
            };
        }

        if matched == 0 {
            return Sentiment::default();
        }
        Sentiment::new(polarity / matched as f64, subjectivity / matched as f64)
    }
}
