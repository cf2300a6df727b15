//! TF-IDF vectorization of short texts (titles).
//!
//! - tokens are lowercase runs of alphanumeric or `_` characters, at least two long
//! - IDF is smoothed: `ln((1 + n) / (1 + df)) + 1`
//! - rows are L2-normalized, so the cosine of two rows is their dot product

use std::collections::{BTreeMap, HashMap, HashSet};

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
    "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
    "amongst", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below",
    "beside", "besides", "between", "beyond", "both", "but", "by", "can", "cannot", "could",
    "did", "do", "does", "done", "down", "due", "during", "each", "eg", "either", "else",
    "elsewhere", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "for", "former", "formerly", "from", "further", "had",
    "has", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hers",
    "herself", "him", "himself", "his", "how", "however", "ie", "if", "in", "indeed",
    "into", "is", "it", "its", "itself", "just", "last", "latter", "least", "less", "ltd",
    "many", "may", "me", "meanwhile", "might", "more", "moreover", "most", "mostly",
    "much", "must", "my", "myself", "namely", "neither", "never", "nevertheless", "next",
    "no", "nobody", "none", "noone", "nor", "not", "nothing", "now", "nowhere", "of",
    "off", "often", "on", "once", "one", "only", "onto", "or", "other", "others",
    "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per", "perhaps",
    "please", "rather", "re", "same", "seem", "seemed", "seeming", "seems", "several",
    "she", "should", "since", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "than", "that", "the", "their", "them",
    "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore",
    "therein", "thereupon", "these", "they", "this", "those", "though", "through",
    "throughout", "thru", "thus", "to", "together", "too", "toward", "towards", "under",
    "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were", "what",
    "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas", "whereby",
    "wherein", "whereupon", "wherever", "whether", "which", "while", "whither", "who",
    "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
    "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// Splits text into lowercase word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .map(|t| t.to_lowercase())
        .collect()
}

/// Sparse row of a document-term matrix, sorted by term index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|(_, w)| *w == 0.0)
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j, mut sum) = (0, 0, 0.0);
        while i < self.entries.len() && j < other.entries.len() {
            let (ti, wi) = self.entries[i];
            let (tj, wj) = other.entries[j];
            if ti == tj {
                sum += wi * wj;
                i += 1;
                j += 1;
            } else if ti < tj {
                i += 1;
            } else {
                j += 1;
            }
        }
        sum
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }
}

/// Cosine similarity; any comparison with a zero vector is 0.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0)
}

/// Full pairwise cosine similarity matrix.
pub fn similarity_matrix(rows: &[SparseVector]) -> Vec<Vec<f64>> {
    let n = rows.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in i..n {
            let sim = cosine_similarity(&rows[i], &rows[j]);
            matrix[i][j] = sim;
            matrix[j][i] = sim;
        }
    }
    matrix
}

#[derive(Debug, Clone)]
pub struct TfIdfMatrix {
    pub terms: Vec<String>,
    pub rows: Vec<SparseVector>,
}

impl TfIdfMatrix {
    pub fn is_empty_vocabulary(&self) -> bool {
        self.terms.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TfIdfVectorizer {
    stop_words: Option<HashSet<&'static str>>,
}

impl TfIdfVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop common English function words before weighting.
    pub fn with_english_stop_words(mut self) -> Self {
        self.stop_words = Some(ENGLISH_STOP_WORDS.iter().copied().collect());
        self
    }

    fn analyze(&self, text: &str) -> Vec<String> {
        let tokens = tokenize(text);
        match &self.stop_words {
            Some(stop) => tokens.into_iter().filter(|t| !stop.contains(t.as_str())).collect(),
            None => tokens,
        }
    }

    /// Learns the vocabulary of `documents` and returns one weighted row per
    /// document, in input order. Documents without known terms get a zero row.
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> TfIdfMatrix {
        let tokenized: Vec<Vec<String>> =
            documents.iter().map(|d| self.analyze(d.as_ref())).collect();

        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in &tokenized {
            let unique: HashSet<&str> = doc.iter().map(String::as_str).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let terms: Vec<String> = doc_freq.keys().map(|t| t.to_string()).collect();
        let index: HashMap<&str, usize> =
            terms.iter().enumerate().map(|(i, t)| (t.as_str(), i)).collect();
        let n_docs = tokenized.len() as f64;
        let idf: Vec<f64> = doc_freq
            .values()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let rows = tokenized
            .iter()
            .map(|doc| {
                let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
                for term in doc {
                    if let Some(&i) = index.get(term.as_str()) {
                        *counts.entry(i).or_insert(0.0) += 1.0;
                    }
                }
                let mut entries: Vec<(usize, f64)> =
                    counts.into_iter().map(|(i, tf)| (i, tf * idf[i])).collect();
                let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, w) in entries.iter_mut() {
                        *w /= norm;
                    }
                }
                SparseVector { entries }
            })
            .collect();

        TfIdfMatrix { terms, rows }
    }
}
