pub mod bias;
pub mod cluster;
pub mod fingerprint;
pub mod novelty;
pub mod scoring;
pub mod sentiment;
pub mod timeline;
pub mod vectorizer;

pub use bias::KeywordBiasDetector;
pub use cluster::{build_timeline_by_title_similarity, cluster_titles, ClusterParams, NOISE};
pub use fingerprint::fingerprint;
pub use novelty::score_novelty;
pub use scoring::ManipulationScorer;
pub use sentiment::LexiconSentimentAnalyzer;
pub use timeline::{build_timeline, GroupingStats};

use nd_core::{Article, Config, GroupingMode};

/// Runs the grouping pass selected by `mode` over the whole collection.
pub fn regroup(articles: &mut [Article], mode: GroupingMode, config: &Config) -> GroupingStats {
    match mode {
        GroupingMode::Fingerprint => build_timeline(articles),
        GroupingMode::Title => build_timeline_by_title_similarity(articles, ClusterParams::from(config)),
    }
}

pub mod prelude {
    pub use super::{
        fingerprint, regroup, score_novelty, ClusterParams, GroupingStats, KeywordBiasDetector,
        LexiconSentimentAnalyzer, ManipulationScorer,
    };
    pub use nd_core::{Article, Error, Result};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regroup_dispatch() {
        let config = Config::default();
        let mut articles = vec![
            Article::new("http://a.com/story?x=1", "Budget vote delayed").with_published_at("2024-01-01T10:00:00Z"),
            Article::new("http://a.com/story?x=2", "Budget vote delayed again").with_published_at("2024-01-01T11:00:00Z"),
        ];

        let stats = regroup(&mut articles, GroupingMode::Fingerprint, &config);
        assert_eq!(stats.groups, 1);
        assert!(articles.iter().all(|a| a.topic_cluster.is_none()));

        let stats = regroup(&mut articles, GroupingMode::Title, &config);
        assert_eq!(stats.groups, 1);
        assert!(articles.iter().all(|a| a.topic_cluster == Some(0)));
        assert_eq!(articles[1].evolution_index, Some(1));

        regroup(&mut articles, GroupingMode::Fingerprint, &config);
        assert!(articles.iter().all(|a| a.topic_cluster.is_none()));
    }
}
