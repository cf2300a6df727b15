use std::sync::Arc;
use std::time::Duration;

use nd_analysis::{KeywordBiasDetector, LexiconSentimentAnalyzer, ManipulationScorer};
use nd_core::{
    Article, ArticleSource, BiasDetector, Config, GroupingMode, MergeSummary, Result,
    ScoringMode, SentimentAnalyzer,
};
use nd_storage::StoreHandle;
use serde::Serialize;

use crate::logging::Logger;

/// Result of one monitoring cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CycleReport {
    pub collected: usize,
    pub added: usize,
    pub total: usize,
    pub flagged: usize,
}

impl CycleReport {
    pub fn summary(&self) -> MergeSummary {
        MergeSummary {
            added: self.added,
            total: self.total,
        }
    }
}

/// Runs acquisition, analysis, scoring, persistence and grouping as one
/// cycle. Shared behind an `Arc` by the periodic driver and the web trigger.
pub struct Monitor {
    config: Config,
    source: Arc<dyn ArticleSource>,
    sentiment: Arc<dyn SentimentAnalyzer>,
    bias: Arc<dyn BiasDetector>,
    scorer: ManipulationScorer,
    store: StoreHandle,
    logger: Logger,
}

impl Monitor {
    pub fn new(config: Config, source: Arc<dyn ArticleSource>, store: StoreHandle) -> Self {
        Self {
            sentiment: Arc::new(LexiconSentimentAnalyzer::new()),
            bias: Arc::new(KeywordBiasDetector::new(&config)),
            scorer: ManipulationScorer::new(&config),
            logger: Logger::new().with_prefix("[monitor]"),
            config,
            source,
            store,
        }
    }

    pub fn with_sentiment(mut self, sentiment: Arc<dyn SentimentAnalyzer>) -> Self {
        self.sentiment = sentiment;
        self
    }

    pub fn with_bias_detector(mut self, bias: Arc<dyn BiasDetector>) -> Self {
        self.bias = bias;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Attaches the per-article analysis (additive score).
    pub fn analyze(&self, mut article: Article) -> Article {
        let sentiment = self.sentiment.analyze(&article.analysis_text());
        let bias_score = self.bias.detect(&article);
        article.analysis = Some(self.scorer.analyze(&article, sentiment, bias_score));
        article
    }

    pub async fn run_cycle(&self, grouping: GroupingMode, scoring: ScoringMode) -> Result<CycleReport> {
        let logger = self.logger.clone().with_prefix("[cycle]");
        logger.info(&format!("Starting cycle from {}", self.source.name()));

        let articles = self.source.fetch().await?;
        let collected = articles.len();
        logger.info(&format!("Collected {} articles", collected));

        let mut analyzed: Vec<Article> = articles.into_iter().map(|a| self.analyze(a)).collect();
        self.scorer.rescore_batch(&mut analyzed, scoring);
        let flagged = analyzed
            .iter()
            .filter(|a| a.analysis.as_ref().is_some_and(|x| x.is_high_manipulation))
            .count();

        let summary = self.store.merge_and_regroup(analyzed, grouping).await?;
        logger.info(&format!(
            "Cycle done: added={}, total={}, flagged={}, grouping={}, scoring={}",
            summary.added, summary.total, flagged, grouping, scoring
        ));

        Ok(CycleReport {
            collected,
            added: summary.added,
            total: summary.total,
            flagged,
        })
    }

    /// Cycles every `interval` and backs up every `backup_interval_secs`
    /// until interrupted. Failed cycles are logged and retried on the next tick.
    pub async fn run_periodic(
        &self,
        interval: Duration,
        grouping: GroupingMode,
        scoring: ScoringMode,
    ) -> Result<()> {
        let logger = self.logger.clone().with_prefix("[periodic]");
        let mut cycle_tick = tokio::time::interval(interval);
        let mut backup_tick =
            tokio::time::interval(Duration::from_secs(self.config.backup_interval_secs.max(1)));
        // the first backup tick fires immediately; skip it
        backup_tick.tick().await;

        logger.info(&format!("Monitoring every {}s", interval.as_secs()));
        loop {
            tokio::select! {
                _ = cycle_tick.tick() => {
                    if let Err(e) = self.run_cycle(grouping, scoring).await {
                        logger.error(&format!("Cycle failed: {}", e));
                    }
                }
                _ = backup_tick.tick() => {
                    if let Err(e) = self.store.backup(&self.config.backup_dir).await {
                        logger.warn(&format!("Backup failed: {}", e));
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    logger.info("Shutting down");
                    return Ok(());
                }
            }
        }
    }
}
