use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nd_core::{Article, Error, GroupingMode, MergeSummary};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;

/// Any failure surfaces as a 500 with an `{"error": ...}` body.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ParseParams {
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub articles: usize,
}

pub async fn list_stories(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Article>>, ApiError> {
    let articles = state.monitor.store().snapshot().await?;
    Ok(Json(articles))
}

pub async fn trigger_parse(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ParseParams>,
) -> Result<Json<MergeSummary>, ApiError> {
    let grouping = GroupingMode::from_query(params.mode.as_deref());
    let scoring = state.monitor.config().scoring_mode;
    info!("Parse requested, grouping by {}", grouping);
    let report = state.monitor.run_cycle(grouping, scoring).await?;
    Ok(Json(report.summary()))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<Health>, ApiError> {
    let articles = state.monitor.store().snapshot().await?.len();
    Ok(Json(Health { status: "ok", articles }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nd_core::{ArticleSource, Config, Result};
    use nd_monitor::{Monitor, StaticSource};
    use nd_storage::spawn_store;

    struct BrokenSource;

    #[async_trait]
    impl ArticleSource for BrokenSource {
        fn name(&self) -> &str {
            "broken"
        }

        async fn fetch(&self) -> Result<Vec<Article>> {
            Err(Error::Source("feed unavailable".to_string()))
        }
    }

    fn state_with(source: Arc<dyn ArticleSource>, location: &str) -> Arc<AppState> {
        let config = Config::default();
        let store = spawn_store(location, config.clone()).unwrap();
        Arc::new(AppState::new(Monitor::new(config, source, store)))
    }

    fn batch() -> Vec<Article> {
        vec![
            Article::new("https://a.com/markets", "Markets rally on rate cut hopes"),
            Article::new("https://b.com/markets", "Markets rally on rate cut hopes"),
            Article::new("https://c.com/storm", "Storm warning issued for coast"),
        ]
    }

    #[tokio::test]
    async fn test_parse_then_list() {
        let state = state_with(Arc::new(StaticSource::new(batch())), "memory");

        let Json(summary) = trigger_parse(
            State(state.clone()),
            Query(ParseParams { mode: Some("title".to_string()) }),
        )
        .await
        .unwrap();
        assert_eq!(summary, MergeSummary { added: 3, total: 3 });

        let Json(stories) = list_stories(State(state.clone())).await.unwrap();
        assert_eq!(stories.len(), 3);
        assert_eq!(stories[0].topic_cluster, stories[1].topic_cluster);
        assert_ne!(stories[0].topic_cluster, stories[2].topic_cluster);

        let Json(status) = health(State(state)).await.unwrap();
        assert_eq!(status.articles, 3);
    }

    #[tokio::test]
    async fn test_unknown_mode_groups_by_fingerprint() {
        let state = state_with(Arc::new(StaticSource::new(batch())), "memory");
        trigger_parse(State(state.clone()), Query(ParseParams { mode: Some("bogus".to_string()) }))
            .await
            .unwrap();
        let Json(stories) = list_stories(State(state)).await.unwrap();
        assert!(stories.iter().all(|a| a.topic_cluster.is_none()));
        assert!(stories.iter().all(|a| a.evolution_index == Some(0)));
    }

    #[tokio::test]
    async fn test_missing_file_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");
        let state = state_with(Arc::new(StaticSource::default()), path.to_str().unwrap());
        std::fs::remove_file(&path).unwrap();

        let Json(stories) = list_stories(State(state)).await.unwrap();
        assert!(stories.is_empty());
    }

    #[tokio::test]
    async fn test_failed_cycle_is_500() {
        let state = state_with(Arc::new(BrokenSource), "memory");
        let err = trigger_parse(State(state), Query(ParseParams::default()))
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
