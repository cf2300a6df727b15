use std::collections::HashMap;

use nd_core::Article;
use tracing::debug;

use crate::fingerprint::fingerprint;

/// Outcome of a grouping pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupingStats {
    pub articles: usize,
    pub groups: usize,
    pub largest_group: usize,
}

/// Orders `members` by effective time and numbers them from zero.
///
/// The sort is stable, so equal times keep their position in `articles`.
pub(crate) fn assign_evolution_indices(articles: &mut [Article], members: &mut [usize]) {
    members.sort_by_cached_key(|&i| articles[i].effective_time());
    for (order, &idx) in members.iter().enumerate() {
        articles[idx].evolution_index = Some(order);
    }
}

/// Groups articles sharing a URL fingerprint and assigns `evolution_index`
/// within each group. Recomputes the whole collection and clears any
/// `topic_cluster` left by a title-similarity pass.
pub fn build_timeline(articles: &mut [Article]) -> GroupingStats {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, article) in articles.iter_mut().enumerate() {
        article.topic_cluster = None;
        let fp = fingerprint(&article.url);
        buckets
            .entry(fp.clone())
            .or_insert_with(|| {
                order.push(fp);
                Vec::new()
            })
            .push(idx);
    }

    let mut stats = GroupingStats {
        articles: articles.len(),
        groups: buckets.len(),
        largest_group: 0,
    };
    for fp in &order {
        if let Some(members) = buckets.get_mut(fp) {
            stats.largest_group = stats.largest_group.max(members.len());
            if members.len() > 1 {
                debug!("Fingerprint {} has {} versions", &fp[..12], members.len());
            }
            assign_evolution_indices(articles, members);
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(url: &str, published_at: Option<&str>, fetched_at: &str) -> Article {
        let mut a = Article::new(url, "title").with_fetched_at(fetched_at);
        a.published_at = published_at.map(str::to_string);
        a
    }

    #[test]
    fn test_same_story_different_query() {
        let mut articles = vec![
            article("http://a.com/story?x=2", Some("2024-03-01T11:00:00Z"), "2024-03-01T12:00:00"),
            article("http://a.com/story?x=1", Some("2024-03-01T10:00:00Z"), "2024-03-01T12:00:00"),
        ];
        let stats = build_timeline(&mut articles);

        assert_eq!(stats.groups, 1);
        assert_eq!(articles[0].evolution_index, Some(1));
        assert_eq!(articles[1].evolution_index, Some(0));
        assert_eq!(fingerprint(&articles[0].url), fingerprint(&articles[1].url));
    }

    #[test]
    fn test_indices_contiguous_and_time_ordered() {
        let mut articles = vec![
            article("https://b.com/x", None, "2024-01-03T00:00:00"),
            article("https://c.com/other", None, "2024-01-01T00:00:00"),
            article("http://b.com/x?ref=rss", Some("2024-01-01T00:00:00Z"), "2024-01-05T00:00:00"),
            article("https://b.com/x?utm=tw", Some(""), "2024-01-02T00:00:00"),
        ];
        let stats = build_timeline(&mut articles);
        assert_eq!(stats.groups, 2);
        assert_eq!(stats.largest_group, 3);

        let mut group: Vec<_> = articles
            .iter()
            .filter(|a| a.url.contains("b.com/x"))
            .map(|a| (a.effective_time(), a.evolution_index.unwrap()))
            .collect();
        group.sort_by_key(|(_, idx)| *idx);
        let indices: Vec<usize> = group.iter().map(|(_, i)| *i).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(group.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(articles[1].evolution_index, Some(0));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let mut articles = vec![
            article("https://a.com/x?v=1", Some("2024-01-01T00:00:00Z"), ""),
            article("https://a.com/x?v=2", Some("2024-01-01T00:00:00Z"), ""),
        ];
        build_timeline(&mut articles);
        assert_eq!(articles[0].evolution_index, Some(0));
        assert_eq!(articles[1].evolution_index, Some(1));
    }

    #[test]
    fn test_replaces_title_clusters() {
        let mut articles = vec![
            article("https://a.com/one", Some("2024-01-01T00:00:00Z"), ""),
            article("https://b.com/two", Some("2024-01-02T00:00:00Z"), ""),
        ];
        for a in articles.iter_mut() {
            a.topic_cluster = Some(0);
        }
        articles[1].evolution_index = Some(1);

        build_timeline(&mut articles);
        assert!(articles.iter().all(|a| a.topic_cluster.is_none()));
        assert!(articles.iter().all(|a| a.evolution_index == Some(0)));
    }

    #[test]
    fn test_empty_collection() {
        let mut articles: Vec<Article> = vec![];
        assert_eq!(build_timeline(&mut articles), GroupingStats::default());
    }
}
