use std::collections::HashMap;

use nd_core::{Article, MergeSummary};
use tracing::{debug, warn};

/// Appends `incoming` to `existing` as a per-URL change log, then keeps only
/// the most recent `cap` entries by append order.
///
/// An article is appended when its URL is unseen, or when its title,
/// description or `published_at` differ from the latest stored snapshot of
/// that URL. Articles without a URL are skipped.
pub fn merge_articles(
    existing: &mut Vec<Article>,
    incoming: Vec<Article>,
    cap: usize,
) -> MergeSummary {
    let mut latest: HashMap<String, usize> = HashMap::new();
    for (idx, article) in existing.iter().enumerate() {
        latest.insert(article.url.clone(), idx);
    }

    let mut added = 0;
    for article in incoming {
        if article.url.is_empty() {
            warn!("Skipping article without url: {:?}", article.title);
            continue;
        }
        let changed = match latest.get(&article.url) {
            None => true,
            Some(&idx) => existing[idx].content_differs(&article),
        };
        if changed {
            debug!("Appending snapshot of {}", article.url);
            latest.insert(article.url.clone(), existing.len());
            existing.push(article);
            added += 1;
        }
    }

    if existing.len() > cap {
        let evicted = existing.len() - cap;
        existing.drain(..evicted);
        debug!("Evicted {} oldest articles (cap {})", evicted, cap);
    }

    MergeSummary {
        added,
        total: existing.len(),
    }
}
