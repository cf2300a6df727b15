use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Subcommand};
use nd_analysis::score_novelty;
use nd_core::{Article, Config, GroupingMode, Result, ScoringMode};
use nd_storage::StoreHandle;

use crate::monitor::Monitor;
use crate::source::JsonFileSource;

/// Interval such as `90`, `30m` or `1h15m30s`; a bare number is seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration(pub Duration);

fn unit_seconds(unit: char) -> Option<u64> {
    match unit {
        's' => Some(1),
        'm' => Some(60),
        'h' => Some(3600),
        'd' => Some(86400),
        _ => None,
    }
}

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let overflow = || format!("Duration too large: {}", s);
        let mut total: u64 = 0;
        let mut pending: Option<u64> = None;

        for c in s.chars() {
            if let Some(digit) = c.to_digit(10) {
                let value = pending
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(u64::from(digit)))
                    .ok_or_else(overflow)?;
                pending = Some(value);
            } else if let Some(value) = pending.take() {
                let scale = unit_seconds(c).ok_or_else(|| format!("Invalid duration unit: {}", c))?;
                total = value
                    .checked_mul(scale)
                    .and_then(|secs| total.checked_add(secs))
                    .ok_or_else(overflow)?;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        let has_number = s.chars().any(|c| c.is_ascii_digit());
        if let Some(value) = pending {
            total = total.checked_add(value).ok_or_else(overflow)?;
        }
        if !has_number {
            return Err("Duration must include a number".to_string());
        }
        if total == 0 {
            return Err("Duration must be positive".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total)))
    }
}

#[derive(Args, Debug, Clone)]
pub struct MonitorArgs {
    #[command(subcommand)]
    pub command: MonitorCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum MonitorCommands {
    /// Analyze a batch of raw articles and merge it into the store
    Cycle {
        /// JSON array of raw article records
        #[arg(long)]
        input: PathBuf,
        /// Grouping pass to run after the merge: fingerprint or title
        #[arg(long)]
        mode: Option<GroupingMode>,
        /// Final score strategy: additive, novelty or blend
        #[arg(long)]
        scoring: Option<ScoringMode>,
        /// Repeat with this interval (e.g. 5m, 1h15m30s) until interrupted
        #[arg(long)]
        interval: Option<HumanDuration>,
    },
    /// Recompute evolution structure over the stored collection
    Regroup {
        #[arg(long)]
        mode: Option<GroupingMode>,
    },
    /// Print batch novelty scores for the given titles
    Novelty {
        #[arg(required = true)]
        titles: Vec<String>,
    },
    /// Print the most recently stored articles
    Stories {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

pub async fn handle_command(command: MonitorCommands, config: &Config, store: &StoreHandle) -> Result<()> {
    match command {
        MonitorCommands::Cycle { input, mode, scoring, interval } => {
            let grouping = mode.unwrap_or(config.grouping_mode);
            let scoring = scoring.unwrap_or(config.scoring_mode);
            let source = Arc::new(JsonFileSource::new(input));
            let monitor = Monitor::new(config.clone(), source, store.clone());
            match interval {
                Some(interval) => monitor.run_periodic(interval.0, grouping, scoring).await?,
                None => {
                    let report = monitor.run_cycle(grouping, scoring).await?;
                    println!("{}", serde_json::to_string(&report)?);
                }
            }
        }
        MonitorCommands::Regroup { mode } => {
            let mode = mode.unwrap_or(config.grouping_mode);
            let stats = store.regroup(mode).await?;
            println!(
                "🧵 Grouped {} articles into {} {} groups (largest {})",
                stats.articles, stats.groups, mode, stats.largest_group
            );
        }
        MonitorCommands::Novelty { titles } => {
            for (score, title) in score_novelty(&titles).iter().zip(&titles) {
                println!("{:.3}\t{}", score, title);
            }
        }
        MonitorCommands::Stories { limit } => {
            let articles = store.snapshot().await?;
            let start = articles.len().saturating_sub(limit);
            for article in &articles[start..] {
                println!("{}", format_story(article));
            }
        }
    }
    Ok(())
}

fn format_story(article: &Article) -> String {
    let (score, flag) = match &article.analysis {
        Some(a) => (
            format!("{:.2}", a.manipulation_score),
            if a.is_high_manipulation { "⚠️" } else { "  " },
        ),
        None => ("-".to_string(), "  "),
    };
    let cluster = article
        .topic_cluster
        .map(|c| c.to_string())
        .unwrap_or_else(|| "-".to_string());
    let index = article
        .evolution_index
        .map(|i| i.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{} [{:>5}] c={:<4} v={:<3} {} ({})",
        flag, score, cluster, index, article.title, article.source
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use nd_core::{Analysis, Sentiment};

    #[test]
    fn test_human_duration() {
        assert_eq!("90".parse::<HumanDuration>().unwrap().0, Duration::from_secs(90));
        assert_eq!("5m".parse::<HumanDuration>().unwrap().0, Duration::from_secs(300));
        assert_eq!(
            "1h15m30s".parse::<HumanDuration>().unwrap().0,
            Duration::from_secs(4530)
        );
        assert!("5x".parse::<HumanDuration>().is_err());
        assert!("m".parse::<HumanDuration>().is_err());
        assert!("0s".parse::<HumanDuration>().is_err());
    }

    #[test]
    fn test_human_duration_overflow_is_an_error() {
        assert!("213503982334602d".parse::<HumanDuration>().is_err());
        assert!("99999999999999999999".parse::<HumanDuration>().is_err());
        assert!("18446744073709551615s1s".parse::<HumanDuration>().is_err());
        assert_eq!(
            "1d".parse::<HumanDuration>().unwrap().0,
            Duration::from_secs(86400)
        );
    }

    #[test]
    fn test_format_story() {
        let mut article = Article::new("https://a.com/1", "Headline").with_source("AP");
        assert!(format_story(&article).contains("c=-"));

        article.topic_cluster = Some(-1);
        article.evolution_index = Some(2);
        article.analysis = Some(Analysis::new(Sentiment::default(), 0.0, 7.25, 6.5));
        let line = format_story(&article);
        assert!(line.contains("7.25"));
        assert!(line.contains("c=-1"));
        assert!(line.contains("v=2"));
        assert!(line.starts_with("⚠️"));
    }
}
