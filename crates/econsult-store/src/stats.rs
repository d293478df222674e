//! Aggregate statistics over a comment subset.
//!
//! Everything here is recomputed from the slice it is handed. Nothing is
//! cached, so a mutation is visible to the next call.

use std::collections::{BTreeMap, HashMap};

use econsult_core::{Comment, Sentiment, StakeholderType, normalize_provision};
use serde::Serialize;

// ── Sentiment counts ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub total: usize,
}

impl SentimentCounts {
    pub fn from_comments<'a>(comments: impl IntoIterator<Item = &'a Comment>) -> Self {
        let mut counts = Self::default();
        for c in comments {
            match c.sentiment {
                Sentiment::Positive => counts.positive += 1,
                Sentiment::Negative => counts.negative += 1,
                Sentiment::Neutral => counts.neutral += 1,
            }
            counts.total += 1;
        }
        counts
    }

    pub fn get(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    /// Whole-number share of `sentiment`; 0 for an empty subset.
    pub fn percentage(&self, sentiment: Sentiment) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.get(sentiment) as f64 * 100.0 / self.total as f64).round() as u32
    }

    /// Dominant tone: whichever of positive/negative is larger, neutral on a tie.
    pub fn overall(&self) -> Sentiment {
        match self.positive.cmp(&self.negative) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        }
    }
}

/// Mean confidence of the subset, 0.0 when empty.
pub fn average_confidence<'a>(comments: impl IntoIterator<Item = &'a Comment>) -> f64 {
    let (sum, n) = comments
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), c| (sum + c.confidence, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

// ── Insights ──

const HIGHLIGHT_CONFIDENCE: f64 = 0.8;
const INSIGHT_LIMIT: usize = 3;

/// Headline numbers for an analyst overview or a report preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub counts: SentimentCounts,
    pub flagged: usize,
    pub average_confidence: f64,
    pub by_stakeholder_type: BTreeMap<StakeholderType, usize>,
    /// Provisions of the first negative comments a reviewer has flagged.
    pub top_concerns: Vec<String>,
    /// Provisions of the first confidently positive comments.
    pub positive_highlights: Vec<String>,
}

impl Insights {
    pub fn from_comments(comments: &[&Comment]) -> Self {
        let mut by_stakeholder_type = BTreeMap::new();
        for c in comments {
            *by_stakeholder_type.entry(c.stakeholder_type).or_insert(0) += 1;
        }

        let top_concerns = comments
            .iter()
            .filter(|c| c.sentiment == Sentiment::Negative && c.flagged)
            .take(INSIGHT_LIMIT)
            .map(|c| c.provision.clone())
            .collect();
        let positive_highlights = comments
            .iter()
            .filter(|c| c.sentiment == Sentiment::Positive && c.confidence > HIGHLIGHT_CONFIDENCE)
            .take(INSIGHT_LIMIT)
            .map(|c| c.provision.clone())
            .collect();

        Self {
            counts: SentimentCounts::from_comments(comments.iter().copied()),
            flagged: comments.iter().filter(|c| c.flagged).count(),
            average_confidence: average_confidence(comments.iter().copied()),
            by_stakeholder_type,
            top_concerns,
            positive_highlights,
        }
    }

    /// Number of distinct stakeholder types represented.
    pub fn stakeholder_type_count(&self) -> usize {
        self.by_stakeholder_type.len()
    }
}

// ── Provision breakdown ──

const LEANING_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionStat {
    pub provision: String,
    pub comments: usize,
    /// Mean of +1 / 0 / -1 per comment.
    pub average_sentiment: f64,
}

impl ProvisionStat {
    pub fn leaning(&self) -> Sentiment {
        if self.average_sentiment > LEANING_THRESHOLD {
            Sentiment::Positive
        } else if self.average_sentiment < -LEANING_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

/// Per-provision comment count and mean sentiment, in statute order.
///
/// Provisions are ordered by [`normalize_provision`] so "Section 10.1" sorts
/// after "Section 9.3". Labels with the same key fall back to string order.
pub fn provision_breakdown(comments: &[&Comment]) -> Vec<ProvisionStat> {
    let mut groups: HashMap<&str, (usize, f64)> = HashMap::new();
    for c in comments {
        let entry = groups.entry(c.provision.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += c.sentiment.score();
    }

    let mut stats: Vec<ProvisionStat> = groups
        .into_iter()
        .map(|(provision, (n, score))| ProvisionStat {
            provision: provision.to_string(),
            comments: n,
            average_sentiment: score / n as f64,
        })
        .collect();
    stats.sort_by_cached_key(|s| (normalize_provision(&s.provision), s.provision.clone()));
    stats
}

// ── Keyword tally ──

/// Display tier for a keyword, largest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordTier {
    Largest,
    Large,
    Medium,
    Small,
    Smallest,
}

impl KeywordTier {
    fn from_weight(weight: f64) -> Self {
        if weight > 0.8 {
            Self::Largest
        } else if weight > 0.6 {
            Self::Large
        } else if weight > 0.4 {
            Self::Medium
        } else if weight > 0.2 {
            Self::Small
        } else {
            Self::Smallest
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
    /// `count` relative to the most frequent keyword, in (0, 1].
    pub weight: f64,
    pub tier: KeywordTier,
}

/// Most frequent keywords, case-folded, count descending.
///
/// Ties keep first-seen order. At most `limit` entries.
pub fn keyword_tally(comments: &[&Comment], limit: usize) -> Vec<KeywordCount> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for keyword in comments.iter().flat_map(|c| &c.keywords) {
        let folded = keyword.trim().to_lowercase();
        if folded.is_empty() {
            continue;
        }
        let n = counts.entry(folded.clone()).or_insert(0);
        if *n == 0 {
            order.push(folded);
        }
        *n += 1;
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|k| {
            let n = counts.get(&k).copied().unwrap_or(0);
            (k, n)
        })
        .collect();
    // Stable: equal counts stay in first-seen order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);

    let max = ranked.first().map(|(_, n)| *n).unwrap_or(0);
    ranked
        .into_iter()
        .map(|(keyword, count)| {
            let weight = count as f64 / max as f64;
            KeywordCount {
                keyword,
                count,
                weight,
                tier: KeywordTier::from_weight(weight),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use econsult_core::sample;

    fn all(comments: &[Comment]) -> Vec<&Comment> {
        comments.iter().collect()
    }

    #[test]
    fn counts_sum_to_total() {
        let comments = sample::consultation_comments();
        let counts = SentimentCounts::from_comments(&comments);
        assert_eq!(counts.positive, 5);
        assert_eq!(counts.negative, 4);
        assert_eq!(counts.neutral, 1);
        assert_eq!(counts.total, 10);
        assert_eq!(counts.positive + counts.negative + counts.neutral, counts.total);
        assert_eq!(counts.overall(), Sentiment::Positive);
    }

    #[test]
    fn percentages_round() {
        let comments = sample::consultation_comments();
        let counts = SentimentCounts::from_comments(&comments[..3]);
        // 1 of 3 each
        assert_eq!(counts.percentage(Sentiment::Positive), 33);
        assert_eq!(counts.percentage(Sentiment::Negative), 33);
        assert_eq!(counts.percentage(Sentiment::Neutral), 33);

        let counts = SentimentCounts::from_comments(&comments[..2]);
        assert_eq!(counts.percentage(Sentiment::Positive), 50);
    }

    #[test]
    fn empty_subset_is_all_zero() {
        let counts = SentimentCounts::from_comments(std::iter::empty());
        assert_eq!(counts, SentimentCounts::default());
        assert_eq!(counts.percentage(Sentiment::Positive), 0);
        assert_eq!(counts.overall(), Sentiment::Neutral);
        assert_eq!(average_confidence(std::iter::empty()), 0.0);
    }

    #[test]
    fn overall_tie_is_neutral() {
        let comments = sample::consultation_comments();
        // ids 1 (positive) and 2 (negative)
        assert_eq!(
            SentimentCounts::from_comments(&comments[..2]).overall(),
            Sentiment::Neutral
        );
    }

    #[test]
    fn average_confidence_of_sample() {
        let comments = sample::consultation_comments();
        let avg = average_confidence(&comments);
        assert!((avg - 0.865).abs() < 1e-9);
    }

    #[test]
    fn insights_for_sample() {
        let comments = sample::consultation_comments();
        let insights = Insights::from_comments(&all(&comments));

        assert_eq!(insights.flagged, 4);
        assert_eq!(insights.stakeholder_type_count(), 4);
        assert_eq!(insights.by_stakeholder_type[&StakeholderType::Ngo], 4);
        assert_eq!(
            insights.top_concerns,
            vec![
                "Section 7.1 - Compliance Requirements",
                "Section 2.3 - Enforcement Powers",
                "Section 8.2 - Penalty Structure",
            ]
        );
        // Prof. Chen (0.79) falls below the highlight threshold.
        assert_eq!(
            insights.positive_highlights,
            vec![
                "Section 4.2 - Data Collection",
                "Section 6.4 - Implementation Timeline",
                "Section 5.1 - User Rights",
            ]
        );
    }

    #[test]
    fn insights_for_empty_subset() {
        let insights = Insights::from_comments(&[]);
        assert_eq!(insights.counts.total, 0);
        assert_eq!(insights.average_confidence, 0.0);
        assert!(insights.top_concerns.is_empty());
        assert_eq!(insights.stakeholder_type_count(), 0);
    }

    #[test]
    fn provision_breakdown_in_statute_order() {
        let mut comments = sample::consultation_comments();
        comments[2].provision = "Section 4.2 - Data Collection".into();
        let stats = provision_breakdown(&all(&comments));

        let order: Vec<&str> = stats.iter().map(|s| s.provision.as_str()).collect();
        assert_eq!(order[0], "Section 1.2 - Definitions");
        assert_eq!(order[1], "Section 2.3 - Enforcement Powers");
        assert_eq!(order.last().copied(), Some("Section 9.3 - Special Categories"));

        let collection = stats
            .iter()
            .find(|s| s.provision == "Section 4.2 - Data Collection")
            .unwrap();
        // positive + neutral
        assert_eq!(collection.comments, 2);
        assert!((collection.average_sentiment - 0.5).abs() < 1e-9);
        assert_eq!(collection.leaning(), Sentiment::Positive);

        let penalties = stats
            .iter()
            .find(|s| s.provision == "Section 8.2 - Penalty Structure")
            .unwrap();
        assert_eq!(penalties.leaning(), Sentiment::Negative);
    }

    #[test]
    fn provision_leaning_thresholds() {
        let stat = |avg| ProvisionStat {
            provision: "s".into(),
            comments: 1,
            average_sentiment: avg,
        };
        assert_eq!(stat(0.3).leaning(), Sentiment::Neutral);
        assert_eq!(stat(0.31).leaning(), Sentiment::Positive);
        assert_eq!(stat(-0.3).leaning(), Sentiment::Neutral);
        assert_eq!(stat(-0.31).leaning(), Sentiment::Negative);
    }

    #[test]
    fn numbered_provisions_sort_numerically() {
        let mut comments = sample::consultation_comments();
        comments[0].provision = "Section 10.1 - Transitional".into();
        let stats = provision_breakdown(&all(&comments));
        assert_eq!(
            stats.last().map(|s| s.provision.as_str()),
            Some("Section 10.1 - Transitional")
        );
    }

    #[test]
    fn keyword_tally_folds_case_and_ranks() {
        let mut comments = sample::consultation_comments();
        comments[1].keywords.push("Privacy".into());
        comments[2].keywords.push("privacy ".into());
        comments[3].keywords.push("compliance".into());

        let tally = keyword_tally(&all(&comments), 3);
        assert_eq!(tally.len(), 3);
        assert_eq!(tally[0].keyword, "privacy");
        assert_eq!(tally[0].count, 3);
        assert_eq!(tally[0].weight, 1.0);
        assert_eq!(tally[0].tier, KeywordTier::Largest);

        assert_eq!(tally[1].keyword, "compliance");
        assert_eq!(tally[1].count, 2);
        assert_eq!(tally[1].tier, KeywordTier::Large);

        // first single-count keyword in store order
        assert_eq!(tally[2].keyword, "judicial oversight");
        assert_eq!(tally[2].tier, KeywordTier::Small);
    }

    #[test]
    fn keyword_tally_empty() {
        assert!(keyword_tally(&[], 10).is_empty());
        let comments = sample::consultation_comments();
        assert!(keyword_tally(&all(&comments), 0).is_empty());
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(KeywordTier::from_weight(1.0), KeywordTier::Largest);
        assert_eq!(KeywordTier::from_weight(0.8), KeywordTier::Large);
        assert_eq!(KeywordTier::from_weight(0.5), KeywordTier::Medium);
        assert_eq!(KeywordTier::from_weight(0.4), KeywordTier::Small);
        assert_eq!(KeywordTier::from_weight(0.2), KeywordTier::Smallest);
    }
}
