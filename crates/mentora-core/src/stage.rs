use mentora_schema::StageLabel;
use tracing::warn;

use crate::config::StageKeywordRow;

/// Maps user text to a learning stage by keyword containment.
///
/// Rows are tested in declared order and the first row with a hit wins, so
/// overlapping keyword sets resolve to the earliest row. The last row's label
/// is the fallback for text matching nothing. Total: every input classifies.
pub struct StageClassifier {
    table: Vec<(StageLabel, Vec<String>)>,
}

impl StageClassifier {
    pub fn new(rows: &[StageKeywordRow]) -> Self {
        if rows.is_empty() {
            warn!("empty stage keyword table, falling back to defaults");
            return Self::default();
        }
        Self {
            table: rows
                .iter()
                .map(|row| (row.stage, row.keywords.clone()))
                .collect(),
        }
    }

    pub fn classify(&self, text: &str) -> StageLabel {
        for (label, keywords) in &self.table {
            if keywords.iter().any(|k| text.contains(k.as_str())) {
                return *label;
            }
        }
        // Non-empty table is a constructor invariant.
        self.table.last().map(|(label, _)| *label).unwrap_or(StageLabel::Third)
    }
}

impl Default for StageClassifier {
    fn default() -> Self {
        Self::new(&crate::config::CoachConfig::default().stage_keywords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basics_keyword_maps_to_zero() {
        let classifier = StageClassifier::default();
        assert_eq!(classifier.classify("基礎を学びたい"), StageLabel::Zero);
        assert_eq!(
            classifier.classify("I want to revisit the basics"),
            StageLabel::Zero
        );
    }

    #[test]
    fn earlier_row_wins_when_keywords_overlap() {
        let classifier = StageClassifier::default();
        // Contains both a zero keyword and a second keyword.
        assert_eq!(
            classifier.classify("基礎とパターンの両方が気になる"),
            StageLabel::Zero
        );
        assert_eq!(
            classifier.classify("a method built on patterns"),
            StageLabel::First
        );
    }

    #[test]
    fn no_keyword_falls_back_to_deepest() {
        let classifier = StageClassifier::default();
        assert_eq!(
            classifier.classify("チームのコンフリクトを解消したい"),
            StageLabel::Third
        );
        assert_eq!(classifier.classify(""), StageLabel::Third);
    }

    #[test]
    fn custom_table_order_is_respected() {
        let rows = vec![
            StageKeywordRow {
                stage: StageLabel::Second,
                keywords: vec!["habit".into()],
            },
            StageKeywordRow {
                stage: StageLabel::Zero,
                keywords: vec!["habit".into(), "drill".into()],
            },
            StageKeywordRow {
                stage: StageLabel::First,
                keywords: vec![],
            },
        ];
        let classifier = StageClassifier::new(&rows);
        assert_eq!(classifier.classify("a habit to break"), StageLabel::Second);
        assert_eq!(classifier.classify("drill practice"), StageLabel::Zero);
        assert_eq!(classifier.classify("nothing relevant"), StageLabel::First);
    }
}
