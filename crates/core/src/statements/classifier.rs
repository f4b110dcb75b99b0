//! Filename-based statement source classification.

use crate::statements::statements_model::StatementSource;

/// One classification rule: filenames containing `keyword` belong to
/// `source`.
#[derive(Debug, Clone)]
pub struct ClassifierRule {
    pub keyword: String,
    pub source: StatementSource,
}

/// Classifies statement uploads by case-insensitive filename keyword.
#[derive(Debug, Clone)]
pub struct SourceClassifier {
    rules: Vec<ClassifierRule>,
}

impl Default for SourceClassifier {
    fn default() -> Self {
        Self::new(vec![
            ClassifierRule {
                keyword: "banco".to_string(),
                source: StatementSource::Bank,
            },
            ClassifierRule {
                keyword: "freenow".to_string(),
                source: StatementSource::Freenow,
            },
            ClassifierRule {
                keyword: "uber".to_string(),
                source: StatementSource::Uber,
            },
        ])
    }
}

impl SourceClassifier {
    pub fn new(rules: Vec<ClassifierRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| ClassifierRule {
                keyword: rule.keyword.to_lowercase(),
                source: rule.source,
            })
            .collect();
        Self { rules }
    }

    /// First rule whose keyword occurs in the lower-cased filename wins;
    /// `None` leaves the file unattributed.
    pub fn classify(&self, filename: &str) -> Option<StatementSource> {
        let lowered = filename.to_lowercase();
        self.rules
            .iter()
            .find(|rule| lowered.contains(&rule.keyword))
            .map(|rule| rule.source)
    }
}
