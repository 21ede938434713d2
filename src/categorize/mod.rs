use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::models::TransactionInput;

/// One keyword or regex rule mapping transaction text to a category label.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct CategoryRule {
    pub(crate) pattern: String,
    pub(crate) category: String,
    #[serde(default)]
    pub(crate) is_regex: bool,
}

impl CategoryRule {
    pub(crate) fn contains(pattern: &str, category: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            category: category.to_string(),
            is_regex: false,
        }
    }

    pub(crate) fn regex(pattern: &str, category: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            category: category.to_string(),
            is_regex: true,
        }
    }
}

// Whole-word patterns, so "rent" does not fire on "Current" or "Parent".
const DEFAULT_RULES: &[(&str, &str)] = &[
    (r"\b(salary|payroll|paycheck|bonus)\b", "Income"),
    (r"\b(rent|mortgage)\b", "Housing"),
    (r"\b(electric(ity)?|water bill|internet)\b", "Utilities"),
    (r"\b(grocer(y|ies)|restaurants?|coffee|caf[eé]s?|lunch|dinner|pizza)\b", "Food"),
    (r"\b(uber|lyft|taxi|bus|trains?|fuel|parking)\b", "Transportation"),
    (r"\b(netflix|spotify|cinema|movies?)\b", "Entertainment"),
    (r"\b(pharmacy|doctor|gym)\b", "Health"),
];

/// Suggests a category from the transaction text. Purely local: the first
/// matching rule wins, and no match means the caller keeps its own fallback.
pub(crate) struct Categorizer {
    rules: Vec<CompiledRule>,
}

struct CompiledRule {
    pattern: String,
    regex: Option<Regex>,
    category: String,
}

impl Categorizer {
    /// Compile `rules` in order. Regex rules that fail to compile are skipped
    /// and their patterns returned so the caller can warn about them.
    pub(crate) fn new(rules: &[CategoryRule]) -> (Self, Vec<String>) {
        let mut bad_patterns = Vec::new();
        let compiled = rules
            .iter()
            .filter_map(|r| {
                let regex = if r.is_regex {
                    match RegexBuilder::new(&r.pattern).case_insensitive(true).build() {
                        Ok(re) => Some(re),
                        Err(_) => {
                            bad_patterns.push(r.pattern.clone());
                            return None;
                        }
                    }
                } else {
                    None
                };
                Some(CompiledRule {
                    pattern: r.pattern.to_lowercase(),
                    regex,
                    category: r.category.clone(),
                })
            })
            .collect();

        (Self { rules: compiled }, bad_patterns)
    }

    pub(crate) fn with_defaults() -> Self {
        Self::new(&default_rules()).0
    }

    /// User rules are consulted before the built-in ones.
    pub(crate) fn with_user_rules(rules: &[CategoryRule]) -> (Self, Vec<String>) {
        let (mut categorizer, bad) = Self::new(rules);
        categorizer.rules.extend(Self::with_defaults().rules);
        (categorizer, bad)
    }

    pub(crate) fn suggest(&self, text: &str) -> Option<&str> {
        let text_lower = text.to_lowercase();

        self.rules
            .iter()
            .find(|rule| match &rule.regex {
                Some(re) => re.is_match(text),
                None => text_lower.contains(&rule.pattern),
            })
            .map(|rule| rule.category.as_str())
    }

    /// Fill in the category of every input that has none. Returns how many
    /// were filled.
    pub(crate) fn categorize_batch(&self, inputs: &mut [TransactionInput]) -> usize {
        let mut filled = 0;
        for input in inputs.iter_mut().filter(|i| i.category.is_none()) {
            if let Some(category) = self.suggest(&input.text) {
                input.category = Some(category.to_string());
                filled += 1;
            }
        }
        filled
    }
}

fn default_rules() -> Vec<CategoryRule> {
    DEFAULT_RULES
        .iter()
        .map(|(pattern, category)| CategoryRule::regex(pattern, category))
        .collect()
}
