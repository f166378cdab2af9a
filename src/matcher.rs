//! Intent matcher - ordered rule chain over normalized utterances

use std::sync::LazyLock;

use regex::Regex;

use crate::entities::EntityExtractor;
use crate::types::{Entities, Intent, ParseResult};

/// The rule chain in evaluation order: each intent with its trigger pattern.
/// Earlier rules win when triggers overlap.
pub const RULES: [(Intent, &str); 7] = [
    (Intent::AddItem, r"\b(add|insert|put|include)\b"),
    (Intent::RemoveItem, r"\b(remove|delete)\b"),
    (Intent::ResetBill, r"(reset|clear).*(bill|cart)"),
    (Intent::GenerateInvoice, r"(generate|create|make).*(invoice|bill|pdf)"),
    (Intent::GetTotal, r"(total|amount|sum|balance)"),
    (Intent::LearningMode, r"(learn|study)"),
    (Intent::StopListening, r"(stop|pause)"),
];

static DEFAULT_MATCHER: LazyLock<IntentMatcher> = LazyLock::new(IntentMatcher::new);

/// Classify a raw transcript with the default rule chain.
///
/// Pure: the same input always yields the same result.
pub fn parse_command(raw: &str) -> ParseResult {
    DEFAULT_MATCHER.parse(raw)
}

fn confirmation(intent: Intent) -> &'static str {
    match intent {
        Intent::ResetBill => "Bill has been reset",
        Intent::GenerateInvoice => "Generating invoice",
        Intent::GetTotal => "Getting total amount",
        Intent::LearningMode => "Switching to learning mode",
        Intent::StopListening => "Stopping voice recognition",
        Intent::AddItem | Intent::RemoveItem | Intent::Unknown => "",
    }
}

/// One entry of the rule chain: a trigger predicate for an intent.
#[derive(Debug, Clone)]
pub struct IntentRule {
    pub intent: Intent,
    trigger: Regex,
}

impl IntentRule {
    fn new(intent: Intent, pattern: &str) -> Self {
        let trigger = Regex::new(pattern).expect("Invalid regex pattern");
        Self { intent, trigger }
    }

    /// Does this rule claim the utterance?
    pub fn test(&self, text: &str) -> bool {
        self.trigger.is_match(text)
    }
}

/// Matcher behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatcherConfig {
    /// When the first triggered rule fails to extract, keep trying later
    /// rules instead of reporting `unknown`.
    pub fall_through_on_failed_extraction: bool,
}

/// Ordered, first-match-wins intent classifier
pub struct IntentMatcher {
    rules: Vec<IntentRule>,
    extractor: EntityExtractor,
    config: MatcherConfig,
}

impl IntentMatcher {
    pub fn new() -> Self {
        Self::with_config(MatcherConfig::default())
    }

    pub fn with_config(config: MatcherConfig) -> Self {
        Self {
            rules: RULES
                .iter()
                .map(|(intent, pattern)| IntentRule::new(*intent, pattern))
                .collect(),
            extractor: EntityExtractor::new(),
            config,
        }
    }

    pub fn config(&self) -> MatcherConfig {
        self.config
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// Classify `raw` into exactly one intent.
    ///
    /// The input is lower-cased and trimmed first. The first rule whose
    /// trigger matches gets to extract; if it cannot, the result is
    /// `unknown` unless fall-through is enabled.
    pub fn parse(&self, raw: &str) -> ParseResult {
        let normalized = raw.to_lowercase();
        let text = normalized.trim();

        for rule in &self.rules {
            if !rule.test(text) {
                continue;
            }
            match self.extract(rule.intent, text) {
                Some(entities) => return ParseResult::matched(rule.intent, entities),
                None if self.config.fall_through_on_failed_extraction => {
                    tracing::trace!(intent = %rule.intent, "extraction failed, trying next rule");
                }
                None => {
                    tracing::debug!(intent = %rule.intent, "extraction failed");
                    break;
                }
            }
        }

        ParseResult::unknown(raw)
    }

    fn extract(&self, intent: Intent, text: &str) -> Option<Entities> {
        match intent {
            Intent::AddItem => self.extractor.extract_add(text).map(Entities::AddItem),
            Intent::RemoveItem => self.extractor.extract_remove(text).map(Entities::RemoveItem),
            Intent::Unknown => None,
            other => Some(Entities::message_only(confirmation(other))),
        }
    }
}

impl Default for IntentMatcher {
    fn default() -> Self {
        Self::new()
    }
}
