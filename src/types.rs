//! Core data types for parsed voice commands

use std::fmt;

use serde::{Deserialize, Serialize};

/// Confidence reported for any successfully extracted intent
pub const MATCH_CONFIDENCE: f64 = 0.9;
/// Confidence reported for `unknown`
pub const UNKNOWN_CONFIDENCE: f64 = 0.2;

/// The classified purpose of an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    AddItem,
    RemoveItem,
    ResetBill,
    GenerateInvoice,
    GetTotal,
    LearningMode,
    StopListening,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::AddItem => "add_item",
            Intent::RemoveItem => "remove_item",
            Intent::ResetBill => "reset_bill",
            Intent::GenerateInvoice => "generate_invoice",
            Intent::GetTotal => "get_total",
            Intent::LearningMode => "learning_mode",
            Intent::StopListening => "stop_listening",
            Intent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entities for `add_item`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemEntities {
    /// Capitalized item name
    pub name: String,
    /// Quantity label handed to the bill, e.g. "2 kg"
    pub quantity_raw: String,
    pub quantity_number: f64,
    /// Canonical unit
    pub unit: String,
    pub rate_number: f64,
    pub message: String,
}

/// Entities for `remove_item`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveItemEntities {
    pub name: String,
    pub message: String,
}

/// Entities for intents that carry nothing but a confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEntities {
    pub message: String,
}

/// Structured values extracted from an utterance; shape depends on the intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entities {
    AddItem(AddItemEntities),
    RemoveItem(RemoveItemEntities),
    Message(MessageEntities),
    Empty {},
}

impl Entities {
    pub fn message_only(message: impl Into<String>) -> Self {
        Entities::Message(MessageEntities {
            message: message.into(),
        })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Entities::AddItem(e) => Some(&e.message),
            Entities::RemoveItem(e) => Some(&e.message),
            Entities::Message(e) => Some(&e.message),
            Entities::Empty {} => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Entities::AddItem(e) => Some(&e.name),
            Entities::RemoveItem(e) => Some(&e.name),
            _ => None,
        }
    }
}

/// Outcome of matching one utterance. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub intent: Intent,
    pub entities: Entities,
    pub success: bool,
    pub confidence: f64,
    pub message: String,
}

impl ParseResult {
    /// A successful extraction for `intent`.
    pub fn matched(intent: Intent, entities: Entities) -> Self {
        let message = entities.message().unwrap_or_default().to_string();
        Self {
            intent,
            entities,
            success: true,
            confidence: MATCH_CONFIDENCE,
            message,
        }
    }

    /// The `unknown` outcome for the raw (un-normalized) command.
    pub fn unknown(raw: &str) -> Self {
        Self {
            intent: Intent::Unknown,
            entities: Entities::Empty {},
            success: false,
            confidence: UNKNOWN_CONFIDENCE,
            message: format!("Command \"{}\" not recognized", raw),
        }
    }
}

/// A line on the running bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillItem {
    pub id: String,
    pub name: String,
    /// Quantity label, e.g. "2 kg"
    pub quantity: String,
    pub rate: f64,
    pub amount: f64,
}

/// Record of a handled command, shaped for the command-log endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRecord {
    pub user_id: String,
    pub command: String,
    pub intent: Intent,
    pub success: bool,
}

impl CommandRecord {
    pub fn new(user_id: impl Into<String>, command: impl Into<String>, result: &ParseResult) -> Self {
        Self {
            user_id: user_id.into(),
            command: command.into(),
            intent: result.intent,
            success: result.success,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_serializes_snake_case() {
        let json = serde_json::to_string(&Intent::GenerateInvoice).unwrap();
        assert_eq!(json, "\"generate_invoice\"");
        assert_eq!(Intent::StopListening.to_string(), "stop_listening");
    }

    #[test]
    fn test_unknown_result_has_empty_entities() {
        let result = ParseResult::unknown("Sing A Song");
        assert_eq!(result.intent, Intent::Unknown);
        assert!(!result.success);
        assert_eq!(result.confidence, UNKNOWN_CONFIDENCE);
        assert_eq!(result.message, "Command \"Sing A Song\" not recognized");

        let json = serde_json::to_value(&result.entities).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_add_entities_use_camel_case() {
        let entities = Entities::AddItem(AddItemEntities {
            name: "Tomato".to_string(),
            quantity_raw: "2 kg".to_string(),
            quantity_number: 2.0,
            unit: "kg".to_string(),
            rate_number: 50.0,
            message: "Added 2 kg of Tomato for ₹50".to_string(),
        });
        let json = serde_json::to_value(&entities).unwrap();
        assert_eq!(json["quantityRaw"], "2 kg");
        assert_eq!(json["rateNumber"], 50.0);

        let back: Entities = serde_json::from_value(json).unwrap();
        assert_eq!(back, entities);
    }

    #[test]
    fn test_command_record_from_result() {
        let result = ParseResult::matched(Intent::GetTotal, Entities::message_only("Getting total amount"));
        let record = CommandRecord::new("user-1", "what is the total", &result);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["userId"], "user-1");
        assert_eq!(json["intent"], "get_total");
        assert_eq!(json["success"], true);
    }
}
