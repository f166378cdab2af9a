//! Command dispatcher - applies recognized intents to a billing context
//!
//! Dispatch never fails towards its caller. Feedback is spoken whether or not
//! the context accepted the mutation; mutation errors and missing entities
//! are logged and dropped, speech errors are swallowed.

use crate::config::VoiceSettings;
use crate::context::BillingContext;
use crate::entities::format_number;
use crate::error::DispatchError;
use crate::matcher::{parse_command, IntentMatcher};
use crate::speech::{SpeechRequest, Speaker};
use crate::types::{BillItem, Entities, Intent, ParseResult};

/// Most items read back in an order summary
pub const SUMMARY_LIMIT: usize = 5;

pub const EMPTY_ORDER: &str = "Your order is empty.";
pub const NOT_RECOGNIZED: &str = "Command not recognized. Please try again.";
pub const LISTENING_STOPPED: &str = "Voice recognition stopped";
pub const LEARNING_MODE: &str = "Switching to learning assistant mode";

/// What a dispatched command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ItemAdded,
    ItemRemoved,
    BillCleared,
    InvoiceRequested,
    TotalReported,
    ListeningStopped,
    LearningModeRequested,
    NotRecognized,
}

/// Parse `raw` with the default matcher and apply it to `context`.
///
/// Always returns the matcher's result unchanged.
pub fn dispatch<C, S>(raw: &str, context: &mut C, settings: &VoiceSettings, speaker: &mut S) -> ParseResult
where
    C: BillingContext + ?Sized,
    S: Speaker + ?Sized,
{
    let result = parse_command(raw);
    apply_logged(&result, context, settings, speaker);
    result
}

/// Dispatcher bound to a specific matcher and speech output
pub struct Dispatcher<S> {
    matcher: IntentMatcher,
    speaker: S,
}

impl<S: Speaker> Dispatcher<S> {
    pub fn new(speaker: S) -> Self {
        Self::with_matcher(IntentMatcher::new(), speaker)
    }

    pub fn with_matcher(matcher: IntentMatcher, speaker: S) -> Self {
        Self { matcher, speaker }
    }

    pub fn matcher(&self) -> &IntentMatcher {
        &self.matcher
    }

    pub fn speaker(&self) -> &S {
        &self.speaker
    }

    pub fn speaker_mut(&mut self) -> &mut S {
        &mut self.speaker
    }

    pub fn into_speaker(self) -> S {
        self.speaker
    }

    /// Parse and apply one command. Never fails; see [`Dispatcher::execute`]
    /// for the typed outcome.
    pub fn dispatch<C>(&mut self, raw: &str, context: &mut C, settings: &VoiceSettings) -> ParseResult
    where
        C: BillingContext + ?Sized,
    {
        let result = self.matcher.parse(raw);
        apply_logged(&result, context, settings, &mut self.speaker);
        result
    }

    /// Apply an already parsed command and report what happened.
    pub fn execute<C>(
        &mut self,
        result: &ParseResult,
        context: &mut C,
        settings: &VoiceSettings,
    ) -> Result<Action, DispatchError>
    where
        C: BillingContext + ?Sized,
    {
        apply(result, context, settings, &mut self.speaker)
    }
}

fn apply_logged<C, S>(result: &ParseResult, context: &mut C, settings: &VoiceSettings, speaker: &mut S)
where
    C: BillingContext + ?Sized,
    S: Speaker + ?Sized,
{
    tracing::debug!(intent = %result.intent, success = result.success, "dispatching voice command");
    match apply(result, context, settings, speaker) {
        Ok(action) => tracing::debug!(?action, "voice command applied"),
        Err(err @ DispatchError::MissingEntity { .. }) => {
            tracing::debug!(error = %err, "voice command skipped")
        }
        Err(err) => tracing::warn!(error = %err, "voice command failed"),
    }
}

fn apply<C, S>(
    result: &ParseResult,
    context: &mut C,
    settings: &VoiceSettings,
    speaker: &mut S,
) -> Result<Action, DispatchError>
where
    C: BillingContext + ?Sized,
    S: Speaker + ?Sized,
{
    let mut feedback = Feedback {
        speaker,
        settings,
    };

    match result.intent {
        Intent::AddItem => {
            let entities = match &result.entities {
                Entities::AddItem(e) => e,
                _ => return Err(missing(Intent::AddItem, "name")),
            };
            if entities.name.is_empty() {
                return Err(missing(Intent::AddItem, "name"));
            }
            if entities.quantity_raw.is_empty() {
                return Err(missing(Intent::AddItem, "quantityRaw"));
            }
            if !entities.rate_number.is_finite() {
                return Err(missing(Intent::AddItem, "rateNumber"));
            }
            let outcome = context.add_item(&entities.name, &entities.quantity_raw, entities.rate_number);
            feedback.say(message_or(result, "Item added to bill"));
            feedback.summary(&*context);
            outcome?;
            Ok(Action::ItemAdded)
        }
        Intent::RemoveItem => {
            let name = result
                .entities
                .name()
                .filter(|name| !name.is_empty())
                .ok_or_else(|| missing(Intent::RemoveItem, "name"))?;
            let outcome = context.remove_item("", name);
            feedback.say(message_or(result, "Item removed from bill"));
            feedback.summary(&*context);
            outcome?;
            Ok(Action::ItemRemoved)
        }
        Intent::ResetBill => {
            let outcome = context.clear_bill();
            feedback.say(message_or(result, "Bill has been reset"));
            feedback.summary(&*context);
            outcome?;
            Ok(Action::BillCleared)
        }
        Intent::GenerateInvoice => {
            let outcome = context.generate_invoice();
            feedback.say(message_or(result, "Generating invoice"));
            outcome?;
            Ok(Action::InvoiceRequested)
        }
        Intent::GetTotal => {
            let total = finite_or_zero(context.total_amount());
            feedback.say(&format!("Total amount is ₹{:.2}", total));
            Ok(Action::TotalReported)
        }
        Intent::StopListening => {
            let outcome = context.stop_listening();
            feedback.say(LISTENING_STOPPED);
            outcome?;
            Ok(Action::ListeningStopped)
        }
        Intent::LearningMode => {
            feedback.say(LEARNING_MODE);
            Ok(Action::LearningModeRequested)
        }
        Intent::Unknown => {
            feedback.say(NOT_RECOGNIZED);
            Ok(Action::NotRecognized)
        }
    }
}

/// Spoken confirmations, gated on the feedback setting
struct Feedback<'a, S: ?Sized> {
    speaker: &'a mut S,
    settings: &'a VoiceSettings,
}

impl<S: Speaker + ?Sized> Feedback<'_, S> {
    fn say(&mut self, text: &str) {
        if !self.settings.voice_feedback {
            return;
        }
        let request = SpeechRequest::new(text, &self.settings.speech);
        if let Err(err) = self.speaker.speak(&request) {
            tracing::warn!(error = %err, "spoken feedback dropped");
        }
    }

    fn summary<C: BillingContext + ?Sized>(&mut self, context: &C) {
        if !self.settings.voice_feedback {
            return;
        }
        let summary = order_summary(context.bill_items(), context.total_amount());
        self.say(&summary);
    }
}

/// Spoken read-back of the order: up to five items, then the grand total.
pub fn order_summary(items: &[BillItem], total: f64) -> String {
    if items.is_empty() {
        return EMPTY_ORDER.to_string();
    }

    let parts: Vec<String> = items
        .iter()
        .take(SUMMARY_LIMIT)
        .enumerate()
        .map(|(idx, item)| {
            let name = if item.name.is_empty() { "item" } else { &item.name };
            let quantity = if item.quantity.is_empty() { "1" } else { &item.quantity };
            format!(
                "{}) {} {} at ₹{}",
                idx + 1,
                quantity,
                name,
                format_number(finite_or_zero(item.rate))
            )
        })
        .collect();

    let more = if items.len() > SUMMARY_LIMIT {
        format!(" and {} more items", items.len() - SUMMARY_LIMIT)
    } else {
        String::new()
    };

    let count = items.len();
    format!(
        "You now have {} {}: {}{}. Total is ₹{:.2}.",
        count,
        if count == 1 { "item" } else { "items" },
        parts.join(", "),
        more,
        finite_or_zero(total)
    )
}

fn message_or<'a>(result: &'a ParseResult, fallback: &'a str) -> &'a str {
    if result.message.is_empty() {
        fallback
    } else {
        &result.message
    }
}

fn missing(intent: Intent, field: &'static str) -> DispatchError {
    DispatchError::MissingEntity { intent, field }
}

fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() {
        n
    } else {
        0.0
    }
}
