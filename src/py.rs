//! Python bindings for the voice command core using PyO3

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::billing::Bill;
use crate::config::{RecognitionLanguage, VoiceSettings};
use crate::context::Checkout;
use crate::dispatcher::Dispatcher;
use crate::entities::normalize_unit;
use crate::matcher::{parse_command, IntentMatcher, MatcherConfig};
use crate::session::{ManualInput, VoiceSession};
use crate::speech::RecordingSpeaker;
use crate::types::ParseResult;

fn to_json<T: serde::Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value)
        .map_err(|e| PyErr::new::<PyValueError, _>(format!("Failed to serialize: {}", e)))
}

fn result_to_dict<'py>(py: Python<'py>, result: &ParseResult) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("intent", result.intent.as_str())?;
    dict.set_item("success", result.success)?;
    dict.set_item("confidence", result.confidence)?;
    dict.set_item("message", &result.message)?;
    // Entity shape varies by intent, so it crosses as JSON
    dict.set_item("entities", to_json(&result.entities)?)?;
    Ok(dict)
}

/// Classify a transcript (Python function)
#[pyfunction]
pub fn py_parse_command<'py>(py: Python<'py>, text: &str) -> PyResult<Bound<'py, PyDict>> {
    result_to_dict(py, &parse_command(text))
}

/// Canonical form of a spoken unit (Python function)
#[pyfunction]
pub fn py_normalize_unit(unit: &str) -> String {
    normalize_unit(unit)
}

/// Python wrapper for intent matcher
#[pyclass]
pub struct PyIntentMatcher {
    matcher: IntentMatcher,
}

#[pymethods]
impl PyIntentMatcher {
    #[new]
    #[pyo3(signature = (fall_through = false))]
    fn new(fall_through: bool) -> Self {
        Self {
            matcher: IntentMatcher::with_config(MatcherConfig {
                fall_through_on_failed_extraction: fall_through,
            }),
        }
    }

    /// Match a transcript against the rule chain
    fn parse<'py>(&self, text: &str, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        result_to_dict(py, &self.matcher.parse(text))
    }

    /// Rule names in evaluation order
    fn rules(&self) -> Vec<&'static str> {
        self.matcher.rules().iter().map(|r| r.intent.as_str()).collect()
    }
}

/// In-memory bill driven by voice commands, with recorded spoken feedback
#[pyclass]
pub struct PyVoiceBill {
    bill: Bill,
    session: VoiceSession<ManualInput>,
    dispatcher: Dispatcher<RecordingSpeaker>,
    settings: VoiceSettings,
}

#[pymethods]
impl PyVoiceBill {
    #[new]
    #[pyo3(signature = (voice_feedback = true, settings_json = None))]
    fn new(voice_feedback: bool, settings_json: Option<&str>) -> PyResult<Self> {
        let mut settings = match settings_json {
            Some(json) => VoiceSettings::from_json(json)
                .map_err(|e| PyErr::new::<PyValueError, _>(e.to_string()))?,
            None => VoiceSettings::default(),
        };
        settings.voice_feedback = voice_feedback;

        let mut session = VoiceSession::new(ManualInput::default(), settings.recognition_language);
        session
            .start()
            .map_err(|e| PyErr::new::<PyRuntimeError, _>(e.to_string()))?;

        Ok(Self {
            bill: Bill::new(),
            session,
            dispatcher: Dispatcher::new(RecordingSpeaker::new()),
            settings,
        })
    }

    /// Handle one transcript; returns the parse result. Ignored while not listening.
    fn dispatch<'py>(&mut self, command: &str, py: Python<'py>) -> PyResult<Option<Bound<'py, PyDict>>> {
        let Some(command) = self.session.deliver(command) else {
            return Ok(None);
        };
        let mut checkout = Checkout::new(&mut self.bill, &mut self.session);
        let result = self.dispatcher.dispatch(&command, &mut checkout, &self.settings);
        result_to_dict(py, &result).map(Some)
    }

    fn start_listening(&mut self) -> PyResult<()> {
        self.session
            .start()
            .map_err(|e| PyErr::new::<PyRuntimeError, _>(e.to_string()))
    }

    fn is_listening(&self) -> bool {
        self.session.is_listening()
    }

    /// Switch recognition language: "en-US", "ta-IN" or "mixed"
    fn set_language(&mut self, tag: &str) -> PyResult<()> {
        let language: RecognitionLanguage = serde_json::from_value(serde_json::Value::String(tag.to_string()))
            .map_err(|_| PyErr::new::<PyValueError, _>(format!("Unknown language: {}", tag)))?;
        self.settings.recognition_language = language;
        self.session
            .set_language(language)
            .map_err(|e| PyErr::new::<PyRuntimeError, _>(e.to_string()))
    }

    fn set_voice_feedback(&mut self, enabled: bool) {
        self.settings.voice_feedback = enabled;
    }

    /// Bill items as JSON
    fn items(&self) -> PyResult<String> {
        to_json(&self.bill.items())
    }

    fn total(&self) -> f64 {
        self.bill.total_amount()
    }

    /// Every feedback line spoken so far
    fn spoken(&self) -> Vec<String> {
        self.dispatcher
            .speaker()
            .history()
            .iter()
            .map(|r| r.text.clone())
            .collect()
    }

    /// Last generated invoice as JSON, if any
    fn last_invoice(&self) -> PyResult<Option<String>> {
        self.bill.invoices().last().map(to_json).transpose()
    }
}
