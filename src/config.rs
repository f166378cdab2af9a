//! Voice settings consumed by the dispatcher and the voice session

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Speech-engine bounds for the playback rate
pub const MIN_SPEECH_RATE: f32 = 0.1;
pub const MAX_SPEECH_RATE: f32 = 10.0;

/// Language the recognizer listens in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecognitionLanguage {
    #[default]
    #[serde(rename = "en-US")]
    English,
    #[serde(rename = "ta-IN")]
    Tamil,
    /// Tamil and English mixed in one utterance
    #[serde(rename = "mixed")]
    Mixed,
}

impl RecognitionLanguage {
    pub fn tag(&self) -> &'static str {
        match self {
            RecognitionLanguage::English => "en-US",
            RecognitionLanguage::Tamil => "ta-IN",
            RecognitionLanguage::Mixed => "mixed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RecognitionLanguage::English => "English",
            RecognitionLanguage::Tamil => "Tamil",
            RecognitionLanguage::Mixed => "Mixed",
        }
    }
}

/// How spoken feedback is rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// Language tag handed to the speech engine
    pub lang: String,
    pub rate: f32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            lang: "en-US".to_string(),
            rate: 0.8,
        }
    }
}

/// Settings for one dispatch. Feedback is spoken unless explicitly disabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VoiceSettings {
    pub voice_feedback: bool,
    pub recognition_language: RecognitionLanguage,
    pub speech: SpeechSettings,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            voice_feedback: true,
            recognition_language: RecognitionLanguage::default(),
            speech: SpeechSettings::default(),
        }
    }
}

impl VoiceSettings {
    /// Settings with feedback switched off
    pub fn silent() -> Self {
        Self {
            voice_feedback: false,
            ..Self::default()
        }
    }

    /// Load settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: VoiceSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let rate = self.speech.rate;
        if !(MIN_SPEECH_RATE..=MAX_SPEECH_RATE).contains(&rate) {
            return Err(ConfigError::invalid(format!(
                "speech rate {} outside {}..={}",
                rate, MIN_SPEECH_RATE, MAX_SPEECH_RATE
            )));
        }
        if self.speech.lang.trim().is_empty() {
            return Err(ConfigError::invalid("speech language tag is empty"));
        }
        Ok(())
    }
}
