//! Spoken feedback output
//!
//! Playback itself belongs to an external engine; this module only defines the
//! boundary and two in-process implementations.

use serde::{Deserialize, Serialize};

use crate::config::SpeechSettings;
use crate::error::SpeechError;

/// One utterance to be spoken
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
    pub lang: String,
    pub rate: f32,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>, settings: &SpeechSettings) -> Self {
        Self {
            text: text.into(),
            lang: settings.lang.clone(),
            rate: settings.rate,
        }
    }
}

/// Text-to-speech boundary.
///
/// Implementations are last-write-wins: a new `speak` cancels whatever the
/// engine still has queued.
pub trait Speaker {
    fn speak(&mut self, request: &SpeechRequest) -> Result<(), SpeechError>;

    /// Drop any queued or playing utterance.
    fn cancel(&mut self) {}
}

impl<S: Speaker + ?Sized> Speaker for &mut S {
    fn speak(&mut self, request: &SpeechRequest) -> Result<(), SpeechError> {
        (**self).speak(request)
    }

    fn cancel(&mut self) {
        (**self).cancel()
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSpeaker;

impl Speaker for NullSpeaker {
    fn speak(&mut self, _request: &SpeechRequest) -> Result<(), SpeechError> {
        Ok(())
    }
}

/// Keeps every request it was asked to speak.
///
/// `current` is what an engine would actually be playing: the last request
/// since the most recent cancel.
#[derive(Debug, Clone, Default)]
pub struct RecordingSpeaker {
    history: Vec<SpeechRequest>,
    current: Option<SpeechRequest>,
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[SpeechRequest] {
        &self.history
    }

    /// Spoken texts in order
    pub fn texts(&self) -> Vec<&str> {
        self.history.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn current(&self) -> Option<&SpeechRequest> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.current = None;
    }
}

impl Speaker for RecordingSpeaker {
    fn speak(&mut self, request: &SpeechRequest) -> Result<(), SpeechError> {
        self.cancel();
        self.history.push(request.clone());
        self.current = Some(request.clone());
        Ok(())
    }

    fn cancel(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_speaker_last_write_wins() {
        let settings = SpeechSettings::default();
        let mut speaker = RecordingSpeaker::new();
        speaker.speak(&SpeechRequest::new("first", &settings)).unwrap();
        speaker.speak(&SpeechRequest::new("second", &settings)).unwrap();

        assert_eq!(speaker.texts(), vec!["first", "second"]);
        assert_eq!(speaker.current().map(|r| r.text.as_str()), Some("second"));
        assert_eq!(speaker.current().map(|r| r.lang.as_str()), Some("en-US"));

        speaker.cancel();
        assert!(speaker.current().is_none());
        assert_eq!(speaker.history().len(), 2);
    }

    fn greet<S: Speaker>(mut speaker: S) {
        let _ = speaker.speak(&SpeechRequest::new("hello", &SpeechSettings::default()));
    }

    #[test]
    fn test_speaker_through_mut_ref() {
        let mut speaker = RecordingSpeaker::new();
        greet(&mut speaker);
        assert_eq!(speaker.texts(), vec!["hello"]);
    }
}
