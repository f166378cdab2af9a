//! Voice capture session
//!
//! An explicit handle on the speech-recognition engine with a
//! create/start/stop/dispose lifecycle. The session is owned by the caller
//! (the UI layer); the matcher and dispatcher never touch it directly.

use crate::config::RecognitionLanguage;
use crate::error::SessionError;

/// Speech-to-text engine boundary
pub trait RecognitionEngine {
    fn start(&mut self, language: RecognitionLanguage) -> Result<(), SessionError>;

    fn stop(&mut self);

    fn is_supported(&self) -> bool {
        true
    }
}

/// Engine for typed commands: nothing to start, always available.
#[derive(Debug, Clone, Default)]
pub struct ManualInput {
    active: bool,
}

impl ManualInput {
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl RecognitionEngine for ManualInput {
    fn start(&mut self, _language: RecognitionLanguage) -> Result<(), SessionError> {
        self.active = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.active = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Listening,
    Disposed,
}

/// One recognition session
#[derive(Debug)]
pub struct VoiceSession<E> {
    engine: E,
    state: SessionState,
    language: RecognitionLanguage,
    last_command: Option<String>,
}

impl<E: RecognitionEngine> VoiceSession<E> {
    pub fn new(engine: E, language: RecognitionLanguage) -> Self {
        Self {
            engine,
            state: SessionState::Idle,
            language,
            last_command: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == SessionState::Listening
    }

    pub fn language(&self) -> RecognitionLanguage {
        self.language
    }

    pub fn last_command(&self) -> Option<&str> {
        self.last_command.as_deref()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Start listening. Already listening is a no-op.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Disposed => return Err(SessionError::Disposed),
            SessionState::Listening => return Ok(()),
            SessionState::Idle => {}
        }
        if !self.engine.is_supported() {
            return Err(SessionError::Unsupported);
        }
        self.engine.start(self.language)?;
        self.state = SessionState::Listening;
        tracing::info!(language = self.language.tag(), "voice recognition started");
        Ok(())
    }

    /// Stop listening. Stopping an idle or disposed session does nothing.
    pub fn stop(&mut self) {
        if self.state == SessionState::Listening {
            self.engine.stop();
            self.state = SessionState::Idle;
            tracing::info!("voice recognition stopped");
        }
    }

    pub fn toggle(&mut self) -> Result<(), SessionError> {
        if self.is_listening() {
            self.stop();
            Ok(())
        } else {
            self.start()
        }
    }

    /// Switch language; a listening engine is restarted in the new language.
    pub fn set_language(&mut self, language: RecognitionLanguage) -> Result<(), SessionError> {
        if self.state == SessionState::Disposed {
            return Err(SessionError::Disposed);
        }
        self.language = language;
        if self.is_listening() {
            self.engine.stop();
            if let Err(err) = self.engine.start(language) {
                self.state = SessionState::Idle;
                return Err(err);
            }
        }
        tracing::info!(language = language.display_name(), "recognition language changed");
        Ok(())
    }

    /// Release the engine. The session cannot be restarted afterwards.
    pub fn dispose(&mut self) {
        self.stop();
        self.state = SessionState::Disposed;
    }

    /// Accept a finalized transcript from the engine.
    ///
    /// Returns the normalized command, or `None` when the session is not
    /// listening or the transcript is blank.
    pub fn deliver(&mut self, transcript: &str) -> Option<String> {
        if !self.is_listening() {
            return None;
        }
        let command = transcript.trim().to_lowercase();
        if command.is_empty() {
            return None;
        }
        self.last_command = Some(command.clone());
        Some(command)
    }
}
