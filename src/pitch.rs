//! Sales pitch generation: prompt construction and the generative-text client.
//!
//! The client is configured from an explicit `PitchConfig`; there is no
//! process-wide client. `PitchService` (see `pitch_service`) wraps a client
//! with the in-flight guard and the fallback strings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::appointment::Appointment;
use crate::config::PitchConfig;

#[derive(Debug, thiserror::Error)]
pub enum PitchError {
    #[error("No API key configured for the generative text service")]
    MissingApiKey,

    #[error("Cannot reach generative text service at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Generative text service returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

/// A text-generation backend. `Ok(None)` means the call succeeded but the
/// response carried no text.
pub trait LlmClient {
    fn generate(&self, prompt: &str, temperature: f32) -> Result<Option<String>, PitchError>;
}

/// French prompt asking for a three-point pitch for the given appointment.
pub fn build_prompt(appointment: &Appointment) -> String {
    format!(
        "Tu es un assistant de vente expert.\n\
         Génère un court argumentaire de vente (pitch) de 3 points clés pour un commercial terrain qui va rencontrer le client suivant :\n\
         - Entreprise : {}\n\
         - Client : {}\n\
         - Motif : {}\n\
         - Notes : {}\n\
         \n\
         Le ton doit être professionnel et persuasif. Réponds en français.",
        appointment.company, appointment.client_name, appointment.purpose, appointment.notes
    )
}

// ─── Gemini wire types ────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if any.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }
}

// ─── Gemini client ────────────────────────────────────────────────────────────

/// Google Gemini `generateContent` client over blocking HTTP.
pub struct GeminiClient {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(config: &PitchConfig) -> Result<Self, PitchError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PitchError::HttpClient(e.to_string()))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl LlmClient for GeminiClient {
    fn generate(&self, prompt: &str, temperature: f32) -> Result<Option<String>, PitchError> {
        let api_key = self.api_key.as_deref().ok_or(PitchError::MissingApiKey)?;
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig { temperature },
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    PitchError::Connection(self.endpoint.clone())
                } else if e.is_timeout() {
                    PitchError::Timeout(self.timeout_secs)
                } else {
                    PitchError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PitchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| PitchError::ResponseParsing(e.to_string()))?;

        Ok(parsed.text())
    }
}

// ─── Test double ──────────────────────────────────────────────────────────────

#[cfg(test)]
pub use mock::MockLlmClient;

#[cfg(test)]
mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc::{Receiver, Sender};
    use std::sync::{Arc, Mutex};

    use super::{LlmClient, PitchError};

    enum MockReply {
        Text(String),
        Empty,
        Fail,
    }

    /// Scripted client: fixed reply, call counter, optional hold until released.
    pub struct MockLlmClient {
        reply: MockReply,
        calls: Arc<AtomicUsize>,
        last_prompt: Arc<Mutex<Option<String>>>,
        hold: Option<(Sender<()>, Mutex<Receiver<()>>)>,
    }

    impl MockLlmClient {
        pub fn new(response: &str) -> Self {
            Self::with_reply(MockReply::Text(response.to_string()))
        }

        pub fn empty() -> Self {
            Self::with_reply(MockReply::Empty)
        }

        pub fn failing() -> Self {
            Self::with_reply(MockReply::Fail)
        }

        fn with_reply(reply: MockReply) -> Self {
            Self {
                reply,
                calls: Arc::new(AtomicUsize::new(0)),
                last_prompt: Arc::new(Mutex::new(None)),
                hold: None,
            }
        }

        /// Block each call after it starts: `entered` is signalled, then the
        /// call waits for a message on `release`.
        pub fn held(mut self, entered: Sender<()>, release: Receiver<()>) -> Self {
            self.hold = Some((entered, Mutex::new(release)));
            self
        }

        pub fn call_counter(&self) -> Arc<AtomicUsize> {
            self.calls.clone()
        }

        pub fn last_prompt(&self) -> Arc<Mutex<Option<String>>> {
            self.last_prompt.clone()
        }
    }

    impl LlmClient for MockLlmClient {
        fn generate(&self, prompt: &str, _temperature: f32) -> Result<Option<String>, PitchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            if let Some((entered, release)) = &self.hold {
                entered.send(()).unwrap();
                release.lock().unwrap().recv().unwrap();
            }
            match &self.reply {
                MockReply::Text(text) => Ok(Some(text.clone())),
                MockReply::Empty => Ok(None),
                MockReply::Fail => Err(PitchError::Api {
                    status: 500,
                    body: "mock failure".into(),
                }),
            }
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
