//! Pitch service: single point of access to the generative-text client.
//!
//! Only one pitch request may be in flight. A duplicate trigger arriving while
//! a request runs is ignored here, at the service layer, regardless of what
//! the UI allows. Every completed request yields a displayable string: the
//! generated pitch or one of two fixed fallbacks.

use std::sync::{Mutex, MutexGuard};

use crate::appointment::Appointment;
use crate::pitch::{build_prompt, LlmClient};

/// Shown when the service answered without any text.
pub const EMPTY_PITCH_FALLBACK: &str = "Impossible de générer un argumentaire pour le moment.";
/// Shown when the call failed (transport, auth, API error, bad payload).
pub const ERROR_PITCH_FALLBACK: &str = "Erreur lors de la génération de l'argumentaire.";

// ═══════════════════════════════════════════════════════════
// PitchService
// ═══════════════════════════════════════════════════════════

pub struct PitchService {
    client: Box<dyn LlmClient + Send + Sync>,
    temperature: f32,
    /// Exclusive access lock, only one request at a time.
    lock: Mutex<()>,
}

impl PitchService {
    pub fn new(client: Box<dyn LlmClient + Send + Sync>, temperature: f32) -> Self {
        Self {
            client,
            temperature,
            lock: Mutex::new(()),
        }
    }

    /// Generate a pitch for `appointment`, blocking until the client answers.
    ///
    /// Returns `None` without calling the client when another request is
    /// already in flight. Performs no input validation: empty fields are
    /// interpolated into the prompt as-is.
    pub fn try_generate(&self, appointment: &Appointment) -> Option<String> {
        let Some(_guard) = self.try_acquire() else {
            tracing::debug!("Pitch request already in flight, duplicate ignored");
            return None;
        };

        let prompt = build_prompt(appointment);
        let text = match self.client.generate(&prompt, self.temperature) {
            Ok(Some(text)) if !text.is_empty() => {
                tracing::info!(chars = text.chars().count(), "Pitch generated");
                text
            }
            Ok(_) => {
                tracing::warn!("Pitch response carried no text");
                EMPTY_PITCH_FALLBACK.to_string()
            }
            Err(e) => {
                tracing::error!(error = %e, "Pitch generation failed");
                ERROR_PITCH_FALLBACK.to_string()
            }
        };
        Some(text)
    }

    /// Is a request currently in flight?
    pub fn is_busy(&self) -> bool {
        self.lock.try_lock().is_err()
    }

    // ── Internal ────────────────────────────────────────────

    fn try_acquire(&self) -> Option<PitchGuard<'_>> {
        let guard = self.lock.try_lock().ok()?;
        Some(PitchGuard { _guard: guard })
    }
}

// ═══════════════════════════════════════════════════════════
// PitchGuard RAII in-flight token
// ═══════════════════════════════════════════════════════════

/// Held for the duration of one request; dropping it frees the service.
struct PitchGuard<'a> {
    _guard: MutexGuard<'a, ()>,
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
