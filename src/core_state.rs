//! Application state shared by every HTTP handler.
//!
//! `CoreState` owns the single in-memory appointment plus the two transient
//! UI state machines (submit acknowledgment and pitch generation). Handlers
//! only ever reach the export and pitch services through it.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, Weak};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::appointment::{Appointment, AppointmentField};
use crate::config;
use crate::export::{self, ExportError, ExportFormat};
use crate::pitch_service::PitchService;

/// Shown once the simulated submit has been acknowledged.
pub const SUBMIT_SUCCESS_MESSAGE: &str =
    "Rendez-vous validé ! Vous pouvez maintenant exporter les documents.";
/// Alert raised when a pitch is requested without company or purpose.
pub const MISSING_PITCH_FIELDS_MESSAGE: &str =
    "Veuillez au moins remplir l'entreprise et le motif du RDV.";

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Pitch generation lifecycle: `Idle → Generating → Shown → Idle` (via clear).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "text", rename_all = "camelCase")]
pub enum PitchState {
    Idle,
    Generating,
    Shown(String),
}

/// Timings of the simulated submit.
#[derive(Debug, Clone, Copy)]
pub struct SubmitTimings {
    /// Pending period before the acknowledgment.
    pub delay: Duration,
    /// How long the success notice stays up.
    pub notice: Duration,
}

impl Default for SubmitTimings {
    fn default() -> Self {
        Self {
            delay: config::SUBMIT_DELAY,
            notice: config::SUBMIT_NOTICE_DURATION,
        }
    }
}

#[derive(Debug, Default)]
struct SubmitState {
    submitting: bool,
    success_message: Option<&'static str>,
    /// Bumped by every accepted submit; timers only act on their own sequence.
    sequence: u64,
}

/// Snapshot of the transient UI state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellStatus {
    pub submitting: bool,
    pub success_message: Option<String>,
    pub pitch: PitchState,
}

/// A generated CSV or PDF, ready to be downloaded or saved.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{}", MISSING_PITCH_FIELDS_MESSAGE)]
    MissingPitchFields,
    #[error("A pitch is already displayed; clear it before generating a new one")]
    PitchAlreadyShown,
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
    #[error("Background task failed: {0}")]
    Task(String),
}

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    appointment: RwLock<Appointment>,
    pitch: Mutex<PitchState>,
    submit: Mutex<SubmitState>,
    /// Pending submit timer; aborted on shutdown or superseded.
    submit_timer: Mutex<Option<JoinHandle<()>>>,
    pitch_service: Arc<PitchService>,
    /// Where `?save=true` exports are written.
    pub exports_dir: PathBuf,
    pub timings: SubmitTimings,
}

impl CoreState {
    pub fn new(pitch_service: PitchService, exports_dir: PathBuf) -> Self {
        Self {
            appointment: RwLock::new(Appointment::new()),
            pitch: Mutex::new(PitchState::Idle),
            submit: Mutex::new(SubmitState::default()),
            submit_timer: Mutex::new(None),
            pitch_service: Arc::new(pitch_service),
            exports_dir,
            timings: SubmitTimings::default(),
        }
    }

    pub fn with_timings(mut self, timings: SubmitTimings) -> Self {
        self.timings = timings;
        self
    }

    // ── Record ──────────────────────────────────────────────

    /// Snapshot of the current record.
    pub fn appointment(&self) -> Result<Appointment, CoreError> {
        self.appointment
            .read()
            .map(|appt| appt.clone())
            .map_err(|_| CoreError::LockPoisoned)
    }

    /// Merge-on-write: replace one field, keep every other field.
    pub fn update_field(
        &self,
        field: AppointmentField,
        value: impl Into<String>,
    ) -> Result<Appointment, CoreError> {
        let mut appt = self.appointment.write().map_err(|_| CoreError::LockPoisoned)?;
        appt.set_field(field, value);
        tracing::debug!(field = %field, "Appointment field updated");
        Ok(appt.clone())
    }

    /// Apply several edits under one write lock.
    pub fn update_fields<I, V>(&self, edits: I) -> Result<Appointment, CoreError>
    where
        I: IntoIterator<Item = (AppointmentField, V)>,
        V: Into<String>,
    {
        let mut appt = self.appointment.write().map_err(|_| CoreError::LockPoisoned)?;
        for (field, value) in edits {
            appt.set_field(field, value);
        }
        Ok(appt.clone())
    }

    // ── Status ──────────────────────────────────────────────

    pub fn status(&self) -> Result<ShellStatus, CoreError> {
        let (submitting, success_message) = {
            let submit = self.lock_submit()?;
            (submit.submitting, submit.success_message.map(str::to_string))
        };
        let pitch = self.lock_pitch()?.clone();
        Ok(ShellStatus {
            submitting,
            success_message,
            pitch,
        })
    }

    // ── Submit ──────────────────────────────────────────────

    /// Simulated validation: pending now, acknowledged after `timings.delay`,
    /// notice cleared after a further `timings.notice`. Nothing is persisted.
    ///
    /// A submit while one is pending is ignored. Must be called from within
    /// a tokio runtime.
    pub fn submit(self: &Arc<Self>) -> Result<ShellStatus, CoreError> {
        let sequence = {
            let mut submit = self.lock_submit()?;
            if submit.submitting {
                tracing::debug!("Submit already pending, ignored");
                drop(submit);
                return self.status();
            }
            submit.sequence += 1;
            submit.submitting = true;
            submit.success_message = None;
            submit.sequence
        };
        tracing::info!(sequence, "Appointment submit started");

        let weak = Arc::downgrade(self);
        let timings = self.timings;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(timings.delay).await;
            if !with_live(&weak, |state| state.acknowledge_submit(sequence)) {
                return;
            }
            tokio::time::sleep(timings.notice).await;
            with_live(&weak, |state| state.clear_notice(sequence));
        });

        if let Ok(mut timer) = self.submit_timer.lock() {
            if let Some(previous) = timer.replace(handle) {
                previous.abort();
            }
        }

        self.status()
    }

    /// Returns false when the timer should stop (stale or superseded).
    fn acknowledge_submit(&self, sequence: u64) -> bool {
        let Ok(mut submit) = self.submit.lock() else {
            return false;
        };
        if submit.sequence != sequence {
            return false;
        }
        submit.submitting = false;
        submit.success_message = Some(SUBMIT_SUCCESS_MESSAGE);
        tracing::info!(sequence, "Appointment submit acknowledged");
        true
    }

    fn clear_notice(&self, sequence: u64) -> bool {
        let Ok(mut submit) = self.submit.lock() else {
            return false;
        };
        if submit.sequence == sequence {
            submit.success_message = None;
        }
        true
    }

    // ── Pitch ───────────────────────────────────────────────

    /// Generate a pitch for the current record.
    ///
    /// Requires non-empty `company` and `purpose`; otherwise no call is made
    /// and the pitch state is untouched. While a request is running, further
    /// requests report `Generating` without issuing another call.
    pub async fn request_pitch(self: &Arc<Self>) -> Result<PitchState, CoreError> {
        let appointment = self.appointment()?;
        if !appointment.has_pitch_inputs() {
            tracing::debug!("Pitch requested without company or purpose");
            return Err(CoreError::MissingPitchFields);
        }

        {
            let mut pitch = self.lock_pitch()?;
            match &*pitch {
                PitchState::Idle => *pitch = PitchState::Generating,
                PitchState::Generating => return Ok(PitchState::Generating),
                PitchState::Shown(_) => return Err(CoreError::PitchAlreadyShown),
            }
        }

        // Detached so that a dropped request still settles the state.
        let state = Arc::clone(self);
        let job = tokio::spawn(async move {
            let service = Arc::clone(&state.pitch_service);
            let result = tokio::task::spawn_blocking(move || service.try_generate(&appointment)).await;
            state.settle_pitch(result)
        });

        job.await.map_err(|e| CoreError::Task(e.to_string()))?
    }

    fn settle_pitch(
        &self,
        result: Result<Option<String>, tokio::task::JoinError>,
    ) -> Result<PitchState, CoreError> {
        let mut pitch = self.lock_pitch()?;
        match result {
            Ok(Some(text)) => {
                *pitch = PitchState::Shown(text);
                Ok(pitch.clone())
            }
            Ok(None) => {
                *pitch = PitchState::Idle;
                Ok(PitchState::Idle)
            }
            Err(e) => {
                *pitch = PitchState::Idle;
                tracing::error!(error = %e, "Pitch task failed");
                Err(CoreError::Task(e.to_string()))
            }
        }
    }

    /// Is a generation call currently running?
    pub fn pitch_in_flight(&self) -> bool {
        self.pitch_service.is_busy()
    }

    /// Discard a shown pitch. No effect while idle or generating.
    pub fn clear_pitch(&self) -> Result<PitchState, CoreError> {
        let mut pitch = self.lock_pitch()?;
        if matches!(*pitch, PitchState::Shown(_)) {
            *pitch = PitchState::Idle;
            tracing::debug!("Pitch cleared");
        }
        Ok(pitch.clone())
    }

    // ── Exports ─────────────────────────────────────────────

    pub fn export_csv(&self) -> Result<ExportArtifact, CoreError> {
        let appointment = self.appointment()?;
        Ok(ExportArtifact {
            format: ExportFormat::Csv,
            filename: export::export_filename(&appointment, ExportFormat::Csv),
            bytes: export::to_csv(&appointment).into_bytes(),
        })
    }

    pub fn export_pdf(&self) -> Result<ExportArtifact, CoreError> {
        let appointment = self.appointment()?;
        let generated_at = chrono::Local::now().naive_local();
        let pdf = export::to_pdf(&appointment, generated_at)?;
        tracing::debug!(pages = pdf.layout.page_count, "PDF rendered");
        Ok(ExportArtifact {
            format: ExportFormat::Pdf,
            filename: export::export_filename(&appointment, ExportFormat::Pdf),
            bytes: pdf.bytes,
        })
    }

    /// Write an artifact under `exports_dir`.
    pub fn save_artifact(&self, artifact: &ExportArtifact) -> Result<PathBuf, CoreError> {
        Ok(export::save_export(
            &artifact.bytes,
            &artifact.filename,
            Path::new(&self.exports_dir),
        )?)
    }

    // ── Lifecycle ───────────────────────────────────────────

    /// Cancel any pending submit timer.
    pub fn shutdown(&self) {
        if let Ok(mut timer) = self.submit_timer.lock() {
            if let Some(handle) = timer.take() {
                handle.abort();
                tracing::debug!("Pending submit timer aborted");
            }
        }
    }

    fn lock_submit(&self) -> Result<MutexGuard<'_, SubmitState>, CoreError> {
        self.submit.lock().map_err(|_| CoreError::LockPoisoned)
    }

    fn lock_pitch(&self) -> Result<MutexGuard<'_, PitchState>, CoreError> {
        self.pitch.lock().map_err(|_| CoreError::LockPoisoned)
    }
}

/// Run `f` if the state is still alive; false when it has been dropped.
fn with_live(weak: &Weak<CoreState>, f: impl FnOnce(&CoreState) -> bool) -> bool {
    match weak.upgrade() {
        Some(state) => f(&state),
        None => false,
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
