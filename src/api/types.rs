//! Shared types for the HTTP layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::appointment::{Appointment, SalesRep};
use crate::core_state::{CoreState, PitchState};

/// Shared context for all routes.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

// ═══════════════════════════════════════════════════════════
// Request bodies
// ═══════════════════════════════════════════════════════════

/// `PATCH /api/appointment` body: one `(field, value)` change.
#[derive(Debug, Deserialize)]
pub struct FieldUpdate {
    pub field: String,
    pub value: String,
}

/// Query string of the export endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    /// Also write the artifact to the exports directory.
    #[serde(default)]
    pub save: bool,
}

// ═══════════════════════════════════════════════════════════
// Response bodies
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub appointment: Appointment,
}

#[derive(Debug, Serialize)]
pub struct SalesRepView {
    pub id: &'static str,
    pub name: &'static str,
    pub region: &'static str,
    pub label: String,
}

impl From<&SalesRep> for SalesRepView {
    fn from(rep: &SalesRep) -> Self {
        Self {
            id: rep.id,
            name: rep.name,
            region: rep.region,
            label: rep.label(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchResponse {
    pub pitch: PitchState,
}
