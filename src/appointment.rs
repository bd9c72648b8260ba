//! Appointment record, the single sales-visit entity edited by the form,
//! plus the static sales representative reference list.
//!
//! Exactly one `Appointment` lives in memory (see `core_state`). Edits are
//! merge-on-write: one field replaced, every other field untouched.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Default appointment time for a freshly initialized record.
pub const DEFAULT_TIME: &str = "09:00";

// ─── Types ────────────────────────────────────────────────────────────────────

/// The appointment being edited. Serialized with the original camelCase keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Always empty; no identity is assigned to the single record.
    pub id: String,
    pub client_name: String,
    pub company: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub sales_rep: String,
    pub date: String, // YYYY-MM-DD
    pub time: String, // HH:MM
    pub purpose: String,
    pub notes: String,
    /// RFC 3339 UTC timestamp, set once at initialization.
    pub created_at: String,
}

/// The ten editable fields, keyed by their wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AppointmentField {
    ClientName,
    Company,
    Address,
    Phone,
    Email,
    SalesRep,
    Date,
    Time,
    Purpose,
    Notes,
}

impl AppointmentField {
    pub const ALL: [AppointmentField; 10] = [
        Self::ClientName,
        Self::Company,
        Self::Address,
        Self::Phone,
        Self::Email,
        Self::SalesRep,
        Self::Date,
        Self::Time,
        Self::Purpose,
        Self::Notes,
    ];

    /// Wire / form name of the field.
    pub fn name(self) -> &'static str {
        match self {
            Self::ClientName => "clientName",
            Self::Company => "company",
            Self::Address => "address",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::SalesRep => "salesRep",
            Self::Date => "date",
            Self::Time => "time",
            Self::Purpose => "purpose",
            Self::Notes => "notes",
        }
    }

    /// Resolve a form field name. `id` and `createdAt` are not editable.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl std::fmt::Display for AppointmentField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Static reference entry for a sales representative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SalesRep {
    pub id: &'static str,
    pub name: &'static str,
    pub region: &'static str,
}

impl SalesRep {
    /// Display label used by the representative selector.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.region)
    }
}

pub const SALES_REPS: &[SalesRep] = &[
    SalesRep { id: "1", name: "Jean Dupont", region: "Nord" },
    SalesRep { id: "2", name: "Marie Leroy", region: "Sud" },
    SalesRep { id: "3", name: "Thomas Bernard", region: "Est" },
    SalesRep { id: "4", name: "Sophie Petit", region: "Ouest" },
];

// ─── Record lifecycle ─────────────────────────────────────────────────────────

impl Appointment {
    /// Fresh record dated today (UTC) with the default time.
    pub fn new() -> Self {
        Self::new_at(Utc::now())
    }

    /// Fresh record initialized from a fixed instant.
    pub fn new_at(now: DateTime<Utc>) -> Self {
        Self {
            id: String::new(),
            client_name: String::new(),
            company: String::new(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            sales_rep: String::new(),
            date: now.format("%Y-%m-%d").to_string(),
            time: DEFAULT_TIME.to_string(),
            purpose: String::new(),
            notes: String::new(),
            created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Current value of an editable field.
    pub fn field(&self, field: AppointmentField) -> &str {
        match field {
            AppointmentField::ClientName => &self.client_name,
            AppointmentField::Company => &self.company,
            AppointmentField::Address => &self.address,
            AppointmentField::Phone => &self.phone,
            AppointmentField::Email => &self.email,
            AppointmentField::SalesRep => &self.sales_rep,
            AppointmentField::Date => &self.date,
            AppointmentField::Time => &self.time,
            AppointmentField::Purpose => &self.purpose,
            AppointmentField::Notes => &self.notes,
        }
    }

    /// Merge-on-write: replace one field, leave the rest untouched.
    pub fn set_field(&mut self, field: AppointmentField, value: impl Into<String>) {
        let slot = match field {
            AppointmentField::ClientName => &mut self.client_name,
            AppointmentField::Company => &mut self.company,
            AppointmentField::Address => &mut self.address,
            AppointmentField::Phone => &mut self.phone,
            AppointmentField::Email => &mut self.email,
            AppointmentField::SalesRep => &mut self.sales_rep,
            AppointmentField::Date => &mut self.date,
            AppointmentField::Time => &mut self.time,
            AppointmentField::Purpose => &mut self.purpose,
            AppointmentField::Notes => &mut self.notes,
        };
        *slot = value.into();
    }

    /// Pitch generation needs at least a company and a purpose.
    pub fn has_pitch_inputs(&self) -> bool {
        !self.company.is_empty() && !self.purpose.is_empty()
    }
}

impl Default for Appointment {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
