//! HTTP endpoint handlers.
//!
//! JSON handlers live under `/api`; `html` serves the form page and its
//! plain-form actions. Every handler goes through `CoreState`.

pub mod appointment;
pub mod export;
pub mod health;
pub mod html;
pub mod pitch;
pub mod status;
