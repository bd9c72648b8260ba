//! Server-rendered form page.
//!
//! Self-contained HTML (no external resources). The inline script reports
//! every edit to `PATCH /api/appointment`, keeps the submit state fresh while
//! it is pending, and hides the success notice after its duration.

use crate::appointment::Appointment;
use crate::config::APP_NAME;
use crate::core_state::{PitchState, ShellStatus};
use crate::form::{client_inputs, detail_inputs, escape_html, FormInput};

pub const SUBMIT_LABEL: &str = "Valider le Rendez-vous";
pub const SUBMIT_PENDING_LABEL: &str = "Validation...";
pub const GENERATE_PITCH_LABEL: &str = "Générer Pitch Commercial";
pub const GENERATING_PITCH_LABEL: &str = "Génération...";
pub const CLEAR_PITCH_LABEL: &str = "Effacer / Recommencer";
pub const FOOTER_TEXT: &str = "© 2024 FieldFlow Pro - Solution de mobilité commerciale";

/// Everything the page needs for one render.
pub struct PageContext<'a> {
    pub appointment: &'a Appointment,
    pub status: &'a ShellStatus,
    /// Blocking alert shown above the form (e.g. missing pitch inputs).
    pub alert: Option<&'a str>,
    /// Milliseconds before the success notice is hidden client-side.
    pub notice_ms: u128,
}

pub fn render_page(ctx: &PageContext<'_>) -> String {
    let client_fields = render_inputs(&client_inputs(ctx.appointment));
    let detail_fields = render_inputs(&detail_inputs(ctx.appointment));
    let (notes, details) = detail_fields
        .split_last()
        .map(|(last, rest)| (last.clone(), rest.join("\n")))
        .unwrap_or_default();
    let client_fields = client_fields.join("\n");

    let submitting = ctx.status.submitting;
    let submit_label = if submitting { SUBMIT_PENDING_LABEL } else { SUBMIT_LABEL };
    let submit_disabled = if submitting { " disabled" } else { "" };
    let refresh = if submitting {
        r#"<meta http-equiv="refresh" content="1">"#
    } else {
        ""
    };

    let alert = ctx
        .alert
        .map(|msg| format!(r#"<div class="alert" role="alert">{}</div>"#, escape_html(msg)))
        .unwrap_or_default();
    let notice = ctx
        .status
        .success_message
        .as_deref()
        .map(|msg| format!(r#"<div class="notice" id="notice">{}</div>"#, escape_html(msg)))
        .unwrap_or_default();
    let pitch_card = render_pitch_card(&ctx.status.pitch);
    let notice_ms = ctx.notice_ms;

    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{refresh}
<title>{APP_NAME}</title>
<style>{PAGE_STYLE}</style>
</head>
<body>
<div class="page">
<header>
  <h1>{APP_NAME}</h1>
  <p class="subtitle">Saisie de Rendez-vous Commercial Terrain</p>
</header>
{alert}
<div class="layout">
  <form class="card" method="post" action="/submit">
    <h2>Informations Client</h2>
    <div class="grid">
{client_fields}
    </div>
    <h2>Détails du RDV</h2>
    <div class="grid">
{details}
    </div>
{notes}
    <button type="submit" class="btn btn-primary"{submit_disabled}>{submit_label}</button>
  </form>
  <aside>
    <div class="card">
      <h3>Exportations</h3>
      <a class="btn btn-dark" href="/api/export/pdf" data-after-edits>Générer PDF Imprimable</a>
      <a class="btn btn-light" href="/api/export/csv" data-after-edits>Exporter CSV</a>
    </div>
{pitch_card}
{notice}
  </aside>
</div>
<footer><p>{FOOTER_TEXT}</p></footer>
</div>
<script>
var edits = Promise.resolve();
document.querySelectorAll('[data-field]').forEach(function (el) {{
  var send = function () {{
    var body = JSON.stringify({{ field: el.dataset.field, value: el.value }});
    edits = edits.then(function () {{
      return fetch('/api/appointment', {{
        method: 'PATCH',
        headers: {{ 'Content-Type': 'application/json' }},
        body: body
      }});
    }}).catch(function () {{}});
  }};
  el.addEventListener('input', send);
  el.addEventListener('change', send);
}});
document.querySelectorAll('a[data-after-edits]').forEach(function (a) {{
  a.addEventListener('click', function (ev) {{
    ev.preventDefault();
    edits.then(function () {{ window.location.href = a.href; }});
  }});
}});
document.querySelectorAll('form[data-after-edits]').forEach(function (form) {{
  form.addEventListener('submit', function (ev) {{
    ev.preventDefault();
    edits.then(function () {{ form.submit(); }});
  }});
}});
var notice = document.getElementById('notice');
if (notice) {{ setTimeout(function () {{ notice.remove(); }}, {notice_ms}); }}
</script>
</body>
</html>"#
    )
}

fn render_inputs(inputs: &[FormInput]) -> Vec<String> {
    inputs.iter().map(FormInput::render).collect()
}

fn render_pitch_card(pitch: &PitchState) -> String {
    let body = match pitch {
        PitchState::Idle => format!(
            r#"<form method="post" action="/pitch" data-after-edits><button type="submit" class="btn btn-ai">{GENERATE_PITCH_LABEL}</button></form>"#
        ),
        PitchState::Generating => format!(
            r#"<button type="button" class="btn btn-ai" disabled>{GENERATING_PITCH_LABEL}</button>"#
        ),
        PitchState::Shown(text) => format!(
            r#"<div class="pitch"><div class="pitch-title">Votre Argumentaire :</div>{}<form method="post" action="/pitch/clear"><button type="submit" class="link">{CLEAR_PITCH_LABEL}</button></form></div>"#,
            escape_html(text)
        ),
    };
    format!(
        r#"<div class="card ai">
      <h3>IA Sales Assistant</h3>
      <p class="hint">Laissez l'IA préparer votre argumentaire en fonction du motif de RDV.</p>
      {body}
    </div>"#
    )
}

const PAGE_STYLE: &str = r#"
*,*::before,*::after{box-sizing:border-box}
body{margin:0;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;background:#f8fafc;color:#0f172a}
.page{max-width:1100px;margin:0 auto;padding:32px 16px}
header{text-align:center;margin-bottom:32px}
h1{font-size:2.25rem;margin:0;color:#1e40af}
.subtitle{color:#64748b;margin:8px 0 0}
.layout{display:grid;grid-template-columns:2fr 1fr;gap:24px}
@media (max-width:800px){.layout{grid-template-columns:1fr}}
.card{background:#fff;border-radius:16px;box-shadow:0 1px 3px rgba(0,0,0,.08);padding:24px;margin-bottom:24px}
.card.ai{background:linear-gradient(135deg,#eef2ff,#eff6ff);border:1px solid #dbeafe}
h2{font-size:1.25rem;border-bottom:1px solid #f1f5f9;padding-bottom:12px}
h3{font-size:1.1rem;margin:0 0 12px}
.grid{display:grid;grid-template-columns:1fr 1fr;gap:16px}
.field{display:flex;flex-direction:column;margin-bottom:16px}
label{font-size:.875rem;font-weight:500;color:#334155;margin-bottom:4px}
.required{color:#ef4444}
.control{padding:10px 12px;border:1px solid #cbd5e1;border-radius:8px;font-size:.95rem;font-family:inherit}
.btn{display:block;width:100%;padding:12px;border:none;border-radius:10px;font-weight:600;text-align:center;text-decoration:none;cursor:pointer;margin-bottom:12px;font-size:.9rem}
.btn:disabled{opacity:.7;cursor:not-allowed}
.btn-primary{background:#2563eb;color:#fff}
.btn-dark{background:#1e293b;color:#fff}
.btn-light{background:#fff;color:#334155;border:1px solid #cbd5e1}
.btn-ai{background:#4f46e5;color:#fff;text-transform:uppercase;font-size:.75rem;letter-spacing:.05em}
.hint{font-size:.875rem;color:#4338ca;font-style:italic}
.pitch{background:#fff;border:1px solid #e0e7ff;border-radius:12px;padding:16px;white-space:pre-wrap;font-size:.875rem}
.pitch-title{font-weight:700;color:#4f46e5;font-size:.75rem;text-transform:uppercase;margin-bottom:8px}
.link{background:none;border:none;color:#818cf8;font-size:.75rem;cursor:pointer;padding:0;margin-top:12px}
.alert{background:#fef2f2;border:1px solid #fecaca;color:#991b1b;padding:12px 16px;border-radius:12px;margin-bottom:24px}
.notice{background:#ecfdf5;border:1px solid #a7f3d0;color:#065f46;padding:12px 16px;border-radius:12px;font-size:.875rem}
footer{text-align:center;color:#94a3b8;font-size:.875rem;margin-top:48px}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_state::SUBMIT_SUCCESS_MESSAGE;

    fn idle_status() -> ShellStatus {
        ShellStatus {
            submitting: false,
            success_message: None,
            pitch: PitchState::Idle,
        }
    }

    fn render(appt: &Appointment, status: &ShellStatus, alert: Option<&str>) -> String {
        render_page(&PageContext {
            appointment: appt,
            status,
            alert,
            notice_ms: 5000,
        })
    }

    #[test]
    fn idle_page_has_all_sections() {
        let html = render(&Appointment::default(), &idle_status(), None);
        for text in [
            "<h1>FieldFlow</h1>",
            "Saisie de Rendez-vous Commercial Terrain",
            "Informations Client",
            "Détails du RDV",
            "Exportations",
            "Générer PDF Imprimable",
            "Exporter CSV",
            "IA Sales Assistant",
            GENERATE_PITCH_LABEL,
            SUBMIT_LABEL,
            FOOTER_TEXT,
        ] {
            assert!(html.contains(text), "missing {text}");
        }
        assert!(!html.contains(r#"role="alert""#));
        assert!(!html.contains(r#"id="notice""#));
        assert!(!html.contains("http-equiv"));
    }

    #[test]
    fn every_field_is_wired_to_the_change_notifier() {
        let html = render(&Appointment::default(), &idle_status(), None);
        assert_eq!(html.matches("data-field=\"").count(), 10);
        assert!(html.contains("method: 'PATCH'"));
    }

    #[test]
    fn edits_are_sent_in_order_before_exports_and_pitch() {
        let html = render(&Appointment::default(), &idle_status(), None);
        // Each PATCH is chained on the previous one.
        assert!(html.contains("edits = edits.then(function () {"));
        assert!(html.contains(r#"href="/api/export/pdf" data-after-edits"#));
        assert!(html.contains(r#"href="/api/export/csv" data-after-edits"#));
        assert!(html.contains(r#"action="/pitch" data-after-edits"#));
        // Clearing the pitch reads no form data.
        assert!(!html.contains(r#"action="/pitch/clear" data-after-edits"#));
    }

    #[test]
    fn notes_follow_the_detail_grid() {
        let html = render(&Appointment::default(), &idle_status(), None);
        let purpose = html.find(r#"id="purpose""#).unwrap();
        let notes = html.find(r#"id="notes""#).unwrap();
        let submit = html.find(SUBMIT_LABEL).unwrap();
        assert!(purpose < notes && notes < submit);
    }

    #[test]
    fn submitting_disables_button_and_refreshes() {
        let status = ShellStatus {
            submitting: true,
            ..idle_status()
        };
        let html = render(&Appointment::default(), &status, None);
        assert!(html.contains(&format!("disabled>{SUBMIT_PENDING_LABEL}</button>")));
        assert!(html.contains(r#"http-equiv="refresh""#));
    }

    #[test]
    fn success_notice_is_shown() {
        let status = ShellStatus {
            success_message: Some(SUBMIT_SUCCESS_MESSAGE.into()),
            ..idle_status()
        };
        let html = render(&Appointment::default(), &status, None);
        assert!(html.contains("Rendez-vous validé !"));
        assert!(html.contains("}, 5000);"));
    }

    #[test]
    fn shown_pitch_replaces_trigger_with_text_and_clear() {
        let status = ShellStatus {
            pitch: PitchState::Shown("1. <Qualité>".into()),
            ..idle_status()
        };
        let html = render(&Appointment::default(), &status, None);
        assert!(html.contains("Votre Argumentaire :"));
        assert!(html.contains("1. &lt;Qualité&gt;"));
        assert!(html.contains(CLEAR_PITCH_LABEL));
        assert!(!html.contains(GENERATE_PITCH_LABEL));
    }

    #[test]
    fn generating_pitch_disables_trigger() {
        let status = ShellStatus {
            pitch: PitchState::Generating,
            ..idle_status()
        };
        let html = render(&Appointment::default(), &status, None);
        assert!(html.contains(&format!("disabled>{GENERATING_PITCH_LABEL}</button>")));
    }

    #[test]
    fn alert_is_escaped() {
        let html = render(&Appointment::default(), &idle_status(), Some("<b>Attention</b>"));
        assert!(html.contains(r#"<div class="alert" role="alert">&lt;b&gt;Attention&lt;/b&gt;</div>"#));
    }
}
