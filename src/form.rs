//! Form input control: one labeled field of the appointment form.
//!
//! Stateless: the value always comes from the caller's record. Every control
//! carries `data-field`, which the page script uses to report each edit as a
//! `(field, value)` change to the shell.

use crate::appointment::{Appointment, AppointmentField, SALES_REPS};

pub const SELECT_PLACEHOLDER: &str = "Sélectionner...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Presentation mode of a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// Single-line `<input>`; `input_type` is `text`, `tel`, `email`, `date` or `time`.
    Input { input_type: &'static str },
    TextArea,
    Select { options: Vec<SelectOption> },
}

#[derive(Debug, Clone)]
pub struct FormInput {
    pub label: &'static str,
    pub field: AppointmentField,
    pub value: String,
    pub required: bool,
    pub placeholder: &'static str,
    pub kind: InputKind,
}

const CONTROL_CLASS: &str = "control";

impl FormInput {
    pub fn text(label: &'static str, field: AppointmentField, value: &str) -> Self {
        Self {
            label,
            field,
            value: value.to_string(),
            required: false,
            placeholder: "",
            kind: InputKind::Input { input_type: "text" },
        }
    }

    pub fn input_type(mut self, input_type: &'static str) -> Self {
        self.kind = InputKind::Input { input_type };
        self
    }

    pub fn textarea(mut self) -> Self {
        self.kind = InputKind::TextArea;
        self
    }

    pub fn select(mut self, options: Vec<SelectOption>) -> Self {
        self.kind = InputKind::Select { options };
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Label plus control, as an HTML fragment.
    pub fn render(&self) -> String {
        let name = self.field.name();
        let required_mark = if self.required {
            r#" <span class="required">*</span>"#
        } else {
            ""
        };
        let required_attr = if self.required { " required" } else { "" };

        let control = match &self.kind {
            InputKind::Input { input_type } => format!(
                r#"<input id="{name}" name="{name}" type="{input_type}" value="{value}" placeholder="{placeholder}" class="{CONTROL_CLASS}" data-field="{name}"{required_attr}>"#,
                value = escape_html(&self.value),
                placeholder = escape_html(self.placeholder),
            ),
            InputKind::TextArea => format!(
                r#"<textarea id="{name}" name="{name}" rows="3" placeholder="{placeholder}" class="{CONTROL_CLASS}" data-field="{name}"{required_attr}>{value}</textarea>"#,
                value = escape_html(&self.value),
                placeholder = escape_html(self.placeholder),
            ),
            InputKind::Select { options } => {
                let mut html = format!(
                    r#"<select id="{name}" name="{name}" class="{CONTROL_CLASS}" data-field="{name}"{required_attr}>"#
                );
                html.push_str(&format!(r#"<option value="">{SELECT_PLACEHOLDER}</option>"#));
                for opt in options {
                    let selected = if opt.value == self.value { " selected" } else { "" };
                    html.push_str(&format!(
                        r#"<option value="{}"{selected}>{}</option>"#,
                        escape_html(&opt.value),
                        escape_html(&opt.label),
                    ));
                }
                html.push_str("</select>");
                html
            }
        };

        format!(
            r#"<div class="field"><label for="{name}">{label}{required_mark}</label>{control}</div>"#,
            label = escape_html(self.label),
        )
    }
}

/// Representative choices: value is the name, label adds the region.
pub fn sales_rep_options() -> Vec<SelectOption> {
    SALES_REPS
        .iter()
        .map(|rep| SelectOption {
            value: rep.name.to_string(),
            label: rep.label(),
        })
        .collect()
}

/// "Informations Client" section controls, in page order.
pub fn client_inputs(appt: &Appointment) -> Vec<FormInput> {
    use AppointmentField as F;
    vec![
        FormInput::text("Entreprise", F::Company, &appt.company)
            .required()
            .placeholder("Ex: Cogip Industries"),
        FormInput::text("Nom du contact", F::ClientName, &appt.client_name)
            .required()
            .placeholder("Ex: Mme. Jeanne Martin"),
        FormInput::text("Adresse complète", F::Address, &appt.address)
            .required()
            .placeholder("N°, rue, CP, Ville"),
        FormInput::text("Téléphone", F::Phone, &appt.phone)
            .input_type("tel")
            .placeholder("06 12 34 56 78"),
        FormInput::text("Email", F::Email, &appt.email)
            .input_type("email")
            .placeholder("contact@entreprise.fr"),
    ]
}

/// "Détails du RDV" section controls, in page order (notes last).
pub fn detail_inputs(appt: &Appointment) -> Vec<FormInput> {
    use AppointmentField as F;
    vec![
        FormInput::text("Date du RDV", F::Date, &appt.date)
            .input_type("date")
            .required(),
        FormInput::text("Heure", F::Time, &appt.time)
            .input_type("time")
            .required(),
        FormInput::text("Commercial", F::SalesRep, &appt.sales_rep)
            .select(sales_rep_options())
            .required(),
        FormInput::text("Motif du rendez-vous", F::Purpose, &appt.purpose)
            .required()
            .placeholder("Ex: Présentation gamme 2024"),
        FormInput::text("Notes additionnelles", F::Notes, &appt.notes)
            .textarea()
            .placeholder("Points spécifiques à aborder, historique..."),
    ]
}

/// All ten controls of the form.
pub fn form_inputs(appt: &Appointment) -> Vec<FormInput> {
    let mut inputs = client_inputs(appt);
    inputs.extend(detail_inputs(appt));
    inputs
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
