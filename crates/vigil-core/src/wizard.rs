//! Multi-step report wizards
//!
//! A wizard is a linear state machine over an ordinal step counter
//! `1..=STEPS`. Moving forward checks the current step's required fields;
//! moving back never does. Once submitted, a wizard only accepts `reset`.

use serde::{Deserialize, Serialize};

use crate::models::FormFields;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("{field} is required")]
    MissingField { step: u8, field: &'static str },

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Consent is required to submit this report")]
    ConsentRequired,

    #[error("Form already submitted")]
    AlreadySubmitted,

    #[error("This form does not accept file attachments")]
    AttachmentsNotAllowed,

    #[error("Form is on step {current} of {total}; finish every step before submitting")]
    NotOnFinalStep { current: u8, total: u8 },
}

/// Form data driven by a `Wizard`.
pub trait WizardForm: Default + Clone {
    /// Number of steps, at least 1
    const STEPS: u8;
    /// Form name used for the relay subject line
    const FORM_NAME: &'static str;

    /// Check the fields collected on `step`.
    fn check_step(&self, step: u8) -> Result<(), WizardError>;

    /// Flatten the collected data into submission fields.
    fn to_fields(&self) -> FormFields;
}

fn required(value: &str, step: u8, field: &'static str) -> Result<(), WizardError> {
    if value.trim().is_empty() {
        Err(WizardError::MissingField { step, field })
    } else {
        Ok(())
    }
}

fn check_email(value: &str) -> Result<(), WizardError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(WizardError::InvalidEmail(value.to_string()))
    }
}

fn put(fields: &mut FormFields, key: &str, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        fields.set(key, value);
    }
}

/// Linear multi-step wizard state
#[derive(Debug, Clone)]
pub struct Wizard<F: WizardForm> {
    step: u8,
    form: F,
    submitted: bool,
}

impl<F: WizardForm> Default for Wizard<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: WizardForm> Wizard<F> {
    pub fn new() -> Self {
        Self {
            step: 1,
            form: F::default(),
            submitted: false,
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn total_steps(&self) -> u8 {
        F::STEPS
    }

    pub fn is_first_step(&self) -> bool {
        self.step == 1
    }

    pub fn is_final_step(&self) -> bool {
        self.step == F::STEPS
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    /// Mutable access to the form data. Fails once the wizard is submitted.
    pub fn form_mut(&mut self) -> Result<&mut F, WizardError> {
        if self.submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        Ok(&mut self.form)
    }

    /// Validate the current step and advance. Stays put on the final step.
    pub fn next(&mut self) -> Result<u8, WizardError> {
        if self.submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        self.form.check_step(self.step)?;
        if self.step < F::STEPS {
            self.step += 1;
        }
        Ok(self.step)
    }

    /// Go back one step. Stays put on the first step.
    pub fn back(&mut self) -> u8 {
        if !self.submitted && self.step > 1 {
            self.step -= 1;
        }
        self.step
    }

    /// Check that the wizard is ready to submit: on its final step, not yet
    /// submitted, and every step valid.
    pub fn ready(&self) -> Result<(), WizardError> {
        if self.submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        if !self.is_final_step() {
            return Err(WizardError::NotOnFinalStep {
                current: self.step,
                total: F::STEPS,
            });
        }
        (1..=F::STEPS).try_for_each(|step| self.form.check_step(step))
    }

    /// Enter the terminal state after a successful submission.
    pub fn mark_submitted(&mut self) -> Result<(), WizardError> {
        self.ready()?;
        self.submitted = true;
        Ok(())
    }

    /// Restore the initial state, discarding all entered data.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Who the scam report is about
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    #[default]
    Individual,
    Business,
}

impl SubjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectKind::Individual => "individual",
            SubjectKind::Business => "business",
        }
    }
}

/// Scam report: subject, incident, evidence, reporter.
///
/// Only the subject fields matching `subject_kind` are required and sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScamReportForm {
    pub subject_kind: SubjectKind,
    pub subject_name: String,
    pub subject_contact: String,
    pub business_name: String,
    pub business_website: String,
    pub scam_type: String,
    pub description: String,
    pub amount_lost: String,
    pub incident_date: String,
    pub evidence_notes: String,
    pub reporter_name: String,
    pub reporter_email: String,
    pub consent: bool,
}

impl WizardForm for ScamReportForm {
    const STEPS: u8 = 4;
    const FORM_NAME: &'static str = "Scam Report";

    fn check_step(&self, step: u8) -> Result<(), WizardError> {
        match step {
            1 => match self.subject_kind {
                SubjectKind::Individual => required(&self.subject_name, step, "Scammer name"),
                SubjectKind::Business => required(&self.business_name, step, "Business name"),
            },
            2 => {
                required(&self.scam_type, step, "Scam type")?;
                required(&self.description, step, "Description")
            }
            3 => Ok(()),
            4 => {
                check_email(&self.reporter_email)?;
                if self.consent {
                    Ok(())
                } else {
                    Err(WizardError::ConsentRequired)
                }
            }
            _ => Ok(()),
        }
    }

    fn to_fields(&self) -> FormFields {
        let mut fields = FormFields::new();
        put(&mut fields, "name", &self.reporter_name);
        put(&mut fields, "email", &self.reporter_email);
        put(&mut fields, "message", &self.description);
        put(&mut fields, "subject_type", self.subject_kind.as_str());
        match self.subject_kind {
            SubjectKind::Individual => {
                put(&mut fields, "subject_name", &self.subject_name);
                put(&mut fields, "subject_contact", &self.subject_contact);
            }
            SubjectKind::Business => {
                put(&mut fields, "business_name", &self.business_name);
                put(&mut fields, "business_website", &self.business_website);
            }
        }
        put(&mut fields, "scam_type", &self.scam_type);
        put(&mut fields, "amount_lost", &self.amount_lost);
        put(&mut fields, "incident_date", &self.incident_date);
        put(&mut fields, "evidence_notes", &self.evidence_notes);
        fields
    }
}

/// Abuse report against content on the platform: what, why, who.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbuseReportForm {
    pub reported_url: String,
    pub abuse_category: String,
    pub description: String,
    pub reporter_name: String,
    pub reporter_email: String,
}

impl WizardForm for AbuseReportForm {
    const STEPS: u8 = 3;
    const FORM_NAME: &'static str = "Abuse Report";

    fn check_step(&self, step: u8) -> Result<(), WizardError> {
        match step {
            1 => {
                required(&self.reported_url, step, "Reported page")?;
                required(&self.abuse_category, step, "Abuse category")
            }
            2 => required(&self.description, step, "Description"),
            3 => {
                required(&self.reporter_email, step, "Email")?;
                check_email(&self.reporter_email)
            }
            _ => Ok(()),
        }
    }

    fn to_fields(&self) -> FormFields {
        let mut fields = FormFields::new();
        put(&mut fields, "name", &self.reporter_name);
        put(&mut fields, "email", &self.reporter_email);
        put(&mut fields, "message", &self.description);
        put(&mut fields, "reported_url", &self.reported_url);
        put(&mut fields, "abuse_category", &self.abuse_category);
        fields
    }
}
