//! Wizard sessions bound to a form submitter

use std::sync::Arc;
use std::time::Duration;
use vigil_core::{CandidateFile, RejectedFile, Wizard, WizardError, WizardForm};

use crate::submitter::FormSubmitter;

/// Delay before a submitted wizard clears itself
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_secs(3);

/// A wizard plus the evidence files selected so far.
pub struct WizardSession<F: WizardForm> {
    wizard: Wizard<F>,
    submitter: Arc<FormSubmitter>,
    attachments: Vec<CandidateFile>,
    reset_delay: Duration,
}

impl<F: WizardForm> WizardSession<F> {
    pub fn new(submitter: Arc<FormSubmitter>) -> Self {
        Self {
            wizard: Wizard::new(),
            submitter,
            attachments: Vec::new(),
            reset_delay: DEFAULT_RESET_DELAY,
        }
    }

    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    pub fn wizard(&self) -> &Wizard<F> {
        &self.wizard
    }

    pub fn wizard_mut(&mut self) -> &mut Wizard<F> {
        &mut self.wizard
    }

    pub fn attachments(&self) -> &[CandidateFile] {
        &self.attachments
    }

    /// Add files to the selection, returning the ones that were refused.
    /// Files already selected count toward the form's file limit.
    pub fn attach(
        &mut self,
        files: Vec<CandidateFile>,
    ) -> Result<Vec<RejectedFile>, WizardError> {
        if !self.submitter.form().allow_files {
            return Err(WizardError::AttachmentsNotAllowed);
        }
        let report = self
            .submitter
            .uploader()
            .validator()
            .validate_all(files, self.attachments.len());
        self.attachments.extend(report.valid_files);
        Ok(report.invalid_files)
    }

    pub fn remove_attachment(&mut self, name: &str) -> Option<CandidateFile> {
        let index = self.attachments.iter().position(|f| f.name == name)?;
        Some(self.attachments.remove(index))
    }

    /// Submit the completed wizard.
    ///
    /// `Err` means the wizard itself is not ready; a relay or upload failure
    /// is `Ok(false)` and leaves the entered data in place for a retry.
    pub async fn submit(&mut self) -> Result<bool, WizardError> {
        self.wizard.ready()?;

        let fields = self.wizard.form().to_fields();
        let accepted = self
            .submitter
            .submit(&fields, self.attachments.clone())
            .await;

        if accepted {
            self.wizard.mark_submitted()?;
            self.attachments.clear();
            tracing::info!(form_name = F::FORM_NAME, "Wizard submitted");
        }
        Ok(accepted)
    }

    /// Wait out the reset delay, then clear a submitted wizard.
    pub async fn finish(&mut self) {
        if !self.wizard.is_submitted() {
            return;
        }
        tokio::time::sleep(self.reset_delay).await;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.wizard.reset();
        self.attachments.clear();
    }
}
