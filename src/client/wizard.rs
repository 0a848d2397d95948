use crate::client::error::ClientError;
use crate::client::year_context::AcademicYearGateway;
use crate::types::dto::academic_year::{CopyOption, CopyOptions, CreateAcademicYearRequest};
use crate::types::internal::next_year_label;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    NamingStep,
    CopyOptionsStep,
}

/// Two-step dialog creating the next academic year
///
/// Nothing is sent before `submit`. A failed submit keeps the dialog open
/// on its current step with an error message so the user can retry.
#[derive(Debug, Clone, PartialEq)]
pub struct AcademicYearWizard {
    open: bool,
    step: WizardStep,
    year_name: String,
    copy_options: CopyOptions,
    error: Option<String>,
}

impl Default for AcademicYearWizard {
    fn default() -> Self {
        Self {
            open: false,
            step: WizardStep::NamingStep,
            year_name: String::new(),
            copy_options: CopyOptions::default(),
            error: None,
        }
    }
}

impl AcademicYearWizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open on the naming step with the year following `current_year` prefilled
    ///
    /// The name stays empty when `current_year` is not "YYYY-YYYY".
    pub fn open(&mut self, current_year: &str) {
        *self = Self {
            open: true,
            year_name: next_year_label(current_year).unwrap_or_default(),
            ..Self::default()
        };
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn year_name(&self) -> &str {
        &self.year_name
    }

    pub fn set_year_name(&mut self, name: impl Into<String>) {
        self.year_name = name.into();
    }

    pub fn copy_options(&self) -> &CopyOptions {
        &self.copy_options
    }

    pub fn toggle(&mut self, option: CopyOption) {
        self.copy_options.toggle(option);
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn next(&mut self) {
        self.step = WizardStep::CopyOptionsStep;
    }

    pub fn previous(&mut self) {
        self.step = WizardStep::NamingStep;
    }

    /// Body of the create request for the current form state
    pub fn request(&self) -> CreateAcademicYearRequest {
        CreateAcademicYearRequest {
            year_name: self.year_name.trim().to_string(),
            copy_options: self.copy_options,
        }
    }

    /// Send the create request; on success close and return the new year label
    pub async fn submit(&mut self, gateway: &dyn AcademicYearGateway) -> Result<String, ClientError> {
        if self.year_name.trim().is_empty() {
            let err = ClientError::validation("Year name is required");
            self.error = Some(err.user_message());
            return Err(err);
        }

        match gateway.create_year(&self.request()).await {
            Ok(created) => {
                tracing::info!(year = %created.year_name, "Academic year created");
                self.close();
                Ok(created.year_name)
            }
            Err(e) => {
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::dto::academic_year::AcademicYearResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records requests and answers with a fixed outcome
    struct RecordingGateway {
        fail: bool,
        requests: Mutex<Vec<CreateAcademicYearRequest>>,
    }

    impl RecordingGateway {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AcademicYearGateway for RecordingGateway {
        async fn list_years(&self) -> Result<Vec<String>, ClientError> {
            Ok(Vec::new())
        }

        async fn create_year(
            &self,
            request: &CreateAcademicYearRequest,
        ) -> Result<AcademicYearResponse, ClientError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                Err(ClientError::Server {
                    status: 500,
                    message: "boom".to_string(),
                })
            } else {
                Ok(AcademicYearResponse {
                    year_name: request.year_name.clone(),
                })
            }
        }
    }

    #[test]
    fn test_open_prefills_next_year() {
        let mut wizard = AcademicYearWizard::new();
        wizard.open("2024-2025");

        assert!(wizard.is_open());
        assert_eq!(wizard.step(), WizardStep::NamingStep);
        assert_eq!(wizard.year_name(), "2025-2026");
        assert_eq!(*wizard.copy_options(), CopyOptions::default());
    }

    #[test]
    fn test_malformed_current_year_leaves_name_empty() {
        let mut wizard = AcademicYearWizard::new();
        wizard.open("année en cours");
        assert_eq!(wizard.year_name(), "");
    }

    #[test]
    fn test_steps_keep_form_state() {
        let mut wizard = AcademicYearWizard::new();
        wizard.open("2024-2025");
        wizard.set_year_name("2030-2031");
        wizard.next();
        wizard.toggle(CopyOption::Lessons);
        wizard.previous();

        assert_eq!(wizard.step(), WizardStep::NamingStep);
        assert_eq!(wizard.year_name(), "2030-2031");
        assert!(wizard.copy_options().lessons);
    }

    #[tokio::test]
    async fn test_empty_name_blocks_submission() {
        let gateway = RecordingGateway::new(false);
        let mut wizard = AcademicYearWizard::new();
        wizard.open("not a year");
        wizard.next();

        let result = wizard.submit(&gateway).await;

        assert!(matches!(result, Err(ClientError::Validation(_))));
        assert!(wizard.is_open());
        assert_eq!(wizard.error(), Some("Year name is required"));
        assert!(gateway.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_failure_keeps_wizard_on_current_step() {
        let gateway = RecordingGateway::new(true);
        let mut wizard = AcademicYearWizard::new();
        wizard.open("2024-2025");
        wizard.next();

        assert!(wizard.submit(&gateway).await.is_err());
        assert!(wizard.is_open());
        assert_eq!(wizard.step(), WizardStep::CopyOptionsStep);
        assert_eq!(wizard.error(), Some("Something went wrong, please try again"));
        assert_eq!(wizard.year_name(), "2025-2026");
    }

    #[tokio::test]
    async fn test_success_closes_and_resets() {
        let gateway = RecordingGateway::new(false);
        let mut wizard = AcademicYearWizard::new();
        wizard.open("2024-2025");
        wizard.next();
        wizard.toggle(CopyOption::Classes);

        let created = wizard.submit(&gateway).await.unwrap();

        assert_eq!(created, "2025-2026");
        assert_eq!(wizard, AcademicYearWizard::default());
        let sent = gateway.requests.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(!sent[0].copy_options.classes);
    }
}
