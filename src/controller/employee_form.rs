use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::auth::gate::{self, Action};
use crate::errors::ApiError;
use crate::model::employee::{Employee, EmployeeDraft, EmployeeId};
use crate::utils::validation::validate_draft;

/// Create and edit a single employee.
pub struct EmployeeFormController {
    api: ApiClient,
}

impl EmployeeFormController {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Current record for `id`, used to prefill the form before editing.
    #[instrument(skip(self), fields(employee_id = %id))]
    pub async fn edit(&self, id: EmployeeId) -> Result<Employee, ApiError> {
        gate::authorize(self.api.session().role(), Action::ViewEmployees)?;
        self.api.get_employee(id).await
    }

    /// Create (`existing` is `None`) or fully replace an employee and return
    /// the backend's canonical record. Permission and field checks run first,
    /// so a rejected form never reaches the network.
    #[instrument(skip(self, draft))]
    pub async fn submit(
        &self,
        draft: &EmployeeDraft,
        existing: Option<EmployeeId>,
    ) -> Result<Employee, ApiError> {
        gate::authorize(self.api.session().role(), Action::EditEmployee)?;
        validate_draft(draft)?;

        let saved = match existing {
            Some(id) => self.api.update_employee(id, draft).await?,
            None => self.api.create_employee(draft).await?,
        };
        info!(employee_id = %saved.id, "employee saved");
        Ok(saved)
    }
}
