use reqwest::Method;
use tracing::instrument;

use super::{ApiClient, Auth};
use crate::errors::ApiError;
use crate::model::employee::{Employee, EmployeeDraft, EmployeeId};

impl ApiClient {
    /// `GET /employees`, in server order.
    #[instrument(skip(self))]
    pub async fn list_employees(&self) -> Result<Vec<Employee>, ApiError> {
        let url = self.endpoint(&["employees"]);
        self.send(Method::GET, url, None::<&()>, Auth::Session).await
    }

    /// `GET /employees/{id}`
    #[instrument(skip(self), fields(employee_id = %id))]
    pub async fn get_employee(&self, id: EmployeeId) -> Result<Employee, ApiError> {
        let url = self.endpoint(&["employees", &id.to_string()]);
        self.send(Method::GET, url, None::<&()>, Auth::Session).await
    }

    /// `POST /employees`. The backend assigns id and username.
    #[instrument(skip(self, draft))]
    pub async fn create_employee(&self, draft: &EmployeeDraft) -> Result<Employee, ApiError> {
        let url = self.endpoint(&["employees"]);
        self.send(Method::POST, url, Some(draft), Auth::Session).await
    }

    /// `PUT /employees/{id}`, replacing every editable field.
    #[instrument(skip(self, draft), fields(employee_id = %id))]
    pub async fn update_employee(
        &self,
        id: EmployeeId,
        draft: &EmployeeDraft,
    ) -> Result<Employee, ApiError> {
        let url = self.endpoint(&["employees", &id.to_string()]);
        self.send(Method::PUT, url, Some(draft), Auth::Session).await
    }

    /// `DELETE /employees/{id}`
    #[instrument(skip(self), fields(employee_id = %id))]
    pub async fn delete_employee(&self, id: EmployeeId) -> Result<(), ApiError> {
        let url = self.endpoint(&["employees", &id.to_string()]);
        self.send_no_content(Method::DELETE, url, None::<&()>, Auth::Session)
            .await
    }
}
