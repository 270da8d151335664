use std::collections::HashSet;

use tracing::{info, instrument, warn};

use crate::api::ApiClient;
use crate::auth::gate::{self, Action};
use crate::errors::ApiError;
use crate::model::employee::{Employee, EmployeeId};

/// Holds the employee list shown to the user and keeps it in step with the
/// backend after mutations.
pub struct EmployeeListController {
    api: ApiClient,
    employees: Vec<Employee>,
}

impl EmployeeListController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            employees: Vec::new(),
        }
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Whether the control for `action` should be offered at all.
    pub fn can(&self, action: Action) -> bool {
        gate::is_allowed(self.api.session().role(), action)
    }

    /// Replace the local list with the backend's, keeping server order.
    /// On failure the current list is kept.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<&[Employee], ApiError> {
        gate::authorize(self.api.session().role(), Action::ViewEmployees)?;
        let fetched = self.api.list_employees().await?;
        self.employees = dedup_by_id(fetched);
        info!(count = self.employees.len(), "employees loaded");
        Ok(&self.employees)
    }

    /// Delete on the backend, then drop the entry locally without refetching.
    #[instrument(skip(self), fields(employee_id = %id))]
    pub async fn remove(&mut self, id: EmployeeId) -> Result<(), ApiError> {
        gate::authorize(self.api.session().role(), Action::DeleteEmployee)?;
        self.api.delete_employee(id).await?;
        // not being present locally is fine, the delete already happened
        self.employees.retain(|e| e.id != id);
        info!("employee deleted");
        Ok(())
    }

    /// Merge a record returned by a create or update into the list.
    pub fn apply_saved(&mut self, employee: Employee) {
        match self.employees.iter_mut().find(|e| e.id == employee.id) {
            Some(slot) => *slot = employee,
            None => self.employees.push(employee),
        }
    }
}

fn dedup_by_id(employees: Vec<Employee>) -> Vec<Employee> {
    let mut seen = HashSet::with_capacity(employees.len());
    employees
        .into_iter()
        .filter(|e| {
            let first = seen.insert(e.id);
            if !first {
                warn!(employee_id = %e.id, "duplicate employee id in response, keeping the first");
            }
            first
        })
        .collect()
}
