use serde::{Deserialize, Serialize};

use crate::db::store::Store;
use crate::error::{ApiError, ApiResult};
use crate::models::agency::{Agency, AgencyUpdate};
use crate::models::employee::{Employee, EmployeeUpdate, StaffRole};
use crate::models::user::{User, UserRole};
use crate::services::account_service::is_valid_email;
use crate::services::filters::matches_search;

#[derive(Debug, Default, Deserialize)]
pub struct EmployeeFilter {
    pub search: Option<String>,
    pub role: Option<StaffRole>,
    pub agency_id: Option<u32>,
}

impl EmployeeFilter {
    pub fn matches(&self, employee: &Employee) -> bool {
        self.role.map_or(true, |role| employee.role == role)
            && self.agency_id.map_or(true, |id| employee.agency_id == id)
            && matches_search(
                self.search.as_deref(),
                &[
                    employee.last_name.as_str(),
                    employee.first_name.as_str(),
                    employee.email.as_str(),
                ],
            )
    }
}

#[derive(Debug, Serialize)]
pub struct EmployeeView {
    #[serde(flatten)]
    pub employee: Employee,
    pub agency_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AgencyFilter {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AgencyView {
    #[serde(flatten)]
    pub agency: Agency,
    pub employee_count: usize,
}

pub struct StaffService;

impl StaffService {
    pub async fn list_employees(
        store: &Store,
        filter: &EmployeeFilter,
    ) -> ApiResult<Vec<EmployeeView>> {
        let agencies = store.agencies.all().await?;
        let employees = store.employees.find(&|e: &Employee| filter.matches(e)).await?;
        Ok(employees
            .into_iter()
            .map(|employee| EmployeeView {
                agency_name: agencies
                    .iter()
                    .find(|a| a.id == employee.agency_id)
                    .map(|a| a.name.clone()),
                employee,
            })
            .collect())
    }

    pub async fn employee(store: &Store, employee_id: u32) -> ApiResult<Employee> {
        store
            .employees
            .get(employee_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Employee"))
    }

    async fn login_of(store: &Store, employee_id: u32) -> ApiResult<Option<User>> {
        let users = store
            .users
            .find(&|u: &User| u.employee_id == Some(employee_id))
            .await?;
        Ok(users.into_iter().next())
    }

    /// Applies `update` and keeps the staff login's email and role in step.
    pub async fn update_employee(
        store: &Store,
        employee_id: u32,
        update: EmployeeUpdate,
    ) -> ApiResult<Employee> {
        let mut employee = Self::employee(store, employee_id).await?;
        update.apply(&mut employee);
        employee.email = employee.email.trim().to_lowercase();
        if !is_valid_email(&employee.email) {
            return Err(ApiError::validation("Invalid email address"));
        }
        if store.agencies.get(employee.agency_id).await?.is_none() {
            return Err(ApiError::not_found("Agency"));
        }

        let login = Self::login_of(store, employee_id).await?;
        let email = employee.email.clone();
        let taken = store
            .users
            .find(&|u: &User| u.email == email && u.employee_id != Some(employee_id))
            .await?;
        if !taken.is_empty() {
            return Err(ApiError::Conflict("Email already in use".to_string()));
        }

        let employee = store
            .employees
            .replace(employee_id, employee)
            .await?
            .ok_or_else(|| ApiError::not_found("Employee"))?;
        if let Some(mut user) = login {
            user.email = employee.email.clone();
            user.role = UserRole::from(employee.role);
            store.users.replace(user.id, user).await?;
        }
        Ok(employee)
    }

    /// Removes the employee and their login.
    pub async fn delete_employee(store: &Store, employee_id: u32) -> ApiResult<()> {
        if !store.employees.delete(employee_id).await? {
            return Err(ApiError::not_found("Employee"));
        }
        if let Some(user) = Self::login_of(store, employee_id).await? {
            store.users.delete(user.id).await?;
        }
        log::info!("Deleted employee {}", employee_id);
        Ok(())
    }

    pub async fn list_agencies(store: &Store, filter: &AgencyFilter) -> ApiResult<Vec<AgencyView>> {
        let employees = store.employees.all().await?;
        let agencies = store
            .agencies
            .find(&|a: &Agency| {
                matches_search(
                    filter.search.as_deref(),
                    &[a.name.as_str(), a.address.as_str(), a.email.as_str()],
                )
            })
            .await?;
        Ok(agencies
            .into_iter()
            .map(|agency| AgencyView {
                employee_count: employees.iter().filter(|e| e.agency_id == agency.id).count(),
                agency,
            })
            .collect())
    }

    pub async fn agency(store: &Store, agency_id: u32) -> ApiResult<Agency> {
        store
            .agencies
            .get(agency_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Agency"))
    }

    pub async fn update_agency(
        store: &Store,
        agency_id: u32,
        update: AgencyUpdate,
    ) -> ApiResult<Agency> {
        let mut agency = Self::agency(store, agency_id).await?;
        update.apply(&mut agency);
        if agency.name.trim().is_empty() {
            return Err(ApiError::validation("Agency name cannot be empty"));
        }
        store
            .agencies
            .replace(agency_id, agency)
            .await?
            .ok_or_else(|| ApiError::not_found("Agency"))
    }

    /// Refused while employees are attached to the agency.
    pub async fn delete_agency(store: &Store, agency_id: u32) -> ApiResult<()> {
        let staffed = store
            .employees
            .find(&|e: &Employee| e.agency_id == agency_id)
            .await?;
        if !staffed.is_empty() {
            return Err(ApiError::Conflict(format!(
                "Agency still has {} employee(s)",
                staffed.len()
            )));
        }
        if !store.agencies.delete(agency_id).await? {
            return Err(ApiError::not_found("Agency"));
        }
        log::info!("Deleted agency {}", agency_id);
        Ok(())
    }
}
