//! Back-office creation forms driven by [`Wizard`](crate::services::wizard::Wizard).

use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::models::agency::Agency;
use crate::models::employee::{Employee, StaffRole};
use crate::models::user::{User, UserRole};
use crate::models::vehicle::{FuelType, Transmission, Vehicle, VehicleCategory};
use crate::services::account_service::{
    hash_password, is_valid_email, validate_password, AccountService, MIN_PASSWORD_LEN,
};
use crate::services::wizard::{Step, StepHandler, WizardConfig};
use crate::state::AppState;

const PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=200&width=300";
const DEFAULT_OPENING_HOURS: &str = "8h-18h Monday to Saturday";

/// A form that can be edited step by step and submitted against the app state.
pub trait WizardForm:
    StepHandler<Context = AppState, Error = ApiError>
    + Default
    + Serialize
    + DeserializeOwned
    + 'static
{
    const KIND: &'static str;

    fn config() -> WizardConfig;

    /// Form state as returned to the client.
    fn to_view(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Merges the fields of `patch` into `form`; unknown fields are ignored.
pub fn apply_patch<F: WizardForm>(form: &mut F, patch: Value) -> ApiResult<()> {
    let Value::Object(fields) = patch else {
        return Err(ApiError::validation("Form update must be a JSON object"));
    };
    let mut current = serde_json::to_value(&*form)
        .map_err(|e| ApiError::Internal(format!("form encoding failed: {}", e)))?;
    if let Value::Object(ref mut current) = current {
        for (key, value) in fields {
            if current.contains_key(&key) {
                current.insert(key, value);
            }
        }
    }
    *form = serde_json::from_value(current)
        .map_err(|e| ApiError::validation(format!("Invalid form value: {}", e)))?;
    Ok(())
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

fn required<T>(value: Option<T>, field: &str) -> ApiResult<T> {
    value.ok_or_else(|| ApiError::validation(format!("{} is required", field)))
}

fn required_text(value: &str, field: &str) -> ApiResult<String> {
    if filled(value) {
        Ok(value.trim().to_string())
    } else {
        Err(ApiError::validation(format!("{} is required", field)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleForm {
    pub make: String,
    pub model: String,
    pub category: Option<VehicleCategory>,
    pub fuel: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub seats: Option<u8>,
    pub daily_rate: Option<f64>,
    pub mileage: Option<u32>,
    pub year: Option<u16>,
    pub description: String,
    pub equipment: Vec<String>,
    pub available: bool,
}

impl Default for VehicleForm {
    fn default() -> Self {
        Self {
            make: String::new(),
            model: String::new(),
            category: None,
            fuel: None,
            transmission: None,
            seats: None,
            daily_rate: None,
            mileage: None,
            year: None,
            description: String::new(),
            equipment: Vec::new(),
            available: true,
        }
    }
}

impl StepHandler for VehicleForm {
    type Context = AppState;
    type Output = Vehicle;
    type Error = ApiError;

    fn can_proceed(&self, step_id: &str) -> bool {
        match step_id {
            "basic" => filled(&self.make) && filled(&self.model) && self.category.is_some(),
            "specs" => {
                self.fuel.is_some()
                    && self.transmission.is_some()
                    && self.seats.is_some_and(|seats| seats > 0)
                    && self.daily_rate.is_some_and(|rate| rate > 0.0)
            }
            "details" => self.mileage.is_some() && self.year.is_some(),
            "equipment" | "review" => true,
            _ => false,
        }
    }

    async fn submit(&self, state: &AppState) -> ApiResult<Vehicle> {
        let daily_rate = required(self.daily_rate, "daily_rate")?;
        if daily_rate <= 0.0 {
            return Err(ApiError::validation("Daily rate must be positive"));
        }
        let seats = required(self.seats, "seats")?;
        if seats == 0 {
            return Err(ApiError::validation("A vehicle needs at least one seat"));
        }
        let vehicle = Vehicle {
            id: 0,
            make: required_text(&self.make, "make")?,
            model: required_text(&self.model, "model")?,
            category: required(self.category, "category")?,
            daily_rate,
            available: self.available,
            fuel: required(self.fuel, "fuel")?,
            transmission: required(self.transmission, "transmission")?,
            seats,
            image: PLACEHOLDER_IMAGE.to_string(),
            description: self.description.trim().to_string(),
            equipment: self.equipment.clone(),
            mileage: required(self.mileage, "mileage")?,
            year: required(self.year, "year")?,
        };
        let vehicle = state.store.vehicles.insert(vehicle).await?;
        log::info!("Created vehicle {} ({})", vehicle.id, vehicle.display_name());
        Ok(vehicle)
    }
}

impl WizardForm for VehicleForm {
    const KIND: &'static str = "vehicle";

    fn config() -> WizardConfig {
        WizardConfig {
            title: "New vehicle".to_string(),
            description: "Add a vehicle to the fleet".to_string(),
            steps: vec![
                Step::new("basic", "Basic information", "Make, model and category"),
                Step::new("specs", "Specifications", "Technical specifications and price"),
                Step::new("details", "Details", "Mileage, year and description"),
                Step::new("equipment", "Equipment", "Select the available equipment"),
                Step::new("review", "Summary", "Check the information before creating the vehicle"),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeForm {
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub role: Option<StaffRole>,
    pub agency_id: Option<u32>,
    pub hired_on: Option<NaiveDate>,
    pub password: String,
    pub confirm_password: String,
}

impl Default for EmployeeForm {
    fn default() -> Self {
        Self {
            last_name: String::new(),
            first_name: String::new(),
            email: String::new(),
            role: None,
            agency_id: Some(1),
            hired_on: Some(Utc::now().date_naive()),
            password: String::new(),
            confirm_password: String::new(),
        }
    }
}

impl StepHandler for EmployeeForm {
    type Context = AppState;
    type Output = Employee;
    type Error = ApiError;

    fn can_proceed(&self, step_id: &str) -> bool {
        match step_id {
            "personal" => {
                filled(&self.last_name) && filled(&self.first_name) && filled(&self.email)
            }
            "professional" => {
                self.role.is_some() && self.agency_id.is_some() && self.hired_on.is_some()
            }
            "security" => {
                !self.password.is_empty()
                    && !self.confirm_password.is_empty()
                    && self.password.chars().count() >= MIN_PASSWORD_LEN
            }
            "review" => self.password == self.confirm_password,
            _ => false,
        }
    }

    /// Creates the employee and the matching staff login.
    async fn submit(&self, state: &AppState) -> ApiResult<Employee> {
        let store = &state.store;
        let email = self.email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(ApiError::validation("Invalid email address"));
        }
        validate_password(&self.password, &self.confirm_password)?;
        if AccountService::find_by_email(store, &email).await?.is_some() {
            return Err(ApiError::Conflict("Email already in use".to_string()));
        }

        let agency_id = required(self.agency_id, "agency_id")?;
        if store.agencies.get(agency_id).await?.is_none() {
            return Err(ApiError::not_found("Agency"));
        }
        let role = required(self.role, "role")?;
        let password_hash = hash_password(&self.password, state.config.bcrypt_cost)?;

        let employee = store
            .employees
            .insert(Employee {
                id: 0,
                last_name: required_text(&self.last_name, "last_name")?,
                first_name: required_text(&self.first_name, "first_name")?,
                email: email.clone(),
                role,
                agency_id,
                hired_on: required(self.hired_on, "hired_on")?,
            })
            .await?;
        store
            .users
            .insert(User {
                id: 0,
                email,
                role: UserRole::from(role),
                password_hash,
                client_id: None,
                employee_id: Some(employee.id),
            })
            .await?;

        log::info!("Created employee {} with role {:?}", employee.id, role);
        Ok(employee)
    }
}

impl WizardForm for EmployeeForm {
    const KIND: &'static str = "employee";

    fn config() -> WizardConfig {
        WizardConfig {
            title: "New employee".to_string(),
            description: "Create a staff member and their account".to_string(),
            steps: vec![
                Step::new("personal", "Personal information", "Last name, first name and email"),
                Step::new("professional", "Professional information", "Role, agency and hire date"),
                Step::new("security", "Security", "Password for the user account"),
                Step::new("review", "Summary", "Check the information before creating the employee"),
            ],
        }
    }

    // passwords never leave the server
    fn to_view(&self) -> Value {
        let mut view = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(ref mut fields) = view {
            fields.insert("password".to_string(), Value::Bool(!self.password.is_empty()));
            fields.insert(
                "confirm_password".to_string(),
                Value::Bool(!self.confirm_password.is_empty()),
            );
        }
        view
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgencyForm {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub opening_hours: String,
}

impl Default for AgencyForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            opening_hours: DEFAULT_OPENING_HOURS.to_string(),
        }
    }
}

impl StepHandler for AgencyForm {
    type Context = AppState;
    type Output = Agency;
    type Error = ApiError;

    fn can_proceed(&self, step_id: &str) -> bool {
        match step_id {
            "basic" => filled(&self.name) && filled(&self.address),
            "contact" => filled(&self.phone) && filled(&self.email),
            "hours" => filled(&self.opening_hours),
            "review" => true,
            _ => false,
        }
    }

    async fn submit(&self, state: &AppState) -> ApiResult<Agency> {
        let agency = state
            .store
            .agencies
            .insert(Agency {
                id: 0,
                name: required_text(&self.name, "name")?,
                address: required_text(&self.address, "address")?,
                phone: required_text(&self.phone, "phone")?,
                email: required_text(&self.email, "email")?,
                opening_hours: required_text(&self.opening_hours, "opening_hours")?,
            })
            .await?;
        log::info!("Created agency {} ({})", agency.id, agency.name);
        Ok(agency)
    }
}

impl WizardForm for AgencyForm {
    const KIND: &'static str = "agency";

    fn config() -> WizardConfig {
        WizardConfig {
            title: "New agency".to_string(),
            description: "Open a new rental agency".to_string(),
            steps: vec![
                Step::new("basic", "Basic information", "Agency name and address"),
                Step::new("contact", "Contact", "Agency phone and email"),
                Step::new("hours", "Opening hours", "Set the agency opening hours"),
                Step::new("review", "Summary", "Check the information before creating the agency"),
            ],
        }
    }
}
