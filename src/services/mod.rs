pub mod account_service;
pub mod billing_service;
pub mod catalogue_service;
pub mod client_service;
pub mod filters;
pub mod pricing_service;
pub mod report_service;
pub mod reservation_service;
pub mod review_service;
pub mod staff_service;
pub mod wizard;
pub mod wizard_forms;
pub mod wizard_sessions;
