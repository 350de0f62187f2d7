pub mod agency;
pub mod client;
pub mod employee;
pub mod payment;
pub mod reservation;
pub mod review;
pub mod user;
pub mod vehicle;
