pub mod applications;
pub mod auth;
pub mod commissions;
pub mod health;
pub mod registrations;
pub mod supervisors;
pub mod wallet;
