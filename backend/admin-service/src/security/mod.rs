pub mod credentials;
pub mod jwt;
pub mod password;
