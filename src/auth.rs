//! Client-credentials authentication: credentials, the cached bearer token, and the manager that
//! keeps it fresh.

pub mod credentials;
pub mod manager;
pub mod secret;
pub mod token;

pub use credentials::*;
pub use manager::*;
pub use secret::*;
pub use token::*;
