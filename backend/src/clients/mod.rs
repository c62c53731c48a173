//! Clients for the remote services the app collaborates with: the
//! authentication service and the vision-to-text model. Each sits behind
//! a trait so the domain layer can be exercised without the network.

pub mod auth;
pub mod vision;

pub use auth::{AuthClient, HttpAuthClient};
pub use vision::{HttpVisionClient, VisionClient, VisionError};
