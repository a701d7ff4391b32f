//! # Built-in Applications
//!
//! The modules Switchboard ships with, registered under their codes:
//!
//! | Code      | Title          | Source                       |
//! |-----------|----------------|------------------------------|
//! | `reports` | Reports        | `GET /reports/summary`       |
//! | `status`  | Service Status | health probe of the backend  |
//! | `about`   | About          | static                       |
//!
//! Factories capture the shared [`BackendClient`], so a module fetches its
//! data with whatever token is current when it is instantiated.

pub mod about;
pub mod reports;
pub mod status;

use std::sync::Arc;

use crate::backend::BackendClient;
use crate::core::registry::{AppDescriptor, AppRegistry, RegistryError};

pub fn builtin_registry(client: Arc<BackendClient>) -> Result<AppRegistry, RegistryError> {
    let reports_client = client.clone();
    let status_client = client;

    AppRegistry::builder()
        .register(AppDescriptor::new("reports", "Reports", move || {
            reports::load(reports_client.clone())
        }))
        .register(AppDescriptor::new("status", "Service Status", move || {
            status::load(status_client.clone())
        }))
        .register(AppDescriptor::new("about", "About", about::load))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_codes_are_registered() {
        let registry = builtin_registry(Arc::new(BackendClient::new("http://localhost:1"))).unwrap();
        let codes: Vec<&str> = registry.descriptors().iter().map(|d| d.code()).collect();
        assert_eq!(codes, vec!["reports", "status", "about"]);
        assert_eq!(registry.resolve("status").unwrap().title(), "Service Status");
    }

    #[tokio::test]
    async fn test_about_loads_without_backend() {
        let registry = builtin_registry(Arc::new(BackendClient::new("http://localhost:1"))).unwrap();
        let unit = registry.resolve("about").unwrap().instantiate().await.unwrap();
        assert_eq!(unit.render().heading, "About Switchboard");
    }
}
