//! Application settings loaded from `config/*.yaml` and `APP_*` variables.

use serde::Deserialize;

use crate::domain::lifecycle::LifecyclePolicy;

/// Configuration options specific to the trainings service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub domain: String,
    pub database_url: String,
    /// Key material for the session and identity cookies.
    pub secret: String,
    /// Glob passed to Tera, e.g. `templates/**/*`.
    pub templates_dir: String,
    pub auth_service_url: String,
    #[serde(default)]
    pub lifecycle: LifecyclePolicy,
}
