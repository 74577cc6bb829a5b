//! Desk services: the API gateway, the controller and startup sequencing

pub mod bootstrap;
pub mod desk;
pub mod gateway;

use std::sync::Arc;

use crate::{config::AppConfig, ui::Ui};

pub use bootstrap::{LoadStep, StartupReport};
pub use desk::{ActionOutcome, Desk};
pub use gateway::{ApiClient, LibraryApi, RequestOptions};

/// Build a desk talking HTTP to the configured API and rendering into `ui`
pub fn connect<U: Ui>(config: &AppConfig, ui: U) -> Desk<ApiClient, U> {
    let api = ApiClient::new(Arc::new(config.api.clone()));
    Desk::new(api, ui)
}
