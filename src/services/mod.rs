//! Business logic services

pub mod borrows;
pub mod catalog;
pub mod notifications;
pub mod qr;
pub mod settings;
pub mod users;

use std::sync::Arc;

use crate::{config::AppConfig, storage::PrefsStore, store::Store};

use notifications::{BorrowNotifier, EmailNotifier, LogNotifier};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub borrows: borrows::BorrowsService,
    pub qr: qr::QrService,
    pub settings: settings::SettingsService,
}

impl Services {
    /// Create all services over the shared store and preference file
    pub fn new(store: Store, prefs: PrefsStore, config: &AppConfig) -> Self {
        let notifier: Arc<dyn BorrowNotifier> = if config.email.enabled {
            Arc::new(EmailNotifier::new(config.email.clone()))
        } else {
            Arc::new(LogNotifier)
        };

        Self {
            users: users::UsersService::new(store.clone(), config.auth.clone(), prefs.clone()),
            catalog: catalog::CatalogService::new(store.clone()),
            borrows: borrows::BorrowsService::new(store.clone(), notifier),
            qr: qr::QrService::new(store, &config.borrows),
            settings: settings::SettingsService::new(prefs),
        }
    }
}
