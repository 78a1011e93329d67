//! Settings service for the persisted client preferences

use crate::{
    error::AppResult,
    storage::{PrefsStore, ThemePreference},
};

#[derive(Clone)]
pub struct SettingsService {
    prefs: PrefsStore,
}

impl SettingsService {
    pub fn new(prefs: PrefsStore) -> Self {
        Self { prefs }
    }

    pub fn get_theme(&self) -> AppResult<ThemePreference> {
        self.prefs.theme()
    }

    pub fn set_theme(&self, theme: ThemePreference) -> AppResult<ThemePreference> {
        self.prefs.set_theme(theme)?;
        Ok(theme)
    }
}
