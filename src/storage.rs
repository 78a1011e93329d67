//! Local preference storage.
//!
//! A single JSON document with exactly two keys, mirroring what the mobile
//! client keeps in device storage: `currentUser` (the session snapshot,
//! password stripped at the type level, absent when logged out) and
//! `themePreference`. Everything else in the system is in-memory only.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::SessionUser,
};

const PREFS_FILE: &str = "preferences.json";

/// Theme preference persisted for the client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThemePreference {
    pub is_dark_mode: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(rename = "currentUser", skip_serializing_if = "Option::is_none", default)]
    current_user: Option<SessionUser>,
    #[serde(rename = "themePreference", default)]
    theme_preference: ThemePreference,
}

/// File-backed preference store. Reads and writes whole documents; a mutex
/// serializes writers so concurrent handlers cannot interleave a
/// read-modify-write.
#[derive(Clone)]
pub struct PrefsStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl PrefsStore {
    /// Open (or create) the preference file under `data_dir`
    pub fn open(data_dir: impl AsRef<Path>) -> AppResult<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)
            .map_err(|e| AppError::Storage(format!("cannot create {}: {}", data_dir.display(), e)))?;
        Ok(Self {
            path: data_dir.join(PREFS_FILE),
            lock: Arc::new(Mutex::new(())),
        })
    }

    fn load(&self) -> AppResult<Preferences> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                AppError::Storage(format!("corrupt preference file {}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Preferences::default()),
            Err(e) => Err(AppError::Storage(format!(
                "cannot read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn save(&self, prefs: &Preferences) -> AppResult<()> {
        let raw = serde_json::to_string_pretty(prefs)
            .map_err(|e| AppError::Storage(format!("cannot encode preferences: {}", e)))?;
        fs::write(&self.path, raw)
            .map_err(|e| AppError::Storage(format!("cannot write {}: {}", self.path.display(), e)))
    }

    fn update(&self, apply: impl FnOnce(&mut Preferences)) -> AppResult<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| AppError::Storage("preference lock poisoned".to_string()))?;
        let mut prefs = self.load()?;
        apply(&mut prefs);
        self.save(&prefs)
    }

    /// The persisted session, if someone is signed in on this device
    pub fn current_user(&self) -> AppResult<Option<SessionUser>> {
        Ok(self.load()?.current_user)
    }

    pub fn set_current_user(&self, user: Option<SessionUser>) -> AppResult<()> {
        self.update(|prefs| prefs.current_user = user)
    }

    pub fn theme(&self) -> AppResult<ThemePreference> {
        Ok(self.load()?.theme_preference)
    }

    pub fn set_theme(&self, theme: ThemePreference) -> AppResult<()> {
        self.update(|prefs| prefs.theme_preference = theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;

    fn session_user() -> SessionUser {
        SessionUser {
            id: 2,
            name: "جرجس".to_string(),
            age: 30,
            email: "george@mail.com".to_string(),
            phone: "0101111111".to_string(),
            main_church: "مارمرقس".to_string(),
            father_of_confession: "ابونا بطرس".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn fresh_store_means_logged_out_and_light_theme() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = PrefsStore::open(dir.path()).unwrap();
        assert!(prefs.current_user().unwrap().is_none());
        assert!(!prefs.theme().unwrap().is_dark_mode);
    }

    #[test]
    fn session_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = PrefsStore::open(dir.path()).unwrap();

        prefs.set_current_user(Some(session_user())).unwrap();
        let restored = prefs.current_user().unwrap().unwrap();
        assert_eq!(restored, session_user());

        prefs.set_current_user(None).unwrap();
        assert!(prefs.current_user().unwrap().is_none());
    }

    #[test]
    fn file_uses_the_two_expected_keys_and_never_a_password() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = PrefsStore::open(dir.path()).unwrap();
        prefs.set_current_user(Some(session_user())).unwrap();
        prefs.set_theme(ThemePreference { is_dark_mode: true }).unwrap();

        let raw = std::fs::read_to_string(dir.path().join(PREFS_FILE)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(json.get("currentUser").is_some());
        assert_eq!(json["themePreference"]["isDarkMode"], true);
        assert!(!raw.contains("password"));
    }

    #[test]
    fn theme_survives_independent_of_session() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = PrefsStore::open(dir.path()).unwrap();
        prefs.set_theme(ThemePreference { is_dark_mode: true }).unwrap();
        prefs.set_current_user(Some(session_user())).unwrap();
        prefs.set_current_user(None).unwrap();
        assert!(prefs.theme().unwrap().is_dark_mode);
    }
}
