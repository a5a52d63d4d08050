use ravenscan_cache::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

const THEME_STORAGE_KEY: &str = "theme";

/// Light or dark output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    /// Guess the terminal's scheme from `COLORFGBG` ("fg;bg" or "fg;x;bg")
    ///
    /// rxvt convention: background colours 0-6 and 8 are dark.
    pub fn from_colorfgbg(value: &str) -> Option<Self> {
        let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
        match bg {
            0..=6 | 8 => Some(ThemePreference::Dark),
            7 | 9..=15 => Some(ThemePreference::Light),
            _ => None,
        }
    }
}

impl std::fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            other => Err(format!("unknown theme '{}' (expected light or dark)", other)),
        }
    }
}

/// Persists the display preference
///
/// Resolution order: explicit stored choice, then the environment's
/// preference handed in at construction, then light.
#[derive(Clone)]
pub struct ThemeStore {
    store: Arc<dyn KeyValueStore>,
    ambient: Option<ThemePreference>,
}

impl ThemeStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            ambient: None,
        }
    }

    /// Use `ambient` when no explicit choice has been stored
    pub fn with_ambient(mut self, ambient: Option<ThemePreference>) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn get(&self) -> crate::Result<ThemePreference> {
        if let Some(stored) = self.store.get(THEME_STORAGE_KEY)? {
            match stored.parse::<ThemePreference>() {
                Ok(theme) => return Ok(theme),
                Err(e) => warn!("Ignoring stored theme: {}", e),
            }
        }

        Ok(self.ambient.unwrap_or_default())
    }

    pub fn set(&self, theme: ThemePreference) -> crate::Result<()> {
        self.store.set(THEME_STORAGE_KEY, theme.as_str())?;
        Ok(())
    }

    /// Flip the effective preference and remember the result
    pub fn toggle(&self) -> crate::Result<ThemePreference> {
        let next = self.get()?.toggled();
        self.set(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ravenscan_cache::MemoryStore;

    fn store() -> ThemeStore {
        ThemeStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_defaults_to_light_without_ambient() {
        assert_eq!(store().get().unwrap(), ThemePreference::Light);
    }

    #[test]
    fn test_ambient_used_when_nothing_stored() {
        let themes = store().with_ambient(Some(ThemePreference::Dark));
        assert_eq!(themes.get().unwrap(), ThemePreference::Dark);
    }

    #[test]
    fn test_explicit_choice_beats_ambient() {
        let themes = store().with_ambient(Some(ThemePreference::Dark));
        themes.set(ThemePreference::Light).unwrap();
        assert_eq!(themes.get().unwrap(), ThemePreference::Light);
    }

    #[test]
    fn test_toggle_persists() {
        let backing = Arc::new(MemoryStore::new());
        let themes = ThemeStore::new(backing.clone());

        assert_eq!(themes.toggle().unwrap(), ThemePreference::Dark);
        assert_eq!(ThemeStore::new(backing).get().unwrap(), ThemePreference::Dark);
    }

    #[test]
    fn test_garbage_stored_value_falls_back() {
        let backing = Arc::new(MemoryStore::new());
        backing.set(THEME_STORAGE_KEY, "sepia").unwrap();

        let themes = ThemeStore::new(backing).with_ambient(Some(ThemePreference::Dark));
        assert_eq!(themes.get().unwrap(), ThemePreference::Dark);
    }

    #[test]
    fn test_colorfgbg_detection() {
        assert_eq!(ThemePreference::from_colorfgbg("15;0"), Some(ThemePreference::Dark));
        assert_eq!(ThemePreference::from_colorfgbg("0;15"), Some(ThemePreference::Light));
        assert_eq!(
            ThemePreference::from_colorfgbg("15;default;0"),
            Some(ThemePreference::Dark)
        );
        assert_eq!(ThemePreference::from_colorfgbg("default"), None);
        assert_eq!(ThemePreference::from_colorfgbg(""), None);
    }
}
