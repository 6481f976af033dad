use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, path::PathBuf};

/// How many recent searches are remembered.
pub const MAX_RECENT_CITIES: usize = 5;

/// User choices that survive between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub use_celsius: bool,
    pub use_dark_theme: bool,

    /// Most recent first, compared case-insensitively.
    pub recent_cities: Vec<String>,

    /// Query of the last successful search; refreshed on the next start.
    pub last_city: Option<String>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            use_celsius: true,
            use_dark_theme: true,
            recent_cities: Vec::new(),
            last_city: None,
        }
    }
}

impl UserPreferences {
    /// Moves `city` to the front of the recent list, replacing any entry that
    /// differs only in case, and remembers it as the last city.
    pub fn record_search(&mut self, city: &str) {
        let needle = city.to_lowercase();
        self.recent_cities.retain(|c| c.to_lowercase() != needle);
        self.recent_cities.insert(0, city.to_string());
        self.recent_cities.truncate(MAX_RECENT_CITIES);
        self.last_city = Some(city.to_string());
    }

    /// Returns the new `use_celsius` value.
    pub fn toggle_units(&mut self) -> bool {
        self.use_celsius = !self.use_celsius;
        self.use_celsius
    }

    /// Returns the new `use_dark_theme` value.
    pub fn toggle_theme(&mut self) -> bool {
        self.use_dark_theme = !self.use_dark_theme;
        self.use_dark_theme
    }
}

/// Persistence for [`UserPreferences`].
pub trait PreferenceStore: Send + Sync + Debug {
    fn load(&self) -> Result<UserPreferences>;
    fn save(&self, preferences: &UserPreferences) -> Result<()>;
}

/// Stores preferences as TOML in a single file.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `preferences.toml` next to the configuration file.
    pub fn in_config_dir() -> Result<Self> {
        Ok(Self::new(crate::config::config_dir()?.join("preferences.toml")))
    }
}

impl PreferenceStore for FilePreferenceStore {
    /// Missing file means first run: defaults are returned.
    fn load(&self) -> Result<UserPreferences> {
        if !self.path.exists() {
            return Ok(UserPreferences::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences file: {}", self.path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse preferences file: {}", self.path.display()))
    }

    fn save(&self, preferences: &UserPreferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preferences directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(preferences).context("Failed to serialize preferences to TOML")?;

        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write preferences file: {}", self.path.display()))
    }
}

/// Keeps preferences in memory only.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    inner: Mutex<UserPreferences>,
}

impl MemoryPreferenceStore {
    pub fn new(preferences: UserPreferences) -> Self {
        Self { inner: Mutex::new(preferences) }
    }

    pub fn snapshot(&self) -> UserPreferences {
        self.inner.lock().clone()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<UserPreferences> {
        Ok(self.snapshot())
    }

    fn save(&self, preferences: &UserPreferences) -> Result<()> {
        *self.inner.lock() = preferences.clone();
        Ok(())
    }
}
