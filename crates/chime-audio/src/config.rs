//! Sound configuration.
//!
//! Mixer parameters and sound bindings can be loaded from and saved to a
//! TOML file:
//!
//! ```toml
//! unique_channel = true
//! load_example_bank = true
//!
//! [mixer]
//! frequency = 44100
//!
//! [bindings.error]
//! path = "sounds/buzz.ogg"
//! volume = 0.8
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::backend::MixerParams;
use crate::registry::{ClipParams, RegistryOptions, DEFAULT_VOLUME};
use crate::rodio_backend::DEFAULT_MIXER_CHANNELS;

/// Configuration file name.
const CONFIG_FILE: &str = "chime.toml";

/// One `[bindings.<kind>]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Sound file; absent clears the binding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Volume (0.0 - 1.0).
    pub volume: f32,
    /// Extra repetitions.
    pub loops: i32,
    /// Maximum play time in milliseconds (0 = unlimited).
    pub max_play_ms: i64,
    /// Fade-in in milliseconds.
    pub fade_in_ms: i64,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            path: None,
            volume: DEFAULT_VOLUME,
            loops: 0,
            max_play_ms: 0,
            fade_in_ms: 0,
        }
    }
}

impl BindingConfig {
    /// Playback parameters of this binding.
    #[must_use]
    pub fn params(&self) -> ClipParams {
        ClipParams {
            volume: self.volume,
            loops: self.loops,
            max_play_ms: self.max_play_ms,
            fade_in_ms: self.fade_in_ms,
        }
    }
}

/// Sound configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    /// Pin one playback channel and stop it before each play.
    pub unique_channel: bool,
    /// Reinitialize the device even if it is already open.
    pub force_init: bool,
    /// Number of playback channels the rodio backend opens.
    pub mixer_channels: usize,
    /// Bind the bundled example sounds before `bindings`.
    pub load_example_bank: bool,
    /// Volume of the example sounds.
    pub example_volume: f32,
    /// Device parameters.
    pub mixer: MixerParams,
    /// Sound files keyed by kind name.
    pub bindings: BTreeMap<String, BindingConfig>,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            unique_channel: true,
            force_init: false,
            mixer_channels: DEFAULT_MIXER_CHANNELS,
            load_example_bank: false,
            example_volume: DEFAULT_VOLUME,
            mixer: MixerParams::default(),
            bindings: BTreeMap::new(),
        }
    }
}

impl SoundConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Sound config not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read sound config: {e}");
                return Self::default();
            },
        };

        match toml::from_str(&contents) {
            Ok(config) => {
                info!("Loaded sound config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse sound config: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to the default file location.
    pub fn save(&self) -> io::Result<()> {
        self.save_to(Self::config_path())
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved sound config to {}", path.display());
        Ok(())
    }

    /// Registry construction options described by this config.
    #[must_use]
    pub fn registry_options(&self) -> RegistryOptions {
        RegistryOptions {
            unique_channel: self.unique_channel,
            mixer: self.mixer.clone(),
            force_init: self.force_init,
        }
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn config_path() -> PathBuf {
        dirs_config_path().map_or_else(
            || PathBuf::from(CONFIG_FILE),
            |dir| dir.join("chime").join(CONFIG_FILE),
        )
    }
}

/// Get platform-specific config directory.
fn dirs_config_path() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Application Support"))
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SoundConfig::default();
        assert!(config.unique_channel);
        assert!(!config.force_init);
        assert_eq!(config.mixer_channels, 8);
        assert_eq!(config.mixer.frequency, 22050);
        assert!(config.bindings.is_empty());
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("chime.toml");

        let mut config = SoundConfig::default();
        config.unique_channel = false;
        config.mixer.frequency = 44100;
        config.mixer.device_name = "Headphones".into();
        config.bindings.insert(
            "open-menu".into(),
            BindingConfig {
                path: Some(PathBuf::from("sounds/open.ogg")),
                loops: 1,
                ..BindingConfig::default()
            },
        );
        config
            .bindings
            .insert("error".into(), BindingConfig::default());

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = SoundConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_parses_partial_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("chime.toml");
        fs::write(
            &config_path,
            r#"
load_example_bank = true

[mixer]
frequency = 48000

[mixer.allowed_changes]
channels = false

[bindings.error]
path = "buzz.ogg"
volume = 0.8
"#,
        )
        .expect("write config");

        let config = SoundConfig::load_from(&config_path);
        assert!(config.load_example_bank);
        assert!(config.unique_channel);
        assert_eq!(config.mixer.frequency, 48000);
        assert_eq!(config.mixer.channel_count, 2);
        assert!(config.mixer.allowed_changes.frequency);
        assert!(!config.mixer.allowed_changes.channels);

        let error = &config.bindings["error"];
        assert_eq!(error.path.as_deref(), Some(Path::new("buzz.ogg")));
        assert!((error.params().volume - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = SoundConfig::load_from("/nonexistent/path/chime.toml");
        assert_eq!(config, SoundConfig::default());
    }

    #[test]
    fn test_config_load_invalid_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("chime.toml");
        fs::write(&config_path, "unique_channel = \"sometimes\"").expect("write config");

        assert_eq!(SoundConfig::load_from(&config_path), SoundConfig::default());
    }

    #[test]
    fn test_registry_options_from_config() {
        let mut config = SoundConfig::default();
        config.force_init = true;
        config.mixer.buffer_size = 512;

        let options = config.registry_options();
        assert!(options.force_init);
        assert!(options.unique_channel);
        assert_eq!(options.mixer.buffer_size, 512);
    }
}
