use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Configuration du lecteur, hot-rechargeable.
///
/// Chargée depuis TOML, chaque champ a une valeur par défaut saine. Une
/// requête de lecture fige ses paramètres au départ: un rechargement ne
/// modifie jamais une session en cours.
///
/// # Example
/// ```
/// use dd_core::config::PlayerConfig;
/// let config = PlayerConfig::default();
/// assert!((config.dot_secs - 0.1).abs() < 1e-9);
/// assert_eq!(config.target_fps, 60);
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct PlayerConfig {
    // === Lecture ===
    /// Durée du point en secondes [0.01, 2.0].
    pub dot_secs: f64,
    /// Fréquence de la tonalité en Hz [100.0, 2000.0].
    pub tone_hz: f32,
    /// Amplitude de sortie [0.0, 1.0].
    pub amplitude: f32,
    /// Rampe d'attaque/relâchement en millisecondes [0.0, 20.0] (anti-clic).
    pub fade_ms: f32,

    // === UI ===
    /// FPS cible de la boucle d'évènements [15, 240].
    pub target_fps: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            dot_secs: 0.1,
            tone_hz: 600.0,
            amplitude: 0.3,
            fade_ms: 2.0,
            target_fps: 60,
        }
    }
}

impl PlayerConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.dot_secs = if self.dot_secs.is_finite() {
            self.dot_secs.clamp(0.01, 2.0)
        } else {
            0.1
        };
        self.tone_hz = if self.tone_hz.is_finite() {
            self.tone_hz.clamp(100.0, 2000.0)
        } else {
            600.0
        };
        self.amplitude = if self.amplitude.is_finite() {
            self.amplitude.clamp(0.0, 1.0)
        } else {
            0.3
        };
        self.fade_ms = if self.fade_ms.is_finite() {
            self.fade_ms.clamp(0.0, 20.0)
        } else {
            2.0
        };
        self.target_fps = self.target_fps.clamp(15, 240);
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    player: PlayerSection,
    ui: Option<UiSection>,
}

/// Player section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct PlayerSection {
    dot_secs: Option<f64>,
    tone_hz: Option<f32>,
    amplitude: Option<f32>,
    fade_ms: Option<f32>,
}

/// UI section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct UiSection {
    target_fps: Option<u32>,
}

/// Parse un document TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the document cannot be parsed.
pub fn parse_config(content: &str) -> Result<PlayerConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = PlayerConfig::default();

    let p = file.player;
    if let Some(v) = p.dot_secs {
        config.dot_secs = v;
    }
    if let Some(v) = p.tone_hz {
        config.tone_hz = v;
    }
    if let Some(v) = p.amplitude {
        config.amplitude = v;
    }
    if let Some(v) = p.fade_ms {
        config.fade_ms = v;
    }

    if let Some(ui) = file.ui
        && let Some(v) = ui.target_fps
    {
        config.target_fps = v;
    }

    config.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use dd_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<PlayerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("dans {}", path.display()))
}
