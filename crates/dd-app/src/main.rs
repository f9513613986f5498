use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use clap::Parser;
use dd_audio::ToneOutput;
use dd_core::sheet::TranscodeSheet;

pub mod app;
pub mod cli;
pub mod headless;
pub mod hotreload;
pub mod ui;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Valider les combinaisons de flags
    cli.validate()?;

    // 4. Charger la config
    let mut config = resolve_config(&cli)?;

    // 4b. Appliquer les overrides CLI
    if let Some(hz) = cli.freq {
        config.tone_hz = hz;
    }
    if let Some(ms) = cli.dot_ms {
        config.dot_secs = f64::from(ms) / 1000.0;
    }
    config.clamp_all();

    // Modes one-shot, sans TUI
    if let Some(text) = cli.encode.as_deref() {
        headless::run_encode(text);
        return Ok(());
    }
    if let Some(code) = cli.decode.as_deref() {
        headless::run_decode(code);
        return Ok(());
    }
    if let Some(text) = cli.play.as_deref() {
        return headless::run_play(text, &config);
    }

    let config = Arc::new(ArcSwap::from_pointee(config));

    // 5. Lancer le hot-reload config (thread interne notify)
    let _watcher = if cli.config.exists() {
        Some(hotreload::spawn_config_watcher(&cli.config, &config)?)
    } else {
        None
    };

    // 6. Ouvrir la sortie audio (absence tolérée)
    let audio = init_audio(&config);

    // 7. Pré-remplir la feuille de transcodage depuis les flags
    let mut sheet = TranscodeSheet::new();
    if let Some(text) = cli.text {
        sheet.set_text(text);
    } else if let Some(morse) = cli.morse {
        sheet.set_morse(morse);
    }

    // 8. Initialiser le terminal ratatui
    let terminal = ratatui::init();

    // 9. Construire l'App
    let mut app_instance = app::App::new(config, audio, sheet);

    // 10. Boucle principale
    let result = app_instance.run(terminal);

    // 11. Restaurer le terminal (TOUJOURS, même en cas d'erreur)
    ratatui::restore();

    result
}

/// Open the default audio output; a missing device is tolerated.
fn init_audio(config: &Arc<ArcSwap<dd_core::config::PlayerConfig>>) -> Option<ToneOutput> {
    match ToneOutput::open(&config.load_full()) {
        Ok(output) => Some(output),
        Err(e) => {
            log::warn!("Audio non disponible : {e}");
            None
        }
    }
}

/// Resolve config: missing file falls back to compiled defaults.
fn resolve_config(cli: &cli::Cli) -> Result<dd_core::config::PlayerConfig> {
    if cli.config.exists() {
        dd_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(dd_core::config::PlayerConfig::default())
    }
}
