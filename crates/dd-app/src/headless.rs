use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use dd_audio::ToneOutput;
use dd_core::config::PlayerConfig;
use dd_core::scheduler::PlaybackScheduler;
use dd_core::timing::MorseTiming;
use dd_core::transcode::{morse_to_text, text_to_morse};

/// Écrit la traduction Morse de `text` sur stdout.
pub fn run_encode(text: &str) {
    println!("{}", text_to_morse(text));
}

/// Écrit le décodage de `morse` sur stdout.
pub fn run_decode(morse: &str) {
    println!("{}", morse_to_text(morse));
}

/// Joue `text` en Morse jusqu'à complétion, puis rend la main.
///
/// Contrairement au TUI, l'absence de sortie audio est ici une erreur :
/// jouer était la seule raison d'être du processus.
///
/// # Errors
///
/// Échoue si la sortie audio ne peut pas être ouverte.
pub fn run_play(text: &str, config: &PlayerConfig) -> Result<()> {
    let morse = text_to_morse(text);
    if morse.is_empty() {
        log::info!("Rien à jouer");
        return Ok(());
    }

    let mut audio = ToneOutput::open(config).context("Ouverture de la sortie audio")?;
    let timing = MorseTiming::from_dot_secs(config.dot_secs);
    let mut scheduler = PlaybackScheduler::new();
    scheduler.play(&morse, timing, config.tone_hz, audio.current_time());
    log::info!("Lecture de {} symboles", morse.chars().count());

    while scheduler.is_playing() {
        scheduler.tick(audio.current_time(), &mut audio);
        if let Some(due) = scheduler.next_due() {
            let wait = due
                .saturating_sub(audio.current_time())
                .clamp(Duration::from_millis(1), Duration::from_millis(10));
            thread::sleep(wait);
        }
    }

    // Laisse la fin de la dernière tonalité traverser le tampon du périphérique.
    thread::sleep(Duration::from_millis(150));
    log::info!("Lecture terminée");
    Ok(())
}
