use std::f32::consts::TAU;

/// Nombre maximal de fenêtres en attente côté callback. Le scheduler n'en
/// met qu'une poignée en vol; la borne garantit le zero-alloc en callback.
const MAX_WINDOWS: usize = 64;

/// Fenêtre de tonalité en samples, `end` exclusif.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneWindow {
    pub start: u64,
    pub end: u64,
    pub freq_hz: f32,
}

/// Commande transmise au synthétiseur via la file lock-free.
#[derive(Debug, Clone, Copy)]
pub enum ToneCmd {
    /// Programme une fenêtre de tonalité.
    Tone(ToneWindow),
    /// Abandonne les fenêtres non entamées et referme la fenêtre active
    /// sur une rampe de relâchement.
    CancelAll,
}

/// Générateur de tonalités piloté par fenêtres datées en samples.
///
/// Sinusoïde à accumulateur de phase, enveloppe linéaire d'attaque et de
/// relâchement aux bords de chaque fenêtre (anti-clic). Conçu pour tourner
/// dans le callback cpal: aucune allocation après construction, état
/// intégralement possédé.
///
/// # Example
/// ```
/// use dd_audio::synth::{ToneCmd, ToneSynth, ToneWindow};
/// let mut synth = ToneSynth::new(48_000, 0.3, 2.0);
/// synth.apply(
///     ToneCmd::Tone(ToneWindow { start: 0, end: 4_800, freq_hz: 600.0 }),
///     0,
/// );
/// let mut block = [0.0f32; 256];
/// synth.render(0, &mut block);
/// assert!(block.iter().any(|s| s.abs() > 0.0));
/// ```
pub struct ToneSynth {
    sample_rate: u32,
    amplitude: f32,
    fade_samples: u32,
    windows: Vec<ToneWindow>,
    phase: f32,
}

impl ToneSynth {
    /// Crée un synthétiseur pour `sample_rate`, avec une amplitude de
    /// sortie [0.0, 1.0] et une rampe anti-clic en millisecondes.
    #[must_use]
    pub fn new(sample_rate: u32, amplitude: f32, fade_ms: f32) -> Self {
        let fade_samples = (fade_ms.max(0.0) / 1000.0 * sample_rate as f32).round() as u32;
        Self {
            sample_rate,
            amplitude: amplitude.clamp(0.0, 1.0),
            fade_samples,
            windows: Vec::with_capacity(MAX_WINDOWS),
            phase: 0.0,
        }
    }

    /// Applique une commande, `pos` étant la position courante du flux.
    pub fn apply(&mut self, cmd: ToneCmd, pos: u64) {
        match cmd {
            ToneCmd::Tone(window) => {
                self.windows.retain(|w| w.end > pos);
                // File pleine: la fenêtre est abandonnée plutôt que
                // d'allouer dans le callback.
                if self.windows.len() < MAX_WINDOWS {
                    self.windows.push(window);
                }
            }
            ToneCmd::CancelAll => {
                self.windows.retain(|w| w.start <= pos);
                let cutoff = pos + u64::from(self.fade_samples);
                for w in &mut self.windows {
                    if w.end > cutoff {
                        w.end = cutoff;
                    }
                }
            }
        }
    }

    /// Sample mono à la position `pos`.
    ///
    /// Les fenêtres ne se chevauchent pas en usage normal (le scheduler est
    /// séquentiel); si elles se chevauchent, la première gagne.
    #[inline(always)]
    pub fn next_sample(&mut self, pos: u64) -> f32 {
        let mut gain = 0.0f32;
        let mut freq = 0.0f32;
        for w in &self.windows {
            if pos >= w.start && pos < w.end {
                gain = envelope(w, self.fade_samples, pos);
                freq = w.freq_hz;
                break;
            }
        }
        if gain > 0.0 && freq > 0.0 {
            self.phase = (self.phase + TAU * freq / self.sample_rate as f32) % TAU;
            self.phase.sin() * gain * self.amplitude
        } else {
            // Phase remise à zéro: chaque tonalité repart d'un passage à zéro.
            self.phase = 0.0;
            0.0
        }
    }

    /// Remplit `out` en mono à partir de la position `pos`.
    pub fn render(&mut self, mut pos: u64, out: &mut [f32]) {
        for slot in out {
            *slot = self.next_sample(pos);
            pos += 1;
        }
    }
}

/// Enveloppe linéaire: attaque sur `fade` samples, relâchement symétrique,
/// plateau à 1 entre les deux.
#[inline(always)]
fn envelope(w: &ToneWindow, fade: u32, pos: u64) -> f32 {
    let fade = u64::from(fade.max(1));
    let into = pos.saturating_sub(w.start) + 1;
    let remain = w.end.saturating_sub(pos);
    let attack = (into as f32 / fade as f32).min(1.0);
    let release = (remain as f32 / fade as f32).min(1.0);
    attack.min(release)
}
