use std::time::Duration;

use crate::code::Symbol;
use crate::timing::MorseTiming;

/// Récepteur des requêtes de tonalité, côté collaborateur audio.
///
/// `emit_tone` est fire-and-forget: le scheduler n'attend jamais la fin
/// d'une tonalité, il attend sa durée nominale. `cancel_all` coupe tout ce
/// qui est programmé ou en cours de sonner.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use dd_core::scheduler::ToneSink;
///
/// struct Probe(Vec<(f32, Duration, Duration)>);
/// impl ToneSink for Probe {
///     fn emit_tone(&mut self, freq_hz: f32, start: Duration, duration: Duration) {
///         self.0.push((freq_hz, start, duration));
///     }
///     fn cancel_all(&mut self) {
///         self.0.clear();
///     }
/// }
/// ```
pub trait ToneSink {
    /// Demande une sinusoïde de `freq_hz` débutant à `start` pour `duration`.
    fn emit_tone(&mut self, freq_hz: f32, start: Duration, duration: Duration);
    /// Annule toute tonalité programmée ou en cours.
    fn cancel_all(&mut self);
}

/// État observable du scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
}

/// Handle d'annulation: un pas différé, dû à `due`, reprenant la lecture
/// au symbole `cursor`. Invalider le handle suffit à empêcher le pas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledStep {
    /// Échéance du pas sur l'horloge de lecture.
    pub due: Duration,
    /// Index du prochain symbole à traiter.
    pub cursor: usize,
}

/// Session de lecture: figée à l'instant du `play`, détruite en bloc à la
/// complétion ou au `stop`.
#[derive(Debug)]
struct Session {
    symbols: Vec<char>,
    cursor: usize,
    timing: MorseTiming,
    tone_hz: f32,
    pending: Vec<ScheduledStep>,
}

/// Machine à états de lecture Morse, pilotée par `tick`.
///
/// Aucun timer interne: le propriétaire appelle `tick(now, sink)` à sa
/// cadence (boucle d'évènements, test synthétique) et le scheduler émet les
/// pas arrivés à échéance. Un seul pas est en vol à la fois; chaque pas
/// calcule l'émission du symbole courant et l'échéance du suivant.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use dd_core::scheduler::{PlaybackScheduler, PlaybackState, ToneSink};
/// use dd_core::timing::MorseTiming;
///
/// struct Mute;
/// impl ToneSink for Mute {
///     fn emit_tone(&mut self, _: f32, _: Duration, _: Duration) {}
///     fn cancel_all(&mut self) {}
/// }
///
/// let mut sched = PlaybackScheduler::new();
/// let mut sink = Mute;
/// sched.play("...", MorseTiming::default(), 600.0, Duration::ZERO);
/// sched.tick(Duration::ZERO, &mut sink);
/// assert_eq!(sched.state(), PlaybackState::Playing);
/// sched.tick(Duration::from_millis(500), &mut sink);
/// assert_eq!(sched.state(), PlaybackState::Idle);
/// ```
#[derive(Debug, Default)]
pub struct PlaybackScheduler {
    session: Option<Session>,
}

impl PlaybackScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        if self.session.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        }
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.session.is_some()
    }

    /// Position de lecture `(curseur, total)`, `None` à l'arrêt.
    #[must_use]
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.session
            .as_ref()
            .map(|s| (s.cursor, s.symbols.len()))
    }

    /// Échéance du prochain pas en vol, `None` à l'arrêt.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.session
            .as_ref()
            .and_then(|s| s.pending.first())
            .map(|step| step.due)
    }

    /// Démarre la lecture d'une chaîne Morse figée à cet instant.
    ///
    /// Ignoré si une lecture est déjà en cours (idempotent). Une chaîne
    /// vide se termine sur place: aucune émission, l'état reste `Idle`.
    /// Retourne `true` si une session a démarré; le premier pas est dû à
    /// `now`, le prochain `tick` l'émettra.
    pub fn play(&mut self, morse: &str, timing: MorseTiming, tone_hz: f32, now: Duration) -> bool {
        if self.session.is_some() {
            log::debug!("play ignoré: lecture déjà en cours");
            return false;
        }
        if morse.is_empty() {
            log::debug!("play: chaîne vide, complétion immédiate");
            return false;
        }
        let symbols: Vec<char> = morse.chars().collect();
        log::debug!("lecture démarrée: {} symboles", symbols.len());
        self.session = Some(Session {
            symbols,
            cursor: 0,
            timing,
            tone_hz,
            pending: vec![ScheduledStep {
                due: now,
                cursor: 0,
            }],
        });
        true
    }

    /// Interrompt la lecture: tous les pas en attente sont invalidés et le
    /// sink reçoit `cancel_all`, atomiquement avec le passage à `Idle`.
    /// Sans effet à l'arrêt.
    pub fn stop(&mut self, sink: &mut dyn ToneSink) {
        if let Some(session) = self.session.take() {
            sink.cancel_all();
            log::debug!(
                "lecture interrompue: {} pas annulé(s), curseur {}/{}",
                session.pending.len(),
                session.cursor,
                session.symbols.len()
            );
        }
    }

    /// Fait avancer la lecture jusqu'à `now`.
    ///
    /// Émet chaque pas arrivé à échéance, dans l'ordre de la chaîne, aux
    /// instants nominaux ancrés sur le `now` du `play` — un tick tardif
    /// rattrape sans dériver. Les symboles inconnus sont sautés sans durée
    /// ni tonalité.
    pub fn tick(&mut self, now: Duration, sink: &mut dyn ToneSink) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        loop {
            let Some(step) = session.pending.first().copied() else {
                debug_assert!(false, "session active sans pas en attente");
                return;
            };
            if step.due > now {
                self.session = Some(session);
                return;
            }
            session.pending.clear();
            session.cursor = step.cursor;

            while session.cursor < session.symbols.len()
                && Symbol::classify(session.symbols[session.cursor]) == Symbol::Other
            {
                session.cursor += 1;
            }

            if session.cursor >= session.symbols.len() {
                log::debug!("lecture terminée ({} symboles)", session.symbols.len());
                return;
            }

            let sym = Symbol::classify(session.symbols[session.cursor]);
            session.cursor += 1;
            let is_last = session.cursor >= session.symbols.len();

            let next_due = match sym {
                Symbol::Dit | Symbol::Dah => {
                    let dur = if sym == Symbol::Dit {
                        session.timing.dit()
                    } else {
                        session.timing.dah()
                    };
                    sink.emit_tone(session.tone_hz, step.due, dur);
                    // La pause inter-symbole ne suit pas la dernière tonalité.
                    if is_last {
                        step.due + dur
                    } else {
                        step.due + dur + session.timing.element_gap()
                    }
                }
                Symbol::Gap => step.due + session.timing.space_gap(),
                // Filtré par la boucle de saut ci-dessus.
                Symbol::Other => step.due,
            };

            session.pending.push(ScheduledStep {
                due: next_due,
                cursor: session.cursor,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HZ: f32 = 600.0;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[derive(Default)]
    struct RecordingSink {
        tones: Vec<(f32, Duration, Duration)>,
        cancels: usize,
    }

    impl ToneSink for RecordingSink {
        fn emit_tone(&mut self, freq_hz: f32, start: Duration, duration: Duration) {
            self.tones.push((freq_hz, start, duration));
        }
        fn cancel_all(&mut self) {
            self.cancels += 1;
        }
    }

    fn start(morse: &str) -> (PlaybackScheduler, RecordingSink) {
        let mut sched = PlaybackScheduler::new();
        let sink = RecordingSink::default();
        assert!(sched.play(morse, MorseTiming::default(), HZ, Duration::ZERO));
        (sched, sink)
    }

    #[test]
    fn three_dits_finish_at_half_a_second() {
        let (mut sched, mut sink) = start("...");

        sched.tick(Duration::ZERO, &mut sink);
        assert_eq!(sink.tones, vec![(HZ, ms(0), ms(100))]);
        assert!(sched.is_playing());

        sched.tick(ms(150), &mut sink);
        assert_eq!(sink.tones.len(), 1, "rien n'est dû avant 200 ms");

        sched.tick(ms(200), &mut sink);
        sched.tick(ms(400), &mut sink);
        assert_eq!(
            sink.tones,
            vec![
                (HZ, ms(0), ms(100)),
                (HZ, ms(200), ms(100)),
                (HZ, ms(400), ms(100)),
            ]
        );

        sched.tick(ms(499), &mut sink);
        assert!(sched.is_playing(), "la dernière tonalité court jusqu'à 500 ms");
        sched.tick(ms(500), &mut sink);
        assert_eq!(sched.state(), PlaybackState::Idle);
        assert_eq!(sink.tones.len(), 3);
    }

    #[test]
    fn dah_lasts_three_units() {
        let (mut sched, mut sink) = start("-");
        sched.tick(Duration::ZERO, &mut sink);
        assert_eq!(sink.tones, vec![(HZ, ms(0), ms(300))]);
        sched.tick(ms(299), &mut sink);
        assert!(sched.is_playing());
        sched.tick(ms(300), &mut sink);
        assert!(!sched.is_playing());
    }

    #[test]
    fn gap_advances_seven_units_in_silence() {
        let (mut sched, mut sink) = start(". .");
        sched.tick(Duration::ZERO, &mut sink);
        // Point à 0, pause à 100, espace de 200 à 900, point à 900.
        sched.tick(ms(890), &mut sink);
        assert_eq!(sink.tones.len(), 1);
        sched.tick(ms(900), &mut sink);
        assert_eq!(sink.tones[1], (HZ, ms(900), ms(100)));
        sched.tick(ms(1000), &mut sink);
        assert!(!sched.is_playing());
    }

    #[test]
    fn stop_cancels_every_pending_step() {
        let (mut sched, mut sink) = start("...");
        sched.tick(Duration::ZERO, &mut sink);
        assert_eq!(sink.tones.len(), 1);

        sched.stop(&mut sink);
        assert_eq!(sched.state(), PlaybackState::Idle);
        assert_eq!(sink.cancels, 1);
        assert_eq!(sched.progress(), None);

        // Aucune émission tardive, même bien après les échéances initiales.
        sched.tick(ms(200), &mut sink);
        sched.tick(ms(400), &mut sink);
        sched.tick(ms(5000), &mut sink);
        assert_eq!(sink.tones.len(), 1);
    }

    #[test]
    fn stop_when_idle_does_nothing() {
        let mut sched = PlaybackScheduler::new();
        let mut sink = RecordingSink::default();
        sched.stop(&mut sink);
        assert_eq!(sink.cancels, 0);
    }

    #[test]
    fn duplicate_play_is_ignored() {
        let (mut sched, mut sink) = start("...");
        sched.tick(Duration::ZERO, &mut sink);
        let progress = sched.progress();
        let due = sched.next_due();

        assert!(!sched.play("---", MorseTiming::default(), HZ, ms(50)));
        assert_eq!(sched.progress(), progress);
        assert_eq!(sched.next_due(), due);

        // La session d'origine continue: des points, pas des traits.
        sched.tick(ms(200), &mut sink);
        assert_eq!(sink.tones[1], (HZ, ms(200), ms(100)));
    }

    #[test]
    fn empty_string_completes_in_place() {
        let mut sched = PlaybackScheduler::new();
        let mut sink = RecordingSink::default();
        assert!(!sched.play("", MorseTiming::default(), HZ, Duration::ZERO));
        assert_eq!(sched.state(), PlaybackState::Idle);
        sched.tick(ms(100), &mut sink);
        assert!(sink.tones.is_empty());
    }

    #[test]
    fn unknown_symbols_are_skipped_without_delay() {
        let (mut sched, mut sink) = start("x.x");
        sched.tick(Duration::ZERO, &mut sink);
        // Le x de tête ne décale pas le point: tonalité à 0.
        assert_eq!(sink.tones, vec![(HZ, ms(0), ms(100))]);
        // Le x de queue ne prolonge rien au-delà de la pause du point.
        sched.tick(ms(200), &mut sink);
        assert!(!sched.is_playing());
        assert_eq!(sink.tones.len(), 1);
    }

    #[test]
    fn all_unknown_string_completes_on_first_tick() {
        let (mut sched, mut sink) = start("!?");
        assert!(sched.is_playing());
        sched.tick(Duration::ZERO, &mut sink);
        assert!(!sched.is_playing());
        assert!(sink.tones.is_empty());
    }

    #[test]
    fn trailing_space_still_runs_its_silence() {
        let (mut sched, mut sink) = start(". ");
        sched.tick(Duration::ZERO, &mut sink);
        sched.tick(ms(200), &mut sink);
        assert!(sched.is_playing(), "l'espace final court jusqu'à 900 ms");
        sched.tick(ms(900), &mut sink);
        assert!(!sched.is_playing());
        assert_eq!(sink.tones.len(), 1);
    }

    #[test]
    fn late_tick_catches_up_on_nominal_times() {
        let (mut sched, mut sink) = start("...");
        sched.tick(ms(10_000), &mut sink);
        assert_eq!(
            sink.tones,
            vec![
                (HZ, ms(0), ms(100)),
                (HZ, ms(200), ms(100)),
                (HZ, ms(400), ms(100)),
            ]
        );
        assert!(!sched.is_playing());
    }

    #[test]
    fn play_after_stop_starts_fresh() {
        let (mut sched, mut sink) = start("...");
        sched.tick(Duration::ZERO, &mut sink);
        sched.stop(&mut sink);

        assert!(sched.play("-", MorseTiming::default(), HZ, ms(1000)));
        sched.tick(ms(1000), &mut sink);
        assert_eq!(sink.tones[1], (HZ, ms(1000), ms(300)));
        assert_eq!(sched.progress(), Some((1, 1)));
    }

    #[test]
    fn sos_word_timeline() {
        let (mut sched, mut sink) = start("... ---");
        sched.tick(ms(4000), &mut sink);
        // Points à 0/200/400, espace de 600 à 1300, traits à 1300/1700/2100.
        assert_eq!(
            sink.tones,
            vec![
                (HZ, ms(0), ms(100)),
                (HZ, ms(200), ms(100)),
                (HZ, ms(400), ms(100)),
                (HZ, ms(1300), ms(300)),
                (HZ, ms(1700), ms(300)),
                (HZ, ms(2100), ms(300)),
            ]
        );
        assert!(!sched.is_playing());
    }
}
