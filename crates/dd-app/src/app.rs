use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use arc_swap::ArcSwap;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;

use dd_audio::ToneOutput;
use dd_core::config::PlayerConfig;
use dd_core::scheduler::PlaybackScheduler;
use dd_core::sheet::TranscodeSheet;
use dd_core::timing::MorseTiming;

use crate::ui;

/// État global de l'application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Running,
    Help,
    Quitting,
}

/// Champ de saisie ayant le focus clavier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Text,
    Morse,
}

/// État de l'application interactive.
pub struct App {
    state: AppState,
    config: Arc<ArcSwap<PlayerConfig>>,
    sheet: TranscodeSheet,
    scheduler: PlaybackScheduler,
    audio: Option<ToneOutput>,
    focus: Field,
    text_cursor: usize,
    morse_cursor: usize,
}

impl App {
    #[must_use]
    pub fn new(
        config: Arc<ArcSwap<PlayerConfig>>,
        audio: Option<ToneOutput>,
        sheet: TranscodeSheet,
    ) -> Self {
        let text_cursor = sheet.text().chars().count();
        let morse_cursor = sheet.morse().chars().count();
        Self {
            state: AppState::Running,
            config,
            sheet,
            scheduler: PlaybackScheduler::new(),
            audio,
            focus: Field::Text,
            text_cursor,
            morse_cursor,
        }
    }

    /// Main event loop: keyboard, playback progress, rendering.
    ///
    /// # Errors
    /// Returns an error if terminal operations fail.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let mut last_frame = Instant::now();

        loop {
            // === Sortie si quitting ===
            if self.state == AppState::Quitting {
                break;
            }

            // === Calcul du frame timing ===
            let config_guard = self.config.load();
            let frame_duration = Duration::from_secs_f64(1.0 / f64::from(config_guard.target_fps));
            drop(config_guard);

            let now = Instant::now();
            let elapsed = now - last_frame;

            if elapsed < frame_duration {
                // Dormir le temps restant, mais rester réactif aux événements
                let remaining = frame_duration.saturating_sub(elapsed);
                if event::poll(remaining)? {
                    self.handle_event(&event::read()?);
                }
                continue;
            }
            last_frame = now;

            // === Polling événements non-bloquant ===
            while event::poll(Duration::ZERO)? {
                self.handle_event(&event::read()?);
            }

            // === Avancer la lecture sur l'horloge audio ===
            self.drive_playback();

            // === Rendu ===
            terminal.draw(|frame| {
                let config = self.config.load();
                ui::draw(
                    frame,
                    &ui::DrawContext {
                        text: self.sheet.text(),
                        morse: self.sheet.morse(),
                        focus: self.focus,
                        text_cursor: self.text_cursor,
                        morse_cursor: self.morse_cursor,
                        playing: self.scheduler.is_playing(),
                        progress: self.scheduler.progress(),
                        audio_ready: self.audio.is_some(),
                        dot_secs: config.dot_secs,
                        tone_hz: config.tone_hz,
                        show_help: self.state == AppState::Help,
                    },
                );
            })?;
        }

        Ok(())
    }

    /// Fait avancer la lecture sur l'horloge du flux audio.
    fn drive_playback(&mut self) {
        if let Some(audio) = self.audio.as_mut() {
            let now = audio.current_time();
            self.scheduler.tick(now, audio);
        }
    }

    fn handle_event(&mut self, event: &Event) {
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = *event
        {
            if modifiers.contains(KeyModifiers::CONTROL) {
                match code {
                    KeyCode::Char('c') => self.quit(),
                    // Les champs sont verrouillés pendant la lecture.
                    KeyCode::Char('u') if !self.scheduler.is_playing() => {
                        self.clear_focused_field();
                    }
                    _ => {}
                }
                return;
            }

            if self.state == AppState::Help {
                if matches!(code, KeyCode::F(1) | KeyCode::Esc | KeyCode::Enter) {
                    self.state = AppState::Running;
                }
                return;
            }

            match code {
                KeyCode::Esc => self.quit(),
                KeyCode::F(1) => self.state = AppState::Help,
                KeyCode::Enter => self.toggle_playback(),
                KeyCode::Tab | KeyCode::BackTab if !self.scheduler.is_playing() => {
                    self.switch_focus();
                }
                _ if !self.scheduler.is_playing() => self.handle_field_key(code),
                // Lecture en cours : l'édition est ignorée.
                _ => {}
            }
        }
    }

    fn quit(&mut self) {
        self.stop_playback();
        self.state = AppState::Quitting;
    }

    fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Field::Text => Field::Morse,
            Field::Morse => Field::Text,
        };
    }

    /// Démarre ou interrompt la lecture du champ Morse.
    ///
    /// Les paramètres (durée du point, fréquence) sont figés à cet instant,
    /// un rechargement de config ne touche pas la session en cours. Sans
    /// sortie audio la demande est ignorée en silence.
    fn toggle_playback(&mut self) {
        let Some(audio) = self.audio.as_mut() else {
            log::debug!("lecture ignorée : pas de sortie audio");
            return;
        };
        if self.scheduler.is_playing() {
            self.scheduler.stop(audio);
            return;
        }
        let config = self.config.load();
        let timing = MorseTiming::from_dot_secs(config.dot_secs);
        self.scheduler
            .play(self.sheet.morse(), timing, config.tone_hz, audio.current_time());
    }

    fn stop_playback(&mut self) {
        if let Some(audio) = self.audio.as_mut() {
            self.scheduler.stop(audio);
        }
    }

    fn clear_focused_field(&mut self) {
        match self.focus {
            Field::Text => {
                self.sheet.set_text(String::new());
                self.text_cursor = 0;
            }
            Field::Morse => {
                self.sheet.set_morse(String::new());
                self.morse_cursor = 0;
            }
        }
        self.clamp_cursors();
    }

    /// Édition du champ focalisé, curseur compté en caractères.
    fn handle_field_key(&mut self, code: KeyCode) {
        let content = match self.focus {
            Field::Text => self.sheet.text(),
            Field::Morse => self.sheet.morse(),
        };
        let mut chars: Vec<char> = content.chars().collect();
        let mut cursor = match self.focus {
            Field::Text => self.text_cursor,
            Field::Morse => self.morse_cursor,
        }
        .min(chars.len());
        let mut edited = false;

        match code {
            KeyCode::Backspace => {
                if cursor > 0 {
                    chars.remove(cursor - 1);
                    cursor -= 1;
                    edited = true;
                }
            }
            KeyCode::Delete => {
                if cursor < chars.len() {
                    chars.remove(cursor);
                    edited = true;
                }
            }
            KeyCode::Left => cursor = cursor.saturating_sub(1),
            KeyCode::Right => {
                if cursor < chars.len() {
                    cursor += 1;
                }
            }
            KeyCode::Home => cursor = 0,
            KeyCode::End => cursor = chars.len(),
            KeyCode::Char(ch) => {
                chars.insert(cursor, ch);
                cursor += 1;
                edited = true;
            }
            _ => return,
        }

        if edited {
            let content: String = chars.into_iter().collect();
            match self.focus {
                Field::Text => self.sheet.set_text(content),
                Field::Morse => self.sheet.set_morse(content),
            }
        }
        match self.focus {
            Field::Text => self.text_cursor = cursor,
            Field::Morse => self.morse_cursor = cursor,
        }
        // L'autre vue vient d'être re-dérivée, son curseur peut dépasser.
        self.clamp_cursors();
    }

    fn clamp_cursors(&mut self) {
        self.text_cursor = self.text_cursor.min(self.sheet.text().chars().count());
        self.morse_cursor = self.morse_cursor.min(self.sheet.morse().chars().count());
    }
}
