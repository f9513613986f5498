use std::sync::Arc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use rtrb::{Consumer, Producer, RingBuffer};

use dd_core::clock::StreamClock;
use dd_core::config::PlayerConfig;
use dd_core::scheduler::ToneSink;

use crate::error::AudioError;
use crate::synth::{ToneCmd, ToneSynth, ToneWindow};

/// Profondeur de la file de commandes vers le callback.
const CMD_QUEUE_LEN: usize = 256;

/// Sortie audio temps réel.
///
/// Ouvre le périphérique de sortie par défaut et fait tourner un
/// `ToneSynth` dans le callback cpal. Les requêtes arrivent par une file
/// lock-free; l'horloge de flux est avancée par le callback et datée en
/// samples, si bien que les fenêtres programmées tombent à l'échantillon
/// près quelle que soit la granularité de la boucle d'app.
///
/// # Example
/// ```no_run
/// use dd_core::config::PlayerConfig;
/// use dd_audio::output::ToneOutput;
/// let output = ToneOutput::open(&PlayerConfig::default()).unwrap();
/// assert!(output.current_time().as_secs() < 1);
/// ```
pub struct ToneOutput {
    /// Flux cpal, maintenu en vie avec la sortie.
    _stream: cpal::Stream,
    clock: Arc<StreamClock>,
    cmd_tx: Producer<ToneCmd>,
    sample_rate: u32,
}

impl ToneOutput {
    /// Ouvre le périphérique de sortie par défaut et démarre le flux.
    ///
    /// # Errors
    /// Échoue si aucun périphérique n'existe, si son format n'est pas géré
    /// ou si le flux ne peut pas être créé ou démarré.
    pub fn open(config: &PlayerConfig) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::StreamError(e.to_string()))?;
        let sample_format = supported.sample_format();
        let stream_config = supported.config();
        let sample_rate = stream_config.sample_rate.0;

        let clock = Arc::new(StreamClock::new(sample_rate));
        let (cmd_tx, cmd_rx) = RingBuffer::new(CMD_QUEUE_LEN);
        let synth = ToneSynth::new(sample_rate, config.amplitude, config.fade_ms);

        let stream = match sample_format {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &stream_config, synth, cmd_rx, Arc::clone(&clock))
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &stream_config, synth, cmd_rx, Arc::clone(&clock))
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &stream_config, synth, cmd_rx, Arc::clone(&clock))
            }
            other => return Err(AudioError::UnsupportedFormat(format!("{other:?}"))),
        }?;

        stream.play().map_err(|e| AudioError::StreamError(e.to_string()))?;

        log::info!(
            "Sortie audio ouverte : {sample_rate} Hz, {} canaux ({sample_format:?})",
            stream_config.channels
        );

        Ok(Self {
            _stream: stream,
            clock,
            cmd_tx,
            sample_rate,
        })
    }

    /// Position de lecture du flux — l'horloge qui date les requêtes.
    #[must_use]
    pub fn current_time(&self) -> Duration {
        self.clock.elapsed()
    }

    /// Sample rate du flux ouvert.
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn push(&mut self, cmd: ToneCmd) {
        if self.cmd_tx.push(cmd).is_err() {
            log::warn!("File de commandes audio pleine, commande ignorée");
        }
    }
}

impl ToneSink for ToneOutput {
    fn emit_tone(&mut self, freq_hz: f32, start: Duration, duration: Duration) {
        let rate = f64::from(self.sample_rate);
        let start_sample = (start.as_secs_f64() * rate).round() as u64;
        let len = (duration.as_secs_f64() * rate).round() as u64;
        self.push(ToneCmd::Tone(ToneWindow {
            start: start_sample,
            end: start_sample + len,
            freq_hz,
        }));
    }

    fn cancel_all(&mut self) {
        self.push(ToneCmd::CancelAll);
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut synth: ToneSynth,
    mut cmd_rx: Consumer<ToneCmd>,
    clock: Arc<StreamClock>,
) -> Result<cpal::Stream, AudioError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let mut pos = clock.sample_pos();
                while let Ok(cmd) = cmd_rx.pop() {
                    synth.apply(cmd, pos);
                }
                for frame in data.chunks_mut(channels) {
                    let value = T::from_sample(synth.next_sample(pos));
                    for sample in frame.iter_mut() {
                        *sample = value;
                    }
                    pos += 1;
                }
                clock.advance((data.len() / channels) as u64);
            },
            |err| {
                log::error!("Erreur de stream audio : {err}");
            },
            None,
        )
        .map_err(|e| AudioError::StreamError(e.to_string()))
}
