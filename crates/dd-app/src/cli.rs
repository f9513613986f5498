use std::path::PathBuf;

use clap::Parser;

/// ditdah — Interactive Morse transcoder and tone player.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Contenu initial du champ texte (TUI).
    #[arg(long)]
    pub text: Option<String>,

    /// Contenu initial du champ Morse (TUI).
    #[arg(long)]
    pub morse: Option<String>,

    /// Mode one-shot : encode le texte en Morse sur stdout, puis quitte.
    #[arg(long)]
    pub encode: Option<String>,

    /// Mode one-shot : décode le Morse en texte sur stdout, puis quitte.
    #[arg(long)]
    pub decode: Option<String>,

    /// Mode one-shot : joue le texte en Morse sur la sortie audio, puis quitte.
    #[arg(long)]
    pub play: Option<String>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Fréquence de la tonalité en Hz (prioritaire sur la config).
    #[arg(long)]
    pub freq: Option<f32>,

    /// Durée du point en millisecondes (prioritaire sur la config).
    #[arg(long)]
    pub dot_ms: Option<u32>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Validate that mode flags are consistent.
    ///
    /// # Errors
    /// Returns an error if more than one one-shot mode is specified, or if
    /// both initial-content flags are given.
    pub fn validate(&self) -> anyhow::Result<()> {
        let count = usize::from(self.encode.is_some())
            + usize::from(self.decode.is_some())
            + usize::from(self.play.is_some());

        if count > 1 {
            anyhow::bail!("Un seul mode à la fois. Spécifiez --encode, --decode, OU --play.");
        }
        if self.text.is_some() && self.morse.is_some() {
            anyhow::bail!("Un seul contenu initial à la fois. Spécifiez --text OU --morse.");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_modes_are_exclusive() {
        let cli = Cli::try_parse_from(["ditdah", "--encode", "SOS", "--decode", "..."]).unwrap();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn initial_content_flags_are_exclusive() {
        let cli = Cli::try_parse_from(["ditdah", "--text", "HI", "--morse", ".-"]).unwrap();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn plain_invocation_validates() {
        let cli = Cli::try_parse_from(["ditdah"]).unwrap();
        assert!(cli.validate().is_ok());
        assert_eq!(cli.log_level, "warn");
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
    }

    #[test]
    fn overrides_parse() {
        let cli =
            Cli::try_parse_from(["ditdah", "--freq", "440", "--dot-ms", "80", "--play", "CQ"])
                .unwrap();
        assert!(cli.validate().is_ok());
        assert_eq!(cli.freq, Some(440.0));
        assert_eq!(cli.dot_ms, Some(80));
    }
}
