use crate::transcode::{morse_to_text, text_to_morse};

/// Détenteur unique de l'état de transcodage.
///
/// Les deux chaînes — texte brut et rendu Morse — sont deux vues du même
/// état: chaque édition remplace une vue et re-dérive l'autre par une
/// fonction pure, dans un seul sens à la fois. Aucune boucle de mise à
/// jour réentrante n'est possible.
///
/// # Example
/// ```
/// use dd_core::sheet::TranscodeSheet;
/// let mut sheet = TranscodeSheet::new();
/// sheet.set_text("SOS".to_string());
/// assert_eq!(sheet.morse(), "... --- ...");
/// sheet.set_morse("- ..".to_string());
/// assert_eq!(sheet.text(), "TI");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TranscodeSheet {
    text: String,
    morse: String,
}

impl TranscodeSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remplace le texte et re-dérive le Morse.
    pub fn set_text(&mut self, text: String) {
        self.morse = text_to_morse(&text);
        self.text = text;
    }

    /// Remplace le Morse et re-dérive le texte.
    pub fn set_morse(&mut self, morse: String) {
        self.text = morse_to_text(&morse);
        self.morse = morse;
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn morse(&self) -> &str {
        &self.morse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_edit_derives_morse() {
        let mut sheet = TranscodeSheet::new();
        sheet.set_text("HI".to_string());
        assert_eq!(sheet.text(), "HI");
        assert_eq!(sheet.morse(), ".... ..");
    }

    #[test]
    fn morse_edit_derives_text() {
        let mut sheet = TranscodeSheet::new();
        sheet.set_morse("... --- ...".to_string());
        assert_eq!(sheet.text(), "SOS");
        assert_eq!(sheet.morse(), "... --- ...");
    }

    #[test]
    fn text_view_keeps_user_casing() {
        // Le repli en majuscules a lieu dans la dérivation, pas dans la vue.
        let mut sheet = TranscodeSheet::new();
        sheet.set_text("sos".to_string());
        assert_eq!(sheet.text(), "sos");
        assert_eq!(sheet.morse(), "... --- ...");
    }

    #[test]
    fn last_edit_wins() {
        let mut sheet = TranscodeSheet::new();
        sheet.set_text("AB".to_string());
        sheet.set_morse("-".to_string());
        assert_eq!(sheet.text(), "T");
        assert_eq!(sheet.morse(), "-");
    }

    #[test]
    fn empty_views() {
        let sheet = TranscodeSheet::new();
        assert_eq!(sheet.text(), "");
        assert_eq!(sheet.morse(), "");
    }
}
