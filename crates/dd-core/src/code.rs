use std::collections::HashMap;
use std::sync::OnceLock;

/// Alphabet Morse — 26 lettres + 10 chiffres, codes tous distincts.
pub const MORSE_TABLE: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
];

/// Table de correspondance caractère ↔ code Morse.
///
/// Construite une seule fois au démarrage du process; la table inverse est
/// dérivée de `MORSE_TABLE` par échange clé/valeur. Immuable ensuite.
///
/// # Example
/// ```
/// use dd_core::code::CodeTable;
/// let table = CodeTable::global();
/// assert_eq!(table.encode('S'), Some("..."));
/// assert_eq!(table.decode("---"), Some('O'));
/// assert_eq!(table.encode('!'), None);
/// ```
pub struct CodeTable {
    forward: HashMap<char, &'static str>,
    reverse: HashMap<&'static str, char>,
}

impl CodeTable {
    fn build() -> Self {
        let mut forward = HashMap::with_capacity(MORSE_TABLE.len());
        let mut reverse = HashMap::with_capacity(MORSE_TABLE.len());
        for &(ch, code) in MORSE_TABLE {
            let prev = forward.insert(ch, code);
            debug_assert!(prev.is_none(), "caractère dupliqué dans MORSE_TABLE: {ch}");
            let prev = reverse.insert(code, ch);
            debug_assert!(prev.is_none(), "code dupliqué dans MORSE_TABLE: {code}");
        }
        Self { forward, reverse }
    }

    /// Instance partagée, initialisée au premier accès.
    #[must_use]
    pub fn global() -> &'static Self {
        static TABLE: OnceLock<CodeTable> = OnceLock::new();
        TABLE.get_or_init(Self::build)
    }

    /// Code Morse d'un caractère (majuscule attendue), `None` si non mappé.
    #[inline]
    #[must_use]
    pub fn encode(&self, ch: char) -> Option<&'static str> {
        self.forward.get(&ch).copied()
    }

    /// Caractère correspondant à un code Morse, `None` si non mappé.
    #[inline]
    #[must_use]
    pub fn decode(&self, code: &str) -> Option<char> {
        self.reverse.get(code).copied()
    }
}

/// Classification d'un caractère d'une chaîne Morse, côté lecture.
///
/// `Gap` est l'espace que le transcodage insère entre les codes; tout
/// caractère qui n'est ni `.`, ni `-`, ni espace est `Other` (token
/// littéral passé tel quel par le Transcoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    /// `.` — tonalité d'une unité.
    Dit,
    /// `-` — tonalité de trois unités.
    Dah,
    /// ` ` — silence de sept unités.
    Gap,
    /// Caractère inconnu — ni tonalité, ni durée.
    Other,
}

impl Symbol {
    /// # Example
    /// ```
    /// use dd_core::code::Symbol;
    /// assert_eq!(Symbol::classify('.'), Symbol::Dit);
    /// assert_eq!(Symbol::classify('-'), Symbol::Dah);
    /// assert_eq!(Symbol::classify(' '), Symbol::Gap);
    /// assert_eq!(Symbol::classify('!'), Symbol::Other);
    /// ```
    #[inline]
    #[must_use]
    pub fn classify(ch: char) -> Self {
        match ch {
            '.' => Self::Dit,
            '-' => Self::Dah,
            ' ' => Self::Gap,
            _ => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_covers_letters_and_digits() {
        assert_eq!(MORSE_TABLE.len(), 36);
        let table = CodeTable::global();
        for ch in ('A'..='Z').chain('0'..='9') {
            assert!(table.encode(ch).is_some(), "caractère non mappé: {ch}");
        }
    }

    #[test]
    fn table_is_injective() {
        let mut seen = HashSet::new();
        for &(ch, code) in MORSE_TABLE {
            assert!(seen.insert(code), "code partagé: {ch} → {code}");
            assert!(code.chars().all(|c| c == '.' || c == '-'));
        }
    }

    #[test]
    fn reverse_inverts_forward() {
        let table = CodeTable::global();
        for &(ch, code) in MORSE_TABLE {
            assert_eq!(table.encode(ch), Some(code));
            assert_eq!(table.decode(code), Some(ch));
        }
    }

    #[test]
    fn unmapped_lookups_return_none() {
        let table = CodeTable::global();
        assert_eq!(table.encode('a'), None);
        assert_eq!(table.encode('!'), None);
        assert_eq!(table.decode(".-.-.-"), None);
        assert_eq!(table.decode(""), None);
    }
}
