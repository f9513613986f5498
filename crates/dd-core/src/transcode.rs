use crate::code::CodeTable;

/// Encode du texte en Morse.
///
/// Chaque caractère est replié en majuscule ASCII puis cherché dans la
/// table; les caractères non mappés (espaces compris) passent tels quels.
/// Les tokens sont joints par un espace simple. Totale, sans échec.
///
/// # Example
/// ```
/// use dd_core::transcode::text_to_morse;
/// assert_eq!(text_to_morse("SOS"), "... --- ...");
/// assert_eq!(text_to_morse("A!B"), ".- ! -...");
/// assert_eq!(text_to_morse(""), "");
/// ```
#[must_use]
pub fn text_to_morse(input: &str) -> String {
    let table = CodeTable::global();
    let mut out = String::with_capacity(input.len() * 6);
    for (i, ch) in input.chars().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        // Repli ASCII uniquement: un caractère source reste un token,
        // là où un repli Unicode peut en produire plusieurs (ß → SS).
        let upper = ch.to_ascii_uppercase();
        match table.encode(upper) {
            Some(code) => out.push_str(code),
            None => out.push(upper),
        }
    }
    out
}

/// Décode une chaîne Morse en texte.
///
/// La chaîne est découpée sur chaque espace simple; chaque token est cherché
/// dans la table inverse, les tokens non mappés passent tels quels, le tout
/// est concaténé sans séparateur. Totale, sans échec.
///
/// L'encodeur produit exactement deux tokens vides par espace source (le
/// token ` ` littéral entouré de ses deux séparateurs); une suite de `k`
/// tokens vides redonne donc `⌊k/2⌋` espaces.
///
/// # Example
/// ```
/// use dd_core::transcode::morse_to_text;
/// assert_eq!(morse_to_text("... --- ..."), "SOS");
/// assert_eq!(morse_to_text(".-   -..."), "A B");
/// assert_eq!(morse_to_text(""), "");
/// ```
#[must_use]
pub fn morse_to_text(input: &str) -> String {
    let table = CodeTable::global();
    let mut out = String::with_capacity(input.len() / 2 + 1);
    let mut empty_run = 0usize;
    for token in input.split(' ') {
        if token.is_empty() {
            empty_run += 1;
            continue;
        }
        for _ in 0..empty_run / 2 {
            out.push(' ');
        }
        empty_run = 0;
        match table.decode(token) {
            Some(ch) => out.push(ch),
            None => out.push_str(token),
        }
    }
    for _ in 0..empty_run / 2 {
        out.push(' ');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_sos() {
        assert_eq!(text_to_morse("SOS"), "... --- ...");
    }

    #[test]
    fn decodes_sos() {
        assert_eq!(morse_to_text("... --- ..."), "SOS");
    }

    #[test]
    fn empty_both_ways() {
        assert_eq!(text_to_morse(""), "");
        assert_eq!(morse_to_text(""), "");
    }

    #[test]
    fn lowercase_is_folded() {
        assert_eq!(text_to_morse("sos"), "... --- ...");
    }

    #[test]
    fn unmapped_char_passes_through() {
        assert_eq!(text_to_morse("A!B"), ".- ! -...");
    }

    #[test]
    fn unmapped_token_passes_through() {
        assert_eq!(morse_to_text("... xyz ..."), "SxyzS");
    }

    #[test]
    fn digits() {
        assert_eq!(text_to_morse("73"), "--... ...--");
        assert_eq!(morse_to_text("--... ...--"), "73");
    }

    #[test]
    fn space_becomes_literal_token() {
        assert_eq!(text_to_morse("A B"), ".-   -...");
        assert_eq!(text_to_morse(" "), " ");
    }

    #[test]
    fn roundtrip_preserves_internal_whitespace() {
        for s in [
            "HELLO WORLD",
            "A B",
            "A  B",
            " A",
            "A ",
            "   ",
            "CQ CQ DE 9Z",
            " ",
        ] {
            assert_eq!(morse_to_text(&text_to_morse(s)), s, "roundtrip de {s:?}");
        }
    }

    #[test]
    fn roundtrip_uppercases() {
        assert_eq!(morse_to_text(&text_to_morse("Hello World")), "HELLO WORLD");
    }

    #[test]
    fn irregular_spacing_is_deterministic() {
        // Un seul token vide (deux espaces tapés à la main): pas d'espace décodé.
        assert_eq!(morse_to_text(".-  -..."), "AB");
        // Deux tokens vides: un espace.
        assert_eq!(morse_to_text(".-   -..."), "A B");
        // Espaces seuls: "  " → trois tokens vides → un espace.
        assert_eq!(morse_to_text("  "), " ");
    }
}
