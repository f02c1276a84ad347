//! Table des glyphes : neuf têtes de chat, une par chiffre `0`..`8`.
//!
//! Tout caractère absent de la table (espaces, texte libre, ponctuation)
//! est un commentaire et disparaît à la traduction.

/// Glyphes indexés par le chiffre qu'ils représentent.
///
/// 😸 😹 😺 😻 😼 😽 😾 😿 🙀
pub const GLYPHS: [char; 9] = [
    '\u{1F638}', // 0 😸
    '\u{1F639}', // 1 😹
    '\u{1F63A}', // 2 😺
    '\u{1F63B}', // 3 😻
    '\u{1F63C}', // 4 😼
    '\u{1F63D}', // 5 😽
    '\u{1F63E}', // 6 😾
    '\u{1F63F}', // 7 😿
    '\u{1F640}', // 8 🙀
];

/// Chiffre représenté par `c`, s'il fait partie de la table.
pub fn glyph_digit(c: char) -> Option<u8> {
    GLYPHS.iter().position(|&g| g == c).and_then(|d| u8::try_from(d).ok())
}

/// Glyphe du chiffre `d` (`0..=8`).
pub fn digit_glyph(d: u8) -> Option<char> {
    GLYPHS.get(usize::from(d)).copied()
}

/// Traduit un texte source en flux de chiffres (`"0"`..`"8"`).
///
/// Ne peut pas échouer : un texte sans glyphe donne un flux vide.
pub fn translate(source: &str) -> String {
    source
        .chars()
        .filter_map(glyph_digit)
        .map(|d| char::from(b'0' + d))
        .collect()
}

/// Inverse de [`translate`] : chaque chiffre `0`..`8` devient son glyphe,
/// tout le reste est ignoré.
pub fn to_glyphs(digits: &str) -> String {
    digits
        .bytes()
        .filter(u8::is_ascii_digit)
        .filter_map(|b| digit_glyph(b - b'0'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_all_glyphs_and_drops_commentary() {
        let source = "\
😸 This is 0
😹 This is 1
😺 This is 2
😻 This is 3
😼 This is 4
😽 This is 5
😾 This is 6
😿 This is 7
🙀 This is 8
";
        assert_eq!(translate(source), "012345678");
    }

    #[test]
    fn text_without_glyphs_is_empty() {
        assert_eq!(translate("just a comment, 0123 and 🐶"), "");
    }

    #[test]
    fn variation_selectors_are_dropped() {
        assert_eq!(translate("😼\u{FE0F}🙀"), "48");
    }

    #[test]
    fn glyphs_roundtrip_through_digits() {
        assert_eq!(translate(&to_glyphs("8760")), "8760");
        assert_eq!(to_glyphs("9x"), "");
    }
}
