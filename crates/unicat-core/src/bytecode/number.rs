//! Nombres auto-terminés.
//!
//! Format : chiffres octaux de la magnitude, puis le terminateur `8`, puis un
//! chiffre de signe (`7` = négatif, n'importe quoi d'autre = positif).
//! `8` ne peut jamais apparaître dans une magnitude.

use super::cursor::DigitCursor;

/// Chiffre qui termine la magnitude.
pub const TERMINATOR: u8 = 8;

/// Chiffre de signe qui rend le nombre négatif.
pub const NEGATIVE_MARKER: u8 = 7;

/// Valeur sentinelle d'un nombre tronqué ou corrompu.
pub const CORRUPT_NUMBER: i64 = 1337;

/// Décode un nombre ; renvoie [`CORRUPT_NUMBER`] si le flux s'épuise avant
/// le terminateur.
///
/// Après l'appel, le curseur est juste après le chiffre de signe (ou en fin
/// de flux).
pub fn decode_number(cursor: &mut DigitCursor<'_>) -> i64 {
    read_number(cursor).unwrap_or(CORRUPT_NUMBER)
}

/// Variante interne : `None` si le terminateur n'a jamais été lu.
///
/// Une magnitude qui dépasse `i64` donne [`CORRUPT_NUMBER`] (le nombre est
/// complet, donc ce n'est pas une troncature).
pub(crate) fn read_number(cursor: &mut DigitCursor<'_>) -> Option<i64> {
    let mut magnitude = Some(0_i64);
    loop {
        let d = cursor.next_digit()?;
        if d == TERMINATOR {
            break;
        }
        magnitude = magnitude
            .and_then(|m| m.checked_mul(8))
            .and_then(|m| m.checked_add(i64::from(d)));
    }

    // Le chiffre de signe peut manquer : le nombre reste alors positif.
    let negative = cursor.next_digit() == Some(NEGATIVE_MARKER);

    Some(match magnitude {
        Some(m) if negative => -m,
        Some(m) => m,
        None => CORRUPT_NUMBER,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decode(digits: &str) -> i64 {
        decode_number(&mut DigitCursor::new(digits))
    }

    #[test]
    fn decodes_reference_vectors() {
        let cases: &[(&str, i64)] = &[
            ("", 1337),
            ("1", 1337),
            ("88", 0),
            ("87", 0),
            ("1234567088", 0o12345670),
            ("7654321087", -0o76543210),
            ("512786", 0o5127),
            ("345685", 0o3456),
            ("654384", 0o6543),
            ("453183", 0o4531),
            ("5377382", 0o53773),
            ("4781", 0o47),
            ("616480", 0o6164),
        ];
        for &(digits, expected) in cases {
            assert_eq!(decode(digits), expected, "digits `{digits}`");
        }
    }

    #[test]
    fn missing_sign_marker_keeps_value_positive() {
        let mut c = DigitCursor::new("128");
        assert_eq!(decode_number(&mut c), 0o12);
        assert!(c.is_at_end());
    }

    #[test]
    fn cursor_stops_after_sign_marker() {
        let mut c = DigitCursor::new("3870");
        assert_eq!(decode_number(&mut c), -3);
        assert_eq!(c.next_digit(), Some(0));
    }

    #[test]
    fn truncation_is_reported_to_the_statement_decoder() {
        assert_eq!(read_number(&mut DigitCursor::new("777")), None);
    }

    #[test]
    fn oversized_magnitude_is_corrupt_but_complete() {
        let digits = format!("{}88", "7".repeat(30));
        let mut c = DigitCursor::new(&digits);
        assert_eq!(read_number(&mut c), Some(CORRUPT_NUMBER));
        assert!(c.is_at_end());
    }

    proptest! {
        #[test]
        fn encoded_numbers_decode_back(n in any::<i64>().prop_filter("i64::MIN has no magnitude", |n| *n != i64::MIN)) {
            let mut digits = String::new();
            crate::asm::encode_number(n, &mut digits);
            let mut c = DigitCursor::new(&digits);
            prop_assert_eq!(decode_number(&mut c), n);
            prop_assert!(c.is_at_end());
        }
    }
}
