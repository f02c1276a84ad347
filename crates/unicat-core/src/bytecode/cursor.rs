//! Curseur séquentiel sur le flux de chiffres.

/// Lecteur avant-seulement sur un flux produit par [`crate::translate`].
///
/// Les octets hors de `'0'..='8'` sont sautés : seuls les chiffres du
/// bytecode sont visibles.
#[derive(Debug, Clone)]
pub struct DigitCursor<'a> {
    data: &'a [u8],
    off: usize,
}

impl<'a> DigitCursor<'a> {
    /// Construit un curseur au début de `digits`.
    pub fn new(digits: &'a str) -> Self {
        Self { data: digits.as_bytes(), off: 0 }
    }

    /// Offset courant (en octets depuis le début du flux).
    pub const fn offset(&self) -> usize {
        self.off
    }

    /// Vrai si plus aucun chiffre ne peut être lu.
    pub fn is_at_end(&self) -> bool {
        self.data[self.off..].iter().all(|b| !is_digit(*b))
    }

    /// Lit le prochain chiffre (valeur `0..=8`), ou `None` en fin de flux.
    pub fn next_digit(&mut self) -> Option<u8> {
        while let Some(&b) = self.data.get(self.off) {
            self.off += 1;
            if is_digit(b) {
                return Some(b - b'0');
            }
        }
        None
    }
}

impl Iterator for DigitCursor<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.next_digit()
    }
}

const fn is_digit(b: u8) -> bool {
    matches!(b, b'0'..=b'8')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_digits_in_order() {
        let mut c = DigitCursor::new("018");
        assert_eq!(c.next_digit(), Some(0));
        assert_eq!(c.next_digit(), Some(1));
        assert!(!c.is_at_end());
        assert_eq!(c.next_digit(), Some(8));
        assert!(c.is_at_end());
        assert_eq!(c.next_digit(), None);
        assert_eq!(c.offset(), 3);
    }

    #[test]
    fn skips_foreign_bytes() {
        let c = DigitCursor::new("1 9x2");
        assert_eq!(c.collect::<Vec<_>>(), vec![1, 2]);
    }
}
