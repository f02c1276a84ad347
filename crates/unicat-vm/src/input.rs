//! Lecture ligne à ligne pour `inputst`.
//!
//! Trait maison plutôt que `BufRead` : `Stdin` n'implémente pas `BufRead`, et
//! la VM comme l'inspecteur doivent pouvoir lire le même stdin sans garder de
//! verrou entre deux lignes.

use std::cell::RefCell;
use std::io::{self, BufRead, BufReader, Cursor, Read, Stdin, StdinLock};

/// Source de lignes. Même contrat que [`BufRead::read_line`] : la ligne est
/// ajoutée à `buf` avec son terminateur éventuel, `Ok(0)` en fin de flux.
pub trait LineReader {
    /// Lit une ligne complète.
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

impl LineReader for Stdin {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        Stdin::read_line(self, buf)
    }
}

impl LineReader for StdinLock<'_> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

impl LineReader for &[u8] {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

impl<T: AsRef<[u8]>> LineReader for Cursor<T> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

impl<R: Read> LineReader for BufReader<R> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

impl<L: LineReader + ?Sized> LineReader for &mut L {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        (**self).read_line(buf)
    }
}

impl<L: LineReader + ?Sized> LineReader for Box<L> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        (**self).read_line(buf)
    }
}

/// Lecteur partagé : la VM (`inputst`) et l'inspecteur (commandes) lisent le
/// même flux, chacun une ligne à la fois.
impl<L: LineReader + ?Sized> LineReader for &RefCell<L> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        self.borrow_mut().read_line(buf)
    }
}
