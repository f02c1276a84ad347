//! Mémoire creuse : adresse `i64` → valeur `i64`, 0 pour toute cellule jamais écrite.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use unicat_core::INSTRUCTION_POINTER;

/// Mémoire de la VM. La cellule [`INSTRUCTION_POINTER`] (`-1`) démarre à `-1`.
///
/// Les cellules sont triées par adresse, ce qui rend les dumps stables.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Memory {
    cells: BTreeMap<i64, i64>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Mémoire d'un début d'exécution : seul le pointeur d'instruction est posé.
    pub fn new() -> Self {
        let mut cells = BTreeMap::new();
        cells.insert(INSTRUCTION_POINTER, -1);
        Self { cells }
    }

    /// Valeur de la cellule (0 si jamais écrite).
    pub fn get(&self, address: i64) -> i64 {
        self.cells.get(&address).copied().unwrap_or(0)
    }

    /// Écrit une cellule.
    pub fn set(&mut self, address: i64, value: i64) {
        self.cells.insert(address, value);
    }

    /// Pointeur d'instruction courant.
    pub fn instruction_pointer(&self) -> i64 {
        self.get(INSTRUCTION_POINTER)
    }

    /// Incrémente le pointeur d'instruction et renvoie la nouvelle adresse.
    /// `None` en cas de dépassement.
    pub fn advance(&mut self) -> Option<i64> {
        let next = self.instruction_pointer().checked_add(1)?;
        self.set(INSTRUCTION_POINTER, next);
        Some(next)
    }

    /// Cellules écrites, par adresse croissante.
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.cells.iter().map(|(&a, &v)| (a, v))
    }

    /// Nombre de cellules écrites.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Vrai si aucune cellule n'a été écrite (jamais le cas après [`Memory::new`]).
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
