//! Sources de bits pour `randomb`.
//!
//! `randomb` est la seule source d'indéterminisme de la VM ; elle passe
//! toujours par [`RandomBits`] pour rester injectable en test.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Fournisseur de bits uniformes.
pub trait RandomBits {
    /// Prochain bit.
    fn next_bit(&mut self) -> bool;
}

impl<T: RandomBits + ?Sized> RandomBits for &mut T {
    fn next_bit(&mut self) -> bool {
        (**self).next_bit()
    }
}

impl<T: RandomBits + ?Sized> RandomBits for Box<T> {
    fn next_bit(&mut self) -> bool {
        (**self).next_bit()
    }
}

/// Adaptateur autour d'un générateur `rand`.
#[derive(Debug, Clone)]
pub struct RngBits<R>(R);

impl<R: RngCore> RngBits<R> {
    /// Enveloppe un générateur existant.
    pub const fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RngBits<StdRng> {
    /// Générateur reproductible.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Générateur initialisé par l'OS.
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl<R: RngCore> RandomBits for RngBits<R> {
    fn next_bit(&mut self) -> bool {
        self.0.gen()
    }
}

/// Suite de bits fixée à l'avance ; `false` une fois épuisée.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBits {
    bits: VecDeque<bool>,
}

impl ScriptedBits {
    /// Bits rendus dans l'ordre.
    pub fn new(bits: impl IntoIterator<Item = bool>) -> Self {
        Self { bits: bits.into_iter().collect() }
    }

    /// Bits restants.
    pub fn remaining(&self) -> usize {
        self.bits.len()
    }
}

impl RandomBits for ScriptedBits {
    fn next_bit(&mut self) -> bool {
        self.bits.pop_front().unwrap_or(false)
    }
}
