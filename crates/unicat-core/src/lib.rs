//! unicat-core : primitives partagées du langage Unicat
//!
//! Fournit :
//! - `glyph` : table des neuf glyphes et traduction source → flux de chiffres
//! - `bytecode::cursor` : curseur avant-seulement sur le flux de chiffres
//! - `bytecode::number` : décodage des nombres octaux auto-terminés
//! - `bytecode::decode` : décodage des instructions et assemblage du programme
//! - `bytecode::disasm` : rendu textuel des valeurs et des instructions
//! - `bytecode::asm`    : assembleur texte et encodeur inverse (instructions → glyphes)
//! - Erreurs `CoreError` + alias `CoreResult<T>`
//!
//! Le décodage ne renvoie jamais d'erreur : un bytecode malformé produit
//! l'instruction de faute `asgnlit -1, -1`. Seul l'assembleur texte échoue.
//!
//! Features :
//! - `serde` : derive (dé)sérialisation sur les instructions et le programme

#![deny(missing_docs)]

/* ─────────────────────────── Modules publics ─────────────────────────── */

/// Table des glyphes et traduction.
pub mod glyph;

/// Bytecode : curseur, nombres, instructions, décodage, (dés)assemblage.
pub mod bytecode;

pub use bytecode::{
    asm, assemble, compile, decode_number, decode_statement, disasm, ArithOp, DigitCursor,
    Instruction, Opcode, Operand, Program, CORRUPT_NUMBER,
};
pub use glyph::{translate, GLYPHS};

/* ─────────────────────────── Constantes ─────────────────────────── */

/// Adresse mémoire réservée au pointeur d'instruction.
///
/// La cellule `-1` est à la fois une cellule ordinaire et le compteur de
/// programme : écrire dedans est un saut.
pub const INSTRUCTION_POINTER: i64 = -1;

/* ─────────────────────────── Erreurs ─────────────────────────── */

/// Alias résultat commun au core.
pub type CoreResult<T> = Result<T, CoreError>;

/// Erreurs de l'assembleur texte (les lignes sont numérotées à partir de 1).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Mnémonique inconnu.
    #[error("line {line}: unknown mnemonic `{mnemonic}`")]
    UnknownMnemonic {
        /// Ligne fautive.
        line: usize,
        /// Texte lu à la place du mnémonique.
        mnemonic: String,
    },
    /// Nombre d'opérandes incorrect pour le mnémonique.
    #[error("line {line}: `{mnemonic}` expects {expected} operand(s), got {got}")]
    Arity {
        /// Ligne fautive.
        line: usize,
        /// Mnémonique concerné.
        mnemonic: &'static str,
        /// Nombre d'opérandes attendu.
        expected: usize,
        /// Nombre d'opérandes lus.
        got: usize,
    },
    /// Opérande illisible (ni entier, ni octal `0o`, ni caractère quoté).
    #[error("line {line}: invalid operand `{text}`")]
    InvalidOperand {
        /// Ligne fautive.
        line: usize,
        /// Texte de l'opérande.
        text: String,
    },
}

/* ─────────────────────────── Prélude ─────────────────────────── */

/// Prélude pratique pour importer les types/funcs clés du crate.
pub mod prelude {
    /// Réexports utiles pour une importation rapide.
    pub use super::{
        assemble, compile, decode_number, decode_statement, translate, ArithOp, CoreError,
        CoreResult, DigitCursor, Instruction, Opcode, Program, CORRUPT_NUMBER,
        INSTRUCTION_POINTER,
    };
}

/* ─────────────────────────── Tests ─────────────────────────── */
