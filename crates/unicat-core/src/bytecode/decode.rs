//! Décodage des instructions et assemblage du programme.
//!
//! Politique « fail soft » : une clé inconnue ou un opérande tronqué donnent
//! [`Instruction::FAULT`] au lieu d'une erreur. Seule la fin de flux pile sur
//! une frontière d'instruction arrête l'assemblage.

use core::slice;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::cursor::DigitCursor;
use super::instruction::{ArithOp, Instruction, Opcode};
use super::number::read_number;
use crate::glyph::translate;

/// Décode une instruction.
///
/// Renvoie `None` (l'instruction vide) si aucun chiffre ne reste : c'est le
/// signal « plus d'instruction ». Tout autre échec donne [`Instruction::FAULT`].
pub fn decode_statement(cursor: &mut DigitCursor<'_>) -> Option<Instruction> {
    let hi = cursor.next_digit()?;
    Some(decode_body(hi, cursor).unwrap_or(Instruction::FAULT))
}

fn decode_body(hi: u8, cursor: &mut DigitCursor<'_>) -> Option<Instruction> {
    let lo = cursor.next_digit()?;
    let opcode = Opcode::from_key(hi, lo)?;

    let insn = match opcode {
        Opcode::AsgnLit => Instruction::AssignLiteral {
            addr: read_number(cursor)?,
            value: read_number(cursor)?,
        },
        Opcode::JumpIf => Instruction::JumpIfPositive {
            addr: read_number(cursor)?,
            target: read_number(cursor)?,
        },
        Opcode::EchoVar => Instruction::EchoChar { addr: read_number(cursor)? },
        Opcode::EchoVal => Instruction::EchoValue { addr: read_number(cursor)? },
        Opcode::Pointer => Instruction::Pointer { addr: read_number(cursor)? },
        Opcode::RandomB => Instruction::RandomBit { addr: read_number(cursor)? },
        Opcode::InputSt => Instruction::ReadLine { addr: read_number(cursor)? },
        Opcode::ApplOp => {
            let op = ArithOp::from_selector(cursor.next_digit()?);
            Instruction::Apply { op, dst: read_number(cursor)?, src: read_number(cursor)? }
        }
        Opcode::DiePgrm => Instruction::Halt,
    };
    Some(insn)
}

/* ─────────────────────────── Programme ─────────────────────────── */

/// Séquence ordonnée d'instructions, indexée à partir de 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Construit un programme à partir d'instructions déjà décodées.
    pub const fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Nombre d'instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Vrai si le programme ne contient aucune instruction.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Accès direct aux instructions.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Itère sur les instructions.
    pub fn iter(&self) -> slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Instruction à l'adresse `address`, si elle existe.
    pub fn get(&self, address: i64) -> Option<&Instruction> {
        usize::try_from(address).ok().and_then(|ix| self.instructions.get(ix))
    }

    /// Chargement côté VM : hors bornes, c'est [`Instruction::FAULT`].
    pub fn fetch(&self, address: i64) -> Instruction {
        self.get(address).copied().unwrap_or(Instruction::FAULT)
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Assemble un flux de chiffres complet en programme.
pub fn assemble(digits: &str) -> Program {
    let mut cursor = DigitCursor::new(digits);
    let program: Program = core::iter::from_fn(|| decode_statement(&mut cursor)).collect();
    tracing::debug!(digits = digits.len(), instructions = program.len(), "program assembled");
    program
}

/// Traduit puis assemble un texte source Unicat.
pub fn compile(source: &str) -> Program {
    assemble(&translate(source))
}
