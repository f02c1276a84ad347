//! Jeu d'instructions : neuf opcodes, dont la famille `applop`.

use smallvec::{smallvec, SmallVec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::INSTRUCTION_POINTER;

/* ─────────────────────────── Opcodes ─────────────────────────── */

/// Clé d'opcode (deux chiffres) telle qu'elle apparaît dans le flux.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Opcode {
    /// `31` : `asgnlit addr, literal`
    AsgnLit,
    /// `57` : `jumpif> addr, target`
    JumpIf,
    /// `54` : `echovar addr`
    EchoVar,
    /// `44` : `echoval addr`
    EchoVal,
    /// `46` : `pointer addr`
    Pointer,
    /// `83` : `randomb addr`
    RandomB,
    /// `24` : `inputst addr`
    InputSt,
    /// `78` : `applop<sel> addr1, addr2`
    ApplOp,
    /// `88` : `diepgrm`
    DiePgrm,
}

impl Opcode {
    /// Tous les opcodes, dans l'ordre de la table.
    pub const ALL: [Self; 9] = [
        Self::AsgnLit,
        Self::JumpIf,
        Self::EchoVar,
        Self::EchoVal,
        Self::Pointer,
        Self::RandomB,
        Self::InputSt,
        Self::ApplOp,
        Self::DiePgrm,
    ];

    /// Les deux chiffres de la clé.
    pub const fn key(self) -> [u8; 2] {
        match self {
            Self::AsgnLit => [3, 1],
            Self::JumpIf => [5, 7],
            Self::EchoVar => [5, 4],
            Self::EchoVal => [4, 4],
            Self::Pointer => [4, 6],
            Self::RandomB => [8, 3],
            Self::InputSt => [2, 4],
            Self::ApplOp => [7, 8],
            Self::DiePgrm => [8, 8],
        }
    }

    /// Recherche une clé ; `None` si elle est inconnue.
    pub fn from_key(hi: u8, lo: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.key() == [hi, lo])
    }

    /// Nombre d'opérandes numériques (hors sélecteur `applop`).
    pub const fn arity(self) -> usize {
        match self {
            Self::AsgnLit | Self::JumpIf | Self::ApplOp => 2,
            Self::EchoVar | Self::EchoVal | Self::Pointer | Self::RandomB | Self::InputSt => 1,
            Self::DiePgrm => 0,
        }
    }
}

/* ─────────────────────────── Opérateurs applop ─────────────────────────── */

/// Opérateur binaire de la famille `applop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ArithOp {
    /// `applop+`
    Add,
    /// `applop-`
    Sub,
    /// `applop*`
    Mul,
    /// `applop/` (division entière par défaut, arrondie vers -∞)
    Div,
}

impl ArithOp {
    /// Sélecteur → opérateur. Tout chiffre inconnu vaut `+`.
    pub const fn from_selector(digit: u8) -> Self {
        match digit {
            2 => Self::Sub,
            8 => Self::Mul,
            7 => Self::Div,
            _ => Self::Add,
        }
    }

    /// Sélecteur canonique émis par l'encodeur.
    pub const fn selector(self) -> u8 {
        match self {
            Self::Add => 0,
            Self::Sub => 2,
            Self::Mul => 8,
            Self::Div => 7,
        }
    }

    /// Symbole de l'opérateur.
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }
}

/* ─────────────────────────── Instructions ─────────────────────────── */

/// Instruction décodée. Chaque variante porte exactement ses opérandes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Instruction {
    /// `asgnlit` : `mem[addr] = value`
    AssignLiteral {
        /// Cellule cible.
        addr: i64,
        /// Littéral.
        value: i64,
    },
    /// `jumpif>` : si `mem[addr] > 0`, le pointeur d'instruction prend `target`.
    JumpIfPositive {
        /// Cellule testée.
        addr: i64,
        /// Nouvelle valeur du pointeur (l'instruction suivante est `target + 1`).
        target: i64,
    },
    /// `echovar` : écrit le caractère de code `mem[addr]`.
    EchoChar {
        /// Cellule lue.
        addr: i64,
    },
    /// `echoval` : écrit `mem[addr]` en décimal.
    EchoValue {
        /// Cellule lue.
        addr: i64,
    },
    /// `pointer` : `mem[addr] = mem[mem[addr]]`.
    Pointer {
        /// Cellule déréférencée puis écrasée.
        addr: i64,
    },
    /// `randomb` : `mem[addr]` reçoit 0 ou 1.
    RandomBit {
        /// Cellule cible.
        addr: i64,
    },
    /// `inputst` : lit une ligne, un code par cellule à partir de `addr`, puis `0`.
    ReadLine {
        /// Première cellule écrite.
        addr: i64,
    },
    /// `applop<op>` : `mem[dst] = mem[dst] <op> mem[src]`.
    Apply {
        /// Opérateur.
        op: ArithOp,
        /// Cellule modifiée (opérande gauche).
        dst: i64,
        /// Cellule lue (opérande droit).
        src: i64,
    },
    /// `diepgrm` : fin du programme.
    Halt,
}

/// Opérande prêt pour le désassemblage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    /// Valeur brute.
    pub value: i64,
    /// Vrai si l'opérande s'affiche aussi comme caractère.
    pub show_char: bool,
}

impl Operand {
    const fn num(value: i64) -> Self {
        Self { value, show_char: false }
    }

    const fn chr(value: i64) -> Self {
        Self { value, show_char: true }
    }
}

impl Instruction {
    /// Instruction de faute, substituée à tout ce qui ne se décode ou ne se
    /// charge pas : remet le pointeur d'instruction à `-1`.
    pub const FAULT: Self = Self::AssignLiteral { addr: INSTRUCTION_POINTER, value: -1 };

    /// Opcode d'origine.
    pub const fn opcode(&self) -> Opcode {
        match self {
            Self::AssignLiteral { .. } => Opcode::AsgnLit,
            Self::JumpIfPositive { .. } => Opcode::JumpIf,
            Self::EchoChar { .. } => Opcode::EchoVar,
            Self::EchoValue { .. } => Opcode::EchoVal,
            Self::Pointer { .. } => Opcode::Pointer,
            Self::RandomBit { .. } => Opcode::RandomB,
            Self::ReadLine { .. } => Opcode::InputSt,
            Self::Apply { .. } => Opcode::ApplOp,
            Self::Halt => Opcode::DiePgrm,
        }
    }

    /// Mnémonique (les `applop` incluent leur opérateur).
    pub const fn mnemonic(&self) -> &'static str {
        match self {
            Self::AssignLiteral { .. } => "asgnlit",
            Self::JumpIfPositive { .. } => "jumpif>",
            Self::EchoChar { .. } => "echovar",
            Self::EchoValue { .. } => "echoval",
            Self::Pointer { .. } => "pointer",
            Self::RandomBit { .. } => "randomb",
            Self::ReadLine { .. } => "inputst",
            Self::Apply { op: ArithOp::Add, .. } => "applop+",
            Self::Apply { op: ArithOp::Sub, .. } => "applop-",
            Self::Apply { op: ArithOp::Mul, .. } => "applop*",
            Self::Apply { op: ArithOp::Div, .. } => "applop/",
            Self::Halt => "diepgrm",
        }
    }

    /// Opérandes dans l'ordre du flux. Seul le littéral de `asgnlit`
    /// s'affiche comme caractère.
    pub fn operands(&self) -> SmallVec<[Operand; 2]> {
        match *self {
            Self::AssignLiteral { addr, value } => smallvec![Operand::num(addr), Operand::chr(value)],
            Self::JumpIfPositive { addr, target } => smallvec![Operand::num(addr), Operand::num(target)],
            Self::EchoChar { addr }
            | Self::EchoValue { addr }
            | Self::Pointer { addr }
            | Self::RandomBit { addr }
            | Self::ReadLine { addr } => smallvec![Operand::num(addr)],
            Self::Apply { dst, src, .. } => smallvec![Operand::num(dst), Operand::num(src)],
            Self::Halt => SmallVec::new(),
        }
    }

    /// Vrai pour l'instruction de faute.
    pub fn is_fault(&self) -> bool {
        *self == Self::FAULT
    }
}
