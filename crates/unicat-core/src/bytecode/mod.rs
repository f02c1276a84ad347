//! Bytecode Unicat : un flux de chiffres `0`..`8` sans séparateurs.
//!
//! Une instruction = clé d'opcode sur deux chiffres + opérandes. Chaque
//! opérande est un nombre octal terminé par `8`, suivi d'un chiffre de signe.

pub mod asm;
pub mod cursor;
pub mod decode;
pub mod disasm;
pub mod instruction;
pub mod number;

pub use cursor::DigitCursor;
pub use decode::{assemble, compile, decode_statement, Program};
pub use instruction::{ArithOp, Instruction, Opcode, Operand};
pub use number::{decode_number, CORRUPT_NUMBER};
