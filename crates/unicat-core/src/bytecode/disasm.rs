//! Rendu textuel : valeurs, instructions et listings de programme.
//!
//! Une valeur s'affiche `<décimal> (<octal>)`, et les opérandes marqués
//! « caractère » ajoutent ` = '<c>'` quand la valeur est un scalaire Unicode.

use core::fmt::{self, Write};

use super::decode::Program;
use super::instruction::Instruction;

/// Rend une valeur : `72 (0o110)`, ou `72 (0o110 = 'H')` avec `show_char`.
pub fn format_value(value: i64, show_char: bool) -> String {
    let mut out = String::new();
    let _ = write_value(&mut out, value, show_char);
    out
}

fn write_value(out: &mut impl Write, value: i64, show_char: bool) -> fmt::Result {
    let sign = if value < 0 { "-" } else { "" };
    write!(out, "{value} ({sign}0o{:o}", value.unsigned_abs())?;
    if show_char {
        if let Some(c) = as_char(value) {
            write!(out, " = {}", char_repr(c))?;
        }
    }
    out.write_char(')')
}

fn as_char(value: i64) -> Option<char> {
    u32::try_from(value).ok().and_then(char::from_u32)
}

/// Littéral de caractère échappé, entre quotes.
///
/// Les caractères de contrôle et les blancs autres que l'espace deviennent
/// `\xNN`, `\uNNNN` ou `\UNNNNNNNN`.
pub fn char_repr(c: char) -> String {
    match c {
        '\t' => "'\\t'".into(),
        '\n' => "'\\n'".into(),
        '\r' => "'\\r'".into(),
        '\\' => "'\\\\'".into(),
        '\'' => "\"'\"".into(),
        c if c.is_control() || (c.is_whitespace() && c != ' ') => {
            let code = u32::from(c);
            if code <= 0xff {
                format!("'\\x{code:02x}'")
            } else if code <= 0xffff {
                format!("'\\u{code:04x}'")
            } else {
                format!("'\\U{code:08x}'")
            }
        }
        c => format!("'{c}'"),
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())?;
        for (ix, operand) in self.operands().iter().enumerate() {
            f.write_str(if ix == 0 { " " } else { ", " })?;
            write_value(f, operand.value, operand.show_char)?;
        }
        Ok(())
    }
}

/// Listing complet, une ligne `NNNN: <instruction>` par instruction.
pub fn disassemble_program(program: &Program) -> String {
    let mut out = String::new();
    for (pc, insn) in program.iter().enumerate() {
        let _ = writeln!(out, "{pc:04}: {insn}");
    }
    out
}
