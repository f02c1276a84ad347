//! Assembleur texte et encodeur (instructions → chiffres → glyphes).
//!
//! Syntaxe, une instruction par ligne :
//!
//! ```text
//! ; affiche « H »
//! asgnlit 0, 'H'
//! echovar 0
//! diepgrm
//! ```
//!
//! - opérandes : décimal signé, octal `0o…`, ou caractère quoté
//!   (`'H'`, `'\n'`, `'\t'`, `'\\'`, `'\''`)
//! - `;` et `#` ouvrent un commentaire (hors caractère quoté)

use core::fmt::Write;

use super::decode::Program;
use super::instruction::{ArithOp, Instruction, Opcode};
use super::number::{NEGATIVE_MARKER, TERMINATOR};
use crate::glyph::to_glyphs;
use crate::{CoreError, CoreResult};

/// Chiffre de signe émis pour les nombres positifs.
const POSITIVE_MARKER: u8 = 8;

/* ─────────────────────────── Assembleur ─────────────────────────── */

/// Assemble un listing texte en [`Program`].
pub fn assemble(source: &str) -> CoreResult<Program> {
    let mut instructions = Vec::new();
    for (idx, raw_line) in source.lines().enumerate() {
        if let Some(insn) = parse_line(idx + 1, raw_line)? {
            instructions.push(insn);
        }
    }
    Ok(Program::new(instructions))
}

fn parse_line(line: usize, raw: &str) -> CoreResult<Option<Instruction>> {
    let text = strip_comment(raw).trim();
    if text.is_empty() {
        return Ok(None);
    }

    let (mnemonic, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    let (name, opcode, op) = lookup(mnemonic)
        .ok_or_else(|| CoreError::UnknownMnemonic { line, mnemonic: mnemonic.to_string() })?;
    let operands = split_operands(rest)
        .into_iter()
        .map(|tok| parse_operand(line, tok))
        .collect::<CoreResult<Vec<i64>>>()?;
    if operands.len() != opcode.arity() {
        return Err(CoreError::Arity {
            line,
            mnemonic: name,
            expected: opcode.arity(),
            got: operands.len(),
        });
    }

    let a = operands.first().copied().unwrap_or_default();
    let b = operands.get(1).copied().unwrap_or_default();
    let insn = match opcode {
        Opcode::AsgnLit => Instruction::AssignLiteral { addr: a, value: b },
        Opcode::JumpIf => Instruction::JumpIfPositive { addr: a, target: b },
        Opcode::EchoVar => Instruction::EchoChar { addr: a },
        Opcode::EchoVal => Instruction::EchoValue { addr: a },
        Opcode::Pointer => Instruction::Pointer { addr: a },
        Opcode::RandomB => Instruction::RandomBit { addr: a },
        Opcode::InputSt => Instruction::ReadLine { addr: a },
        Opcode::ApplOp => Instruction::Apply { op: op.unwrap_or(ArithOp::Add), dst: a, src: b },
        Opcode::DiePgrm => Instruction::Halt,
    };
    Ok(Some(insn))
}

fn lookup(mnemonic: &str) -> Option<(&'static str, Opcode, Option<ArithOp>)> {
    let entry = match mnemonic {
        "asgnlit" => ("asgnlit", Opcode::AsgnLit, None),
        "jumpif>" => ("jumpif>", Opcode::JumpIf, None),
        "echovar" => ("echovar", Opcode::EchoVar, None),
        "echoval" => ("echoval", Opcode::EchoVal, None),
        "pointer" => ("pointer", Opcode::Pointer, None),
        "randomb" => ("randomb", Opcode::RandomB, None),
        "inputst" => ("inputst", Opcode::InputSt, None),
        "applop+" => ("applop+", Opcode::ApplOp, Some(ArithOp::Add)),
        "applop-" => ("applop-", Opcode::ApplOp, Some(ArithOp::Sub)),
        "applop*" => ("applop*", Opcode::ApplOp, Some(ArithOp::Mul)),
        "applop/" => ("applop/", Opcode::ApplOp, Some(ArithOp::Div)),
        "diepgrm" => ("diepgrm", Opcode::DiePgrm, None),
        _ => return None,
    };
    Some(entry)
}

/// Coupe au premier `;`/`#` situé hors d'un caractère quoté.
fn strip_comment(line: &str) -> &str {
    let mut quoted = false;
    let mut escaping = false;
    for (ix, c) in line.char_indices() {
        match c {
            _ if escaping => escaping = false,
            '\\' if quoted => escaping = true,
            '\'' => quoted = !quoted,
            ';' | '#' if !quoted => return &line[..ix],
            _ => {}
        }
    }
    line
}

/// Découpe sur les virgules hors caractères quotés.
fn split_operands(rest: &str) -> Vec<&str> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut quoted = false;
    let mut escaping = false;
    let mut start = 0;
    for (ix, c) in rest.char_indices() {
        match c {
            _ if escaping => escaping = false,
            '\\' if quoted => escaping = true,
            '\'' => quoted = !quoted,
            ',' if !quoted => {
                out.push(rest[start..ix].trim());
                start = ix + 1;
            }
            _ => {}
        }
    }
    out.push(rest[start..].trim());
    out
}

fn parse_operand(line: usize, tok: &str) -> CoreResult<i64> {
    let invalid = || CoreError::InvalidOperand { line, text: tok.to_string() };

    if let Some(body) = tok.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) {
        let c = match body {
            "\\n" => '\n',
            "\\t" => '\t',
            "\\r" => '\r',
            "\\0" => '\0',
            "\\\\" => '\\',
            "\\'" => '\'',
            _ => {
                let mut chars = body.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => return Err(invalid()),
                }
            }
        };
        return Ok(i64::from(u32::from(c)));
    }

    let (negative, digits) = match tok.strip_prefix('-') {
        Some(d) => (true, d),
        None => (false, tok),
    };
    let (radix, body) = match digits.strip_prefix("0o") {
        Some(oct) => (8, oct),
        None => (10, digits),
    };
    // un seul signe, déjà retiré : `parse` accepterait `--5` ou `-+5`
    if !body.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let magnitude = i64::from_str_radix(body, radix).map_err(|_| invalid())?;
    Ok(if negative { -magnitude } else { magnitude })
}

/* ─────────────────────────── Encodeur ─────────────────────────── */

fn push_digit(out: &mut String, d: u8) {
    out.push(char::from(b'0' + d));
}

/// Encode un nombre : magnitude octale, terminateur `8`, signe (`7` ou `8`).
///
/// Zéro s'encode sans magnitude (`88`). `i64::MIN` n'a pas de magnitude
/// représentable en `i64` : son encodage se décode en [`CORRUPT_NUMBER`].
/// L'assembleur texte ne le produit jamais (`-9223372036854775808` est refusé).
///
/// [`CORRUPT_NUMBER`]: super::number::CORRUPT_NUMBER
pub fn encode_number(value: i64, out: &mut String) {
    let magnitude = value.unsigned_abs();
    if magnitude != 0 {
        let _ = write!(out, "{magnitude:o}");
    }
    push_digit(out, TERMINATOR);
    push_digit(out, if value < 0 { NEGATIVE_MARKER } else { POSITIVE_MARKER });
}

/// Encode une instruction (clé, sélecteur éventuel, opérandes).
pub fn encode_instruction(insn: &Instruction, out: &mut String) {
    let [hi, lo] = insn.opcode().key();
    push_digit(out, hi);
    push_digit(out, lo);
    if let Instruction::Apply { op, .. } = insn {
        push_digit(out, op.selector());
    }
    for operand in insn.operands() {
        encode_number(operand.value, out);
    }
}

/// Encode un programme complet en flux de chiffres.
pub fn encode_program(program: &Program) -> String {
    let mut out = String::new();
    for insn in program {
        encode_instruction(insn, &mut out);
    }
    out
}

/// Source Unicat lisible : une instruction par ligne, ses glyphes suivis du
/// listing en commentaire (ASCII uniquement, donc ignoré à la traduction).
pub fn render_source(program: &Program) -> String {
    let mut out = String::new();
    let mut digits = String::new();
    for insn in program {
        digits.clear();
        encode_instruction(insn, &mut digits);
        let _ = write!(out, "{}  {}", to_glyphs(&digits), insn.mnemonic());
        for (ix, operand) in insn.operands().iter().enumerate() {
            let _ = write!(out, "{}{}", if ix == 0 { " " } else { ", " }, operand.value);
        }
        out.push('\n');
    }
    out
}
