//! Démos exécutées de bout en bout (source glyphes → VM → sortie).

use anyhow::Result;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use unicat_core::asm;
use unicat_tests::{demo_text, load_demo, run_demo, run_demo_seeded, DEMOS};
use unicat_vm::Exit;

#[test]
fn glyph_sources_match_their_listings() -> Result<()> {
    for name in DEMOS {
        let from_cat = load_demo(name, "cat")?;
        let from_listing = load_demo(name, "ucasm")?;
        assert_eq!(from_cat, from_listing, "{name}");
        // le corps du .cat est exactement le rendu du listing
        assert!(demo_text(name, "cat")?.ends_with(&asm::render_source(&from_listing)), "{name}");
    }
    Ok(())
}

#[test]
fn hello_world() -> Result<()> {
    let t = run_demo("hello-world", "", &[])?;
    assert_eq!(t.exit, Exit::Halted);
    assert_eq!(t.output, "Hello, World!\n");
    Ok(())
}

#[test]
fn add() -> Result<()> {
    assert_eq!(run_demo("add", "", &[])?.output, "65\n");
    Ok(())
}

#[test]
fn bad_jump_restarts_instead_of_crashing() -> Result<()> {
    assert_eq!(run_demo("bad-jump", "", &[])?.output, "x\n");
    Ok(())
}

#[test]
fn reverse_string() -> Result<()> {
    assert_eq!(run_demo("reverse-string", "Hello, World!\n", &[])?.output, "!dlroW ,olleH\n");
    assert_eq!(run_demo("reverse-string", "ab", &[])?.output, "ba\n");
    // ligne vide : rien d'autre que le `\n` final
    assert_eq!(run_demo("reverse-string", "\n", &[])?.output, "\n");
    assert_eq!(run_demo("reverse-string", "", &[])?.output, "\n");
    Ok(())
}

#[test]
fn random_uses_the_injected_bits() -> Result<()> {
    assert_eq!(run_demo("random", "", &[true, false, false, true])?.output, "TFFT\n");
    assert_eq!(run_demo("random", "", &[])?.output, "FFFF\n");
    Ok(())
}

#[test]
fn random_is_reproducible_with_a_seed() -> Result<()> {
    let first = run_demo_seeded("random", "", 42)?;
    assert_eq!(first, run_demo_seeded("random", "", 42)?);
    assert_eq!(first.len(), 5);
    assert!(first.trim_end().chars().all(|c| c == 'T' || c == 'F'));
    Ok(())
}

#[test]
fn input_number() -> Result<()> {
    assert_eq!(run_demo("input-number", "1234\n", &[])?.output, "1234\n");
    assert_eq!(run_demo("input-number", "42abc\n", &[])?.output, "42\n");
    assert_eq!(run_demo("input-number", "x\n", &[])?.output, "0\n");
    assert_eq!(run_demo("input-number", "", &[])?.output, "0\n");
    Ok(())
}

#[test]
fn fizz_buzz() -> Result<()> {
    let mut expected = String::new();
    for n in 1..=100 {
        let mut line = String::new();
        if n % 3 == 0 {
            line.push_str("Fizz");
        }
        if n % 5 == 0 {
            line.push_str("Buzz");
        }
        if line.is_empty() {
            line = n.to_string();
        }
        expected.push_str(&line);
        expected.push('\n');
    }
    let t = run_demo("fizz-buzz", "", &[])?;
    assert_eq!(t.exit, Exit::Halted);
    assert_eq!(t.output, expected);
    Ok(())
}

#[test]
fn baklava() -> Result<()> {
    let expected: String = (-10i32..=10)
        .map(|n| {
            let spaces = n.unsigned_abs() as usize;
            format!("{}{}\n", " ".repeat(spaces), "*".repeat(21 - 2 * spaces))
        })
        .collect();
    let t = run_demo("baklava", "", &[])?;
    assert_eq!(t.exit, Exit::Halted);
    assert_eq!(t.output, expected);
    Ok(())
}

proptest! {
    #[test]
    fn reverse_string_reverses_any_line(line in "[a-zA-Z0-9 ,.!?]{0,24}") {
        let t = run_demo("reverse-string", &format!("{line}\n"), &[]).unwrap();
        let expected: String = line.chars().rev().collect();
        prop_assert_eq!(t.output, format!("{expected}\n"));
    }

    #[test]
    fn input_number_echoes_decimal_prefixes(n in 0u32..1_000_000) {
        let t = run_demo("input-number", &format!("{n}\n"), &[]).unwrap();
        prop_assert_eq!(t.output, format!("{n}\n"));
    }
}
