//! Mode inspection et listings, vus depuis la bibliothèque du CLI.

use anyhow::Result;
use pretty_assertions::assert_eq;
use unicat_cli::RunOptions;
use unicat_core::disasm::disassemble_program;
use unicat_tests::{load_demo, run_demo_with};
use unicat_vm::Exit;

fn debug() -> RunOptions {
    RunOptions { debug: true, ..RunOptions::default() }
}

#[test]
fn stepping_shows_each_instruction() -> Result<()> {
    let t = run_demo_with("hello-world", "", &[], debug())?;
    // fin des commandes dès le premier arrêt : quit
    assert_eq!(t.exit, Exit::Quit);
    assert_eq!(t.output, "\n");
    assert!(t.console.contains("Welcome"));
    assert!(t.console.contains("0000: asgnlit 0 (0o0), 72 (0o110 = 'H')\n"));

    let t = run_demo_with("hello-world", "\n\n\n", &[], debug())?;
    assert_eq!(t.exit, Exit::Quit);
    assert_eq!(t.output, "H\n");
    assert!(t.console.contains("0001: echovar 0 (0o0)\n"));
    assert!(t.console.contains("0002: asgnlit 0 (0o0), 101 (0o145 = 'e')\n"));
    Ok(())
}

#[test]
fn continue_finishes_the_program() -> Result<()> {
    let t = run_demo_with("hello-world", "c\n", &[], debug())?;
    assert_eq!(t.exit, Exit::Halted);
    assert_eq!(t.output, "Hello, World!\n");
    assert!(!t.console.contains("0001:"));
    Ok(())
}

#[test]
fn diepgrm_is_shown_before_halting() -> Result<()> {
    let t = run_demo_with("add", "\n\n\n\n\n", &[], debug())?;
    assert_eq!(t.exit, Exit::Halted);
    assert_eq!(t.output, "65\n");
    assert!(t.console.ends_with("0004: diepgrm\n(unicat) "));
    Ok(())
}

#[test]
fn program_input_and_commands_share_stdin() -> Result<()> {
    // `s` pour inputst, puis la ligne lue par le programme, puis `c`
    let t = run_demo_with("input-number", "s\n77\nc\n", &[], debug())?;
    assert_eq!(t.exit, Exit::Halted);
    assert_eq!(t.output, "77\n");
    Ok(())
}

#[test]
fn memory_dump_variant() -> Result<()> {
    let options = RunOptions { dump_memory: true, ..RunOptions::default() };
    let t = run_demo_with("add", "\n\n\nq\n", &[], options)?;
    assert_eq!(t.exit, Exit::Quit);
    assert!(t.console.contains(
        "0003: echoval 0 (0o0)\n  mem[-1] = 3 (0o3)\n  mem[0] = 65 (0o101 = 'A')\n  mem[1] = 23 (0o27 = '\\x17')\n"
    ));
    Ok(())
}

#[test]
fn fault_shows_up_in_the_listing() -> Result<()> {
    // bad-jump : 0..4, puis 101 hors programme, puis reprise en 0
    let t = run_demo_with("bad-jump", &"\n".repeat(8), &[], debug())?;
    assert_eq!(t.exit, Exit::Halted);
    assert!(t.console.contains("0101: asgnlit -1 (-0o1), -1 (-0o1)\n(unicat) 0000: jumpif> 10 (0o12), 4 (0o4)\n"));
    Ok(())
}

#[test]
fn add_listing() -> Result<()> {
    assert_eq!(
        disassemble_program(&load_demo("add", "cat")?),
        "0000: asgnlit 0 (0o0), 42 (0o52 = '*')\n\
         0001: asgnlit 1 (0o1), 23 (0o27 = '\\x17')\n\
         0002: applop+ 0 (0o0), 1 (0o1)\n\
         0003: echoval 0 (0o0)\n\
         0004: diepgrm\n"
    );
    Ok(())
}
