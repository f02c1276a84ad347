//! Inspecteur console : implémente [`StepHook`].
//!
//! Avant chaque instruction : adresse + désassemblage, dump mémoire optionnel,
//! puis invite de commande. `continue` désactive l'inspection pour le reste
//! de l'exécution ; `quit` (ou la fin du flux de commandes) arrête la VM
//! sans erreur.

use std::io::{self, Write};

use unicat_core::disasm::format_value;
use unicat_core::INSTRUCTION_POINTER;
use unicat_vm::{HookDecision, LineReader, Memory, StepContext, StepHook};

use crate::command::Command;

/// Bannière affichée avant le premier arrêt.
pub const BANNER: &str = "Welcome to the Unicat inspector. Execution stops before every instruction.\n";

const HELP: &str = "\
commands:
  <enter>, s, step   run this instruction, stop at the next one
  c, continue        run to the end without stopping
  m, mem             show memory
  q, quit            stop the program
  h, help            show this list
";

const PROMPT: &str = "(unicat) ";

/// Écrit toutes les cellules écrites, une par ligne, par adresse croissante.
///
/// La cellule du pointeur d'instruction est affichée sans rendu caractère.
pub fn write_memory(out: &mut impl Write, memory: &Memory) -> io::Result<()> {
    for (address, value) in memory.iter() {
        let rendered = format_value(value, address != INSTRUCTION_POINTER);
        writeln!(out, "  mem[{address}] = {rendered}")?;
    }
    Ok(())
}

/// Hook interactif. `R` fournit les commandes, `W` reçoit le listing.
pub struct Inspector<R, W> {
    input: R,
    out: W,
    dump_memory: bool,
    stepping: bool,
    greeted: bool,
}

impl<R: LineReader, W: Write> Inspector<R, W> {
    /// Inspecteur actif dès la première instruction.
    pub const fn new(input: R, out: W) -> Self {
        Self { input, out, dump_memory: false, stepping: true, greeted: false }
    }

    /// Variante « dump complet » : la mémoire est affichée à chaque arrêt.
    #[must_use]
    pub fn dump_memory(mut self, enabled: bool) -> Self {
        self.dump_memory = enabled;
        self
    }

    /// Vrai tant que `continue` n'a pas été demandé.
    pub const fn is_stepping(&self) -> bool {
        self.stepping
    }

    /// Rend la sortie (transcript en test).
    pub fn into_output(self) -> W {
        self.out
    }

    fn read_command(&mut self) -> io::Result<Command> {
        self.out.write_all(PROMPT.as_bytes())?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            // fin du flux : équivaut à `quit`
            writeln!(self.out)?;
            return Ok(Command::Quit);
        }
        Ok(Command::parse(&line))
    }
}

impl<R: LineReader, W: Write> StepHook for Inspector<R, W> {
    fn before_dispatch(&mut self, ctx: &StepContext<'_>) -> io::Result<HookDecision> {
        if !self.stepping {
            return Ok(HookDecision::Continue);
        }
        if !self.greeted {
            self.out.write_all(BANNER.as_bytes())?;
            self.out.write_all(HELP.as_bytes())?;
            self.greeted = true;
        }

        writeln!(self.out, "{:04}: {}", ctx.address, ctx.instruction)?;
        if self.dump_memory {
            write_memory(&mut self.out, ctx.memory)?;
        }

        loop {
            match self.read_command()? {
                Command::Step => return Ok(HookDecision::Continue),
                Command::Continue => {
                    #[cfg(feature = "trace")]
                    log::debug!("inspector: continue from {} (step {})", ctx.address, ctx.step);
                    self.stepping = false;
                    self.out.flush()?;
                    return Ok(HookDecision::Continue);
                }
                Command::Memory => write_memory(&mut self.out, ctx.memory)?,
                Command::Help => self.out.write_all(HELP.as_bytes())?,
                Command::Quit => {
                    #[cfg(feature = "trace")]
                    log::debug!("inspector: quit at {} (step {})", ctx.address, ctx.step);
                    self.out.flush()?;
                    return Ok(HookDecision::Quit);
                }
                Command::Unknown(text) => {
                    writeln!(self.out, "unknown command `{text}` (h for help)")?;
                }
            }
        }
    }

    fn observes(&self) -> bool {
        self.stepping
    }
}
