//! Boucle d'exécution.
//!
//! Un cycle :
//! 1. incrémente la cellule `-1` ;
//! 2. charge l'instruction (la faute si l'adresse sort du programme) ;
//! 3. appelle le hook, qui peut arrêter ;
//! 4. s'arrête sur `diepgrm` ;
//! 5. exécute.
//!
//! La faute `asgnlit -1, -1` remet le pointeur à `-1` : un saut hors
//! programme relance donc l'exécution à l'adresse 0.

use std::io::Write;

use rand::rngs::StdRng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use unicat_core::{ArithOp, Instruction, Program, INSTRUCTION_POINTER};

use crate::entropy::{RandomBits, RngBits};
use crate::error::{VmError, VmResult};
use crate::hook::{HookDecision, NoHook, StepContext, StepHook};
use crate::input::LineReader;
use crate::memory::Memory;

/* ─────────────────────────── Configuration ─────────────────────────── */

/// Configuration d'une exécution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VmConfig {
    /// Graine de `randomb`. `None` : générateur initialisé par l'OS.
    pub seed: Option<u64>,
}

impl VmConfig {
    /// Source de bits correspondant à la configuration.
    pub fn entropy(&self) -> RngBits<StdRng> {
        self.seed.map_or_else(RngBits::from_entropy, RngBits::seeded)
    }
}

/// Fin normale d'une exécution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// `diepgrm` atteint.
    Halted,
    /// Arrêt demandé par le hook.
    Quit,
}

/* ─────────────────────────── VM ─────────────────────────── */

/// Machine virtuelle : programme en lecture seule, mémoire, entrées/sorties.
pub struct Vm<'p, R, I, O> {
    program: &'p Program,
    memory: Memory,
    entropy: R,
    input: I,
    output: O,
    steps: u64,
}

impl<'p, I: LineReader, O: Write> Vm<'p, RngBits<StdRng>, I, O> {
    /// VM dont l'entropie vient de `config`.
    pub fn with_config(program: &'p Program, config: VmConfig, input: I, output: O) -> Self {
        Self::new(program, config.entropy(), input, output)
    }
}

impl<'p, R: RandomBits, I: LineReader, O: Write> Vm<'p, R, I, O> {
    /// VM neuve, mémoire vide, pointeur à `-1`.
    pub fn new(program: &'p Program, entropy: R, input: I, output: O) -> Self {
        Self { program, memory: Memory::new(), entropy, input, output, steps: 0 }
    }

    /// Mémoire courante.
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Nombre de cycles déjà commencés.
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Rend la sortie (utile avec un tampon en mémoire).
    pub fn into_output(self) -> O {
        self.output
    }

    /// Exécute jusqu'à `diepgrm`.
    pub fn run(&mut self) -> VmResult<Exit> {
        self.run_with_hook(&mut NoHook)
    }

    /// Exécute jusqu'à `diepgrm` ou jusqu'à ce que le hook arrête.
    #[tracing::instrument(level = "debug", skip_all, fields(instructions = self.program.len()))]
    pub fn run_with_hook<H: StepHook + ?Sized>(&mut self, hook: &mut H) -> VmResult<Exit> {
        loop {
            if let Some(exit) = self.step(hook)? {
                let address = self.memory.instruction_pointer();
                self.output.flush().map_err(VmError::io(address))?;
                tracing::debug!(?exit, steps = self.steps, address, "run finished");
                return Ok(exit);
            }
        }
    }

    /// Un cycle complet. `Some(exit)` quand l'exécution est terminée.
    pub fn step<H: StepHook + ?Sized>(&mut self, hook: &mut H) -> VmResult<Option<Exit>> {
        // Un pointeur à `i64::MAX` ne s'incrémente pas : l'adresse suivante
        // est hors programme de toute façon, on charge la faute sur place.
        let address = match self.memory.advance() {
            Some(address) => address,
            None => self.memory.instruction_pointer(),
        };
        let instruction = self.program.fetch(address);
        self.steps += 1;

        if self.program.get(address).is_none() {
            tracing::debug!(address, "instruction pointer out of program, faulting");
        }
        tracing::trace!(step = self.steps, address, %instruction, "fetch");

        if hook.observes() {
            self.output.flush().map_err(VmError::io(address))?;
        }
        let ctx = StepContext { address, instruction: &instruction, memory: &self.memory, step: self.steps };
        if hook.before_dispatch(&ctx).map_err(VmError::io(address))? == HookDecision::Quit {
            return Ok(Some(Exit::Quit));
        }

        if instruction == Instruction::Halt {
            return Ok(Some(Exit::Halted));
        }
        self.dispatch(address, instruction)?;
        Ok(None)
    }

    fn dispatch(&mut self, address: i64, instruction: Instruction) -> VmResult<()> {
        match instruction {
            Instruction::AssignLiteral { addr, value } => self.memory.set(addr, value),
            Instruction::JumpIfPositive { addr, target } => {
                if self.memory.get(addr) > 0 {
                    self.memory.set(INSTRUCTION_POINTER, target);
                }
            }
            Instruction::EchoChar { addr } => {
                let value = self.memory.get(addr);
                let c = u32::try_from(value)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(VmError::InvalidCodePoint { address, value })?;
                write!(self.output, "{c}").map_err(VmError::io(address))?;
            }
            Instruction::EchoValue { addr } => {
                write!(self.output, "{}", self.memory.get(addr)).map_err(VmError::io(address))?;
            }
            Instruction::Pointer { addr } => {
                let target = self.memory.get(addr);
                self.memory.set(addr, self.memory.get(target));
            }
            Instruction::RandomBit { addr } => {
                let bit = self.entropy.next_bit();
                self.memory.set(addr, i64::from(bit));
            }
            Instruction::ReadLine { addr } => self.read_line(address, addr)?,
            Instruction::Apply { op, dst, src } => {
                let value = apply(op, self.memory.get(dst), self.memory.get(src), address)?;
                self.memory.set(dst, value);
            }
            Instruction::Halt => {}
        }
        Ok(())
    }

    /// `inputst` : un code par cellule, puis le terminateur `0`.
    fn read_line(&mut self, address: i64, start: i64) -> VmResult<()> {
        self.output.flush().map_err(VmError::io(address))?;
        let mut line = String::new();
        self.input.read_line(&mut line).map_err(VmError::io(address))?;

        let mut cell = start;
        for c in line.chars() {
            self.memory.set(cell, i64::from(u32::from(c)));
            cell = cell.checked_add(1).ok_or(VmError::Overflow { address })?;
        }
        self.memory.set(cell, 0);
        tracing::trace!(address, start, chars = cell - start, "line read");
        Ok(())
    }
}

fn apply(op: ArithOp, lhs: i64, rhs: i64, address: i64) -> VmResult<i64> {
    let result = match op {
        ArithOp::Add => lhs.checked_add(rhs),
        ArithOp::Sub => lhs.checked_sub(rhs),
        ArithOp::Mul => lhs.checked_mul(rhs),
        ArithOp::Div if rhs == 0 => return Err(VmError::DivisionByZero { address }),
        ArithOp::Div => floor_div(lhs, rhs),
    };
    result.ok_or(VmError::Overflow { address })
}

/// Division arrondie vers -∞.
fn floor_div(lhs: i64, rhs: i64) -> Option<i64> {
    let q = lhs.checked_div(rhs)?;
    if lhs % rhs != 0 && (lhs < 0) != (rhs < 0) {
        Some(q - 1)
    } else {
        Some(q)
    }
}
