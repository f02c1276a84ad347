//! unicat-vm : machine virtuelle du langage Unicat
//!
//! Fournit :
//! - `memory`  : mémoire creuse `i64 → i64` (0 par défaut), cellule `-1` = pointeur d'instruction
//! - `entropy` : sources de bits aléatoires injectables (`randomb`)
//! - `input`   : lecteurs de lignes (`inputst`)
//! - `hook`    : point de suspension avant chaque instruction (inspection)
//! - `machine` : la boucle d'exécution
//! - Erreurs `VmError` + alias `VmResult<T>`
//!
//! Un pointeur hors programme ne fait pas planter la VM : l'instruction de
//! faute remet la cellule `-1` à `-1` et l'exécution repart de l'adresse 0.
//!
//! ```
//! use unicat_vm::prelude::*;
//!
//! let program = unicat_core::asm::assemble("asgnlit 0, 'H'\nechovar 0\ndiepgrm")?;
//! let mut out = Vec::new();
//! let mut vm = Vm::new(&program, ScriptedBits::default(), &b""[..], &mut out);
//! assert_eq!(vm.run()?, Exit::Halted);
//! assert_eq!(out, b"H");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Features :
//! - `serde` : derive (dé)sérialisation sur `Memory` et `VmConfig`

#![deny(missing_docs)]

pub mod entropy;
pub mod error;
pub mod hook;
pub mod input;
pub mod machine;
pub mod memory;

pub use entropy::{RandomBits, RngBits, ScriptedBits};
pub use error::{VmError, VmResult};
pub use hook::{HookDecision, NoHook, StepContext, StepHook};
pub use input::LineReader;
pub use machine::{Exit, Vm, VmConfig};
pub use memory::Memory;

/// Prélude : tout ce qu'il faut pour lancer un programme.
pub mod prelude {
    pub use super::{
        Exit, HookDecision, LineReader, Memory, NoHook, RandomBits, RngBits, ScriptedBits,
        StepContext, StepHook, Vm, VmConfig, VmError, VmResult,
    };
}
