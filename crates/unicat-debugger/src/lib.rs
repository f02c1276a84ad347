//! unicat-debugger : inspecteur pas-à-pas en console
//!
//! Branche un [`Inspector`] comme hook de la VM : avant chaque instruction,
//! il affiche l'adresse et le désassemblage (et, en option, toute la mémoire),
//! puis attend une commande.
//!
//! ```text
//! 0000: asgnlit 0 (0o0), 72 (0o110 = 'H')
//! (unicat) c
//! ```
//!
//! - `command`   : lecture des commandes utilisateur
//! - `inspector` : le hook lui-même, et le dump mémoire
//!
//! Features :
//! - `trace` (défaut) : journalise les décisions via `log`

#![forbid(unsafe_code)]

pub mod command;
pub mod inspector;

pub use command::Command;
pub use inspector::{write_memory, Inspector, BANNER};
