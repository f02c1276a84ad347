//! Commandes de l'inspecteur.

use std::fmt;

/// Commande lue au point de suspension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Exécute l'instruction courante et s'arrête à la suivante (ligne vide, `s`, `step`).
    Step,
    /// N'inspecte plus et laisse le programme finir (`c`, `continue`).
    Continue,
    /// Affiche la mémoire et redemande (`m`, `mem`, `memory`).
    Memory,
    /// Aide (`h`, `help`, `?`).
    Help,
    /// Arrêt propre (`q`, `quit`, `exit`).
    Quit,
    /// Texte non reconnu.
    Unknown(String),
}

impl Command {
    /// Interprète une ligne (blancs et casse ignorés).
    pub fn parse(line: &str) -> Self {
        let word = line.trim().to_ascii_lowercase();
        match word.as_str() {
            "" | "s" | "step" => Self::Step,
            "c" | "continue" => Self::Continue,
            "m" | "mem" | "memory" => Self::Memory,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(line.trim().to_string()),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step => f.write_str("step"),
            Self::Continue => f.write_str("continue"),
            Self::Memory => f.write_str("mem"),
            Self::Help => f.write_str("help"),
            Self::Quit => f.write_str("quit"),
            Self::Unknown(s) => write!(f, "{s}"),
        }
    }
}
