//! Erreurs fatales d'exécution.
//!
//! Le bytecode malformé et les sauts hors programme se rattrapent par
//! substitution ; tout ce qui est ici arrête la VM.

use std::io;

use thiserror::Error;

/// Alias résultat de la VM.
pub type VmResult<T> = Result<T, VmError>;

/// Erreur fatale, avec l'adresse de l'instruction fautive.
#[derive(Debug, Error)]
pub enum VmError {
    /// `applop/` avec un diviseur nul.
    #[error("division by zero at instruction {address}")]
    DivisionByZero {
        /// Adresse de l'instruction.
        address: i64,
    },

    /// `echovar` sur une valeur qui n'est pas un scalaire Unicode.
    #[error("cannot echo {value} as a character at instruction {address}")]
    InvalidCodePoint {
        /// Adresse de l'instruction.
        address: i64,
        /// Valeur de la cellule.
        value: i64,
    },

    /// Dépassement de capacité `i64`.
    #[error("integer overflow at instruction {address}")]
    Overflow {
        /// Adresse de l'instruction.
        address: i64,
    },

    /// Lecture/écriture hôte.
    #[error("i/o error at instruction {address}: {source}")]
    Io {
        /// Adresse de l'instruction.
        address: i64,
        /// Erreur d'origine.
        #[source]
        source: io::Error,
    },
}

impl VmError {
    /// Adresse de l'instruction fautive.
    pub const fn address(&self) -> i64 {
        match self {
            Self::DivisionByZero { address }
            | Self::InvalidCodePoint { address, .. }
            | Self::Overflow { address }
            | Self::Io { address, .. } => *address,
        }
    }

    pub(crate) fn io(address: i64) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::Io { address, source }
    }
}
