//! Point de suspension avant chaque instruction.
//!
//! La VM appelle [`StepHook::before_dispatch`] une fois par cycle, après le
//! chargement et avant l'exécution (y compris pour `diepgrm`). Le hook peut
//! inspecter l'état, bloquer en attendant l'utilisateur, puis décider de
//! continuer ou d'arrêter proprement.

use std::io;

use unicat_core::Instruction;

use crate::memory::Memory;

/// Contexte au site d'exécution courant.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    /// Adresse de l'instruction chargée (valeur courante de la cellule `-1`).
    pub address: i64,
    /// Instruction chargée ; la faute si l'adresse est hors programme.
    pub instruction: &'a Instruction,
    /// Mémoire avant exécution.
    pub memory: &'a Memory,
    /// Numéro du cycle, à partir de 1.
    pub step: u64,
}

/// Décision rendue par le hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookDecision {
    /// Exécuter l'instruction.
    #[default]
    Continue,
    /// Arrêt immédiat, sans erreur (équivalent à `diepgrm`).
    Quit,
}

/// Observateur/décideur appelé avant chaque instruction.
pub trait StepHook {
    /// Appelé après le chargement, avant l'exécution.
    fn before_dispatch(&mut self, ctx: &StepContext<'_>) -> io::Result<HookDecision>;

    /// Vrai si le hook affiche quelque chose : la VM vide alors sa sortie
    /// avant de l'appeler, pour garder l'ordre des écritures.
    fn observes(&self) -> bool {
        true
    }
}

/// Hook inerte.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHook;

impl StepHook for NoHook {
    fn before_dispatch(&mut self, _ctx: &StepContext<'_>) -> io::Result<HookDecision> {
        Ok(HookDecision::Continue)
    }

    fn observes(&self) -> bool {
        false
    }
}

impl<H: StepHook + ?Sized> StepHook for &mut H {
    fn before_dispatch(&mut self, ctx: &StepContext<'_>) -> io::Result<HookDecision> {
        (**self).before_dispatch(ctx)
    }

    fn observes(&self) -> bool {
        (**self).observes()
    }
}

impl<H: StepHook + ?Sized> StepHook for Box<H> {
    fn before_dispatch(&mut self, ctx: &StepContext<'_>) -> io::Result<HookDecision> {
        (**self).before_dispatch(ctx)
    }

    fn observes(&self) -> bool {
        (**self).observes()
    }
}
