//! Outils partagés des tests d'intégration : chargement et exécution des
//! programmes de `demos/` avec des entrées/sorties en mémoire.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use unicat_cli::{load_program, run_program, run_program_with, RunOptions};
use unicat_core::Program;
use unicat_vm::{Exit, ScriptedBits, VmConfig};

/// Noms des démos (chacune existe en `.cat` et en `.ucasm`).
pub const DEMOS: [&str; 8] = [
    "hello-world",
    "add",
    "bad-jump",
    "reverse-string",
    "random",
    "input-number",
    "fizz-buzz",
    "baklava",
];

/// Dossier `demos/` du workspace.
pub fn demos_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("demos")
}

/// Chemin d'une démo, extension comprise (`"cat"` ou `"ucasm"`).
pub fn demo_path(name: &str, ext: &str) -> PathBuf {
    demos_dir().join(format!("{name}.{ext}"))
}

/// Texte brut d'une démo.
pub fn demo_text(name: &str, ext: &str) -> Result<String> {
    let path = demo_path(name, ext);
    std::fs::read_to_string(&path).with_context(|| format!("lecture: {}", path.display()))
}

/// Programme d'une démo, chargé comme le ferait le binaire.
pub fn load_demo(name: &str, ext: &str) -> Result<Program> {
    let path = demo_path(name, ext);
    load_program(Some(&path), &demo_text(name, ext)?)
}

/// Résultat d'une exécution en mémoire.
#[derive(Debug)]
pub struct Transcript {
    /// Fin normale.
    pub exit: Exit,
    /// Sortie du programme (avec le `\n` final garanti).
    pub output: String,
    /// Listing de l'inspecteur (vide hors inspection).
    pub console: String,
}

/// Exécute la démo `.cat` avec des bits `randomb` imposés.
pub fn run_demo(name: &str, input: &str, bits: &[bool]) -> Result<Transcript> {
    run_demo_with(name, input, bits, RunOptions::default())
}

/// Idem avec des options (inspecteur, dump mémoire).
pub fn run_demo_with(name: &str, input: &str, bits: &[bool], options: RunOptions) -> Result<Transcript> {
    let program = load_demo(name, "cat")?;
    let (mut output, mut console) = (Vec::new(), Vec::new());
    let exit = run_program_with(
        &program,
        &options,
        ScriptedBits::new(bits.iter().copied()),
        input.as_bytes(),
        &mut output,
        &mut console,
    )?;
    Ok(Transcript { exit, output: String::from_utf8(output)?, console: String::from_utf8(console)? })
}

/// Exécute la démo `.cat` avec une graine.
pub fn run_demo_seeded(name: &str, input: &str, seed: u64) -> Result<String> {
    let program = load_demo(name, "cat")?;
    let options = RunOptions { config: VmConfig { seed: Some(seed) }, ..RunOptions::default() };
    let mut output = Vec::new();
    run_program(&program, &options, input.as_bytes(), &mut output, std::io::sink())?;
    Ok(String::from_utf8(output)?)
}
