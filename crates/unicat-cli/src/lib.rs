//! unicat-cli : bibliothèque interne du binaire `unicat`
//!
//! But : garder `main.rs` pour le parsing d'arguments et mettre ici tout ce
//! qui se teste : chargement des programmes, exécution (avec ou sans
//! inspecteur), désassemblage, assemblage.
//!
//! Points clés :
//! - Les programmes se chargent depuis une source glyphes (`.cat`) ou un
//!   listing texte (`.ucasm`), selon l'extension
//! - [`run_program`] accepte des entrées/sorties quelconques (tests en mémoire)
//! - Après une exécution terminée, la sortie finit toujours par `\n`
//! - Traces (`feature = "trace"`) et couleurs (`feature = "color"`) optionnelles

#![deny(unused_must_use)]
#![forbid(unsafe_code)]

use std::{
    cell::RefCell,
    fs::{self, File},
    io::{self, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{anyhow, bail, Context, Result};

#[cfg(feature = "color")]
use owo_colors::OwoColorize;

use unicat_core::{asm, compile, disasm::disassemble_program, Program};
use unicat_debugger::Inspector;
use unicat_vm::{Exit, LineReader, RandomBits, Vm, VmConfig};

// ───────────────────────────── Types publics ─────────────────────────────

/// Commande haut-niveau (sans parsing CLI, réservé à main.rs).
#[derive(Clone, Debug)]
pub enum Command {
    /// Exécute un programme, éventuellement sous l'inspecteur.
    Run(RunTask),
    /// Listing désassemblé d'un programme.
    Disasm(DisasmTask),
    /// Listing texte → source glyphes.
    Assemble(AssembleTask),
}

/// Exécution d'un programme.
#[derive(Clone, Debug, Default)]
pub struct RunTask {
    /// Fichier programme (stdin est réservé à `inputst`).
    pub input: Input,
    /// Options d'exécution.
    pub options: RunOptions,
    /// Afficher le temps d'exécution.
    pub time: bool,
}

/// Désassemblage.
#[derive(Clone, Debug, Default)]
pub struct DisasmTask {
    /// Programme (`.cat` ou `.ucasm`).
    pub input: Input,
    /// Destination du listing.
    pub output: Output,
}

/// Assemblage.
#[derive(Clone, Debug, Default)]
pub struct AssembleTask {
    /// Listing texte.
    pub input: Input,
    /// Destination de la source glyphes.
    pub output: Output,
}

/// Entrée texte : fichier ou `-` (=stdin).
#[derive(Clone, Debug, Default)]
pub enum Input {
    /// Entrée standard.
    #[default]
    Stdin,
    /// Fichier.
    Path(PathBuf),
}

/// Sortie texte.
#[derive(Clone, Debug, Default)]
pub enum Output {
    /// Sortie standard.
    #[default]
    Stdout,
    /// Fichier (écriture atomique).
    Path(PathBuf),
}

/// Options d'une exécution.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunOptions {
    /// Inspecteur pas-à-pas.
    pub debug: bool,
    /// Inspecteur avec dump mémoire à chaque arrêt (implique `debug`).
    pub dump_memory: bool,
    /// Configuration VM (graine).
    pub config: VmConfig,
}

impl RunOptions {
    /// Vrai si l'inspecteur doit être branché.
    pub const fn inspecting(&self) -> bool {
        self.debug || self.dump_memory
    }
}

// ───────────────────────────── Initialisation ─────────────────────────────

/// Initialise le logger selon la feature `trace` (sur stderr, jamais mêlé à la
/// sortie du programme).
pub fn init_logger() {
    #[cfg(feature = "trace")]
    {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .format_timestamp_secs()
            .target(env_logger::Target::Stderr)
            .try_init();
    }
}

// ───────────────────────────── Exécution ─────────────────────────────

/// Exécute une commande. Toute erreur remonte jusqu'à `main` (code 1).
pub fn execute(cmd: Command) -> Result<()> {
    match cmd {
        Command::Run(t) => run_entry(&t),
        Command::Disasm(t) => disasm_entry(&t),
        Command::Assemble(t) => assemble_entry(&t),
    }
}

/// Charge un programme : `.ucasm` passe par l'assembleur texte, tout le reste
/// est traduit comme source glyphes.
pub fn load_program(origin: Option<&Path>, source: &str) -> Result<Program> {
    let is_listing = origin.and_then(Path::extension).is_some_and(|e| e == "ucasm");
    if is_listing {
        let name = origin.map(display).unwrap_or_default();
        asm::assemble(source).with_context(|| format!("assemblage: {name}"))
    } else {
        Ok(compile(source))
    }
}

/// Exécute `program` avec l'entropie décrite par `options.config`.
///
/// `input` alimente `inputst` (et les commandes de l'inspecteur), `output`
/// reçoit la sortie du programme, `console` le listing de l'inspecteur.
pub fn run_program<L, W, C>(
    program: &Program,
    options: &RunOptions,
    input: L,
    output: W,
    console: C,
) -> Result<Exit>
where
    L: LineReader,
    W: Write,
    C: Write,
{
    run_program_with(program, options, options.config.entropy(), input, output, console)
}

/// Variante de [`run_program`] avec une source de bits injectée.
pub fn run_program_with<R, L, W, C>(
    program: &Program,
    options: &RunOptions,
    entropy: R,
    input: L,
    output: W,
    console: C,
) -> Result<Exit>
where
    R: RandomBits,
    L: LineReader,
    W: Write,
    C: Write,
{
    // VM et inspecteur lisent le même flux, une ligne à la fois.
    let input = RefCell::new(input);
    let mut out = TrailingNewline::new(output);

    let result = {
        let mut vm = Vm::new(program, entropy, &input, &mut out);
        if options.inspecting() {
            let mut inspector = Inspector::new(&input, console).dump_memory(options.dump_memory);
            vm.run_with_hook(&mut inspector)
        } else {
            vm.run()
        }
    };

    match result {
        Ok(exit) => {
            out.finish().context("écriture de la sortie")?;
            Ok(exit)
        }
        Err(e) => {
            let _ = out.flush();
            Err(e).context("exécution interrompue")
        }
    }
}

fn run_entry(task: &RunTask) -> Result<()> {
    let path = match &task.input {
        Input::Path(p) => p,
        Input::Stdin => bail!("l'exécution attend un fichier : stdin est réservé à `inputst`"),
    };
    let source = read_source(&task.input)?;
    let program = load_program(Some(path), &source)?;
    #[cfg(feature = "trace")]
    log::info!("{}: {} instructions", display(path), program.len());

    let started = Instant::now();
    let exit = run_program(&program, &task.options, io::stdin(), io::stdout(), io::stdout())?;
    if task.time {
        status_info("TIME", &format!("{:.3?}", started.elapsed()));
    }
    if exit == Exit::Quit {
        status_info("QUIT", "arrêt demandé depuis l'inspecteur");
    }
    Ok(())
}

fn disasm_entry(task: &DisasmTask) -> Result<()> {
    let source = read_source(&task.input)?;
    let program = load_program(input_path(&task.input), &source)?;
    write_output(&task.output, &disassemble_program(&program))?;
    status_ok("DISASM", &format!("{} instructions", program.len()));
    Ok(())
}

fn assemble_entry(task: &AssembleTask) -> Result<()> {
    let source = read_source(&task.input)?;
    let name = input_path(&task.input).map_or_else(|| "<stdin>".to_string(), display);
    let program = asm::assemble(&source).with_context(|| format!("assemblage: {name}"))?;
    write_output(&task.output, &asm::render_source(&program))?;
    status_ok("ASSEMBLE", &format!("{} instructions", program.len()));
    Ok(())
}

// ───────────────────────────── Sortie du programme ─────────────────────────────

/// Retient le dernier octet écrit pour garantir un `\n` final.
pub struct TrailingNewline<W> {
    inner: W,
    last: Option<u8>,
}

impl<W: Write> TrailingNewline<W> {
    /// Enveloppe `inner`.
    pub const fn new(inner: W) -> Self {
        Self { inner, last: None }
    }

    /// Ajoute `\n` si la sortie n'en finit pas déjà par un (sortie vide
    /// comprise), vide le tampon et rend l'écrivain.
    pub fn finish(mut self) -> io::Result<W> {
        if self.last != Some(b'\n') {
            self.inner.write_all(b"\n")?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for TrailingNewline<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        if let Some(&b) = buf[..n].last() {
            self.last = Some(b);
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ───────────────────────────── Utilitaires E/S ─────────────────────────────

fn input_path(input: &Input) -> Option<&Path> {
    match input {
        Input::Path(p) => Some(p),
        Input::Stdin => None,
    }
}

fn read_source(input: &Input) -> Result<String> {
    match input {
        Input::Stdin => {
            let mut s = String::new();
            io::stdin().read_to_string(&mut s).context("lecture: <stdin>")?;
            Ok(s)
        }
        Input::Path(p) => {
            let f = File::open(p).with_context(|| format!("ouverture: {}", display(p)))?;
            let mut s = String::new();
            BufReader::new(f)
                .read_to_string(&mut s)
                .with_context(|| format!("lecture: {}", display(p)))?;
            Ok(s)
        }
    }
}

fn write_output(output: &Output, text: &str) -> Result<()> {
    match output {
        Output::Stdout => {
            let mut w = BufWriter::new(io::stdout().lock());
            w.write_all(text.as_bytes())?;
            w.flush()?;
        }
        Output::Path(p) => write_text_atomic(p, text)?,
    }
    Ok(())
}

fn write_text_atomic(path: &Path, text: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        Some(_) => Path::new("."),
        None => return Err(anyhow!("chemin de sortie sans parent: {}", display(path))),
    };
    let tmp = unique_tmp_path(parent, path.file_name().unwrap_or_default());
    {
        let mut w = BufWriter::new(File::create(&tmp).with_context(|| format!("création: {}", display(&tmp)))?);
        w.write_all(text.as_bytes())?;
        w.flush()?;
    }
    if path.exists() {
        // Windows : rename sur cible existante peut échouer
        let _ = fs::remove_file(path);
    }
    fs::rename(&tmp, path).with_context(|| format!("écriture: {}", display(path)))?;
    Ok(())
}

fn unique_tmp_path(dir: &Path, base: &std::ffi::OsStr) -> PathBuf {
    let mut i = 0u32;
    loop {
        let candidate = dir.join(format!("{}.tmp{}", base.to_string_lossy(), i));
        if !candidate.exists() {
            return candidate;
        }
        i = i.wrapping_add(1);
    }
}

fn display(p: &Path) -> String {
    p.to_string_lossy().to_string()
}

// ───────────────────────────── Sorties jolies ─────────────────────────────

fn status_ok(tag: &str, msg: &str) {
    #[cfg(feature = "color")]
    {
        eprintln!("{} {}", tag.green().bold(), msg);
    }
    #[cfg(not(feature = "color"))]
    {
        eprintln!("{tag} {msg}");
    }
}

fn status_info(tag: &str, msg: &str) {
    #[cfg(feature = "color")]
    {
        eprintln!("{} {}", tag.blue().bold(), msg);
    }
    #[cfg(not(feature = "color"))]
    {
        eprintln!("{tag} {msg}");
    }
}

// ───────────────────────────── Tests ─────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use unicat_vm::ScriptedBits;

    fn run_listing(listing: &str, input: &str, options: RunOptions) -> (Exit, String, String) {
        let program = asm::assemble(listing).unwrap();
        let (mut out, mut console) = (Vec::new(), Vec::new());
        let exit = run_program_with(
            &program,
            &options,
            ScriptedBits::default(),
            input.as_bytes(),
            &mut out,
            &mut console,
        )
        .unwrap();
        (exit, String::from_utf8(out).unwrap(), String::from_utf8(console).unwrap())
    }

    #[test]
    fn trailing_newline_is_added_once() {
        let (_, out, _) = run_listing("asgnlit 0, 'H'\nechovar 0\ndiepgrm", "", RunOptions::default());
        assert_eq!(out, "H\n");
        let (_, out, _) = run_listing("asgnlit 0, 10\nechovar 0\ndiepgrm", "", RunOptions::default());
        assert_eq!(out, "\n");
        let (_, out, _) = run_listing("diepgrm", "", RunOptions::default());
        assert_eq!(out, "\n");
    }

    #[test]
    fn tracking_writer_remembers_the_last_byte() -> io::Result<()> {
        let mut w = TrailingNewline::new(Vec::new());
        w.write_all(b"a\n")?;
        w.write_all(b"")?;
        assert_eq!(w.finish()?, b"a\n");
        Ok(())
    }

    #[test]
    fn fatal_errors_propagate_with_context() {
        let program = asm::assemble("asgnlit 0, 1\napplop/ 0, 1\ndiepgrm").unwrap();
        let err = run_program(&program, &RunOptions::default(), &b""[..], io::sink(), io::sink())
            .unwrap_err();
        assert_eq!(format!("{err:#}"), "exécution interrompue: division by zero at instruction 1");
    }

    #[test]
    fn inspector_and_program_share_the_input() {
        // commande `s`, ligne de programme `hi`, puis `c`
        let options = RunOptions { debug: true, ..RunOptions::default() };
        let (exit, out, console) = run_listing("inputst 0\nechovar 1\ndiepgrm", "s\nhi\nc\n", options);
        assert_eq!(exit, Exit::Halted);
        assert_eq!(out, "i\n");
        assert!(console.contains("0000: inputst 0 (0o0)\n"));
        assert!(console.contains("0001: echovar 1 (0o1)\n"));
    }

    #[test]
    fn quitting_still_ends_with_newline() {
        let options = RunOptions { dump_memory: true, ..RunOptions::default() };
        let (exit, out, console) = run_listing("echoval 0\ndiepgrm", "q\n", options);
        assert_eq!(exit, Exit::Quit);
        assert_eq!(out, "\n");
        assert!(console.contains("  mem[-1] = 0 (0o0)\n"));
    }

    #[test]
    fn listings_and_glyph_sources_load_alike() -> Result<()> {
        let listing = "asgnlit 0, 42\nechoval 0\ndiepgrm\n";
        let from_listing = load_program(Some(Path::new("x.ucasm")), listing)?;
        let glyphs = asm::render_source(&from_listing);
        assert_eq!(load_program(Some(Path::new("x.cat")), &glyphs)?, from_listing);
        assert_eq!(load_program(None, &glyphs)?, from_listing);
        let err = load_program(Some(Path::new("bad.ucasm")), "meow").unwrap_err();
        assert_eq!(format!("{err:#}"), "assemblage: bad.ucasm: line 1: unknown mnemonic `meow`");
        Ok(())
    }

    #[test]
    fn assemble_then_disasm_through_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let listing = dir.path().join("add.ucasm");
        let cat = dir.path().join("add.cat");
        let text = dir.path().join("add.txt");
        fs::write(&listing, "asgnlit 0, 42\nasgnlit 1, 23\napplop+ 0, 1\nechoval 0\ndiepgrm\n")?;

        execute(Command::Assemble(AssembleTask {
            input: Input::Path(listing),
            output: Output::Path(cat.clone()),
        }))?;
        execute(Command::Disasm(DisasmTask { input: Input::Path(cat), output: Output::Path(text.clone()) }))?;

        assert_eq!(
            fs::read_to_string(text)?,
            "0000: asgnlit 0 (0o0), 42 (0o52 = '*')\n\
             0001: asgnlit 1 (0o1), 23 (0o27 = '\\x17')\n\
             0002: applop+ 0 (0o0), 1 (0o1)\n\
             0003: echoval 0 (0o0)\n\
             0004: diepgrm\n"
        );
        Ok(())
    }

    #[test]
    fn run_refuses_stdin_programs() {
        let err = execute(Command::Run(RunTask::default())).unwrap_err();
        assert!(err.to_string().contains("stdin"));
    }

    #[test]
    fn missing_files_are_reported() {
        let task = RunTask { input: Input::Path("does/not/exist.cat".into()), ..RunTask::default() };
        let err = execute(Command::Run(task)).unwrap_err();
        assert!(err.to_string().starts_with("ouverture: does/not/exist.cat"));
    }
}
