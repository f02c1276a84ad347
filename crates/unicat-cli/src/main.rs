//! `unicat` : CLI du langage Unicat
//!
//! Ici on fait uniquement : parsing d'arguments, initialisation (logger,
//! couleur), et délégation à `unicat_cli` (lib).

#![forbid(unsafe_code)]

use std::{path::PathBuf, process::ExitCode};

use anyhow::{bail, Result};
use clap::{ArgAction, Parser, ValueEnum};

use unicat_cli as cli;
use unicat_vm::VmConfig;

// ──────────────────────────── CLI (clap) ────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "unicat", version, about = "Unicat : exécuter, inspecter, désassembler ou assembler un programme", long_about = None)]
struct Opt {
    /// Programme : source glyphes (.cat) ou listing (.ucasm) ; `-` = stdin pour --disasm/--assemble
    file: PathBuf,

    /// Inspecteur pas-à-pas (listing avant chaque instruction)
    #[arg(short, long)]
    debug: bool,

    /// Inspecteur avec dump complet de la mémoire à chaque arrêt
    #[arg(long = "dump-memory")]
    dump_memory: bool,

    /// Graine de `randomb` (exécutions reproductibles)
    #[arg(long, env = "UNICAT_SEED")]
    seed: Option<u64>,

    /// Affiche le listing désassemblé au lieu d'exécuter
    #[arg(long, conflicts_with_all = ["assemble", "debug", "dump_memory"])]
    disasm: bool,

    /// Convertit un listing .ucasm en source glyphes au lieu d'exécuter
    #[arg(long, conflicts_with_all = ["debug", "dump_memory"])]
    assemble: bool,

    /// Fichier de sortie de --disasm/--assemble (stdout si omis)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Afficher le temps d'exécution
    #[arg(long)]
    time: bool,

    /// Augmente la verbosité (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Mode silencieux (casse la verbosité)
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,

    /// Couleur des messages d'état (si la feature `color` est compilée)
    #[arg(long = "color", value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

// ──────────────────────────── Entrée / Sortie ────────────────────────────

fn input_from_path(p: PathBuf) -> cli::Input {
    if p.as_os_str() == "-" {
        cli::Input::Stdin
    } else {
        cli::Input::Path(p)
    }
}

fn output_from_opt(output: Option<PathBuf>) -> cli::Output {
    output.map_or(cli::Output::Stdout, cli::Output::Path)
}

// ──────────────────────────── Logger / Verbosité ────────────────────────────

fn init_telemetry(verbose: u8, quiet: bool) {
    #[cfg(feature = "trace")]
    {
        let level = if quiet {
            "error"
        } else {
            match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        };
        std::env::set_var(
            "RUST_LOG",
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string()),
        );
        cli::init_logger();
    }
    #[cfg(not(feature = "trace"))]
    let _ = (verbose, quiet);
}

fn init_color(choice: ColorChoice) {
    // `owo-colors` détecte le TTY ; on ne fait que forcer via NO_COLOR / CLICOLOR_FORCE.
    match choice {
        ColorChoice::Auto => {}
        ColorChoice::Always => {
            std::env::set_var("CLICOLOR_FORCE", "1");
            std::env::remove_var("NO_COLOR");
        }
        ColorChoice::Never => {
            std::env::set_var("NO_COLOR", "1");
            std::env::remove_var("CLICOLOR_FORCE");
        }
    }
}

// ──────────────────────────── main ────────────────────────────

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn real_main() -> Result<()> {
    let opt = Opt::parse();

    init_color(opt.color);
    init_telemetry(opt.verbose, opt.quiet);

    use cli::{AssembleTask, Command as C, DisasmTask, RunOptions, RunTask};

    let input = input_from_path(opt.file);
    let command = if opt.disasm {
        C::Disasm(DisasmTask { input, output: output_from_opt(opt.output) })
    } else if opt.assemble {
        C::Assemble(AssembleTask { input, output: output_from_opt(opt.output) })
    } else {
        if opt.output.is_some() {
            bail!("`--output` ne s'applique qu'à --disasm et --assemble");
        }
        let options = RunOptions {
            debug: opt.debug,
            dump_memory: opt.dump_memory,
            config: VmConfig { seed: opt.seed },
        };
        C::Run(RunTask { input, options, time: opt.time })
    };

    cli::execute(command)
}
