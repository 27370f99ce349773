use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;

use octet_core::{Config, Quirks, UnknownOpcodePolicy, CLOCK_SPEED};
use octet_display::DEFAULT_SCALE;

mod disasm;
mod keymap;
mod run;

#[derive(Parser)]
#[command(version, about = "A Chip-8 interpreter")]
struct Opt {
    /// Increase the level of verbosity. Can be used multiple times.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a ROM in a window
    Run(RunArgs),
    /// Print the instructions in a ROM
    Disasm {
        /// Path to the ROM
        rom: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Path to the ROM
    rom: PathBuf,

    /// Size of each Chip-8 pixel on screen
    #[arg(long, default_value_t = DEFAULT_SCALE)]
    scale: u32,

    /// Instructions executed per second
    #[arg(long, default_value_t = CLOCK_SPEED, value_parser = clap::value_parser!(u32).range(1..))]
    cycles_per_second: u32,

    /// Seed for the random number generator
    #[arg(long)]
    seed: Option<u64>,

    /// What to do with words that aren't instructions
    #[arg(long, value_enum, default_value_t = OnUnknown::Halt)]
    on_unknown_opcode: OnUnknown,

    /// Resume right after the CALL on RET rather than skipping a word
    #[arg(long)]
    canonical_return: bool,

    /// Shift Vy into Vx for 8XY6 and 8XYE
    #[arg(long)]
    shift_uses_vy: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum OnUnknown {
    Halt,
    Skip,
}

impl RunArgs {
    fn config(&self) -> Config {
        Config {
            cycles_per_second: self.cycles_per_second,
            on_unknown_opcode: match self.on_unknown_opcode {
                OnUnknown::Halt => UnknownOpcodePolicy::Halt,
                OnUnknown::Skip => UnknownOpcodePolicy::Skip,
            },
            quirks: Quirks {
                return_skips_next: !self.canonical_return,
                shift_uses_vy: self.shift_uses_vy,
            },
            rng_seed: self.seed,
            ..Config::default()
        }
    }
}

impl Opt {
    const fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "octet_core=debug,octet=debug,info",
            2 => "octet_core=trace,octet=trace,info",
            3..=u8::MAX => "trace",
        }
    }

    fn filter_layer(&self) -> EnvFilter {
        // Parse log level from env or infer it from args
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.log_filter()))
    }
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();

    tracing_subscriber::registry()
        .with(opt.filter_layer())
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match opt.command {
        Command::Run(args) => run::run(&args.rom, args.config(), args.scale),
        Command::Disasm { rom } => disasm::disasm(&rom),
    }
}
