mod ui;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use derivepass::{CharacterClass, ClassSet, GenerationRequest, History, HistoryEntry, SeedInput};
use env_logger::Env;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

#[derive(Parser)]
#[command(
    name = "derivepass",
    version,
    about = "Stateless deterministic password generator"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// File recording the inputs of generated passwords
    #[arg(long, global = true, env = "DERIVEPASS_HISTORY", default_value = "log")]
    history_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Derive the password for a service
    Generate(GenerateArgs),
    /// List or clear recorded inputs
    History {
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// The service to generate a password for
    service: String,

    /// A secret phrase, or "-" to read it without echo
    secret: String,

    /// The number of times this password has been generated
    iteration: u64,

    /// The minimum length of the password
    min_length: usize,

    /// Include uppercase letters
    #[arg(short, long)]
    upper: bool,

    /// Include lowercase letters
    #[arg(short, long)]
    lower: bool,

    /// Include numbers
    #[arg(short, long)]
    number: bool,

    /// Include special characters
    #[arg(short, long)]
    special: bool,

    /// Print only the password
    #[arg(short, long)]
    quiet: bool,

    /// Do not record the inputs in the history file
    #[arg(long)]
    no_history: bool,

    /// Use the inputs byte-for-byte instead of their NFC form
    #[arg(long)]
    no_normalize: bool,
}

impl GenerateArgs {
    fn classes(&self) -> ClassSet {
        [
            (self.upper, CharacterClass::Upper),
            (self.lower, CharacterClass::Lower),
            (self.number, CharacterClass::Digit),
            (self.special, CharacterClass::Special),
        ]
        .into_iter()
        .filter(|(selected, _)| *selected)
        .map(|(_, class)| class)
        .collect()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Generate(args) => run_generate(&args, &cli.history_file),
        Command::History { clear } => run_history(clear, &cli.history_file),
    }
}

fn run_generate(args: &GenerateArgs, history_file: &Path) -> Result<()> {
    let normalize = !args.no_normalize;

    let service = ui::prepare_input(&args.service, "Service", normalize)?;
    let secret = if args.secret == "-" {
        ui::prompt_secret()?
    } else {
        args.secret.clone().into()
    };
    let secret = ui::prepare_input(&secret, "Secret", normalize)?;

    let input = SeedInput::new(&service, &secret, args.iteration);
    let request = GenerationRequest::new(args.min_length, args.classes());

    let password = derivepass::generate(&input, &request)?;

    let options = ui::DisplayOptions {
        unicode_support: ui::detect_unicode_support(),
        color_support: ui::detect_color_support(),
        quiet: args.quiet,
    };
    let info = ui::GenerationInfo {
        service_char_count: service.chars().count(),
        secret_byte_length: secret.len(),
        iteration: args.iteration,
        request: &request,
    };
    ui::display_output(&password, &info, &options);

    if !args.no_history {
        let entry = HistoryEntry {
            service: &service,
            secret: &secret,
            iteration: args.iteration,
            request: &request,
        };
        let line = Zeroizing::new(entry.to_string());
        History::open(history_file)?.record_if_absent(&line)?;
    }

    Ok(())
}

fn run_history(clear: bool, history_file: &Path) -> Result<()> {
    let mut history = History::open(history_file)?;

    if clear {
        history.clear()?;
        return Ok(());
    }

    for entry in history.entries() {
        println!("{}", entry);
    }
    Ok(())
}
