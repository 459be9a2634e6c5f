use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use guesstech::settings::{Language, Theme};
use guesstech::{
    clear_leaderboard, load_catalog_from_json, load_leaderboard, load_settings, reset_settings,
    save_settings, Catalog, Controller, Difficulty, FileStorage, GameMode, Input, Notice, Rules,
    SessionConfig, Settings,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DifficultyOpt {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyOpt> for Difficulty {
    fn from(d: DifficultyOpt) -> Self {
        match d {
            DifficultyOpt::Easy => Difficulty::Easy,
            DifficultyOpt::Medium => Difficulty::Medium,
            DifficultyOpt::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LanguageOpt {
    En,
    Bn,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeOpt {
    Light,
    Dark,
}

#[derive(Debug, Parser)]
#[command(name = "guess-tech", version, about = "Guess the Tech: name the technology behind an obscured logo")]
struct Cli {
    /// Directory holding the leaderboard and settings documents
    #[arg(long, env = "GUESS_TECH_DATA_DIR", default_value = ".guess-tech", global = true)]
    data_dir: PathBuf,

    /// More log output on stderr (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play a session in the terminal
    Play {
        /// Game mode, as in the `?mode=` parameter: classic | time-attack
        #[arg(long, default_value = "classic")]
        mode: String,

        /// Starting difficulty tier
        #[arg(long, value_enum, default_value_t = DifficultyOpt::Medium)]
        difficulty: DifficultyOpt,

        /// Seed for question selection (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Catalog JSON path (defaults to the built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Show the top scores
    Leaderboard {
        /// Remove every stored score
        #[arg(long)]
        clear: bool,
    },
    /// Show or change preferences
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(Debug, Subcommand)]
enum SettingsAction {
    Show,
    Set {
        #[arg(long)]
        sound: Option<bool>,
        #[arg(long)]
        animation: Option<bool>,
        #[arg(long, value_enum)]
        language: Option<LanguageOpt>,
        #[arg(long, value_enum)]
        theme: Option<ThemeOpt>,
    },
    Reset,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Hide letters of the name according to how obscured the tier is; punctuation stays.
fn obscured_name(name: &str, difficulty: Difficulty) -> String {
    let stride = usize::from(difficulty.obscure_level() / 2 + 1);
    name.chars()
        .enumerate()
        .map(|(i, c)| {
            if !c.is_alphanumeric() || (i + 1) % stride == 0 {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn render(notice: &Notice, catalog: &Catalog, settings: &Settings) {
    let mut out = std::io::stdout().lock();
    let _ = match notice {
        Notice::Countdown(n) => writeln!(out, "{n}..."),
        Notice::Go => writeln!(out, "Go!"),
        Notice::Question { id, number, difficulty } => match catalog.get(*id) {
            Some(item) => writeln!(
                out,
                "\nQuestion {number} [{}]  {}",
                difficulty.as_str(),
                obscured_name(&item.name, *difficulty)
            ),
            None => writeln!(out, "\nQuestion {number}"),
        },
        Notice::Hint(c) => writeln!(out, "Hint: starts with '{c}' (half points)"),
        Notice::Answered(o) if o.correct => writeln!(out, "Correct! +{} ({})", o.points, o.answer),
        Notice::Answered(o) => {
            let bell = if settings.sound_enabled { "\x07" } else { "" };
            writeln!(out, "{bell}Incorrect! Answer: {}", o.answer)
        }
        Notice::TimeLeft(t) if *t % 10 == 0 || *t <= 5 => writeln!(out, "[{t}s left]"),
        Notice::TimeLeft(_) => Ok(()),
        Notice::DifficultyChanged(d) => writeln!(out, "Difficulty: {}", d.as_str()),
        Notice::Finished {
            score,
            questions_answered,
            combo,
            rank,
        } => {
            let _ = writeln!(out, "\nGame over! Final score: {score} ({questions_answered} correct)");
            if *combo > 1 {
                let _ = writeln!(out, "Best combo: x{combo}!");
            }
            if let Some(r) = rank {
                let _ = writeln!(out, "Leaderboard position: #{r}");
            }
            writeln!(out, "Type /again to play again or /quit to leave.")
        }
    };
    let _ = out.flush();
}

/// Blocking stdin reader on its own thread; dropping the sender on EOF ends the session.
fn read_input(tx: mpsc::Sender<Input>) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let Some(input) = Input::from_line(&line) else { continue };
        let quit = input == Input::Quit;
        if tx.blocking_send(input).is_err() || quit {
            break;
        }
    }
}

async fn play(
    storage: FileStorage,
    mode: &str,
    difficulty: Difficulty,
    seed: Option<u64>,
    catalog_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let catalog = match catalog_path {
        Some(p) => load_catalog_from_json(&p)
            .with_context(|| format!("failed to load catalog {}", p.display()))?,
        None => Catalog::builtin().context("built-in catalog is invalid")?,
    };
    let catalog = Arc::new(catalog);
    let settings = load_settings(&storage);

    let mode = GameMode::from_param(Some(mode));
    let config = SessionConfig {
        mode,
        difficulty,
        rules: Rules::default(),
        seed: seed.unwrap_or_else(rand::random),
    };
    println!(
        "Guess the Tech ({}) - type the name, /hint for a hint, /easy /medium /hard to switch tier, /quit to leave.",
        mode.as_str()
    );

    let (controller, mut notices) = Controller::new(config, Arc::clone(&catalog), storage);
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || read_input(tx));

    let printer = tokio::spawn(async move {
        while let Some(n) = notices.recv().await {
            render(&n, &catalog, &settings);
        }
    });

    let summary = controller.run(rx).await?;
    printer.await.context("notice printer failed")?;
    tracing::info!(score = summary.score, rounds = summary.rounds, "bye");
    Ok(())
}

fn show_leaderboard(storage: &FileStorage, clear: bool) -> anyhow::Result<()> {
    if clear {
        clear_leaderboard(storage).context("failed to clear leaderboard")?;
        println!("Leaderboard cleared.");
        return Ok(());
    }
    let entries = load_leaderboard(storage);
    if entries.is_empty() {
        println!("No scores yet. Play the game to see scores here!");
        return Ok(());
    }
    for (i, e) in entries.iter().enumerate() {
        let day = e.date.split('T').next().unwrap_or(&e.date);
        println!("{:>2}. {:<10} {:>6}  {}", i + 1, e.name, e.score, day);
    }
    Ok(())
}

fn settings_cmd(storage: &FileStorage, action: Option<SettingsAction>) -> anyhow::Result<()> {
    let settings = match action.unwrap_or(SettingsAction::Show) {
        SettingsAction::Show => load_settings(storage),
        SettingsAction::Set {
            sound,
            animation,
            language,
            theme,
        } => {
            let mut s = load_settings(storage);
            if let Some(v) = sound {
                s.sound_enabled = v;
            }
            if let Some(v) = animation {
                s.animation_enabled = v;
            }
            if let Some(l) = language {
                s.language = match l {
                    LanguageOpt::En => Language::En,
                    LanguageOpt::Bn => Language::Bn,
                };
            }
            if let Some(t) = theme {
                s.theme = match t {
                    ThemeOpt::Light => Theme::Light,
                    ThemeOpt::Dark => Theme::Dark,
                };
            }
            save_settings(storage, &s).context("failed to save settings")?;
            s
        }
        SettingsAction::Reset => reset_settings(storage).context("failed to reset settings")?,
    };
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let storage = FileStorage::new(&cli.data_dir);
    match cli.command {
        Command::Play {
            mode,
            difficulty,
            seed,
            catalog,
        } => play(storage, &mode, difficulty.into(), seed, catalog).await,
        Command::Leaderboard { clear } => show_leaderboard(&storage, clear),
        Command::Settings { action } => settings_cmd(&storage, action),
    }
}
