use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use wordweeper_core::*;

use report::SimReport;
use runner::{SimConfig, Strategy};

mod report;
mod runner;

const DEFAULT_WORDS: &str = include_str!("../data/words.txt");

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
enum Level {
    Simple,
    Easy,
    Hard,
    Expert,
}

impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Simple => Difficulty::Simple,
            Level::Easy => Difficulty::Easy,
            Level::Hard => Difficulty::Hard,
            Level::Expert => Difficulty::Expert,
        }
    }
}

/// Plays seeded wordweeper games headlessly and reports how they went.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity<clap_verbosity_flag::WarnLevel>,

    /// Built-in difficulty to play
    #[arg(short, long, value_enum, default_value_t = Level::Easy)]
    difficulty: Level,

    /// JSON difficulty profile, used instead of --difficulty
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 100)]
    games: u32,

    /// Seed of the first game instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Word list, either `WORD,complexity` lines or a JSON object
    #[arg(short, long)]
    words: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Strategy::Clean)]
    strategy: Strategy,

    /// Print one JSON summary per game instead of the aggregate report
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let catalog = load_catalog(args.words.as_deref())?;
    let profile = match &args.profile {
        Some(path) => load_profile(path)?,
        None => Difficulty::from(args.difficulty).profile(),
    };
    profile.validate().context("invalid difficulty profile")?;
    log::debug!("Profile: {profile:?}");

    let config = SimConfig {
        profile,
        games: args.games,
        seed: args.seed,
        strategy: args.strategy,
    };
    let games = runner::run_simulation(&config, &catalog)?;

    if args.json {
        for summary in &games {
            println!("{}", serde_json::to_string(summary)?);
        }
    } else {
        print!("{}", SimReport::from_games(&games).to_text());
    }
    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<WordCatalog> {
    let Some(path) = path else {
        return Ok(WordCatalog::parse(DEFAULT_WORDS)?);
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read word list {}", path.display()))?;
    let catalog = if path.extension().is_some_and(|ext| ext == "json") {
        WordCatalog::from_json(&text)
    } else {
        WordCatalog::parse(&text)
    };
    catalog.with_context(|| format!("could not load word list {}", path.display()))
}

fn load_profile(path: &Path) -> Result<DifficultyProfile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read profile {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("could not parse profile {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_word_list_parses() {
        let catalog = load_catalog(None).unwrap();
        assert_eq!(catalog.len(), 20);
        assert_eq!(catalog.complexity("ALGORITHM"), Some(9));
    }

    #[test]
    fn args_parse_with_defaults() {
        let args =
            Args::try_parse_from(["wordweeper-sim", "-d", "expert", "--strategy", "random"])
                .unwrap();
        assert_eq!(args.difficulty, Level::Expert);
        assert_eq!(args.strategy, Strategy::Random);
        assert_eq!(args.games, 100);
        assert!(!args.json);
    }

    #[test]
    fn profiles_load_from_json() {
        let path = std::env::temp_dir()
            .join(format!("wordweeper-profile-{}.json", std::process::id()));
        let json = serde_json::to_string(&DifficultyProfile::hard()).unwrap();
        fs::write(&path, json).unwrap();
        let profile = load_profile(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(profile.side, 10);
        assert_eq!(profile.stages, DifficultyProfile::hard().stages);
    }
}
