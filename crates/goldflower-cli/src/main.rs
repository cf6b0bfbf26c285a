use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use goldflower_cli::config::{CardStyle, DealSettings, DealerConfig};
use goldflower_cli::logging::init_logging;
use goldflower_cli::render::{DealReport, write_round, write_table};
use goldflower_cli::session::Session;
use goldflower_core::AppInfo;
use goldflower_core::deal::{RoundDeal, SeedInput, TimezonePolicy, deal_round};
use goldflower_core::input::{
    PlayerNumber, RoundCommand, RoundNumber, SharedValue, parse_player_number, parse_round,
    parse_shared_value,
};

/// Offline three-card dealer: every player computes the same deal locally.
#[derive(Debug, Parser)]
#[command(
    name = AppInfo::name(),
    author,
    version = AppInfo::version(),
    about = AppInfo::tagline()
)]
struct Cli {
    /// Path to a YAML configuration file.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Timezone whose midnight starts the day: utc, local or an offset like +08:00.
    #[arg(long, value_name = "ZONE", global = true, allow_hyphen_values = true)]
    timezone: Option<TimezonePolicy>,

    /// Shuffle scheme: mt19937 or chacha20.
    #[arg(long, value_name = "SCHEME", global = true)]
    scheme: Option<String>,

    /// Print cards with ASCII suit letters instead of symbols.
    #[arg(long, global = true)]
    ascii: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive session (the default).
    Play {
        /// Deal as if it were this day instead of today.
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
    },
    /// Deal one round for one player and exit.
    Deal {
        /// Player number, 1 to 17.
        #[arg(short, long, value_parser = player_arg)]
        player: PlayerNumber,

        #[command(flatten)]
        round: RoundArgs,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print every seat's hand for a round so claimed hands can be checked.
    Audit {
        #[command(flatten)]
        round: RoundArgs,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
struct RoundArgs {
    /// The value every player agreed on.
    #[arg(short, long, value_parser = shared_arg, allow_hyphen_values = true)]
    shared_value: SharedValue,

    /// Round number, 1 or more.
    #[arg(short, long, value_parser = round_arg)]
    round: RoundNumber,

    /// Day to deal for; defaults to today in the configured timezone.
    #[arg(long, value_name = "YYYY-MM-DD", conflicts_with = "midnight")]
    date: Option<NaiveDate>,

    /// Exact midnight timestamp, as printed by `audit`.
    #[arg(long, value_name = "TIMESTAMP", allow_hyphen_values = true)]
    midnight: Option<i64>,
}

impl RoundArgs {
    fn deal(&self, settings: &DealSettings) -> RoundDeal {
        let midnight = match (self.midnight, self.date) {
            (Some(midnight), _) => midnight,
            (None, Some(date)) => settings.clock.midnight_on(date),
            (None, None) => settings.clock.midnight_now(),
        };
        deal_round(
            SeedInput::new(midnight, self.round, self.shared_value.clone()),
            settings.scheme,
        )
    }
}

fn player_arg(raw: &str) -> Result<PlayerNumber, String> {
    parse_player_number(raw).map_err(|err| err.to_string())
}

fn shared_arg(raw: &str) -> Result<SharedValue, String> {
    parse_shared_value(raw).map_err(|err| err.to_string())
}

fn round_arg(raw: &str) -> Result<RoundNumber, String> {
    match parse_round(raw).map_err(|err| err.to_string())? {
        RoundCommand::Deal(round) => Ok(round),
        RoundCommand::End => Err("round number must be at least 1".to_string()),
    }
}

fn main() -> Result<()> {
    match run(Cli::parse()) {
        Err(err) if is_broken_pipe(&err) => Ok(()),
        other => other,
    }
}

/// The reader went away (`goldflower audit | head`); nothing left to do.
fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|io_err| io_err.kind() == io::ErrorKind::BrokenPipe)
    })
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match cli.config.as_ref() {
        Some(path) => DealerConfig::from_path(path)?,
        None => DealerConfig::default(),
    };

    if let Some(timezone) = cli.timezone {
        config.timezone = timezone;
    }

    if let Some(scheme) = cli.scheme {
        config.scheme = scheme;
    }

    if cli.ascii {
        config.card_style = CardStyle::Ascii;
    }

    config.validate()?;
    let settings = config.resolved()?;
    let _logging_guard = init_logging(&config.logging)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command.unwrap_or(Command::Play { date: None }) {
        Command::Play { date } => {
            let stdin = io::stdin();
            Session::new(stdin.lock(), &mut out, settings)
                .with_date(date)
                .run()
                .context("running interactive session")?;
        }
        Command::Deal {
            player,
            round,
            json,
        } => {
            let deal = round.deal(&settings);
            if json {
                let report = DealReport::new(&deal, player, settings.card_style);
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                write_round(
                    &mut out,
                    round.round,
                    player,
                    &deal.hand(player),
                    deal.seed(),
                    settings.card_style,
                )?;
            }
        }
        Command::Audit { round, json } => {
            let deal = round.deal(&settings);
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&deal.report())?)?;
            } else {
                write_table(&mut out, &deal, settings.card_style)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}
