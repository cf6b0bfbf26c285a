use std::io::{self, BufRead, Write};

use chrono::NaiveDate;
use goldflower_core::deal::{SeedInput, deal_round};
use goldflower_core::input::{
    InputError, MAX_PLAYERS, PlayerNumber, RoundCommand, RoundNumber, SharedValue,
    parse_player_number, parse_round, parse_shared_value,
};
use tracing::{Level, event};

use crate::config::DealSettings;
use crate::render::{write_banner, write_round};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// A round number below 1 was entered.
    Finished,
    /// Input ran out before the player quit.
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub rounds_dealt: usize,
    pub end: SessionEnd,
}

/// Interactive prompt loop: player number and shared value once, then one
/// round number per deal until a number below 1 ends the session.
pub struct Session<R, W> {
    input: R,
    output: W,
    settings: DealSettings,
    date: Option<NaiveDate>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, settings: DealSettings) -> Self {
        Self {
            input,
            output,
            settings,
            date: None,
        }
    }

    /// Deal every round as if played on `date` instead of today.
    pub fn with_date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    pub fn run(mut self) -> io::Result<SessionSummary> {
        write_banner(&mut self.output)?;

        let prompt = format!("Enter your player number (1-{MAX_PLAYERS}): ");
        let Some(player) = self.ask(&prompt, parse_player_number)? else {
            return self.closed(0);
        };
        let Some(shared) = self.ask("Enter the shared value (asked once): ", parse_shared_value)?
        else {
            return self.closed(0);
        };

        writeln!(self.output)?;
        writeln!(self.output, "Player number: {player}")?;
        writeln!(self.output, "Shared value: {shared}")?;
        writeln!(self.output)?;
        writeln!(self.output, "Game on!")?;

        let mut rounds_dealt = 0;
        loop {
            match self.ask("\nEnter round number: ", parse_round)? {
                None => return self.closed(rounds_dealt),
                Some(RoundCommand::End) => {
                    writeln!(self.output, "Game over, thanks for playing!")?;
                    return Ok(SessionSummary {
                        rounds_dealt,
                        end: SessionEnd::Finished,
                    });
                }
                Some(RoundCommand::Deal(round)) => {
                    self.deal(player, &shared, round)?;
                    rounds_dealt += 1;
                }
            }
        }
    }

    fn deal(
        &mut self,
        player: PlayerNumber,
        shared: &SharedValue,
        round: RoundNumber,
    ) -> io::Result<()> {
        let midnight = match self.date {
            Some(date) => self.settings.clock.midnight_on(date),
            None => self.settings.clock.midnight_now(),
        };
        let deal = deal_round(
            SeedInput::new(midnight, round, shared.clone()),
            self.settings.scheme,
        );
        let hand = deal.hand(player);

        if tracing::enabled!(Level::INFO) {
            event!(
                target: "goldflower::session",
                Level::INFO,
                round = round.get(),
                player = player.get(),
                midnight,
                scheme = self.settings.scheme.as_str(),
                seed = %deal.seed().to_hex(),
            );
        }

        write_round(
            &mut self.output,
            round,
            player,
            &hand,
            deal.seed(),
            self.settings.card_style,
        )
    }

    /// Prompt until `parse` accepts the line. `None` means input is exhausted.
    fn ask<T>(
        &mut self,
        prompt: &str,
        parse: fn(&str) -> Result<T, InputError>,
    ) -> io::Result<Option<T>> {
        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            match parse(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(err) => writeln!(self.output, "{err}")?,
            }
        }
    }

    fn closed(&mut self, rounds_dealt: usize) -> io::Result<SessionSummary> {
        writeln!(self.output)?;
        writeln!(self.output, "Input closed, leaving the table.")?;
        Ok(SessionSummary {
            rounds_dealt,
            end: SessionEnd::InputClosed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CardStyle;
    use goldflower_core::deal::{DayClock, ShuffleScheme, TimezonePolicy};
    use std::io::Cursor;

    fn settings() -> DealSettings {
        DealSettings {
            clock: DayClock::new(TimezonePolicy::Utc),
            scheme: ShuffleScheme::Mt19937,
            card_style: CardStyle::Symbols,
        }
    }

    fn play(script: &str) -> (SessionSummary, String) {
        let mut output = Vec::new();
        let date = NaiveDate::from_ymd_opt(2023, 11, 14);
        let summary = Session::new(Cursor::new(script.as_bytes()), &mut output, settings())
            .with_date(date)
            .run()
            .expect("session runs");
        (summary, String::from_utf8(output).expect("utf8"))
    }

    #[test]
    fn deals_rounds_until_zero() {
        let (summary, text) = play("1\n42\n1\n2\n0\n");
        assert_eq!(
            summary,
            SessionSummary {
                rounds_dealt: 2,
                end: SessionEnd::Finished
            }
        );
        assert!(text.contains("Player 1's cards: ♥J, ♠8, ♠9"));
        assert!(text.contains("Player 1's cards: ♠Q, ♣5, ♣Q"));
        assert!(text.contains("Game over, thanks for playing!"));
    }

    #[test]
    fn reprompts_for_bad_player_numbers() {
        let (_, text) = play("zero\n0\n18\n5\nabc\n3\n-1\n");
        assert!(text.contains("please enter a valid number"));
        assert!(text.contains("player number must be greater than 0"));
        assert!(text.contains("player number cannot exceed 17"));
        assert!(text.contains("Player number: 5"));
    }

    #[test]
    fn empty_shared_value_is_reprompted() {
        let (_, text) = play("5\n\n42\n3\n-5\n");
        assert!(text.contains("shared value must not be empty"));
        assert!(text.contains("Shared value: 42"));
        assert!(text.contains("===== Round 3 ====="));
        assert!(text.contains("Player 5's cards: ♥6, ♦4, ♦2"));
    }

    #[test]
    fn non_numeric_round_does_not_end_session() {
        let (summary, text) = play("1\n42\nfirst\n1\n0\n");
        assert_eq!(summary.rounds_dealt, 1);
        assert!(text.contains("please enter a valid number"));
        assert_eq!(summary.end, SessionEnd::Finished);
    }

    #[test]
    fn end_of_input_closes_session() {
        let (summary, text) = play("1\n42\n1\n");
        assert_eq!(summary.rounds_dealt, 1);
        assert_eq!(summary.end, SessionEnd::InputClosed);
        assert!(text.contains("Input closed"));

        let (summary, _) = play("");
        assert_eq!(summary.rounds_dealt, 0);
        assert_eq!(summary.end, SessionEnd::InputClosed);
    }

    #[test]
    fn seed_is_printed_in_decimal() {
        let (_, text) = play("1\n42\n1\n0\n");
        assert!(text.contains(
            "Seed: 73640828254637208745065694834288331440393716677002625184762047253076501490975"
        ));
    }
}
