use std::thread::sleep;
use std::time::Duration;

use anyhow::Context;

use crate::games::chess::moves::ChessMove;
use crate::games::chess::{castle_side_from_shape, Chessboard};
use crate::games::Color;
use crate::general::common::Res;
use crate::output::display_message;
use crate::output::Message::*;
use crate::play::{AnySearcher, GameResult, MatchOutcome, MoveHistory};
use crate::ui::{BoardView, Presentation};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MatchConfig {
    /// Pause after each ply so that a human can follow the game.
    pub delay: Duration,
    pub max_plies: Option<usize>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(500),
            max_plies: None,
        }
    }
}

/// Plays one game between two searchers, starting from the initial position.
///
/// This is the only owner of the board. The presentation only ever gets copies.
#[derive(Debug)]
pub struct BuiltInMatch {
    board: Chessboard,
    history: MoveHistory,
    white: AnySearcher,
    black: AnySearcher,
    presentation: Presentation,
    config: MatchConfig,
}

impl BuiltInMatch {
    pub fn new(
        white: AnySearcher,
        black: AnySearcher,
        presentation: Presentation,
        config: MatchConfig,
    ) -> Self {
        Self {
            board: Chessboard::default(),
            history: MoveHistory::default(),
            white,
            black,
            presentation,
            config,
        }
    }

    pub fn board(&self) -> Chessboard {
        self.board
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    fn searcher(&mut self, color: Color) -> &mut AnySearcher {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    fn view(&self) -> BoardView {
        BoardView {
            board: self.board,
            last_move: self.history.last().copied(),
            ply: self.history.len(),
        }
    }

    /// Nothing stops a searcher from returning nonsense, so moves are played as they are.
    /// Suspicious ones are at least reported.
    fn check_move(&self, mov: ChessMove, color: Color) {
        let is_castling = self
            .board
            .piece_on(mov.from_square())
            .and_then(|piece| castle_side_from_shape(piece, mov))
            .is_some();
        let is_pseudolegal = self
            .board
            .all_pseudolegal_moves(color)
            .into_iter()
            .any(|m| m.same_squares(mov));
        if !is_castling && !is_pseudolegal {
            display_message(
                Warning,
                &format!("The {color} move {mov} isn't pseudo-legal, playing it anyway"),
            );
        }
    }

    /// Runs the entire game in this function, returning once a side has no moves or the ply
    /// limit has been reached.
    pub fn run(&mut self) -> Res<MatchOutcome> {
        display_message(
            Info,
            &format!(
                "Starting a new game: {0} (white) vs {1} (black)",
                self.white.name(),
                self.black.name()
            ),
        );
        self.presentation.show_and_wait(self.view())?;
        let result = loop {
            let color = self.board.active_player();
            let history = self.history.clone();
            let mut board = self.board;
            let chosen = self
                .searcher(color)
                .search(&mut board, &history)
                .with_context(|| format!("The {color} player couldn't choose a move"))?;
            debug_assert_eq!(board, self.board);
            let Some(mov) = chosen else {
                break GameResult::NoMoves(color);
            };
            self.check_move(mov, color);
            self.history.push(mov);
            _ = self.board.apply(mov);
            self.presentation.show_and_wait(self.view())?;
            display_message(
                Debug,
                &format!(
                    "{color} played {mov} (ply {0}):\n{1}",
                    self.history.len(),
                    self.board.render_with_indices()
                ),
            );
            self.board.advance_turn();
            if self
                .config
                .max_plies
                .is_some_and(|max| self.history.len() >= max)
            {
                break GameResult::PlyLimit;
            }
            sleep(self.config.delay);
        };
        let outcome = MatchOutcome {
            plies: self.history.len(),
            result,
            history: self.history.clone(),
        };
        display_message(Info, &outcome.to_string());
        self.presentation
            .display_message(Info, &format!("Moves: {}", outcome.history))?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::games::Color::*;
    use crate::play::run_match::{BuiltInMatch, MatchConfig};
    use crate::play::GameResult;
    use crate::search::random_mover::RandomMover;
    use crate::ui::no_graphic::NoGraphics;
    use crate::ui::Presentation;

    fn config(max_plies: Option<usize>) -> MatchConfig {
        MatchConfig {
            delay: Duration::ZERO,
            max_plies,
        }
    }

    fn presentation() -> Presentation {
        Presentation::spawn(Box::new(NoGraphics::default())).unwrap()
    }

    #[test]
    fn random_vs_random_test() {
        let mut the_match = BuiltInMatch::new(
            Box::new(RandomMover::seeded(1)),
            Box::new(RandomMover::seeded(2)),
            presentation(),
            config(Some(30)),
        );
        let outcome = the_match.run().unwrap();
        assert!(outcome.plies <= 30);
        assert_eq!(outcome.plies, outcome.history.len());
        if outcome.result == GameResult::PlyLimit {
            assert_eq!(outcome.plies, 30);
            assert_eq!(the_match.board().active_player(), White);
        }
        assert_eq!(the_match.history(), &outcome.history);

        // the same seeds give the same game
        let mut replay = BuiltInMatch::new(
            Box::new(RandomMover::seeded(1)),
            Box::new(RandomMover::seeded(2)),
            presentation(),
            config(Some(30)),
        );
        assert_eq!(replay.run().unwrap(), outcome);
        assert_eq!(replay.board(), the_match.board());
    }

    #[test]
    #[cfg(unix)]
    fn engine_vs_random_test() {
        use std::path::Path;

        use crate::search::uci_engine::UciEngine;

        let script = r#"
n=0
while read -r line; do
  case "$line" in
    uci) echo "uciok" ;;
    isready) echo "readyok" ;;
    go*)
      n=$((n+1))
      case $n in
        1) echo "bestmove e2e4" ;;
        2) echo "bestmove d2d4" ;;
        *) echo "bestmove (none)" ;;
      esac ;;
    quit) exit 0 ;;
  esac
done
"#;
        let engine = UciEngine::start(
            Path::new("sh"),
            &["-c".to_string(), script.to_string()],
            Duration::from_millis(1),
        )
        .unwrap();
        let mut the_match = BuiltInMatch::new(
            Box::new(engine),
            Box::new(RandomMover::seeded(7)),
            presentation(),
            config(None),
        );
        let outcome = the_match.run().unwrap();
        assert_eq!(outcome.result, GameResult::NoMoves(White));
        assert_eq!(outcome.plies, 4);
        assert_eq!(outcome.history[0].to_string(), "e2e4");
        assert_eq!(outcome.history[2].to_string(), "d2d4");
        assert_eq!(the_match.board().active_player(), White);
    }
}
