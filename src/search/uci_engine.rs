use std::fmt::{Debug, Display, Formatter};
use std::io::{BufRead, BufReader, Lines, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::str::FromStr;
use std::thread::sleep;
use std::time::{Duration, Instant};

use itertools::Itertools;
use thiserror::Error;

use crate::games::chess::moves::ChessMove;
use crate::games::chess::Chessboard;
use crate::general::common::{parse_int_from_str, Res};
use crate::output::display_message;
use crate::output::Message::{Debug as DebugMsg, Warning};
use crate::play::MoveHistory;
use crate::search::Searcher;

/// How long the engine gets to exit on its own after `quit` before it gets killed.
const QUIT_GRACE_PERIOD: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Couldn't start the engine '{path}': {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Couldn't communicate with the engine: {0}")]
    Io(#[from] std::io::Error),
    #[error("The engine closed its output while we were waiting for '{0}'")]
    Closed(String),
    #[error("Malformed bestmove line '{0}'")]
    MalformedBestMove(String),
    #[error("The engine process doesn't have a piped {0}")]
    MissingPipe(&'static str),
}

/// The subset of UCI that is needed to let an engine play from the start position.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum UciCommand {
    Uci,
    IsReady,
    UciNewGame,
    Position(MoveHistory),
    Go { movetime: Duration },
    Quit,
}

impl Display for UciCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UciCommand::Uci => write!(f, "uci"),
            UciCommand::IsReady => write!(f, "isready"),
            UciCommand::UciNewGame => write!(f, "ucinewgame"),
            UciCommand::Position(history) if history.is_empty() => write!(f, "position startpos"),
            UciCommand::Position(history) => write!(f, "position startpos moves {history}"),
            UciCommand::Go { movetime } => write!(f, "go movetime {}", movetime.as_millis()),
            UciCommand::Quit => write!(f, "quit"),
        }
    }
}

/// Parses the move of a `bestmove` line. `(none)` and `0000` mean that the engine has no move.
pub fn parse_best_move(line: &str) -> Result<Option<ChessMove>, EngineError> {
    let malformed = || EngineError::MalformedBestMove(line.to_string());
    let mut words = line.split_whitespace();
    if words.next() != Some("bestmove") {
        return Err(malformed());
    }
    match words.next() {
        None => Err(malformed()),
        Some("(none)" | "0000") => Ok(None),
        Some(token) => ChessMove::from_str(token)
            .map(Some)
            .map_err(|_| malformed()),
    }
}

/// The centipawn score of an `info` line, if it has one.
fn parse_score(line: &str) -> Option<i32> {
    let (_, _, score) = line
        .split_whitespace()
        .tuple_windows()
        .find(|(a, b, _)| *a == "score" && *b == "cp")?;
    parse_int_from_str(score, "score").ok()
}

/// An engine process that is controlled over its stdin and stdout.
///
/// All communication is synchronous: every read blocks until the engine prints a line.
pub struct UciEngine {
    name: String,
    child: Child,
    to_engine: ChildStdin,
    from_engine: Lines<BufReader<ChildStdout>>,
    movetime: Duration,
    last_score: Option<i32>,
}

impl Debug for UciEngine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "UCI engine '{}' (pid {})", self.name, self.child.id())
    }
}

impl UciEngine {
    pub fn spawn(path: &Path, args: &[String], movetime: Duration) -> Result<Self, EngineError> {
        let mut child = Command::new(path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                path: path.display().to_string(),
                source,
            })?;
        let to_engine = child.stdin.take().ok_or(EngineError::MissingPipe("stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or(EngineError::MissingPipe("stdout"))?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());
        display_message(
            DebugMsg,
            &format!("Started engine '{name}' with pid {}", child.id()),
        );
        Ok(Self {
            name,
            child,
            to_engine,
            from_engine: BufReader::new(stdout).lines(),
            movetime,
            last_score: None,
        })
    }

    /// Spawns the engine and waits until it is ready to play a new game.
    pub fn start(path: &Path, args: &[String], movetime: Duration) -> Result<Self, EngineError> {
        let mut engine = Self::spawn(path, args, movetime)?;
        engine.init()?;
        Ok(engine)
    }

    pub fn send(&mut self, cmd: &UciCommand) -> Result<(), EngineError> {
        display_message(DebugMsg, &format!("> {cmd}"));
        writeln!(self.to_engine, "{cmd}")?;
        self.to_engine.flush()?;
        Ok(())
    }

    fn read_line(&mut self, waiting_for: &str) -> Result<String, EngineError> {
        let line = self
            .from_engine
            .next()
            .ok_or_else(|| EngineError::Closed(waiting_for.to_string()))??;
        display_message(DebugMsg, &format!("< {line}"));
        Ok(line)
    }

    /// Reads lines until one starts with `keyword` and returns that line.
    fn read_until(&mut self, keyword: &str) -> Result<String, EngineError> {
        loop {
            let line = self.read_line(keyword)?;
            let mut words = line.split_whitespace();
            match words.next() {
                Some(word) if word == keyword => return Ok(line),
                Some("id") if words.next() == Some("name") => {
                    self.name = words.join(" ");
                }
                Some("info") => {
                    if let Some(score) = parse_score(&line) {
                        self.last_score = Some(score);
                    }
                }
                _ => {}
            }
        }
    }

    pub fn init(&mut self) -> Result<(), EngineError> {
        self.send(&UciCommand::Uci)?;
        _ = self.read_until("uciok")?;
        self.send(&UciCommand::IsReady)?;
        _ = self.read_until("readyok")?;
        self.send(&UciCommand::UciNewGame)
    }

    /// Asks the engine for its move in the position reached from the start position by `history`.
    pub fn best_move(&mut self, history: &MoveHistory) -> Result<Option<ChessMove>, EngineError> {
        self.send(&UciCommand::Position(history.clone()))?;
        self.send(&UciCommand::Go {
            movetime: self.movetime,
        })?;
        let line = self.read_until("bestmove")?;
        parse_best_move(&line)
    }

    /// The centipawn score of the most recent `info ... score cp` line, from the engine's perspective.
    pub fn last_score(&self) -> Option<i32> {
        self.last_score
    }
}

impl Searcher for UciEngine {
    fn search(&mut self, _: &mut Chessboard, history: &MoveHistory) -> Res<Option<ChessMove>> {
        Ok(self.best_move(history)?)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        _ = self.send(&UciCommand::Quit);
        let start = Instant::now();
        while start.elapsed() < QUIT_GRACE_PERIOD {
            match self.child.try_wait() {
                Ok(Some(_)) => return,
                Ok(None) => sleep(Duration::from_millis(10)),
                Err(_) => break,
            }
        }
        display_message(
            Warning,
            &format!("The engine '{}' didn't quit in time, killing it", self.name),
        );
        _ = self.child.kill();
        _ = self.child.wait();
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::str::FromStr;
    use std::time::Duration;

    use crate::games::chess::moves::ChessMove;
    use crate::play::MoveHistory;
    use crate::search::uci_engine::*;

    const FAKE_ENGINE: &str = r#"
n=0
while read -r line; do
  case "$line" in
    uci) echo "id name Fake Engine 1.0"; echo "option name Hash type spin default 16 min 1 max 16"; echo "uciok" ;;
    isready) echo "readyok" ;;
    go*)
      n=$((n+1))
      case $n in
        1) echo "info depth 1 score cp 31 pv e2e4"; echo "bestmove e2e4 ponder e7e5" ;;
        2) echo "info depth 1 score cp -12 pv d2d4"; echo "bestmove d2d4" ;;
        *) echo "bestmove (none)" ;;
      esac ;;
    quit) exit 0 ;;
  esac
done
"#;

    fn sh(script: &str) -> Result<UciEngine, EngineError> {
        UciEngine::start(
            Path::new("sh"),
            &["-c".to_string(), script.to_string()],
            Duration::from_millis(10),
        )
    }

    fn mov(token: &str) -> ChessMove {
        ChessMove::from_str(token).unwrap()
    }

    #[test]
    fn command_test() {
        let mut history = MoveHistory::default();
        assert_eq!(
            UciCommand::Position(history.clone()).to_string(),
            "position startpos"
        );
        history.push(mov("e2e4"));
        history.push(mov("e7e5"));
        assert_eq!(
            UciCommand::Position(history).to_string(),
            "position startpos moves e2e4 e7e5"
        );
        assert_eq!(
            UciCommand::Go {
                movetime: Duration::from_secs(1)
            }
            .to_string(),
            "go movetime 1000"
        );
        assert_eq!(UciCommand::UciNewGame.to_string(), "ucinewgame");
    }

    #[test]
    fn best_move_parse_test() {
        assert_eq!(parse_best_move("bestmove e2e4").unwrap(), Some(mov("e2e4")));
        assert_eq!(
            parse_best_move("bestmove g1f3 ponder g8f6").unwrap(),
            Some(mov("g1f3"))
        );
        assert_eq!(
            parse_best_move("bestmove e7e8q").unwrap(),
            Some(mov("e7e8q"))
        );
        assert_eq!(parse_best_move("bestmove (none)").unwrap(), None);
        assert_eq!(parse_best_move("bestmove 0000").unwrap(), None);
        for line in ["bestmove", "bestmove e9e4", "info bestmove e2e4", ""] {
            assert!(matches!(
                parse_best_move(line),
                Err(EngineError::MalformedBestMove(_))
            ));
        }
    }

    #[test]
    fn score_parse_test() {
        assert_eq!(
            parse_score("info depth 12 seldepth 14 score cp -35 nodes 100 pv e2e4"),
            Some(-35)
        );
        assert_eq!(parse_score("info depth 30 score mate 3 pv e2e4"), None);
        assert_eq!(parse_score("info string score cp"), None);
    }

    #[test]
    fn spawn_failure_test() {
        let res = UciEngine::spawn(
            Path::new("/this/engine/does/not/exist"),
            &[],
            Duration::from_millis(10),
        );
        assert!(matches!(res, Err(EngineError::Spawn { .. })));
    }

    #[test]
    #[cfg(unix)]
    fn fake_engine_test() {
        let mut engine = sh(FAKE_ENGINE).unwrap();
        assert_eq!(Searcher::name(&engine), "Fake Engine 1.0");
        let mut history = MoveHistory::default();
        assert_eq!(engine.best_move(&history).unwrap(), Some(mov("e2e4")));
        assert_eq!(engine.last_score(), Some(31));
        history.push(mov("e2e4"));
        history.push(mov("e7e5"));
        assert_eq!(engine.best_move(&history).unwrap(), Some(mov("d2d4")));
        assert_eq!(engine.last_score(), Some(-12));
        assert_eq!(engine.best_move(&history).unwrap(), None);
    }

    #[test]
    #[cfg(unix)]
    fn closed_engine_test() {
        let res = sh("read -r line; echo 'id name Quitter'");
        assert!(
            matches!(res, Err(EngineError::Closed(ref s)) if s == "uciok"),
            "{res:?}"
        );
        let res = sh("exit 0");
        assert!(matches!(
            res,
            Err(EngineError::Closed(_)) | Err(EngineError::Io(_))
        ));
    }

    #[test]
    #[cfg(unix)]
    fn stubborn_engine_is_killed_test() {
        // ignores `quit`, so dropping it has to kill it
        let script = "while read -r line; do case \"$line\" in uci) echo uciok;; isready) echo readyok;; esac; done";
        let engine = sh(script).unwrap();
        drop(engine);
    }
}
