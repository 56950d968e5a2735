//! One engine process, driven over UCI for the duration of a single call.

use crate::error::EngineError;
use crate::launcher::{EngineLauncher, EngineReader, EngineWriter, ProcessHandle};
use chess_core::Position;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, Lines};
use uci::{EngineInfo, EngineMessage, GoOptions, GuiCommand, OptionKind, Score, UciOption};

/// Maximum number of lines to read while waiting for `uciok` or `readyok`.
pub const MAX_HANDSHAKE_LINES: usize = 1000;

const LIMIT_STRENGTH_OPTION: &str = "UCI_LimitStrength";
const ELO_OPTION: &str = "UCI_Elo";

/// Outcome of a best-effort strength limit request.
///
/// Only [`StrengthLimit::Applied`] means the engine is playing weaker; every
/// other variant leaves the engine at full strength and is not an error.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrengthLimit {
    /// Both options were set and the engine acknowledged them.
    Applied { elo: u32 },
    /// The engine does not declare `UCI_LimitStrength` and `UCI_Elo`.
    Unsupported,
    /// The requested rating is outside the engine's `UCI_Elo` range.
    OutOfRange { elo: u32 },
    /// The engine answered the `setoption` commands with an error.
    Rejected(String),
    /// The engine did not confirm the options with `readyok`.
    Unacknowledged(String),
}

impl StrengthLimit {
    pub fn is_applied(&self) -> bool {
        matches!(self, StrengthLimit::Applied { .. })
    }
}

impl fmt::Display for StrengthLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrengthLimit::Applied { elo } => write!(f, "limited to {}", elo),
            StrengthLimit::Unsupported => write!(f, "engine does not support strength limiting"),
            StrengthLimit::OutOfRange { elo } => write!(f, "{} is outside the engine's range", elo),
            StrengthLimit::Rejected(msg) => write!(f, "engine rejected the option: {}", msg),
            StrengthLimit::Unacknowledged(msg) => write!(f, "engine did not confirm: {}", msg),
        }
    }
}

/// What one `go` produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchReport {
    /// Depth of the last exact primary line.
    pub depth: Option<u32>,
    /// Score of the last exact primary line, relative to the side to move.
    pub score: Option<Score>,
    /// Last non-empty principal variation.
    pub pv: Vec<String>,
    /// Move from the `bestmove` line, `None` for `(none)`/`0000`.
    pub best_move: Option<String>,
}

impl SearchReport {
    fn absorb(&mut self, info: EngineInfo) {
        self.depth = info.depth;
        self.score = info.score;
        if !info.pv.is_empty() {
            self.pv = info.pv;
        }
    }

    /// The engine declared that there is no move to play.
    pub fn is_terminal(&self) -> bool {
        self.pv.is_empty() && self.best_move.is_none()
    }
}

/// A live engine process owned by a single analysis call.
///
/// Dropping the session kills the process; [`EngineSession::release`]
/// additionally asks it to quit first.
pub struct EngineSession {
    lines: Lines<EngineReader>,
    writer: EngineWriter,
    process: Option<Box<dyn ProcessHandle>>,
    name: String,
    /// Declared options keyed by lowercase name (UCI names are case-insensitive).
    options: HashMap<String, UciOption>,
}

impl EngineSession {
    /// Launches an engine and completes the `uci`/`isready` handshake,
    /// all within `timeout`.
    pub async fn open<L: EngineLauncher>(launcher: &L, timeout: Duration) -> Result<Self, EngineError> {
        let startup = async {
            let io = launcher.launch().await.map_err(EngineError::Launch)?;
            let mut session = EngineSession {
                lines: io.reader.lines(),
                writer: io.writer,
                process: Some(io.process),
                name: String::new(),
                options: HashMap::new(),
            };
            session.handshake().await?;
            Ok::<_, EngineError>(session)
        };

        tokio::time::timeout(timeout, startup)
            .await
            .map_err(|_| EngineError::Timeout(timeout))?
    }

    /// The engine's name as reported via `id name`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a declared option, ignoring case.
    pub fn option(&self, name: &str) -> Option<&UciOption> {
        self.options.get(&name.to_ascii_lowercase())
    }

    async fn handshake(&mut self) -> Result<(), EngineError> {
        self.send(&GuiCommand::Uci).await?;

        for _ in 0..MAX_HANDSHAKE_LINES {
            match EngineMessage::parse(&self.read_line().await?) {
                EngineMessage::Id { name: Some(name), .. } => self.name = name,
                EngineMessage::Option(opt) => {
                    self.options.insert(opt.name.to_ascii_lowercase(), opt);
                }
                EngineMessage::UciOk => {
                    if self.name.is_empty() {
                        self.name = "Unknown Engine".to_string();
                    }
                    self.sync().await?;
                    return Ok(());
                }
                _ => {}
            }
        }

        Err(EngineError::InvalidResponse(
            "no uciok during handshake".to_string(),
        ))
    }

    /// Sends `isready` and waits for `readyok`, returning any unrecognized
    /// lines the engine printed in between.
    async fn sync(&mut self) -> Result<Vec<String>, EngineError> {
        self.send(&GuiCommand::IsReady).await?;

        let mut chatter = Vec::new();
        for _ in 0..MAX_HANDSHAKE_LINES {
            match EngineMessage::parse(&self.read_line().await?) {
                EngineMessage::ReadyOk => return Ok(chatter),
                EngineMessage::Other(line) if !line.is_empty() => chatter.push(line),
                EngineMessage::Info(EngineInfo {
                    string: Some(text),
                    ..
                }) => chatter.push(text),
                _ => {}
            }
        }

        Err(EngineError::InvalidResponse("no readyok".to_string()))
    }

    /// Tries to weaken the engine to roughly `elo`.
    ///
    /// Never fails: the outcome says whether the limit took effect.
    pub async fn limit_strength(&mut self, elo: u32, timeout: Duration) -> StrengthLimit {
        let limit = match self.option(LIMIT_STRENGTH_OPTION) {
            Some(opt) if matches!(opt.kind, OptionKind::Check { .. }) => opt.name.clone(),
            _ => return StrengthLimit::Unsupported,
        };
        let rating = match self.option(ELO_OPTION) {
            Some(opt) if matches!(opt.kind, OptionKind::Spin { .. }) => {
                if !opt.accepts(i64::from(elo)) {
                    return StrengthLimit::OutOfRange { elo };
                }
                opt.name.clone()
            }
            _ => return StrengthLimit::Unsupported,
        };

        let attempt = async {
            self.send(&GuiCommand::SetOption {
                name: limit,
                value: Some("true".to_string()),
            })
            .await?;
            self.send(&GuiCommand::SetOption {
                name: rating,
                value: Some(elo.to_string()),
            })
            .await?;
            self.sync().await
        };

        match tokio::time::timeout(timeout, attempt).await {
            Ok(Ok(chatter)) => match chatter.into_iter().find(|l| is_option_error(l)) {
                Some(msg) => StrengthLimit::Rejected(msg),
                None => StrengthLimit::Applied { elo },
            },
            Ok(Err(e)) => StrengthLimit::Unacknowledged(e.to_string()),
            Err(_) => StrengthLimit::Unacknowledged(EngineError::Timeout(timeout).to_string()),
        }
    }

    /// Searches `position` with the given limits and collects the result.
    ///
    /// Only exact scores of the primary line are recorded; bound-only and
    /// secondary multi-PV lines are skipped.
    pub async fn search(&mut self, position: &Position, limits: GoOptions) -> Result<SearchReport, EngineError> {
        self.send(&GuiCommand::Position {
            fen: Some(position.to_fen()),
            moves: Vec::new(),
        })
        .await?;
        self.send(&GuiCommand::Go(limits)).await?;

        let mut report = SearchReport::default();
        loop {
            match EngineMessage::parse(&self.read_line().await?) {
                EngineMessage::Info(info) if info.is_exact_primary() => report.absorb(info),
                EngineMessage::BestMove { mv, .. } => {
                    report.best_move = mv;
                    return Ok(report);
                }
                _ => {}
            }
        }
    }

    /// Asks the engine to quit and reclaims the process.
    ///
    /// Waits up to `grace` for a clean exit before killing it.
    pub async fn release(mut self, grace: Duration) {
        if tokio::time::timeout(grace, self.send(&GuiCommand::Quit)).await.is_err() {
            tracing::debug!("engine did not accept quit");
        }
        if let Some(mut process) = self.process.take() {
            process.shutdown(grace).await;
        }
    }

    async fn send(&mut self, command: &GuiCommand) -> Result<(), EngineError> {
        let line = command.to_uci();
        tracing::trace!(command = %line, "-> engine");
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<String, EngineError> {
        match self.lines.next_line().await? {
            Some(line) => {
                tracing::trace!(line = %line, "<- engine");
                Ok(line)
            }
            None => Err(EngineError::Closed),
        }
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        // Reached without `release` on errors, panics and cancellation.
        if let Some(process) = self.process.as_mut() {
            process.kill();
        }
    }
}

/// Whether an engine reply to `setoption` reports a failure.
fn is_option_error(line: &str) -> bool {
    let line = line.trim().to_ascii_lowercase();
    let text = line.strip_prefix("info string ").unwrap_or(&line);
    text.contains("no such option") || text.contains("unknown option") || text.starts_with("error")
}
