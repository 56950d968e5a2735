//! UCI (Universal Chess Interface) protocol library.
//!
//! This crate provides types for both directions of the UCI conversation
//! between a GUI-side driver and an engine process.
//!
//! # Commands (driver → engine)
//!
//! - `uci` - Initialize engine, get id and options
//! - `isready` / `readyok` - Synchronization
//! - `setoption name <name> [value <value>]` - Configure an option
//! - `position fen <fen> [moves <move>...]` - Set position
//! - `go [depth <d>] [movetime <ms>]` - Start a bounded search
//! - `stop` - Stop search
//! - `quit` - Exit engine
//!
//! # Messages (engine → driver)
//!
//! - `id name|author ...`, `option name ... type ...`, `uciok`
//! - `readyok`
//! - `info ...` search progress
//! - `bestmove <move> [ponder <move>]`

mod command;
mod info;
mod option;

pub use command::{GoOptions, GuiCommand};
pub use info::{EngineInfo, InfoBuilder, Score, ScoreBound};
pub use option::{OptionKind, UciOption};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UciError {
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Messages sent from engine to GUI.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineMessage {
    /// Engine identification.
    Id { name: Option<String>, author: Option<String> },
    /// Option declaration.
    Option(UciOption),
    /// UCI initialization complete.
    UciOk,
    /// Engine is ready.
    ReadyOk,
    /// Search information.
    Info(EngineInfo),
    /// Search finished. `mv` is `None` when the engine reports no move
    /// (`bestmove (none)` or the null move `0000`).
    BestMove { mv: Option<String>, ponder: Option<String> },
    /// Anything else (engine banners, diagnostics, unknown commands).
    Other(String),
}

/// Tokens engines send after `bestmove` when there is no move to play.
pub const NO_MOVE_TOKENS: [&str; 3] = ["(none)", "0000", "none"];

impl EngineMessage {
    /// Parse one line of engine output. Never fails: unrecognized lines
    /// become [`EngineMessage::Other`].
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let mut parts = line.split_whitespace();

        match parts.next().unwrap_or("") {
            "uciok" => EngineMessage::UciOk,
            "readyok" => EngineMessage::ReadyOk,
            "id" => {
                let rest = |prefix: &str| line.strip_prefix(prefix).map(|s| s.trim().to_string());
                match parts.next() {
                    Some("name") => EngineMessage::Id {
                        name: rest("id name"),
                        author: None,
                    },
                    Some("author") => EngineMessage::Id {
                        name: None,
                        author: rest("id author"),
                    },
                    _ => EngineMessage::Other(line.to_string()),
                }
            }
            "option" => match UciOption::parse(line) {
                Some(opt) => EngineMessage::Option(opt),
                None => EngineMessage::Other(line.to_string()),
            },
            "info" => match EngineInfo::parse(line) {
                Some(info) => EngineMessage::Info(info),
                None => EngineMessage::Other(line.to_string()),
            },
            "bestmove" => {
                let mv = parts
                    .next()
                    .filter(|m| !NO_MOVE_TOKENS.contains(m))
                    .map(str::to_string);
                let ponder = match parts.next() {
                    Some("ponder") => parts.next().map(str::to_string),
                    _ => None,
                };
                EngineMessage::BestMove { mv, ponder }
            }
            _ => EngineMessage::Other(line.to_string()),
        }
    }

    /// Format message for output.
    pub fn to_uci(&self) -> String {
        match self {
            EngineMessage::Id { name, author } => {
                let mut parts = Vec::new();
                if let Some(n) = name {
                    parts.push(format!("id name {}", n));
                }
                if let Some(a) = author {
                    parts.push(format!("id author {}", a));
                }
                parts.join("\n")
            }
            EngineMessage::Option(opt) => {
                let mut line = format!("option name {} type ", opt.name);
                match &opt.kind {
                    OptionKind::Check { default } => {
                        line.push_str("check");
                        if let Some(d) = default {
                            line.push_str(&format!(" default {}", d));
                        }
                    }
                    OptionKind::Spin { default, min, max } => {
                        line.push_str("spin");
                        for (key, v) in [("default", default), ("min", min), ("max", max)] {
                            if let Some(v) = v {
                                line.push_str(&format!(" {} {}", key, v));
                            }
                        }
                    }
                    OptionKind::Combo { default, vars } => {
                        line.push_str("combo");
                        if let Some(d) = default {
                            line.push_str(&format!(" default {}", d));
                        }
                        for v in vars {
                            line.push_str(&format!(" var {}", v));
                        }
                    }
                    OptionKind::Button => line.push_str("button"),
                    OptionKind::String { default } => {
                        line.push_str("string default ");
                        line.push_str(default.as_deref().unwrap_or("<empty>"));
                    }
                }
                line
            }
            EngineMessage::UciOk => "uciok".to_string(),
            EngineMessage::ReadyOk => "readyok".to_string(),
            EngineMessage::Info(info) => info.to_uci(),
            EngineMessage::BestMove { mv, ponder } => {
                let mv = mv.as_deref().unwrap_or("(none)");
                match ponder {
                    Some(p) => format!("bestmove {} ponder {}", mv, p),
                    None => format!("bestmove {}", mv),
                }
            }
            EngineMessage::Other(raw) => raw.clone(),
        }
    }
}
