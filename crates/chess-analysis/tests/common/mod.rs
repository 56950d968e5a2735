//! In-memory UCI engine for exercising the analysis service without a
//! real engine binary.
//!
//! Each launch spawns a task that speaks UCI over a duplex pipe and follows
//! a [`Script`]. Launches, releases (handle drops), searches, and received
//! commands are counted so tests can check the process lifecycle.

#![allow(dead_code)]

use chess_analysis::{EngineConfig, EngineIo, EngineLauncher, ProcessHandle};
use futures_util::future::BoxFuture;
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};
use tokio::task::JoinHandle;
use uci::GuiCommand;

pub const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Options a Stockfish build with strength limiting declares.
pub const STRENGTH_OPTIONS: [&str; 2] = [
    "option name UCI_LimitStrength type check default false",
    "option name UCI_Elo type spin default 1320 min 1320 max 3190",
];

/// How the fake engine answers one `go`.
#[derive(Debug, Clone)]
pub enum Search {
    /// Print these lines.
    Reply(Vec<String>),
    /// Never answer.
    Stall,
    /// Exit without answering.
    Crash,
}

/// `Search::Reply` from string slices.
pub fn reply(lines: &[&str]) -> Search {
    Search::Reply(lines.iter().map(|l| l.to_string()).collect())
}

/// Behaviour of the fake engine.
#[derive(Debug, Clone)]
pub struct Script {
    pub name: String,
    pub options: Vec<String>,
    /// Never answer `uci`.
    pub stall_handshake: bool,
    /// Exit as soon as `uci` arrives.
    pub close_on_uci: bool,
    /// Line printed after every `setoption`.
    pub option_reply: Option<String>,
    /// Answers to successive `go` commands; the last one repeats.
    pub searches: Vec<Search>,
}

impl Script {
    pub fn new(searches: Vec<Search>) -> Self {
        Self {
            name: "Fakefish 1.0".to_string(),
            options: Vec::new(),
            stall_handshake: false,
            close_on_uci: false,
            option_reply: None,
            searches,
        }
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn with_option_reply(mut self, line: &str) -> Self {
        self.option_reply = Some(line.to_string());
        self
    }
}

#[derive(Debug, Default)]
pub struct Counters {
    launches: AtomicUsize,
    releases: AtomicUsize,
    searches: AtomicUsize,
    commands: Mutex<Vec<String>>,
}

impl Counters {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn received(&self, command: &str) -> bool {
        self.commands().iter().any(|c| c == command)
    }
}

pub struct FakeLauncher {
    script: Script,
    counters: Arc<Counters>,
    fail: bool,
}

impl FakeLauncher {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            counters: Arc::new(Counters::default()),
            fail: false,
        }
    }

    /// A launcher whose executable cannot be started.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Script::new(Vec::new()))
        }
    }

    pub fn counters(&self) -> Arc<Counters> {
        Arc::clone(&self.counters)
    }
}

impl EngineLauncher for FakeLauncher {
    async fn launch(&self) -> io::Result<EngineIo> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such engine"));
        }
        self.counters.launches.fetch_add(1, Ordering::SeqCst);

        let (ours, theirs) = tokio::io::duplex(64 * 1024);
        let (read, write) = tokio::io::split(ours);
        let task = tokio::spawn(run_engine(
            self.script.clone(),
            theirs,
            Arc::clone(&self.counters),
        ));

        Ok(EngineIo {
            reader: Box::new(BufReader::new(read)),
            writer: Box::new(write),
            process: Box::new(FakeProcess {
                task,
                counters: Arc::clone(&self.counters),
            }),
        })
    }
}

struct FakeProcess {
    task: JoinHandle<()>,
    counters: Arc<Counters>,
}

impl ProcessHandle for FakeProcess {
    fn shutdown(&mut self, grace: Duration) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            if tokio::time::timeout(grace, &mut self.task).await.is_err() {
                self.task.abort();
            }
        })
    }

    fn kill(&mut self) {
        self.task.abort();
    }
}

impl Drop for FakeProcess {
    fn drop(&mut self) {
        self.task.abort();
        self.counters.releases.fetch_add(1, Ordering::SeqCst);
    }
}

async fn run_engine(script: Script, io: DuplexStream, counters: Arc<Counters>) {
    let (read, mut write) = tokio::io::split(io);
    let mut lines = BufReader::new(read).lines();
    let mut searches: VecDeque<Search> = script.searches.iter().cloned().collect();

    while let Ok(Some(line)) = lines.next_line().await {
        counters.commands.lock().unwrap().push(line.clone());

        let replies: Vec<String> = match GuiCommand::parse(&line) {
            Ok(GuiCommand::Uci) => {
                if script.close_on_uci {
                    return;
                }
                if script.stall_handshake {
                    std::future::pending::<()>().await;
                }
                let mut out = vec![format!("id name {}", script.name)];
                out.extend(script.options.iter().cloned());
                out.push("uciok".to_string());
                out
            }
            Ok(GuiCommand::IsReady) => vec!["readyok".to_string()],
            Ok(GuiCommand::SetOption { .. }) => script.option_reply.iter().cloned().collect(),
            Ok(GuiCommand::Go(_)) => {
                counters.searches.fetch_add(1, Ordering::SeqCst);
                let next = if searches.len() > 1 {
                    searches.pop_front()
                } else {
                    searches.front().cloned()
                };
                match next {
                    Some(Search::Reply(lines)) => lines,
                    Some(Search::Stall) => std::future::pending::<Vec<String>>().await,
                    Some(Search::Crash) => return,
                    None => vec!["bestmove (none)".to_string()],
                }
            }
            Ok(GuiCommand::Quit) => return,
            _ => Vec::new(),
        };

        for reply in replies {
            if write.write_all(format!("{}\n", reply).as_bytes()).await.is_err() {
                return;
            }
        }
    }
}

/// Short timeouts so failure tests finish quickly.
pub fn test_config() -> EngineConfig {
    EngineConfig {
        startup_timeout: Duration::from_millis(500),
        search_timeout: Duration::from_secs(2),
        quit_grace: Duration::from_millis(200),
        ..EngineConfig::new("fakefish")
    }
}
