use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use anyhow::Result;
use askmed_core::{
    AskClient, HistoryEntry, HistoryStore, QuerySession, SessionHandle, SessionPhase,
    SessionSnapshot, SessionUpdate, Settings,
};
use crossterm::{
    cursor::MoveToColumn,
    execute,
    style::Print,
    terminal::{Clear, ClearType},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, Mutex};

use askmed_cli::commands::{handle_command, CommandResult};
use askmed_cli::render;
use askmed_cli::theme::Theme;

/// What the input loop needs to resolve numbered commands.
struct ViewState {
    follow_ups: Vec<String>,
    history: Vec<HistoryEntry>,
    theme: Theme,
}

/// Draws progress on stderr while a query is in flight and the final answer on stdout.
struct UpdatePrinter {
    progress_shown: bool,
}

impl UpdatePrinter {
    fn new() -> Self {
        Self {
            progress_shown: false,
        }
    }

    fn show(&mut self, snapshot: &SessionSnapshot, theme: &Theme) -> io::Result<()> {
        let progress = match snapshot.phase {
            SessionPhase::Connecting => Some("Connecting...".to_string()),
            SessionPhase::Streaming => Some(format!(
                "Receiving answer... {} chars",
                snapshot.answer().map(str::len).unwrap_or(0)
            )),
            SessionPhase::FallingBack => Some("Waiting for answer...".to_string()),
            _ => None,
        };

        match progress {
            Some(text) => {
                if io::stderr().is_terminal() {
                    execute!(
                        io::stderr(),
                        MoveToColumn(0),
                        Clear(ClearType::CurrentLine),
                        Print(text)
                    )?;
                    self.progress_shown = true;
                }
            }
            None => {
                self.clear_progress()?;
                if snapshot.phase.is_terminal() {
                    let mut out = io::stdout();
                    writeln!(out, "{}", render::render_final(snapshot, theme))?;
                    out.flush()?;
                }
            }
        }
        Ok(())
    }

    fn clear_progress(&mut self) -> io::Result<()> {
        if self.progress_shown {
            execute!(io::stderr(), MoveToColumn(0), Clear(ClearType::CurrentLine))?;
            self.progress_shown = false;
        }
        Ok(())
    }
}

fn pick_theme(settings: &Settings) -> Theme {
    if io::stdout().is_terminal() {
        Theme::for_preference(settings.display.dark_mode)
    } else {
        Theme::plain()
    }
}

fn ask(handle: &SessionHandle, settings: &Settings, question: &str) -> Result<()> {
    if settings.server.streaming {
        handle.submit(question)?;
    } else {
        handle.ask_direct(question)?;
    }
    Ok(())
}

pub async fn run_single_prompt(settings: &Settings, client: AskClient, question: &str) -> Result<()> {
    if question.trim().is_empty() {
        anyhow::bail!("question is blank");
    }

    let client = Arc::new(client);
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let session = QuerySession::new(client.clone(), client, update_tx);
    let (handle, session_task) = session.spawn();

    ask(&handle, settings, question)?;

    let theme = pick_theme(settings);
    let mut printer = UpdatePrinter::new();
    let mut outcome = SessionPhase::Idle;
    while let Some(update) = update_rx.recv().await {
        if let SessionUpdate::Snapshot(snapshot) = update {
            printer.show(&snapshot, &theme)?;
            if snapshot.phase.is_terminal() {
                outcome = snapshot.phase;
                break;
            }
        }
    }

    drop(handle);
    let _ = session_task.await;

    if outcome == SessionPhase::Failed {
        anyhow::bail!("no answer could be retrieved");
    }
    Ok(())
}

pub async fn run_interactive(
    mut settings: Settings,
    client: AskClient,
    history: HistoryStore,
) -> Result<()> {
    let client = Arc::new(client);
    let view = Arc::new(Mutex::new(ViewState {
        follow_ups: Vec::new(),
        history: history.list(),
        theme: pick_theme(&settings),
    }));

    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let session = QuerySession::new(client.clone(), client.clone(), update_tx).with_history(history);
    let (handle, session_task) = session.spawn();
    let printer_task = tokio::spawn(print_updates(update_rx, view.clone()));

    println!("askmed {} - {}", env!("CARGO_PKG_VERSION"), client.base_url());
    println!("Type a question, or /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match handle_command(line) {
            CommandResult::NotACommand => ask(&handle, &settings, line)?,
            CommandResult::Message(msg) => println!("{msg}"),
            CommandResult::FollowUp(n) => {
                let question = view.lock().await.follow_ups.get(n - 1).cloned();
                match question {
                    Some(question) => handle.select_follow_up(question)?,
                    None => println!("No follow-up question #{n}."),
                }
            }
            CommandResult::Recall(n) => {
                if n <= view.lock().await.history.len() {
                    handle.select_history(n - 1)?;
                } else {
                    println!("No history entry #{n}.");
                }
            }
            CommandResult::ShowHistory => {
                let view = view.lock().await;
                println!("{}", render::render_history(&view.history, &view.theme));
            }
            CommandResult::Clear => handle.cancel()?,
            CommandResult::ClearHistory => {
                handle.clear_history()?;
                println!("History cleared.");
            }
            CommandResult::Direct(question) => handle.ask_direct(question)?,
            CommandResult::Health => match client.health().await {
                Ok(status) if status.is_ok() => println!("Service OK: {}", status.message),
                Ok(status) => println!("Service reports '{}': {}", status.status, status.message),
                Err(e) => println!("Service unreachable: {e}"),
            },
            CommandResult::ServerHistory => match client.server_history().await {
                Ok(items) if items.is_empty() => println!("The service has no recorded questions."),
                Ok(items) => {
                    for (i, item) in items.iter().enumerate() {
                        println!("  {:>2}. {}", i + 1, item.question);
                    }
                }
                Err(e) => println!("Could not fetch service history: {e}"),
            },
            CommandResult::ClearServerHistory => match client.clear_server_history().await {
                Ok(()) => println!("Service history cleared."),
                Err(e) => println!("Could not clear service history: {e}"),
            },
            CommandResult::ToggleTheme => {
                settings.display.dark_mode = !settings.display.dark_mode;
                let theme = pick_theme(&settings);
                println!("Theme: {}", theme.name);
                view.lock().await.theme = theme;
                if let Err(e) = settings.save() {
                    tracing::warn!("Failed to save settings: {}", e);
                }
            }
            CommandResult::Quit => break,
        }
    }

    drop(handle);
    let _ = session_task.await;
    let _ = printer_task.await;
    Ok(())
}

async fn print_updates(mut updates: mpsc::UnboundedReceiver<SessionUpdate>, view: Arc<Mutex<ViewState>>) {
    let mut printer = UpdatePrinter::new();
    while let Some(update) = updates.recv().await {
        let mut view = view.lock().await;
        match update {
            SessionUpdate::Snapshot(snapshot) => {
                view.follow_ups = snapshot.follow_ups.clone();
                if let Err(e) = printer.show(&snapshot, &view.theme) {
                    tracing::warn!("Failed to draw answer: {}", e);
                }
            }
            SessionUpdate::History(entries) => view.history = entries,
        }
    }
}
