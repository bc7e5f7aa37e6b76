/// Result of processing one line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Plain text: ask it as a question.
    NotACommand,
    /// Ask the numbered follow-up of the current answer (1-based).
    FollowUp(usize),
    /// Ask a history entry again (1-based).
    Recall(usize),
    /// List local history.
    ShowHistory,
    /// Drop the current answer.
    Clear,
    /// Empty local history.
    ClearHistory,
    /// Ask without streaming.
    Direct(String),
    /// Check the answer service.
    Health,
    /// Show the service's own question log.
    ServerHistory,
    /// Empty the service's question log.
    ClearServerHistory,
    /// Switch between dark and light output.
    ToggleTheme,
    /// Quit the application.
    Quit,
}

pub fn handle_command(input: &str) -> CommandResult {
    let input = input.trim();
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,
        "/clear" | "/new" => CommandResult::Clear,

        "/follow" | "/f" => match parse_index(arg) {
            Some(n) => CommandResult::FollowUp(n),
            None => CommandResult::Message("Usage: /follow <number>".into()),
        },
        "/direct" => {
            if arg.is_empty() {
                CommandResult::Message("Usage: /direct <question>".into())
            } else {
                CommandResult::Direct(arg.to_string())
            }
        }

        "/history" => CommandResult::ShowHistory,
        "/recall" | "/r" => match parse_index(arg) {
            Some(n) => CommandResult::Recall(n),
            None => CommandResult::Message("Usage: /recall <number>".into()),
        },
        "/clear-history" => CommandResult::ClearHistory,

        "/health" => CommandResult::Health,
        "/server-history" => CommandResult::ServerHistory,
        "/server-clear-history" => CommandResult::ClearServerHistory,

        "/theme" => CommandResult::ToggleTheme,
        "/version" => CommandResult::Message(format!("askmed v{}", env!("CARGO_PKG_VERSION"))),

        _ => {
            if input.starts_with('/') {
                CommandResult::Message(format!("Unknown command: {cmd}. Type /help for commands."))
            } else {
                CommandResult::NotACommand
            }
        }
    }
}

/// Positive 1-based index.
fn parse_index(arg: &str) -> Option<usize> {
    arg.parse::<usize>().ok().filter(|n| *n > 0)
}

fn show_help() -> CommandResult {
    let help_text = "\
╭─ askmed Commands ──────────────────────────────────────────────╮

  ASKING
    <question>                Ask a question (streamed)
    /direct <question>        Ask without streaming
    /follow <n>, /f <n>       Ask follow-up question n
    /clear, /new              Drop the current answer

  HISTORY
    /history                  List recent questions
    /recall <n>, /r <n>       Ask history entry n again
    /clear-history            Empty local history

  SERVICE
    /health                   Check the answer service
    /server-history           Show the service's question log
    /server-clear-history     Empty the service's question log

  OTHER
    /theme                    Toggle dark/light output
    /help, /h                 Show this help message
    /version                  Show version information
    /exit, /quit, /q          Quit the application

╰────────────────────────────────────────────────────────────────╯";

    CommandResult::Message(help_text.into())
}
