use askmed_cli::commands::{handle_command, CommandResult};

// ========================================================================
// Command Parsing Tests (commands.rs)
// ========================================================================

// --- BASIC SLASH COMMANDS ---

#[test]
fn test_help_command() {
    let result = handle_command("/help");
    if let CommandResult::Message(msg) = result {
        assert!(msg.contains("askmed Commands"));
        assert!(msg.contains("/follow"));
        assert!(msg.contains("/recall"));
    } else {
        panic!("expected help text, got {result:?}");
    }
}

#[test]
fn test_help_command_short_alias() {
    assert_eq!(handle_command("/h"), handle_command("/help"));
}

#[test]
fn test_quit_aliases() {
    for input in ["/exit", "/quit", "/q"] {
        assert_eq!(handle_command(input), CommandResult::Quit, "{input}");
    }
}

#[test]
fn test_clear_aliases() {
    assert_eq!(handle_command("/clear"), CommandResult::Clear);
    assert_eq!(handle_command("/new"), CommandResult::Clear);
}

// --- NUMBERED COMMANDS ---

#[test]
fn test_follow_with_index() {
    assert_eq!(handle_command("/follow 2"), CommandResult::FollowUp(2));
    assert_eq!(handle_command("/f 1"), CommandResult::FollowUp(1));
}

#[test]
fn test_follow_rejects_bad_index() {
    for input in ["/follow", "/follow zero", "/follow 0", "/f -1"] {
        assert!(
            matches!(handle_command(input), CommandResult::Message(ref m) if m.contains("Usage")),
            "{input}"
        );
    }
}

#[test]
fn test_recall_with_index() {
    assert_eq!(handle_command("/recall 3"), CommandResult::Recall(3));
    assert_eq!(handle_command("/r 10"), CommandResult::Recall(10));
}

#[test]
fn test_recall_without_index() {
    assert!(matches!(handle_command("/recall"), CommandResult::Message(_)));
}

// --- ASKING ---

#[test]
fn test_plain_text_is_a_question() {
    assert_eq!(
        handle_command("What is the first-line therapy for hypertension?"),
        CommandResult::NotACommand
    );
}

#[test]
fn test_direct_keeps_whole_question() {
    assert_eq!(
        handle_command("/direct  What are SGLT2 inhibitors? "),
        CommandResult::Direct("What are SGLT2 inhibitors?".to_string())
    );
}

#[test]
fn test_direct_without_question() {
    assert!(matches!(handle_command("/direct"), CommandResult::Message(_)));
}

// --- HISTORY AND SERVICE ---

#[test]
fn test_history_commands() {
    assert_eq!(handle_command("/history"), CommandResult::ShowHistory);
    assert_eq!(handle_command("/clear-history"), CommandResult::ClearHistory);
}

#[test]
fn test_service_commands() {
    assert_eq!(handle_command("/health"), CommandResult::Health);
    assert_eq!(handle_command("/server-history"), CommandResult::ServerHistory);
    assert_eq!(
        handle_command("/server-clear-history"),
        CommandResult::ClearServerHistory
    );
}

#[test]
fn test_theme_command() {
    assert_eq!(handle_command("/theme"), CommandResult::ToggleTheme);
}

#[test]
fn test_version_command() {
    match handle_command("/version") {
        CommandResult::Message(msg) => assert!(msg.starts_with("askmed v")),
        other => panic!("expected version, got {other:?}"),
    }
}

#[test]
fn test_unknown_command() {
    match handle_command("/frobnicate") {
        CommandResult::Message(msg) => assert!(msg.contains("Unknown command: /frobnicate")),
        other => panic!("expected unknown-command message, got {other:?}"),
    }
}

#[test]
fn test_surrounding_whitespace_ignored() {
    assert_eq!(handle_command("  /history  "), CommandResult::ShowHistory);
}
