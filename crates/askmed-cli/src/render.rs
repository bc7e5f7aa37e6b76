use askmed_core::{HistoryEntry, SessionPhase, SessionSnapshot};
use crossterm::style::{Color, Stylize};

use crate::theme::Theme;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Emphasis {
    Plain,
    Strong,
    StrongItalic,
}

/// Turn annotated answer text into terminal output.
///
/// Understands the markers the answer processor emits: `### ` headings,
/// `**strong**` and `***strong italic***`.
pub fn render_markdown(text: &str, theme: &Theme) -> String {
    text.lines()
        .map(|line| match line.strip_prefix("### ") {
            Some(heading) => paint(&strip_markers(heading), theme.heading, true, theme),
            None => render_spans(line, theme),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Final answer with its flags and numbered follow-ups.
pub fn render_final(snapshot: &SessionSnapshot, theme: &Theme) -> String {
    let Some(result) = snapshot.result.as_ref() else {
        return String::new();
    };

    let mut out = String::new();
    if result.error {
        out.push_str(&paint(&result.answer, theme.error, false, theme));
    } else {
        out.push_str(&render_markdown(&result.answer, theme));
    }

    if result.cached {
        out.push('\n');
        out.push_str(&paint("(cached answer)", theme.muted, false, theme));
    }
    if snapshot.phase == SessionPhase::Errored {
        out.push('\n');
        out.push_str(&paint(
            "(answer interrupted; not saved to history)",
            theme.muted,
            false,
            theme,
        ));
    }

    if !snapshot.follow_ups.is_empty() {
        out.push_str("\n\n");
        out.push_str(&paint("Follow-up questions:", theme.accent, true, theme));
        for (i, question) in snapshot.follow_ups.iter().enumerate() {
            out.push_str(&format!("\n  {}. {}", i + 1, question));
        }
    }
    out
}

pub fn render_history(entries: &[HistoryEntry], theme: &Theme) -> String {
    if entries.is_empty() {
        return paint("No questions yet.", theme.muted, false, theme);
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let when = entry
                .timestamp
                .with_timezone(&chrono::Local)
                .format("%b %d %H:%M")
                .to_string();
            format!(
                "  {:>2}. {}  {}",
                i + 1,
                entry.question,
                paint(&when, theme.muted, false, theme)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_spans(line: &str, theme: &Theme) -> String {
    let mut out = String::new();
    let mut current = String::new();
    let mut emphasis = Emphasis::Plain;
    let mut skip = 0;

    for (i, ch) in line.char_indices() {
        if skip > 0 {
            skip -= 1;
            continue;
        }
        let rest = &line[i..];
        if rest.starts_with("***") {
            flush(&mut out, &mut current, emphasis, theme);
            emphasis = toggle(emphasis, Emphasis::StrongItalic);
            skip = 2;
        } else if rest.starts_with("**") {
            flush(&mut out, &mut current, emphasis, theme);
            emphasis = toggle(emphasis, Emphasis::Strong);
            skip = 1;
        } else {
            current.push(ch);
        }
    }
    flush(&mut out, &mut current, emphasis, theme);
    out
}

fn toggle(current: Emphasis, target: Emphasis) -> Emphasis {
    if current == target {
        Emphasis::Plain
    } else {
        target
    }
}

fn flush(out: &mut String, current: &mut String, emphasis: Emphasis, theme: &Theme) {
    if current.is_empty() {
        return;
    }
    let text = std::mem::take(current);
    if !theme.color || emphasis == Emphasis::Plain {
        out.push_str(&text);
        return;
    }
    let styled = text.as_str().with(theme.emphasis).bold();
    if emphasis == Emphasis::StrongItalic {
        out.push_str(&styled.italic().to_string());
    } else {
        out.push_str(&styled.to_string());
    }
}

fn strip_markers(text: &str) -> String {
    text.replace("***", "").replace("**", "")
}

fn paint(text: &str, color: Color, bold: bool, theme: &Theme) -> String {
    if !theme.color {
        return text.to_string();
    }
    let styled = text.with(color);
    if bold {
        styled.bold().to_string()
    } else {
        styled.to_string()
    }
}
