use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"\n([A-Z][A-Za-z \t]+):").unwrap();
    static ref STATISTIC: Regex =
        Regex::new(r"(\b\d+(?:\.\d+)?%|\b\d+\.\d+\b|\bp\s*[<>=]\s*\d+(?:\.\d+)?)").unwrap();
    static ref ACRONYM: Regex = Regex::new(r"\b[A-Z]{2,}(?:-[A-Z]+)*\b").unwrap();
    static ref GUIDELINE: Regex =
        Regex::new(r"\b((?:[A-Z][a-z]*/)*[A-Z][a-z]*\sGuidelines?)\b").unwrap();
    static ref BULLET_ITEM: Regex = Regex::new(r"(?m)^[ \t]*[-*•][ \t]+").unwrap();
    static ref NUMBERED_ITEM: Regex = Regex::new(r"(?m)^[ \t]*(\d+)\.[ \t]+").unwrap();
}

/// Apply display-only markdown annotations to an answer body.
///
/// Rules run in a fixed order: headings, statistics, acronyms, guideline
/// names, list markers. Output is a pure function of the input.
pub fn enhance(body: &str) -> String {
    let text = promote_headings(body);
    let text = bold_statistics(&text);
    let text = bold_acronyms(&text);
    let text = emphasize_guidelines(&text);
    normalize_list_markers(&text)
}

fn promote_headings(text: &str) -> String {
    HEADING.replace_all(text, "\n### ${1}:").into_owned()
}

fn bold_statistics(text: &str) -> String {
    STATISTIC.replace_all(text, "**${1}**").into_owned()
}

/// Acronyms directly before a closing `]` are link or citation text and stay plain.
/// A hyphenated one backs off to the part before its last hyphen.
fn bold_acronyms(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in ACRONYM.find_iter(text) {
        let mut end = m.end();
        if text[end..].trim_start().starts_with(']') {
            match m.as_str().rfind('-') {
                Some(cut) => end = m.start() + cut,
                None => continue,
            }
        }
        out.push_str(&text[last..m.start()]);
        out.push_str("**");
        out.push_str(&text[m.start()..end]);
        out.push_str("**");
        last = end;
    }
    out.push_str(&text[last..]);
    out
}

fn emphasize_guidelines(text: &str) -> String {
    GUIDELINE.replace_all(text, "***${1}***").into_owned()
}

fn normalize_list_markers(text: &str) -> String {
    let text = BULLET_ITEM.replace_all(text, "- ");
    NUMBERED_ITEM.replace_all(&text, "${1}. ").into_owned()
}
