/*!
 * Dialogue segment cleaning.
 *
 * Turns the raw caption text of one dialogue segment into a clean block of
 * sentences: markup removed, caption line wraps repaired, dialogue dashes
 * turned into line breaks and every line closed by terminal punctuation.
 */

use once_cell::sync::Lazy;
use regex::Regex;

// @const: Sentence-ending punctuation
const TERMINAL_PUNCTUATION: [char; 3] = ['.', '!', '?'];

static MARKUP_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").unwrap());

static LINE_BREAK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\n\r]+").unwrap());

// @const: Sentence suspended with "..." and resumed on the next caption line
static ELLIPSIS_CONTINUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\.\.[\n\r]+\.\.\.").unwrap());

static SPACED_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+,[ \t]+").unwrap());

static HORIZONTAL_SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

// @const: Dialogue dash opening a speaker turn, possibly repeated
static TURN_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:\s*-+\s*)+").unwrap());

fn ends_sentence(text: &str) -> bool {
    text.ends_with(TERMINAL_PUNCTUATION)
}

/// Append a period unless the text is empty or already ends a sentence
fn terminate_sentence(text: &mut String) {
    if !text.is_empty() && !ends_sentence(text) {
        text.push('.');
    }
}

/// Join caption lines that wrap a single sentence.
///
/// A line is folded into the previous one unless it starts with a space,
/// opens a dialogue turn, or the previous line already ends a sentence.
/// Lines kept apart get their predecessor closed with a period.
fn rewrap_lines(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut previous_raw: Option<&str> = None;

    for line in text.split('\n').filter(|line| !line.is_empty()) {
        let continues_previous = match previous_raw {
            Some(previous) => {
                !line.starts_with(' ') && !line.starts_with('-') && !ends_sentence(previous)
            }
            None => false,
        };

        match lines.last_mut() {
            Some(last) if continues_previous => {
                last.push(' ');
                last.push_str(line.trim());
                *last = last.trim().to_string();
            }
            Some(last) => {
                terminate_sentence(last);
                lines.push(line.trim().to_string());
            }
            None => lines.push(line.trim().to_string()),
        }

        previous_raw = Some(line);
    }

    lines.join("\n")
}

/// Collapse `word , word` into `word, word` until no spaced comma is left
fn tighten_commas(text: &str) -> String {
    let mut text = text.to_string();
    while SPACED_COMMA.is_match(&text) {
        text = SPACED_COMMA.replace_all(&text, ", ").into_owned();
    }
    text
}

/// Shorten every run of three or more dots down to a single period
fn shorten_ellipses(text: &str) -> String {
    let mut text = text.to_string();
    while text.contains("...") {
        text = text.replace("...", ".");
    }
    text
}

/// Strip dialogue dashes from the start of every line
fn strip_turn_markers(text: &str) -> String {
    text.split('\n')
        .map(|line| TURN_MARKER.replace(line, ""))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Clean the raw caption text of one dialogue segment.
///
/// The steps run in a fixed order, each relying on the previous ones:
/// markup removal, line break collapsing, ellipsis continuation merging,
/// ellipsis shortening, line re-wrapping, comma and whitespace tightening,
/// dialogue dash removal and final punctuation.
pub fn clean(raw_segment: &str) -> String {
    let text = MARKUP_TAGS.replace_all(raw_segment, "");
    let text = LINE_BREAK_RUNS.replace_all(&text, "\n");
    let text = ELLIPSIS_CONTINUATION.replace_all(&text, " ");
    let text = shorten_ellipses(&text);
    let text = rewrap_lines(&text);
    let text = tighten_commas(&text);
    let text = HORIZONTAL_SPACE_RUNS.replace_all(&text, " ");
    let mut text = strip_turn_markers(&text);
    terminate_sentence(&mut text);
    text
}

/// Whether a cleaned segment spans enough lines to count as an exchange
pub fn is_dialogue(cleaned: &str, min_lines: usize) -> bool {
    !cleaned.is_empty() && cleaned.matches('\n').count() + 1 >= min_lines
}

/// Whether a segment is a translator or credits notice
pub fn is_trailing_notice(segment: &str, markers: &[String]) -> bool {
    let lowered = segment.to_lowercase();
    markers
        .iter()
        .any(|marker| lowered.contains(&marker.to_lowercase()))
}

/// Drop the final segment when it is a credits notice; earlier segments are never touched
pub fn filter_trailing_notice(mut segments: Vec<String>, markers: &[String]) -> Vec<String> {
    if segments
        .last()
        .is_some_and(|last| is_trailing_notice(last, markers))
    {
        segments.pop();
    }
    segments
}
