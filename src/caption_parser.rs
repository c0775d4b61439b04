/*!
 * Caption parsing and dialogue segmentation.
 *
 * Scans raw SRT-style subtitle text, locates the timestamp line of every
 * caption block and groups the caption text into dialogue segments. Two
 * consecutive blocks belong to the same segment while the silence between the
 * end of one and the start of the next stays within the gap threshold.
 */

use chrono::Duration;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::ExtractionOptions;
use crate::segment_cleaner;

// @const: Anything that looks like a clock reading marks a timestamp line
static TIME_LINE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+:\d+:\d+").unwrap());

// @const: Start/end pair of a caption block
static TIME_RANGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+:\d+:\d+,\d+) +--> +(\d+:\d+:\d+,\d+)").unwrap()
});

// @const: Caption index line
static INDEX_LINE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

// @const: Single HH:MM:SS,fff reading
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{1,2}):(\d{1,2}),(\d{1,6})$").unwrap()
});

/// Time of day of a caption boundary, measured from midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    offset: Duration,
}

impl Timestamp {
    /// `00:00:00,000`, the reference point before the first caption block
    pub fn midnight() -> Self {
        Timestamp { offset: Duration::zero() }
    }

    /// Parse an `HH:MM:SS,fff` reading.
    ///
    /// The fraction holds one to six digits and is read as a decimal fraction
    /// of a second, so `,5` is half a second. Readings outside a single day
    /// (hours above 23, minutes or seconds above 59) are rejected.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = TIMESTAMP_REGEX.captures(text.trim())?;

        let hours: i64 = caps[1].parse().ok()?;
        let minutes: i64 = caps[2].parse().ok()?;
        let seconds: i64 = caps[3].parse().ok()?;
        if hours > 23 || minutes > 59 || seconds > 59 {
            return None;
        }

        let micros: i64 = format!("{:0<6}", &caps[4]).parse().ok()?;

        Some(Timestamp {
            offset: Duration::hours(hours)
                + Duration::minutes(minutes)
                + Duration::seconds(seconds)
                + Duration::microseconds(micros),
        })
    }

    /// Milliseconds elapsed since midnight
    pub fn as_millis(&self) -> i64 {
        self.offset.num_milliseconds()
    }
}

/// Whether the line carries a clock reading and should be read as a block header
pub fn is_timestamp_line(line: &str) -> bool {
    TIME_LINE_REGEX.is_match(line)
}

/// Whether the line is a bare caption index
pub fn is_index_line(line: &str) -> bool {
    INDEX_LINE_REGEX.is_match(line)
}

/// Extract the raw `start --> end` readings from a timestamp line
pub fn extract_time_range(line: &str) -> Option<(&str, &str)> {
    let caps = TIME_RANGE_REGEX.captures(line)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Silence between the end of the previous block and the start of the next.
///
/// Returns `None` when either reading could not be parsed. The result is
/// negative when blocks overlap.
pub fn time_gap(previous_end: Option<Timestamp>, start: Option<Timestamp>) -> Option<Duration> {
    Some(start?.offset - previous_end?.offset)
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Groups caption blocks into cleaned dialogue segments
#[derive(Debug, Clone)]
pub struct CaptionParser {
    gap_threshold: Duration,
    min_dialogue_lines: usize,
    flush_trailing: bool,
}

impl Default for CaptionParser {
    fn default() -> Self {
        Self::from_options(&ExtractionOptions::default())
    }
}

impl CaptionParser {
    /// Create a parser from the extraction settings
    pub fn from_options(options: &ExtractionOptions) -> Self {
        CaptionParser {
            gap_threshold: Duration::milliseconds(options.gap_threshold_ms as i64),
            min_dialogue_lines: options.min_dialogue_lines,
            flush_trailing: options.flush_trailing,
        }
    }

    /// An unknown gap counts as exactly the threshold, so it never closes the running segment
    fn is_boundary(&self, gap: Option<Duration>) -> bool {
        gap.unwrap_or(self.gap_threshold) > self.gap_threshold
    }

    /// Clean the buffered text and keep it if it reads as an exchange
    fn close_segment(&self, buffer: &str, segments: &mut Vec<String>, index: usize) {
        let cleaned = segment_cleaner::clean(buffer);
        if !segment_cleaner::is_dialogue(&cleaned, self.min_dialogue_lines) {
            debug!("Discarding segment {}, not a dialogue: {:?}", index, cleaned);
            return;
        }

        debug!("--- BEGIN segment {} ---\n{}\n--- END segment {} ---", index, cleaned, index);
        segments.push(cleaned);
    }

    /// Split raw subtitle text into cleaned dialogue segments, in source order
    pub fn parse(&self, raw_text: &str) -> Vec<String> {
        let mut segments = Vec::new();
        let mut buffer = String::new();
        let mut last_end = Some(Timestamp::midnight());
        let mut boundaries = 0usize;

        for line in raw_text.split(is_line_break) {
            if is_timestamp_line(line) {
                let Some((start, end)) = extract_time_range(line) else {
                    debug!("Skipping malformed timestamp line: {:?}", line);
                    continue;
                };

                let gap = time_gap(last_end, Timestamp::parse(start));
                if self.is_boundary(gap) {
                    if !buffer.is_empty() {
                        self.close_segment(&buffer, &mut segments, boundaries);
                    }
                    buffer.clear();
                    boundaries += 1;
                }

                last_end = Timestamp::parse(end);
                continue;
            }

            if line.is_empty() || is_index_line(line) {
                continue;
            }

            buffer.push_str(line);
            buffer.push('\n');
        }

        if self.flush_trailing && !buffer.is_empty() {
            self.close_segment(&buffer, &mut segments, boundaries);
        }

        debug!("Num segments: {} ({} kept)", boundaries, segments.len());
        segments
    }
}

/// Parse raw subtitle text with the default extraction settings
pub fn parse(raw_text: &str) -> Vec<String> {
    CaptionParser::default().parse(raw_text)
}
