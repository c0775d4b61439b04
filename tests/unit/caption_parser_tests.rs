/*!
 * Tests for caption parsing and dialogue segmentation
 */

use subdialog::app_config::ExtractionOptions;
use subdialog::caption_parser::{self, CaptionParser, Timestamp, time_gap};

/// Build SRT text from (start, end, caption text) blocks
fn srt(blocks: &[(&str, &str, &str)]) -> String {
    let mut text = String::new();
    for (i, (start, end, caption)) in blocks.iter().enumerate() {
        text.push_str(&format!("{}\n{} --> {}\n{}\n\n", i + 1, start, end, caption));
    }
    text
}

#[test]
fn test_parse_withGapAtThreshold_shouldKeepBlocksTogether() {
    let text = srt(&[
        ("00:00:01,000", "00:00:02,000", "First line."),
        ("00:00:03,000", "00:00:04,000", "Second line."),
        ("00:00:09,000", "00:00:10,000", "Closing."),
    ]);

    assert_eq!(caption_parser::parse(&text), vec!["First line.\nSecond line.".to_string()]);
}

#[test]
fn test_parse_withGapAboveThreshold_shouldCloseSegment() {
    let text = srt(&[
        ("00:00:01,000", "00:00:02,000", "Hi.\nHello."),
        ("00:00:03,001", "00:00:04,000", "How are you?\nFine."),
        ("00:00:09,000", "00:00:10,000", "Closing."),
    ]);

    assert_eq!(
        caption_parser::parse(&text),
        vec!["Hi.\nHello.".to_string(), "How are you?\nFine.".to_string()]
    );
}

#[test]
fn test_parse_withWrappedSingleSentence_shouldDropIt() {
    let text = "00:00:01,000 --> 00:00:02,000\nHello\n00:00:02,500 --> 00:00:03,000\nworld\nhow\n00:00:10,000 --> 00:00:11,000\n";

    assert!(caption_parser::parse(text).is_empty());
}

#[test]
fn test_parse_withoutFinalGap_shouldNotFlushTrailingText() {
    let text = srt(&[("00:00:05,000", "00:00:06,000", "- Are you there?\n- Yes.")]);

    assert!(caption_parser::parse(&text).is_empty());
}

#[test]
fn test_parse_withFlushTrailing_shouldKeepTrailingText() {
    let text = srt(&[("00:00:05,000", "00:00:06,000", "- Are you there?\n- Yes.")]);
    let options = ExtractionOptions {
        flush_trailing: true,
        ..ExtractionOptions::default()
    };

    assert_eq!(
        CaptionParser::from_options(&options).parse(&text),
        vec!["Are you there?\nYes.".to_string()]
    );
}

#[test]
fn test_parse_withConsecutiveTimestamps_shouldNotEmitEmptySegments() {
    let text = "00:00:05,000 --> 00:00:06,000\n00:00:10,000 --> 00:00:11,000\n00:00:20,000 --> 00:00:21,000\nA.\nB.\n00:00:30,000 --> 00:00:31,000\n";

    assert_eq!(caption_parser::parse(text), vec!["A.\nB.".to_string()]);
}

#[test]
fn test_parse_withMalformedTimestampLine_shouldSkipLine() {
    // The middle header has no arrow: neither text nor a boundary
    let text = "00:00:01,000 --> 00:00:02,000\nOne.\n00:00:30,000 00:00:31,000\nTwo.\n00:00:02,500 --> 00:00:03,000\nThree.\n00:00:09,000 --> 00:00:10,000\n";

    assert_eq!(caption_parser::parse(text), vec!["One.\nTwo.\nThree.".to_string()]);
}

#[test]
fn test_parse_withUnparseableStart_shouldKeepSegmentOpen() {
    let text = "00:00:01,000 --> 00:00:02,000\nOne.\nTwo.\n00:00:61,000 --> 00:00:02,100\nThree.\nFour.\n00:00:02,200 --> 00:00:02,300\nFive.\n00:00:09,000 --> 00:00:10,000\n";

    assert_eq!(
        caption_parser::parse(text),
        vec!["One.\nTwo.\nThree.\nFour.\nFive.".to_string()]
    );
}

#[test]
fn test_parse_withOutOfDayTimestamps_shouldTreatGapAsThreshold() {
    // 25:00:00 cannot be read; the gap counts as exactly one threshold
    let text = srt(&[
        ("00:00:01,000", "00:00:02,000", "Who is it?"),
        ("25:00:00,000", "00:00:03,000", "Me."),
        ("00:00:20,000", "00:00:21,000", "Closing."),
    ]);

    assert_eq!(caption_parser::parse(&text), vec!["Who is it?\nMe.".to_string()]);
}

#[test]
fn test_parse_withRejectedSegment_shouldStillTrackEndTime() {
    // The lone caption is rejected at 00:00:10; its block's end time is still
    // the reference for the next gap
    let text = "00:00:01,000 --> 00:00:02,000\nAlone\n00:00:10,000 --> 00:00:20,000\nA.\nB.\n00:00:20,500 --> 00:00:21,000\nC.\n00:00:30,000 --> 00:00:31,000\n";

    assert_eq!(caption_parser::parse(text), vec!["A.\nB.\nC.".to_string()]);
}

#[test]
fn test_parse_withOverlappingBlocks_shouldKeepThemTogether() {
    let text = srt(&[
        ("00:00:01,000", "00:00:05,000", "Overlap?"),
        ("00:00:04,000", "00:00:06,000", "Yes."),
        ("00:00:09,000", "00:00:10,000", "Closing."),
    ]);

    assert_eq!(caption_parser::parse(&text), vec!["Overlap?\nYes.".to_string()]);
}

#[test]
fn test_parse_withCustomThreshold_shouldUseIt() {
    let text = srt(&[
        ("00:00:01,000", "00:00:02,000", "A.\nB."),
        ("00:00:04,000", "00:00:05,000", "C.\nD."),
        ("00:00:20,000", "00:00:21,000", "End."),
    ]);
    let options = ExtractionOptions {
        gap_threshold_ms: 3_000,
        ..ExtractionOptions::default()
    };

    assert_eq!(
        CaptionParser::from_options(&options).parse(&text),
        vec!["A.\nB.\nC.\nD.".to_string()]
    );
    assert_eq!(caption_parser::parse(&text).len(), 2);
}

#[test]
fn test_parse_withSingleLineMinimum_shouldKeepShortDialogue() {
    let text = srt(&[
        ("00:00:01,000", "00:00:02,000", "Hello!"),
        ("00:00:09,000", "00:00:10,000", "Bye."),
    ]);
    let options = ExtractionOptions {
        min_dialogue_lines: 1,
        ..ExtractionOptions::default()
    };

    assert_eq!(CaptionParser::from_options(&options).parse(&text), vec!["Hello!".to_string()]);
}

#[test]
fn test_time_gap_withOrderedTimestamps_shouldMeasureSilence() {
    let end = Timestamp::parse("00:00:02,000");
    let start = Timestamp::parse("00:00:03,250");

    assert_eq!(time_gap(end, start).unwrap().num_milliseconds(), 1_250);
    assert_eq!(time_gap(start, end).unwrap().num_milliseconds(), -1_250);
}
