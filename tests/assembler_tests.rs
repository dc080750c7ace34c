// Tests for ordered transcript assembly from out-of-order completions

use ambient_scribe::transcribe::TranscriptionOutcome;
use ambient_scribe::transcript::TranscriptAssembler;

fn text(s: &str) -> TranscriptionOutcome {
    TranscriptionOutcome::Text(s.to_string())
}

fn ignorable() -> TranscriptionOutcome {
    TranscriptionOutcome::Ignorable {
        reason: "audio too short".to_string(),
    }
}

fn fatal() -> TranscriptionOutcome {
    TranscriptionOutcome::Fatal {
        reason: "internal error".to_string(),
        status: Some(500),
    }
}

#[test]
fn test_out_of_order_appends_yield_sequence_order() {
    // The documented three-chunk example: chunk 1 completes first,
    // chunk 0 second, chunk 2 last as ignorable noise
    let mut assembler = TranscriptAssembler::new();
    assembler.append(1, text("vitals stable"));
    assembler.append(0, text("patient reports pain"));
    assembler.append(2, ignorable());

    assert_eq!(assembler.final_text(), "patient reports pain vitals stable");
}

#[test]
fn test_completion_order_never_affects_final_text() {
    let outcomes = [
        (0u64, "alpha"),
        (1, "bravo"),
        (2, "charlie"),
        (3, "delta"),
    ];

    // Every rotation plus a couple of shuffles of the append order
    let orders: Vec<Vec<usize>> = vec![
        vec![0, 1, 2, 3],
        vec![1, 2, 3, 0],
        vec![2, 3, 0, 1],
        vec![3, 0, 1, 2],
        vec![3, 1, 0, 2],
        vec![2, 0, 3, 1],
    ];

    for order in orders {
        let mut assembler = TranscriptAssembler::new();
        for &i in &order {
            let (seq, t) = outcomes[i];
            assembler.append(seq, text(t));
        }
        assert_eq!(
            assembler.final_text(),
            "alpha bravo charlie delta",
            "append order {:?} changed the result",
            order
        );
    }
}

#[test]
fn test_empty_and_ignorable_occupy_slots_without_text() {
    let mut assembler = TranscriptAssembler::new();
    assembler.append(0, text("start"));
    assembler.append(1, TranscriptionOutcome::Empty);
    assembler.append(2, ignorable());
    assembler.append(3, text("end"));

    assert_eq!(assembler.len(), 4, "empty slots should still be recorded");
    assert_eq!(assembler.final_text(), "start end");
}

#[test]
fn test_fatal_outcomes_leave_a_skipped_gap() {
    let mut assembler = TranscriptAssembler::new();
    assembler.append(0, text("before"));
    assembler.append(1, fatal());
    assembler.append(2, text("after"));

    assert_eq!(assembler.len(), 2, "fatal outcomes insert no fragment");
    assert_eq!(assembler.final_text(), "before after");
}

#[test]
fn test_duplicate_sequence_keeps_first_fragment() {
    let mut assembler = TranscriptAssembler::new();
    assembler.append(0, text("first"));
    assembler.append(0, text("second"));

    assert_eq!(assembler.final_text(), "first");
}

#[test]
fn test_final_text_is_trimmed() {
    let mut assembler = TranscriptAssembler::new();
    assembler.append(0, text("  padded  "));
    assembler.append(1, text(" words "));

    assert_eq!(assembler.final_text(), "padded words");
}

#[test]
fn test_live_text_reflects_partial_state() {
    let mut assembler = TranscriptAssembler::new();
    assert_eq!(assembler.live_text(), "");
    assert!(assembler.is_empty());

    assembler.append(2, text("later"));
    assert_eq!(assembler.live_text(), "later");

    assembler.append(0, text("earlier"));
    assert_eq!(assembler.live_text(), "earlier later");
}

#[test]
fn test_all_empty_fragments_finalize_to_blank() {
    let mut assembler = TranscriptAssembler::new();
    assembler.append(0, TranscriptionOutcome::Empty);
    assembler.append(1, ignorable());

    assert_eq!(assembler.final_text(), "");
}

#[test]
fn test_fragments_are_sequence_sorted() {
    let mut assembler = TranscriptAssembler::new();
    assembler.append(5, text("five"));
    assembler.append(1, text("one"));
    assembler.append(3, text("three"));

    let fragments = assembler.fragments();
    let sequences: Vec<u64> = fragments.iter().map(|f| f.sequence).collect();
    assert_eq!(sequences, vec![1, 3, 5]);
}
