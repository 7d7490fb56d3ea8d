//! Tests for reply classification, sentinel translation and boundary validation.

use strictly_connect_four::{
    Board, MoveRequest, MoveResult, Outcome, SearchBudget, SentinelTable, Side, classify_reply,
    decode,
};

const DUMP: &str = ".......\n.......\n.......\n.......\n.......\n...x...";

#[test]
fn test_sentinels_map_to_outcomes() {
    let table = SentinelTable::default();
    let cases = [
        ("X Win", Outcome::XWin),
        ("O Win", Outcome::OWin),
        ("Draw", Outcome::Draw),
        ("No choice", Outcome::NoLegalMove),
    ];
    for (literal, outcome) in cases {
        assert_eq!(
            classify_reply(literal, &table).expect("Known sentinel"),
            MoveResult::TerminalOutcome(outcome),
            "{}",
            literal
        );
    }
}

#[test]
fn test_board_dump_is_update() {
    let result = classify_reply(DUMP, &SentinelTable::default()).expect("Board dump");
    let expected = decode(&DUMP.replace('\n', ";")).expect("Valid board");
    assert_eq!(result, MoveResult::BoardUpdate(expected));
}

#[test]
fn test_surrounding_whitespace_ignored() {
    let table = SentinelTable::default();
    assert!(matches!(
        classify_reply(&format!("{}\n", DUMP), &table),
        Ok(MoveResult::BoardUpdate(_))
    ));
    assert!(matches!(
        classify_reply(&DUMP.replace('\n', "\r\n"), &table),
        Ok(MoveResult::BoardUpdate(_))
    ));
    assert_eq!(
        classify_reply("  Draw\n", &table).expect("Sentinel"),
        MoveResult::TerminalOutcome(Outcome::Draw)
    );
}

#[test]
fn test_unknown_replies_are_parse_errors() {
    let table = SentinelTable::default();
    for reply in [
        "",
        "x win",
        "Player X wins",
        "thread 'main' panicked",
        ".......\n.......\n.......",
        ".......;.......;.......;.......;.......;...x...",
        ".......\n.......\n.......\n.......\n.......\n...X...",
    ] {
        let err = classify_reply(reply, &table).unwrap_err();
        assert_eq!(err.reply, reply.trim());
    }
}

#[test]
fn test_impossible_board_is_parse_error() {
    let floating = ".......\n.......\n...x...\n.......\n.......\n.......";
    assert!(classify_reply(floating, &SentinelTable::default()).is_err());
}

#[test]
fn test_extra_sentinels_extend_table() {
    let table = SentinelTable::default().with("You Lose", Outcome::XWin);
    assert_eq!(table.len(), 5);
    assert_eq!(
        classify_reply("You Lose", &table).expect("Registered sentinel"),
        MoveResult::TerminalOutcome(Outcome::XWin)
    );
    assert!(classify_reply("You Lose", &SentinelTable::default()).is_err());
}

#[test]
fn test_from_wire_accepts_canonical_request() {
    let request = MoveRequest::from_wire(
        ".......;.......;.......;.......;.......;.......",
        "x",
        Some("7"),
    )
    .expect("Valid request");

    assert_eq!(*request.board(), Board::new());
    assert_eq!(*request.side(), Side::X);
    assert_eq!(request.budget().get(), 7);
}

#[test]
fn test_from_wire_defaults_budget() {
    let request = MoveRequest::from_wire(
        ".......;.......;.......;.......;.......;.......",
        "o",
        None,
    )
    .expect("Valid request");
    assert_eq!(request.budget().get(), 200);
}

#[test]
fn test_from_wire_or_uses_fallback_budget() {
    let empty = ".......;.......;.......;.......;.......;.......";
    let fallback = SearchBudget::new(5).expect("Valid budget");

    let request = MoveRequest::from_wire_or(empty, "x", None, fallback).expect("Valid request");
    assert_eq!(*request.budget(), fallback);

    let request =
        MoveRequest::from_wire_or(empty, "x", Some("9"), fallback).expect("Valid request");
    assert_eq!(request.budget().get(), 9);
}

#[test]
fn test_from_wire_rejects_shell_metacharacters() {
    for game in [
        "'; rm -rf / ;'",
        ".......;.......;.......;.......;.......;......$",
        ".......|.......;.......;.......;.......;.......",
        "$(reboot)",
    ] {
        let err = MoveRequest::from_wire(game, "x", None).unwrap_err();
        assert!(err.message.contains("forbidden character"), "{}", err);
    }
}

#[test]
fn test_from_wire_rejects_bad_side_and_budget() {
    let empty = ".......;.......;.......;.......;.......;.......";
    assert!(MoveRequest::from_wire(empty, "X", None).is_err());
    assert!(MoveRequest::from_wire(empty, "xo", None).is_err());
    assert!(MoveRequest::from_wire(empty, "", None).is_err());
    assert!(MoveRequest::from_wire(empty, "x", Some("0")).is_err());
    assert!(MoveRequest::from_wire(empty, "x", Some("-3")).is_err());
    assert!(MoveRequest::from_wire(empty, "x", Some("lots")).is_err());
    assert!(MoveRequest::from_wire(empty, "x", Some("100001")).is_err());
}

#[test]
fn test_search_budget_bounds() {
    assert_eq!(SearchBudget::default().get(), SearchBudget::DEFAULT);
    assert!(SearchBudget::new(1).is_ok());
    assert!(SearchBudget::new(SearchBudget::MAX).is_ok());
    assert!(SearchBudget::new(0).is_err());
    assert!(SearchBudget::new(SearchBudget::MAX + 1).is_err());
}

#[test]
fn test_outcome_serializes_snake_case() {
    let json = serde_json::to_string(&Outcome::NoLegalMove).expect("Serializable");
    assert_eq!(json, "\"no_legal_move\"");
    assert_eq!(Outcome::OWin.winner(), Some(Side::O));
    assert_eq!(Outcome::Draw.winner(), None);
}
