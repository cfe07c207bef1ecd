use cdpt_core::models::history::{ConversationHistory, HistoryChange};
use cdpt_core::models::message::{Message, Role};
use cdpt_core::models::transcript::TranscriptEntry;

fn at(second: i64) -> jiff::Timestamp {
    jiff::Timestamp::from_second(1_700_000_000 + second).unwrap()
}

#[test]
fn empty_history_gets_user_message() {
    let (history, change) = ConversationHistory::default().append_user_input("hello");
    assert_eq!(change, HistoryChange::Appended);
    assert_eq!(history.messages(), &[Message::user("hello")]);
}

#[test]
fn appends_after_assistant_message() {
    let base = ConversationHistory::new(vec![Message::user("hi"), Message::assistant("hello")]);
    let (history, change) = base.append_user_input("what is a datum?");
    assert_eq!(change, HistoryChange::Appended);
    assert_eq!(history.len(), 3);
    assert_eq!(history.last(), Some(&Message::user("what is a datum?")));
}

#[test]
fn same_utterance_twice_is_idempotent() {
    let (once, _) = ConversationHistory::default().append_user_input("what is a datum?");
    let (twice, change) = once.append_user_input("what is a datum?");
    assert_eq!(change, HistoryChange::Unchanged);
    assert_eq!(once, twice);
}

#[test]
fn prefix_of_last_user_message_is_not_duplicated() {
    let base = ConversationHistory::new(vec![Message::user("what is a datum? and a redeemer?")]);
    let (history, change) = base.append_user_input("what is a datum?");
    assert_eq!(change, HistoryChange::Unchanged);
    assert_eq!(history, base);
}

#[test]
fn new_text_merges_into_trailing_user_message() {
    let base = ConversationHistory::new(vec![Message::user("first")]);
    let (history, change) = base.append_user_input("second");
    assert_eq!(change, HistoryChange::Merged);
    assert_eq!(history.messages(), &[Message::user("first\nsecond")]);
}

#[test]
fn original_history_is_not_mutated() {
    let base = ConversationHistory::new(vec![Message::user("first")]);
    let snapshot = base.clone();
    let _ = base.append_user_input("second");
    assert_eq!(base, snapshot);
}

#[test]
fn entries_fold_consecutive_roles() {
    let entries = vec![
        TranscriptEntry::message("c1", at(0), Role::User, "dangling"),
        TranscriptEntry::message("c1", at(1), Role::User, "retry"),
        TranscriptEntry::message("c1", at(2), Role::Assistant, "answer"),
    ];
    let history = ConversationHistory::from_entries(&entries);
    assert_eq!(
        history.messages(),
        &[Message::user("dangling\nretry"), Message::assistant("answer")]
    );
}

#[test]
fn window_is_bounded_and_starts_with_user() {
    let history = ConversationHistory::new(vec![
        Message::user("u1"),
        Message::assistant("a1"),
        Message::user("u2"),
        Message::assistant("a2"),
        Message::user("u3"),
    ]);

    let window = history.window(4);
    assert_eq!(
        window,
        vec![Message::user("u2"), Message::assistant("a2"), Message::user("u3")]
    );
    assert_eq!(history.window(10).len(), 5);
}

#[test]
fn contains_text_matches_exactly() {
    let history = ConversationHistory::new(vec![Message::assistant("A Plutus script.")]);
    assert!(history.contains_text("A Plutus script."));
    assert!(!history.contains_text("A Plutus script"));
}
