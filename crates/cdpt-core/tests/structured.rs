use cdpt_core::error::ParseError;
use cdpt_core::structured::{
    ParseOutcome, normalize_response, parse_structured_reply, reflow_numbered_list,
    repair_escaped_separators, reply_prefill,
};

#[test]
fn prefill_plus_continuation_parses_strictly() {
    let prefill = reply_prefill("What is a \"datum\"?", "What is a datum in Cardano?");
    let text = format!(r#"{prefill}Datums", "response": "A datum is data attached to an output." }}"#);

    match parse_structured_reply(&text) {
        ParseOutcome::Strict(reply) => {
            assert_eq!(reply.user_query.as_deref(), Some("What is a \"datum\"?"));
            assert_eq!(reply.category_title.as_deref(), Some("Datums"));
            assert_eq!(reply.response, "A datum is data attached to an output.");
        }
        other => panic!("expected strict parse, got {other:?}"),
    }
}

#[test]
fn escaped_separator_is_repaired() {
    let text = r#"{ "categoryTitle": "Tokens",\\n "response": "Minting uses policies." }"#;

    match parse_structured_reply(text) {
        ParseOutcome::Repaired(reply) => {
            assert_eq!(reply.category_title.as_deref(), Some("Tokens"));
            assert_eq!(reply.response, "Minting uses policies.");
        }
        other => panic!("expected repaired parse, got {other:?}"),
    }
}

#[test]
fn repair_leaves_valid_text_borrowed() {
    let text = r#"{ "response": "fine" }"#;
    assert!(matches!(
        repair_escaped_separators(text),
        std::borrow::Cow::Borrowed(_)
    ));
    assert_eq!(
        repair_escaped_separators(r#""a",\\n "b""#),
        r#""a", "b""#
    );
}

#[test]
fn unrepairable_text_fails() {
    assert!(matches!(
        parse_structured_reply("not json at all"),
        ParseOutcome::Failed(ParseError::Malformed(_))
    ));
    assert!(matches!(
        parse_structured_reply(r#"{ "title": "x",\\n "oops" }"#),
        ParseOutcome::Failed(ParseError::Malformed(_))
    ));
    assert!(matches!(
        parse_structured_reply("   "),
        ParseOutcome::Failed(ParseError::Empty)
    ));
}

#[test]
fn missing_response_field_fails() {
    assert!(parse_structured_reply(r#"{ "categoryTitle": "x" }"#)
        .into_result()
        .is_err());
}

#[test]
fn escaped_newlines_are_unescaped() {
    assert_eq!(normalize_response(r"Line one\nLine two"), "Line one\nLine two");
}

#[test]
fn numbered_items_get_one_blank_line() {
    let text = "Steps:\n1. Install\n2. Build\n\n\n3. Deploy\nDone";
    assert_eq!(
        reflow_numbered_list(text),
        "Steps:\n1. Install\n\n2. Build\n\n3. Deploy\n\nDone"
    );
}

#[test]
fn reflow_is_idempotent() {
    let text = "1. Install\n\n\n2. Build\n3. Deploy\n\n";
    let once = reflow_numbered_list(text);
    assert_eq!(reflow_numbered_list(&once), once);
    assert_eq!(once, "1. Install\n\n2. Build\n\n3. Deploy");
}

#[test]
fn indented_continuation_stays_with_its_item() {
    let text = "1. Install\n   with cargo\n2. Build";
    let once = reflow_numbered_list(text);
    assert_eq!(once, "1. Install\n   with cargo\n\n2. Build");
    assert_eq!(reflow_numbered_list(&once), once);
}

#[test]
fn text_without_lists_is_untouched() {
    let text = "Plain answer.\n\nSecond paragraph.";
    assert_eq!(reflow_numbered_list(text), text);
}

#[test]
fn blank_category_title_is_dropped() {
    let reply = parse_structured_reply(r#"{ "categoryTitle": " ", "response": "ok" }"#)
        .into_result()
        .unwrap();
    let result = reply.into_result();
    assert_eq!(result.category_title, None);
    assert_eq!(result.response, "ok");
}
