use aws_sdk_bedrockruntime::types::{ContentBlock, ConversationRole};

use cdpt_bedrock::converse::build_converse_messages;
use cdpt_core::models::message::Message;

fn text_of(block: &ContentBlock) -> &str {
    match block {
        ContentBlock::Text(text) => text.as_str(),
        other => panic!("expected text block, got {other:?}"),
    }
}

#[test]
fn messages_keep_order_and_roles() {
    let messages = vec![
        Message::user("What is Aiken?"),
        Message::assistant("A smart contract language."),
        Message::user("How do I install it?"),
    ];

    let converse = build_converse_messages(&messages, None).unwrap();
    assert_eq!(converse.len(), 3);
    assert_eq!(converse[0].role(), &ConversationRole::User);
    assert_eq!(converse[1].role(), &ConversationRole::Assistant);
    assert_eq!(text_of(&converse[2].content()[0]), "How do I install it?");
}

#[test]
fn prefill_becomes_trailing_assistant_message() {
    let messages = vec![Message::user("What is a Plutus script?")];

    let converse =
        build_converse_messages(&messages, Some(r#"{ "categoryTitle":""#)).unwrap();
    assert_eq!(converse.len(), 2);
    let last = converse.last().unwrap();
    assert_eq!(last.role(), &ConversationRole::Assistant);
    assert_eq!(text_of(&last.content()[0]), r#"{ "categoryTitle":""#);
}
