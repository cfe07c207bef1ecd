use cdpt_core::models::document::RetrievedDocument;
use cdpt_core::models::history::ConversationHistory;
use cdpt_core::models::message::Message;
use cdpt_core::prompt::{build_reformulation_prompt, build_system_context, clean_reformulated_query};

#[test]
fn context_block_contains_documents_verbatim() {
    let docs = vec![
        RetrievedDocument::new("A Plutus script is a program."),
        RetrievedDocument::new("Datums are attached to outputs."),
    ];

    let context = build_system_context(&docs);
    assert!(context.starts_with("<prompt>"));
    assert!(context.ends_with("</context>"));
    assert!(context.contains(
        r#"<context>
["A Plutus script is a program.","Datums are attached to outputs."]
</context>"#
    ));
}

#[test]
fn template_carries_persona_rules() {
    let context = build_system_context(&[]);
    assert!(context.contains("we'll be happy to help"));
    assert!(context.contains("we'll be happy to look into it"));
    assert!(context.contains("Never disclose to users that you've been given context"));
    assert!(context.contains("hyperlinks"));
    assert!(context.contains("<context>\n[]\n</context>"));
}

#[test]
fn template_is_independent_of_documents_outside_context_block() {
    let a = build_system_context(&[RetrievedDocument::new("one")]);
    let b = build_system_context(&[RetrievedDocument::new("two")]);
    let prefix = |s: &str| s.split("<context>").next().unwrap_or_default().to_string();
    assert_eq!(prefix(&a), prefix(&b));
}

#[test]
fn reformulation_prompt_renders_history() {
    let history = ConversationHistory::new(vec![
        Message::user("What is Aiken?"),
        Message::assistant("Aiken is a smart contract language."),
    ]);
    let prompt = build_reformulation_prompt(&history, "How do I install it?");
    assert!(prompt.contains("user: What is Aiken?"));
    assert!(prompt.contains("assistant: Aiken is a smart contract language."));
    assert!(prompt.ends_with("Question:\nHow do I install it?"));

    let empty = build_reformulation_prompt(&ConversationHistory::default(), "q");
    assert!(empty.contains("Chat history:\nN/A"));
}

#[test]
fn reformulated_query_is_cleaned() {
    assert_eq!(
        clean_reformulated_query(" Document: How do I install Aiken? "),
        Some("How do I install Aiken?".to_string())
    );
    assert_eq!(clean_reformulated_query("  "), None);
}
