use cdpt_core::references::strip_source_references;

#[test]
fn markers_are_removed() {
    let text = "Plutus scripts validate spending【4:0†plutus.md】 of UTxOs【12:3†ledger.md】.";
    assert_eq!(
        strip_source_references(text),
        "Plutus scripts validate spending of UTxOs."
    );
}

#[test]
fn stripping_is_idempotent() {
    let text = "See the docs【1:2†guide】 for details.";
    let once = strip_source_references(text);
    assert_eq!(strip_source_references(&once), once);
}

#[test]
fn text_without_markers_is_unchanged() {
    let text = "Arrays like [1] and [1:2] are not citations.";
    assert_eq!(strip_source_references(text), text);
}
