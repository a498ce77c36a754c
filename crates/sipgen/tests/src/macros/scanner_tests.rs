use super::*;

#[test]
fn words_respect_identifier_boundaries() {
    let text = "Q_OBJECT Q_OBJECTS MY_Q_OBJECT\n  Q_OBJECT";
    let scanner = MacroScanner::new("Q_OBJECT");
    assert_eq!(scanner.words(text), vec![0..8, 33..41]);
}

#[test]
fn invocations_stop_at_first_closing_paren() {
    let text = "  Q_DECLARE_FLAGS(Options, Option)\nQ_DECLARE_FLAGS (A, B)";
    let scanner = MacroScanner::new("Q_DECLARE_FLAGS");
    let found = scanner.invocations(text).expect("terminated");
    assert_eq!(found.len(), 2);
    assert_eq!(&text[found[0].span.clone()], "Q_DECLARE_FLAGS(Options, Option)");
    assert_eq!(&text[found[0].arguments.clone()], "Options, Option");
    assert_eq!(&text[found[1].arguments.clone()], "A, B");
}

#[test]
fn nested_parentheses_are_cut_at_first_close() {
    let text = "Q_DISABLE_COPY(f(x))";
    let found = MacroScanner::new("Q_DISABLE_COPY").invocations(text).expect("terminated");
    assert_eq!(&text[found[0].arguments.clone()], "f(x");
}

#[test]
fn unterminated_invocation_reports_offset() {
    let text = "class A {\n  Q_DISABLE_COPY(A\n};";
    assert_eq!(MacroScanner::new("Q_DISABLE_COPY").invocations(text), Err(12));
}

#[test]
fn bare_name_is_not_an_invocation() {
    let text = "Q_PROPERTY is mentioned here";
    assert!(MacroScanner::new("Q_PROPERTY").line_extents(text).is_empty());
}

#[test]
fn line_extents_run_to_end_of_line() {
    let text = "  Q_PROPERTY(int value READ value)\nint x;";
    let ranges = MacroScanner::new("Q_PROPERTY").line_extents(text);
    assert_eq!(ranges, vec![2..34]);
}

#[test]
fn erase_keeps_lines_and_offsets() {
    let mut text = String::from("a Q_X(1,\n2) é b");
    erase(&mut text, 2..11);
    assert_eq!(text, "a      \n   é b");
    erase(&mut text, 12..14);
    assert_eq!(text.len(), "a Q_X(1,\n2) é b".len());
    assert_eq!(text, "a      \n      b");
}
