use super::*;
use crate::{
    conditionals::{DefinitionEnvironment, SkipRange, skip_ranges},
    header::parse_header,
};

const GUARDED: &str = "\
#ifndef CTKSLIDER_H
#define CTKSLIDER_H
class A {
public:
#ifdef USE_FOO
  void foo();
#else
  void bar();
#endif
};
#endif
";

#[test]
fn include_guard_is_not_relevant() {
    let ast = parse_header(GUARDED).expect("parses");
    let relevant = relevant_directives(&ast);
    let texts: Vec<&str> = relevant.iter().map(|directive| directive.text.as_str()).collect();
    assert_eq!(texts, vec!["#ifdef USE_FOO", "#else", "#endif"]);
    assert_eq!(relevant.iter().map(|directive| directive.line).collect::<Vec<_>>(), vec![5, 7, 9]);
}

#[test]
fn unguarded_headers_keep_every_directive() {
    let ast = parse_header("#ifdef A\nint f();\n#endif\n").expect("parses");
    assert_eq!(relevant_directives(&ast).len(), 2);
}

#[test]
fn aligned_text_passes() {
    let ast = parse_header(GUARDED).expect("parses");
    let relevant = relevant_directives(&ast);
    check_alignment(GUARDED, &ast, &relevant).expect("aligned");
}

#[test]
fn shifted_directive_is_misaligned() {
    let ast = parse_header(GUARDED).expect("parses");
    let mut relevant = relevant_directives(&ast);
    relevant[1].line = 6;
    let error = check_alignment(GUARDED, &ast, &relevant).expect_err("line moved");
    assert!(matches!(error, SipgenError::DirectiveMisalignment { line: 7, .. }));
}

#[test]
fn swallowed_directive_is_misaligned() {
    let ast = parse_header(GUARDED).expect("parses");
    let relevant = relevant_directives(&ast);
    let erased = GUARDED.replace("#else", "     ");
    let error = check_alignment(&erased, &ast, &relevant).expect_err("else missing");
    match error {
        SipgenError::DirectiveMisalignment {
            line,
            found,
            ..
        } => {
            assert_eq!(line, 9);
            assert_eq!(found, "#endif");
        },
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn directives_are_compared_in_normal_form() {
    let source = "#  ifdef   USE_FOO // optional\nint f();\n#endif /* USE_FOO */\n";
    let ast = parse_header(source).expect("parses");
    let relevant = relevant_directives(&ast);
    assert_eq!(relevant[0].text, "#ifdef USE_FOO");
    check_alignment(source, &ast, &relevant).expect("aligned");
}

#[test]
fn continuation_lines_are_joined() {
    let source = "#if QT_VERSION >= \\\n    0x050000\nint f();\n#endif\n";
    let ast = parse_header(source).expect("parses");
    let relevant = relevant_directives(&ast);
    assert_eq!(relevant[0].text, "#if QT_VERSION >= 0x050000");
    check_alignment(source, &ast, &relevant).expect("aligned");
}

#[test]
fn skip_ranges_end_to_end() {
    let ast = parse_header(GUARDED).expect("parses");
    let env = DefinitionEnvironment::new(["USE_QFILEDIALOG_OPTIONS"], 0x050400);
    let skipped = skip_ranges(GUARDED, &ast, &env).expect("resolves");
    assert_eq!(skipped.as_slice(), &[SkipRange { start: 5, end: 7 }]);
}
