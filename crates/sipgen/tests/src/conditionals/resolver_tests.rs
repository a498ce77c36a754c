use super::*;

fn directive(
    kind: ConditionalKind,
    condition: &str,
    line: usize,
) -> ConditionalDirective {
    let keyword = match kind {
        ConditionalKind::If => "#if",
        ConditionalKind::IfDef => "#ifdef",
        ConditionalKind::IfNDef => "#ifndef",
        ConditionalKind::Else => "#else",
        ConditionalKind::EndIf => "#endif",
    };
    let text = if condition.is_empty() {
        keyword.to_string()
    } else {
        format!("{keyword} {condition}")
    };
    ConditionalDirective {
        kind,
        condition: condition.to_string(),
        text,
        line,
    }
}

fn ifdef(
    symbol: &str,
    line: usize,
) -> ConditionalDirective {
    directive(ConditionalKind::IfDef, symbol, line)
}

fn ifndef(
    symbol: &str,
    line: usize,
) -> ConditionalDirective {
    directive(ConditionalKind::IfNDef, symbol, line)
}

fn if_(
    condition: &str,
    line: usize,
) -> ConditionalDirective {
    directive(ConditionalKind::If, condition, line)
}

fn else_(line: usize) -> ConditionalDirective {
    directive(ConditionalKind::Else, "", line)
}

fn endif(line: usize) -> ConditionalDirective {
    directive(ConditionalKind::EndIf, "", line)
}

fn env() -> DefinitionEnvironment {
    DefinitionEnvironment::new(["USE_QFILEDIALOG_OPTIONS"], 0x050400)
}

fn ranges(
    directives: &[ConditionalDirective],
) -> Vec<(usize, usize)> {
    resolve(directives, &env())
        .expect("resolves")
        .as_slice()
        .iter()
        .map(|range| (range.start, range.end))
        .collect()
}

#[test]
fn inactive_ifdef_skips_to_endif() {
    assert_eq!(ranges(&[ifdef("USE_FOO", 3), endif(6)]), vec![(3, 6)]);
}

#[test]
fn active_ifdef_skips_nothing() {
    assert!(ranges(&[ifdef("USE_QFILEDIALOG_OPTIONS", 3), endif(6)]).is_empty());
}

#[test]
fn inactive_branch_with_else_closes_at_else() {
    let directives = [ifdef("USE_FOO", 2), else_(5), endif(9)];
    let skipped = resolve(&directives, &env()).expect("resolves");
    assert_eq!(skipped.as_slice(), &[SkipRange { start: 2, end: 5 }]);
    for line in 2..=5 {
        assert!(skipped.is_skipped(line), "line {line}");
    }
    for line in 6..=9 {
        assert!(!skipped.is_skipped(line), "line {line}");
    }
}

#[test]
fn active_branch_with_else_skips_else_branch() {
    let directives = [ifdef("USE_QFILEDIALOG_OPTIONS", 2), else_(5), endif(9)];
    let skipped = resolve(&directives, &env()).expect("resolves");
    assert_eq!(skipped.as_slice(), &[SkipRange { start: 5, end: 9 }]);
    for line in 3..5 {
        assert!(!skipped.is_skipped(line), "line {line}");
    }
    for line in 6..9 {
        assert!(skipped.is_skipped(line), "line {line}");
    }
}

#[test]
fn ifndef_inverts_the_allow_list() {
    assert_eq!(ranges(&[ifndef("USE_QFILEDIALOG_OPTIONS", 1), endif(4)]), vec![(1, 4)]);
    assert!(ranges(&[ifndef("USE_FOO", 1), endif(4)]).is_empty());
    assert_eq!(ranges(&[ifndef("USE_FOO", 1), else_(3), endif(4)]), vec![(3, 4)]);
}

#[test]
fn version_branches() {
    let directives = [
        if_("QT_VERSION >= 0x050000", 2),
        else_(4),
        endif(6),
        if_("QT_VERSION < QT_VERSION_CHECK(5, 0, 0)", 8),
        else_(10),
        endif(12),
    ];
    assert_eq!(ranges(&directives), vec![(4, 6), (8, 10)]);
}

#[test]
fn sequential_blocks_produce_disjoint_ranges() {
    let directives = [
        ifdef("USE_FOO", 3),
        endif(5),
        ifdef("USE_QFILEDIALOG_OPTIONS", 8),
        endif(10),
        ifdef("USE_BAR", 12),
        else_(14),
        endif(16),
    ];
    let skipped = resolve(&directives, &env()).expect("resolves");
    assert_eq!(skipped.len(), 2);
    assert!(skipped.is_skipped(4));
    assert!(!skipped.is_skipped(6));
    assert!(!skipped.is_skipped(9));
    assert!(skipped.is_skipped(13));
    assert!(!skipped.is_skipped(15));
}

#[test]
fn nested_block_inside_skipped_branch_is_covered_by_outer_range() {
    let directives = [
        ifdef("USE_FOO", 1),
        ifdef("USE_QFILEDIALOG_OPTIONS", 2),
        else_(3),
        endif(4),
        endif(5),
    ];
    assert_eq!(ranges(&directives), vec![(1, 5)]);
}

#[test]
fn nested_block_inside_kept_branch_is_resolved() {
    let directives = [
        ifdef("USE_QFILEDIALOG_OPTIONS", 1),
        ifdef("USE_FOO", 2),
        endif(4),
        else_(6),
        endif(8),
    ];
    assert_eq!(ranges(&directives), vec![(2, 4), (6, 8)]);
}

#[test]
fn no_directives_no_ranges() {
    let skipped = resolve(&[], &env()).expect("resolves");
    assert!(skipped.is_empty());
    assert!(!skipped.is_skipped(1));
}

#[test]
fn else_without_if_is_misaligned() {
    let error = resolve(&[else_(4), endif(6)], &env()).expect_err("orphan else");
    assert!(matches!(error, SipgenError::DirectiveMisalignment { line: 4, .. }));
}

#[test]
fn endif_without_if_is_misaligned() {
    let error = resolve(&[ifdef("USE_FOO", 1), endif(2), endif(3)], &env()).expect_err("orphan endif");
    assert!(matches!(error, SipgenError::DirectiveMisalignment { line: 3, .. }));
}

#[test]
fn unclosed_block_is_misaligned() {
    let error = resolve(&[ifdef("USE_FOO", 1), else_(3)], &env()).expect_err("no endif");
    assert!(matches!(error, SipgenError::DirectiveMisalignment { line: 3, .. }));
}

#[test]
fn configuration_errors_propagate() {
    let error = resolve(&[if_("QT_VERSION == 0x050400", 2), endif(3)], &env()).expect_err("bad operator");
    assert!(matches!(error, SipgenError::UnsupportedComparisonOperator { line: 2, .. }));
}

#[test]
fn resolving_twice_gives_identical_ranges() {
    let directives = [
        ifdef("USE_FOO", 3),
        else_(5),
        endif(7),
        if_("QT_VERSION >= 0x060000", 9),
        endif(11),
    ];
    let env = env();
    let first = resolve(&directives, &env).expect("resolves");
    let second = resolve(&directives, &env).expect("resolves");
    assert_eq!(first, second);
}
