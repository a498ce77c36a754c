use super::*;

fn directive(
    kind: ConditionalKind,
    condition: &str,
) -> ConditionalDirective {
    let keyword = match kind {
        ConditionalKind::If => "#if",
        ConditionalKind::IfDef => "#ifdef",
        ConditionalKind::IfNDef => "#ifndef",
        ConditionalKind::Else => "#else",
        ConditionalKind::EndIf => "#endif",
    };
    ConditionalDirective {
        kind,
        condition: condition.to_string(),
        text: format!("{keyword} {condition}"),
        line: 7,
    }
}

fn env() -> DefinitionEnvironment {
    DefinitionEnvironment::new(["USE_QFILEDIALOG_OPTIONS"], encode_version(5, 4, 0))
}

#[test]
fn encodes_versions() {
    assert_eq!(encode_version(5, 4, 0), 0x050400);
    assert_eq!(parse_version_setting("5.4.0"), Some(0x050400));
    assert_eq!(parse_version_setting("6.2"), Some(0x060200));
    assert_eq!(parse_version_setting("0x050F00"), Some(0x050F00));
    assert_eq!(parse_version_setting("QT_VERSION_CHECK(5, 15, 2)"), Some(0x050F02));
    assert_eq!(parse_version_setting("5.400.0"), None);
    assert_eq!(parse_version_setting("latest"), None);
}

#[test]
fn ifdef_uses_the_allow_list() {
    let env = env();
    assert!(env.is_active(&directive(ConditionalKind::IfDef, "USE_QFILEDIALOG_OPTIONS")).unwrap());
    assert!(!env.is_active(&directive(ConditionalKind::IfDef, "USE_FOO")).unwrap());
    assert!(!env.is_active(&directive(ConditionalKind::IfDef, "QT_VERSION")).unwrap());
}

#[test]
fn ifndef_is_the_negation() {
    let env = env();
    assert!(!env.is_active(&directive(ConditionalKind::IfNDef, "USE_QFILEDIALOG_OPTIONS")).unwrap());
    assert!(env.is_active(&directive(ConditionalKind::IfNDef, "USE_FOO")).unwrap());
}

#[test]
fn version_predicates_compare_against_target() {
    let env = env();
    let cases = [
        ("QT_VERSION >= 0x050000", true),
        ("QT_VERSION > 0x050400", false),
        ("QT_VERSION >= 0x050400", true),
        ("QT_VERSION < 0x060000", true),
        ("QT_VERSION <= 0x050300", false),
        ("QT_VERSION >= QT_VERSION_CHECK(5, 0, 0)", true),
        ("QT_VERSION < QT_VERSION_CHECK(5,4,0)", false),
        ("QT_VERSION>=327680", true),
    ];
    for (condition, expected) in cases {
        assert_eq!(env.is_active(&directive(ConditionalKind::If, condition)).unwrap(), expected, "{condition}");
        assert_eq!(env.is_active(&directive(ConditionalKind::IfDef, condition)).unwrap(), expected, "{condition}");
    }
}

#[test]
fn unsupported_operators_are_errors() {
    let env = env();
    for (condition, operator) in [("QT_VERSION == 0x050400", "=="), ("QT_VERSION != 0", "!="), ("QT_VERSION & 1", "&")] {
        let error = env.is_active(&directive(ConditionalKind::If, condition)).expect_err(condition);
        match error {
            SipgenError::UnsupportedComparisonOperator {
                operator: found,
                line,
                ..
            } => {
                assert_eq!(found, operator);
                assert_eq!(line, 7);
            },
            other => panic!("unexpected error {other:?}"),
        }
    }
}

#[test]
fn unreadable_versions_are_errors() {
    let env = env();
    for condition in ["QT_VERSION >= QT_VERSION_CHECK(5, 4)", "QT_VERSION >= FIVE", "QT_VERSION >="] {
        let error = env.is_active(&directive(ConditionalKind::If, condition)).expect_err(condition);
        assert!(matches!(error, SipgenError::InvalidVersion { line: 7, .. }), "{condition}");
    }
}

#[test]
fn plain_if_forms() {
    let env = env();
    let cases = [
        ("defined(USE_QFILEDIALOG_OPTIONS)", true),
        ("defined USE_QFILEDIALOG_OPTIONS", true),
        ("defined(USE_FOO)", false),
        ("!defined(USE_FOO)", true),
        ("! defined(USE_QFILEDIALOG_OPTIONS)", false),
        ("USE_QFILEDIALOG_OPTIONS", true),
        ("definedUSE_QFILEDIALOG_OPTIONS", false),
        ("1", true),
        ("0", false),
        ("defined(A) && defined(B)", false),
        ("USE_QFILEDIALOG_OPTIONS || 1", false),
    ];
    for (condition, expected) in cases {
        assert_eq!(env.is_active(&directive(ConditionalKind::If, condition)).unwrap(), expected, "{condition}");
    }
}

#[test]
fn custom_version_symbol() {
    let env = DefinitionEnvironment::new(Vec::<String>::new(), 0x0100).with_version_symbol("CTK_VERSION");
    assert!(env.is_active(&directive(ConditionalKind::If, "CTK_VERSION >= 0x0100")).unwrap());
    assert!(!env.is_active(&directive(ConditionalKind::If, "QT_VERSION >= 0x0100")).unwrap());
}

#[test]
fn builds_from_settings() {
    let settings = PreprocessorSettings::default();
    let env = DefinitionEnvironment::from_settings(&settings);
    assert!(env.is_defined("USE_QFILEDIALOG_OPTIONS"));
    assert_eq!(env.version(), 0x050400);
    assert_eq!(env.version_symbol(), "QT_VERSION");
}
