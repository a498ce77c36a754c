    use super::*;
    use crate::syntax::cst::SyntaxNode;

    fn parse(input: &str) -> (SyntaxNode, Vec<SyntaxError>) {
        let (green, errors) = Parser::new(input).parse();
        (SyntaxNode::new_root(green), errors)
    }

    fn check(input: &str, expected_tree: &str) {
        let (node, errors) = parse(input);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        let actual_tree = format!("{:#?}", node);

        // Normalize newlines and trim
        let actual_tree = actual_tree.trim();
        let expected_tree = expected_tree.trim();

        assert_eq!(actual_tree, expected_tree);
    }

    fn nodes_of(
        input: &str,
        kind: SyntaxKind,
    ) -> Vec<SyntaxNode> {
        let (root, _) = parse(input);
        root.descendants().filter(|node| node.kind() == kind).collect()
    }

    fn texts_of(
        input: &str,
        kind: SyntaxKind,
    ) -> Vec<String> {
        nodes_of(input, kind)
            .into_iter()
            .map(|node| node.text().to_string().trim().to_string())
            .collect()
    }

    #[test]
    fn test_empty() {
        check("", "Root@0..0");
    }

    #[test]
    fn test_enum_def() {
        check(
            "enum E { A = 1, B };",
            r#"
Root@0..20
  EnumDef@0..20
    KwEnum@0..4 "enum"
    Whitespace@4..5 " "
    Ident@5..6 "E"
    Whitespace@6..7 " "
    EnumBody@7..19
      LBrace@7..8 "{"
      Whitespace@8..9 " "
      Enumerator@9..14
        Ident@9..10 "A"
        Whitespace@10..11 " "
        EnumValue@11..14
          Equal@11..12 "="
          Whitespace@12..13 " "
          Integer@13..14 "1"
      Comma@14..15 ","
      Whitespace@15..16 " "
      Enumerator@16..18
        Ident@16..17 "B"
        Whitespace@17..18 " "
      RBrace@18..19 "}"
    Semicolon@19..20 ";"
"#,
        );
    }

    #[test]
    fn test_class_def() {
        check(
            "class Foo : public Bar { public: Foo(); };",
            r#"
Root@0..42
  ClassDef@0..42
    KwClass@0..5 "class"
    Whitespace@5..6 " "
    Ident@6..9 "Foo"
    Whitespace@9..10 " "
    BaseList@10..23
      Colon@10..11 ":"
      Whitespace@11..12 " "
      BaseSpec@12..23
        KwPublic@12..18 "public"
        Whitespace@18..19 " "
        Ident@19..22 "Bar"
        Whitespace@22..23 " "
    ClassBody@23..41
      LBrace@23..24 "{"
      Whitespace@24..25 " "
      AccessLabel@25..32
        KwPublic@25..31 "public"
        Colon@31..32 ":"
      Whitespace@32..33 " "
      FunctionDecl@33..39
        FunctionName@33..36
          Ident@33..36 "Foo"
        ParameterList@36..38
          LParen@36..37 "("
          RParen@37..38 ")"
        Semicolon@38..39 ";"
      Whitespace@39..40 " "
      RBrace@40..41 "}"
    Semicolon@41..42 ";"
"#,
        );
    }

    #[test]
    fn test_forward_declarations() {
        let input = "class QWidget;\nstruct Data;\nenum class Mode : int;\n";
        assert_eq!(nodes_of(input, SyntaxKind::ForwardDecl).len(), 3);
        assert!(nodes_of(input, SyntaxKind::ClassDef).is_empty());
    }

    #[test]
    fn test_method_parts() {
        let input = "class A {\npublic:\n  virtual QString name(const QString &prefix, int n = 0) const;\n};\n";
        assert_eq!(texts_of(input, SyntaxKind::Specifiers), vec!["virtual"]);
        assert_eq!(texts_of(input, SyntaxKind::TypeRef), vec!["QString", "const QString &", "int"]);
        assert_eq!(texts_of(input, SyntaxKind::FunctionName), vec!["name"]);
        assert_eq!(texts_of(input, SyntaxKind::DefaultValue), vec!["= 0"]);
        assert_eq!(texts_of(input, SyntaxKind::Qualifiers), vec!["const"]);

        let names: Vec<String> = nodes_of(input, SyntaxKind::Parameter)
            .iter()
            .filter_map(|param| {
                param
                    .children_with_tokens()
                    .filter_map(|element| element.into_token())
                    .find(|token| token.kind() == SyntaxKind::Ident)
                    .map(|token| token.text().to_string())
            })
            .collect();
        assert_eq!(names, vec!["prefix", "n"]);
    }

    #[test]
    fn test_unnamed_parameters() {
        let input = "void f(const QString &, QObject *);";
        let params = nodes_of(input, SyntaxKind::Parameter);
        assert_eq!(params.len(), 2);
        assert!(params.iter().all(|param| param
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .all(|token| token.kind() != SyntaxKind::Ident)));
    }

    #[test]
    fn test_template_arguments_do_not_split_parameters() {
        let input = "void f(QMap<int, QString> map, QList<QList<int>> nested);";
        assert_eq!(nodes_of(input, SyntaxKind::Parameter).len(), 2);
    }

    #[test]
    fn test_destructor_and_operators() {
        let input = "class A {\npublic:\n  ~A();\n  bool operator==(const A &other) const;\n  int operator()(int x);\n  operator bool() const;\n};\n";
        assert_eq!(
            texts_of(input, SyntaxKind::FunctionName),
            vec!["~A", "operator==", "operator()", "operator bool"]
        );
    }

    #[test]
    fn test_access_labels() {
        let input = "class A {\npublic Q_SLOTS:\n  void a();\nQ_SIGNALS:\n  void b();\nprotected slots:\n  void c();\nsignals:\n  void d();\n};\n";
        assert_eq!(
            texts_of(input, SyntaxKind::AccessLabel),
            vec!["public Q_SLOTS:", "Q_SIGNALS:", "protected slots:", "signals:"]
        );
        assert_eq!(nodes_of(input, SyntaxKind::FunctionDecl).len(), 4);
    }

    #[test]
    fn test_directives_inside_class_body() {
        let input = "class A {\npublic:\n#ifdef USE_FOO\n  void foo();\n#endif\n  void bar();\n};\n";
        assert_eq!(texts_of(input, SyntaxKind::PreprocIfdef), vec!["#ifdef USE_FOO"]);
        assert_eq!(texts_of(input, SyntaxKind::PreprocEndif), vec!["#endif"]);
        assert_eq!(texts_of(input, SyntaxKind::FunctionName), vec!["foo", "bar"]);
    }

    #[test]
    fn test_directive_line_continuation() {
        let input = "#define LONG_MACRO(x) \\\n  ((x) + 1)\nint value;\n";
        assert_eq!(nodes_of(input, SyntaxKind::PreprocDefine).len(), 1);
        assert_eq!(texts_of(input, SyntaxKind::FieldDef), vec!["int value;"]);
    }

    #[test]
    fn test_directive_kinds() {
        let input = "#ifndef GUARD_H\n#define GUARD_H\n#include <QObject>\n#if QT_VERSION >= 0x050000\n#elif 1\n#else\n#endif\n#pragma once\n#endif\n";
        let (root, errors) = parse(input);
        assert!(errors.is_empty());
        let kinds: Vec<SyntaxKind> = root.children().map(|node| node.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::PreprocIfndef,
                SyntaxKind::PreprocDefine,
                SyntaxKind::PreprocInclude,
                SyntaxKind::PreprocIf,
                SyntaxKind::PreprocElif,
                SyntaxKind::PreprocElse,
                SyntaxKind::PreprocEndif,
                SyntaxKind::PreprocOther,
                SyntaxKind::PreprocEndif,
            ]
        );
    }

    #[test]
    fn test_macro_calls_without_semicolon() {
        let input = "QT_BEGIN_NAMESPACE\nQ_DECLARE_METATYPE(Foo)\nclass A {};\nQT_END_NAMESPACE\n";
        assert_eq!(
            texts_of(input, SyntaxKind::MacroCall),
            vec!["QT_BEGIN_NAMESPACE", "Q_DECLARE_METATYPE(Foo)", "QT_END_NAMESPACE"]
        );
        assert_eq!(nodes_of(input, SyntaxKind::ClassDef).len(), 1);
    }

    #[test]
    fn test_member_macro_call_ends_at_line_break() {
        let input = "class A {\n  Q_GADGET\npublic:\n  void f();\n};\n";
        assert_eq!(texts_of(input, SyntaxKind::MacroCall), vec!["Q_GADGET"]);
        assert_eq!(texts_of(input, SyntaxKind::FunctionName), vec!["f"]);
    }

    #[test]
    fn test_fields_are_not_functions() {
        let input = "class A {\n  int m_x;\n  std::function<void(int)> m_cb;\n  static const int limit = max(1, 2);\n};\n";
        assert_eq!(nodes_of(input, SyntaxKind::FieldDef).len(), 3);
        assert!(nodes_of(input, SyntaxKind::FunctionDecl).is_empty());
    }

    #[test]
    fn test_inline_body_and_ctor_initializer() {
        let input = "class A {\npublic:\n  A(int x) : m_x(x), m_y{0} { init(); }\n  int x() const { return m_x; }\n};\n";
        assert_eq!(nodes_of(input, SyntaxKind::CtorInitializer).len(), 1);
        assert_eq!(nodes_of(input, SyntaxKind::Block).len(), 2);
        assert_eq!(texts_of(input, SyntaxKind::FunctionName), vec!["A", "x"]);
    }

    #[test]
    fn test_namespace_and_template() {
        let input = "namespace ctk {\ntemplate <typename T> class Box { T value; };\nvoid helper(int);\n}\n";
        let namespaces = nodes_of(input, SyntaxKind::NamespaceDef);
        assert_eq!(namespaces.len(), 1);
        assert_eq!(nodes_of(input, SyntaxKind::TemplateDef).len(), 1);
        assert_eq!(texts_of(input, SyntaxKind::FunctionName), vec!["helper"]);
    }

    #[test]
    fn test_unterminated_class_body_reports_error() {
        let (_, errors) = parse("class A {\n  void f();\n");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("class body"));
    }

    #[test]
    fn test_unmatched_brace_reports_error() {
        let (_, errors) = parse("void f();\n}\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].offset, 10);
    }

    #[test]
    fn test_stray_characters_in_directives_are_ignored() {
        let (_, errors) = parse("#error don't do this\nint x;\n");
        assert!(errors.is_empty());
        let (_, errors) = parse("int x; @\n");
        assert_eq!(errors.len(), 1);
    }
