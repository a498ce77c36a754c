use super::*;
use crate::header::MethodCategory;

fn param(
    raw_type: &str,
    name: Option<&str>,
) -> ParameterDescriptor {
    ParameterDescriptor {
        raw_type: raw_type.to_string(),
        is_pointer: false,
        is_reference: false,
        is_const: false,
        default_value: None,
        name: name.map(str::to_string),
    }
}

fn method(
    name: &str,
    return_type: &str,
    parameters: Vec<ParameterDescriptor>,
) -> MethodDescriptor {
    MethodDescriptor {
        name: name.to_string(),
        return_type: return_type.to_string(),
        parameters,
        is_constructor: false,
        is_destructor: false,
        is_virtual: false,
        is_explicit: false,
        is_const: false,
        category: MethodCategory::Public,
        line: 1,
    }
}

fn constructor(parameters: Vec<ParameterDescriptor>) -> MethodDescriptor {
    MethodDescriptor {
        is_constructor: true,
        ..method("ctkWidget", "", parameters)
    }
}

#[test]
fn plain_method() {
    let mut value = method("value", "int", vec![]);
    value.is_const = true;
    assert_eq!(method_line(&value), "  int value() const;\n");
}

#[test]
fn pointer_return_type_takes_no_extra_space() {
    assert_eq!(method_line(&method("widget", "QWidget *", vec![])), "  QWidget *widget();\n");
    assert_eq!(method_line(&method("title", "const QString &", vec![])), "  const QString & title();\n");
}

#[test]
fn conversion_operator_has_no_return_type() {
    let mut to_bool = method("operator bool", "", vec![]);
    to_bool.is_const = true;
    assert_eq!(method_line(&to_bool), "  operator bool() const;\n");
}

#[test]
fn inline_marker_is_removed() {
    assert_eq!(method_line(&method("title", "inline QString", vec![])), "  QString title();\n");
}

#[test]
fn virtual_and_explicit_prefixes() {
    let mut dtor = method("ctkWidget", "", vec![]);
    dtor.is_destructor = true;
    dtor.is_virtual = true;
    assert_eq!(method_line(&dtor), "  virtual ~ctkWidget();\n");

    let mut ctor = constructor(vec![param("int", Some("size"))]);
    ctor.is_explicit = true;
    assert_eq!(method_line(&ctor), "  explicit ctkWidget(int size);\n");
}

#[test]
fn parameter_markers() {
    let mut text = param("QString", Some("text"));
    text.is_const = true;
    text.is_reference = true;
    assert_eq!(parameter(&text, false), "const QString &text");

    let mut widget = param("QWidget", Some("w"));
    widget.is_pointer = true;
    widget.is_reference = true;
    assert_eq!(parameter(&widget, false), "QWidget *w");

    let mut flag = param("bool", Some("on"));
    flag.default_value = Some("true".to_string());
    assert_eq!(parameter(&flag, false), "bool on = true");
}

#[test]
fn unnamed_parameters() {
    assert_eq!(parameter(&param("int", None), false), "int ");
    let mut pointer = param("QObject", None);
    pointer.is_pointer = true;
    assert_eq!(parameter(&pointer, false), "QObject *");
    let unnamed = method("setValue", "void", vec![param("int", None), param("bool", None)]);
    assert_eq!(method_line(&unnamed), "  void setValue(int , bool );\n");
}

#[test]
fn leading_scope_is_stripped() {
    assert_eq!(parameter(&param("::ctk::Value", Some("value")), false), "ctk::Value value");
}

#[test]
fn parent_parameters_transfer_ownership() {
    let mut parent = param("QWidget", Some("parent"));
    parent.is_pointer = true;
    parent.default_value = Some("0".to_string());
    let ctor = constructor(vec![parent.clone()]);
    assert_eq!(method_line(&ctor), "  ctkWidget(QWidget *parent /TransferThis/ = 0);\n");

    let mut set_parent = method("setParent", "void", vec![parent]);
    set_parent.is_virtual = true;
    assert_eq!(method_line(&set_parent), "  virtual void setParent(QWidget *parent = 0);\n");
}

#[test]
fn ownership_match_is_a_case_insensitive_substring() {
    assert!(transfers_ownership("parent"));
    assert!(transfers_ownership("parentObject"));
    assert!(transfers_ownership("newParent"));
    // Not owners, but the substring still matches.
    assert!(transfers_ownership("parentheses"));
    assert!(transfers_ownership("transparentColor"));
    assert!(!transfers_ownership("owner"));

    let ctor = constructor(vec![param("QColor", Some("transparentColor")), param("int", Some("parentheses"))]);
    assert_eq!(
        method_line(&ctor),
        "  ctkWidget(QColor transparentColor /TransferThis/, int parentheses /TransferThis/);\n"
    );
}

#[test]
fn scope_spacing_is_collapsed() {
    assert_eq!(normalize_scopes("Qt : : AlignLeft"), "Qt::AlignLeft");
    assert_eq!(normalize_scopes("int f(ctk : : Value v = ctk : : Value());"), "int f(ctk::Value v = ctk::Value());");
    assert_eq!(normalize_scopes("class A : public B {"), "class A : public B {");
}
