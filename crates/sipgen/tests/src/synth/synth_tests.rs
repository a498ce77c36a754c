use expect_test::expect;

use super::*;
use crate::{
    conditionals::{DefinitionEnvironment, skip_ranges},
    config::MacroSettings,
    error::SipgenError,
    header::parse_header,
    macros::extract,
};

fn synthesize_header(
    source: &str,
    header_name: &str,
) -> Result<Synthesis> {
    let extraction = extract(source, &MacroSettings::default())?;
    let ast = parse_header(&extraction.text)?;
    let env = DefinitionEnvironment::new(["USE_QFILEDIALOG_OPTIONS"], 0x050400);
    let skip = skip_ranges(&extraction.text, &ast, &env)?;
    synthesize(&ast, &skip, &extraction.metadata, header_name)
}

const SLIDER: &str = r#"#ifndef CTKSLIDER_H
#define CTKSLIDER_H

#include <QSlider>
#include "ctkBase.h"

class ctkSliderPrivate;

class CTK_WIDGETS_EXPORT ctkSlider : public QSlider, public ctkBase
{
  Q_OBJECT
  Q_PROPERTY(int mode READ mode)
public:
  enum Option { None = 0x0, Snap = 0x1, Both = None | Snap };
  Q_DECLARE_FLAGS(Options, Option)

  explicit ctkSlider(QWidget* parent = 0);
  virtual ~ctkSlider();

  int mode() const;
#ifdef USE_FOO
  void foo();
#endif
  void setOptions(const Options& options);

public Q_SLOTS:
  void reset();

Q_SIGNALS:
  void modeChanged(int mode);

protected:
  ctkSlider(ctkSliderPrivate* pimpl, QWidget* parent);
  QScopedPointer<ctkSliderPrivate> d_ptr;

private:
  Q_DECLARE_PRIVATE(ctkSlider);
  Q_DISABLE_COPY(ctkSlider);
};
Q_DECLARE_OPERATORS_FOR_FLAGS(ctkSlider::Options)

#endif
"#;

#[test]
fn synthesizes_exported_class() {
    let synthesis = synthesize_header(SLIDER, "ctkSlider.h").expect("synthesizes");
    expect![[r##"
        class ctkSlider : public QSlider, public ctkBase {

        %TypeHeaderCode
        #include "ctkSlider.h"
        %End

        public:
          enum Option {
            None=0x0,
            Snap=0x1,
            Both=1,
          };
          typedef QFlags<ctkSlider::Option> Options;

          explicit ctkSlider(QWidget *parent /TransferThis/ = 0);
          virtual ~ctkSlider();
          int mode() const;
          void setOptions(const Options &options);

        public slots:
          void reset();

        signals:
          void modeChanged(int mode);

        private:
          ctkSlider(const ctkSlider &);
          ctkSlider &operator=(const ctkSlider &);

        };

    "##]]
    .assert_eq(&synthesis.body);
    assert_eq!(synthesis.classes, vec!["ctkSlider"]);
    assert_eq!(synthesis.includes, vec!["ctkBase"]);
}

#[test]
fn method_in_undefined_block_is_omitted() {
    let synthesis = synthesize_header(SLIDER, "ctkSlider.h").expect("synthesizes");
    assert!(!synthesis.body.contains("foo"));
    assert!(synthesis.body.contains("  int mode() const;\n"));
    assert!(synthesis.body.contains("  void setOptions(const Options &options);\n"));
}

#[test]
fn defined_symbol_keeps_its_block() {
    let source = SLIDER.replace("USE_FOO", "USE_QFILEDIALOG_OPTIONS");
    let synthesis = synthesize_header(&source, "ctkSlider.h").expect("synthesizes");
    assert!(synthesis.body.contains("  void foo();\n"));
}

#[test]
fn protected_constructors_are_not_emitted() {
    let synthesis = synthesize_header(SLIDER, "ctkSlider.h").expect("synthesizes");
    assert!(!synthesis.body.contains("pimpl"));
    assert!(!synthesis.body.contains("protected:"));
}

#[test]
fn namespace_functions() {
    let source = "\
namespace ctk {
int version();
#if QT_VERSION >= 0x060000
QString qt6Only();
#endif
QString name(const QString& prefix = QString());
}
";
    let synthesis = synthesize_header(source, "ctkUtils.h").expect("synthesizes");
    expect![[r##"
        namespace ctk {

        %TypeHeaderCode
        #include "ctkUtils.h"
        %End

          int version();
          QString name(const QString &prefix = QString());

        };

    "##]]
    .assert_eq(&synthesis.body);
    assert!(synthesis.classes.is_empty());
}

#[test]
fn protected_sections_and_anonymous_enums() {
    let source = "\
struct CTK_CORE_EXPORT ctkPoint : public ctkBase
{
  enum { X, Y };
  int x() const;
protected:
  enum Kind { A = 1 };
  virtual void update();
protected slots:
  void refresh();
};
";
    let synthesis = synthesize_header(source, "ctkPoint.h").expect("synthesizes");
    expect![[r##"
        struct ctkPoint : public ctkBase {

        %TypeHeaderCode
        #include "ctkPoint.h"
        %End

        public:
          enum {
            X=0,
            Y=1,
          };

          int x() const;

        protected:
          enum Kind {
            A=1,
          };

          virtual void update();

        protected slots:
          void refresh();


        };

    "##]]
    .assert_eq(&synthesis.body);
}

#[test]
fn unexported_classes_produce_nothing() {
    let source = "class ctkHidden : public ctkOther {\npublic:\n  void f();\n};\n";
    let synthesis = synthesize_header(source, "ctkHidden.h").expect("synthesizes");
    assert!(synthesis.is_blank());
    assert!(synthesis.classes.is_empty());
    assert!(synthesis.includes.is_empty());
}

#[test]
fn shared_base_is_included_once() {
    let source = "\
class CTK_CORE_EXPORT ctkA : public BaseX {
public:
  ctkA();
};
class CTK_CORE_EXPORT ctkB : public BaseX, public ctkA {
public:
  ctkB();
};
class ctkHidden : public ctkOther {
public:
  void f();
};
";
    let synthesis = synthesize_header(source, "ctkPair.h").expect("synthesizes");
    assert_eq!(synthesis.classes, vec!["ctkA", "ctkB"]);
    assert_eq!(synthesis.includes, vec!["BaseX"]);
    assert!(!synthesis.body.contains("ctkHidden"));
    assert!(synthesis.body.contains("class ctkB : public BaseX, public ctkA {\n"));
}

#[test]
fn class_inside_skipped_block_is_dropped() {
    let source = "\
#ifdef USE_FOO
class CTK_CORE_EXPORT ctkFoo {
public:
  void f();
};
#endif
";
    let synthesis = synthesize_header(source, "ctkFoo.h").expect("synthesizes");
    assert!(synthesis.is_blank());
}

#[test]
fn unresolved_enum_reference_fails_the_file() {
    let source = "class CTK_CORE_EXPORT ctkE {\npublic:\n  enum E { A = 1, C = A | Missing };\n};\n";
    let error = synthesize_header(source, "ctkE.h").expect_err("unknown enumerator");
    assert!(matches!(error, SipgenError::UnresolvedEnumReference { line: 3, .. }));
}

#[test]
fn output_is_byte_identical_across_runs() {
    let extraction = extract(SLIDER, &MacroSettings::default()).expect("extracts");
    let ast = parse_header(&extraction.text).expect("parses");
    let env = DefinitionEnvironment::new(["USE_QFILEDIALOG_OPTIONS"], 0x050400);
    let skip = skip_ranges(&extraction.text, &ast, &env).expect("resolves");
    let first = synthesize(&ast, &skip, &extraction.metadata, "ctkSlider.h").expect("synthesizes");
    let second = synthesize(&ast, &skip, &extraction.metadata, "ctkSlider.h").expect("synthesizes");
    assert_eq!(first.body.as_bytes(), second.body.as_bytes());
    assert_eq!(first, second);
}

#[test]
fn shifted_flag_enumerators_resolve() {
    let source = "class CTK_CORE_EXPORT ctkFlags {\npublic:\n  enum E { A = 1 << 0, B = 1 << 1, C = A | B };\n};\n";
    let synthesis = synthesize_header(source, "ctkFlags.h").expect("synthesizes");
    assert!(synthesis.body.contains("  enum E {\n    A=1 << 0,\n    B=1 << 1,\n    C=3,\n  };\n"));
}

#[test]
fn operators_attributes_and_unnamed_parameters() {
    let source = "\
class CTK_CORE_EXPORT ctkHandle {
public:
  operator bool() const;
  [[nodiscard]] int count() const;
  void setCallback(void (*cb)(int));
  void setPoint(int a[3]);
  void setValue(int);
};
";
    let synthesis = synthesize_header(source, "ctkHandle.h").expect("synthesizes");
    assert!(synthesis.body.contains("  operator bool() const;\n"));
    assert!(synthesis.body.contains("  int count() const;\n"));
    assert!(synthesis.body.contains("  void setValue(int );\n"));
    assert!(!synthesis.body.contains("setCallback"));
    assert!(!synthesis.body.contains("setPoint"));
}
