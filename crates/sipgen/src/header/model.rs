use serde::Serialize;

/// Member access of enums and base classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Public,
    Protected,
    Private,
}

impl Access {
    pub fn as_str(self) -> &'static str {
        match self {
            Access::Public => "public",
            Access::Protected => "protected",
            Access::Private => "private",
        }
    }
}

/// Section a method was declared in. Private methods are kept in the model
/// but never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodCategory {
    Public,
    PublicSlot,
    Protected,
    ProtectedSlot,
    Signal,
    Private,
}

impl MethodCategory {
    /// Access used for enums and nested declarations under this label.
    pub fn access(self) -> Access {
        match self {
            MethodCategory::Public | MethodCategory::PublicSlot | MethodCategory::Signal => Access::Public,
            MethodCategory::Protected | MethodCategory::ProtectedSlot => Access::Protected,
            MethodCategory::Private => Access::Private,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDescriptor {
    /// Type without `const`, `*` and `&`; may keep a leading `::`.
    pub raw_type: String,
    pub is_pointer: bool,
    pub is_reference: bool,
    pub is_const: bool,
    pub default_value: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDescriptor {
    pub name: String,
    pub return_type: String,
    pub parameters: Vec<ParameterDescriptor>,
    pub is_constructor: bool,
    pub is_destructor: bool,
    pub is_virtual: bool,
    pub is_explicit: bool,
    pub is_const: bool,
    pub category: MethodCategory,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumeratorDescriptor {
    pub name: String,
    /// Initializer expression as written, `None` when implicit.
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDescriptor {
    pub name: Option<String>,
    pub enumerators: Vec<EnumeratorDescriptor>,
    pub access: Access,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKeyword {
    Class,
    Struct,
}

impl ClassKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            ClassKeyword::Class => "class",
            ClassKeyword::Struct => "struct",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseClass {
    pub access: Access,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDescriptor {
    pub name: String,
    pub keyword: ClassKeyword,
    pub bases: Vec<BaseClass>,
    pub enums: Vec<EnumDescriptor>,
    pub methods: Vec<MethodDescriptor>,
    pub line: usize,
}

impl ClassDescriptor {
    pub fn enums_with(
        &self,
        access: Access,
    ) -> impl Iterator<Item = &EnumDescriptor> {
        self.enums.iter().filter(move |item| item.access == access)
    }

    pub fn methods_in(
        &self,
        category: MethodCategory,
    ) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.iter().filter(move |method| method.category == category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceDescriptor {
    pub name: String,
    pub functions: Vec<MethodDescriptor>,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionalKind {
    If,
    IfDef,
    IfNDef,
    Else,
    EndIf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionalDirective {
    pub kind: ConditionalKind,
    /// Everything after the directive keyword, e.g. `QT_VERSION >= 0x050000`.
    pub condition: String,
    /// The normalized directive line, e.g. `#if QT_VERSION >= 0x050000`.
    pub text: String,
    pub line: usize,
}

/// Structured view of one macro-erased header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderAst {
    pub namespaces: Vec<NamespaceDescriptor>,
    pub classes: Vec<ClassDescriptor>,
    pub conditionals: Vec<ConditionalDirective>,
    /// Symbol of the `#ifndef X` / `#define X` include guard, if any.
    pub include_guard: Option<String>,
}
