use tracing::debug;

use crate::error::{Result, SipgenError};
use crate::header::model::{
    Access, BaseClass, ClassDescriptor, ClassKeyword, ConditionalDirective, ConditionalKind, EnumDescriptor,
    EnumeratorDescriptor, HeaderAst, MethodCategory, MethodDescriptor, NamespaceDescriptor, ParameterDescriptor,
};
use crate::syntax::SyntaxTree;
use crate::syntax::ast::{
    AccessLabel, AstNode, ClassDef, EnumDef, FunctionDecl, Item, Member, Parameter, Root, significant_tokens,
};
use crate::syntax::cst::{SyntaxNode, SyntaxToken};
use crate::syntax::helpers::{normalize_directive, render_spaced, render_type, strip_annotation_macros};
use crate::syntax::kind::SyntaxKind;
use crate::text_pos::LineIndex;

/// Lower a parsed header into its declaration model.
pub fn lower(tree: &SyntaxTree) -> Result<HeaderAst> {
    let index = LineIndex::new(tree.source());
    if let Some(error) = tree.errors().first() {
        return Err(SipgenError::Parse {
            line: index.line_of(error.offset),
            message: error.message.clone(),
        });
    }

    let root = tree.root();
    let mut lowering = Lowering {
        index,
        ast: HeaderAst::default(),
    };

    if let Some(root) = Root::cast(root.clone()) {
        lowering.lower_items(root.items(), "");
    }
    lowering.lower_conditionals(&root)?;
    Ok(lowering.ast)
}

struct Lowering {
    index: LineIndex,
    ast: HeaderAst,
}

impl Lowering {
    fn line_of_node(
        &self,
        node: &SyntaxNode,
    ) -> usize {
        let start = significant_tokens(node)
            .next()
            .map(|token| token.text_range().start())
            .unwrap_or_else(|| node.text_range().start());
        self.index.line_of(start.into())
    }

    fn line_of_token(
        &self,
        token: &SyntaxToken,
    ) -> usize {
        self.index.line_of(token.text_range().start().into())
    }

    fn lower_items(
        &mut self,
        items: impl Iterator<Item = Item>,
        namespace: &str,
    ) {
        for item in items {
            match item {
                Item::Namespace(def) => {
                    let name = def.name();
                    let qualified = match (namespace.is_empty(), name.is_empty()) {
                        (_, true) => namespace.to_string(),
                        (true, false) => name,
                        (false, false) => format!("{namespace}::{name}"),
                    };
                    if let Some(body) = def.body() {
                        self.lower_items(body.items(), &qualified);
                    }
                },
                Item::Linkage(spec) => self.lower_items(spec.items().into_iter(), namespace),
                Item::Class(def) => {
                    let mut classes = Vec::new();
                    self.lower_class(&def, &mut classes);
                    self.ast.classes.extend(classes);
                },
                Item::Function(decl) if !namespace.is_empty() => {
                    if let Some(function) = self.lower_method(&decl, None, MethodCategory::Public) {
                        self.push_namespace_function(namespace, function);
                    }
                },
                Item::Function(_) | Item::Enum(_) | Item::Other(_) => {},
            }
        }
    }

    fn push_namespace_function(
        &mut self,
        namespace: &str,
        function: MethodDescriptor,
    ) {
        match self.ast.namespaces.iter_mut().find(|ns| ns.name == namespace) {
            Some(ns) => ns.functions.push(function),
            None => self.ast.namespaces.push(NamespaceDescriptor {
                name: namespace.to_string(),
                line: function.line,
                functions: vec![function],
            }),
        }
    }

    fn lower_class(
        &self,
        def: &ClassDef,
        out: &mut Vec<ClassDescriptor>,
    ) {
        let keyword = match def.keyword().map(|token| token.kind()) {
            Some(SyntaxKind::KwClass) => ClassKeyword::Class,
            Some(SyntaxKind::KwStruct) => ClassKeyword::Struct,
            _ => return,
        };
        let Some(name) = def.name_token().map(|token| token.text().to_string()) else {
            return;
        };
        let default_category = match keyword {
            ClassKeyword::Class => MethodCategory::Private,
            ClassKeyword::Struct => MethodCategory::Public,
        };

        let bases = def
            .base_list()
            .map(|list| {
                list.bases()
                    .filter_map(|spec| {
                        let access = match spec.access() {
                            Some(SyntaxKind::KwPublic) => Access::Public,
                            Some(SyntaxKind::KwProtected) => Access::Protected,
                            Some(_) => Access::Private,
                            None => default_category.access(),
                        };
                        let name = render_type(&spec.type_tokens());
                        (!name.is_empty()).then_some(BaseClass { access, name })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut class = ClassDescriptor {
            name,
            keyword,
            bases,
            enums: Vec::new(),
            methods: Vec::new(),
            line: self.line_of_node(def.syntax()),
        };
        let mut nested = Vec::new();

        if let Some(body) = def.body() {
            let mut category = default_category;
            for member in body.members() {
                match member {
                    Member::Access(label) => category = access_category(&label).unwrap_or(category),
                    Member::Enum(def) => {
                        if let Some(descriptor) = self.lower_enum(&def, category.access()) {
                            class.enums.push(descriptor);
                        }
                    },
                    Member::Function(decl) => {
                        if let Some(method) = self.lower_method(&decl, Some(class.name.as_str()), category) {
                            class.methods.push(method);
                        }
                    },
                    Member::Class(def) => self.lower_class(&def, &mut nested),
                    Member::Other(node) if node.kind() == SyntaxKind::TemplateDef => {
                        debug!("Skipping template member of {} at line {}", class.name, self.line_of_node(&node));
                    },
                    Member::Other(_) => {},
                }
            }
        }

        out.push(class);
        out.extend(nested);
    }

    fn lower_enum(
        &self,
        def: &EnumDef,
        access: Access,
    ) -> Option<EnumDescriptor> {
        let enumerators = def
            .enumerators()
            .filter_map(|enumerator| {
                let name = enumerator.name_token()?.text().to_string();
                let value = enumerator
                    .value()
                    .map(|value| render_spaced(&value.expression_tokens()))
                    .filter(|value| !value.is_empty());
                Some(EnumeratorDescriptor { name, value })
            })
            .collect();

        Some(EnumDescriptor {
            name: def.name_token().map(|token| token.text().to_string()),
            enumerators,
            access,
            line: self.line_of_token(&def.keyword()?),
        })
    }

    fn lower_method(
        &self,
        decl: &FunctionDecl,
        class_name: Option<&str>,
        category: MethodCategory,
    ) -> Option<MethodDescriptor> {
        let name_node = decl.name()?;
        let name_tokens = name_node.tokens();
        let line = self.line_of_token(name_tokens.first()?);
        let is_destructor = name_tokens.first().is_some_and(|token| token.kind() == SyntaxKind::Tilde);
        let name = render_type(
            &name_tokens
                .into_iter()
                .filter(|token| token.kind() != SyntaxKind::Tilde)
                .collect::<Vec<_>>(),
        );

        let specifiers = decl.specifiers();
        let mut is_virtual = specifiers.contains(&SyntaxKind::KwVirtual);
        let mut is_explicit = specifiers.contains(&SyntaxKind::KwExplicit);

        let mut return_tokens = Vec::new();
        if let Some(type_ref) = decl.return_type() {
            for token in strip_annotation_macros(type_ref.tokens()) {
                match token.kind() {
                    SyntaxKind::KwVirtual => is_virtual = true,
                    SyntaxKind::KwExplicit => is_explicit = true,
                    _ => return_tokens.push(token),
                }
            }
        }
        let return_type = render_type(&return_tokens);

        let is_constructor = return_type.is_empty() && !is_destructor && class_name == Some(name.as_str());
        if return_type.is_empty() && !is_constructor && !is_destructor && !name.starts_with("operator") {
            debug!("Skipping {name} at line {line}: no return type");
            return None;
        }

        let params: Vec<Parameter> = decl.parameters().collect();
        if let Some(form) = params.iter().find_map(unsupported_declarator) {
            debug!("Skipping {name} at line {line}: {form} parameter");
            return None;
        }
        let parameters = params.iter().filter_map(lower_parameter).collect();
        let is_const = decl
            .qualifier_tokens()
            .iter()
            .any(|token| token.kind() == SyntaxKind::KwConst);

        Some(MethodDescriptor {
            name,
            return_type,
            parameters,
            is_constructor,
            is_destructor,
            is_virtual,
            is_explicit,
            is_const,
            category,
            line,
        })
    }

    fn lower_conditionals(
        &mut self,
        root: &SyntaxNode,
    ) -> Result<()> {
        let directives: Vec<SyntaxNode> = root
            .descendants()
            .filter(|node| node.kind() >= SyntaxKind::PreprocInclude)
            .collect();

        for (position, node) in directives.iter().enumerate() {
            let kind = match node.kind() {
                SyntaxKind::PreprocIf => ConditionalKind::If,
                SyntaxKind::PreprocIfdef => ConditionalKind::IfDef,
                SyntaxKind::PreprocIfndef => ConditionalKind::IfNDef,
                SyntaxKind::PreprocElse => ConditionalKind::Else,
                SyntaxKind::PreprocEndif => ConditionalKind::EndIf,
                SyntaxKind::PreprocElif => {
                    return Err(SipgenError::DirectiveMisalignment {
                        line: self.line_of_node(node),
                        expected: "#if, #ifdef, #ifndef, #else or #endif".to_string(),
                        found: normalize_directive(&node.text().to_string()),
                    });
                },
                _ => continue,
            };

            let text = normalize_directive(&node.text().to_string());
            let condition = text
                .split_once(' ')
                .map(|(_, condition)| condition.to_string())
                .unwrap_or_default();

            if self.ast.conditionals.is_empty()
                && kind == ConditionalKind::IfNDef
                && let Some(next) = directives.get(position + 1)
                && next.kind() == SyntaxKind::PreprocDefine
                && defined_symbol(next).as_deref() == Some(condition.as_str())
            {
                self.ast.include_guard = Some(condition.clone());
            }

            self.ast.conditionals.push(ConditionalDirective {
                kind,
                condition,
                text,
                line: self.line_of_node(node),
            });
        }
        Ok(())
    }
}

fn access_category(label: &AccessLabel) -> Option<MethodCategory> {
    let words = label.words();
    let slots = words.len() > 1;
    match (words.first()?.as_str(), slots) {
        ("public", false) => Some(MethodCategory::Public),
        ("public", true) => Some(MethodCategory::PublicSlot),
        ("protected", false) => Some(MethodCategory::Protected),
        ("protected", true) => Some(MethodCategory::ProtectedSlot),
        ("private", _) => Some(MethodCategory::Private),
        ("signals" | "Q_SIGNALS", _) => Some(MethodCategory::Signal),
        _ => None,
    }
}

/// Declarator forms with no SIP spelling: function pointers and arrays.
fn unsupported_declarator(param: &Parameter) -> Option<&'static str> {
    if param
        .declarator_tokens()
        .iter()
        .any(|token| token.kind() == SyntaxKind::LBracket)
    {
        return Some("array");
    }
    let mut angle = 0usize;
    for token in strip_annotation_macros(param.type_ref()?.tokens()) {
        match token.kind() {
            SyntaxKind::Less => angle += 1,
            SyntaxKind::Greater => angle = angle.saturating_sub(1),
            SyntaxKind::LParen if angle == 0 => return Some("function pointer"),
            SyntaxKind::LBracket if angle == 0 => return Some("array"),
            _ => {},
        }
    }
    None
}

fn lower_parameter(param: &Parameter) -> Option<ParameterDescriptor> {
    let type_tokens = strip_annotation_macros(param.type_ref()?.tokens());
    let name = param.name_token().map(|token| token.text().to_string());

    if name.is_none() && type_tokens.len() == 1 && type_tokens[0].kind() == SyntaxKind::KwVoid {
        return None;
    }

    let mut is_const = false;
    let mut is_pointer = false;
    let mut is_reference = false;
    let mut raw = Vec::with_capacity(type_tokens.len());
    let mut angle = 0usize;

    for token in type_tokens {
        match token.kind() {
            SyntaxKind::Less => angle += 1,
            SyntaxKind::Greater => angle = angle.saturating_sub(1),
            SyntaxKind::KwConst if angle == 0 => {
                is_const = true;
                continue;
            },
            SyntaxKind::Star if angle == 0 => {
                is_pointer = true;
                continue;
            },
            SyntaxKind::Amp | SyntaxKind::AndAnd if angle == 0 => {
                is_reference = true;
                continue;
            },
            _ => {},
        }
        raw.push(token);
    }

    Some(ParameterDescriptor {
        raw_type: render_type(&raw),
        is_pointer,
        is_reference,
        is_const,
        default_value: param
            .default_value()
            .map(|value| render_spaced(&value.expression_tokens()))
            .filter(|value| !value.is_empty()),
        name,
    })
}

fn defined_symbol(node: &SyntaxNode) -> Option<String> {
    significant_tokens(node)
        .filter(|token| token.kind() == SyntaxKind::Ident)
        .nth(1)
        .map(|token| token.text().to_string())
}

#[cfg(test)]
#[path = "../../tests/src/header/lower_tests.rs"]
mod tests;
