use crate::syntax::cst::{SyntaxNode, SyntaxToken};
use crate::syntax::kind::SyntaxKind;

pub trait AstNode: Sized {
    fn cast(syntax: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

macro_rules! ast_node {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn cast(syntax: SyntaxNode) -> Option<Self> {
                if syntax.kind() == SyntaxKind::$name {
                    Some(Self { syntax })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    };
}

ast_node!(Root);
ast_node!(NamespaceDef);
ast_node!(Block);
ast_node!(LinkageSpec);
ast_node!(ClassDef);
ast_node!(BaseList);
ast_node!(BaseSpec);
ast_node!(ClassBody);
ast_node!(AccessLabel);
ast_node!(EnumDef);
ast_node!(Enumerator);
ast_node!(EnumValue);
ast_node!(FunctionDecl);
ast_node!(TypeRef);
ast_node!(FunctionName);
ast_node!(Parameter);
ast_node!(DefaultValue);

/// Direct child tokens of a node, skipping whitespace and comments.
pub fn significant_tokens(syntax: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> {
    syntax
        .children_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| !token.kind().is_trivia())
}

/// Every token below a node, skipping trivia and nested directives.
pub fn descendant_tokens(syntax: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> {
    syntax
        .descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| !token.kind().is_trivia())
        .filter(|token| {
            !token
                .parent_ancestors()
                .any(|node| node.kind() >= SyntaxKind::PreprocInclude)
        })
}

/// A top-level or namespace-level declaration.
#[derive(Debug, Clone)]
pub enum Item {
    Namespace(NamespaceDef),
    Linkage(LinkageSpec),
    Class(ClassDef),
    Enum(EnumDef),
    Function(FunctionDecl),
    Other(SyntaxNode),
}

impl Item {
    fn from_node(syntax: SyntaxNode) -> Self {
        match syntax.kind() {
            SyntaxKind::NamespaceDef => Item::Namespace(NamespaceDef { syntax }),
            SyntaxKind::LinkageSpec => Item::Linkage(LinkageSpec { syntax }),
            SyntaxKind::ClassDef => Item::Class(ClassDef { syntax }),
            SyntaxKind::EnumDef => Item::Enum(EnumDef { syntax }),
            SyntaxKind::FunctionDecl => Item::Function(FunctionDecl { syntax }),
            _ => Item::Other(syntax),
        }
    }
}

fn items_of(syntax: &SyntaxNode) -> impl Iterator<Item = Item> {
    syntax.children().map(Item::from_node)
}

impl Root {
    pub fn items(&self) -> impl Iterator<Item = Item> {
        items_of(&self.syntax)
    }
}

impl NamespaceDef {
    /// `a::b` for `namespace a::b`, empty for anonymous namespaces.
    pub fn name(&self) -> String {
        significant_tokens(&self.syntax)
            .filter(|token| matches!(token.kind(), SyntaxKind::Ident | SyntaxKind::DoubleColon))
            .map(|token| token.text().to_string())
            .collect()
    }

    pub fn body(&self) -> Option<Block> {
        self.syntax.children().find_map(Block::cast)
    }
}

impl Block {
    pub fn items(&self) -> impl Iterator<Item = Item> {
        items_of(&self.syntax)
    }
}

impl LinkageSpec {
    pub fn items(&self) -> Vec<Item> {
        match self.syntax.children().find_map(Block::cast) {
            Some(block) => block.items().collect(),
            None => items_of(&self.syntax).collect(),
        }
    }
}

impl ClassDef {
    pub fn keyword(&self) -> Option<SyntaxToken> {
        significant_tokens(&self.syntax).next()
    }

    /// The last identifier before the base list or body, so attribute
    /// macros between the keyword and the name are ignored.
    pub fn name_token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .take_while(|element| {
                !matches!(
                    element.kind(),
                    SyntaxKind::BaseList | SyntaxKind::ClassBody | SyntaxKind::Less
                )
            })
            .filter_map(|element| element.into_token())
            .filter(|token| token.kind() == SyntaxKind::Ident && !matches!(token.text(), "final"))
            .last()
    }

    pub fn base_list(&self) -> Option<BaseList> {
        self.syntax.children().find_map(BaseList::cast)
    }

    pub fn body(&self) -> Option<ClassBody> {
        self.syntax.children().find_map(ClassBody::cast)
    }
}

impl BaseList {
    pub fn bases(&self) -> impl Iterator<Item = BaseSpec> {
        self.syntax.children().filter_map(BaseSpec::cast)
    }
}

impl BaseSpec {
    pub fn access(&self) -> Option<SyntaxKind> {
        descendant_tokens(&self.syntax)
            .map(|token| token.kind())
            .find(|kind| matches!(kind, SyntaxKind::KwPublic | SyntaxKind::KwProtected | SyntaxKind::KwPrivate))
    }

    /// Tokens naming the base type, without access and `virtual`.
    pub fn type_tokens(&self) -> Vec<SyntaxToken> {
        descendant_tokens(&self.syntax)
            .filter(|token| {
                !matches!(
                    token.kind(),
                    SyntaxKind::KwPublic | SyntaxKind::KwProtected | SyntaxKind::KwPrivate | SyntaxKind::KwVirtual
                )
            })
            .collect()
    }
}

/// A member of a class body.
#[derive(Debug, Clone)]
pub enum Member {
    Access(AccessLabel),
    Enum(EnumDef),
    Function(FunctionDecl),
    Class(ClassDef),
    Other(SyntaxNode),
}

impl ClassBody {
    pub fn members(&self) -> impl Iterator<Item = Member> {
        self.syntax.children().map(|syntax| match syntax.kind() {
            SyntaxKind::AccessLabel => Member::Access(AccessLabel { syntax }),
            SyntaxKind::EnumDef => Member::Enum(EnumDef { syntax }),
            SyntaxKind::FunctionDecl => Member::Function(FunctionDecl { syntax }),
            SyntaxKind::ClassDef => Member::Class(ClassDef { syntax }),
            _ => Member::Other(syntax),
        })
    }
}

impl AccessLabel {
    pub fn words(&self) -> Vec<String> {
        significant_tokens(&self.syntax)
            .filter(|token| token.kind() != SyntaxKind::Colon)
            .map(|token| token.text().to_string())
            .collect()
    }
}

impl EnumDef {
    pub fn keyword(&self) -> Option<SyntaxToken> {
        significant_tokens(&self.syntax).next()
    }

    /// Name of the enum, `None` for anonymous enums.
    pub fn name_token(&self) -> Option<SyntaxToken> {
        significant_tokens(&self.syntax)
            .take_while(|token| !matches!(token.kind(), SyntaxKind::Colon | SyntaxKind::LBrace))
            .filter(|token| token.kind() == SyntaxKind::Ident)
            .last()
    }

    pub fn enumerators(&self) -> impl Iterator<Item = Enumerator> {
        self.syntax
            .children()
            .filter(|node| node.kind() == SyntaxKind::EnumBody)
            .flat_map(|body| body.children().filter_map(Enumerator::cast).collect::<Vec<_>>())
    }
}

impl Enumerator {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        significant_tokens(&self.syntax).find(|token| token.kind() == SyntaxKind::Ident)
    }

    pub fn value(&self) -> Option<EnumValue> {
        self.syntax.children().find_map(EnumValue::cast)
    }
}

impl EnumValue {
    /// The expression after `=`.
    pub fn expression_tokens(&self) -> Vec<SyntaxToken> {
        descendant_tokens(&self.syntax)
            .skip_while(|token| token.kind() == SyntaxKind::Equal)
            .collect()
    }
}

impl FunctionDecl {
    pub fn specifiers(&self) -> Vec<SyntaxKind> {
        self.syntax
            .children()
            .filter(|node| node.kind() == SyntaxKind::Specifiers)
            .flat_map(|node| significant_tokens(&node).map(|token| token.kind()).collect::<Vec<_>>())
            .collect()
    }

    pub fn return_type(&self) -> Option<TypeRef> {
        self.syntax.children().find_map(TypeRef::cast)
    }

    pub fn name(&self) -> Option<FunctionName> {
        self.syntax.children().find_map(FunctionName::cast)
    }

    pub fn parameters(&self) -> impl Iterator<Item = Parameter> {
        self.syntax
            .children()
            .filter(|node| node.kind() == SyntaxKind::ParameterList)
            .flat_map(|list| list.children().filter_map(Parameter::cast).collect::<Vec<_>>())
    }

    pub fn qualifier_tokens(&self) -> Vec<SyntaxToken> {
        self.syntax
            .children()
            .filter(|node| node.kind() == SyntaxKind::Qualifiers)
            .flat_map(|node| descendant_tokens(&node).collect::<Vec<_>>())
            .collect()
    }
}

impl TypeRef {
    pub fn tokens(&self) -> Vec<SyntaxToken> {
        descendant_tokens(&self.syntax).collect()
    }
}

impl FunctionName {
    pub fn tokens(&self) -> Vec<SyntaxToken> {
        descendant_tokens(&self.syntax).collect()
    }
}

impl Parameter {
    pub fn type_ref(&self) -> Option<TypeRef> {
        self.syntax.children().find_map(TypeRef::cast)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        significant_tokens(&self.syntax).find(|token| token.kind() == SyntaxKind::Ident)
    }

    /// Tokens after the type: the name and any array extents.
    pub fn declarator_tokens(&self) -> Vec<SyntaxToken> {
        significant_tokens(&self.syntax).collect()
    }

    pub fn default_value(&self) -> Option<DefaultValue> {
        self.syntax.children().find_map(DefaultValue::cast)
    }
}

impl DefaultValue {
    pub fn expression_tokens(&self) -> Vec<SyntaxToken> {
        descendant_tokens(&self.syntax)
            .skip_while(|token| token.kind() == SyntaxKind::Equal)
            .collect()
    }
}
