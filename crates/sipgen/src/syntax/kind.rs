use logos::Logos;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // Tokens
    Error = 0,
    Whitespace,
    Comment,

    // Identifiers & Literals
    Ident,
    Integer,
    Float,
    String,
    Char,

    // Preprocessor / punctuation
    Hash,
    HashHash,
    Backslash,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Colon,
    Comma,
    Dot,
    Ellipsis,
    Arrow,
    DoubleColon,
    Question,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Amp,
    Pipe,
    Tilde,
    Exclaim,
    Equal,
    Less,
    Greater,
    PlusPlus,
    MinusMinus,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    AmpEqual,
    PipeEqual,
    EqualEqual,
    NotEqual,
    LessEqual,
    GreaterEqual,
    AndAnd,
    OrOr,
    LeftShift,

    // C/C++ Keywords
    KwAuto,
    KwBool,
    KwChar,
    KwClass,
    KwConst,
    KwConstexpr,
    KwDefault,
    KwDelete,
    KwDouble,
    KwEnum,
    KwExplicit,
    KwExtern,
    KwFalse,
    KwFloat,
    KwFriend,
    KwInline,
    KwInt,
    KwLong,
    KwMutable,
    KwNamespace,
    KwNoexcept,
    KwNullptr,
    KwOperator,
    KwPrivate,
    KwProtected,
    KwPublic,
    KwShort,
    KwSigned,
    KwStatic,
    KwStruct,
    KwTemplate,
    KwThrow,
    KwTrue,
    KwTypedef,
    KwTypename,
    KwUnion,
    KwUnsigned,
    KwUsing,
    KwVirtual,
    KwVoid,
    KwVolatile,
    KwWchar,

    // Composite Nodes (Parser output)
    Root,
    NamespaceDef,
    ClassDef,
    BaseList,
    BaseSpec,
    ClassBody,
    AccessLabel,
    EnumDef,
    EnumBody,
    Enumerator,
    EnumValue,
    FunctionDecl,
    Specifiers,
    TypeRef,
    FunctionName,
    ParameterList,
    Parameter,
    DefaultValue,
    Qualifiers,
    CtorInitializer,
    Block,
    TemplateDef,
    TemplateParams,
    TypedefDef,
    UsingDef,
    FriendDecl,
    ForwardDecl,
    FieldDef,
    LinkageSpec,
    MacroCall,
    PreprocInclude,
    PreprocDefine,
    PreprocIf,
    PreprocIfdef,
    PreprocIfndef,
    PreprocElse,
    PreprocElif,
    PreprocEndif,
    PreprocOther,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::Whitespace | SyntaxKind::Comment)
    }

    /// Tokens that render as a word and need a separating space from a
    /// neighbouring word (`unsigned int`, `const QString`).
    pub fn is_word(self) -> bool {
        matches!(self, SyntaxKind::Ident | SyntaxKind::Integer | SyntaxKind::Float)
            || (self >= SyntaxKind::KwAuto && self <= SyntaxKind::KwWchar)
    }

    pub fn is_conditional_directive(self) -> bool {
        matches!(
            self,
            SyntaxKind::PreprocIf
                | SyntaxKind::PreprocIfdef
                | SyntaxKind::PreprocIfndef
                | SyntaxKind::PreprocElse
                | SyntaxKind::PreprocElif
                | SyntaxKind::PreprocEndif
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(error = ())]
pub enum TokenKind {
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//.*", allow_greedy = true)]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,

    // Preprocessor tokens
    #[token("##")]
    HashHash,
    #[token("#")]
    Hash,
    #[token("\\")]
    Backslash,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token("...")]
    Ellipsis,
    #[token("->")]
    Arrow,
    #[token(".")]
    Dot,
    #[token("::")]
    DoubleColon,
    #[token("?")]
    Question,

    // Operators (multi-char first)
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+=")]
    PlusEqual,
    #[token("-=")]
    MinusEqual,
    #[token("*=")]
    StarEqual,
    #[token("/=")]
    SlashEqual,
    #[token("&=")]
    AmpEqual,
    #[token("|=")]
    PipeEqual,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    NotEqual,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("<<")]
    LeftShift,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("~")]
    Tilde,
    #[token("!")]
    Exclaim,
    #[token("=")]
    Equal,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,

    // Keywords (C/C++)
    #[token("auto")]
    KwAuto,
    #[token("bool")]
    KwBool,
    #[token("char")]
    KwChar,
    #[token("class")]
    KwClass,
    #[token("const")]
    KwConst,
    #[token("constexpr")]
    KwConstexpr,
    #[token("default")]
    KwDefault,
    #[token("delete")]
    KwDelete,
    #[token("double")]
    KwDouble,
    #[token("enum")]
    KwEnum,
    #[token("explicit")]
    KwExplicit,
    #[token("extern")]
    KwExtern,
    #[token("false")]
    KwFalse,
    #[token("float")]
    KwFloat,
    #[token("friend")]
    KwFriend,
    #[token("inline")]
    KwInline,
    #[token("int")]
    KwInt,
    #[token("long")]
    KwLong,
    #[token("mutable")]
    KwMutable,
    #[token("namespace")]
    KwNamespace,
    #[token("noexcept")]
    KwNoexcept,
    #[token("nullptr")]
    KwNullptr,
    #[token("operator")]
    KwOperator,
    #[token("private")]
    KwPrivate,
    #[token("protected")]
    KwProtected,
    #[token("public")]
    KwPublic,
    #[token("short")]
    KwShort,
    #[token("signed")]
    KwSigned,
    #[token("static")]
    KwStatic,
    #[token("struct")]
    KwStruct,
    #[token("template")]
    KwTemplate,
    #[token("throw")]
    KwThrow,
    #[token("true")]
    KwTrue,
    #[token("typedef")]
    KwTypedef,
    #[token("typename")]
    KwTypename,
    #[token("union")]
    KwUnion,
    #[token("unsigned")]
    KwUnsigned,
    #[token("using")]
    KwUsing,
    #[token("virtual")]
    KwVirtual,
    #[token("void")]
    KwVoid,
    #[token("volatile")]
    KwVolatile,
    #[token("wchar_t")]
    KwWchar,

    // Literals
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    Char,
    #[regex(r#""([^"\\\n]|\\[\s\S])*""#)]
    String,
    #[regex(r"0[xX][0-9A-Fa-f](_?[0-9A-Fa-f])*([uUlL]+)?")]
    #[regex(r"0[bB][01](_?[01])*([uUlL]+)?")]
    #[regex(r"0[0-7](_?[0-7])*([uUlL]+)?")]
    #[regex(r"[0-9](_?[0-9])*([uUlL]+)?")]
    Integer,
    #[regex(r"[0-9](_?[0-9])*\.[0-9](_?[0-9])*([eE][+-]?[0-9](_?[0-9])*)?([fFlL]+)?")]
    #[regex(r"\.[0-9](_?[0-9])*([eE][+-]?[0-9](_?[0-9])*)?([fFlL]+)?")]
    #[regex(r"[0-9](_?[0-9])*[eE][+-]?[0-9](_?[0-9])*([fFlL]+)?")]
    #[regex(r"[0-9](_?[0-9])*\.([fFlL]+)?")]
    Float,
}

/// Every token kind has a syntax kind of the same name.
macro_rules! token_to_syntax {
    ($token:expr; $($kind:ident),* $(,)?) => {
        match $token {
            $(TokenKind::$kind => SyntaxKind::$kind,)*
        }
    };
}

impl From<TokenKind> for SyntaxKind {
    fn from(token: TokenKind) -> Self {
        token_to_syntax!(
            token;
            Whitespace, Comment, Hash, HashHash, Backslash, LParen, RParen, LBrace, RBrace, LBracket,
            RBracket, Semicolon, Colon, Comma, Ellipsis, Arrow, Dot, DoubleColon, Question, PlusPlus,
            MinusMinus, PlusEqual, MinusEqual, StarEqual, SlashEqual, AmpEqual, PipeEqual, EqualEqual,
            NotEqual, LessEqual, GreaterEqual, AndAnd, OrOr, LeftShift, Plus, Minus, Star, Slash,
            Percent, Caret, Amp, Pipe, Tilde, Exclaim, Equal, Less, Greater, KwAuto, KwBool, KwChar,
            KwClass, KwConst, KwConstexpr, KwDefault, KwDelete, KwDouble, KwEnum, KwExplicit, KwExtern,
            KwFalse, KwFloat, KwFriend, KwInline, KwInt, KwLong, KwMutable, KwNamespace, KwNoexcept,
            KwNullptr, KwOperator, KwPrivate, KwProtected, KwPublic, KwShort, KwSigned, KwStatic,
            KwStruct, KwTemplate, KwThrow, KwTrue, KwTypedef, KwTypename, KwUnion, KwUnsigned, KwUsing,
            KwVirtual, KwVoid, KwVolatile, KwWchar, Ident, Char, String, Integer, Float,
        )
    }
}
