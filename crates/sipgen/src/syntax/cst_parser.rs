use rowan::{GreenNode, GreenNodeBuilder};

use crate::syntax::{helpers::is_annotation_macro, kind::SyntaxKind, lexer::Lexer};

/// A structural problem found while building the tree. The tree is still
/// produced; callers decide whether errors are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    File,
    Class,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Record {
    Definition,
    Forward,
    Declaration,
}

/// Token positions of a function declarator: where the name starts and
/// where its parameter list opens.
#[derive(Debug, Clone, Copy)]
struct FunctionHead {
    name_start: usize,
    lparen: usize,
}

pub struct Parser<'a> {
    tokens: Vec<(SyntaxKind, &'a str)>,
    offsets: Vec<usize>,
    directives: Vec<Option<u32>>,
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let tokens: Vec<_> = Lexer::new(input).collect();
        let mut offsets = Vec::with_capacity(tokens.len());
        let mut offset = 0usize;
        for (_, text) in &tokens {
            offsets.push(offset);
            offset += text.len();
        }
        let directives = mark_directives(&tokens);
        Self {
            tokens,
            offsets,
            directives,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    pub fn parse(mut self) -> (GreenNode, Vec<SyntaxError>) {
        self.start_node(SyntaxKind::Root);
        self.parse_root();
        self.finish_node();
        (self.builder.finish(), self.errors)
    }

    fn start_node(
        &mut self,
        kind: SyntaxKind,
    ) {
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn parse_root(&mut self) {
        loop {
            self.skip_trivia();
            if self.is_eof() {
                break;
            }
            if self.at(SyntaxKind::RBrace) {
                self.error("unmatched `}`");
                self.bump();
                continue;
            }
            self.parse_item(Scope::File);
        }
    }

    fn parse_item(
        &mut self,
        scope: Scope,
    ) {
        match self.peek() {
            SyntaxKind::KwNamespace => self.parse_namespace_def(),
            SyntaxKind::KwClass | SyntaxKind::KwStruct | SyntaxKind::KwUnion => match self.classify_record() {
                Record::Definition => self.parse_class_def(),
                Record::Forward => self.parse_simple(SyntaxKind::ForwardDecl),
                Record::Declaration => self.parse_declaration(),
            },
            SyntaxKind::KwEnum => {
                if self.enum_has_body() {
                    self.parse_enum_def();
                } else {
                    self.parse_simple(SyntaxKind::ForwardDecl);
                }
            },
            SyntaxKind::KwTemplate => self.parse_template_def(scope),
            SyntaxKind::KwTypedef => self.parse_simple(SyntaxKind::TypedefDef),
            SyntaxKind::KwUsing => self.parse_simple(SyntaxKind::UsingDef),
            SyntaxKind::KwFriend => self.parse_simple(SyntaxKind::FriendDecl),
            SyntaxKind::KwExtern if self.nth_significant_kind(1) == Some(SyntaxKind::String) => {
                self.parse_linkage_spec(scope);
            },
            SyntaxKind::KwPublic | SyntaxKind::KwProtected | SyntaxKind::KwPrivate | SyntaxKind::Ident
                if scope == Scope::Class && self.at_access_label() =>
            {
                self.parse_access_label();
            },
            SyntaxKind::Semicolon => self.bump(),
            SyntaxKind::Ident if self.at_macro_call(scope) => self.parse_macro_call(),
            _ => self.parse_declaration(),
        }
    }

    fn parse_preprocessor(&mut self) {
        let Some(id) = self.directives.get(self.pos).copied().flatten() else {
            return;
        };
        let kind = self.directive_kind();

        self.start_node(kind);
        while !self.is_eof() && self.directives[self.pos] == Some(id) {
            self.bump();
        }
        self.finish_node();
    }

    fn directive_kind(&self) -> SyntaxKind {
        let id = self.directives[self.pos];
        let name = (self.pos + 1..self.tokens.len())
            .take_while(|idx| self.directives[*idx] == id)
            .map(|idx| self.tokens[idx])
            .find(|(kind, _)| !kind.is_trivia())
            .map(|(_, text)| text)
            .unwrap_or_default();

        match name {
            "include" => SyntaxKind::PreprocInclude,
            "define" => SyntaxKind::PreprocDefine,
            "if" => SyntaxKind::PreprocIf,
            "ifdef" => SyntaxKind::PreprocIfdef,
            "ifndef" => SyntaxKind::PreprocIfndef,
            "elif" => SyntaxKind::PreprocElif,
            "else" => SyntaxKind::PreprocElse,
            "endif" => SyntaxKind::PreprocEndif,
            _ => SyntaxKind::PreprocOther,
        }
    }

    fn parse_namespace_def(&mut self) {
        self.start_node(SyntaxKind::NamespaceDef);
        self.bump(); // namespace keyword
        self.skip_trivia();
        while self.at(SyntaxKind::Ident) || self.at(SyntaxKind::DoubleColon) {
            self.bump();
            self.skip_trivia();
        }
        if self.at(SyntaxKind::LBrace) {
            self.parse_body(SyntaxKind::Block, Scope::File, "namespace body");
        } else {
            // namespace alias: `namespace short = long::name;`
            self.consume_until_semicolon();
        }
        self.finish_node();
    }

    fn parse_linkage_spec(
        &mut self,
        scope: Scope,
    ) {
        self.start_node(SyntaxKind::LinkageSpec);
        self.bump(); // extern
        self.skip_trivia();
        self.bump(); // "C"
        self.skip_trivia();
        if self.at(SyntaxKind::LBrace) {
            self.parse_body(SyntaxKind::Block, Scope::File, "linkage block");
        } else if !self.is_eof() && !self.at(SyntaxKind::RBrace) {
            self.parse_item(scope);
        }
        self.finish_node();
    }

    fn parse_class_def(&mut self) {
        self.start_node(SyntaxKind::ClassDef);
        self.bump(); // class/struct/union keyword

        // Name, template arguments of a specialization, `final`.
        loop {
            self.skip_trivia();
            if self.is_eof() || self.at(SyntaxKind::Colon) || self.at(SyntaxKind::LBrace) {
                break;
            }
            self.bump();
        }

        if self.at(SyntaxKind::Colon) {
            self.parse_base_list();
        }
        self.skip_trivia();
        if self.at(SyntaxKind::LBrace) {
            self.parse_body(SyntaxKind::ClassBody, Scope::Class, "class body");
        }
        self.finish_declarators();
        self.finish_node();
    }

    fn parse_base_list(&mut self) {
        self.start_node(SyntaxKind::BaseList);
        self.bump(); // ':'
        loop {
            self.skip_trivia();
            if self.is_eof() || self.at(SyntaxKind::LBrace) {
                break;
            }
            if self.at(SyntaxKind::Comma) {
                self.bump();
                continue;
            }

            self.start_node(SyntaxKind::BaseSpec);
            let mut angle = 0usize;
            while !self.is_eof() {
                if self.directive_at(self.pos) {
                    self.parse_preprocessor();
                    continue;
                }
                match self.peek() {
                    SyntaxKind::Less => angle += 1,
                    SyntaxKind::Greater => angle = angle.saturating_sub(1),
                    SyntaxKind::Comma if angle == 0 => break,
                    SyntaxKind::LBrace => break,
                    _ => {},
                }
                self.bump();
            }
            self.finish_node();
        }
        self.finish_node();
    }

    fn parse_enum_def(&mut self) {
        self.start_node(SyntaxKind::EnumDef);
        self.bump(); // enum keyword
        loop {
            self.skip_trivia();
            if self.is_eof() || self.at(SyntaxKind::LBrace) {
                break;
            }
            self.bump();
        }

        if self.at(SyntaxKind::LBrace) {
            self.start_node(SyntaxKind::EnumBody);
            self.bump();
            loop {
                self.skip_trivia();
                if self.is_eof() {
                    self.error("expected `}` to close enum body");
                    break;
                }
                match self.peek() {
                    SyntaxKind::RBrace => {
                        self.bump();
                        break;
                    },
                    SyntaxKind::Comma => self.bump(),
                    _ => self.parse_enumerator(),
                }
            }
            self.finish_node();
        }
        self.finish_declarators();
        self.finish_node();
    }

    fn parse_enumerator(&mut self) {
        self.start_node(SyntaxKind::Enumerator);
        let mut depth = 0usize;
        while !self.is_eof() {
            if depth == 0 && self.directive_at(self.pos) {
                break;
            }
            match self.peek() {
                SyntaxKind::LParen => depth += 1,
                SyntaxKind::RParen => depth = depth.saturating_sub(1),
                SyntaxKind::Comma | SyntaxKind::RBrace if depth == 0 => break,
                SyntaxKind::Equal if depth == 0 => {
                    self.parse_enum_value();
                    break;
                },
                _ => {},
            }
            self.bump();
        }
        self.finish_node();
    }

    fn parse_enum_value(&mut self) {
        self.start_node(SyntaxKind::EnumValue);
        self.bump(); // '='
        let mut depth = 0usize;
        while !self.is_eof() {
            if depth == 0 && self.directive_at(self.pos) {
                break;
            }
            match self.peek() {
                SyntaxKind::LParen => depth += 1,
                SyntaxKind::RParen => depth = depth.saturating_sub(1),
                SyntaxKind::Comma | SyntaxKind::RBrace if depth == 0 => break,
                _ => {},
            }
            self.bump();
        }
        self.finish_node();
    }

    fn parse_template_def(
        &mut self,
        scope: Scope,
    ) {
        self.start_node(SyntaxKind::TemplateDef);
        self.bump(); // template
        self.skip_trivia();

        if self.at(SyntaxKind::Less) {
            self.start_node(SyntaxKind::TemplateParams);
            let mut angle = 0usize;
            while !self.is_eof() {
                let kind = self.peek();
                self.bump();
                match kind {
                    SyntaxKind::Less => angle += 1,
                    SyntaxKind::Greater => {
                        angle = angle.saturating_sub(1);
                        if angle == 0 {
                            break;
                        }
                    },
                    _ => {},
                }
            }
            self.finish_node();
        }

        self.skip_trivia();
        if !self.is_eof() && !self.at(SyntaxKind::RBrace) {
            self.parse_item(scope);
        }
        self.finish_node();
    }

    fn parse_access_label(&mut self) {
        self.start_node(SyntaxKind::AccessLabel);
        while !self.is_eof() {
            self.skip_trivia();
            let done = self.at(SyntaxKind::Colon);
            self.bump();
            if done {
                break;
            }
        }
        self.finish_node();
    }

    fn parse_macro_call(&mut self) {
        self.start_node(SyntaxKind::MacroCall);
        self.bump(); // macro name
        if let Some(next) = self.nth_significant(0)
            && self.tokens[next].0 == SyntaxKind::LParen
        {
            self.bump_until(next);
            self.consume_balanced(SyntaxKind::LParen, SyntaxKind::RParen);
            if let Some(next) = self.nth_significant(0)
                && self.tokens[next].0 == SyntaxKind::Semicolon
                && !self.newline_between(self.pos, next)
            {
                self.bump_until(next);
                self.bump();
            }
        }
        self.finish_node();
    }

    fn parse_declaration(&mut self) {
        match self.scan_function_head() {
            Some(head) => self.parse_function_decl(head),
            None => self.parse_simple(SyntaxKind::FieldDef),
        }
    }

    fn parse_function_decl(
        &mut self,
        head: FunctionHead,
    ) {
        self.start_node(SyntaxKind::FunctionDecl);

        if self.at_specifier() {
            self.start_node(SyntaxKind::Specifiers);
            while self.pos < head.name_start && self.at_specifier() {
                self.bump();
                self.skip_trivia();
            }
            self.finish_node();
        }

        if self.pos < head.name_start {
            self.start_node(SyntaxKind::TypeRef);
            self.bump_until(head.name_start);
            self.finish_node();
        }

        self.start_node(SyntaxKind::FunctionName);
        self.bump_until(head.lparen);
        self.finish_node();

        self.parse_parameter_list();
        self.parse_function_tail();
        self.finish_node();
    }

    fn parse_parameter_list(&mut self) {
        self.start_node(SyntaxKind::ParameterList);
        self.bump(); // '('
        loop {
            self.skip_trivia();
            if self.is_eof() {
                self.error("expected `)` to close parameter list");
                break;
            }
            match self.peek() {
                SyntaxKind::RParen => {
                    self.bump();
                    break;
                },
                SyntaxKind::Comma => self.bump(),
                SyntaxKind::Semicolon | SyntaxKind::RBrace => {
                    self.error("expected `)` to close parameter list");
                    break;
                },
                _ => self.parse_parameter(),
            }
        }
        self.finish_node();
    }

    fn parse_parameter(&mut self) {
        let end = self.parameter_end();
        let default_start = self.parameter_default_start(end);
        let name = self.parameter_name(default_start.unwrap_or(end));

        self.start_node(SyntaxKind::Parameter);
        let type_end = name.or(default_start).unwrap_or(end);
        if self.pos < type_end {
            self.start_node(SyntaxKind::TypeRef);
            self.bump_until(type_end);
            self.finish_node();
        }
        if let Some(name) = name {
            self.bump_until(name);
            self.bump();
        }
        if let Some(default_start) = default_start {
            self.bump_until(default_start);
            self.start_node(SyntaxKind::DefaultValue);
            self.bump_until(end);
            self.finish_node();
        } else {
            self.bump_until(end);
        }
        self.finish_node();
    }

    /// Everything between the closing `)` and the end of the declaration:
    /// qualifiers, then `;`, a constructor initializer, or a body.
    fn parse_function_tail(&mut self) {
        if let Some(next) = self.nth_significant(0)
            && !self.ends_at_line_break(next)
            && !matches!(
                self.tokens[next].0,
                SyntaxKind::Semicolon | SyntaxKind::LBrace | SyntaxKind::Colon | SyntaxKind::RBrace
            )
        {
            self.start_node(SyntaxKind::Qualifiers);
            while let Some(next) = self.nth_significant(0) {
                let kind = self.tokens[next].0;
                if matches!(
                    kind,
                    SyntaxKind::Semicolon | SyntaxKind::LBrace | SyntaxKind::Colon | SyntaxKind::RBrace
                ) || self.ends_at_line_break(next)
                {
                    break;
                }
                self.bump_until(next);
                if kind == SyntaxKind::LParen {
                    self.consume_balanced(SyntaxKind::LParen, SyntaxKind::RParen);
                } else {
                    self.bump();
                }
            }
            self.finish_node();
        }

        let Some(next) = self.nth_significant(0) else {
            return;
        };
        if self.ends_at_line_break(next) {
            return;
        }
        match self.tokens[next].0 {
            SyntaxKind::Semicolon => {
                self.bump_until(next);
                self.bump();
            },
            SyntaxKind::Colon => {
                self.bump_until(next);
                self.parse_ctor_initializer();
                if let Some(next) = self.nth_significant(0)
                    && self.tokens[next].0 == SyntaxKind::LBrace
                {
                    self.bump_until(next);
                    self.parse_block();
                }
            },
            SyntaxKind::LBrace => {
                self.bump_until(next);
                self.parse_block();
            },
            _ => {},
        }
    }

    fn parse_ctor_initializer(&mut self) {
        self.start_node(SyntaxKind::CtorInitializer);
        self.bump(); // ':'
        let mut prev = SyntaxKind::Colon;
        loop {
            self.skip_trivia();
            if self.is_eof() || self.at(SyntaxKind::Semicolon) {
                break;
            }
            match self.peek() {
                SyntaxKind::LParen => self.consume_balanced(SyntaxKind::LParen, SyntaxKind::RParen),
                // `m_value{0}` is a brace initializer, any other `{` opens the body
                SyntaxKind::LBrace if matches!(prev, SyntaxKind::Ident | SyntaxKind::Greater) => {
                    self.consume_balanced(SyntaxKind::LBrace, SyntaxKind::RBrace);
                },
                SyntaxKind::LBrace => break,
                _ => self.bump(),
            }
            prev = self.last_bumped_kind();
        }
        self.finish_node();
    }

    fn parse_block(&mut self) {
        self.start_node(SyntaxKind::Block);
        self.consume_balanced(SyntaxKind::LBrace, SyntaxKind::RBrace);
        self.finish_node();
    }

    fn parse_body(
        &mut self,
        node: SyntaxKind,
        scope: Scope,
        what: &str,
    ) {
        self.start_node(node);
        self.bump(); // '{'
        loop {
            self.skip_trivia();
            if self.is_eof() {
                self.error(format!("expected `}}` to close {what}"));
                break;
            }
            if self.at(SyntaxKind::RBrace) {
                self.bump();
                break;
            }
            self.parse_item(scope);
        }
        self.finish_node();
    }

    /// Declarators trailing a class or enum body (`} instance;`) up to the
    /// terminating `;`.
    fn finish_declarators(&mut self) {
        loop {
            let Some(next) = self.nth_significant(0) else {
                break;
            };
            match self.tokens[next].0 {
                SyntaxKind::RBrace => break,
                SyntaxKind::Semicolon => {
                    self.bump_until(next);
                    self.bump();
                    break;
                },
                _ => {
                    self.bump_until(next);
                    self.bump();
                },
            }
        }
    }

    /// Consume a declaration that needs no inner structure, up to and
    /// including its `;`.
    fn parse_simple(
        &mut self,
        kind: SyntaxKind,
    ) {
        self.start_node(kind);
        let mut depth = 0usize;
        while !self.is_eof() {
            if self.directive_at(self.pos) {
                self.parse_preprocessor();
                continue;
            }
            match self.peek() {
                SyntaxKind::LParen | SyntaxKind::LBrace | SyntaxKind::LBracket => depth += 1,
                SyntaxKind::RParen | SyntaxKind::RBracket => depth = depth.saturating_sub(1),
                SyntaxKind::RBrace => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                    // inline friend definitions end with their body
                    if depth == 0 && kind == SyntaxKind::FriendDecl {
                        self.bump();
                        if self.nth_significant_kind(0) != Some(SyntaxKind::Semicolon) {
                            break;
                        }
                        continue;
                    }
                },
                SyntaxKind::Semicolon if depth == 0 => {
                    self.bump();
                    break;
                },
                _ => {},
            }
            self.bump();
        }
        self.finish_node();
    }

    fn consume_until_semicolon(&mut self) {
        while !self.is_eof() && !self.at(SyntaxKind::RBrace) {
            let done = self.at(SyntaxKind::Semicolon);
            self.bump();
            if done {
                break;
            }
        }
    }

    fn consume_balanced(
        &mut self,
        open: SyntaxKind,
        close: SyntaxKind,
    ) {
        let mut depth = 0usize;
        while !self.is_eof() {
            if self.directive_at(self.pos) {
                self.parse_preprocessor();
                continue;
            }
            let kind = self.peek();
            self.bump();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return;
                }
            }
        }
        if open == SyntaxKind::LBrace {
            self.error("expected `}` to close block");
        } else {
            self.error("expected `)` to close group");
        }
    }

    fn skip_trivia(&mut self) {
        while !self.is_eof() {
            if self.directive_at(self.pos) {
                self.parse_preprocessor();
            } else if self.peek().is_trivia() {
                self.bump();
            } else {
                break;
            }
        }
    }

    /// Bump every token before `idx`, turning directives into nodes.
    fn bump_until(
        &mut self,
        idx: usize,
    ) {
        while self.pos < idx && !self.is_eof() {
            if self.directive_at(self.pos) {
                self.parse_preprocessor();
            } else {
                self.bump();
            }
        }
    }

    fn peek(&self) -> SyntaxKind {
        if self.is_eof() {
            return SyntaxKind::Error;
        }
        self.tokens[self.pos].0
    }

    fn at(
        &self,
        kind: SyntaxKind,
    ) -> bool {
        !self.is_eof() && self.peek() == kind
    }

    fn bump(&mut self) {
        if let Some(&(kind, text)) = self.tokens.get(self.pos) {
            if kind == SyntaxKind::Error && self.directives[self.pos].is_none() {
                self.errors.push(SyntaxError {
                    message: format!("unexpected character `{text}`"),
                    offset: self.offsets[self.pos],
                });
            }
            self.builder.token(kind.into(), text);
            self.pos += 1;
        }
    }

    fn last_bumped_kind(&self) -> SyntaxKind {
        (0..self.pos)
            .rev()
            .find(|idx| self.is_significant(*idx))
            .map(|idx| self.tokens[idx].0)
            .unwrap_or(SyntaxKind::Error)
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn error(
        &mut self,
        message: impl Into<String>,
    ) {
        let offset = self.offsets.get(self.pos).copied().unwrap_or_else(|| {
            self.offsets
                .last()
                .zip(self.tokens.last())
                .map(|(offset, (_, text))| offset + text.len())
                .unwrap_or(0)
        });
        self.errors.push(SyntaxError {
            message: message.into(),
            offset,
        });
    }

    fn directive_at(
        &self,
        idx: usize,
    ) -> bool {
        self.directives.get(idx).is_some_and(|id| id.is_some())
    }

    fn is_significant(
        &self,
        idx: usize,
    ) -> bool {
        !self.tokens[idx].0.is_trivia() && !self.directive_at(idx)
    }

    fn nth_significant(
        &self,
        nth: usize,
    ) -> Option<usize> {
        (self.pos..self.tokens.len())
            .filter(|idx| self.is_significant(*idx))
            .nth(nth)
    }

    fn nth_significant_kind(
        &self,
        nth: usize,
    ) -> Option<SyntaxKind> {
        self.nth_significant(nth).map(|idx| self.tokens[idx].0)
    }

    fn next_significant_after(
        &self,
        idx: usize,
    ) -> Option<usize> {
        (idx + 1..self.tokens.len()).find(|i| self.is_significant(*i))
    }

    fn newline_between(
        &self,
        from: usize,
        to: usize,
    ) -> bool {
        (from..to.min(self.tokens.len())).any(|idx| {
            let (kind, text) = self.tokens[idx];
            kind.is_trivia() && text.contains('\n')
        })
    }

    /// A declaration without a terminator followed by a token on a new line
    /// that cannot continue it, which is how function-like macros such as
    /// `Q_DECLARE_METATYPE(Foo)` end.
    fn ends_at_line_break(
        &self,
        next: usize,
    ) -> bool {
        if !self.newline_between(self.pos, next) {
            return false;
        }
        let (kind, text) = self.tokens[next];
        !matches!(
            kind,
            SyntaxKind::Semicolon
                | SyntaxKind::LBrace
                | SyntaxKind::Colon
                | SyntaxKind::Equal
                | SyntaxKind::KwConst
                | SyntaxKind::KwVolatile
                | SyntaxKind::KwNoexcept
                | SyntaxKind::KwThrow
                | SyntaxKind::Arrow
                | SyntaxKind::Amp
                | SyntaxKind::AndAnd
        ) && !(kind == SyntaxKind::Ident && matches!(text, "override" | "final"))
    }

    fn at_specifier(&self) -> bool {
        matches!(self.peek(), SyntaxKind::KwVirtual | SyntaxKind::KwExplicit)
    }

    fn at_access_label(&self) -> bool {
        let (kind, text) = self.tokens[self.pos];
        match kind {
            SyntaxKind::KwPublic | SyntaxKind::KwProtected | SyntaxKind::KwPrivate => {
                match self.nth_significant(1).map(|idx| self.tokens[idx]) {
                    Some((SyntaxKind::Colon, _)) => true,
                    Some((SyntaxKind::Ident, "slots" | "Q_SLOTS")) => {
                        self.nth_significant_kind(2) == Some(SyntaxKind::Colon)
                    },
                    _ => false,
                }
            },
            SyntaxKind::Ident if matches!(text, "signals" | "Q_SIGNALS") => {
                self.nth_significant_kind(1) == Some(SyntaxKind::Colon)
            },
            _ => false,
        }
    }

    /// Upper-case identifiers that stand alone on their line, or prefix a
    /// declaration keyword, are unexpanded macros (`QT_BEGIN_NAMESPACE`,
    /// `Q_DECLARE_METATYPE(Foo)`, `Q_DECL_DEPRECATED void f();`).
    fn at_macro_call(
        &self,
        scope: Scope,
    ) -> bool {
        let (_, text) = self.tokens[self.pos];
        if !is_macro_name(text) {
            return false;
        }
        let Some(next) = self.next_significant_after(self.pos) else {
            return true;
        };
        let next_kind = self.tokens[next].0;

        if next_kind != SyntaxKind::LParen {
            return self.newline_between(self.pos, next)
                || is_declaration_keyword(next_kind)
                || next_kind == SyntaxKind::KwConst;
        }

        let Some(close) = self.matching_paren(next) else {
            return true;
        };
        let Some(after) = self.next_significant_after(close) else {
            return true;
        };
        let after_kind = self.tokens[after].0;
        if self.newline_between(close, after) {
            return !matches!(
                after_kind,
                SyntaxKind::Semicolon | SyntaxKind::LBrace | SyntaxKind::Colon | SyntaxKind::KwConst | SyntaxKind::Equal
            );
        }
        is_declaration_keyword(after_kind) || (scope == Scope::File && after_kind == SyntaxKind::Semicolon)
    }

    fn matching_paren(
        &self,
        open: usize,
    ) -> Option<usize> {
        let mut depth = 0usize;
        for idx in open..self.tokens.len() {
            if !self.is_significant(idx) {
                continue;
            }
            match self.tokens[idx].0 {
                SyntaxKind::LParen => depth += 1,
                SyntaxKind::RParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(idx);
                    }
                },
                _ => {},
            }
        }
        None
    }

    fn classify_record(&self) -> Record {
        let mut angle = 0usize;
        let mut idx = self.pos;
        while let Some(next) = self.next_significant_after(idx) {
            idx = next;
            match self.tokens[idx].0 {
                SyntaxKind::LBrace => return Record::Definition,
                SyntaxKind::Colon if angle == 0 => return Record::Definition,
                SyntaxKind::Less => angle += 1,
                SyntaxKind::Greater => angle = angle.saturating_sub(1),
                SyntaxKind::Semicolon => return Record::Forward,
                SyntaxKind::Ident | SyntaxKind::DoubleColon => {},
                _ if angle > 0 => {},
                _ => return Record::Declaration,
            }
        }
        Record::Forward
    }

    fn enum_has_body(&self) -> bool {
        let mut idx = self.pos;
        while let Some(next) = self.next_significant_after(idx) {
            idx = next;
            match self.tokens[idx].0 {
                SyntaxKind::LBrace => return true,
                SyntaxKind::Semicolon | SyntaxKind::LParen | SyntaxKind::RBrace => return false,
                _ => {},
            }
        }
        false
    }

    /// Locate the declarator name and parameter list of a function
    /// declaration starting at the current token, if it is one.
    fn scan_function_head(&self) -> Option<FunctionHead> {
        let mut angle = 0usize;
        let mut last: Option<usize> = None;
        let mut operator: Option<usize> = None;
        let mut operator_symbol_seen = false;
        let mut idx = self.pos;

        while idx < self.tokens.len() {
            if !self.is_significant(idx) {
                idx += 1;
                continue;
            }
            let kind = self.tokens[idx].0;

            if let Some(operator) = operator {
                match kind {
                    SyntaxKind::LParen if !operator_symbol_seen => {
                        // `operator()` names itself with a pair of parentheses
                        let close = self.next_significant_after(idx)?;
                        if self.tokens[close].0 != SyntaxKind::RParen {
                            return None;
                        }
                        operator_symbol_seen = true;
                        idx = close + 1;
                        continue;
                    },
                    SyntaxKind::LParen => {
                        return Some(FunctionHead {
                            name_start: operator,
                            lparen: idx,
                        });
                    },
                    SyntaxKind::Semicolon | SyntaxKind::LBrace | SyntaxKind::RBrace => return None,
                    _ => operator_symbol_seen = true,
                }
                idx += 1;
                continue;
            }

            match kind {
                SyntaxKind::KwOperator => operator = Some(idx),
                SyntaxKind::Less => angle += 1,
                SyntaxKind::Greater => angle = angle.saturating_sub(1),
                SyntaxKind::LParen if angle == 0 => {
                    let name = last?;
                    if self.tokens[name].0 != SyntaxKind::Ident {
                        return None;
                    }
                    if let Some(close) = self.annotation_arguments_end(name, idx) {
                        last = Some(close);
                        idx = close + 1;
                        continue;
                    }
                    let name_start = (self.pos..name)
                        .rev()
                        .find(|i| self.is_significant(*i))
                        .filter(|i| self.tokens[*i].0 == SyntaxKind::Tilde)
                        .unwrap_or(name);
                    return Some(FunctionHead {
                        name_start,
                        lparen: idx,
                    });
                },
                SyntaxKind::Semicolon | SyntaxKind::LBrace | SyntaxKind::RBrace => return None,
                SyntaxKind::Equal | SyntaxKind::Colon if angle == 0 => return None,
                _ => {},
            }
            last = Some(idx);
            idx += 1;
        }
        None
    }

    /// `QT_DEPRECATED_X("...") QString name()`: the parenthesized group
    /// belongs to an annotation macro when a type word follows it.
    fn annotation_arguments_end(
        &self,
        name: usize,
        lparen: usize,
    ) -> Option<usize> {
        if !is_annotation_macro(self.tokens[name].1) {
            return None;
        }
        let close = self.matching_paren(lparen)?;
        let after = self.next_significant_after(close)?;
        let kind = self.tokens[after].0;
        let is_type_word = kind.is_word()
            && !matches!(
                kind,
                SyntaxKind::KwConst | SyntaxKind::KwVolatile | SyntaxKind::KwNoexcept | SyntaxKind::KwThrow
            );
        is_type_word.then_some(close)
    }

    /// Index of the `,` or `)` ending the parameter at the current token.
    fn parameter_end(&self) -> usize {
        let mut depth = 0usize;
        let mut angle = 0usize;
        for idx in self.pos..self.tokens.len() {
            if !self.is_significant(idx) {
                continue;
            }
            match self.tokens[idx].0 {
                SyntaxKind::LParen | SyntaxKind::LBracket | SyntaxKind::LBrace => depth += 1,
                SyntaxKind::RParen if depth == 0 => return idx,
                SyntaxKind::RParen | SyntaxKind::RBracket | SyntaxKind::RBrace => depth = depth.saturating_sub(1),
                SyntaxKind::Less if depth == 0 => angle += 1,
                SyntaxKind::Greater if depth == 0 => angle = angle.saturating_sub(1),
                SyntaxKind::Comma if depth == 0 && angle == 0 => return idx,
                SyntaxKind::Semicolon if depth == 0 => return idx,
                _ => {},
            }
        }
        self.tokens.len()
    }

    fn parameter_default_start(
        &self,
        end: usize,
    ) -> Option<usize> {
        let mut depth = 0usize;
        let mut angle = 0usize;
        for idx in self.pos..end {
            if !self.is_significant(idx) {
                continue;
            }
            match self.tokens[idx].0 {
                SyntaxKind::LParen | SyntaxKind::LBracket | SyntaxKind::LBrace => depth += 1,
                SyntaxKind::RParen | SyntaxKind::RBracket | SyntaxKind::RBrace => depth = depth.saturating_sub(1),
                SyntaxKind::Less => angle += 1,
                SyntaxKind::Greater => angle = angle.saturating_sub(1),
                SyntaxKind::Equal if depth == 0 && angle == 0 => return Some(idx),
                _ => {},
            }
        }
        None
    }

    /// The parameter name is the trailing identifier of the declarator,
    /// ignoring array extents, when something precedes it to act as a type.
    fn parameter_name(
        &self,
        stop: usize,
    ) -> Option<usize> {
        let mut significant: Vec<usize> = (self.pos..stop).filter(|idx| self.is_significant(*idx)).collect();

        while significant.last().is_some_and(|idx| self.tokens[*idx].0 == SyntaxKind::RBracket) {
            let open = significant
                .iter()
                .rposition(|idx| self.tokens[*idx].0 == SyntaxKind::LBracket)?;
            significant.truncate(open);
        }

        let (&name, rest) = significant.split_last()?;
        let &prev = rest.last()?;
        if self.tokens[name].0 != SyntaxKind::Ident {
            return None;
        }
        if matches!(
            self.tokens[prev].0,
            SyntaxKind::KwConst
                | SyntaxKind::KwVolatile
                | SyntaxKind::KwStruct
                | SyntaxKind::KwClass
                | SyntaxKind::KwEnum
                | SyntaxKind::KwTypename
                | SyntaxKind::DoubleColon
        ) {
            return None;
        }
        Some(name)
    }
}

/// Assign every token belonging to a preprocessor directive line the id of
/// that directive. A directive starts with `#` at the beginning of a line
/// and runs through its newline, honouring `\` continuations.
fn mark_directives(tokens: &[(SyntaxKind, &str)]) -> Vec<Option<u32>> {
    let mut marks = vec![None; tokens.len()];
    let mut line_start = true;
    let mut current: Option<u32> = None;
    let mut next_id = 0u32;
    let mut continued = false;

    for (idx, (kind, text)) in tokens.iter().enumerate() {
        if let Some(id) = current {
            marks[idx] = Some(id);
            if kind.is_trivia() && text.contains('\n') && !continued {
                current = None;
                line_start = true;
            }
            continued = *kind == SyntaxKind::Backslash;
            continue;
        }

        if *kind == SyntaxKind::Hash && line_start {
            current = Some(next_id);
            next_id += 1;
            marks[idx] = Some(next_id - 1);
            continued = false;
            continue;
        }

        if *kind == SyntaxKind::Whitespace && text.contains('\n') {
            line_start = true;
        } else if !kind.is_trivia() {
            line_start = false;
        }
    }
    marks
}

fn is_macro_name(text: &str) -> bool {
    text.len() > 1
        && text.starts_with(|c: char| c.is_ascii_uppercase())
        && text.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        && text.contains('_')
}

fn is_declaration_keyword(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::KwClass
            | SyntaxKind::KwStruct
            | SyntaxKind::KwUnion
            | SyntaxKind::KwEnum
            | SyntaxKind::KwNamespace
            | SyntaxKind::KwVirtual
            | SyntaxKind::KwStatic
            | SyntaxKind::KwInline
            | SyntaxKind::KwExplicit
            | SyntaxKind::KwTypedef
            | SyntaxKind::KwTemplate
            | SyntaxKind::KwFriend
            | SyntaxKind::KwExtern
            | SyntaxKind::KwUsing
            | SyntaxKind::KwConstexpr
            | SyntaxKind::KwVoid
            | SyntaxKind::KwBool
            | SyntaxKind::KwInt
            | SyntaxKind::KwChar
            | SyntaxKind::KwFloat
            | SyntaxKind::KwDouble
            | SyntaxKind::KwLong
            | SyntaxKind::KwShort
            | SyntaxKind::KwUnsigned
            | SyntaxKind::KwSigned
            | SyntaxKind::KwAuto
            | SyntaxKind::KwWchar
    )
}

#[cfg(test)]
#[path = "../../tests/src/syntax/cst_parser_tests.rs"]
mod tests;
