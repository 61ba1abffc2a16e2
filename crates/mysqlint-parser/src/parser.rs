//! Recursive-descent parser building the `SyntaxTree` arena.

use smallvec::{SmallVec, smallvec};
use tracing::debug;

use mysqlint_common::{Diagnostic, Span};

use crate::scanner::{ScannerState, Token, TokenKind};
use crate::tree::{LiteralKind, NodeId, NodeKind, SyntaxTree, UnaryOp};

/// Parser state over a scanned token stream.
pub struct ParserState {
    tree: SyntaxTree,
    tokens: Vec<Token>,
    pos: usize,
    last_end: u32,
}

impl ParserState {
    #[must_use]
    pub fn new(file_name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let (tokens, scan_diagnostics) = ScannerState::new(&source).scan_tokens();
        let mut tree = SyntaxTree::new(file_name, source);
        for diagnostic in scan_diagnostics {
            tree.push_diagnostic(diagnostic);
        }
        Self {
            tree,
            tokens,
            pos: 0,
            last_end: 0,
        }
    }

    /// Consume the parser and return the finished tree.
    #[must_use]
    pub fn into_tree(self) -> SyntaxTree {
        self.tree
    }

    // =========================================================================
    // Token stream helpers
    // =========================================================================

    fn peek(&self) -> Token {
        self.nth(0)
    }

    fn nth(&self, n: usize) -> Token {
        let last = self.tokens.len() - 1;
        self.tokens[(self.pos + n).min(last)]
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn bump(&mut self) -> Token {
        let token = self.peek();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        self.last_end = token.span.end;
        token
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) { Some(self.bump()) } else { None }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Token {
        if self.at(kind) {
            return self.bump();
        }
        self.error_here(format!("expected {what}"));
        let at = self.peek().span.start;
        Token {
            kind,
            span: Span::new(at, at),
        }
    }

    fn error_here(&mut self, message: impl Into<String>) {
        let span = self.peek().span;
        self.tree
            .push_diagnostic(Diagnostic::error("PARSE_010", message, span));
    }

    fn token_text(&self, token: Token) -> String {
        self.tree.text(token.span).to_string()
    }

    /// Span from a start offset to the end of the last consumed token.
    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.last_end.max(start))
    }

    // =========================================================================
    // Module structure
    // =========================================================================

    /// Parse a whole module and set it as the tree root.
    pub fn parse_module(&mut self) -> NodeId {
        debug!(file = %self.tree.file_name(), "parsing module");
        let start = self.peek().span.start;
        let mut imports = Vec::new();
        let mut members = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::Eof => break,
                TokenKind::ImportKw => imports.push(self.parse_import()),
                TokenKind::TypeKw => members.push(self.parse_type_definition()),
                TokenKind::FunctionKw => members.push(self.parse_function()),
                TokenKind::Ident | TokenKind::RecordKw => {
                    members.push(self.parse_variable_decl());
                }
                _ => {
                    self.error_here("expected declaration");
                    self.bump();
                }
            }
        }
        let root = self
            .tree
            .add_node(NodeKind::ModulePart { imports, members }, self.span_from(start));
        self.tree.set_root(root);
        root
    }

    fn parse_import(&mut self) -> NodeId {
        let start = self.bump().span.start;
        let org = self.expect(TokenKind::Ident, "organization name");
        let org = self.token_text(org);
        self.expect(TokenKind::Slash, "`/`");
        let module = self.expect(TokenKind::Ident, "module name");
        let module = self.token_text(module);
        let prefix = if self.eat(TokenKind::AsKw).is_some() {
            let prefix = self.expect(TokenKind::Ident, "import prefix");
            Some(self.token_text(prefix))
        } else {
            None
        };
        self.expect(TokenKind::Semicolon, "`;`");
        self.tree.add_node(
            NodeKind::ImportDecl {
                org,
                module,
                prefix,
            },
            self.span_from(start),
        )
    }

    fn parse_type_definition(&mut self) -> NodeId {
        let start = self.bump().span.start;
        let name = self.expect(TokenKind::Ident, "type name");
        let name = self.token_text(name);
        let descriptor = self.parse_type_descriptor();
        self.expect(TokenKind::Semicolon, "`;`");
        self.tree
            .add_node(NodeKind::TypeDefinition { name, descriptor }, self.span_from(start))
    }

    fn parse_function(&mut self) -> NodeId {
        let start = self.bump().span.start;
        let name = self.expect(TokenKind::Ident, "function name");
        let name = self.token_text(name);
        self.expect(TokenKind::OpenParen, "`(`");
        // Parameters are not modeled; skip to the closing paren.
        let mut depth = 1usize;
        while depth > 0 && !self.at(TokenKind::Eof) {
            match self.bump().kind {
                TokenKind::OpenParen => depth += 1,
                TokenKind::CloseParen => depth -= 1,
                _ => {}
            }
        }
        if self.eat(TokenKind::ReturnsKw).is_some() {
            // The return type is not modeled either; skip its tokens.
            if let Some(end) = self.scan_type_descriptor(self.pos) {
                while self.pos < end {
                    self.bump();
                }
            }
        }
        self.expect(TokenKind::OpenBrace, "`{`");
        let mut body = Vec::new();
        while !self.at(TokenKind::CloseBrace) && !self.at(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                body.push(statement);
            }
        }
        self.expect(TokenKind::CloseBrace, "`}`");
        self.tree
            .add_node(NodeKind::FunctionDef { name, body }, self.span_from(start))
    }

    // =========================================================================
    // Type descriptors
    // =========================================================================

    fn parse_type_descriptor(&mut self) -> NodeId {
        let first = self.parse_primary_type();
        if !self.at(TokenKind::Pipe) {
            return first;
        }
        let start = self.tree.span(first).start;
        let mut members: SmallVec<[NodeId; 2]> = smallvec![first];
        while self.eat(TokenKind::Pipe).is_some() {
            members.push(self.parse_primary_type());
        }
        self.tree
            .add_node(NodeKind::UnionTypeDesc { members }, self.span_from(start))
    }

    fn parse_primary_type(&mut self) -> NodeId {
        let start = self.peek().span.start;
        let base = match self.peek().kind {
            TokenKind::RecordKw => self.parse_record_type(),
            TokenKind::Ident => {
                let name = self.bump();
                let name_text = self.token_text(name);
                if self.at(TokenKind::Colon) && self.nth(1).kind == TokenKind::Ident {
                    self.bump();
                    let member = self.bump();
                    let member_text = self.token_text(member);
                    self.tree.add_node(
                        NodeKind::QualifiedNameRef {
                            prefix: name_text,
                            name: member_text,
                        },
                        self.span_from(start),
                    )
                } else if self.at(TokenKind::Lt) {
                    self.skip_type_args();
                    self.tree.add_node(
                        NodeKind::ParameterizedTypeDesc { name: name_text },
                        self.span_from(start),
                    )
                } else {
                    self.tree
                        .add_node(NodeKind::SimpleNameRef { name: name_text }, name.span)
                }
            }
            _ => {
                self.error_here("expected type descriptor");
                self.tree.add_node(
                    NodeKind::SimpleNameRef {
                        name: String::new(),
                    },
                    Span::new(start, start),
                )
            }
        };
        if self.eat(TokenKind::Question).is_some() {
            return self
                .tree
                .add_node(NodeKind::OptionalTypeDesc { inner: base }, self.span_from(start));
        }
        base
    }

    fn parse_record_type(&mut self) -> NodeId {
        let start = self.bump().span.start;
        let closed = if self.eat(TokenKind::OpenBracePipe).is_some() {
            true
        } else {
            self.expect(TokenKind::OpenBrace, "`{` or `{|`");
            false
        };
        let close = if closed {
            TokenKind::ClosePipeBrace
        } else {
            TokenKind::CloseBrace
        };
        let mut fields: SmallVec<[NodeId; 8]> = SmallVec::new();
        while !self.at(close) && !self.at(TokenKind::Eof) {
            if !matches!(self.peek().kind, TokenKind::Ident | TokenKind::RecordKw) {
                self.error_here("expected record field");
                self.bump();
                continue;
            }
            fields.push(self.parse_record_field());
        }
        self.expect(close, if closed { "`|}`" } else { "`}`" });
        self.tree
            .add_node(NodeKind::RecordTypeDesc { fields }, self.span_from(start))
    }

    fn parse_record_field(&mut self) -> NodeId {
        let start = self.peek().span.start;
        let type_desc = self.parse_type_descriptor();
        let name = self.expect(TokenKind::Ident, "field name");
        let name = self.token_text(name);
        let default_value = if self.eat(TokenKind::Eq).is_some() {
            self.parse_expression()
        } else {
            NodeId::NONE
        };
        self.expect(TokenKind::Semicolon, "`;`");
        self.tree.add_node(
            NodeKind::RecordField {
                type_desc,
                name,
                default_value,
            },
            self.span_from(start),
        )
    }

    fn skip_type_args(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek().kind {
                TokenKind::Lt => {
                    depth += 1;
                    self.bump();
                }
                TokenKind::Gt => {
                    self.bump();
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                TokenKind::Eof => break,
                _ => {
                    self.bump();
                }
            }
        }
    }

    // =========================================================================
    // Token-level type-descriptor scan
    //
    // Used to disambiguate `Pool p = ...;` from expression statements and to
    // skip return types, without creating nodes.
    // =========================================================================

    fn scan_type_descriptor(&self, start: usize) -> Option<usize> {
        let mut i = self.scan_primary_type(start)?;
        while self.token_kind_at(i) == TokenKind::Pipe {
            i = self.scan_primary_type(i + 1)?;
        }
        Some(i)
    }

    fn scan_primary_type(&self, start: usize) -> Option<usize> {
        let mut i = start;
        match self.token_kind_at(i) {
            TokenKind::RecordKw => {
                i += 1;
                let open = self.token_kind_at(i);
                if !matches!(open, TokenKind::OpenBrace | TokenKind::OpenBracePipe) {
                    return None;
                }
                let mut depth = 0usize;
                loop {
                    match self.token_kind_at(i) {
                        TokenKind::OpenBrace | TokenKind::OpenBracePipe => depth += 1,
                        TokenKind::CloseBrace | TokenKind::ClosePipeBrace => {
                            depth -= 1;
                            if depth == 0 {
                                i += 1;
                                break;
                            }
                        }
                        TokenKind::Eof => return None,
                        _ => {}
                    }
                    i += 1;
                }
            }
            TokenKind::Ident => {
                i += 1;
                if self.token_kind_at(i) == TokenKind::Colon
                    && self.token_kind_at(i + 1) == TokenKind::Ident
                {
                    i += 2;
                } else if self.token_kind_at(i) == TokenKind::Lt {
                    let mut depth = 0usize;
                    loop {
                        match self.token_kind_at(i) {
                            TokenKind::Lt => depth += 1,
                            TokenKind::Gt => {
                                depth -= 1;
                                if depth == 0 {
                                    i += 1;
                                    break;
                                }
                            }
                            TokenKind::Eof => return None,
                            _ => {}
                        }
                        i += 1;
                    }
                }
            }
            _ => return None,
        }
        if self.token_kind_at(i) == TokenKind::Question {
            i += 1;
        }
        Some(i)
    }

    fn token_kind_at(&self, i: usize) -> TokenKind {
        let last = self.tokens.len() - 1;
        self.tokens[i.min(last)].kind
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_statement(&mut self) -> Option<NodeId> {
        match self.peek().kind {
            TokenKind::Ident
                if self.tree.text(self.peek().span) == "_"
                    && self.nth(1).kind == TokenKind::Eq =>
            {
                Some(self.parse_wildcard_assign())
            }
            TokenKind::CheckKw => Some(self.parse_expr_statement()),
            TokenKind::RecordKw => Some(self.parse_variable_decl()),
            TokenKind::Ident => {
                if let Some(after_type) = self.scan_type_descriptor(self.pos) {
                    let is_decl = self.token_kind_at(after_type) == TokenKind::Ident
                        && matches!(
                            self.token_kind_at(after_type + 1),
                            TokenKind::Eq | TokenKind::Semicolon
                        );
                    if is_decl {
                        return Some(self.parse_variable_decl());
                    }
                }
                Some(self.parse_expr_statement())
            }
            _ => {
                self.error_here("expected statement");
                self.bump();
                None
            }
        }
    }

    fn parse_variable_decl(&mut self) -> NodeId {
        let start = self.peek().span.start;
        let type_desc = self.parse_type_descriptor();
        let name = self.expect(TokenKind::Ident, "variable name");
        let name = self.token_text(name);
        let initializer = if self.eat(TokenKind::Eq).is_some() {
            self.parse_expression()
        } else {
            NodeId::NONE
        };
        self.expect(TokenKind::Semicolon, "`;`");
        self.tree.add_node(
            NodeKind::VariableDecl {
                type_desc,
                name,
                initializer,
            },
            self.span_from(start),
        )
    }

    fn parse_wildcard_assign(&mut self) -> NodeId {
        let start = self.bump().span.start;
        self.expect(TokenKind::Eq, "`=`");
        let value = self.parse_expression();
        self.expect(TokenKind::Semicolon, "`;`");
        self.tree
            .add_node(NodeKind::WildcardAssign { value }, self.span_from(start))
    }

    fn parse_expr_statement(&mut self) -> NodeId {
        let start = self.peek().span.start;
        let expr = self.parse_expression();
        self.expect(TokenKind::Semicolon, "`;`");
        self.tree
            .add_node(NodeKind::ExprStatement { expr }, self.span_from(start))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expression(&mut self) -> NodeId {
        let start = self.peek().span.start;
        match self.peek().kind {
            TokenKind::CheckKw => {
                self.bump();
                let inner = self.parse_expression();
                self.tree
                    .add_node(NodeKind::CheckExpr { inner }, self.span_from(start))
            }
            TokenKind::Minus => self.parse_unary(UnaryOp::Minus),
            TokenKind::Plus => self.parse_unary(UnaryOp::Plus),
            TokenKind::Bang => self.parse_unary(UnaryOp::Not),
            _ => self.parse_postfix(),
        }
    }

    fn parse_unary(&mut self, op: UnaryOp) -> NodeId {
        let start = self.bump().span.start;
        let operand = self.parse_postfix();
        self.tree
            .add_node(NodeKind::UnaryExpr { op, operand }, self.span_from(start))
    }

    fn parse_postfix(&mut self) -> NodeId {
        let start = self.peek().span.start;
        let mut expr = self.parse_primary();
        loop {
            if self.at(TokenKind::Dot) && self.nth(1).kind == TokenKind::Ident {
                self.bump();
                let field = self.bump();
                let field = self.token_text(field);
                expr = self
                    .tree
                    .add_node(NodeKind::FieldAccess { base: expr, field }, self.span_from(start));
            } else if self.at(TokenKind::RightArrow) && self.nth(1).kind == TokenKind::Ident {
                self.bump();
                let method = self.bump();
                let method = self.token_text(method);
                self.expect(TokenKind::OpenParen, "`(`");
                let args = self.parse_args();
                expr = self.tree.add_node(
                    NodeKind::RemoteCall {
                        target: expr,
                        method,
                        args: args.into_iter().collect(),
                    },
                    self.span_from(start),
                );
            } else if self.at(TokenKind::OpenParen) && self.is_name_reference(expr) {
                self.bump();
                let args = self.parse_args();
                expr = self.tree.add_node(
                    NodeKind::FunctionCall { callee: expr, args },
                    self.span_from(start),
                );
            } else {
                return expr;
            }
        }
    }

    fn is_name_reference(&self, id: NodeId) -> bool {
        matches!(
            self.tree.kind(id),
            Some(NodeKind::SimpleNameRef { .. } | NodeKind::QualifiedNameRef { .. })
        )
    }

    fn parse_primary(&mut self) -> NodeId {
        let start = self.peek().span.start;
        match self.peek().kind {
            TokenKind::IntLiteral => self.parse_literal(LiteralKind::Int),
            TokenKind::DecimalLiteral => self.parse_literal(LiteralKind::Decimal),
            TokenKind::StringLiteral => self.parse_literal(LiteralKind::Str),
            TokenKind::TrueKw | TokenKind::FalseKw => self.parse_literal(LiteralKind::Bool),
            TokenKind::TemplateLiteral => self.parse_literal(LiteralKind::Template),
            TokenKind::OpenBrace => self.parse_mapping_constructor(),
            TokenKind::NewKw => self.parse_new_expression(),
            TokenKind::Ident => {
                let name = self.bump();
                let name_text = self.token_text(name);
                if self.at(TokenKind::Colon) && self.nth(1).kind == TokenKind::Ident {
                    self.bump();
                    let member = self.bump();
                    let member_text = self.token_text(member);
                    self.tree.add_node(
                        NodeKind::QualifiedNameRef {
                            prefix: name_text,
                            name: member_text,
                        },
                        self.span_from(start),
                    )
                } else {
                    self.tree
                        .add_node(NodeKind::SimpleNameRef { name: name_text }, name.span)
                }
            }
            _ => {
                self.error_here("expected expression");
                let span = self.bump().span;
                self.tree.add_node(
                    NodeKind::SimpleNameRef {
                        name: String::new(),
                    },
                    span,
                )
            }
        }
    }

    fn parse_literal(&mut self, literal: LiteralKind) -> NodeId {
        let token = self.bump();
        let text = self.token_text(token);
        self.tree
            .add_node(NodeKind::BasicLiteral { literal, text }, token.span)
    }

    fn parse_new_expression(&mut self) -> NodeId {
        let start = self.bump().span.start;
        if self.eat(TokenKind::OpenParen).is_some() {
            let args = self.parse_args();
            return self
                .tree
                .add_node(NodeKind::ImplicitNew { args }, self.span_from(start));
        }
        if self.at(TokenKind::Ident) {
            let type_ref = self.parse_primary_type();
            self.expect(TokenKind::OpenParen, "`(`");
            let args = self.parse_args();
            return self
                .tree
                .add_node(NodeKind::ExplicitNew { type_ref, args }, self.span_from(start));
        }
        self.error_here("expected constructor arguments");
        self.tree.add_node(
            NodeKind::ImplicitNew {
                args: SmallVec::new(),
            },
            self.span_from(start),
        )
    }

    /// Parse an argument list after the opening paren, consuming the closing
    /// paren. Named arguments are recognized as `identifier = expression`.
    fn parse_args(&mut self) -> SmallVec<[NodeId; 8]> {
        let mut args: SmallVec<[NodeId; 8]> = SmallVec::new();
        while !self.at(TokenKind::CloseParen) && !self.at(TokenKind::Eof) {
            let start = self.peek().span.start;
            let arg = if self.at(TokenKind::Ident) && self.nth(1).kind == TokenKind::Eq {
                let name = self.bump();
                let name = self.token_text(name);
                self.bump();
                let expr = self.parse_expression();
                self.tree
                    .add_node(NodeKind::NamedArg { name, expr }, self.span_from(start))
            } else {
                let expr = self.parse_expression();
                self.tree
                    .add_node(NodeKind::PositionalArg { expr }, self.span_from(start))
            };
            args.push(arg);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::CloseParen, "`)`");
        args
    }

    fn parse_mapping_constructor(&mut self) -> NodeId {
        let start = self.bump().span.start;
        let mut fields: SmallVec<[NodeId; 8]> = SmallVec::new();
        while !self.at(TokenKind::CloseBrace) && !self.at(TokenKind::Eof) {
            let field_start = self.peek().span.start;
            match self.peek().kind {
                TokenKind::Ellipsis => {
                    self.bump();
                    let value = self.parse_expression();
                    fields.push(
                        self.tree
                            .add_node(NodeKind::SpreadField { value }, self.span_from(field_start)),
                    );
                }
                TokenKind::Ident | TokenKind::StringLiteral => {
                    let name = self.bump();
                    let name = self.token_text(name);
                    let name = name.trim_matches('"').to_string();
                    self.expect(TokenKind::Colon, "`:`");
                    let value = self.parse_expression();
                    fields.push(self.tree.add_node(
                        NodeKind::SpecificField { name, value },
                        self.span_from(field_start),
                    ));
                }
                _ => {
                    self.error_here("expected mapping field");
                    self.bump();
                    continue;
                }
            }
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::CloseBrace, "`}`");
        self.tree
            .add_node(NodeKind::MappingConstructor { fields }, self.span_from(start))
    }
}
