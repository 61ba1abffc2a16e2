//! Tokenizer for the analyzed source subset.

use mysqlint_common::{Diagnostic, Span};

/// Token types produced by the scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    IntLiteral,
    DecimalLiteral,
    StringLiteral,
    TemplateLiteral,

    // Keywords
    ImportKw,
    AsKw,
    TypeKw,
    RecordKw,
    FunctionKw,
    ReturnsKw,
    NewKw,
    CheckKw,
    TrueKw,
    FalseKw,

    // Punctuation
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracePipe,
    ClosePipeBrace,
    OpenBracket,
    CloseBracket,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Ellipsis,
    Pipe,
    Question,
    Eq,
    RightArrow,
    Minus,
    Plus,
    Bang,
    Lt,
    Gt,
    Slash,

    Unknown,
    Eof,
}

/// A single token. Text is recovered by slicing the source with the span.
#[derive(Clone, Copy, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start as usize..self.span.end as usize]
    }
}

fn keyword_kind(text: &str) -> Option<TokenKind> {
    Some(match text {
        "import" => TokenKind::ImportKw,
        "as" => TokenKind::AsKw,
        "type" => TokenKind::TypeKw,
        "record" => TokenKind::RecordKw,
        "function" => TokenKind::FunctionKw,
        "returns" => TokenKind::ReturnsKw,
        "new" => TokenKind::NewKw,
        "check" => TokenKind::CheckKw,
        "true" => TokenKind::TrueKw,
        "false" => TokenKind::FalseKw,
        _ => return None,
    })
}

/// Tokenizer state machine.
pub struct ScannerState<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ScannerState<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Scan the entire source into a token list terminated by `Eof`.
    pub fn scan_tokens(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let at_end = token.kind == TokenKind::Eof;
            tokens.push(token);
            if at_end {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    fn peek(&self) -> u8 {
        self.bytes.get(self.pos).copied().unwrap_or(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.bytes.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                b' ' | b'\t' | b'\r' | b'\n' => self.pos += 1,
                b'/' if self.peek_at(1) == b'/' => {
                    while self.pos < self.bytes.len() && self.peek() != b'\n' {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Token {
        self.skip_trivia();
        let start = self.pos as u32;
        if self.pos >= self.bytes.len() {
            return Token {
                kind: TokenKind::Eof,
                span: Span::new(start, start),
            };
        }

        let kind = match self.peek() {
            b'(' => self.single(TokenKind::OpenParen),
            b')' => self.single(TokenKind::CloseParen),
            b'{' => {
                if self.peek_at(1) == b'|' {
                    self.pos += 2;
                    TokenKind::OpenBracePipe
                } else {
                    self.single(TokenKind::OpenBrace)
                }
            }
            b'}' => self.single(TokenKind::CloseBrace),
            b'|' => {
                if self.peek_at(1) == b'}' {
                    self.pos += 2;
                    TokenKind::ClosePipeBrace
                } else {
                    self.single(TokenKind::Pipe)
                }
            }
            b'[' => self.single(TokenKind::OpenBracket),
            b']' => self.single(TokenKind::CloseBracket),
            b',' => self.single(TokenKind::Comma),
            b';' => self.single(TokenKind::Semicolon),
            b':' => self.single(TokenKind::Colon),
            b'?' => self.single(TokenKind::Question),
            b'=' => self.single(TokenKind::Eq),
            b'+' => self.single(TokenKind::Plus),
            b'!' => self.single(TokenKind::Bang),
            b'<' => self.single(TokenKind::Lt),
            b'>' => self.single(TokenKind::Gt),
            b'/' => self.single(TokenKind::Slash),
            b'-' => {
                if self.peek_at(1) == b'>' {
                    self.pos += 2;
                    TokenKind::RightArrow
                } else {
                    self.single(TokenKind::Minus)
                }
            }
            b'.' => {
                if self.peek_at(1) == b'.' && self.peek_at(2) == b'.' {
                    self.pos += 3;
                    TokenKind::Ellipsis
                } else {
                    self.single(TokenKind::Dot)
                }
            }
            b'"' => self.scan_string(start),
            b'`' => self.scan_template(start),
            b'0'..=b'9' => self.scan_number(),
            b'A'..=b'Z' | b'a'..=b'z' | b'_' => self.scan_identifier(start),
            _ => {
                self.pos += 1;
                // Keep token boundaries on character boundaries.
                while self.pos < self.bytes.len() && !self.source.is_char_boundary(self.pos) {
                    self.pos += 1;
                }
                self.diagnostics.push(Diagnostic::error(
                    "PARSE_001",
                    "unexpected character",
                    Span::new(start, self.pos as u32),
                ));
                TokenKind::Unknown
            }
        };

        Token {
            kind,
            span: Span::new(start, self.pos as u32),
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    fn scan_identifier(&mut self, start: u32) -> TokenKind {
        while matches!(self.peek(), b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_') {
            self.pos += 1;
        }
        let text = &self.source[start as usize..self.pos];
        keyword_kind(text).unwrap_or(TokenKind::Ident)
    }

    fn scan_number(&mut self) -> TokenKind {
        while self.peek().is_ascii_digit() {
            self.pos += 1;
        }
        if self.peek() == b'.' && self.peek_at(1).is_ascii_digit() {
            self.pos += 1;
            while self.peek().is_ascii_digit() {
                self.pos += 1;
            }
            TokenKind::DecimalLiteral
        } else {
            TokenKind::IntLiteral
        }
    }

    /// Scan a double-quoted string literal. The token span includes the
    /// quotes, matching how literal text is reported downstream.
    fn scan_string(&mut self, start: u32) -> TokenKind {
        self.pos += 1;
        loop {
            match self.peek() {
                0 | b'\n' => {
                    self.diagnostics.push(Diagnostic::error(
                        "PARSE_002",
                        "unterminated string literal",
                        Span::new(start, self.pos as u32),
                    ));
                    break;
                }
                b'\\' => self.pos = (self.pos + 2).min(self.bytes.len()),
                b'"' => {
                    self.pos += 1;
                    break;
                }
                _ => self.pos += 1,
            }
        }
        TokenKind::StringLiteral
    }

    /// Scan a backquoted raw template. No interpolation is tracked; the
    /// analyzers only care that a query string was supplied.
    fn scan_template(&mut self, start: u32) -> TokenKind {
        self.pos += 1;
        loop {
            match self.peek() {
                0 => {
                    self.diagnostics.push(Diagnostic::error(
                        "PARSE_003",
                        "unterminated template literal",
                        Span::new(start, self.pos as u32),
                    ));
                    break;
                }
                b'`' => {
                    self.pos += 1;
                    break;
                }
                _ => self.pos += 1,
            }
        }
        TokenKind::TemplateLiteral
    }
}
