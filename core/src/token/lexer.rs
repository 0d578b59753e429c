use std::fmt;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::token::{Position, Span};

/// Lexical category of a Go token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Illegal,
    // Literals
    Ident,  // main
    Int,    // 12345
    Float,  // 123.45
    Imag,   // 123.45i
    Char,   // 'a'
    String, // "abc"
    // Operators
    Add,          // +
    Sub,          // -
    Mul,          // *
    Quo,          // /
    Rem,          // %
    And,          // &
    Or,           // |
    Xor,          // ^
    Shl,          // <<
    Shr,          // >>
    AndNot,       // &^
    AddAssign,    // +=
    SubAssign,    // -=
    MulAssign,    // *=
    QuoAssign,    // /=
    RemAssign,    // %=
    AndAssign,    // &=
    OrAssign,     // |=
    XorAssign,    // ^=
    ShlAssign,    // <<=
    ShrAssign,    // >>=
    AndNotAssign, // &^=
    LAnd,         // &&
    LOr,          // ||
    Arrow,        // <-
    Inc,          // ++
    Dec,          // --
    Eql,          // ==
    Lss,          // <
    Gtr,          // >
    Assign,       // =
    Not,          // !
    Tilde,        // ~
    Neq,          // !=
    Leq,          // <=
    Geq,          // >=
    Define,       // :=
    Ellipsis,     // ...
    // Delimiters
    LParen,    // (
    LBrack,    // [
    LBrace,    // {
    Comma,     // ,
    Period,    // .
    RParen,    // )
    RBrack,    // ]
    RBrace,    // }
    Semicolon, // ; (explicit or inserted at a line end)
    Colon,     // :
    // Keywords
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,
}

static KEYWORDS: Lazy<FxHashMap<&'static str, TokenKind>> = Lazy::new(|| {
    use TokenKind::*;
    [
        Break,
        Case,
        Chan,
        Const,
        Continue,
        Default,
        Defer,
        Else,
        Fallthrough,
        For,
        Func,
        Go,
        Goto,
        If,
        Import,
        Interface,
        Map,
        Package,
        Range,
        Return,
        Select,
        Struct,
        Switch,
        Type,
        Var,
    ]
    .into_iter()
    .map(|kw| (kw.as_str(), kw))
    .collect()
});

impl TokenKind {
    /// Canonical spelling of the kind. Literal kinds have no fixed spelling and
    /// return their category name.
    pub fn as_str(self) -> &'static str {
        use TokenKind::*;
        match self {
            Illegal => "ILLEGAL",
            Ident => "IDENT",
            Int => "INT",
            Float => "FLOAT",
            Imag => "IMAG",
            Char => "CHAR",
            String => "STRING",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Quo => "/",
            Rem => "%",
            And => "&",
            Or => "|",
            Xor => "^",
            Shl => "<<",
            Shr => ">>",
            AndNot => "&^",
            AddAssign => "+=",
            SubAssign => "-=",
            MulAssign => "*=",
            QuoAssign => "/=",
            RemAssign => "%=",
            AndAssign => "&=",
            OrAssign => "|=",
            XorAssign => "^=",
            ShlAssign => "<<=",
            ShrAssign => ">>=",
            AndNotAssign => "&^=",
            LAnd => "&&",
            LOr => "||",
            Arrow => "<-",
            Inc => "++",
            Dec => "--",
            Eql => "==",
            Lss => "<",
            Gtr => ">",
            Assign => "=",
            Not => "!",
            Tilde => "~",
            Neq => "!=",
            Leq => "<=",
            Geq => ">=",
            Define => ":=",
            Ellipsis => "...",
            LParen => "(",
            LBrack => "[",
            LBrace => "{",
            Comma => ",",
            Period => ".",
            RParen => ")",
            RBrack => "]",
            RBrace => "}",
            Semicolon => ";",
            Colon => ":",
            Break => "break",
            Case => "case",
            Chan => "chan",
            Const => "const",
            Continue => "continue",
            Default => "default",
            Defer => "defer",
            Else => "else",
            Fallthrough => "fallthrough",
            For => "for",
            Func => "func",
            Go => "go",
            Goto => "goto",
            If => "if",
            Import => "import",
            Interface => "interface",
            Map => "map",
            Package => "package",
            Range => "range",
            Return => "return",
            Select => "select",
            Struct => "struct",
            Switch => "switch",
            Type => "type",
            Var => "var",
        }
    }

    /// Kinds whose text is taken verbatim from the source.
    pub fn is_literal(self) -> bool {
        use TokenKind::*;
        matches!(self, Illegal | Ident | Int | Float | Imag | Char | String)
    }

    pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
        KEYWORDS.get(ident).copied()
    }

    /// A newline after one of these kinds terminates the statement.
    fn ends_statement(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Ident
                | Int
                | Float
                | Imag
                | Char
                | String
                | Break
                | Continue
                | Fallthrough
                | Return
                | Inc
                | Dec
                | RParen
                | RBrack
                | RBrace
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source slice. Automatically inserted semicolons carry `"\n"`.
    pub lit: String,
}

impl Token {
    pub fn new(kind: TokenKind, lit: impl Into<String>) -> Self {
        Self { kind, lit: lit.into() }
    }

    /// Text used when reassembling tokens back into source: the literal for
    /// literal kinds, the canonical spelling for everything else.
    pub fn literal(&self) -> &str {
        if self.kind.is_literal() {
            &self.lit
        } else {
            self.kind.as_str()
        }
    }

    /// True for a string literal that hit a line end (or EOF for raw strings)
    /// before its closing quote.
    pub fn is_unterminated_string(&self) -> bool {
        if self.kind != TokenKind::String {
            return false;
        }
        let bytes = self.lit.as_bytes();
        let Some(&quote) = bytes.first() else {
            return false;
        };
        if bytes.len() < 2 || bytes[bytes.len() - 1] != quote {
            return true;
        }
        if quote == b'`' {
            return false;
        }
        // The closing quote must not be escaped.
        let backslashes = bytes[1..bytes.len() - 1]
            .iter()
            .rev()
            .take_while(|&&b| b == b'\\')
            .count();
        backslashes % 2 == 1
    }
}

#[inline]
fn is_letter(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

#[inline]
fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Streaming Go tokenizer.
///
/// Never fails: unknown characters become `Illegal` tokens and unterminated
/// literals or comments end at the line end / end of input. Comments are
/// skipped and semicolons are inserted after line-ending tokens the way the Go
/// scanner does.
pub struct Tokenizer<'a> {
    input: &'a str,
    idx: usize,
    line: u32,
    column: u32,
    insert_semi: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            idx: if input.starts_with('\u{FEFF}') { '\u{FEFF}'.len_utf8() } else { 0 },
            line: 1,
            column: 1,
            insert_semi: false,
        }
    }

    pub fn tokenize(s: &str) -> Vec<Token> {
        Tokenizer::new(s).map(|(tok, _)| tok).collect()
    }

    /// Get current position
    pub fn current_position(&self) -> Position {
        Position::new(self.line, self.column, self.idx)
    }

    fn eof(&self) -> bool {
        self.idx >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input[self.idx..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.idx..].chars().nth(n)
    }

    fn advance_char(&mut self) {
        if let Some(c) = self.peek() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.idx += c.len_utf8();
        }
    }

    fn advance_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance_char();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' => self.advance_char(),
                '\n' if !self.insert_semi => self.advance_char(),
                _ => break,
            }
        }
    }

    fn skip_comment(&mut self) {
        // Skip past the comment opener
        self.advance_char();
        if self.advance_if('/') {
            while let Some(c) = self.peek() {
                if c == '\n' {
                    break;
                }
                self.advance_char();
            }
            return;
        }
        self.advance_char(); // '*'
        while !self.eof() {
            if self.input[self.idx..].starts_with("*/") {
                self.advance_char();
                self.advance_char();
                return;
            }
            self.advance_char();
        }
    }

    /// Whether the comment(s) starting at the current position run to the end
    /// of the line, in which case they act like a newline.
    fn comment_ends_line(&self) -> bool {
        let mut rest = &self.input[self.idx..];
        loop {
            if rest.starts_with("//") {
                return true;
            }
            if let Some(body) = rest.strip_prefix("/*") {
                let Some(close) = body.find("*/") else {
                    return true;
                };
                if body[..close].contains('\n') {
                    return true;
                }
                rest = body[close + 2..].trim_start_matches([' ', '\t', '\r']);
                if rest.is_empty() || rest.starts_with('\n') {
                    return true;
                }
                continue;
            }
            return false;
        }
    }

    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.idx;
        while let Some(c) = self.peek() {
            if !is_ident_continue(c) {
                break;
            }
            self.advance_char();
        }
        TokenKind::lookup_keyword(&self.input[start..self.idx]).unwrap_or(TokenKind::Ident)
    }

    fn scan_digits(&mut self, base: u32) {
        while let Some(c) = self.peek() {
            let ok = c == '_' || if base == 16 { c.is_ascii_hexdigit() } else { c.is_ascii_digit() };
            if !ok {
                break;
            }
            self.advance_char();
        }
    }

    fn scan_number(&mut self) -> TokenKind {
        let mut kind = TokenKind::Int;
        let mut base = 10;

        if self.peek() != Some('.') {
            if self.advance_if('0') {
                match self.peek().map(|c| c.to_ascii_lowercase()) {
                    Some('x') => {
                        self.advance_char();
                        base = 16;
                    }
                    Some('o') => {
                        self.advance_char();
                        base = 8;
                    }
                    Some('b') => {
                        self.advance_char();
                        base = 2;
                    }
                    _ => {}
                }
            }
            self.scan_digits(base);
        }

        if (base == 10 || base == 16) && self.advance_if('.') {
            kind = TokenKind::Float;
            self.scan_digits(base);
        }

        let exp = self.peek().map(|c| c.to_ascii_lowercase());
        if (base == 10 && exp == Some('e')) || (base == 16 && exp == Some('p')) {
            kind = TokenKind::Float;
            self.advance_char();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance_char();
            }
            self.scan_digits(10);
        }

        if self.advance_if('i') {
            kind = TokenKind::Imag;
        }
        kind
    }

    /// Interpreted string or rune literal. Stops at a newline when unterminated.
    fn scan_quoted(&mut self, quote: char) {
        self.advance_char(); // opening quote
        while let Some(c) = self.peek() {
            match c {
                '\n' => return,
                '\\' => {
                    self.advance_char();
                    if matches!(self.peek(), Some(e) if e != '\n') {
                        self.advance_char();
                    }
                }
                _ if c == quote => {
                    self.advance_char();
                    return;
                }
                _ => self.advance_char(),
            }
        }
    }

    fn scan_raw_string(&mut self) {
        self.advance_char(); // '`'
        while let Some(c) = self.peek() {
            self.advance_char();
            if c == '`' {
                return;
            }
        }
    }

    /// `first` already consumed; pick `eq` when followed by '='.
    fn switch2(&mut self, plain: TokenKind, eq: TokenKind) -> TokenKind {
        if self.advance_if('=') { eq } else { plain }
    }

    fn switch3(&mut self, plain: TokenKind, eq: TokenKind, second: char, doubled: TokenKind) -> TokenKind {
        if self.advance_if('=') {
            eq
        } else if self.advance_if(second) {
            doubled
        } else {
            plain
        }
    }

    fn switch4(
        &mut self,
        plain: TokenKind,
        eq: TokenKind,
        second: char,
        doubled: TokenKind,
        doubled_eq: TokenKind,
    ) -> TokenKind {
        if self.advance_if('=') {
            eq
        } else if self.advance_if(second) {
            self.switch2(doubled, doubled_eq)
        } else {
            plain
        }
    }

    fn scan_operator(&mut self, c: char) -> TokenKind {
        use TokenKind::*;
        self.advance_char();
        match c {
            '(' => LParen,
            ')' => RParen,
            '[' => LBrack,
            ']' => RBrack,
            '{' => LBrace,
            '}' => RBrace,
            ',' => Comma,
            ';' => Semicolon,
            ':' => self.switch2(Colon, Define),
            '.' => {
                if self.peek() == Some('.') && self.peek_nth(1) == Some('.') {
                    self.advance_char();
                    self.advance_char();
                    Ellipsis
                } else {
                    Period
                }
            }
            '+' => self.switch3(Add, AddAssign, '+', Inc),
            '-' => self.switch3(Sub, SubAssign, '-', Dec),
            '*' => self.switch2(Mul, MulAssign),
            '/' => self.switch2(Quo, QuoAssign),
            '%' => self.switch2(Rem, RemAssign),
            '^' => self.switch2(Xor, XorAssign),
            '<' => {
                if self.advance_if('-') {
                    Arrow
                } else {
                    self.switch4(Lss, Leq, '<', Shl, ShlAssign)
                }
            }
            '>' => self.switch4(Gtr, Geq, '>', Shr, ShrAssign),
            '=' => self.switch2(Assign, Eql),
            '!' => self.switch2(Not, Neq),
            '&' => {
                if self.advance_if('^') {
                    self.switch2(AndNot, AndNotAssign)
                } else {
                    self.switch3(And, AndAssign, '&', LAnd)
                }
            }
            '|' => self.switch3(Or, OrAssign, '|', LOr),
            '~' => Tilde,
            _ => Illegal,
        }
    }

    fn auto_semicolon(&mut self, start: Position) -> (Token, Span) {
        self.insert_semi = false;
        (Token::new(TokenKind::Semicolon, "\n"), Span::new(start, self.current_position()))
    }

    /// Scan the next token. Returns `None` once the input is exhausted.
    pub fn next_token(&mut self) -> Option<(Token, Span)> {
        loop {
            self.skip_whitespace();
            let start = self.current_position();

            let Some(c) = self.peek() else {
                if self.insert_semi {
                    return Some(self.auto_semicolon(start));
                }
                return None;
            };

            let kind = match c {
                '\n' => {
                    // only reached while a semicolon is pending
                    self.advance_char();
                    return Some(self.auto_semicolon(start));
                }
                '/' if matches!(self.peek_nth(1), Some('/' | '*')) => {
                    if self.insert_semi && self.comment_ends_line() {
                        return Some(self.auto_semicolon(start));
                    }
                    self.skip_comment();
                    continue;
                }
                _ if is_letter(c) => self.scan_identifier(),
                '0'..='9' => self.scan_number(),
                '.' if matches!(self.peek_nth(1), Some('0'..='9')) => self.scan_number(),
                '"' => {
                    self.scan_quoted('"');
                    TokenKind::String
                }
                '\'' => {
                    self.scan_quoted('\'');
                    TokenKind::Char
                }
                '`' => {
                    self.scan_raw_string();
                    TokenKind::String
                }
                _ => self.scan_operator(c),
            };

            if kind != TokenKind::Illegal {
                self.insert_semi = kind.ends_statement();
            }
            let end = self.current_position();
            let lit = &self.input[start.offset..end.offset];
            return Some((Token::new(kind, lit), Span::new(start, end)));
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = (Token, Span);

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
