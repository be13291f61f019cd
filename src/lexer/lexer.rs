use lazy_static::lazy_static;
use regex::Regex;

use crate::{errors::diagnostics::Diagnostic, unit::CompilationUnit, MK_TOKEN};

use super::tokens::{Token, TokenConfig, TokenKind, DEFAULT_CONFIG};

pub type PatternHandler = fn(&mut Lexer);

pub struct RegexPattern {
    regex: Regex,
    handler: PatternHandler,
}

lazy_static! {
    // Tried in order against the start of the remaining source.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new(r"^//").unwrap(), handler: line_comment_handler },
        RegexPattern { regex: Regex::new(r"^/\*").unwrap(), handler: block_comment_handler },
        RegexPattern { regex: Regex::new(r"^\\").unwrap(), handler: macro_handler },
        RegexPattern { regex: Regex::new(r"^\s").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^[:;=\-,.+*/|()\[\]{}<>]").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new(r"^[0-9]").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new(r"^'").unwrap(), handler: char_handler },
        RegexPattern { regex: Regex::new("^\"").unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new(r"^\p{L}").unwrap(), handler: literal_handler },
    ];
    static ref MACRO_RUN: Regex = Regex::new(r"^\\[\p{L}\p{Nd}]*").unwrap();
    static ref NUMBER_RUN: Regex = Regex::new(r"^[0-9]+").unwrap();
    static ref LITERAL_RUN: Regex = Regex::new(r"^\p{L}[\p{L}\p{Nd}]*").unwrap();
}

/// Single forward cursor over a unit's source. Malformed input is reported
/// on the unit and skipped; lexing always runs to the end of the file.
pub struct Lexer<'a> {
    unit: &'a mut CompilationUnit,
    config: &'a TokenConfig,
    source: String,
    tokens: Vec<Token>,
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(unit: &'a mut CompilationUnit, config: &'a TokenConfig) -> Lexer<'a> {
        Lexer {
            source: unit.code.clone(),
            unit,
            config,
            tokens: vec![],
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Builds the token list for the unit, terminated by an `EndOfFile` token.
    pub fn parse(&mut self) {
        self.tokens.clear();
        self.pos = 0;
        self.line = 1;
        self.col = 1;

        while !self.at_eof() {
            let handler = PATTERNS
                .iter()
                .find(|pattern| pattern.regex.is_match(self.remainder()))
                .map(|pattern| pattern.handler);

            match handler {
                Some(handler) => handler(self),
                None => {
                    let unknown = self.peek().unwrap_or_default();
                    self.error(3, self.line, self.col + 1, format!("Unexpected character '{}'.", unknown));
                    self.advance();
                }
            }
        }

        self.push(TokenKind::EndOfFile, String::new());
        log::trace!(target: "lexer", "{} produced {} tokens", self.unit.file_name, self.tokens.len());
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.remainder().chars().nth(n)
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn advance(&mut self) {
        match self.peek() {
            None => {
                self.error(4, self.line, self.col, String::from("Reached end of file unexpectedly."));
            }
            Some(c) => {
                if c == '\n' {
                    self.line += 1;
                    self.col = 1;
                } else {
                    self.col += 1;
                }
                self.pos += c.len_utf8();
            }
        }
    }

    /// Consumes the text matched by `regex` at the cursor and returns it.
    fn take(&mut self, regex: &Regex) -> String {
        let matched = regex
            .find(self.remainder())
            .map(|found| found.as_str().to_string())
            .unwrap_or_default();

        for _ in matched.chars() {
            self.advance();
        }

        matched
    }

    fn push(&mut self, kind: TokenKind, data: String) {
        self.push_at(kind, data, self.col);
    }

    fn push_at(&mut self, kind: TokenKind, data: String, col: usize) {
        self.tokens.push(MK_TOKEN!(kind, data, self.line, col));
    }

    fn error(&mut self, code: u32, line: usize, col: usize, message: String) {
        let diagnostic = Diagnostic::symbol_error(self.unit, code, line, col, message);
        self.unit.add_diagnostic(diagnostic);
    }

    /// Splits a run of symbol characters into tokens, longest table entry
    /// first, shrinking the candidate by one character on each miss.
    fn greedy_symbol(&mut self, symbols: &str) {
        let chars: Vec<char> = symbols.chars().collect();
        let run_start = self.col - chars.len();
        let max_len = self.config.max_symbol_len;
        let longest = |start: usize| chars.len().min(start + max_len);
        let mut start = 0;
        let mut end = longest(start);

        while start < chars.len() {
            if end == start {
                self.error(3, self.line, run_start + start + 1, format!("Unexpected character '{}'.", chars[start]));
                start += 1;
                end = longest(start);
                continue;
            }

            let candidate: String = chars[start..end].iter().collect();
            if let Some(kind) = self.config.symbols.get(&candidate).copied() {
                self.push_at(kind, candidate, run_start + end);
                start = end;
                end = longest(start);
            } else {
                end -= 1;
            }
        }
    }
}

fn line_comment_handler(lexer: &mut Lexer) {
    while lexer.peek().is_some_and(|c| c != '\n') {
        lexer.advance();
    }
}

fn block_comment_handler(lexer: &mut Lexer) {
    lexer.advance();
    lexer.advance();

    while !lexer.at_eof() && !(lexer.peek() == Some('*') && lexer.peek_ahead(1) == Some('/')) {
        lexer.advance();
    }

    if lexer.at_eof() {
        // Unterminated; stepping past the end reports it.
        lexer.advance();
    } else {
        lexer.advance();
        lexer.advance();
    }
}

fn macro_handler(lexer: &mut Lexer) {
    let text = lexer.take(&MACRO_RUN);

    match lexer.config.symbols.get(&text).copied() {
        Some(kind) => lexer.push(kind, String::new()),
        None => lexer.error(3, lexer.line, lexer.col, format!("Unknown macro '{}'.", text)),
    }
}

fn skip_handler(lexer: &mut Lexer) {
    lexer.advance();
}

fn is_symbol_char(c: char) -> bool {
    ":;=-,.+*/|()[]{}<>".contains(c)
}

// A run ends where a comment starts.
fn symbol_handler(lexer: &mut Lexer) {
    let mut run = String::new();

    while let Some(c) = lexer.peek().filter(|&c| is_symbol_char(c)) {
        if c == '/' && !run.is_empty() && matches!(lexer.peek_ahead(1), Some('/' | '*')) {
            break;
        }
        run.push(c);
        lexer.advance();
    }

    lexer.greedy_symbol(&run);
}

fn number_handler(lexer: &mut Lexer) {
    let digits = lexer.take(&NUMBER_RUN);
    lexer.push(TokenKind::Number, digits);
}

fn literal_handler(lexer: &mut Lexer) {
    let text = lexer.take(&LITERAL_RUN);
    let kind = if lexer.config.keywords.contains(&text) {
        TokenKind::Keyword
    } else {
        TokenKind::Identifier
    };
    lexer.push(kind, text);
}

fn char_handler(lexer: &mut Lexer) {
    lexer.advance();
    let start = lexer.pos;

    while lexer.peek().is_some_and(|c| c != '\'' && c != '\n') {
        lexer.advance();
    }

    let content = lexer.source[start..lexer.pos].to_string();

    if lexer.peek() != Some('\'') {
        lexer.error(1, lexer.line, lexer.col, format!("Unexpected end of character literal '{}'.", content.trim_end()));
        return;
    }

    if content.is_empty() {
        lexer.advance();
        lexer.error(1, lexer.line, lexer.col, String::from("Empty character literal."));
        return;
    }

    lexer.push(TokenKind::Char, content);
    lexer.advance();
}

fn string_handler(lexer: &mut Lexer) {
    lexer.advance();
    let start = lexer.pos;

    while lexer.peek().is_some_and(|c| c != '"' && c != '\n') {
        lexer.advance();
    }

    let content = lexer.source[start..lexer.pos].to_string();

    if lexer.peek() != Some('"') {
        lexer.error(2, lexer.line, lexer.col, format!("Unexpected end of string '{}'.", content.trim_end()));
        return;
    }

    lexer.push(TokenKind::String, content);
    lexer.advance();
}

/// Lexes the unit with the bundled token configuration.
pub fn tokenize(unit: &mut CompilationUnit) -> Vec<Token> {
    tokenize_with(unit, &DEFAULT_CONFIG)
}

pub fn tokenize_with(unit: &mut CompilationUnit, config: &TokenConfig) -> Vec<Token> {
    let mut lexer = Lexer::new(unit, config);
    lexer.parse();
    lexer.into_tokens()
}
