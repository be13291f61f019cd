use lazy_static::lazy_static;
use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
    fs,
    path::Path,
};

use thiserror::Error;

lazy_static! {
    /// Token configuration bundled with the compiler, parsed on first use.
    pub static ref DEFAULT_CONFIG: TokenConfig = TokenConfig::parse(
        include_str!("../../res/symbols.txt"),
        include_str!("../../res/keywords.txt"),
    )
    .expect("bundled token configuration is malformed");
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Keyword,

    // Literals
    Identifier,
    Number,
    Char,
    String,

    // Symbols
    TypeDef,      // :
    FuncType,     // ->
    Def,          // :=
    MapsTo,       // |->
    Gets,         // <-
    LBrack,
    RBrack,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semicolon,
    Comma,
    Period,
    Minus,
    Plus,
    Times,
    Slash,
    Equals,
    Less,
    DoubleTo,     // =>
    DoubleMapsTo, // |=>

    EndOfFile,
}

impl TokenKind {
    /// Resolves the upper-case name used in symbol configuration files.
    pub fn from_name(name: &str) -> Option<TokenKind> {
        let kind = match name {
            "KEYWORD" => TokenKind::Keyword,
            "IDENTIFIER" => TokenKind::Identifier,
            "NUMBER" => TokenKind::Number,
            "CHAR" => TokenKind::Char,
            "STRING" => TokenKind::String,
            "TYPEDEF" => TokenKind::TypeDef,
            "FUNCTYPE" => TokenKind::FuncType,
            "DEF" => TokenKind::Def,
            "MAPSTO" => TokenKind::MapsTo,
            "GETS" => TokenKind::Gets,
            "LBRACK" => TokenKind::LBrack,
            "RBRACK" => TokenKind::RBrack,
            "LPAREN" => TokenKind::LParen,
            "RPAREN" => TokenKind::RParen,
            "LBRACE" => TokenKind::LBrace,
            "RBRACE" => TokenKind::RBrace,
            "SEMICOLON" => TokenKind::Semicolon,
            "COMMA" => TokenKind::Comma,
            "PERIOD" => TokenKind::Period,
            "MINUS" => TokenKind::Minus,
            "PLUS" => TokenKind::Plus,
            "TIMES" => TokenKind::Times,
            "SLASH" => TokenKind::Slash,
            "EQUALS" => TokenKind::Equals,
            "LESS" => TokenKind::Less,
            "DOUBLETO" => TokenKind::DoubleTo,
            "DOUBLEMAPSTO" => TokenKind::DoubleMapsTo,
            "EOF" => TokenKind::EndOfFile,
            _ => return None,
        };
        Some(kind)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A lexed token. `col` is the column *after* the token, so the first
/// column of the token is `col - data.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub data: String,
    pub line: usize,
    pub col: usize,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.data.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}[{}]", self.kind, self.data)
        }
    }
}

impl Token {
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.data == keyword
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read token configuration {path:?}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown token kind {name:?} on line {line}")]
    UnknownKind { name: String, line: usize },
    #[error("symbol line {line} has no symbols")]
    EmptySymbolLine { line: usize },
}

/// Multi-character operator table and keyword set consumed by the lexer.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub symbols: HashMap<String, TokenKind>,
    pub keywords: HashSet<String>,
    /// Length in characters of the longest symbol.
    pub max_symbol_len: usize,
}

impl TokenConfig {
    /// Parses the two line-oriented resources: `KIND text text ...` per symbol
    /// line, one keyword per keyword line. Blank lines are ignored.
    pub fn parse(symbols: &str, keywords: &str) -> Result<TokenConfig, ConfigError> {
        let mut symbol_map = HashMap::new();

        for (index, line) in symbols.lines().enumerate() {
            let mut parts = line.split_whitespace();
            let Some(name) = parts.next() else {
                continue;
            };

            let kind = TokenKind::from_name(name).ok_or_else(|| ConfigError::UnknownKind {
                name: name.to_string(),
                line: index + 1,
            })?;

            let mut any = false;
            for text in parts {
                symbol_map.insert(text.to_string(), kind);
                any = true;
            }

            if !any {
                return Err(ConfigError::EmptySymbolLine { line: index + 1 });
            }
        }

        let keyword_set = keywords
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        let max_symbol_len = symbol_map.keys().map(|text| text.chars().count()).max().unwrap_or(0);

        Ok(TokenConfig {
            symbols: symbol_map,
            keywords: keyword_set,
            max_symbol_len,
        })
    }

    pub fn load(symbols_path: &Path, keywords_path: &Path) -> Result<TokenConfig, ConfigError> {
        let read = |path: &Path| {
            fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_string_lossy().into_owned(),
                source,
            })
        };

        TokenConfig::parse(&read(symbols_path)?, &read(keywords_path)?)
    }
}
