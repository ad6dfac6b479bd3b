// Tokenizer for semantics-lang
// Turns a character stream into the flat token sequence the evaluator walks.

pub mod types;

use std::fmt;

/// A single token of source text. Structural delimiters (`(`, `)`, `?`, `:`)
/// are always their own one-character tokens; everything else is an opaque
/// identifier/literal atom.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(pub String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_open(&self) -> bool {
        self.0 == "("
    }

    pub fn is_close(&self) -> bool {
        self.0 == ")"
    }

    pub fn is_annotation(&self) -> bool {
        self.0 == "?"
    }

    pub fn is_colon(&self) -> bool {
        self.0 == ":"
    }

    /// True for the four delimiter tokens that can never be identifiers.
    pub fn is_structural(&self) -> bool {
        matches!(self.0.as_str(), "(" | ")" | "?" | ":")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Token(s.to_string())
    }
}

/// Lazy tokenizer over a character stream. Finite and non-restartable; to
/// tokenize again, build a new one from the original source. Tokenization is
/// total: any character sequence produces a (possibly empty) token stream.
pub struct Tokenizer<'a> {
    chars: std::str::Chars<'a>,
    acc: String,
    pending: Option<Token>,
    done: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Tokenizer {
            chars: source.chars(),
            acc: String::new(),
            pending: None,
            done: false,
        }
    }

    fn flush(&mut self) -> Option<Token> {
        if self.acc.is_empty() {
            None
        } else {
            Some(Token(std::mem::take(&mut self.acc)))
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }
        if self.done {
            return None;
        }
        loop {
            match self.chars.next() {
                None => {
                    self.done = true;
                    return self.flush();
                }
                Some(c) if c.is_whitespace() => {
                    if let Some(token) = self.flush() {
                        return Some(token);
                    }
                }
                Some(c @ ('(' | ')' | '?' | ':')) => {
                    let delimiter = Token(c.to_string());
                    return match self.flush() {
                        Some(token) => {
                            self.pending = Some(delimiter);
                            Some(token)
                        }
                        None => Some(delimiter),
                    };
                }
                Some(c) => self.acc.push(c),
            }
        }
    }
}

/// Tokenize a full source string into an addressable token sequence.
pub fn tokenize(source: &str) -> Vec<Token> {
    Tokenizer::new(source).collect()
}
