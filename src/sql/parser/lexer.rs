//! SQL Lexer - statement detection and WHERE clause word scanning
//!
//! Statements are recognised by their leading keywords. WHERE clauses are cut
//! into whitespace-separated words, so quoted literals containing spaces are
//! split like any other text.

use std::str::SplitWhitespace;

use super::ast::StatementKind;

/// Represents a single word of a WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Reserved word of the condition grammar
    Keyword(Keyword),
    /// Any other word: field name or literal
    Word(String),
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

/// Reserved words of the condition grammar
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Keyword {
    And,
    Or,
    Like,
    In,
    Is,
    Not,
}

impl Keyword {
    /// Attempts to parse a string as a keyword (case-insensitive)
    pub fn from_str(ident: &str) -> Option<Keyword> {
        Some(match ident.to_uppercase().as_ref() {
            "AND" => Keyword::And,
            "OR" => Keyword::Or,
            "LIKE" => Keyword::Like,
            "IN" => Keyword::In,
            "IS" => Keyword::Is,
            "NOT" => Keyword::Not,
            _ => return None,
        })
    }
}

/// Detects the statement kind from the leading keywords of a trimmed statement
///
/// Matching is a plain case-insensitive prefix test in a fixed order, the
/// first kind whose keywords prefix the text wins.
pub fn statement_kind(sql: &str) -> Option<StatementKind> {
    let upper = sql.to_uppercase();
    StatementKind::ALL
        .into_iter()
        .find(|kind| upper.starts_with(kind.prefix()))
}

/// WHERE clause lexer
pub struct Lexer<'a> {
    words: SplitWhitespace<'a>,
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.words.next().map(Self::scan)
    }
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given condition text
    pub fn new(text: &'a str) -> Self {
        Self {
            words: text.split_whitespace(),
        }
    }

    /// Classifies a single word
    fn scan(word: &str) -> Token {
        match word {
            "=" => Token::Equal,
            "<>" => Token::NotEqual,
            "<" => Token::LessThan,
            "<=" => Token::LessThanOrEqual,
            ">" => Token::GreaterThan,
            ">=" => Token::GreaterThanOrEqual,
            _ => Keyword::from_str(word)
                .map_or_else(|| Token::Word(word.to_string()), Token::Keyword),
        }
    }
}
