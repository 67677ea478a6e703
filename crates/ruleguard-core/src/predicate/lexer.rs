//! Tokenizer for custom function sources.

use crate::errors::RuleError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Str(String),
    Ident(String),
    Let,
    Fn,
    True,
    False,
    Null,
    And,
    Or,
    Not,
    In,
    Pipe,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Eof,
}

/// A token and the byte offset it starts at.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

pub(crate) fn syntax_error(offset: usize, message: impl Into<String>) -> RuleError {
    RuleError::PredicateSyntax {
        offset,
        message: message.into(),
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, RuleError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        let kind = match ch {
            ' ' | '\t' | '\r' | '\n' => continue,

            // Comment: rest of line
            '#' => {
                for (_, c) in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
                continue;
            }

            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,

            '|' => {
                if chars.next_if(|&(_, c)| c == '|').is_some() {
                    TokenKind::Or
                } else {
                    TokenKind::Pipe
                }
            }
            '&' => {
                if chars.next_if(|&(_, c)| c == '&').is_some() {
                    TokenKind::And
                } else {
                    return Err(syntax_error(start, "expected '&&'"));
                }
            }
            '=' => {
                if chars.next_if(|&(_, c)| c == '=').is_some() {
                    TokenKind::Eq
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if chars.next_if(|&(_, c)| c == '=').is_some() {
                    TokenKind::Ne
                } else {
                    TokenKind::Not
                }
            }
            '<' => {
                if chars.next_if(|&(_, c)| c == '=').is_some() {
                    TokenKind::Le
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if chars.next_if(|&(_, c)| c == '=').is_some() {
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }

            quote @ ('"' | '\'') => {
                let mut text = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == quote {
                        closed = true;
                        break;
                    }
                    text.push(c);
                }
                if !closed {
                    return Err(syntax_error(start, "unterminated string literal"));
                }
                TokenKind::Str(text)
            }

            c if c.is_ascii_digit() || c == '.' => {
                let mut end = start + c.len_utf8();
                while let Some(&(idx, next)) = chars.peek() {
                    if next.is_ascii_digit() || next == '.' || next == '_' {
                        end = idx + next.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let literal = source[start..end].replace('_', "");
                let number = literal
                    .parse::<f64>()
                    .map_err(|_| syntax_error(start, format!("invalid number '{}'", literal)))?;
                TokenKind::Number(number)
            }

            c if c.is_alphabetic() || c == '_' => {
                let mut end = start + c.len_utf8();
                while let Some(&(idx, next)) = chars.peek() {
                    if next.is_alphanumeric() || next == '_' {
                        end = idx + next.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                keyword_or_ident(&source[start..end])
            }

            other => {
                return Err(syntax_error(
                    start,
                    format!("unexpected character '{}'", other),
                ));
            }
        };
        tokens.push(Token {
            kind,
            offset: start,
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        offset: source.len(),
    });
    Ok(tokens)
}

fn keyword_or_ident(word: &str) -> TokenKind {
    match word {
        "let" => TokenKind::Let,
        "fn" => TokenKind::Fn,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "in" => TokenKind::In,
        _ => TokenKind::Ident(word.to_string()),
    }
}
