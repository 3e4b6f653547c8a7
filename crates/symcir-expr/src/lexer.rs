//! Tokenizer for expression text.

use crate::error::{Error, Result};

/// A lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal.
    Number(f64),
    /// Identifier (symbol, function, or built-in name).
    Name(String),
    Plus,
    Minus,
    Star,
    Slash,
    /// `^` or `**`.
    Caret,
    LParen,
    RParen,
    Comma,
    Eof,
}

/// A token together with its byte offset in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub position: usize,
}

/// Tokenize an expression string.
pub fn tokenize(src: &str) -> Result<Vec<SpannedToken>> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if !bytes[i].is_ascii() {
            // `i` is a char boundary here: everything consumed so far is ASCII.
            let ch = src[i..].chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
            return Err(Error::Syntax {
                position: i,
                message: format!("unsupported non-ASCII character '{}'", ch),
            });
        }
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                i += 1;
            }
            '+' => {
                tokens.push(SpannedToken { token: Token::Plus, position: i });
                i += 1;
            }
            '-' => {
                tokens.push(SpannedToken { token: Token::Minus, position: i });
                i += 1;
            }
            '*' => {
                if bytes.get(i + 1) == Some(&b'*') {
                    tokens.push(SpannedToken { token: Token::Caret, position: i });
                    i += 2;
                } else {
                    tokens.push(SpannedToken { token: Token::Star, position: i });
                    i += 1;
                }
            }
            '/' => {
                tokens.push(SpannedToken { token: Token::Slash, position: i });
                i += 1;
            }
            '^' => {
                tokens.push(SpannedToken { token: Token::Caret, position: i });
                i += 1;
            }
            '(' => {
                tokens.push(SpannedToken { token: Token::LParen, position: i });
                i += 1;
            }
            ')' => {
                tokens.push(SpannedToken { token: Token::RParen, position: i });
                i += 1;
            }
            ',' => {
                tokens.push(SpannedToken { token: Token::Comma, position: i });
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < bytes.len() && matches!(bytes[i] as char, '0'..='9' | '.') {
                    i += 1;
                }
                // Exponent suffix: 1e-3, 2.5E6
                if i < bytes.len() && matches!(bytes[i] as char, 'e' | 'E') {
                    let mut j = i + 1;
                    if j < bytes.len() && matches!(bytes[j] as char, '+' | '-') {
                        j += 1;
                    }
                    if j < bytes.len() && (bytes[j] as char).is_ascii_digit() {
                        i = j;
                        while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text = &src[start..i];
                let value: f64 = text.parse().map_err(|_| Error::Syntax {
                    position: start,
                    message: format!("invalid number '{}'", text),
                })?;
                tokens.push(SpannedToken { token: Token::Number(value), position: start });
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < bytes.len()
                    && (bytes[i].is_ascii_alphanumeric()
                        || matches!(bytes[i] as char, '_' | '{' | '}' | '^' | '\''))
                {
                    // A caret inside a name is only the superscript notation
                    // when followed by a brace group.
                    if bytes[i] as char == '^' && bytes.get(i + 1) != Some(&b'{') {
                        break;
                    }
                    i += 1;
                }
                tokens.push(SpannedToken {
                    token: Token::Name(src[start..i].to_string()),
                    position: start,
                });
            }
            other => {
                return Err(Error::Syntax {
                    position: i,
                    message: format!("unexpected character '{}'", other),
                });
            }
        }
    }

    tokens.push(SpannedToken { token: Token::Eof, position: src.len() });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple() {
        let toks = tokenize("cos(3*t) + 5").unwrap();
        let kinds: Vec<Token> = toks.into_iter().map(|t| t.token).collect();
        assert_eq!(
            kinds,
            vec![
                Token::Name("cos".into()),
                Token::LParen,
                Token::Number(3.0),
                Token::Star,
                Token::Name("t".into()),
                Token::RParen,
                Token::Plus,
                Token::Number(5.0),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_double_star_power() {
        let toks = tokenize("s**2").unwrap();
        assert_eq!(toks[1].token, Token::Caret);
    }

    #[test]
    fn test_tokenize_subscript_name() {
        let toks = tokenize("R_{out}").unwrap();
        assert_eq!(toks[0].token, Token::Name("R_{out}".into()));
    }

    #[test]
    fn test_tokenize_scientific_number() {
        let toks = tokenize("1e-3").unwrap();
        assert_eq!(toks[0].token, Token::Number(1e-3));
    }

    #[test]
    fn test_tokenize_rejects_garbage() {
        assert!(tokenize("3 $ 4").is_err());
    }

    #[test]
    fn test_tokenize_rejects_non_ascii() {
        // Greek letters are spelled out ("omega"); raw codepoints are a
        // syntax error, not a panic.
        let err = tokenize("ω*t").unwrap_err();
        assert!(err.to_string().contains("non-ASCII"));
        assert!(tokenize("5*cosθ").is_err());
    }
}
