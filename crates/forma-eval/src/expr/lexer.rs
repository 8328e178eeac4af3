//! Template tokenizer.

use crate::error::EvalError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Text(String),
    Bool(bool),
    /// `${name}`
    Placeholder(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

/// A token and the byte offset it starts at.
pub type Spanned = (usize, Token);

pub fn tokenize(source: &str) -> Result<Vec<Spanned>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '+' | '-' | '*' | '/' | '(' | ')' => {
                chars.next();
                let token = match ch {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '(' => Token::LParen,
                    _ => Token::RParen,
                };
                tokens.push((offset, token));
            }
            '$' => {
                chars.next();
                if chars.next().map(|(_, c)| c) != Some('{') {
                    return Err(EvalError::syntax(offset, "expected '{' after '$'"));
                }
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, c)) => name.push(c),
                        None => return Err(EvalError::syntax(offset, "unclosed placeholder")),
                    }
                }
                let name = name.trim();
                if name.is_empty() {
                    return Err(EvalError::syntax(offset, "empty placeholder"));
                }
                tokens.push((offset, Token::Placeholder(name.to_string())));
            }
            '\'' | '"' | '`' => {
                chars.next();
                let text = read_string(&mut chars, ch, offset)?;
                tokens.push((offset, Token::Text(text)));
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut literal = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        literal.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let number = literal.parse::<f64>().map_err(|_| {
                    EvalError::syntax(offset, format!("malformed number '{literal}'"))
                })?;
                tokens.push((offset, Token::Number(number)));
            }
            c if c.is_ascii_alphabetic() => {
                let mut word = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let token = match word.as_str() {
                    "true" => Token::Bool(true),
                    "false" => Token::Bool(false),
                    _ => {
                        return Err(EvalError::syntax(
                            offset,
                            format!("unexpected identifier '{word}'"),
                        ));
                    }
                };
                tokens.push((offset, token));
            }
            other => {
                return Err(EvalError::syntax(
                    offset,
                    format!("unexpected character '{other}'"),
                ));
            }
        }
    }

    Ok(tokens)
}

fn read_string(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    quote: char,
    start: usize,
) -> Result<String, EvalError> {
    let mut text = String::new();
    loop {
        match chars.next() {
            Some((_, c)) if c == quote => return Ok(text),
            Some((_, '\\')) => match chars.next() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, c)) => text.push(c),
                None => break,
            },
            Some((_, c)) => text.push(c),
            None => break,
        }
    }
    Err(EvalError::syntax(start, "unterminated string literal"))
}
