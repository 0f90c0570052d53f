//! Tokenizer and token cursor shared by the annotation and schema parsers.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected token `{token}` on line {line}")]
    UnexpectedToken { token: String, line: usize },
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Ident(String),
    Symbol(char),
    Eof,
}

impl Token {
    fn text(&self) -> String {
        match self {
            Token::Ident(name) => name.clone(),
            Token::Symbol(ch) => ch.to_string(),
            Token::Eof => "<eof>".to_string(),
        }
    }
}

pub(crate) struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    pub(crate) fn new(src: &str) -> Result<Self, ParseError> {
        Ok(Self {
            tokens: tokenize(src)?,
            pos: 0,
        })
    }

    pub(crate) fn is_eof(&self) -> bool {
        matches!(self.peek(), Token::Eof)
    }

    pub(crate) fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map_or(&Token::Eof, |(tok, _)| tok)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |(_, line)| *line)
    }

    fn next(&mut self) -> Token {
        let tok = self.peek().clone();
        if !matches!(tok, Token::Eof) {
            self.pos += 1;
        }
        tok
    }

    /// Error for the token that was just consumed.
    fn unexpected(&self, tok: Token) -> ParseError {
        match tok {
            Token::Eof => ParseError::UnexpectedEof,
            other => ParseError::UnexpectedToken {
                token: other.text(),
                line: self.tokens.get(self.pos.saturating_sub(1)).map_or(1, |(_, l)| *l),
            },
        }
    }

    pub(crate) fn expect_symbol(&mut self, expected: char) -> Result<(), ParseError> {
        match self.next() {
            Token::Symbol(ch) if ch == expected => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    pub(crate) fn accept_symbol(&mut self, expected: char) -> bool {
        if matches!(self.peek(), Token::Symbol(ch) if *ch == expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.next() {
            Token::Ident(name) => Ok(name),
            other => Err(self.unexpected(other)),
        }
    }

    pub(crate) fn accept_ident(&mut self, expected: &str) -> bool {
        if matches!(self.peek(), Token::Ident(name) if name == expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_eof(&mut self) -> Result<(), ParseError> {
        match self.next() {
            Token::Eof => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    /// Error pointing at the current token without consuming it.
    pub(crate) fn error_here(&self) -> ParseError {
        match self.peek() {
            Token::Eof => ParseError::UnexpectedEof,
            tok => ParseError::UnexpectedToken {
                token: tok.text(),
                line: self.line(),
            },
        }
    }
}

fn tokenize(src: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = src.chars().peekable();
    let mut line = 1;

    while let Some(&ch) = chars.peek() {
        if ch == '\n' {
            line += 1;
            chars.next();
            continue;
        }

        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        if ch == '/' {
            chars.next();
            if matches!(chars.peek(), Some('/')) {
                for next in chars.by_ref() {
                    if next == '\n' {
                        line += 1;
                        break;
                    }
                }
                continue;
            }
            if matches!(chars.peek(), Some('*')) {
                chars.next();
                while let Some(next) = chars.next() {
                    if next == '\n' {
                        line += 1;
                    }
                    if next == '*' && matches!(chars.peek(), Some('/')) {
                        chars.next();
                        break;
                    }
                }
                continue;
            }
            return Err(ParseError::UnexpectedToken {
                token: "/".to_string(),
                line,
            });
        }

        if is_ident_start(ch) {
            let mut ident = String::new();
            while let Some(&next) = chars.peek() {
                if is_ident_continue(next) {
                    ident.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push((Token::Ident(ident), line));
            continue;
        }

        if is_symbol(ch) {
            tokens.push((Token::Symbol(ch), line));
            chars.next();
            continue;
        }

        return Err(ParseError::UnexpectedToken {
            token: ch.to_string(),
            line,
        });
    }

    tokens.push((Token::Eof, line));
    Ok(tokens)
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn is_symbol(ch: char) -> bool {
    matches!(ch, '[' | ']' | '{' | '}' | '(' | ')' | ':' | ',' | '-' | '>')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idents(src: &str) -> Vec<Token> {
        tokenize(src)
            .expect("tokenize")
            .into_iter()
            .map(|(tok, _)| tok)
            .collect()
    }

    #[test]
    fn skips_comments() {
        let tokens = idents("// header\nList /* inline */ [ int ]");
        assert_eq!(
            tokens,
            vec![
                Token::Ident("List".into()),
                Token::Symbol('['),
                Token::Ident("int".into()),
                Token::Symbol(']'),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn reports_line_of_bad_character() {
        let err = tokenize("record A {\n  x: int ?\n}").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                token: "?".into(),
                line: 2
            }
        );
    }

    #[test]
    fn expect_symbol_reports_consumed_token() {
        let mut parser = Parser::new("a\nb").expect("tokenize");
        assert_eq!(parser.expect_ident().as_deref(), Ok("a"));
        assert_eq!(
            parser.expect_symbol(':'),
            Err(ParseError::UnexpectedToken {
                token: "b".into(),
                line: 2
            })
        );
        assert_eq!(parser.expect_symbol(':'), Err(ParseError::UnexpectedEof));
    }
}
