//! Pull lexer: positioned tokens out of TOON source text.
//!
//! The lexer is driven by the parser one token at a time. Indentation is
//! derived rather than tokenized: a stack of leading-space widths tracks the
//! current nesting path, and [`Lexer::depth`] reports the level of the line
//! holding the most recently scanned token. Two pieces of context make the
//! token stream deterministic: the parser announces the active delimiter
//! while reading inline values and tabular rows, and the lexer itself treats
//! delimiter characters as separators inside `[...]` and `{...}`.

use crate::{Delimiter, Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Colon,
    Dash,
    Delimiter(Delimiter),
    Newline,
    Scalar { text: String, quoted: bool },
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

pub(crate) struct Lexer<'a> {
    input: &'a [u8],
    text: &'a str,
    position: usize,
    line: usize,
    column: usize,
    indent_stack: Vec<usize>,
    active_delimiter: Option<Delimiter>,
    in_brackets: bool,
    in_braces: bool,
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            text: input,
            position: 0,
            line: 1,
            column: 1,
            indent_stack: vec![0],
            active_delimiter: None,
            in_brackets: false,
            in_braces: false,
            at_line_start: true,
        }
    }

    /// Delimiter that currently terminates bare scalars and lexes as a
    /// separator. Activated by the parser for inline values and tabular
    /// rows, cleared afterwards.
    pub fn set_active_delimiter(&mut self, delimiter: Option<Delimiter>) {
        self.active_delimiter = delimiter;
    }

    /// Indentation level of the line containing the most recently scanned
    /// token. Level 0 is the document root.
    pub fn depth(&self) -> usize {
        self.indent_stack.len() - 1
    }

    pub fn next_token(&mut self) -> Result<Token> {
        if self.at_line_start {
            if let Some(token) = self.consume_indent()? {
                return Ok(token);
            }
        }
        self.skip_spaces();

        let line = self.line;
        let column = self.column;
        let kind = match self.peek_byte() {
            None => TokenKind::Eof,
            Some(b'\n') | Some(b'\r') => {
                self.consume_newline();
                TokenKind::Newline
            }
            Some(b'[') => {
                self.advance_byte();
                self.in_brackets = true;
                TokenKind::LeftBracket
            }
            Some(b']') => {
                self.advance_byte();
                self.in_brackets = false;
                TokenKind::RightBracket
            }
            Some(b'{') => {
                self.advance_byte();
                self.in_braces = true;
                TokenKind::LeftBrace
            }
            Some(b'}') => {
                self.advance_byte();
                self.in_braces = false;
                TokenKind::RightBrace
            }
            Some(b':') => {
                self.advance_byte();
                TokenKind::Colon
            }
            Some(b'-') if self.is_list_dash() => {
                self.advance_byte();
                TokenKind::Dash
            }
            Some(b'"') => self.scan_quoted()?,
            Some(byte) => match self.delimiter_here(byte) {
                Some(delimiter) => {
                    self.advance_byte();
                    TokenKind::Delimiter(delimiter)
                }
                None => self.scan_bare(),
            },
        };

        Ok(Token { kind, line, column })
    }

    /// Process leading whitespace at the start of a line: reject tabs,
    /// short-circuit blank lines, and adjust the indent-width stack.
    fn consume_indent(&mut self) -> Result<Option<Token>> {
        let line = self.line;
        let mut width = 0;
        while let Some(byte) = self.peek_byte() {
            match byte {
                b' ' => {
                    width += 1;
                    self.advance_byte();
                }
                b'\t' => {
                    return Err(Error::InvalidIndentation {
                        line,
                        column: width + 1,
                    });
                }
                _ => break,
            }
        }

        match self.peek_byte() {
            // Blank lines do not participate in the indentation discipline.
            None => {
                self.at_line_start = false;
                return Ok(Some(Token {
                    kind: TokenKind::Eof,
                    line,
                    column: self.column,
                }));
            }
            Some(b'\n') | Some(b'\r') => {
                let column = self.column;
                self.consume_newline();
                return Ok(Some(Token {
                    kind: TokenKind::Newline,
                    line,
                    column,
                }));
            }
            Some(_) => {}
        }

        self.at_line_start = false;
        let top = self.stack_top();
        if width > top {
            self.indent_stack.push(width);
        } else if width < top {
            while self.indent_stack.len() > 1 && self.stack_top() > width {
                self.indent_stack.pop();
            }
            if self.stack_top() != width {
                return Err(Error::InvalidIndentation {
                    line,
                    column: width + 1,
                });
            }
        }
        Ok(None)
    }

    fn scan_quoted(&mut self) -> Result<TokenKind> {
        let open_line = self.line;
        let open_column = self.column;
        let unterminated = Error::UnterminatedString {
            line: open_line,
            column: open_column,
        };
        self.advance_byte();

        let mut text = String::new();
        loop {
            // Bulk-skip to the next character that ends or escapes the
            // string; a raw newline also ends it, as an error.
            let rest = &self.text[self.position..];
            let stop = match memchr::memchr3(b'"', b'\\', b'\n', rest.as_bytes()) {
                Some(index) => index,
                None => return Err(unterminated),
            };
            let plain = &rest[..stop];
            text.push_str(plain);
            self.position += stop;
            self.column += plain.chars().count();

            let (line, column) = (self.line, self.column);
            match self.next_char() {
                Some('"') => break,
                Some('\\') => match self.next_char() {
                    Some('n') => text.push('\n'),
                    Some('r') => text.push('\r'),
                    Some('t') => text.push('\t'),
                    Some('"') => text.push('"'),
                    Some('\\') => text.push('\\'),
                    Some(other) => {
                        return Err(Error::InvalidEscape {
                            escape: other,
                            line,
                            column,
                        });
                    }
                    None => return Err(unterminated),
                },
                _ => return Err(unterminated),
            }
        }
        Ok(TokenKind::Scalar { text, quoted: true })
    }

    /// Scan a bare run up to the next delimiter-significant byte, trimming
    /// trailing spaces. Interior spaces are part of the scalar.
    fn scan_bare(&mut self) -> TokenKind {
        let start = self.position;
        let mut has_non_ascii = false;
        while let Some(byte) = self.peek_byte() {
            if byte < 0x80 {
                if self.is_bare_terminator(byte) {
                    break;
                }
            } else {
                has_non_ascii = true;
            }
            self.position += 1;
        }

        let slice = &self.text[start..self.position];
        if has_non_ascii {
            self.column += slice.chars().count();
        } else {
            self.column += slice.len();
        }

        let text = slice.trim_end_matches(' ').to_string();
        TokenKind::Scalar {
            text,
            quoted: false,
        }
    }

    fn stack_top(&self) -> usize {
        self.indent_stack.last().copied().unwrap_or(0)
    }

    fn is_bare_terminator(&self, byte: u8) -> bool {
        if matches!(byte, b'\n' | b'\r' | b':' | b'[' | b']' | b'{' | b'}') {
            return true;
        }
        self.delimiter_here(byte).is_some()
    }

    fn delimiter_here(&self, byte: u8) -> Option<Delimiter> {
        let delimiter = Delimiter::from_char(byte as char)?;
        if self.in_brackets || self.in_braces || self.active_delimiter == Some(delimiter) {
            Some(delimiter)
        } else {
            None
        }
    }

    fn is_list_dash(&self) -> bool {
        matches!(
            self.input.get(self.position + 1),
            None | Some(b' ') | Some(b'\n') | Some(b'\r')
        )
    }

    fn skip_spaces(&mut self) {
        while self.peek_byte() == Some(b' ') {
            self.advance_byte();
        }
    }

    fn consume_newline(&mut self) {
        if self.peek_byte() == Some(b'\r') {
            self.position += 1;
        }
        if self.peek_byte() == Some(b'\n') {
            self.position += 1;
        }
        self.line += 1;
        self.column = 1;
        self.at_line_start = true;
    }

    fn peek_byte(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    fn advance_byte(&mut self) {
        self.position += 1;
        self.column += 1;
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.text[self.position..].chars().next()?;
        self.position += ch.len_utf8();
        self.column += 1;
        Some(ch)
    }
}
