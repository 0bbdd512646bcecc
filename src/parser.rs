//! Recursive-descent parser over the pull lexer.
//!
//! The parser keeps the current token always loaded and advances one token
//! at a time; nesting decisions come from [`Lexer::depth`], the indentation
//! level of the line the current token sits on. In strict mode any error
//! aborts with no partial tree. Lenient mode recovers from exactly one
//! condition: a declared array length that disagrees with the body, in which
//! case the actual element count is trusted.

use smallvec::SmallVec;

use crate::lexer::{Lexer, Token, TokenKind};
use crate::num::parse_number_token;
use crate::options::{DecodeOptions, Delimiter};
use crate::value::{Map, Value};
use crate::{Error, Result};

/// Key reported in length-mismatch errors for a document whose root is a
/// bare array header.
const ROOT_KEY: &str = "$";

pub(crate) struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    depth: usize,
    lenient: bool,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, options: &DecodeOptions) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        let depth = lexer.depth();
        Ok(Self {
            lexer,
            current,
            depth,
            lenient: options.lenient,
        })
    }

    pub fn parse(mut self) -> Result<Value> {
        self.skip_newlines()?;

        let value = match &self.current.kind {
            TokenKind::Eof => Value::Object(Map::new()),
            TokenKind::LeftBracket => self.parse_array(None, self.depth)?,
            TokenKind::Scalar { .. } => {
                let first = self.advance()?;
                match self.current.kind {
                    TokenKind::Colon | TokenKind::LeftBracket => {
                        let mut map = Map::new();
                        self.parse_entry_into(&mut map, first, 0)?;
                        self.parse_object_body_into(&mut map, 0)?;
                        Value::Object(map)
                    }
                    TokenKind::Newline | TokenKind::Eof => {
                        let value = resolve_scalar(first.kind);
                        self.expect_line_end()?;
                        value
                    }
                    _ => {
                        return Err(self.unexpected("expected ':' or end of line"));
                    }
                }
            }
            _ => return Err(self.unexpected("expected key, array header, or scalar")),
        };

        self.skip_newlines()?;
        if self.current.kind != TokenKind::Eof {
            return Err(self.unexpected("unexpected trailing content"));
        }
        Ok(value)
    }

    /// Entries at `body_depth` until a dedent or end of input.
    fn parse_object_body(&mut self, body_depth: usize) -> Result<Map> {
        let mut map = Map::new();
        self.parse_object_body_into(&mut map, body_depth)?;
        Ok(map)
    }

    fn parse_object_body_into(&mut self, map: &mut Map, body_depth: usize) -> Result<()> {
        loop {
            self.skip_newlines()?;
            if self.current.kind == TokenKind::Eof || self.depth < body_depth {
                return Ok(());
            }
            if self.depth > body_depth {
                return Err(self.unexpected("unexpected indentation"));
            }
            match self.current.kind {
                TokenKind::Scalar { .. } => {
                    let key = self.advance()?;
                    self.parse_entry_into(map, key, body_depth)?;
                }
                _ => return Err(self.unexpected("expected key")),
            }
        }
    }

    /// One `key: value` or `key[...]` entry; `key_token` has already been
    /// consumed and the current token is whatever follows it.
    fn parse_entry_into(&mut self, map: &mut Map, key_token: Token, body_depth: usize) -> Result<()> {
        let key = scalar_text(key_token.kind);
        let value = match self.current.kind {
            TokenKind::Colon => {
                self.advance()?;
                self.parse_value_after_colon(body_depth)?
            }
            TokenKind::LeftBracket => self.parse_array(Some(&key), body_depth)?,
            _ => return Err(self.unexpected("expected ':' after key")),
        };
        // Last write wins; the slot keeps its original position.
        map.insert(key, value);
        Ok(())
    }

    fn parse_value_after_colon(&mut self, entry_depth: usize) -> Result<Value> {
        match self.current.kind {
            TokenKind::Scalar { .. } => {
                let token = self.advance()?;
                let value = resolve_scalar(token.kind);
                self.expect_line_end()?;
                Ok(value)
            }
            TokenKind::Newline | TokenKind::Eof => {
                self.skip_newlines()?;
                if self.current.kind != TokenKind::Eof && self.depth > entry_depth {
                    let block_depth = self.depth;
                    Ok(Value::Object(self.parse_object_body(block_depth)?))
                } else {
                    Ok(Value::Null)
                }
            }
            _ => Err(self.unexpected("expected value")),
        }
    }

    /// Array header and body. The current token is the opening `[`;
    /// `header_depth` is the level of the header line. `key` is `None` for
    /// a bare root header and for keyless headers nested under a list dash.
    fn parse_array(&mut self, key: Option<&str>, header_depth: usize) -> Result<Value> {
        let header_line = self.current.line;
        self.expect(TokenKind::LeftBracket, "expected '['")?;

        let declared = match &self.current.kind {
            TokenKind::Scalar { text, quoted: false } => {
                let parsed = if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
                    text.parse::<usize>().ok()
                } else {
                    None
                };
                match parsed {
                    Some(count) => {
                        self.advance()?;
                        count
                    }
                    None => return Err(self.unexpected("invalid array length")),
                }
            }
            _ => return Err(self.unexpected("expected array length")),
        };

        let mut delimiter = Delimiter::Comma;
        if let TokenKind::Delimiter(d) = self.current.kind {
            delimiter = d;
            self.advance()?;
        }
        self.expect(TokenKind::RightBracket, "expected ']'")?;

        if self.current.kind == TokenKind::LeftBrace {
            return self.parse_tabular(key, header_depth, header_line, declared, delimiter);
        }

        if self.current.kind != TokenKind::Colon {
            return Err(self.unexpected("expected ':' after array header"));
        }
        // The delimiter goes live before the colon is consumed so the first
        // inline value is already lexed under it.
        self.lexer.set_active_delimiter(Some(delimiter));
        self.advance()?;

        match self.current.kind {
            TokenKind::Newline | TokenKind::Eof => {
                self.lexer.set_active_delimiter(None);
                let items = self.parse_list_items(header_depth)?;
                self.check_length(key, declared, items.len(), header_line)?;
                Ok(Value::Array(items))
            }
            TokenKind::Scalar { .. } | TokenKind::Delimiter(_) => {
                let values = self.parse_delimited_cells();
                self.lexer.set_active_delimiter(None);
                let values = values?;
                self.check_length(key, declared, values.len(), header_line)?;
                Ok(Value::Array(values.into_vec()))
            }
            _ => {
                self.lexer.set_active_delimiter(None);
                Err(self.unexpected("expected array values"))
            }
        }
    }

    fn parse_tabular(
        &mut self,
        key: Option<&str>,
        header_depth: usize,
        header_line: usize,
        declared: usize,
        delimiter: Delimiter,
    ) -> Result<Value> {
        self.expect(TokenKind::LeftBrace, "expected '{'")?;

        let mut headers: Vec<String> = Vec::new();
        loop {
            match self.current.kind {
                TokenKind::Scalar { .. } => {
                    let token = self.advance()?;
                    headers.push(scalar_text(token.kind));
                }
                _ => return Err(self.unexpected("expected field name")),
            }
            match self.current.kind {
                TokenKind::Delimiter(d) if d == delimiter => {
                    self.advance()?;
                }
                TokenKind::RightBrace => {
                    self.advance()?;
                    break;
                }
                _ => return Err(self.unexpected("expected field separator or '}'")),
            }
        }

        self.lexer.set_active_delimiter(Some(delimiter));
        let rows = self.parse_tabular_rows(header_depth, &headers);
        self.lexer.set_active_delimiter(None);
        let rows = rows?;

        self.check_length(key, declared, rows.len(), header_line)?;
        Ok(Value::Array(rows))
    }

    fn parse_tabular_rows(&mut self, header_depth: usize, headers: &[String]) -> Result<Vec<Value>> {
        self.expect(TokenKind::Colon, "expected ':' after table header")?;
        self.expect_line_end()?;

        let mut rows = Vec::new();
        loop {
            self.skip_newlines()?;
            if self.current.kind == TokenKind::Eof || self.depth <= header_depth {
                return Ok(rows);
            }
            let row_line = self.current.line;
            let row_column = self.current.column;
            let mut cells = self.parse_delimited_cells()?;
            if cells.len() != headers.len() {
                if !self.lenient {
                    return Err(Error::syntax(
                        format!("expected {} fields, found {}", headers.len(), cells.len()),
                        row_line,
                        row_column,
                    ));
                }
                cells.truncate(headers.len());
                while cells.len() < headers.len() {
                    cells.push(Value::Null);
                }
            }
            let mut row = Map::with_capacity(headers.len());
            for (header, cell) in headers.iter().zip(cells) {
                row.insert(header.clone(), cell);
            }
            rows.push(Value::Object(row));
        }
    }

    /// Delimiter-separated scalars up to the end of the line. An empty slot
    /// between delimiters reads as null.
    fn parse_delimited_cells(&mut self) -> Result<SmallVec<[Value; 8]>> {
        let mut cells = SmallVec::new();
        loop {
            match self.current.kind {
                TokenKind::Scalar { .. } => {
                    let token = self.advance()?;
                    cells.push(resolve_scalar(token.kind));
                }
                TokenKind::Delimiter(_) | TokenKind::Newline | TokenKind::Eof => {
                    cells.push(Value::Null);
                }
                _ => return Err(self.unexpected("unexpected token in value row")),
            }
            match self.current.kind {
                TokenKind::Delimiter(_) => {
                    self.advance()?;
                }
                TokenKind::Newline | TokenKind::Eof => return Ok(cells),
                _ => return Err(self.unexpected("unexpected token in value row")),
            }
        }
    }

    /// `- ` items one level below the header line; the terminating newline
    /// of the header has not been consumed yet.
    fn parse_list_items(&mut self, header_depth: usize) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        loop {
            self.skip_newlines()?;
            if self.current.kind == TokenKind::Eof || self.depth <= header_depth {
                return Ok(items);
            }
            if self.current.kind != TokenKind::Dash {
                return Err(self.unexpected("expected '-' list item"));
            }
            items.push(self.parse_list_item()?);
        }
    }

    fn parse_list_item(&mut self) -> Result<Value> {
        let dash_depth = self.depth;
        self.advance()?;

        match self.current.kind {
            TokenKind::Scalar { .. } => {
                let token = self.advance()?;
                let value = resolve_scalar(token.kind);
                self.expect_line_end()?;
                Ok(value)
            }
            TokenKind::Newline | TokenKind::Eof => {
                self.skip_newlines()?;
                if self.current.kind == TokenKind::Eof || self.depth <= dash_depth {
                    // A dash with no block under it is an empty object.
                    return Ok(Value::Object(Map::new()));
                }
                let block_depth = self.depth;
                match self.current.kind {
                    TokenKind::LeftBracket => self.parse_array(None, block_depth),
                    TokenKind::Scalar { .. } => {
                        Ok(Value::Object(self.parse_object_body(block_depth)?))
                    }
                    _ => Err(self.unexpected("expected nested block under '-'")),
                }
            }
            _ => Err(self.unexpected("expected value after '-'")),
        }
    }

    fn check_length(
        &self,
        key: Option<&str>,
        declared: usize,
        actual: usize,
        line: usize,
    ) -> Result<()> {
        if declared == actual || self.lenient {
            return Ok(());
        }
        Err(Error::LengthMismatch {
            key: key.unwrap_or(ROOT_KEY).to_string(),
            declared,
            actual,
            line,
        })
    }

    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        self.depth = self.lexer.depth();
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<Token> {
        if self.current.kind == kind {
            self.advance()
        } else {
            Err(self.unexpected(message))
        }
    }

    fn expect_line_end(&mut self) -> Result<()> {
        match self.current.kind {
            TokenKind::Newline => {
                self.advance()?;
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected("unexpected trailing content")),
        }
    }

    fn skip_newlines(&mut self) -> Result<()> {
        while self.current.kind == TokenKind::Newline {
            self.advance()?;
        }
        Ok(())
    }

    fn unexpected(&self, message: &str) -> Error {
        Error::syntax(message, self.current.line, self.current.column)
    }
}

fn scalar_text(kind: TokenKind) -> String {
    match kind {
        TokenKind::Scalar { text, .. } => text,
        _ => String::new(),
    }
}

/// Bare tokens resolve by literal shape: `true`/`false`, `null` or empty,
/// then the JSON numeric grammar; anything else is a string. Quoted tokens
/// are always strings.
fn resolve_scalar(kind: TokenKind) -> Value {
    let (text, quoted) = match kind {
        TokenKind::Scalar { text, quoted } => (text, quoted),
        _ => return Value::Null,
    };
    if quoted {
        return Value::String(text);
    }
    match text.as_str() {
        "" | "null" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match parse_number_token(&text) {
            Some(number) => Value::Number(number),
            None => Value::String(text),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Value {
        Parser::new(input, &DecodeOptions::default())
            .unwrap()
            .parse()
            .unwrap()
    }

    fn parse_lenient(input: &str) -> Value {
        Parser::new(input, &DecodeOptions::default().with_lenient(true))
            .unwrap()
            .parse()
            .unwrap()
    }

    fn parse_err(input: &str) -> Error {
        Parser::new(input, &DecodeOptions::default())
            .unwrap()
            .parse()
            .unwrap_err()
    }

    #[rstest::rstest]
    fn test_flat_object() {
        let value = parse("a: 1\nb: two\nc: true\nd: null\n");
        assert_eq!(value["a"], Value::Number(1.0));
        assert_eq!(value["b"], Value::String("two".to_string()));
        assert_eq!(value["c"], Value::Bool(true));
        assert_eq!(value["d"], Value::Null);
    }

    #[rstest::rstest]
    fn test_nested_object() {
        let value = parse("user:\n  name: Ada\n  tags[2]: a,b\nactive: true\n");
        assert_eq!(value["user"]["name"], Value::String("Ada".to_string()));
        assert_eq!(value["user"]["tags"][1], Value::String("b".to_string()));
        assert_eq!(value["active"], Value::Bool(true));
    }

    #[rstest::rstest]
    fn test_key_with_no_value_is_null() {
        let value = parse("a:\nb: 1\n");
        assert_eq!(value["a"], Value::Null);
        let value = parse("a:");
        assert_eq!(value["a"], Value::Null);
    }

    #[rstest::rstest]
    fn test_inline_array() {
        let value = parse("b[3]: 1,2,3\n");
        assert_eq!(
            value["b"],
            Value::Array(vec![
                Value::Number(1.0),
                Value::Number(2.0),
                Value::Number(3.0)
            ])
        );
    }

    #[rstest::rstest]
    fn test_inline_array_pipe_delimiter() {
        let value = parse("b[2|]: a|b,c\n");
        assert_eq!(
            value["b"],
            Value::Array(vec![
                Value::String("a".to_string()),
                Value::String("b,c".to_string())
            ])
        );
    }

    #[rstest::rstest]
    fn test_inline_empty_cells_are_null() {
        let value = parse("b[3]: 1,,3\n");
        assert_eq!(value["b"][1], Value::Null);
    }

    #[rstest::rstest]
    fn test_empty_array() {
        let value = parse("items[0]:\n");
        assert_eq!(value["items"], Value::Array(Vec::new()));
    }

    #[rstest::rstest]
    fn test_tabular_array() {
        let value = parse("rows[2]{id,name}:\n  1,Ada\n  2,Lin\n");
        assert_eq!(value["rows"][0]["id"], Value::Number(1.0));
        assert_eq!(value["rows"][0]["name"], Value::String("Ada".to_string()));
        assert_eq!(value["rows"][1]["name"], Value::String("Lin".to_string()));
    }

    #[rstest::rstest]
    fn test_tabular_wrong_row_width_strict() {
        let err = parse_err("rows[1]{id,name}:\n  1\n");
        assert!(matches!(err, Error::Syntax { line: 2, .. }));
    }

    #[rstest::rstest]
    fn test_tabular_wrong_row_width_lenient_pads_and_truncates() {
        let value = parse_lenient("rows[2]{id,name}:\n  1\n  2,Lin,extra\n");
        assert_eq!(value["rows"][0]["name"], Value::Null);
        assert_eq!(value["rows"][1]["name"], Value::String("Lin".to_string()));
        assert!(value["rows"][1].get("extra").is_none());
    }

    #[rstest::rstest]
    fn test_list_array() {
        let value = parse("items[2]:\n  - 1\n  - two\n");
        assert_eq!(value["items"][0], Value::Number(1.0));
        assert_eq!(value["items"][1], Value::String("two".to_string()));
    }

    #[rstest::rstest]
    fn test_list_item_nested_object() {
        let value = parse("items[1]:\n  -\n    name: Ada\n    age: 36\n");
        assert_eq!(value["items"][0]["name"], Value::String("Ada".to_string()));
        assert_eq!(value["items"][0]["age"], Value::Number(36.0));
    }

    #[rstest::rstest]
    fn test_list_item_nested_array() {
        let value = parse("items[1]:\n  -\n    [2]: 1,2\n");
        assert_eq!(value["items"][0][1], Value::Number(2.0));
    }

    #[rstest::rstest]
    fn test_bare_dash_with_no_block_is_empty_object() {
        let value = parse("items[1]:\n  -\n");
        assert_eq!(value["items"][0], Value::Object(Map::new()));
    }

    #[rstest::rstest]
    fn test_length_mismatch_strict() {
        let err = parse_err("x[2]:\n  - 1\n");
        assert_eq!(
            err,
            Error::LengthMismatch {
                key: "x".to_string(),
                declared: 2,
                actual: 1,
                line: 1,
            }
        );
    }

    #[rstest::rstest]
    fn test_length_mismatch_lenient_trusts_actual() {
        let value = parse_lenient("x[2]:\n  - 1\n");
        assert_eq!(value["x"], Value::Array(vec![Value::Number(1.0)]));
    }

    #[rstest::rstest]
    fn test_inline_length_mismatch() {
        let err = parse_err("b[3]: 1,2\n");
        assert!(matches!(
            err,
            Error::LengthMismatch {
                declared: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[rstest::rstest]
    fn test_root_scalar() {
        assert_eq!(parse("42\n"), Value::Number(42.0));
        assert_eq!(parse("\"a: b\"\n"), Value::String("a: b".to_string()));
        assert_eq!(parse("null\n"), Value::Null);
    }

    #[rstest::rstest]
    fn test_root_array() {
        let value = parse("[3]: 1,2,3\n");
        assert_eq!(
            value,
            Value::Array(vec![
                Value::Number(1.0),
                Value::Number(2.0),
                Value::Number(3.0)
            ])
        );
    }

    #[rstest::rstest]
    fn test_root_array_length_mismatch_reports_dollar_key() {
        let err = parse_err("[2]: 1\n");
        assert!(matches!(err, Error::LengthMismatch { ref key, .. } if key == "$"));
    }

    #[rstest::rstest]
    fn test_empty_input_is_empty_object() {
        assert_eq!(parse(""), Value::Object(Map::new()));
        assert_eq!(parse("\n\n"), Value::Object(Map::new()));
    }

    #[rstest::rstest]
    fn test_duplicate_keys_last_wins_first_position() {
        let value = parse("a: 1\nb: 2\na: 3\n");
        let map = match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other:?}"),
        };
        assert_eq!(map.get_index(0), Some((&"a".to_string(), &Value::Number(3.0))));
        assert_eq!(map.len(), 2);
    }

    #[rstest::rstest]
    fn test_quoted_keys_and_values() {
        let value = parse("\"a b\": \"c: d\"\n");
        assert_eq!(value["a b"], Value::String("c: d".to_string()));
    }

    #[rstest::rstest]
    fn test_numeric_looking_string_stays_quoted() {
        let value = parse("v: \"007\"\n");
        assert_eq!(value["v"], Value::String("007".to_string()));
    }

    #[rstest::rstest]
    fn test_unexpected_indentation() {
        let err = parse_err("a: 1\n    b: 2\n");
        assert!(matches!(err, Error::Syntax { line: 2, .. }));
    }

    #[rstest::rstest]
    fn test_missing_colon() {
        let err = parse_err("a 1\n");
        assert!(matches!(err, Error::Syntax { .. }));
    }

    #[rstest::rstest]
    fn test_invalid_array_length() {
        let err = parse_err("a[x]: 1\n");
        assert!(matches!(err, Error::Syntax { .. }));
    }

    #[rstest::rstest]
    fn test_tab_indentation_fails_lenient_too() {
        let err = Parser::new("a:\n\tb: 1\n", &DecodeOptions::default().with_lenient(true))
            .unwrap()
            .parse()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidIndentation { line: 2, .. }));
    }

    #[rstest::rstest]
    fn test_blank_lines_between_entries() {
        let value = parse("a: 1\n\nb: 2\n");
        assert_eq!(value["b"], Value::Number(2.0));
    }

    #[rstest::rstest]
    fn test_tab_delimited_table() {
        let value = parse("rows[1\t]{id\tname}:\n  1\tAda\n");
        assert_eq!(value["rows"][0]["name"], Value::String("Ada".to_string()));
    }
}
