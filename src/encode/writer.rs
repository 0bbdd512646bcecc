//! Byte-buffer output writer for the encoder. Infallible by construction:
//! every write appends UTF-8 fragments to a growable buffer.

use crate::num;
use crate::quote;
use crate::value::Value;

pub(crate) struct Writer {
    buffer: Vec<u8>,
    indent_width: usize,
    // Reusable run of spaces, grown to the deepest indent seen.
    indent_pool: Vec<u8>,
}

impl Writer {
    pub fn new(indent_width: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(256),
            indent_width,
            indent_pool: Vec::new(),
        }
    }

    pub fn indent(&mut self, level: usize) {
        let width = level * self.indent_width;
        if self.indent_pool.len() < width {
            self.indent_pool.resize(width, b' ');
        }
        self.buffer.extend_from_slice(&self.indent_pool[..width]);
    }

    pub fn raw(&mut self, text: &str) {
        self.buffer.extend_from_slice(text.as_bytes());
    }

    pub fn byte(&mut self, byte: u8) {
        self.buffer.push(byte);
    }

    pub fn newline(&mut self) {
        self.buffer.push(b'\n');
    }

    /// Key or table field name, quoted unless it is bare-safe.
    pub fn key(&mut self, key: &str) {
        quote::write_key_into(&mut self.buffer, key);
    }

    /// `key[N<suffix>]` without the trailing brace/colon part.
    pub fn array_header(&mut self, key: Option<&str>, len: usize, suffix: &str) {
        if let Some(key) = key {
            self.key(key);
        }
        self.buffer.push(b'[');
        let mut formatted = itoa::Buffer::new();
        self.buffer.extend_from_slice(formatted.format(len).as_bytes());
        self.buffer.extend_from_slice(suffix.as_bytes());
        self.buffer.push(b']');
    }

    /// Scalar literal; strings are quoted when they would be misread as
    /// structure, a reserved literal, or a number.
    pub fn scalar(&mut self, value: &Value, delimiter: char) {
        debug_assert!(value.is_scalar());
        match value {
            Value::Null => self.buffer.extend_from_slice(b"null"),
            Value::Bool(true) => self.buffer.extend_from_slice(b"true"),
            Value::Bool(false) => self.buffer.extend_from_slice(b"false"),
            Value::Number(number) => num::write_number_into(*number, &mut self.buffer),
            Value::String(text) => {
                if quote::needs_quoting(text, delimiter) {
                    quote::quote_into(&mut self.buffer, text);
                } else {
                    self.buffer.extend_from_slice(text.as_bytes());
                }
            }
            Value::Array(_) | Value::Object(_) => {}
        }
    }

    pub fn into_string(self) -> String {
        match String::from_utf8(self.buffer) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }
}
