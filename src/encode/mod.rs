//! Serializer: value tree in, TOON text out.
//!
//! Encoding is total and deterministic. Arrays are laid out per
//! [`analyze_array`]; objects emit one `key: value` line per entry in
//! iteration order, recursing onto indented lines for composite values.
//! Output ends with a newline unless it is empty; the empty root object
//! encodes to the empty string.

mod fold;
mod writer;

use crate::analyze::{analyze_array, ArrayShape};
use crate::options::{EncodeOptions, KeyFolding};
use crate::value::{Map, Value};

use self::writer::Writer;

pub fn encode(value: &Value, options: &EncodeOptions) -> String {
    let mut encoder = Encoder {
        writer: Writer::new(options.indent.get_spaces()),
        options,
    };
    encoder.write_root(value);
    encoder.writer.into_string()
}

struct Encoder<'a> {
    writer: Writer,
    options: &'a EncodeOptions,
}

impl Encoder<'_> {
    fn delimiter(&self) -> char {
        self.options.delimiter.as_char()
    }

    fn write_root(&mut self, value: &Value) {
        match value {
            Value::Object(map) => self.write_object_body(map, 0),
            Value::Array(items) => {
                self.write_array_after_key(items, 0);
            }
            scalar => {
                self.writer.scalar(scalar, self.delimiter());
                self.writer.newline();
            }
        }
    }

    fn write_object_body(&mut self, map: &Map, level: usize) {
        for (key, value) in map {
            if self.options.key_folding == KeyFolding::Safe {
                if let Some((path, leaf)) = fold::fold_chain(key, value, self.options.flatten_depth)
                {
                    self.write_entry(&path, true, leaf, level);
                    continue;
                }
            }
            self.write_entry(key, false, value, level);
        }
    }

    /// One entry line (plus any indented block). A folded key is a dotted
    /// path of verified-bare segments and is emitted verbatim.
    fn write_entry(&mut self, key: &str, folded: bool, value: &Value, level: usize) {
        self.writer.indent(level);
        if folded {
            self.writer.raw(key);
        } else {
            self.writer.key(key);
        }
        match value {
            Value::Array(items) => self.write_array_after_key(items, level),
            Value::Object(map) => {
                self.writer.raw(":");
                self.writer.newline();
                self.write_object_body(map, level + 1);
            }
            scalar => {
                self.writer.raw(": ");
                self.writer.scalar(scalar, self.delimiter());
                self.writer.newline();
            }
        }
    }

    /// Everything from `[` onward; the indent and key of the header line
    /// have already been written.
    fn write_array_after_key(&mut self, items: &[Value], level: usize) {
        let delimiter = self.delimiter();
        match analyze_array(items, self.options.delimiter) {
            ArrayShape::Empty => {
                self.writer.raw("[0]:");
                self.writer.newline();
            }
            ArrayShape::Inline => {
                self.writer
                    .array_header(None, items.len(), self.options.delimiter.header_suffix());
                self.writer.raw(": ");
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        self.writer.byte(delimiter as u8);
                    }
                    self.writer.scalar(item, delimiter);
                }
                self.writer.newline();
            }
            ArrayShape::Tabular(headers) => {
                self.writer
                    .array_header(None, items.len(), self.options.delimiter.header_suffix());
                self.writer.byte(b'{');
                for (index, header) in headers.iter().enumerate() {
                    if index > 0 {
                        self.writer.byte(delimiter as u8);
                    }
                    self.writer.key(header);
                }
                self.writer.raw("}:");
                self.writer.newline();
                for item in items {
                    self.writer.indent(level + 1);
                    let row = match item {
                        Value::Object(map) => map,
                        _ => continue,
                    };
                    for (index, header) in headers.iter().enumerate() {
                        if index > 0 {
                            self.writer.byte(delimiter as u8);
                        }
                        let cell = row.get(header).unwrap_or(&Value::Null);
                        self.writer.scalar(cell, delimiter);
                    }
                    self.writer.newline();
                }
            }
            ArrayShape::List => {
                self.writer.array_header(None, items.len(), "");
                self.writer.raw(":");
                self.writer.newline();
                for item in items {
                    self.write_list_item(item, level + 1);
                }
            }
        }
    }

    fn write_list_item(&mut self, item: &Value, level: usize) {
        self.writer.indent(level);
        match item {
            Value::Object(map) => {
                self.writer.raw("-");
                self.writer.newline();
                self.write_object_body(map, level + 1);
            }
            Value::Array(items) => {
                self.writer.raw("-");
                self.writer.newline();
                self.writer.indent(level + 1);
                self.write_array_after_key(items, level + 1);
            }
            scalar => {
                self.writer.raw("- ");
                self.writer.scalar(scalar, self.delimiter());
                self.writer.newline();
            }
        }
    }
}
