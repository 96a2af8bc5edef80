// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Byte-oriented JSON cursor and sink.
//!
//! [`Reader`] is a pull cursor over an already-buffered document and [`Writer`]
//! a push sink producing compact JSON. Both track the enclosing objects and
//! arrays so callers never deal with `,` and `:` separators themselves.

use crate::error::Error;
use serde_json::{Map, Number, Value};
use std::borrow::Cow;
use std::io::Write as _;

/// Nesting ceiling of the tokenizer itself, independent of `Config::max_depth`.
pub const MAX_NESTING: usize = 512;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    String,
    Number,
    True,
    False,
    Null,
}

impl Token {
    pub fn name(self) -> &'static str {
        match self {
            Token::StartObject => "start of object",
            Token::EndObject => "end of object",
            Token::StartArray => "start of array",
            Token::EndArray => "end of array",
            Token::String => "string",
            Token::Number => "number",
            Token::True | Token::False => "boolean",
            Token::Null => "null",
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Frame {
    array: bool,
    first: bool,
}

enum NameScan<'a> {
    End(usize),
    Name(Cow<'a, [u8]>, usize),
}

/// Saved reader position inside the current object, see [`Reader::checkpoint`].
#[derive(Clone, Copy, Debug)]
pub struct Checkpoint {
    cursor: usize,
    depth: usize,
    top: Option<Frame>,
}

pub struct Reader<'a> {
    bf: &'a [u8],
    cursor: usize,
    frames: Vec<Frame>,
}

#[inline(always)]
fn skip_whitespace(bf: &[u8], mut pos: usize) -> usize {
    while let Some(b' ' | b'\t' | b'\n' | b'\r') = bf.get(pos) {
        pos += 1;
    }
    pos
}

#[inline(always)]
fn hex4(bf: &[u8], pos: usize) -> Result<u16, Error> {
    let digits = bf
        .get(pos..pos + 4)
        .ok_or_else(|| Error::json(format!("truncated unicode escape at offset {pos}")))?;
    let mut value: u16 = 0;
    for &b in digits {
        let digit = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            b'A'..=b'F' => b - b'A' + 10,
            _ => return Err(Error::json(format!("invalid unicode escape at offset {pos}"))),
        };
        value = (value << 4) | digit as u16;
    }
    Ok(value)
}

/// Parses the string starting at the opening quote at `pos`. Returns the
/// unescaped bytes and the offset just past the closing quote.
fn parse_string(bf: &[u8], pos: usize) -> Result<(Cow<'_, [u8]>, usize), Error> {
    debug_assert_eq!(bf.get(pos), Some(&b'"'));
    let start = pos + 1;
    let mut i = start;
    // fast path: no escapes, borrow the input
    loop {
        match bf.get(i) {
            None => return Err(Error::json(format!("unterminated string at offset {pos}"))),
            Some(b'"') => return Ok((Cow::Borrowed(&bf[start..i]), i + 1)),
            Some(b'\\') => break,
            Some(&b) if b < 0x20 => {
                return Err(Error::json(format!("control character in string at offset {i}")))
            }
            Some(_) => i += 1,
        }
    }
    let mut out = Vec::with_capacity(i - start + 16);
    out.extend_from_slice(&bf[start..i]);
    loop {
        match bf.get(i) {
            None => return Err(Error::json(format!("unterminated string at offset {pos}"))),
            Some(b'"') => return Ok((Cow::Owned(out), i + 1)),
            Some(b'\\') => {
                let escaped = bf
                    .get(i + 1)
                    .ok_or_else(|| Error::json(format!("unterminated string at offset {pos}")))?;
                i += 2;
                match escaped {
                    b'"' => out.push(b'"'),
                    b'\\' => out.push(b'\\'),
                    b'/' => out.push(b'/'),
                    b'b' => out.push(0x08),
                    b'f' => out.push(0x0c),
                    b'n' => out.push(b'\n'),
                    b'r' => out.push(b'\r'),
                    b't' => out.push(b'\t'),
                    b'u' => {
                        let unit = hex4(bf, i)?;
                        i += 4;
                        let code = if (0xD800..=0xDBFF).contains(&unit) {
                            if bf.get(i..i + 2) != Some(&b"\\u"[..]) {
                                return Err(Error::json(format!(
                                    "unpaired surrogate at offset {i}"
                                )));
                            }
                            let low = hex4(bf, i + 2)?;
                            if !(0xDC00..=0xDFFF).contains(&low) {
                                return Err(Error::json(format!(
                                    "invalid low surrogate at offset {i}"
                                )));
                            }
                            i += 6;
                            0x10000 + ((unit as u32 - 0xD800) << 10) + (low as u32 - 0xDC00)
                        } else if (0xDC00..=0xDFFF).contains(&unit) {
                            return Err(Error::json(format!("unpaired surrogate at offset {i}")));
                        } else {
                            unit as u32
                        };
                        let ch = char::from_u32(code)
                            .ok_or_else(|| Error::json(format!("invalid code point at offset {i}")))?;
                        let mut buf = [0u8; 4];
                        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                    }
                    _ => return Err(Error::json(format!("invalid escape at offset {}", i - 1))),
                }
            }
            Some(&b) if b < 0x20 => {
                return Err(Error::json(format!("control character in string at offset {i}")))
            }
            Some(&b) => {
                out.push(b);
                i += 1;
            }
        }
    }
}

/// Validates a number starting at `pos` and returns the offset just past it.
fn scan_number(bf: &[u8], pos: usize) -> Result<usize, Error> {
    let mut i = pos;
    if bf.get(i) == Some(&b'-') {
        i += 1;
    }
    match bf.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            i += 1;
            while let Some(b'0'..=b'9') = bf.get(i) {
                i += 1;
            }
        }
        _ => return Err(Error::json(format!("invalid number at offset {pos}"))),
    }
    if bf.get(i) == Some(&b'.') {
        i += 1;
        let digits = i;
        while let Some(b'0'..=b'9') = bf.get(i) {
            i += 1;
        }
        if i == digits {
            return Err(Error::json(format!("invalid number at offset {pos}")));
        }
    }
    if let Some(b'e' | b'E') = bf.get(i) {
        i += 1;
        if let Some(b'+' | b'-') = bf.get(i) {
            i += 1;
        }
        let digits = i;
        while let Some(b'0'..=b'9') = bf.get(i) {
            i += 1;
        }
        if i == digits {
            return Err(Error::json(format!("invalid number at offset {pos}")));
        }
    }
    Ok(i)
}

impl<'a> Reader<'a> {
    pub fn new(bf: &'a [u8]) -> Reader<'a> {
        Reader {
            bf,
            cursor: 0,
            frames: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Number of currently open objects and arrays.
    #[inline(always)]
    pub fn nesting(&self) -> usize {
        self.frames.len()
    }

    /// Records the current position so a lookahead over the members of the
    /// current object can be undone with [`Reader::restore`].
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            cursor: self.cursor,
            depth: self.frames.len(),
            top: self.frames.last().copied(),
        }
    }

    /// Rewinds to `checkpoint`. The lookahead must not have left the object
    /// that was open when the checkpoint was taken, except through its
    /// closing brace.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.cursor = checkpoint.cursor;
        self.frames.truncate(checkpoint.depth.saturating_sub(1));
        if let Some(top) = checkpoint.top {
            self.frames.push(top);
        }
    }

    /// Fails unless only whitespace remains after the root value.
    pub fn finish(&mut self) -> Result<(), Error> {
        let pos = skip_whitespace(self.bf, self.cursor);
        if pos != self.bf.len() {
            return Err(Error::json(format!(
                "unexpected trailing content at offset {pos}"
            )));
        }
        self.cursor = pos;
        Ok(())
    }

    #[inline(always)]
    fn unexpected(&self, pos: usize, expected: &str) -> Error {
        match self.bf.get(pos) {
            Some(&b) => Error::json(format!(
                "expected {expected} but found '{}' at offset {pos}",
                b as char
            )),
            None => Error::json(format!("expected {expected} but reached end of input")),
        }
    }

    /// Error for a value of another kind than `expected` at `pos`. A closing
    /// bracket or brace where a value belongs is structural.
    fn mismatch(&mut self, pos: usize, expected: &str) -> Error {
        match self.peek() {
            Ok(Token::EndObject | Token::EndArray) => Error::json(format!(
                "expected {expected} but found '{}' at offset {pos}",
                self.bf[self.cursor] as char
            )),
            Ok(token) => Error::type_error(format!(
                "expected {expected} but found {} at offset {pos}",
                token.name()
            )),
            Err(err) => err,
        }
    }

    /// Kind of the next token without consuming it.
    pub fn peek(&mut self) -> Result<Token, Error> {
        self.cursor = skip_whitespace(self.bf, self.cursor);
        match self.bf.get(self.cursor) {
            Some(b'{') => Ok(Token::StartObject),
            Some(b'}') => Ok(Token::EndObject),
            Some(b'[') => Ok(Token::StartArray),
            Some(b']') => Ok(Token::EndArray),
            Some(b'"') => Ok(Token::String),
            Some(b'-' | b'0'..=b'9') => Ok(Token::Number),
            Some(b't') => Ok(Token::True),
            Some(b'f') => Ok(Token::False),
            Some(b'n') => Ok(Token::Null),
            _ => Err(self.unexpected(self.cursor, "a value")),
        }
    }

    fn open(&mut self, byte: u8, array: bool, expected: &str) -> Result<(), Error> {
        let pos = skip_whitespace(self.bf, self.cursor);
        if self.bf.get(pos) != Some(&byte) {
            return Err(self.unexpected(pos, expected));
        }
        if self.frames.len() >= MAX_NESTING {
            return Err(Error::depth_exceed(format!(
                "document nesting exceeds {MAX_NESTING} at offset {pos}"
            )));
        }
        self.frames.push(Frame { array, first: true });
        self.cursor = pos + 1;
        Ok(())
    }

    pub fn read_start_object(&mut self) -> Result<(), Error> {
        self.open(b'{', false, "start of object")
    }

    pub fn read_start_array(&mut self) -> Result<(), Error> {
        self.open(b'[', true, "start of array")
    }

    fn scan_property_name(&self) -> Result<NameScan<'a>, Error> {
        let frame = match self.frames.last() {
            Some(frame) if !frame.array => *frame,
            _ => return Err(Error::json("property name read outside of an object")),
        };
        let bf = self.bf;
        let mut pos = skip_whitespace(bf, self.cursor);
        if bf.get(pos) == Some(&b'}') {
            return Ok(NameScan::End(pos + 1));
        }
        if !frame.first {
            if bf.get(pos) != Some(&b',') {
                return Err(self.unexpected(pos, "',' or end of object"));
            }
            pos = skip_whitespace(bf, pos + 1);
        }
        if bf.get(pos) != Some(&b'"') {
            return Err(self.unexpected(pos, "property name"));
        }
        let (name, end) = parse_string(bf, pos)?;
        let colon = skip_whitespace(bf, end);
        if bf.get(colon) != Some(&b':') {
            return Err(self.unexpected(colon, "':'"));
        }
        Ok(NameScan::Name(name, colon + 1))
    }

    /// Reads the next property name of the current object, or consumes the
    /// closing brace and returns `None`.
    pub fn read_property_name(&mut self) -> Result<Option<Cow<'a, [u8]>>, Error> {
        match self.scan_property_name()? {
            NameScan::End(pos) => {
                self.frames.pop();
                self.cursor = pos;
                Ok(None)
            }
            NameScan::Name(name, pos) => {
                if let Some(frame) = self.frames.last_mut() {
                    frame.first = false;
                }
                self.cursor = pos;
                Ok(Some(name))
            }
        }
    }

    /// Same as [`Reader::read_property_name`] without consuming anything.
    pub fn peek_property_name(&self) -> Result<Option<Cow<'a, [u8]>>, Error> {
        match self.scan_property_name()? {
            NameScan::End(_) => Ok(None),
            NameScan::Name(name, _) => Ok(Some(name)),
        }
    }

    /// Consumes the closing brace of the current object.
    pub fn read_end_object(&mut self) -> Result<(), Error> {
        match self.read_property_name()? {
            None => Ok(()),
            Some(name) => Err(Error::json(format!(
                "expected end of object but found property \"{}\"",
                String::from_utf8_lossy(&name)
            ))),
        }
    }

    /// Advances to the next array element. Returns `false` after consuming
    /// the closing bracket.
    pub fn next_element(&mut self) -> Result<bool, Error> {
        let frame = match self.frames.last() {
            Some(frame) if frame.array => *frame,
            _ => return Err(Error::json("array element read outside of an array")),
        };
        let mut pos = skip_whitespace(self.bf, self.cursor);
        if self.bf.get(pos) == Some(&b']') {
            self.frames.pop();
            self.cursor = pos + 1;
            return Ok(false);
        }
        if !frame.first {
            if self.bf.get(pos) != Some(&b',') {
                return Err(self.unexpected(pos, "',' or end of array"));
            }
            pos = skip_whitespace(self.bf, pos + 1);
            if self.bf.get(pos) == Some(&b']') {
                return Err(self.unexpected(pos, "array element"));
            }
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.first = false;
        }
        self.cursor = pos;
        Ok(true)
    }

    pub fn read_string_bytes(&mut self) -> Result<Cow<'a, [u8]>, Error> {
        let pos = skip_whitespace(self.bf, self.cursor);
        if self.bf.get(pos) != Some(&b'"') {
            return Err(self.mismatch(pos, "string"));
        }
        let (value, end) = parse_string(self.bf, pos)?;
        self.cursor = end;
        Ok(value)
    }

    pub fn read_string(&mut self) -> Result<Cow<'a, str>, Error> {
        let pos = self.cursor;
        match self.read_string_bytes()? {
            Cow::Borrowed(bytes) => std::str::from_utf8(bytes)
                .map(Cow::Borrowed)
                .map_err(|_| Error::json(format!("invalid UTF-8 in string at offset {pos}"))),
            Cow::Owned(bytes) => String::from_utf8(bytes)
                .map(Cow::Owned)
                .map_err(|_| Error::json(format!("invalid UTF-8 in string at offset {pos}"))),
        }
    }

    fn literal(&mut self, text: &'static [u8], expected: &str) -> Result<(), Error> {
        let pos = skip_whitespace(self.bf, self.cursor);
        if self.bf.get(pos..pos + text.len()) != Some(text) {
            return Err(self.unexpected(pos, expected));
        }
        self.cursor = pos + text.len();
        Ok(())
    }

    pub fn read_bool(&mut self) -> Result<bool, Error> {
        match self.peek()? {
            Token::True => self.literal(b"true", "boolean").map(|_| true),
            Token::False => self.literal(b"false", "boolean").map(|_| false),
            _ => Err(self.mismatch(self.cursor, "boolean")),
        }
    }

    pub fn read_null(&mut self) -> Result<(), Error> {
        let pos = skip_whitespace(self.bf, self.cursor);
        if self.bf.get(pos) != Some(&b'n') {
            return Err(self.mismatch(pos, "null"));
        }
        self.literal(b"null", "null")
    }

    /// Consumes a `null` literal if it is the next token.
    pub fn try_read_null(&mut self) -> Result<bool, Error> {
        if self.peek()? == Token::Null {
            self.read_null()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Raw text of the next number after grammar validation.
    pub fn read_number_bytes(&mut self) -> Result<&'a [u8], Error> {
        let pos = skip_whitespace(self.bf, self.cursor);
        match self.bf.get(pos) {
            Some(b'-' | b'0'..=b'9') => {}
            _ => return Err(self.mismatch(pos, "number")),
        }
        let end = scan_number(self.bf, pos)?;
        self.cursor = end;
        Ok(&self.bf[pos..end])
    }

    fn read_parsed<T: std::str::FromStr>(&mut self, integral: bool) -> Result<T, Error> {
        let pos = skip_whitespace(self.bf, self.cursor);
        let text = self.read_number_bytes()?;
        if integral && text.iter().any(|b| matches!(b, b'.' | b'e' | b'E')) {
            return Err(Error::type_error(format!(
                "expected integer but found {} at offset {pos}",
                String::from_utf8_lossy(text)
            )));
        }
        // number grammar is ASCII only
        let text = std::str::from_utf8(text).map_err(|_| Error::json("invalid number"))?;
        text.parse::<T>().map_err(|_| {
            Error::type_error(format!(
                "number {text} at offset {pos} is out of range for {}",
                std::any::type_name::<T>()
            ))
        })
    }

    pub fn read_i64(&mut self) -> Result<i64, Error> {
        self.read_parsed(true)
    }

    pub fn read_u64(&mut self) -> Result<u64, Error> {
        self.read_parsed(true)
    }

    pub fn read_i128(&mut self) -> Result<i128, Error> {
        self.read_parsed(true)
    }

    pub fn read_u128(&mut self) -> Result<u128, Error> {
        self.read_parsed(true)
    }

    pub fn read_f64(&mut self) -> Result<f64, Error> {
        self.read_parsed(false)
    }

    pub fn read_f32(&mut self) -> Result<f32, Error> {
        self.read_parsed(false)
    }

    /// Skips the next value, including any nested objects and arrays.
    pub fn skip_value(&mut self) -> Result<(), Error> {
        let base = self.frames.len();
        loop {
            match self.peek()? {
                Token::StartObject => self.read_start_object()?,
                Token::StartArray => self.read_start_array()?,
                Token::String => {
                    self.read_string_bytes()?;
                }
                Token::Number => {
                    self.read_number_bytes()?;
                }
                Token::True | Token::False => {
                    self.read_bool()?;
                }
                Token::Null => self.read_null()?,
                token @ (Token::EndObject | Token::EndArray) => {
                    return Err(Error::json(format!(
                        "unexpected {} at offset {}",
                        token.name(),
                        self.cursor
                    )))
                }
            }
            loop {
                let array = match self.frames.last() {
                    Some(frame) if self.frames.len() > base => frame.array,
                    _ => return Ok(()),
                };
                let more = if array {
                    self.next_element()?
                } else {
                    self.read_property_name()?.is_some()
                };
                if more {
                    break;
                }
            }
        }
    }

    /// Skips the next value and returns its exact source text.
    pub fn read_raw_value(&mut self) -> Result<&'a [u8], Error> {
        let start = skip_whitespace(self.bf, self.cursor);
        self.cursor = start;
        self.skip_value()?;
        Ok(&self.bf[start..self.cursor])
    }

    /// Parses the next value into a [`serde_json::Value`] tree.
    pub fn read_value(&mut self) -> Result<Value, Error> {
        self.read_value_within(MAX_NESTING as u32)
    }

    /// Same as [`Reader::read_value`], opening at most `levels` nested
    /// objects and arrays.
    pub fn read_value_within(&mut self, levels: u32) -> Result<Value, Error> {
        let token = self.peek()?;
        if matches!(token, Token::StartObject | Token::StartArray) && levels == 0 {
            return Err(Error::depth_exceed(format!(
                "Maximum object nesting depth exceeded while reading at offset {}",
                self.cursor
            )));
        }
        match token {
            Token::StartObject => {
                self.read_start_object()?;
                let mut map = Map::new();
                while let Some(name) = self.read_property_name()? {
                    let key = String::from_utf8(name.into_owned())
                        .map_err(|_| Error::json("invalid UTF-8 in property name"))?;
                    let value = self.read_value_within(levels - 1)?;
                    map.insert(key, value);
                }
                Ok(Value::Object(map))
            }
            Token::StartArray => {
                self.read_start_array()?;
                let mut items = Vec::new();
                while self.next_element()? {
                    items.push(self.read_value_within(levels - 1)?);
                }
                Ok(Value::Array(items))
            }
            Token::String => Ok(Value::String(self.read_string()?.into_owned())),
            Token::Number => {
                let text = self.read_number_bytes()?;
                number_value(text).map(Value::Number)
            }
            Token::True | Token::False => Ok(Value::Bool(self.read_bool()?)),
            Token::Null => {
                self.read_null()?;
                Ok(Value::Null)
            }
            token => Err(Error::json(format!(
                "unexpected {} at offset {}",
                token.name(),
                self.cursor
            ))),
        }
    }
}

fn number_value(text: &[u8]) -> Result<Number, Error> {
    let text = std::str::from_utf8(text).map_err(|_| Error::json("invalid number"))?;
    if !text.contains(['.', 'e', 'E']) {
        if let Ok(v) = text.parse::<u64>() {
            return Ok(Number::from(v));
        }
        if let Ok(v) = text.parse::<i64>() {
            return Ok(Number::from(v));
        }
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| Error::type_error(format!("number {text} is not representable")))
}

/// Formats an `f32` with nine significant digits, trailing zeros removed.
///
/// Nine digits are enough for any `f32` to survive a text round trip, which
/// means the value written is the exact binary value rather than the
/// shortest decimal, e.g. `20.21f32` is written as `20.2099991`.
pub fn format_f32(value: f32) -> String {
    if value == 0.0 {
        return if value.is_sign_negative() {
            "-0.0".to_string()
        } else {
            "0.0".to_string()
        };
    }
    let sci = format!("{:.8e}", value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    let negative = mantissa.starts_with('-');
    let mut digits: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).collect();
    while digits.len() > 1 && digits.last() == Some(&b'0') {
        digits.pop();
    }
    let mut out = String::with_capacity(24);
    if negative {
        out.push('-');
    }
    if !(-5..15).contains(&exp) {
        out.push(digits[0] as char);
        if digits.len() > 1 {
            out.push('.');
            out.extend(digits[1..].iter().map(|&d| d as char));
        }
        out.push('e');
        out.push_str(&exp.to_string());
        return out;
    }
    if exp < 0 {
        out.push_str("0.");
        for _ in 0..(-exp - 1) {
            out.push('0');
        }
        out.extend(digits.iter().map(|&d| d as char));
        return out;
    }
    let int_len = exp as usize + 1;
    for i in 0..int_len {
        out.push(digits.get(i).map_or('0', |&d| d as char));
    }
    out.push('.');
    if digits.len() > int_len {
        out.extend(digits[int_len..].iter().map(|&d| d as char));
    } else {
        out.push('0');
    }
    out
}

#[derive(Clone, Copy, Debug)]
struct WriteFrame {
    array: bool,
    first: bool,
}

#[derive(Default)]
pub struct Writer {
    pub(crate) bf: Vec<u8>,
    frames: Vec<WriteFrame>,
}

impl Writer {
    pub fn reset(&mut self) {
        // keep capacity and reset len to 0
        self.bf.clear();
        self.frames.clear();
    }

    pub fn dump(&self) -> Vec<u8> {
        self.bf.clone()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bf
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bf
    }

    pub fn len(&self) -> usize {
        self.bf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bf.is_empty()
    }

    /// Number of currently open objects and arrays.
    pub fn nesting(&self) -> usize {
        self.frames.len()
    }

    #[inline(always)]
    fn before_value(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            if frame.array {
                if !frame.first {
                    self.bf.push(b',');
                }
                frame.first = false;
            }
        }
    }

    pub fn write_start_object(&mut self) {
        self.before_value();
        self.bf.push(b'{');
        self.frames.push(WriteFrame {
            array: false,
            first: true,
        });
    }

    pub fn write_end_object(&mut self) {
        self.frames.pop();
        self.bf.push(b'}');
    }

    pub fn write_start_array(&mut self) {
        self.before_value();
        self.bf.push(b'[');
        self.frames.push(WriteFrame {
            array: true,
            first: true,
        });
    }

    pub fn write_end_array(&mut self) {
        self.frames.pop();
        self.bf.push(b']');
    }

    pub fn write_property_name(&mut self, name: &str) {
        self.write_property_name_bytes(name.as_bytes());
    }

    /// Writes a property name given as UTF-8 bytes.
    pub fn write_property_name_bytes(&mut self, name: &[u8]) {
        if let Some(frame) = self.frames.last_mut() {
            if !frame.first {
                self.bf.push(b',');
            }
            frame.first = false;
        }
        self.escape(name);
        self.bf.push(b':');
    }

    fn escape(&mut self, s: &[u8]) {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        self.bf.push(b'"');
        let mut run = 0;
        for (i, &b) in s.iter().enumerate() {
            let escaped: &[u8] = match b {
                b'"' => b"\\\"",
                b'\\' => b"\\\\",
                b'\n' => b"\\n",
                b'\r' => b"\\r",
                b'\t' => b"\\t",
                0x08 => b"\\b",
                0x0c => b"\\f",
                0x00..=0x1f => &[],
                _ => continue,
            };
            self.bf.extend_from_slice(&s[run..i]);
            run = i + 1;
            if escaped.is_empty() {
                self.bf.extend_from_slice(b"\\u00");
                self.bf.push(HEX[(b >> 4) as usize]);
                self.bf.push(HEX[(b & 0xf) as usize]);
            } else {
                self.bf.extend_from_slice(escaped);
            }
        }
        self.bf.extend_from_slice(&s[run..]);
        self.bf.push(b'"');
    }

    pub fn write_str(&mut self, value: &str) {
        self.before_value();
        self.escape(value.as_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.before_value();
        self.bf
            .extend_from_slice(if value { b"true" } else { b"false" });
    }

    pub fn write_null(&mut self) {
        self.before_value();
        self.bf.extend_from_slice(b"null");
    }

    pub fn write_i64(&mut self, value: i64) {
        self.before_value();
        let _ = write!(self.bf, "{value}");
    }

    pub fn write_u64(&mut self, value: u64) {
        self.before_value();
        let _ = write!(self.bf, "{value}");
    }

    pub fn write_i128(&mut self, value: i128) {
        self.before_value();
        let _ = write!(self.bf, "{value}");
    }

    pub fn write_u128(&mut self, value: u128) {
        self.before_value();
        let _ = write!(self.bf, "{value}");
    }

    pub fn write_f64(&mut self, value: f64) -> Result<(), Error> {
        let number = Number::from_f64(value)
            .ok_or_else(|| Error::type_error(format!("{value} cannot be written as JSON")))?;
        self.before_value();
        let _ = write!(self.bf, "{number}");
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<(), Error> {
        if !value.is_finite() {
            return Err(Error::type_error(format!("{value} cannot be written as JSON")));
        }
        self.before_value();
        self.bf.extend_from_slice(format_f32(value).as_bytes());
        Ok(())
    }

    /// Writes already-encoded JSON text as the next value.
    pub fn write_raw_value(&mut self, raw: &[u8]) {
        self.before_value();
        self.bf.extend_from_slice(raw);
    }

    pub fn write_value(&mut self, value: &Value) {
        match value {
            Value::Null => self.write_null(),
            Value::Bool(b) => self.write_bool(*b),
            Value::Number(n) => {
                self.before_value();
                let _ = write!(self.bf, "{n}");
            }
            Value::String(s) => self.write_str(s),
            Value::Array(items) => {
                self.write_start_array();
                for item in items {
                    self.write_value(item);
                }
                self.write_end_array();
            }
            Value::Object(map) => {
                self.write_start_object();
                for (key, item) in map {
                    self.write_property_name(key);
                    self.write_value(item);
                }
                self.write_end_object();
            }
        }
    }
}
