//! Array text layout shared by the API and display codecs
//!
//! ```text
//! 1-D:   e1,e2,e3            (optionally wrapped in {...} on input)
//! N-D:   bounds[d1,d2]{e1,e2,...}
//! ```
//!
//! Elements are in row-major order. String elements are double-quoted with
//! backslash escapes for `\\`, `\n`, `\r`, `\t`, `\"` and `\0`; on input any
//! other escaped character stands for itself.

use crate::error::{ValueError, ValueResult};
use crate::kind::ValueKind;
use crate::value::{Array, element_count};

const BOUNDS_KEYWORD: &str = "bounds";

// ============================================================================
// ENCODING
// ============================================================================

/// Lay out an array with elements rendered by `element`
pub fn encode<T>(
    array: &Array<T>,
    separator: &str,
    mut element: impl FnMut(&T) -> String,
) -> String {
    let multi = array.dimensions() > 1;
    let mut out = String::new();

    if multi {
        out.push_str(BOUNDS_KEYWORD);
        out.push('[');
        for (i, extent) in array.shape().iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&extent.to_string());
        }
        out.push_str("]{");
    }

    for (i, value) in array.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        out.push_str(&element(value));
    }

    if multi {
        out.push('}');
    }
    out
}

/// Double-quote and escape a string element
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

// ============================================================================
// DECODING
// ============================================================================

/// One element as it appeared in the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Double-quoted, already unescaped
    Quoted(String),
    /// Bare text, trimmed
    Bare(&'a str),
}

impl Token<'_> {
    /// Element text regardless of quoting
    pub fn text(&self) -> &str {
        match self {
            Self::Quoted(s) => s,
            Self::Bare(s) => s,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Self::Quoted(s) => s,
            Self::Bare(s) => s.to_owned(),
        }
    }
}

/// Parse array text, converting each element token with `element`
///
/// Layout errors are [`ValueError::Format`] against `kind`; element failures
/// are wrapped with their flat index.
pub fn decode<T>(
    text: &str,
    kind: ValueKind,
    mut element: impl FnMut(Token<'_>) -> ValueResult<T>,
) -> ValueResult<Array<T>> {
    let mut cursor = Cursor::new(text, kind);
    cursor.skip_ws();

    let (shape, tokens) = if cursor.eat_keyword(BOUNDS_KEYWORD) {
        let shape = cursor.extents()?;
        cursor.skip_ws();
        cursor.expect('{')?;
        let tokens = cursor.elements(Some('}'))?;
        cursor.expect('}')?;

        let expected = element_count(&shape).map_err(|_| cursor.error())?;
        if expected != tokens.len() {
            return Err(cursor.error());
        }
        (Some(shape), tokens)
    } else if cursor.eat('{') {
        let tokens = cursor.elements(Some('}'))?;
        cursor.expect('}')?;
        (None, tokens)
    } else {
        (None, cursor.elements(None)?)
    };

    cursor.skip_ws();
    if !cursor.at_end() {
        return Err(cursor.error());
    }

    let elements = tokens
        .into_iter()
        .enumerate()
        .map(|(index, token)| element(token).map_err(|e| ValueError::at_element(index, e)))
        .collect::<ValueResult<Vec<T>>>()?;

    match shape {
        Some(shape) => Array::from_shape(&shape, elements),
        None => Ok(Array::from_vec(elements)),
    }
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
    kind: ValueKind,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, kind: ValueKind) -> Self {
        Self { text, pos: 0, kind }
    }

    fn rest(&self) -> &'a str {
        self.text.get(self.pos..).unwrap_or("")
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> ValueResult<()> {
        self.skip_ws();
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let rest = self.rest();
        let matches = rest
            .get(..keyword.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(keyword));
        if matches {
            self.pos += keyword.len();
        }
        matches
    }

    fn error(&self) -> ValueError {
        ValueError::format_at(self.kind, self.text, self.pos)
    }

    /// `[d1, d2, ...]`
    fn extents(&mut self) -> ValueResult<Vec<usize>> {
        self.expect('[')?;
        let mut shape = Vec::new();
        loop {
            self.skip_ws();
            let start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
            let extent = self
                .text
                .get(start..self.pos)
                .and_then(|digits| digits.parse::<usize>().ok())
                .ok_or_else(|| self.error())?;
            shape.push(extent);

            self.skip_ws();
            if !self.eat(',') {
                break;
            }
        }
        self.expect(']')?;
        Ok(shape)
    }

    /// Comma separated element tokens up to `closing` or the end of input
    fn elements(&mut self, closing: Option<char>) -> ValueResult<Vec<Token<'a>>> {
        let mut tokens = Vec::new();
        self.skip_ws();
        if self.at_end() || (closing.is_some() && self.peek() == closing) {
            return Ok(tokens);
        }

        loop {
            tokens.push(self.token(closing)?);
            self.skip_ws();
            if !self.eat(',') {
                return Ok(tokens);
            }
        }
    }

    fn token(&mut self, closing: Option<char>) -> ValueResult<Token<'a>> {
        self.skip_ws();
        if self.eat('"') {
            return self.quoted();
        }

        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == ',' || Some(c) == closing {
                break;
            }
            if c == '"' {
                return Err(self.error());
            }
            self.bump();
        }

        let bare = self.text.get(start..self.pos).unwrap_or("").trim();
        if bare.is_empty() {
            return Err(ValueError::format_at(self.kind, self.text, start));
        }
        Ok(Token::Bare(bare))
    }

    /// Body of a quoted element; the opening quote is consumed
    fn quoted(&mut self) -> ValueResult<Token<'a>> {
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(Token::Quoted(value)),
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('r') => value.push('\r'),
                    Some('t') => value.push('\t'),
                    Some('0') => value.push('\0'),
                    Some(other) => value.push(other),
                    None => return Err(self.error()),
                },
                Some(other) => value.push(other),
                None => return Err(self.error()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    fn strings(text: &str) -> ValueResult<Array<String>> {
        decode(text, ValueKind::StringArray, |t| Ok(t.into_string()))
    }

    fn integers(text: &str) -> ValueResult<Array<i64>> {
        decode(text, ValueKind::IntegerArray, |t| {
            t.text()
                .parse::<i64>()
                .map_err(|_| ValueError::format(ValueKind::Integer, t.text()))
        })
    }

    #[test]
    fn test_encode_layouts() {
        let flat = Array::from_vec(vec![1, 2, 3]);
        assert_eq!(encode(&flat, ",", ToString::to_string), "1,2,3");

        let grid = Array::from_shape(&[2, 2], vec![1, 2, 3, 4]).unwrap();
        assert_eq!(encode(&grid, ",", ToString::to_string), "bounds[2,2]{1,2,3,4}");
        assert_eq!(encode(&grid, ", ", ToString::to_string), "bounds[2,2]{1, 2, 3, 4}");

        assert_eq!(encode(&Array::<i64>::empty(), ",", ToString::to_string), "");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("a,b"), "\"a,b\"");
        assert_eq!(quote("say \"hi\"\n"), "\"say \\\"hi\\\"\\n\"");
        assert_eq!(quote("c:\\tmp\t\0"), "\"c:\\\\tmp\\t\\0\"");
    }

    #[test]
    fn test_decode_flat_and_braced() {
        assert_eq!(integers("1,2,3").unwrap().as_slice(), &[1, 2, 3]);
        assert_eq!(integers(" { 1 , 2 } ").unwrap().as_slice(), &[1, 2]);
        assert!(integers("").unwrap().is_empty());
        assert!(integers("{}").unwrap().is_empty());
    }

    #[test]
    fn test_decode_bounds() {
        let grid = integers("BOUNDS [2, 3] {1,2,3,4,5,6}").unwrap();
        assert_eq!(grid.shape(), &[2, 3]);
        assert_eq!(grid.get(&[1, 2]), Some(&6));

        let empty = integers("bounds[2,0]{}").unwrap();
        assert_eq!(empty.shape(), &[2, 0]);
    }

    #[test]
    fn test_decode_rejects_malformed_layouts() {
        for text in [
            "1,2,",
            ",1",
            "1,,2",
            "{1,2",
            "{1,2}x",
            "bounds[2,2]{1,2,3}",
            "bounds[2,2]{1,2,3,4,5}",
            "bounds[]{}",
            "bounds[a]{}",
            "bounds[1]{1} 2",
        ] {
            let err = integers(text).unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Format, "{text}");
            assert_eq!(err.element_index(), None, "{text}");
        }
    }

    #[test]
    fn test_decode_element_error_carries_index() {
        let err = integers("1,x,3").unwrap_err();
        assert_eq!(err.element_index(), Some(1));
        assert_eq!(err.category(), ErrorCategory::Format);
    }

    #[test]
    fn test_decode_quoted_strings() {
        let array = strings(r#""a,b", "say \"hi\"", "tab\tx", "\q""#).unwrap();
        assert_eq!(array.as_slice(), &["a,b", "say \"hi\"", "tab\tx", "q"]);

        let array = strings(r#""""#).unwrap();
        assert_eq!(array.as_slice(), &[""]);

        assert!(strings(r#""unterminated"#).is_err());
        assert!(strings(r#""a" "b""#).is_err());
        assert!(strings(r#"a"b"#).is_err());
    }

    #[test]
    fn test_quote_then_decode_preserves_text() {
        let original = vec!["x\\y".to_owned(), "\"".to_owned(), "\r\n\0".to_owned()];
        let text = encode(&Array::from_vec(original.clone()), ",", |s| quote(s));
        assert_eq!(strings(&text).unwrap().as_slice(), original.as_slice());
    }
}
