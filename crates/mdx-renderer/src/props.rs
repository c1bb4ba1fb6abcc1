//! Attribute parsing for custom tags.
//!
//! Supported value forms:
//!
//! - `name="text"` / `name='text'`: string, taken verbatim
//! - `name={expr}`: brace expression, decoded as JSON, then as a relaxed
//!   JavaScript literal (unquoted keys, single quotes, trailing commas), then
//!   as a boolean or integer, then kept as the trimmed source text
//! - `name=token`: bare token, coerced to boolean or integer when possible
//! - `name`: shorthand for `name={true}`

use serde_json::{Number, Value};

use crate::component::Props;

/// Parses tag attribute strings into typed props.
///
/// Parsing is lenient: a malformed fragment ends parsing and the attributes
/// read so far are returned.
#[derive(Clone, Copy, Debug, Default)]
pub struct PropParser;

impl PropParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse an attribute string such as `type="bar" height={300} animated`.
    #[must_use]
    pub fn parse(&self, attrs: &str) -> Props {
        let mut props = Props::new();
        let mut rest = attrs.trim_start();

        while !rest.is_empty() {
            let name_len = rest
                .find(|c: char| !is_name_char(c))
                .unwrap_or(rest.len());
            if name_len == 0 {
                tracing::debug!(fragment = rest, "Stopping at malformed attribute");
                break;
            }
            let name = &rest[..name_len];
            rest = &rest[name_len..];

            let Some(after_eq) = rest.strip_prefix('=') else {
                if rest.starts_with(|c: char| c.is_whitespace()) || rest.is_empty() {
                    props.insert(name.to_owned(), Value::Bool(true));
                    rest = rest.trim_start();
                    continue;
                }
                tracing::debug!(fragment = rest, "Stopping at malformed attribute");
                break;
            };

            let Some((value, consumed)) = parse_value(after_eq) else {
                tracing::debug!(name, "Stopping at unterminated attribute value");
                break;
            };
            props.insert(name.to_owned(), value);
            rest = after_eq[consumed..].trim_start();
        }

        props
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Parse one attribute value, returning it with the bytes consumed.
fn parse_value(s: &str) -> Option<(Value, usize)> {
    let first = s.chars().next()?;
    match first {
        '"' | '\'' => {
            let len = s[1..].find(first)?;
            Some((Value::String(s[1..=len].to_owned()), len + 2))
        }
        '{' => {
            let close = matching_brace(s)?;
            Some((decode_expression(&s[1..close]), close + 1))
        }
        c if c.is_whitespace() => None,
        _ => {
            let len = s.find(char::is_whitespace).unwrap_or(s.len());
            Some((coerce_scalar(&s[..len]), len))
        }
    }
}

/// Index of the `}` matching the `{` at the start of `s`.
///
/// Braces inside quoted strings do not count.
fn matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                c if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}

/// Decode the inside of a brace expression.
fn decode_expression(inner: &str) -> Value {
    let inner = inner.trim();
    if let Ok(value) = serde_json::from_str::<Value>(inner) {
        return value;
    }
    if let Some(value) = Literal::new(inner).parse() {
        return value;
    }
    coerce_scalar(inner)
}

/// Coerce a bare token: `true`/`false` (any case), all-digit integers, or a string.
fn coerce_scalar(token: &str) -> Value {
    if token.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if token.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if !token.is_empty()
        && token.bytes().all(|b| b.is_ascii_digit())
        && let Ok(n) = token.parse::<u64>()
    {
        return Value::Number(n.into());
    }
    Value::String(token.to_owned())
}

/// Recursive-descent parser for JavaScript object/array literals.
///
/// Accepts the subset that appears in component props: objects with bare,
/// single- or double-quoted keys, arrays, strings in either quote style,
/// numbers, `true`, `false`, `null`, and trailing commas. Nesting deeper
/// than [`MAX_NESTING`] is rejected.
struct Literal<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

/// Same container nesting limit as `serde_json`.
const MAX_NESTING: usize = 128;

impl<'a> Literal<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
        }
    }

    /// Parse the whole input as one value.
    fn parse(mut self) -> Option<Value> {
        let value = self.value()?;
        self.skip_ws();
        (self.pos == self.src.len()).then_some(value)
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn value(&mut self) -> Option<Value> {
        self.skip_ws();
        match self.peek()? {
            open @ ('{' | '[') => {
                if self.depth == MAX_NESTING {
                    return None;
                }
                self.depth += 1;
                let value = if open == '{' {
                    self.object()
                } else {
                    self.array()
                };
                self.depth -= 1;
                value
            }
            '"' | '\'' => self.string().map(Value::String),
            c if c == '-' || c == '.' || c.is_ascii_digit() => self.number(),
            _ => match self.identifier()? {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                "null" => Some(Value::Null),
                _ => None,
            },
        }
    }

    fn object(&mut self) -> Option<Value> {
        self.eat('{');
        let mut map = serde_json::Map::new();
        loop {
            self.skip_ws();
            if self.eat('}') {
                return Some(Value::Object(map));
            }
            let key = match self.peek()? {
                '"' | '\'' => self.string()?,
                _ => self.identifier()?.to_owned(),
            };
            self.skip_ws();
            if !self.eat(':') {
                return None;
            }
            let value = self.value()?;
            map.insert(key, value);
            self.skip_ws();
            if !self.eat(',') {
                self.skip_ws();
                return self.eat('}').then_some(Value::Object(map));
            }
        }
    }

    fn array(&mut self) -> Option<Value> {
        self.eat('[');
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.eat(']') {
                return Some(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_ws();
            if !self.eat(',') {
                self.skip_ws();
                return self.eat(']').then_some(Value::Array(items));
            }
        }
    }

    fn string(&mut self) -> Option<String> {
        let quote = self.peek()?;
        self.pos += 1;
        let mut out = String::new();
        let mut chars = self.rest().char_indices();

        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    let (_, escaped) = chars.next()?;
                    out.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    });
                }
                c if c == quote => {
                    self.pos += i + 1;
                    return Some(out);
                }
                c => out.push(c),
            }
        }

        None
    }

    fn number(&mut self) -> Option<Value> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')))
            .unwrap_or(rest.len());
        let token = &rest[..len];
        self.pos += len;

        if let Ok(n) = token.parse::<i64>() {
            return Some(Value::Number(n.into()));
        }
        let f = token.parse::<f64>().ok()?;
        Number::from_f64(f).map(Value::Number)
    }

    fn identifier(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
            .unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(attrs: &str) -> Value {
        Value::Object(PropParser::new().parse(attrs))
    }

    #[test]
    fn test_empty() {
        assert_eq!(parse(""), json!({}));
        assert_eq!(parse("   "), json!({}));
    }

    #[test]
    fn test_double_quoted_verbatim() {
        assert_eq!(
            parse(r#"title="Hello {world} & 'friends'""#),
            json!({"title": "Hello {world} & 'friends'"})
        );
    }

    #[test]
    fn test_single_quoted() {
        assert_eq!(parse("label='a \"b\"'"), json!({"label": "a \"b\""}));
    }

    #[test]
    fn test_quoted_digits_stay_strings() {
        assert_eq!(parse(r#"year="2024""#), json!({"year": "2024"}));
    }

    #[test]
    fn test_bare_tokens() {
        assert_eq!(
            parse("count=42 visible=TRUE hidden=false color=red"),
            json!({"count": 42, "visible": true, "hidden": false, "color": "red"})
        );
    }

    #[test]
    fn test_bare_negative_number_is_string() {
        assert_eq!(parse("offset=-5"), json!({"offset": "-5"}));
    }

    #[test]
    fn test_brace_json() {
        assert_eq!(
            parse(r#"height={300} ratio={1.5} items={["a", "b"]} name={"x"}"#),
            json!({"height": 300, "ratio": 1.5, "items": ["a", "b"], "name": "x"})
        );
    }

    #[test]
    fn test_brace_nested_structure() {
        assert_eq!(
            parse("data={ {a: 1, b: [1,2,{c:3}]} }"),
            json!({"data": {"a": 1, "b": [1, 2, {"c": 3}]}})
        );
    }

    #[test]
    fn test_brace_followed_by_more_attrs() {
        assert_eq!(
            parse("config={{x: {y: 1}}} title=\"T\""),
            json!({"config": {"x": {"y": 1}}, "title": "T"})
        );
    }

    #[test]
    fn test_brace_relaxed_literal() {
        assert_eq!(
            parse("series={[{name: 'A', values: [1, 2,],},]}"),
            json!({"series": [{"name": "A", "values": [1, 2]}]})
        );
    }

    #[test]
    fn test_brace_string_containing_braces() {
        assert_eq!(
            parse(r#"template={"{ not a brace }"}"#),
            json!({"template": "{ not a brace }"})
        );
    }

    #[test]
    fn test_brace_boolean_and_integer_fallback() {
        assert_eq!(
            parse("a={True} b={007}"),
            json!({"a": true, "b": 7})
        );
    }

    #[test]
    fn test_brace_raw_fallback() {
        assert_eq!(
            parse("onClick={() => setOpen(true)} value={ someVar }"),
            json!({"onClick": "() => setOpen(true)", "value": "someVar"})
        );
    }

    #[test]
    fn test_bare_attribute_is_true() {
        assert_eq!(
            parse("animated legend=\"top\" wide"),
            json!({"animated": true, "legend": "top", "wide": true})
        );
    }

    #[test]
    fn test_hyphenated_names() {
        assert_eq!(parse(r#"aria-label="Chart""#), json!({"aria-label": "Chart"}));
    }

    #[test]
    fn test_unterminated_quote_keeps_earlier_props() {
        assert_eq!(parse(r#"a="1" b="oops"#), json!({"a": "1"}));
    }

    #[test]
    fn test_unterminated_brace_keeps_earlier_props() {
        assert_eq!(parse("a=1 b={ {x: 1}"), json!({"a": 1}));
    }

    #[test]
    fn test_malformed_fragment_stops() {
        assert_eq!(parse("a=1 ??? b=2"), json!({"a": 1}));
        assert_eq!(parse("a= b=2"), json!({}));
    }

    #[test]
    fn test_deeply_nested_brace_falls_back_to_raw() {
        let depth = 5000;
        let inner = format!("{}1{}", "[".repeat(depth), "]".repeat(depth));
        let props = parse(&format!("data={{{inner}}} title=\"kept\""));
        assert_eq!(props["data"], Value::String(inner));
        assert_eq!(props["title"], "kept");
    }

    #[test]
    fn test_literal_nesting_limit() {
        let at_limit = format!("{}1{}", "[".repeat(MAX_NESTING), "]".repeat(MAX_NESTING));
        assert!(Literal::new(&at_limit).parse().is_some());
        let over = format!("[{at_limit}]");
        assert_eq!(Literal::new(&over).parse(), None);
    }

    #[test]
    fn test_literal_rejects_trailing_garbage() {
        assert_eq!(Literal::new("{a: 1} x").parse(), None);
        assert_eq!(Literal::new("[1, 2").parse(), None);
    }

    #[test]
    fn test_literal_escapes() {
        assert_eq!(
            Literal::new(r"{'it\'s': 'a\nb'}").parse(),
            Some(json!({"it's": "a\nb"}))
        );
    }
}
