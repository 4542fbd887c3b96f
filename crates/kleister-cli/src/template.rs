//! Text templates rendered against the JSON form of an output row.
//!
//! A template is literal text with `{{ path | func arg ... }}` placeholders.
//! `path` is a dotted field path (`pack.slug`, `.` for the row itself) and
//! each stage of the pipeline receives the previous value. Arguments are
//! bare words or quoted strings. Missing fields render as empty text.

use serde_json::Value;

use crate::client::{CliError, CliResult};

/// Compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Template {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(Placeholder),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Placeholder {
    path: Vec<String>,
    pipeline: Vec<Call>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Call {
    func: Func,
    args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Func {
    Split,
    Join,
    Upper,
    Lower,
    Contains,
    Replace,
    List(&'static str),
}

impl Func {
    fn lookup(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        let func = match normalized.as_str() {
            "split" => Self::Split,
            "join" => Self::Join,
            "upper" | "toupper" => Self::Upper,
            "lower" | "tolower" => Self::Lower,
            "contains" => Self::Contains,
            "replace" => Self::Replace,
            "buildlist" => Self::List("build"),
            "clientlist" => Self::List("client"),
            "modlist" => Self::List("mod"),
            "packlist" => Self::List("pack"),
            "teamlist" => Self::List("team"),
            "userlist" => Self::List("user"),
            "versionlist" => Self::List("version"),
            _ => return None,
        };
        Some(func)
    }

    const fn arity(self) -> usize {
        match self {
            Self::Upper | Self::Lower | Self::List(_) => 0,
            Self::Split | Self::Join | Self::Contains => 1,
            Self::Replace => 2,
        }
    }
}

impl Template {
    /// Compile `source`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for unterminated placeholders, unknown
    /// functions and wrong argument counts.
    pub(crate) fn parse(source: &str) -> CliResult<Self> {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Text(unescape_text(&rest[..start])));
            }
            let (placeholder, remaining) = parse_placeholder(&rest[start + 2..])?;
            segments.push(Segment::Field(placeholder));
            rest = remaining;
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(unescape_text(rest)));
        }

        Ok(Self { segments })
    }

    /// Render the template against one row.
    pub(crate) fn render(&self, row: &Value) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(placeholder) => {
                    let value = placeholder
                        .pipeline
                        .iter()
                        .fold(lookup(row, &placeholder.path), |value, call| apply(call, value));
                    out.push_str(&text_of(&value));
                }
            }
        }
        out
    }
}

/// Templates given on the command line spell newlines and tabs as `\n`
/// and `\t`.
fn unescape_text(text: &str) -> String {
    text.replace("\\n", "\n").replace("\\t", "\t")
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Word(String),
    Quoted(String),
    Pipe,
}

fn parse_placeholder(input: &str) -> CliResult<(Placeholder, &str)> {
    let (tokens, rest) = tokenize(input)?;
    let mut stages = tokens.split(|token| *token == Token::Pipe);

    let path = match stages.next() {
        Some([Token::Word(path)]) => parse_path(path),
        Some([]) | None => return Err(invalid("placeholder has no field")),
        Some(_) => return Err(invalid("a placeholder starts with a single field path")),
    };

    let mut pipeline = Vec::new();
    for stage in stages {
        let Some((Token::Word(name), args)) = stage.split_first() else {
            return Err(invalid("expected a function name after '|'"));
        };
        let func = Func::lookup(name).ok_or_else(|| invalid(format!("unknown function '{name}'")))?;
        if args.len() != func.arity() {
            return Err(invalid(format!(
                "function '{name}' takes {} argument(s), got {}",
                func.arity(),
                args.len()
            )));
        }
        let args = args
            .iter()
            .map(|arg| match arg {
                Token::Word(text) | Token::Quoted(text) => Ok(text.clone()),
                Token::Pipe => Err(invalid("unexpected '|'")),
            })
            .collect::<CliResult<Vec<_>>>()?;
        pipeline.push(Call { func, args });
    }

    Ok((Placeholder { path, pipeline }, rest))
}

fn tokenize(input: &str) -> CliResult<(Vec<Token>, &str)> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(index, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
        } else if input[index..].starts_with("}}") {
            return Ok((tokens, &input[index + 2..]));
        } else if ch == '|' {
            chars.next();
            tokens.push(Token::Pipe);
        } else if ch == '"' || ch == '\'' {
            chars.next();
            let mut text = String::new();
            let mut closed = false;
            while let Some((_, next)) = chars.next() {
                match next {
                    '\\' => match chars.next() {
                        Some((_, 'n')) => text.push('\n'),
                        Some((_, 't')) => text.push('\t'),
                        Some((_, escaped)) => text.push(escaped),
                        None => break,
                    },
                    quote if quote == ch => {
                        closed = true;
                        break;
                    }
                    other => text.push(other),
                }
            }
            if !closed {
                return Err(invalid("unterminated string"));
            }
            tokens.push(Token::Quoted(text));
        } else {
            let mut word = String::new();
            while let Some(&(at, next)) = chars.peek() {
                if next.is_whitespace() || next == '|' || input[at..].starts_with("}}") {
                    break;
                }
                word.push(next);
                chars.next();
            }
            tokens.push(Token::Word(word));
        }
    }

    Err(invalid("missing closing '}}'"))
}

fn parse_path(raw: &str) -> Vec<String> {
    raw.trim_start_matches('.')
        .split('.')
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn invalid(message: impl Into<String>) -> CliError {
    CliError::validation(format!("invalid template: {}", message.into()))
}

fn lookup(row: &Value, path: &[String]) -> Value {
    let mut current = row;
    for part in path {
        let next = match current {
            Value::Object(map) => map.get(part.as_str()).or_else(|| {
                map.iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(part))
                    .map(|(_, value)| value)
            }),
            Value::Array(items) => part.parse::<usize>().ok().and_then(|index| items.get(index)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return Value::Null,
        }
    }
    current.clone()
}

fn apply(call: &Call, value: Value) -> Value {
    match call.func {
        Func::Upper => Value::String(text_of(&value).to_uppercase()),
        Func::Lower => Value::String(text_of(&value).to_lowercase()),
        Func::Split => {
            let text = text_of(&value);
            let parts: Vec<Value> = if call.args[0].is_empty() {
                text.split_whitespace().map(|part| Value::String(part.to_string())).collect()
            } else {
                text.split(call.args[0].as_str())
                    .map(|part| Value::String(part.to_string()))
                    .collect()
            };
            Value::Array(parts)
        }
        Func::Join => match value {
            Value::Array(items) => Value::String(
                items.iter().map(text_of).collect::<Vec<_>>().join(&call.args[0]),
            ),
            other => Value::String(text_of(&other)),
        },
        Func::Contains => Value::Bool(match &value {
            Value::Array(items) => items.iter().any(|item| text_of(item) == call.args[0]),
            other => text_of(other).contains(call.args[0].as_str()),
        }),
        Func::Replace => Value::String(text_of(&value).replace(&call.args[0], &call.args[1])),
        Func::List(key) => match &value {
            Value::Array(items) => Value::String(
                items
                    .iter()
                    .map(|item| label_of(item, key))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            Value::Null => Value::String(String::new()),
            other => Value::String(label_of(other, key)),
        },
    }
}

/// Slug of the entity under `key` in an association row, or of the item
/// itself; name and id are the fallbacks.
fn label_of(item: &Value, key: &str) -> String {
    let entity = item.get(key).filter(|nested| nested.is_object()).unwrap_or(item);
    ["slug", "name", "id"]
        .iter()
        .filter_map(|field| entity.get(field))
        .map(text_of)
        .find(|label| !label.is_empty())
        .unwrap_or_else(|| text_of(entity))
}

fn text_of(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(items) => items.iter().map(text_of).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}
