//! Filter, sort and first/last selection over catalog listings.
//!
//! A [`CatalogQuery`] is compiled against a row type before any request is
//! issued, so malformed filters, unknown fields and conflicting selectors
//! are reported as validation errors without touching the network. The
//! compiled query then runs filter, sort and selection in that order.
//!
//! Filter grammar:
//!
//! ```text
//! expr       := and ( "||" and )*
//! and        := unary ( "&&" unary )*
//! unary      := "!" unary | comparison
//! comparison := operand ( ( "==" | "!=" | "=~" | "contains" ) operand )?
//! operand    := "(" expr ")" | field | string | "true" | "false"
//! ```
//!
//! Field names are case-insensitive. Bare words starting with a digit are
//! read as strings so `version == 1.12.2` works without quotes.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use kleister_api_models::{Forge, Minecraft};

use crate::error::{Error, Result};
use crate::ordering::{ForgeSort, MinecraftSort, sort_forge, sort_minecraft};

/// Row type that can be filtered and sorted by name.
pub trait CatalogRow: Sized {
    /// Typed sort selector.
    type Sort: Copy + fmt::Debug + FromStr<Err = Error>;

    /// Filterable field names, lowercase.
    const FIELDS: &'static [&'static str];

    /// Field value by lowercase name.
    fn field(&self, name: &str) -> Option<&str>;

    /// Stable in-place sort.
    fn sort(rows: &mut [Self], by: Self::Sort);
}

impl CatalogRow for Minecraft {
    type Sort = MinecraftSort;

    const FIELDS: &'static [&'static str] = &MinecraftSort::NAMES;

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "slug" => Some(&self.slug),
            "version" => Some(&self.version),
            "type" => Some(&self.kind),
            _ => None,
        }
    }

    fn sort(rows: &mut [Self], by: Self::Sort) {
        sort_minecraft(rows, by);
    }
}

impl CatalogRow for Forge {
    type Sort = ForgeSort;

    const FIELDS: &'static [&'static str] = &ForgeSort::NAMES;

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "slug" => Some(&self.slug),
            "version" => Some(&self.version),
            "minecraft" => Some(&self.minecraft),
            _ => None,
        }
    }

    fn sort(rows: &mut [Self], by: Self::Sort) {
        sort_forge(rows, by);
    }
}

/// Post-sort row selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Select {
    /// Keep every row.
    #[default]
    All,
    /// Keep only the first row.
    First,
    /// Keep only the last row.
    Last,
}

impl Select {
    /// Build a selector from the `--first` and `--last` flags.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when both flags are set.
    pub fn from_flags(first: bool, last: bool) -> Result<Self> {
        match (first, last) {
            (true, true) => Err(Error::validation(
                "the --first and --last flags are mutually exclusive",
            )),
            (true, false) => Ok(Self::First),
            (false, true) => Ok(Self::Last),
            (false, false) => Ok(Self::All),
        }
    }
}

/// Raw listing options as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Filter expression.
    pub filter: Option<String>,
    /// Sort field name.
    pub sort: Option<String>,
    /// Post-sort selector.
    pub select: Select,
}

impl CatalogQuery {
    /// Validate the query against `R`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for syntax errors, unknown fields, type
    /// mismatches and unknown sort fields.
    pub fn compile<R: CatalogRow>(&self) -> Result<CompiledQuery<R>> {
        let filter = match self.filter.as_deref().map(str::trim) {
            Some(source) if !source.is_empty() => Some(Filter::parse(source, R::FIELDS)?),
            _ => None,
        };
        let sort = self
            .sort
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map(str::parse::<R::Sort>)
            .transpose()?;
        Ok(CompiledQuery {
            filter,
            sort,
            select: self.select,
        })
    }
}

/// Query validated against a row type.
#[derive(Debug)]
pub struct CompiledQuery<R: CatalogRow> {
    filter: Option<Filter>,
    sort: Option<R::Sort>,
    select: Select,
}

impl<R: CatalogRow> CompiledQuery<R> {
    /// Run filter, sort and selection over `rows`.
    #[must_use]
    pub fn apply(&self, rows: Vec<R>) -> Vec<R> {
        let mut rows: Vec<R> = match &self.filter {
            Some(filter) => rows.into_iter().filter(|row| filter.matches(row)).collect(),
            None => rows,
        };
        if let Some(by) = self.sort {
            R::sort(&mut rows, by);
        }
        match self.select {
            Select::All => rows,
            Select::First => rows.into_iter().take(1).collect(),
            Select::Last => rows.pop().into_iter().collect(),
        }
    }
}

/// Parsed, type-checked filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    root: Expr,
}

impl Filter {
    /// Parse `source`, resolving identifiers against `fields`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the expression is malformed,
    /// names an unknown field, or does not evaluate to a boolean.
    pub fn parse(source: &str, fields: &[&str]) -> Result<Self> {
        let tokens = lex(source, fields)?;
        let mut parser = Parser { tokens, position: 0 };
        let root = parser.expression()?;
        if let Some(token) = parser.peek() {
            return Err(filter_error(format!("unexpected {token}")));
        }
        match root.kind() {
            Kind::Bool => Ok(Self { root }),
            Kind::Text => Err(filter_error("expression must evaluate to a boolean")),
        }
    }

    /// Whether `row` satisfies the filter.
    #[must_use]
    pub fn matches<R: CatalogRow>(&self, row: &R) -> bool {
        matches!(self.root.eval(row), Value::Bool(true))
    }
}

fn filter_error(detail: impl Display) -> Error {
    Error::validation(format!("invalid filter: {detail}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Field(String),
    Text(String),
    Bool(bool),
    Eq,
    Ne,
    Contains,
    Not,
    And,
    Or,
    Open,
    Close,
}

impl Display for Token {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(formatter, "field '{name}'"),
            Self::Text(text) => write!(formatter, "string '{text}'"),
            Self::Bool(value) => write!(formatter, "'{value}'"),
            Self::Eq => formatter.write_str("'=='"),
            Self::Ne => formatter.write_str("'!='"),
            Self::Contains => formatter.write_str("'=~'"),
            Self::Not => formatter.write_str("'!'"),
            Self::And => formatter.write_str("'&&'"),
            Self::Or => formatter.write_str("'||'"),
            Self::Open => formatter.write_str("'('"),
            Self::Close => formatter.write_str("')'"),
        }
    }
}

fn lex(source: &str, fields: &[&str]) -> Result<Vec<Token>> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut index = 0;

    while let Some(&current) = chars.get(index) {
        let next = chars.get(index + 1).copied();
        match current {
            c if c.is_whitespace() => index += 1,
            '(' => {
                tokens.push(Token::Open);
                index += 1;
            }
            ')' => {
                tokens.push(Token::Close);
                index += 1;
            }
            '=' if next == Some('=') => {
                tokens.push(Token::Eq);
                index += 2;
            }
            '=' if next == Some('~') => {
                tokens.push(Token::Contains);
                index += 2;
            }
            '!' if next == Some('=') => {
                tokens.push(Token::Ne);
                index += 2;
            }
            '!' => {
                tokens.push(Token::Not);
                index += 1;
            }
            '&' if next == Some('&') => {
                tokens.push(Token::And);
                index += 2;
            }
            '|' if next == Some('|') => {
                tokens.push(Token::Or);
                index += 2;
            }
            '"' | '\'' => {
                let start = index + 1;
                let end = chars[start..]
                    .iter()
                    .position(|&c| c == current)
                    .map(|offset| start + offset)
                    .ok_or_else(|| filter_error("unterminated string literal"))?;
                tokens.push(Token::Text(chars[start..end].iter().collect()));
                index = end + 1;
            }
            c if is_word_char(c) => {
                let start = index;
                while chars.get(index).copied().is_some_and(is_word_char) {
                    index += 1;
                }
                let word: String = chars[start..index].iter().collect();
                tokens.push(word_token(&word, fields)?);
            }
            other => return Err(filter_error(format!("unexpected character '{other}'"))),
        }
    }
    Ok(tokens)
}

const fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

fn word_token(word: &str, fields: &[&str]) -> Result<Token> {
    let lower = word.to_ascii_lowercase();
    match lower.as_str() {
        "true" => return Ok(Token::Bool(true)),
        "false" => return Ok(Token::Bool(false)),
        "contains" => return Ok(Token::Contains),
        _ => {}
    }
    if fields.contains(&lower.as_str()) {
        Ok(Token::Field(lower))
    } else if word.starts_with(|c: char| c.is_ascii_digit()) {
        Ok(Token::Text(word.to_string()))
    } else {
        Err(filter_error(format!(
            "unknown field '{word}', expected one of {}",
            fields.join(", ")
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Text,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compare {
    Eq,
    Ne,
    Contains,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Field(String),
    Text(String),
    Bool(bool),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Compare(Compare, Box<Expr>, Box<Expr>),
}

#[derive(Debug, PartialEq, Eq)]
enum Value<'a> {
    Text(&'a str),
    Bool(bool),
}

impl Expr {
    const fn kind(&self) -> Kind {
        match self {
            Self::Field(_) | Self::Text(_) => Kind::Text,
            _ => Kind::Bool,
        }
    }

    fn eval<'a, R: CatalogRow>(&'a self, row: &'a R) -> Value<'a> {
        match self {
            Self::Field(name) => Value::Text(row.field(name).unwrap_or_default()),
            Self::Text(text) => Value::Text(text.as_str()),
            Self::Bool(value) => Value::Bool(*value),
            Self::Not(inner) => Value::Bool(!inner.truthy(row)),
            Self::And(left, right) => Value::Bool(left.truthy(row) && right.truthy(row)),
            Self::Or(left, right) => Value::Bool(left.truthy(row) || right.truthy(row)),
            Self::Compare(op, left, right) => {
                let (left, right) = (left.eval(row), right.eval(row));
                Value::Bool(match op {
                    Compare::Eq => left == right,
                    Compare::Ne => left != right,
                    Compare::Contains => match (left, right) {
                        (Value::Text(haystack), Value::Text(needle)) => haystack.contains(needle),
                        _ => false,
                    },
                })
            }
        }
    }

    fn truthy<R: CatalogRow>(&self, row: &R) -> bool {
        matches!(self.eval(row), Value::Bool(true))
    }
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn expression(&mut self) -> Result<Expr> {
        let mut left = self.conjunction()?;
        while self.eat(&Token::Or) {
            let right = self.conjunction()?;
            left = Expr::Or(Box::new(boolean(left, "||")?), Box::new(boolean(right, "||")?));
        }
        Ok(left)
    }

    fn conjunction(&mut self) -> Result<Expr> {
        let mut left = self.unary()?;
        while self.eat(&Token::And) {
            let right = self.unary()?;
            left = Expr::And(Box::new(boolean(left, "&&")?), Box::new(boolean(right, "&&")?));
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.eat(&Token::Not) {
            let inner = self.unary()?;
            return Ok(Expr::Not(Box::new(boolean(inner, "!")?)));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr> {
        let left = self.operand()?;
        let op = match self.peek() {
            Some(Token::Eq) => Compare::Eq,
            Some(Token::Ne) => Compare::Ne,
            Some(Token::Contains) => Compare::Contains,
            _ => return Ok(left),
        };
        self.position += 1;
        let right = self.operand()?;

        match (op, left.kind(), right.kind()) {
            (Compare::Contains, Kind::Text, Kind::Text) => {}
            (Compare::Contains, _, _) => {
                return Err(filter_error("'=~' expects string operands"));
            }
            (_, left_kind, right_kind) if left_kind != right_kind => {
                return Err(filter_error("cannot compare a string with a boolean"));
            }
            _ => {}
        }
        Ok(Expr::Compare(op, Box::new(left), Box::new(right)))
    }

    fn operand(&mut self) -> Result<Expr> {
        let token = self
            .tokens
            .get(self.position)
            .cloned()
            .ok_or_else(|| filter_error("unexpected end of expression"))?;
        self.position += 1;
        match token {
            Token::Open => {
                let inner = self.expression()?;
                if self.eat(&Token::Close) {
                    Ok(inner)
                } else {
                    Err(filter_error("missing closing parenthesis"))
                }
            }
            Token::Field(name) => Ok(Expr::Field(name)),
            Token::Text(text) => Ok(Expr::Text(text)),
            Token::Bool(value) => Ok(Expr::Bool(value)),
            other => Err(filter_error(format!("unexpected {other}"))),
        }
    }
}

fn boolean(expr: Expr, operator: &str) -> Result<Expr> {
    match expr.kind() {
        Kind::Bool => Ok(expr),
        Kind::Text => Err(filter_error(format!("'{operator}' expects boolean operands"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minecraft(version: &str, kind: &str) -> Minecraft {
        Minecraft {
            id: 0,
            slug: version.replace('.', "-"),
            version: version.to_string(),
            kind: kind.to_string(),
            ..Minecraft::default()
        }
    }

    fn catalog() -> Vec<Minecraft> {
        vec![
            minecraft("1.7.10", "release"),
            minecraft("1.12.2", "release"),
            minecraft("17w43a", "snapshot"),
            minecraft("1.10.2", "release"),
        ]
    }

    fn run(query: &CatalogQuery) -> Vec<String> {
        query
            .compile::<Minecraft>()
            .expect("query compiles")
            .apply(catalog())
            .into_iter()
            .map(|row| row.version)
            .collect()
    }

    #[test]
    fn sort_then_first_picks_lowest_version() {
        let query = CatalogQuery {
            sort: Some("Version".into()),
            select: Select::First,
            ..CatalogQuery::default()
        };
        assert_eq!(run(&query), ["1.7.10"]);
    }

    #[test]
    fn filter_runs_before_sort_and_last() {
        let query = CatalogQuery {
            filter: Some("Type == \"release\" && version != '1.12.2'".into()),
            sort: Some("version".into()),
            select: Select::Last,
        };
        assert_eq!(run(&query), ["1.10.2"]);
    }

    #[test]
    fn containment_negation_and_grouping() {
        let query = CatalogQuery {
            filter: Some("!(version =~ \"w\") && (slug contains '12' || VERSION == 1.7.10)".into()),
            ..CatalogQuery::default()
        };
        assert_eq!(run(&query), ["1.7.10", "1.12.2"]);
    }

    #[test]
    fn boolean_literals_are_supported() {
        let query = CatalogQuery {
            filter: Some("false || true".into()),
            ..CatalogQuery::default()
        };
        assert_eq!(run(&query).len(), 4);
    }

    #[test]
    fn invalid_filters_are_validation_errors() {
        for source in [
            "minecraft == '1.12.2'",
            "version ==",
            "version == 'open",
            "(version == '1')",
            "version",
            "version && type",
            "version == true",
            "version == '1' )",
            "version # '1'",
        ] {
            let query = CatalogQuery {
                filter: Some(source.into()),
                ..CatalogQuery::default()
            };
            if source == "(version == '1')" {
                assert!(query.compile::<Minecraft>().is_ok(), "{source} should compile");
                continue;
            }
            let err = query
                .compile::<Minecraft>()
                .expect_err(&format!("{source} should be rejected"));
            assert!(err.is_validation(), "{source}: {err}");
        }
    }

    #[test]
    fn forge_rows_expose_minecraft_field() {
        let rows = vec![
            Forge {
                version: "14.23.5.2847".into(),
                minecraft: "1.12.2".into(),
                ..Forge::default()
            },
            Forge {
                version: "10.13.4.1614".into(),
                minecraft: "1.7.10".into(),
                ..Forge::default()
            },
        ];
        let query = CatalogQuery {
            filter: Some("minecraft == '1.7.10'".into()),
            ..CatalogQuery::default()
        };
        let kept = query.compile::<Forge>().expect("compiles").apply(rows);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].version, "10.13.4.1614");

        let wrong = CatalogQuery {
            sort: Some("type".into()),
            ..CatalogQuery::default()
        };
        assert!(wrong.compile::<Forge>().is_err());
    }

    #[test]
    fn first_and_last_conflict() {
        assert!(Select::from_flags(true, true).is_err());
        assert_eq!(Select::from_flags(false, true).ok(), Some(Select::Last));
        assert_eq!(Select::from_flags(false, false).ok(), Some(Select::All));
    }

    #[test]
    fn empty_listing_survives_selection() {
        let query = CatalogQuery {
            select: Select::Last,
            ..CatalogQuery::default()
        };
        let compiled = query.compile::<Minecraft>().expect("compiles");
        assert!(compiled.apply(Vec::new()).is_empty());
    }
}
