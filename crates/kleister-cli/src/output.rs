//! Output renderers and user-facing notices.
//!
//! Command results go to stdout; notices such as `Successfully created`
//! go to stderr so they never mix with rendered data.

use anyhow::anyhow;
use clap::ValueEnum;
use quick_xml::se::Serializer as XmlSerializer;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::{CliError, CliResult};
use crate::template::Template;

/// Output encodings selectable with `--output`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Render each row through a text template.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// Indented XML.
    Xml,
}

/// Output selection resolved from the global flags.
#[derive(Debug, Clone, Default)]
pub(crate) struct Output {
    pub(crate) format: OutputFormat,
    pub(crate) template: Option<String>,
}

impl Output {
    /// Merge `--output`, `--json`, `--xml` and `--format`.
    pub(crate) fn from_flags(
        output: OutputFormat,
        json: bool,
        xml: bool,
        template: Option<String>,
    ) -> CliResult<Self> {
        let format = match (json, xml) {
            (true, true) => {
                return Err(CliError::validation(
                    "the --json and --xml flags are mutually exclusive",
                ));
            }
            (true, false) => OutputFormat::Json,
            (false, true) => OutputFormat::Xml,
            (false, false) => output,
        };
        Ok(Self { format, template })
    }

    /// Renderer using the `--format` template or the command's default.
    ///
    /// Compiling here lets handlers reject a bad template before any request.
    pub(crate) fn renderer(&self, default_template: &str) -> CliResult<Renderer> {
        let source = self.template.as_deref().unwrap_or(default_template);
        let template = match self.format {
            OutputFormat::Text => Some(Template::parse(source)?),
            OutputFormat::Json | OutputFormat::Xml => None,
        };
        Ok(Renderer {
            format: self.format,
            template,
        })
    }
}

/// Encoder for one command's results.
#[derive(Debug)]
pub(crate) struct Renderer {
    format: OutputFormat,
    template: Option<Template>,
}

impl Renderer {
    /// Render a single record; `element` names its XML root.
    pub(crate) fn one<T: Serialize>(&self, element: &str, record: &T) -> CliResult<String> {
        match self.format {
            OutputFormat::Text => Ok(self.text(&to_value(record)?)),
            OutputFormat::Json => to_json(record),
            OutputFormat::Xml => to_xml(element, record),
        }
    }

    /// Render a listing; `element` names each XML item under a root named
    /// after its plural.
    pub(crate) fn many<T: Serialize>(&self, element: &str, records: &[T]) -> CliResult<String> {
        match self.format {
            OutputFormat::Text => Ok(records
                .iter()
                .map(|record| to_value(record).map(|value| self.text(&value)))
                .collect::<CliResult<Vec<_>>>()?
                .join("\n")),
            OutputFormat::Json => to_json(records),
            OutputFormat::Xml => {
                let values = records.iter().map(to_value).collect::<CliResult<Vec<_>>>()?;
                let mut root = Map::new();
                root.insert(element.to_string(), Value::Array(values));
                to_xml(&format!("{element}s"), &Value::Object(root))
            }
        }
    }

    fn text(&self, value: &Value) -> String {
        self.template
            .as_ref()
            .map(|template| template.render(value))
            .unwrap_or_default()
    }
}

/// Print rendered output; an empty text listing becomes a notice instead.
pub(crate) fn emit(rendered: &str) {
    if rendered.is_empty() {
        notice("Empty result");
    } else {
        println!("{rendered}");
    }
}

/// Print a notice to stderr.
pub(crate) fn notice(message: &str) {
    eprintln!("{message}");
}

fn to_value<T: Serialize>(record: &T) -> CliResult<Value> {
    serde_json::to_value(record)
        .map_err(|err| CliError::failure(anyhow!("failed to encode output: {err}")))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

fn to_xml<T: Serialize + ?Sized>(root: &str, value: &T) -> CliResult<String> {
    let mut buffer = String::new();
    let mut serializer = XmlSerializer::with_root(&mut buffer, Some(root))
        .map_err(|err| CliError::failure(anyhow!("failed to format XML: {err}")))?;
    serializer.indent(' ', 2);
    value
        .serialize(serializer)
        .map_err(|err| CliError::failure(anyhow!("failed to format XML: {err}")))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pack() -> Value {
        json!({"id": 7, "slug": "tekkit", "name": "Tekkit", "published": true, "private": false})
    }

    #[test]
    fn json_and_xml_flags_conflict() {
        let err = Output::from_flags(OutputFormat::Text, true, true, None).expect_err("conflict");
        assert_eq!(err.exit_code(), 1);

        let output = Output::from_flags(OutputFormat::Text, false, true, None).expect("xml");
        assert_eq!(output.format, OutputFormat::Xml);
    }

    #[test]
    fn json_uses_two_space_indent() {
        let output = Output::from_flags(OutputFormat::Json, false, false, None).expect("json");
        let rendered = output.renderer("").expect("renderer").one("pack", &pack()).expect("render");
        assert!(rendered.starts_with("{\n  \"id\": 7,"));
        let parsed: Value = serde_json::from_str(&rendered).expect("valid json");
        assert_eq!(parsed, pack());
    }

    #[test]
    fn xml_nests_items_under_plural_root() {
        let output = Output::from_flags(OutputFormat::Xml, false, false, None).expect("xml");
        let rendered = output
            .renderer("")
            .expect("renderer")
            .many("pack", &[pack()])
            .expect("render");
        assert!(rendered.starts_with("<packs>"), "{rendered}");
        assert!(rendered.contains("\n  <pack>"), "{rendered}");
        assert!(rendered.contains("<slug>tekkit</slug>"), "{rendered}");
    }

    #[test]
    fn text_renders_each_row_with_template() {
        let output = Output::from_flags(OutputFormat::Text, false, false, Some("{{ slug }}".into()))
            .expect("text");
        let renderer = output.renderer("{{ id }}").expect("renderer");
        let rows = [pack(), json!({"slug": "voltz"})];
        assert_eq!(renderer.many("pack", &rows).expect("render"), "tekkit\nvoltz");
    }

    #[test]
    fn bad_template_fails_before_rendering() {
        let output = Output::from_flags(OutputFormat::Text, false, false, Some("{{ id | nope }}".into()))
            .expect("text");
        assert!(output.renderer("{{ id }}").is_err());
    }
}
