//! Library side of the `twinproto` tool.
//!
//! Input is either a bare signal object or an envelope carrying the headers
//! next to it:
//!
//! ```json
//! {"headers": {"version": "1"}, "signal": {"type": "things.commands.retrieveThing", ...}}
//! ```

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};
use twinproto_model::Thing;
use twinproto_signals::{Headers, TypeRegistry};
use twinproto_types::codec::predicates;
use twinproto_types::{FieldSelector, JsonObject, SchemaVersion};

const ENVELOPE_HEADERS: &str = "headers";
const ENVELOPE_SIGNAL: &str = "signal";

/// Settings read from `--config`. Command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CliConfig {
    /// Rendering version when neither the flags nor the headers name one.
    pub default_schema_version: Option<SchemaVersion>,
    pub pretty: bool,
    /// Headers applied beneath the ones the input carries.
    pub default_headers: BTreeMap<String, String>,
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("invalid config {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }
}

/// Options of the `resolve` command.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Extra headers, applied last.
    pub headers: Vec<(String, String)>,
    pub schema_version: Option<SchemaVersion>,
    pub fields: Option<FieldSelector>,
}

/// Parses a `key=value` header argument.
pub fn parse_header(arg: &str) -> Result<(String, String)> {
    let Some((key, value)) = arg.split_once('=') else {
        bail!("header '{arg}' must have the form key=value");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("header '{arg}' has an empty key");
    }
    Ok((key.to_string(), value.to_string()))
}

/// Reads JSON from `path`, or from stdin for `None` and `-`.
pub fn read_input(path: Option<&Path>) -> Result<Value> {
    let raw = match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read stdin")?;
            raw
        }
    };
    serde_json::from_str(&raw).context("input is not valid JSON")
}

/// Splits `input` into the signal object and the headers it carries.
fn split_envelope(input: &Value) -> Result<(&JsonObject, Option<&JsonObject>)> {
    let Some(object) = input.as_object() else {
        bail!("input must be a JSON object");
    };
    match object.get(ENVELOPE_SIGNAL) {
        Some(Value::Object(signal)) if !object.contains_key("type") => {
            let headers = match object.get(ENVELOPE_HEADERS) {
                None => None,
                Some(Value::Object(headers)) => Some(headers),
                Some(_) => bail!("envelope headers must be a JSON object"),
            };
            Ok((signal, headers))
        }
        _ => Ok((object, None)),
    }
}

fn merge_headers(
    config: &CliConfig,
    carried: Option<&JsonObject>,
    extra: &[(String, String)],
) -> Result<Headers> {
    let mut builder = Headers::builder();
    for (key, value) in &config.default_headers {
        builder = builder.set(key, value.clone());
    }
    if let Some(carried) = carried {
        let carried = Headers::from_json(carried).context("invalid envelope headers")?;
        for (key, value) in carried.iter() {
            builder = builder.set(key, value);
        }
    }
    for (key, value) in extra {
        builder = builder.set(key, value.clone());
    }
    builder.build().context("invalid headers")
}

/// Resolves `input` through the global registry and re-renders it.
///
/// The rendering version is, in order: `options.schema_version`, the
/// headers' version, the configured default when the signal's type exists
/// in it, the signal's own default.
pub fn resolve_signal(
    input: &Value,
    options: &ResolveOptions,
    config: &CliConfig,
) -> Result<JsonObject> {
    let (object, carried) = split_envelope(input)?;
    let headers = merge_headers(config, carried, &options.headers)?;
    let signal = TypeRegistry::global().resolve(object, &headers)?;

    let version = options
        .schema_version
        .or_else(|| headers.schema_version())
        .or(config
            .default_schema_version
            .filter(|v| signal.supported_versions().contains(v)))
        .unwrap_or_else(|| signal.implemented_schema_version());
    let rendered = signal.to_json(version, &predicates::regular)?;
    info!(signal_type = signal.signal_type(), %version, "Resolved signal");

    Ok(match &options.fields {
        Some(fields) => fields.project(&rendered),
        None => rendered,
    })
}

/// Parses a thing rendered at `version` and renders the selected fields.
pub fn select_thing(
    input: &Value,
    fields: &FieldSelector,
    version: SchemaVersion,
) -> Result<JsonObject> {
    let Some(object) = input.as_object() else {
        bail!("thing must be a JSON object");
    };
    let thing = Thing::from_json(object, version).context("invalid thing")?;
    Ok(thing.to_json_selected(version, fields))
}

/// Every discriminator the global registry knows, sorted.
#[must_use]
pub fn list_types() -> Vec<&'static str> {
    TypeRegistry::global().discriminators()
}

/// Formats `object` for output.
pub fn render(object: JsonObject, pretty: bool) -> Result<String> {
    let value = Value::Object(object);
    let text = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(text)
}
