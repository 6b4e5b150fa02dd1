//! Template helpers.
//!
//! The serialization helpers never abort a render: `toYaml`/`toJson` fall
//! back to an empty string and `fromYaml`/`fromJson` return a mapping with a
//! single `Error` key. `include` is the exception, its failures propagate.

use chrono::Utc;
use handlebars::{
    handlebars_helper, Context, Handlebars, Helper, HelperDef, HelperResult, Output,
    RenderContext, RenderError, RenderErrorReason, ScopedJson,
};
use serde_json::{Map, Value as JsonValue};

pub const ERROR_KEY: &str = "Error";

/// Register every helper on a registry.
pub fn register_all(registry: &mut Handlebars<'_>) {
    registry.register_helper("toYaml", Box::new(to_yaml));
    registry.register_helper("fromYaml", Box::new(from_yaml));
    registry.register_helper("toJson", Box::new(to_json));
    registry.register_helper("fromJson", Box::new(from_json));
    registry.register_helper("include", Box::new(IncludeHelper));
    registry.register_helper("indentSub", Box::new(indent_sub));
    registry.register_helper("skipLines", Box::new(skip_lines));

    registry.register_helper("indent", Box::new(indent));
    registry.register_helper("nindent", Box::new(nindent));
    registry.register_helper("upper", Box::new(upper));
    registry.register_helper("lower", Box::new(lower));
    registry.register_helper("trim", Box::new(trim));
    registry.register_helper("quote", Box::new(quote));
    registry.register_helper("default", Box::new(default));
    registry.register_helper("replace", Box::new(replace));
    registry.register_helper("join", Box::new(join));
    registry.register_helper("uuidv4", Box::new(uuidv4_helper));
    registry.register_helper("now", Box::new(now_helper));
}

pub fn yaml_string(value: &JsonValue) -> String {
    serde_yaml::to_string(value).unwrap_or_default()
}

pub fn json_string(value: &JsonValue) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Empty and null documents parse to an empty mapping.
pub fn parse_yaml_mapping(text: &str) -> Map<String, JsonValue> {
    if text.trim().is_empty() {
        return Map::new();
    }
    match serde_yaml::from_str::<Option<Map<String, JsonValue>>>(text) {
        Ok(map) => map.unwrap_or_default(),
        Err(e) => error_mapping(e),
    }
}

pub fn parse_json_mapping(text: &str) -> Map<String, JsonValue> {
    serde_json::from_str(text).unwrap_or_else(|e: serde_json::Error| error_mapping(e))
}

fn error_mapping(error: impl std::fmt::Display) -> Map<String, JsonValue> {
    let mut map = Map::new();
    map.insert(ERROR_KEY.to_string(), JsonValue::String(error.to_string()));
    map
}

/// Insert `spaces` blanks after every newline.
pub fn indent_after_newlines(spaces: usize, text: &str) -> String {
    text.replace('\n', &format!("\n{}", " ".repeat(spaces)))
}

/// Drop the first `count` lines.
pub fn drop_lines(count: usize, text: &str) -> String {
    text.split('\n').skip(count).collect::<Vec<_>>().join("\n")
}

/// Indent every line, including the first.
pub fn indent_lines(spaces: usize, text: &str) -> String {
    let pad = " ".repeat(spaces);
    format!("{}{}", pad, text.replace('\n', &format!("\n{}", pad)))
}

fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(items) => !items.is_empty(),
        JsonValue::Object(map) => !map.is_empty(),
    }
}

fn display_plain(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

handlebars_helper!(to_yaml: |value: Json| yaml_string(value));
handlebars_helper!(from_yaml: |text: str| parse_yaml_mapping(text));
handlebars_helper!(to_json: |value: Json| json_string(value));
handlebars_helper!(from_json: |text: str| parse_json_mapping(text));
handlebars_helper!(indent_sub: |spaces: u64, text: str| indent_after_newlines(spaces as usize, text));
handlebars_helper!(skip_lines: |count: u64, text: str| drop_lines(count as usize, text));

handlebars_helper!(indent: |spaces: u64, text: str| indent_lines(spaces as usize, text));
handlebars_helper!(nindent: |spaces: u64, text: str| format!("\n{}", indent_lines(spaces as usize, text)));
handlebars_helper!(upper: |text: str| text.to_uppercase());
handlebars_helper!(lower: |text: str| text.to_lowercase());
handlebars_helper!(trim: |text: str| text.trim().to_string());
handlebars_helper!(quote: |value: Json| json_string(&JsonValue::String(display_plain(value))));
handlebars_helper!(default: |fallback: Json, given: Json| {
    if is_truthy(given) { given.clone() } else { fallback.clone() }
});
handlebars_helper!(replace: |old: str, new: str, text: str| text.replace(old, new));
handlebars_helper!(join: |separator: str, items: array| {
    items.iter().map(display_plain).collect::<Vec<_>>().join(separator)
});

fn uuidv4_helper(
    _: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    out.write(&uuid::Uuid::new_v4().to_string())?;
    Ok(())
}

fn now_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let now = Utc::now();
    let text = match h.param(0).and_then(|v| v.value().as_str()) {
        Some(format) => now.format(format).to_string(),
        None => now.to_rfc3339(),
    };
    out.write(&text)?;
    Ok(())
}

/// `include NAME [DATA...]` renders another registered template.
///
/// No data binds an empty context, one argument binds it directly, and
/// several bind the ordered list of arguments.
pub struct IncludeHelper;

impl HelperDef for IncludeHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let name = h
            .param(0)
            .ok_or(RenderErrorReason::ParamNotFoundForIndex("include", 0))?
            .value()
            .as_str()
            .ok_or_else(|| {
                RenderErrorReason::Other("include expects a template name string".to_string())
            })?;

        let data = include_context(h.params().iter().skip(1).map(|p| p.value().clone()));
        let rendered = r.render(name, &data)?;

        Ok(ScopedJson::Derived(JsonValue::String(rendered)))
    }
}

pub fn include_context(args: impl Iterator<Item = JsonValue>) -> JsonValue {
    let mut args: Vec<JsonValue> = args.collect();
    match args.len() {
        0 => JsonValue::Object(Map::new()),
        1 => args.remove(0),
        _ => JsonValue::Array(args),
    }
}
