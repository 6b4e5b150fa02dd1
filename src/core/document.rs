//! The pipeline document model and its YAML parser.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};

use super::errors::ParseError;
use super::value::{record_name, NAME_KEY};

/// A pipeline document: the five recognized sections plus the template set
/// that travels with it through merges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub merge: Vec<MergeDirective>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub groups: Vec<Group>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub resources: Vec<NamedRecord>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub resource_types: Vec<NamedRecord>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub jobs: Vec<Value>,

    /// Auxiliary template paths available to `include` and directive lookup.
    /// Never serialized.
    #[serde(skip)]
    pub templates: Vec<PathBuf>,
}

/// `{template, args}`: one pending template expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeDirective {
    pub template: String,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Mapping::is_empty"
    )]
    pub args: Mapping,
}

impl MergeDirective {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            args: Mapping::new(),
        }
    }

    pub fn with_arg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.args.insert(Value::from(key), value.into());
        self
    }
}

/// A display group. Fields other than `name` and `jobs` are carried through
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub jobs: Vec<String>,

    #[serde(flatten)]
    pub extra: Mapping,
}

impl Group {
    pub fn new(name: impl Into<String>, jobs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            jobs: jobs.into_iter().map(Into::into).collect(),
            extra: Mapping::new(),
        }
    }
}

/// An opaque mapping guaranteed to carry a string `name` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Mapping", into = "Mapping")]
pub struct NamedRecord(Mapping);

impl NamedRecord {
    pub fn name(&self) -> &str {
        record_name(&self.0).unwrap_or_default()
    }

    pub fn fields(&self) -> &Mapping {
        &self.0
    }
}

impl TryFrom<Mapping> for NamedRecord {
    type Error = String;

    fn try_from(mapping: Mapping) -> Result<Self, Self::Error> {
        match mapping.get(NAME_KEY) {
            Some(Value::String(_)) => Ok(Self(mapping)),
            Some(other) => Err(format!(
                "record `{}` must be a string, found {}",
                NAME_KEY,
                describe(other)
            )),
            None => Err(format!("record is missing required `{}` field", NAME_KEY)),
        }
    }
}

impl TryFrom<Value> for NamedRecord {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Mapping(mapping) => Self::try_from(mapping),
            other => Err(format!("expected a mapping, found {}", describe(&other))),
        }
    }
}

impl From<NamedRecord> for Mapping {
    fn from(record: NamedRecord) -> Self {
        record.0
    }
}

impl Document {
    /// Parse rendered template output.
    ///
    /// Empty text, and a mapping with none of the recognized keys, both
    /// yield an empty document: a fragment whose content is entirely
    /// conditional legitimately renders to nothing.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        if is_blank(text) {
            return Ok(Self::default());
        }

        let mut value: Value =
            serde_yaml::from_str(text).map_err(|e| ParseError::from_yaml(e, text))?;
        value
            .apply_merge()
            .map_err(|e| ParseError::from_yaml(e, text))?;

        match value {
            Value::Null => Ok(Self::default()),
            value @ Value::Mapping(_) => {
                serde_yaml::from_value(value).map_err(|e| ParseError::from_yaml(e, text))
            }
            other => Err(ParseError::new(
                format!(
                    "pipeline document must be a mapping at the top level, found {}",
                    describe(&other)
                ),
                text,
            )),
        }
    }

    pub fn with_templates(mut self, templates: Vec<PathBuf>) -> Self {
        self.templates = templates;
        self
    }

    /// Serialize the recognized sections, omitting empty ones.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// True once no merge directives remain.
    pub fn is_expanded(&self) -> bool {
        self.merge.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.merge.is_empty()
            && self.groups.is_empty()
            && self.resources.is_empty()
            && self.resource_types.is_empty()
            && self.jobs.is_empty()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_blank(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
