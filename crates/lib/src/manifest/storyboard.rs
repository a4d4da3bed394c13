//! Storyboard configuration loading.
//!
//! Storyboards come from YAML that may be less trusted than the rest of the
//! build inputs, so only the JSON-compatible subset of YAML is accepted:
//! null, booleans, numbers, strings, sequences and mappings with scalar keys.
//! Custom tags are rejected rather than interpreted.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::{self, Deserializer, EnumAccess, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

/// Errors loading the storyboard configuration file.
#[derive(Debug, Error)]
pub enum StoryboardError {
  #[error("failed to read storyboards {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("invalid YAML in storyboards {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_yaml::Error },

  #[error("storyboards {} must be a sequence at the top level, found {found}", path.display())]
  NotASequence { path: PathBuf, found: &'static str },

  #[error("storyboard #{index} in {} must be a mapping, found {found}", path.display())]
  NotAMapping {
    path: PathBuf,
    index: usize,
    found: &'static str,
  },

  #[error("storyboard #{index} in {}: `app` must be a mapping, found {found}", path.display())]
  InvalidApp {
    path: PathBuf,
    index: usize,
    found: &'static str,
  },
}

/// One application's storyboard.
///
/// Fields other than `app` are carried through without interpretation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Storyboard(pub Map<String, Value>);

impl Storyboard {
  /// The application-level flags, if the storyboard declares any.
  ///
  /// A null `app` counts as absent.
  pub fn app(&self) -> Option<&Map<String, Value>> {
    self.0.get("app").and_then(Value::as_object)
  }

  pub fn fields(&self) -> &Map<String, Value> {
    &self.0
  }

  pub fn into_inner(self) -> Map<String, Value> {
    self.0
  }
}

/// Load and validate the storyboard sequence from a YAML file.
pub async fn read_storyboards(path: &Path) -> Result<Vec<Storyboard>, StoryboardError> {
  let content = fs::read_to_string(path)
    .await
    .map_err(|source| StoryboardError::Read {
      path: path.to_path_buf(),
      source,
    })?;

  let storyboards = parse_storyboards(&content, path)?;
  debug!(path = %path.display(), count = storyboards.len(), "loaded storyboards");
  Ok(storyboards)
}

/// Parse storyboard YAML. `path` is only used for error reporting.
pub fn parse_storyboards(content: &str, path: &Path) -> Result<Vec<Storyboard>, StoryboardError> {
  let JsonDocument(document) = serde_yaml::from_str(content).map_err(|source| StoryboardError::Parse {
    path: path.to_path_buf(),
    source,
  })?;

  let items = match document {
    Value::Array(items) => items,
    other => {
      return Err(StoryboardError::NotASequence {
        path: path.to_path_buf(),
        found: kind_of(&other),
      });
    }
  };

  items
    .into_iter()
    .enumerate()
    .map(|(index, item)| {
      let fields = match item {
        Value::Object(fields) => fields,
        other => {
          return Err(StoryboardError::NotAMapping {
            path: path.to_path_buf(),
            index,
            found: kind_of(&other),
          });
        }
      };

      match fields.get("app") {
        None | Some(Value::Null) | Some(Value::Object(_)) => Ok(Storyboard(fields)),
        Some(other) => Err(StoryboardError::InvalidApp {
          path: path.to_path_buf(),
          index,
          found: kind_of(other),
        }),
      }
    })
    .collect()
}

/// A YAML document read as the JSON value it denotes.
///
/// Duplicate mapping keys keep their first position and take the last value.
/// Non-finite numbers become null, as `JSON.stringify` writes them.
struct JsonDocument(Value);

impl<'de> Deserialize<'de> for JsonDocument {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    deserializer.deserialize_any(JsonVisitor).map(JsonDocument)
  }
}

struct JsonVisitor;

impl<'de> Visitor<'de> for JsonVisitor {
  type Value = Value;

  fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str("a JSON-compatible YAML value")
  }

  fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
    Ok(Value::Null)
  }

  fn visit_none<E: de::Error>(self) -> Result<Value, E> {
    Ok(Value::Null)
  }

  fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
    deserializer.deserialize_any(self)
  }

  fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
    Ok(Value::Bool(v))
  }

  fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
    Ok(Value::Number(v.into()))
  }

  fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
    Ok(Value::Number(v.into()))
  }

  fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
    Ok(Number::from_f64(v).map_or(Value::Null, Value::Number))
  }

  fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
    Ok(Value::String(v.to_string()))
  }

  fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
    Ok(Value::String(v))
  }

  fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
    let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
    while let Some(JsonDocument(item)) = seq.next_element()? {
      items.push(item);
    }
    Ok(Value::Array(items))
  }

  fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
    let mut object = Map::new();
    while let Some(MappingKey(key)) = map.next_key()? {
      let JsonDocument(item) = map.next_value()?;
      object.insert(key, item);
    }
    Ok(Value::Object(object))
  }

  // Tagged nodes reach the visitor as enums.
  fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Value, A::Error> {
    let (tag, _): (String, _) = data.variant()?;
    Err(de::Error::custom(format!("custom tag !{tag} is not allowed")))
  }
}

/// A mapping key. Scalars become strings, the way a JSON-schema YAML loader
/// reads them; collection and tagged keys are refused.
struct MappingKey(String);

impl<'de> Deserialize<'de> for MappingKey {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    deserializer.deserialize_any(MappingKeyVisitor).map(MappingKey)
  }
}

struct MappingKeyVisitor;

impl<'de> Visitor<'de> for MappingKeyVisitor {
  type Value = String;

  fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str("a scalar mapping key")
  }

  fn visit_unit<E: de::Error>(self) -> Result<String, E> {
    Ok("null".to_string())
  }

  fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
    Ok(v.to_string())
  }

  fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
    Ok(v.to_string())
  }

  fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
    Ok(v.to_string())
  }

  fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
    Ok(v.to_string())
  }

  fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
    Ok(v.to_string())
  }

  fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
    Ok(v)
  }
}

fn kind_of(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "sequence",
    Value::Object(_) => "mapping",
  }
}
