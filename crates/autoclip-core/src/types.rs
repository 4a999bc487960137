//! Core domain types for the narration step.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Identifier of a clip, unique within one input list.
pub type ClipId = String;

/// Batch key used when a clip carries no `chunk_index`.
pub const DEFAULT_CHUNK_INDEX: i64 = 0;

/// Keys every narration script must carry.
pub const REQUIRED_SCRIPT_FIELDS: [&str; 7] = [
    "opening",
    "main_content",
    "closing",
    "total_duration",
    "key_points",
    "emotion_tone",
    "target_audience",
];

/// Key the narration script is stored under.
pub const SCRIPT_KEY: &str = "script";

/// Clip keys read as plain text.
const TEXT_FIELDS: [&str; 5] = [
    "outline",
    "generated_title",
    "recommend_reason",
    "start_time",
    "end_time",
];

/// A titled video clip produced by the earlier pipeline steps.
///
/// The record is kept exactly as read, keys in input order and explicit
/// nulls included. Serializing writes it back with `script` set in place, or
/// appended last when the input had none.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub id: ClipId,
    record: Map<String, Value>,
    pub script: Option<ClipScript>,
}

impl Clip {
    pub fn new(id: impl Into<ClipId>) -> Self {
        let id = id.into();
        let mut record = Map::new();
        record.insert("id".to_string(), Value::String(id.clone()));
        Self {
            id,
            record,
            script: None,
        }
    }

    /// Build a clip from one input record, checking the keys this step reads.
    pub fn from_record(record: Map<String, Value>) -> Result<Self> {
        let id = match record.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            Some(other) => {
                return Err(Error::InvalidInput(format!(
                    "clip id must be a string or number, found {}",
                    json_kind(other)
                )))
            }
            None => return Err(Error::InvalidInput("clip has no id".to_string())),
        };

        let invalid = |key: &str, expected: &str, found: &Value| {
            Error::InvalidInput(format!(
                "clip {}: `{}` must be {}, found {}",
                id,
                key,
                expected,
                json_kind(found)
            ))
        };

        for key in TEXT_FIELDS {
            match record.get(key) {
                None | Some(Value::Null) | Some(Value::String(_)) => {}
                Some(other) => return Err(invalid(key, "a string", other)),
            }
        }

        match record.get("content") {
            None | Some(Value::Null) => {}
            Some(Value::Array(lines)) if lines.iter().all(Value::is_string) => {}
            Some(other) => return Err(invalid("content", "an array of strings", other)),
        }

        match record.get("chunk_index") {
            None | Some(Value::Null) => {}
            Some(value) if chunk_index_value(value).is_some() => {}
            Some(other) => return Err(invalid("chunk_index", "an integer", other)),
        }

        Ok(Self {
            id,
            record,
            script: None,
        })
    }

    /// Set a record key. An existing key keeps its position.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.record.insert(key.into(), value);
        self
    }

    pub fn with_outline(self, outline: impl Into<String>) -> Self {
        self.with_field("outline", Value::String(outline.into()))
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.with_field("generated_title", Value::String(title.into()))
    }

    pub fn with_content<I, S>(self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines.into_iter().map(|line| Value::String(line.into()));
        self.with_field("content", Value::Array(lines.collect()))
    }

    pub fn with_reason(self, reason: impl Into<String>) -> Self {
        self.with_field("recommend_reason", Value::String(reason.into()))
    }

    pub fn with_times(self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.with_field("start_time", Value::String(start.into()))
            .with_field("end_time", Value::String(end.into()))
    }

    pub fn with_chunk_index(self, chunk_index: i64) -> Self {
        self.with_field("chunk_index", Value::from(chunk_index))
    }

    /// Raw value of a record key.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.record.get(key)
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.record.get(key).and_then(Value::as_str)
    }

    pub fn outline(&self) -> Option<&str> {
        self.text("outline")
    }

    pub fn generated_title(&self) -> Option<&str> {
        self.text("generated_title")
    }

    pub fn recommend_reason(&self) -> Option<&str> {
        self.text("recommend_reason")
    }

    pub fn start_time(&self) -> Option<&str> {
        self.text("start_time")
    }

    pub fn end_time(&self) -> Option<&str> {
        self.text("end_time")
    }

    pub fn chunk_index(&self) -> Option<i64> {
        self.record.get("chunk_index").and_then(chunk_index_value)
    }

    /// Title used for narration: the generated title, else the outline, else empty.
    pub fn effective_title(&self) -> &str {
        self.generated_title().or(self.outline()).unwrap_or("")
    }

    /// Batch this clip belongs to.
    pub fn batch_key(&self) -> i64 {
        self.chunk_index().unwrap_or(DEFAULT_CHUNK_INDEX)
    }

    /// Transcript lines, empty when the clip has none.
    pub fn content_lines(&self) -> Vec<&str> {
        self.record
            .get("content")
            .and_then(Value::as_array)
            .map(|lines| lines.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Build the object sent to the generation service for this clip.
    pub fn to_payload(&self) -> ScriptPayload {
        let owned = |text: Option<&str>| text.map(str::to_string);
        ScriptPayload {
            id: self.id.clone(),
            title: owned(self.generated_title().or(self.outline())),
            content: self
                .record
                .get("content")
                .filter(|content| !content.is_null())
                .map(|_| self.content_lines().into_iter().map(str::to_string).collect()),
            recommend_reason: owned(self.recommend_reason()),
            start_time: owned(self.start_time()),
            end_time: owned(self.end_time()),
            outline: owned(self.outline()),
        }
    }
}

impl Serialize for Clip {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let Some(script) = &self.script else {
            return self.record.serialize(serializer);
        };

        let has_script_key = self.record.contains_key(SCRIPT_KEY);
        let len = self.record.len() + usize::from(!has_script_key);
        let mut map = serializer.serialize_map(Some(len))?;
        for (key, value) in &self.record {
            if key == SCRIPT_KEY {
                map.serialize_entry(key, script)?;
            } else {
                map.serialize_entry(key, value)?;
            }
        }
        if !has_script_key {
            map.serialize_entry(SCRIPT_KEY, script)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Clip {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let record = Map::deserialize(deserializer)?;
        Clip::from_record(record).map_err(serde::de::Error::custom)
    }
}

/// Chunk index as an integer. Integral floats such as `1.0` are accepted.
fn chunk_index_value(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|index| index.fract() == 0.0 && index.abs() < i64::MAX as f64)
            .map(|index| index as i64)
    })
}

/// Parse a JSON array of clips.
pub fn clips_from_json(json: &str) -> Result<Vec<Clip>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(records) = value else {
        return Err(Error::InvalidInput(format!(
            "expected a JSON array of clips, found {}",
            json_kind(&value)
        )));
    };

    records
        .into_iter()
        .enumerate()
        .map(|(position, record)| match record {
            Value::Object(record) => Clip::from_record(record),
            other => Err(Error::InvalidInput(format!(
                "clip at position {} is a {}, expected an object",
                position,
                json_kind(&other)
            ))),
        })
        .collect()
}

/// Per-clip object in a generation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptPayload {
    pub id: ClipId,
    pub title: Option<String>,
    pub content: Option<Vec<String>>,
    pub recommend_reason: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub outline: Option<String>,
}

/// A fully populated narration script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub opening: String,
    pub main_content: String,
    pub closing: String,
    pub total_duration: i64,
    pub key_points: Vec<String>,
    pub emotion_tone: String,
    pub target_audience: String,
}

/// Script attached to a clip.
///
/// Template output is typed; model output that passed validation is kept as
/// the exact object the model returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClipScript {
    Structured(Script),
    Verbatim(Map<String, Value>),
}

impl ClipScript {
    /// Emotion tone label, if it is a string.
    pub fn emotion_tone(&self) -> Option<&str> {
        match self {
            ClipScript::Structured(script) => Some(&script.emotion_tone),
            ClipScript::Verbatim(map) => map.get("emotion_tone").and_then(Value::as_str),
        }
    }

    /// Script as a JSON object.
    pub fn to_map(&self) -> Map<String, Value> {
        match self {
            ClipScript::Structured(script) => match serde_json::to_value(script) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            },
            ClipScript::Verbatim(map) => map.clone(),
        }
    }

    /// True when all required fields are present and non-null.
    pub fn is_complete(&self) -> bool {
        missing_script_fields(&self.to_map()).is_empty()
    }
}

impl From<Script> for ClipScript {
    fn from(script: Script) -> Self {
        ClipScript::Structured(script)
    }
}

/// Required script fields that are absent or `null` in `map`.
pub fn missing_script_fields(map: &Map<String, Value>) -> Vec<&'static str> {
    REQUIRED_SCRIPT_FIELDS
        .iter()
        .copied()
        .filter(|field| map.get(*field).map_or(true, Value::is_null))
        .collect()
}

/// Short name of a JSON value's type, for log and error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
