// src/stream.rs
use crate::error::StreamError;
use jstream_query::{Engine, EngineConfig, Statement, parse_filter, parse_map};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

/// Owns a single JSON document and applies operations to it in a chain.
///
/// Each step consumes the stream and hands it back, so a failing step ends
/// the chain with the error instead of a half-transformed document.
#[derive(Debug, Clone)]
pub struct JsonStream {
    document: Value,
    engine: Engine,
}

impl JsonStream {
    /// Wraps an already parsed document.
    pub fn of(document: Value) -> Self {
        Self {
            document,
            engine: Engine::default(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, StreamError> {
        Ok(Self::of(serde_json::from_str(json)?))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StreamError> {
        Ok(Self::of(serde_json::from_reader(io::BufReader::new(reader))?))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, StreamError> {
        let path_ref = path.as_ref();
        let file = fs::File::open(path_ref).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("Failed to read document from '{}': {}", path_ref.display(), e),
            )
        })?;
        Self::from_reader(file)
    }

    /// Replaces the evaluation settings used by later steps.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.engine = Engine::new(config);
        self
    }

    /// Keeps the array elements matching `clause`, e.g. `age > 30` or
    /// `filter -> age > 30`.
    pub fn filter(mut self, clause: &str) -> Result<Self, StreamError> {
        let statement = Statement::Filter(parse_filter(clause)?);
        self.engine.apply(&mut self.document, &statement)?;
        Ok(self)
    }

    /// Applies an assignment such as `total = price * qty`, with or without
    /// its `map ->` marker.
    pub fn map(mut self, clause: &str) -> Result<Self, StreamError> {
        let statement = parse_map(clause)?;
        self.engine.apply(&mut self.document, &statement)?;
        Ok(self)
    }

    /// Applies one complete operation, marker included.
    pub fn apply(mut self, operation: &str) -> Result<Self, StreamError> {
        self.engine.apply_text(&mut self.document, operation)?;
        Ok(self)
    }

    pub fn apply_all<I, S>(mut self, operations: I) -> Result<Self, StreamError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.engine.apply_all(&mut self.document, operations)?;
        Ok(self)
    }

    pub fn as_value(&self) -> &Value {
        &self.document
    }

    pub fn into_value(self) -> Value {
        self.document
    }

    pub fn to_json_string(&self) -> Result<String, StreamError> {
        Ok(serde_json::to_string(&self.document)?)
    }

    pub fn to_pretty_string(&self) -> Result<String, StreamError> {
        Ok(serde_json::to_string_pretty(&self.document)?)
    }

    /// Serializes the document into `writer`, followed by a newline.
    pub fn write_to<W: Write>(&self, mut writer: W, pretty: bool) -> Result<(), StreamError> {
        if pretty {
            serde_json::to_writer_pretty(&mut writer, &self.document)?;
        } else {
            serde_json::to_writer(&mut writer, &self.document)?;
        }
        writer.write_all(b"\n")?;
        Ok(())
    }
}

impl From<Value> for JsonStream {
    fn from(document: Value) -> Self {
        Self::of(document)
    }
}

impl fmt::Display for JsonStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.document)
    }
}
