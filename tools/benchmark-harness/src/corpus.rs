//! Instances and corpora
//!
//! An [`Instance`] is a document together with the validity the generator
//! recorded for it. A [`Corpus`] is an ordered, immutable list of instances
//! that every adapter in a run reads in the same order.
//!
//! ## JSON Lines Format
//!
//! ```text
//! {"valid":false,"instance":{"event":"Order Completed"}}
//! {"valid":true,"instance":{"event":"Order Completed","userId":"foobar",...}}
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{BufRead, Write};

/// A document whose validity against the suite schema is known in advance
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    text: String,
    value: Value,
    valid: bool,
    parse_error: Option<String>,
}

impl Instance {
    /// Build an instance from a document value; the text form is the compact
    /// serialization of `value`.
    pub fn new(value: Value, valid: bool) -> Self {
        Self {
            text: value.to_string(),
            value,
            valid,
            parse_error: None,
        }
    }

    /// Build an instance from serialized text, keeping the text verbatim
    pub fn from_text(text: impl Into<String>, valid: bool) -> Result<Self> {
        let text = text.into();
        let value = serde_json::from_str(&text)?;
        Ok(Self {
            text,
            value,
            valid,
            parse_error: None,
        })
    }

    /// Build an instance whose text is not required to be JSON.
    ///
    /// When the text does not parse, the parsed form is `Null` and the parse
    /// failure is kept in [`Instance::parse_error`]; every engine must then
    /// report the instance as an infrastructure error.
    pub fn raw(text: impl Into<String>, valid: bool) -> Self {
        let text = text.into();
        let (value, parse_error) = match serde_json::from_str(&text) {
            Ok(value) => (value, None),
            Err(e) => (Value::Null, Some(e.to_string())),
        };
        Self {
            text,
            value,
            valid,
            parse_error,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Ground-truth validity
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Why the text has no parsed form, if it has none
    pub fn parse_error(&self) -> Option<&str> {
        self.parse_error.as_deref()
    }
}

#[derive(Serialize, Deserialize)]
struct CorpusLine {
    valid: bool,
    instance: Value,
}

/// Ordered sequence of instances, indexed by generation order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    instances: Vec<Instance>,
}

impl Corpus {
    pub fn from_instances(instances: Vec<Instance>) -> Self {
        Self { instances }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instance> {
        self.instances.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instance> {
        self.instances.iter()
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Number of instances whose ground truth is `valid`
    pub fn valid_count(&self) -> usize {
        self.instances.iter().filter(|i| i.is_valid()).count()
    }

    /// Total serialized size of all instances in bytes
    pub fn total_bytes(&self) -> usize {
        self.instances.iter().map(|i| i.text.len()).sum()
    }

    /// Write the corpus as JSON Lines
    pub fn write_jsonl<W: Write>(&self, mut writer: W) -> Result<()> {
        for instance in &self.instances {
            let line = CorpusLine {
                valid: instance.valid,
                instance: instance.value.clone(),
            };
            serde_json::to_writer(&mut writer, &line)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read a corpus written by [`Corpus::write_jsonl`]; blank lines are skipped
    pub fn read_jsonl<R: BufRead>(reader: R) -> Result<Self> {
        let mut instances = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let decoded: CorpusLine = serde_json::from_str(&line).map_err(|e| Error::InvalidCorpus {
                line: idx + 1,
                reason: e.to_string(),
            })?;
            instances.push(Instance::new(decoded.instance, decoded.valid));
        }

        Ok(Self { instances })
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Instance;
    type IntoIter = std::slice::Iter<'a, Instance>;

    fn into_iter(self) -> Self::IntoIter {
        self.instances.iter()
    }
}
