//! Relationship triples and the `(Subject)-[RELATION]->(Object)` notation

use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A (subject, relation, object) fact in the entity graph.
///
/// Serialized as a three-element array, e.g. `["GraphRAG","USES","Graph Database"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "(String, String, String)", try_from = "(String, String, String)")]
pub struct Triple {
    subject: String,
    relation: String,
    object: String,
}

impl Triple {
    /// Create a triple, trimming each part.
    ///
    /// Subject, relation and object must be non-empty after trimming.
    pub fn new(
        subject: impl Into<String>,
        relation: impl Into<String>,
        object: impl Into<String>,
    ) -> Result<Self> {
        let subject = subject.into().trim().to_string();
        let relation = relation.into().trim().to_string();
        let object = object.into().trim().to_string();

        if subject.is_empty() {
            return Err(CoreError::InvalidTriple("subject is empty".into()));
        }
        if relation.is_empty() {
            return Err(CoreError::InvalidTriple("relation is empty".into()));
        }
        if object.is_empty() {
            return Err(CoreError::InvalidTriple("object is empty".into()));
        }

        Ok(Self {
            subject,
            relation,
            object,
        })
    }

    /// Build a triple from literals known to be non-empty
    pub(crate) fn fixed(subject: &str, relation: &str, object: &str) -> Self {
        debug_assert!(!subject.is_empty() && !relation.is_empty() && !object.is_empty());
        Self {
            subject: subject.to_string(),
            relation: relation.to_string(),
            object: object.to_string(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }

    pub fn object(&self) -> &str {
        &self.object
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})-[{}]->({})", self.subject, self.relation, self.object)
    }
}

impl From<Triple> for (String, String, String) {
    fn from(triple: Triple) -> Self {
        (triple.subject, triple.relation, triple.object)
    }
}

impl TryFrom<(String, String, String)> for Triple {
    type Error = CoreError;

    fn try_from((subject, relation, object): (String, String, String)) -> Result<Self> {
        Triple::new(subject, relation, object)
    }
}

/// A line of model output that did not match the triple notation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the parsed text
    pub line_number: usize,
    pub line: String,
    pub reason: String,
}

/// Outcome of parsing a block of triple notation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripleParse {
    pub triples: Vec<Triple>,
    pub skipped: Vec<SkippedLine>,
}

/// Parse one line of `(Subject)-[RELATION]->(Object)` notation.
///
/// Whitespace is allowed around each token and a leading list marker
/// (`-`, `*`, `1.`, `1)`) is ignored. Subject and object may not contain
/// parentheses, the relation may not contain brackets.
pub fn parse_line(line: &str) -> Result<Triple> {
    let body = strip_list_marker(line.trim());

    let rest = expect(body, "(", "subject")?;
    let (subject, rest) = take_until(rest, ')', '(', "subject")?;

    let rest = expect(rest, "-", "relation")?;
    let rest = expect(rest, "[", "relation")?;
    let (relation, rest) = take_until(rest, ']', '[', "relation")?;

    let rest = expect(rest, "->", "object")?;
    let rest = expect(rest, "(", "object")?;
    let (object, rest) = take_until(rest, ')', '(', "object")?;

    if !rest.trim().is_empty() {
        return Err(CoreError::InvalidTriple(format!(
            "unexpected trailing text '{}'",
            rest.trim()
        )));
    }

    Triple::new(subject, relation, object)
}

/// Parse every non-blank line of `text`, collecting the lines that fail.
pub fn parse_triples(text: &str) -> TripleParse {
    let mut parse = TripleParse::default();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(triple) => parse.triples.push(triple),
            Err(e) => parse.skipped.push(SkippedLine {
                line_number: index + 1,
                line: line.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    parse
}

fn strip_list_marker(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return rest.trim_start();
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return rest.trim_start();
        }
    }

    line
}

fn expect<'a>(input: &'a str, token: &str, part: &str) -> Result<&'a str> {
    input
        .trim_start()
        .strip_prefix(token)
        .ok_or_else(|| CoreError::InvalidTriple(format!("expected '{}' before {}", token, part)))
}

fn take_until<'a>(
    input: &'a str,
    close: char,
    forbidden: char,
    part: &str,
) -> Result<(&'a str, &'a str)> {
    let (value, rest) = input
        .split_once(close)
        .ok_or_else(|| CoreError::InvalidTriple(format!("unterminated {}", part)))?;

    if value.contains(forbidden) {
        return Err(CoreError::InvalidTriple(format!(
            "{} contains '{}'",
            part, forbidden
        )));
    }

    Ok((value, rest))
}
