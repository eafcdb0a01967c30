//! Sectioned, comma-delimited text tables
//!
//! Both table formats share the same outer grammar:
//!
//! ```text
//! # comment
//! objs
//! 1000, wall01, generic, 100, 0
//! end
//! ```
//!
//! A line outside a section consisting of a single token opens a section;
//! `end` closes it. Fields are split on `,` and trimmed, and empty fields are
//! dropped. Line numbers are 1-based and refer to the original text.

use log::trace;
use std::fmt::Write as _;
use std::str::FromStr;

use crate::chunk::{decode_latin1, encode_latin1};
use crate::error::{FormatError, Result};

/// One data line inside a section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based line number
    pub line: usize,
    pub fields: Vec<String>,
}

impl Record {
    /// Fail with [`FormatError::ArityMismatch`] unless the field count is one of `allowed`
    pub fn expect_arity(&self, allowed: &[usize]) -> Result<()> {
        if allowed.contains(&self.fields.len()) {
            Ok(())
        } else {
            Err(FormatError::ArityMismatch {
                line: self.line,
                expected: allowed.to_vec(),
                found: self.fields.len(),
            })
        }
    }

    /// Parse field `index` (0-based); failures report the 1-based field number
    pub fn parse<T: FromStr>(&self, index: usize) -> Result<T> {
        let value = self.field(index)?;
        value.parse().map_err(|_| FormatError::MalformedField {
            line: self.line,
            field: index + 1,
            value: value.to_string(),
        })
    }

    /// Field `index` as text
    pub fn text(&self, index: usize) -> Result<String> {
        self.field(index).map(str::to_string)
    }

    fn field(&self, index: usize) -> Result<&str> {
        self.fields
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| FormatError::ArityMismatch {
                line: self.line,
                expected: vec![index + 1],
                found: self.fields.len(),
            })
    }
}

/// A named block of records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection {
    /// Section name as written
    pub name: String,
    /// Line of the section header
    pub line: usize,
    pub records: Vec<Record>,
}

/// Split a line into trimmed, non-empty fields, ignoring anything after `#`
pub fn tokenize(line: &str) -> Vec<String> {
    let content = match line.find('#') {
        Some(comment) => &line[..comment],
        None => line,
    };
    content
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read all sections of a Latin-1 encoded table
pub fn read_sections(bytes: &[u8]) -> Result<Vec<RawSection>> {
    parse_sections(&decode_latin1(bytes))
}

/// Read all sections of a table.
///
/// A file that ends inside a section is accepted as if `end` followed.
pub fn parse_sections(text: &str) -> Result<Vec<RawSection>> {
    let mut sections = Vec::new();
    let mut current: Option<RawSection> = None;

    for (index, line) in text.lines().enumerate() {
        let number = index + 1;
        let fields = tokenize(line);
        if fields.is_empty() {
            continue;
        }

        match current.as_mut() {
            Some(section) => {
                if fields.len() == 1 && fields[0].eq_ignore_ascii_case("end") {
                    trace!(
                        "section {} closed at line {number} with {} records",
                        section.name,
                        section.records.len()
                    );
                    sections.extend(current.take());
                } else {
                    section.records.push(Record {
                        line: number,
                        fields,
                    });
                }
            }
            None => {
                if fields.len() != 1 {
                    return Err(FormatError::ArityMismatch {
                        line: number,
                        expected: vec![1],
                        found: fields.len(),
                    });
                }
                let name = fields.into_iter().next().unwrap_or_default();
                current = Some(RawSection {
                    name,
                    line: number,
                    records: Vec::new(),
                });
            }
        }
    }

    sections.extend(current);
    Ok(sections)
}

/// Builds table text
#[derive(Debug, Default)]
pub struct TableWriter {
    out: String,
}

impl TableWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a complete section: header, one line per row, `end`
    pub fn section<I>(&mut self, name: &str, rows: I)
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        self.out.push_str(name);
        self.out.push('\n');
        for row in rows {
            self.out.push_str(&row.join(", "));
            self.out.push('\n');
        }
        self.out.push_str("end\n");
    }

    pub fn into_string(self) -> String {
        self.out
    }

    pub fn into_bytes(self) -> Vec<u8> {
        encode_latin1(&self.out)
    }
}

/// Fail with [`FormatError::InvalidModel`] unless `field` reads back as the
/// same single token: non-empty, trimmed, Latin-1, free of `,`, `#` and line
/// breaks
pub fn check_field(field: &str) -> Result<()> {
    let storable = !field.is_empty()
        && field.trim() == field
        && field
            .chars()
            .all(|c| u32::from(c) <= 0xFF && !matches!(c, ',' | '#' | '\n' | '\r'));
    if storable {
        Ok(())
    } else {
        Err(FormatError::InvalidModel(format!(
            "field {field:?} can not be stored in a table"
        )))
    }
}

/// Coordinate, rotation and scale formatting: six decimals
pub fn fixed(value: f32) -> String {
    let mut out = String::new();
    let _ = write!(out, "{value:.6}");
    out
}

/// Shortest text that parses back to the same value
pub fn shortest(value: f32) -> String {
    value.to_string()
}
