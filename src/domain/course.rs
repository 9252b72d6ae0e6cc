//! Course domain model
//!
//! A course is identified by its code and carries a prerequisite
//! rule: either an explicit list of codes or the "requires all"
//! sentinel used by the capstone.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Keyword used in catalog files for the requires-all variant
pub const REQUIRES_ALL_KEYWORD: &str = "all";

#[derive(Debug, Error, PartialEq)]
pub enum CodeError {
    #[error("Course code cannot be empty")]
    Empty,

    #[error("Invalid course code '{0}': codes cannot contain whitespace")]
    Whitespace(String),
}

/// Unique course code (e.g. `TTS101`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseCode(String);

impl CourseCode {
    /// Returns the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl FromStr for CourseCode {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CodeError::Empty);
        }
        if s.chars().any(char::is_whitespace) {
            return Err(CodeError::Whitespace(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for CourseCode {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&str> for CourseCode {
    type Error = CodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CourseCode> for String {
    fn from(code: CourseCode) -> Self {
        code.0
    }
}

impl Borrow<str> for CourseCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CourseCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Prerequisite rule of a course
///
/// Serialized forms accepted in catalog files:
/// - omitted or `[]` - no prerequisites
/// - `["TTS101", "MES101"]` - explicit codes, order preserved
/// - `"all"` - every other course in the catalog
/// - `["ALL"]` - legacy spelling of `"all"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prerequisites {
    Explicit(Vec<CourseCode>),
    RequiresAll,
}

impl Default for Prerequisites {
    fn default() -> Self {
        Prerequisites::Explicit(Vec::new())
    }
}

impl Prerequisites {
    /// Creates an explicit prerequisite list
    pub fn explicit<I, C>(codes: I) -> Result<Self, CodeError>
    where
        I: IntoIterator<Item = C>,
        C: AsRef<str>,
    {
        let codes = codes
            .into_iter()
            .map(|c| c.as_ref().parse())
            .collect::<Result<Vec<CourseCode>, _>>()?;
        Ok(Prerequisites::Explicit(codes))
    }

    /// Returns true for the capstone variant
    pub fn is_requires_all(&self) -> bool {
        matches!(self, Prerequisites::RequiresAll)
    }

    /// Returns the explicit codes (empty for `RequiresAll`)
    pub fn explicit_codes(&self) -> &[CourseCode] {
        match self {
            Prerequisites::Explicit(codes) => codes,
            Prerequisites::RequiresAll => &[],
        }
    }

    /// Returns true if there is nothing to satisfy
    pub fn is_empty(&self) -> bool {
        match self {
            Prerequisites::Explicit(codes) => codes.is_empty(),
            Prerequisites::RequiresAll => false,
        }
    }
}

impl Serialize for Prerequisites {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Prerequisites::Explicit(codes) => codes.serialize(serializer),
            Prerequisites::RequiresAll => serializer.serialize_str(REQUIRES_ALL_KEYWORD),
        }
    }
}

impl<'de> Deserialize<'de> for Prerequisites {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{SeqAccess, Visitor};

        struct PrerequisitesVisitor;

        impl<'de> Visitor<'de> for PrerequisitesVisitor {
            type Value = Prerequisites;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a list of course codes or the string \"all\"")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if value.trim().eq_ignore_ascii_case(REQUIRES_ALL_KEYWORD) {
                    Ok(Prerequisites::RequiresAll)
                } else {
                    Err(E::custom(format!(
                        "expected \"{}\" or a list of course codes, got \"{}\"",
                        REQUIRES_ALL_KEYWORD, value
                    )))
                }
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut raw = Vec::new();
                while let Some(value) = seq.next_element::<String>()? {
                    raw.push(value);
                }

                // Legacy catalogs spell the capstone rule as ["ALL"]
                if raw.len() == 1 && raw[0].trim().eq_ignore_ascii_case(REQUIRES_ALL_KEYWORD) {
                    return Ok(Prerequisites::RequiresAll);
                }

                Prerequisites::explicit(&raw).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_any(PrerequisitesVisitor)
    }
}

/// A course in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique code
    pub code: CourseCode,

    /// Display name
    pub name: String,

    /// Semester ordinal (informational, used for grouping only)
    pub semester: u32,

    /// Prerequisite rule
    #[serde(rename = "requires", default)]
    pub prerequisites: Prerequisites,
}

impl Course {
    /// Creates a course with no prerequisites
    pub fn new(code: CourseCode, name: impl Into<String>, semester: u32) -> Self {
        Self {
            code,
            name: name.into(),
            semester,
            prerequisites: Prerequisites::default(),
        }
    }

    /// Sets the prerequisite rule
    pub fn with_prerequisites(mut self, prerequisites: Prerequisites) -> Self {
        self.prerequisites = prerequisites;
        self
    }

    /// Returns true if this course requires every other course
    pub fn is_capstone(&self) -> bool {
        self.prerequisites.is_requires_all()
    }
}
