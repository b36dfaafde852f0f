// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Encoding and decoding of class member labels.
//!
//! Attributes are stored as `"+ name: Type"` and methods as `"- op(p: T, q: U): R"` in the
//! element's `name`. Decoding is lenient: hand-typed labels with odd spacing or missing parts
//! decode to best-effort fields (possibly empty) instead of failing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ATTRIBUTE_TYPE: &str = "String";
pub const DEFAULT_RETURN_TYPE: &str = "void";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Protected,
}

impl Visibility {
    pub fn symbol(self) -> char {
        match self {
            Self::Public => '+',
            Self::Private => '-',
            Self::Protected => '#',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Self::Public),
            '-' => Some(Self::Private),
            '#' => Some(Self::Protected),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Protected => "protected",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVisibilityError {
    value: String,
}

impl fmt::Display for ParseVisibilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown visibility `{}`", self.value)
    }
}

impl std::error::Error for ParseVisibilityError {}

/// Accepts both the word form (`public`) and the symbol form (`+`).
impl FromStr for Visibility {
    type Err = ParseVisibilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(symbol), None) = (chars.next(), chars.next()) {
            if let Some(visibility) = Self::from_symbol(symbol) {
                return Ok(visibility);
            }
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            "protected" => Ok(Self::Protected),
            _ => Err(ParseVisibilityError {
                value: s.to_owned(),
            }),
        }
    }
}

impl TryFrom<String> for Visibility {
    type Error = ParseVisibilityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Visibility> for String {
    fn from(visibility: Visibility) -> Self {
        visibility.as_str().to_owned()
    }
}

/// Result of decoding an attribute label. Missing parts are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeLabel {
    pub visibility: Option<Visibility>,
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    fn encode(&self) -> String {
        if self.type_name.is_empty() {
            self.name.clone()
        } else {
            format!("{}: {}", self.name, self.type_name)
        }
    }

    fn decode(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((name, type_name)) => Self::new(name.trim(), type_name.trim()),
            None => Self::new(raw.trim(), ""),
        }
    }
}

/// Result of decoding a method label. Missing parts are empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MethodLabel {
    pub visibility: Option<Visibility>,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: String,
}

pub fn encode_attribute(visibility: Visibility, name: &str, type_name: &str) -> String {
    format!("{} {}: {}", visibility.symbol(), name, type_name)
}

pub fn decode_attribute(label: &str) -> AttributeLabel {
    let (visibility, rest) = split_visibility(label);
    match rest.split_once(':') {
        Some((name, type_name)) => AttributeLabel {
            visibility,
            name: name.trim().to_owned(),
            type_name: type_name.trim().to_owned(),
        },
        None => AttributeLabel {
            visibility,
            name: rest.trim().to_owned(),
            type_name: String::new(),
        },
    }
}

/// Encodes `"<symbol> <name>(<params>): <return>"`. An empty return type is omitted.
pub fn encode_method(
    visibility: Visibility,
    name: &str,
    parameters: &[Parameter],
    return_type: &str,
) -> String {
    let params = parameters
        .iter()
        .map(Parameter::encode)
        .collect::<Vec<_>>()
        .join(", ");
    if return_type.is_empty() {
        format!("{} {}({})", visibility.symbol(), name, params)
    } else {
        format!("{} {}({}): {}", visibility.symbol(), name, params, return_type)
    }
}

pub fn decode_method(label: &str) -> MethodLabel {
    let (visibility, rest) = split_visibility(label);

    let Some(open) = rest.find('(') else {
        // No parameter list: `name: Return` or just `name`.
        let (name, return_type) = match rest.rsplit_once(':') {
            Some((name, return_type)) => (name.trim(), return_type.trim()),
            None => (rest.trim(), ""),
        };
        return MethodLabel {
            visibility,
            name: name.to_owned(),
            parameters: Vec::new(),
            return_type: return_type.to_owned(),
        };
    };

    let name = rest[..open].trim().to_owned();
    let after_open = &rest[open + 1..];
    let (params_raw, tail) = match after_open.rfind(')') {
        Some(close) => (&after_open[..close], &after_open[close + 1..]),
        None => (after_open, ""),
    };

    let parameters = params_raw
        .split(',')
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(Parameter::decode)
        .collect();

    let return_type = tail.trim().trim_start_matches(':').trim().to_owned();

    MethodLabel {
        visibility,
        name,
        parameters,
        return_type,
    }
}

/// The member name of an attribute label, for case-insensitive comparisons.
pub fn attribute_member_name(label: &str) -> String {
    decode_attribute(label).name
}

/// The member name of a method label, for case-insensitive comparisons.
pub fn method_member_name(label: &str) -> String {
    decode_method(label).name
}

fn split_visibility(label: &str) -> (Option<Visibility>, &str) {
    let trimmed = label.trim_start();
    let mut chars = trimmed.chars();
    match chars.next().and_then(Visibility::from_symbol) {
        Some(visibility) => (Some(visibility), chars.as_str().trim_start()),
        None => (None, trimmed),
    }
}
