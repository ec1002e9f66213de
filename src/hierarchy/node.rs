use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// One organizational unit. Field order here is the serialized field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jabatan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eselon: Option<Echelon>,
    #[serde(default)]
    pub children: Vec<OrgNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catatan: Option<String>,
    /// Fields this crate does not interpret, carried through rewrites untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl OrgNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            jabatan: None,
            eselon: None,
            children: Vec::new(),
            catatan: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_eselon(mut self, eselon: Echelon) -> Self {
        self.eselon = Some(eselon);
        self
    }

    pub fn with_children(mut self, children: Vec<OrgNode>) -> Self {
        self.children = children;
        self
    }
}

/// Civil-service rank code. Codes outside the known set are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Echelon {
    I,
    IIa,
    IIb,
    IIIa,
    IIIb,
    IVa,
    IVb,
    Unrecognized(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Top,
    Mid,
    Lower,
}

impl Echelon {
    pub fn as_str(&self) -> &str {
        match self {
            Self::I => "I",
            Self::IIa => "II.a",
            Self::IIb => "II.b",
            Self::IIIa => "III.a",
            Self::IIIb => "III.b",
            Self::IVa => "IV.a",
            Self::IVb => "IV.b",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn parse_code(raw: &str) -> Self {
        match raw.trim() {
            "I" => Self::I,
            "II.a" => Self::IIa,
            "II.b" => Self::IIb,
            "III.a" => Self::IIIa,
            "III.b" => Self::IIIb,
            "IV.a" => Self::IVa,
            "IV.b" => Self::IVb,
            _ => Self::Unrecognized(raw.to_string()),
        }
    }

    pub fn tier(&self) -> Option<Tier> {
        match self {
            Self::I | Self::IIa | Self::IIb => Some(Tier::Top),
            Self::IIIa | Self::IIIb => Some(Tier::Mid),
            Self::IVa | Self::IVb => Some(Tier::Lower),
            Self::Unrecognized(_) => None,
        }
    }
}

impl FromStr for Echelon {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_code(raw))
    }
}

impl fmt::Display for Echelon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Echelon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Echelon {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse_code(&raw))
    }
}
