//! JSON encoding for finalized reports.

use crate::aggregator::Report;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::fmt;
use std::str::FromStr;

/// Widest accepted space indentation.
const MAX_INDENT_WIDTH: u8 = 16;

/// Indentation unit for the encoded report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IndentRepr", into = "IndentRepr")]
pub enum Indent {
    Spaces(u8),
    Tab,
}

impl Default for Indent {
    fn default() -> Self {
        Self::Spaces(2)
    }
}

impl Indent {
    fn unit(&self) -> Vec<u8> {
        match self {
            Self::Spaces(width) => vec![b' '; usize::from(*width)],
            Self::Tab => vec![b'\t'],
        }
    }
}

impl FromStr for Indent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("tab") {
            return Ok(Self::Tab);
        }
        let width: u8 = s
            .parse()
            .map_err(|_| format!("invalid indent '{}': expected 'tab' or a width", s))?;
        if width == 0 {
            return Err("indent width must be at least 1".to_string());
        }
        if width > MAX_INDENT_WIDTH {
            return Err(format!(
                "indent width {} exceeds maximum of {}",
                width, MAX_INDENT_WIDTH
            ));
        }
        Ok(Self::Spaces(width))
    }
}

impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spaces(width) => write!(f, "{}", width),
            Self::Tab => write!(f, "tab"),
        }
    }
}

/// Config-file form: `indent: 4` or `indent: tab`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum IndentRepr {
    Width(u8),
    Name(String),
}

impl TryFrom<IndentRepr> for Indent {
    type Error = String;

    fn try_from(repr: IndentRepr) -> Result<Self, Self::Error> {
        match repr {
            IndentRepr::Width(width) => width.to_string().parse(),
            IndentRepr::Name(name) => name.parse(),
        }
    }
}

impl From<Indent> for IndentRepr {
    fn from(indent: Indent) -> Self {
        match indent {
            Indent::Spaces(width) => Self::Width(width),
            Indent::Tab => Self::Name("tab".to_string()),
        }
    }
}

/// Encode the report's records as an indented JSON array.
///
/// Output depends only on the records, so equal reports always encode to
/// identical bytes.
pub fn encode_report(report: &Report, indent: Indent) -> Result<Vec<u8>, serde_json::Error> {
    let unit = indent.unit();
    let formatter = PrettyFormatter::with_indent(&unit);
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    report.summaries().serialize(&mut serializer)?;
    Ok(buf)
}
