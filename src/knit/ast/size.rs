//! Sized quantities: stitch counts, lengths and the "to end of row" marker

use crate::knit::ast::expressions::{Identifier, Names};
use crate::knit::lexer::Position;
use serde::{Deserialize, Serialize};

/// The numeric part of a size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeValue {
    Int(#[serde(with = "as_string")] i64),
    Float(#[serde(with = "as_string")] f64),
    /// A named quantity, rendered through the alias table
    Ident(Identifier),
    /// No value; only the asterisk carries this
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "mm")]
    Millimeters,
    #[serde(rename = "cm")]
    Centimeters,
    #[serde(rename = "inches")]
    Inches,
    #[serde(rename = "feet")]
    Feet,
    /// `*`: to the end of the row
    #[serde(rename = "asterisk")]
    Asterisk,
}

impl Unit {
    /// Look up a unit written as an identifier after a number (`mm`, `CM`)
    pub fn from_suffix(suffix: &str) -> Option<Unit> {
        if suffix.eq_ignore_ascii_case("mm") {
            Some(Unit::Millimeters)
        } else if suffix.eq_ignore_ascii_case("cm") {
            Some(Unit::Centimeters)
        } else {
            None
        }
    }

    fn suffix(&self) -> &'static str {
        match self {
            Unit::Millimeters => "mm",
            Unit::Centimeters => "cm",
            Unit::Inches => "\"",
            Unit::Feet => "'",
            Unit::None | Unit::Asterisk => "",
        }
    }
}

/// A quantity inside a bracket list: `3`, `12mm`, `-2.5"`, `*`, `-*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub at: Position,
    pub value: SizeValue,
    pub unit: Unit,
    /// Work until the size is reached rather than exactly the size.
    pub before: bool,
}

impl Size {
    pub fn new(at: Position, value: SizeValue, unit: Unit) -> Self {
        Size {
            at,
            value,
            unit,
            before: false,
        }
    }

    pub fn asterisk(at: Position) -> Self {
        Size::new(at, SizeValue::None, Unit::Asterisk)
    }

    pub fn is_asterisk(&self) -> bool {
        self.unit == Unit::Asterisk
    }

    pub fn text(&self, names: &impl Names) -> String {
        if self.is_asterisk() {
            return if self.before {
                "before end of row".to_string()
            } else {
                "to end of row".to_string()
            };
        }

        let number = match &self.value {
            SizeValue::Int(n) => n.to_string(),
            SizeValue::Float(n) => format!("{:.2}", n),
            SizeValue::Ident(ident) => names.name(ident).to_string(),
            SizeValue::None => String::new(),
        };
        let text = format!("{}{}", number, self.unit.suffix());

        if self.before {
            format!("until {}", text)
        } else {
            text
        }
    }
}

/// Numbers travel as strings in JSON so they round-trip exactly.
mod as_string {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse()
            .map_err(|err| de::Error::custom(format!("invalid number {:?}: {}", text, err)))
    }
}
