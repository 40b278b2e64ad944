//! # Placement hints for plugin ordering.
//!
//! ```text
//! ""       → Placement::None
//! "<"      → Placement::First
//! ">"      → Placement::Last
//! "<name"  → Placement::Before("name")
//! ">name"  → Placement::After("name")
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::CliError;

/// Where a plugin wants to sit within its group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Placement {
    /// No preference; ordered by plugin name.
    #[default]
    None,
    /// Ahead of all plugins without a `First` hint.
    First,
    /// Behind all plugins without a `Last` hint.
    Last,
    /// Before the named plugin.
    Before(String),
    /// After the named plugin.
    After(String),
}

impl Placement {
    /// Coarse bucket used for the base order: first, middle, last.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Placement::First => 0,
            Placement::None | Placement::Before(_) | Placement::After(_) => 1,
            Placement::Last => 2,
        }
    }
}

impl FromStr for Placement {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CliError::Placement {
            placement: s.to_string(),
        };
        let s_trim = s.trim();
        match s_trim {
            "" => Ok(Placement::None),
            "<" => Ok(Placement::First),
            ">" => Ok(Placement::Last),
            _ => {
                let (before, name) = match (s_trim.strip_prefix('<'), s_trim.strip_prefix('>')) {
                    (Some(name), _) => (true, name.trim()),
                    (_, Some(name)) => (false, name.trim()),
                    _ => return Err(invalid()),
                };
                if name.is_empty() || name.contains(['<', '>']) {
                    return Err(invalid());
                }
                Ok(if before {
                    Placement::Before(name.to_string())
                } else {
                    Placement::After(name.to_string())
                })
            }
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::None => Ok(()),
            Placement::First => f.write_str("<"),
            Placement::Last => f.write_str(">"),
            Placement::Before(name) => write!(f, "<{name}"),
            Placement::After(name) => write!(f, ">{name}"),
        }
    }
}
