use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::CompanyId;

/// Tradable symbol: a spot good or a company share
///
/// Serializes as a string (`grain`, `share:<uuid>`) so symbols can key
/// JSON maps in snapshots. Goods and shares trade through the same book
/// structure; the distinction only matters to escrow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Symbol {
    /// Spot good, identified by name
    Good(String),
    /// Share of a company
    Share(CompanyId),
}

impl Symbol {
    pub fn good(name: impl Into<String>) -> Self {
        Symbol::Good(name.into())
    }

    pub fn share(company: CompanyId) -> Self {
        Symbol::Share(company)
    }

    /// Returns true for company-share symbols
    pub fn is_share(&self) -> bool {
        matches!(self, Symbol::Share(_))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Good(name) => write!(f, "{}", name),
            Symbol::Share(company) => write!(f, "share:{}", company),
        }
    }
}

impl FromStr for Symbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("empty symbol".to_string());
        }
        match s.strip_prefix("share:") {
            Some(id) => Uuid::parse_str(id)
                .map(Symbol::Share)
                .map_err(|e| format!("invalid share symbol '{}': {}", s, e)),
            None => Ok(Symbol::Good(s.to_string())),
        }
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.to_string()
    }
}

impl TryFrom<String> for Symbol {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_symbol_string_round_trip() {
        let grain = Symbol::good("grain");
        assert_eq!(grain.to_string(), "grain");
        assert_eq!("grain".parse::<Symbol>().unwrap(), grain);

        let share = Symbol::share(Uuid::new_v4());
        assert_eq!(share.to_string().parse::<Symbol>().unwrap(), share);
    }

    #[test]
    fn test_symbol_rejects_garbage() {
        assert!("".parse::<Symbol>().is_err());
        assert!("share:not-a-uuid".parse::<Symbol>().is_err());
    }

    #[test]
    fn test_symbol_keys_json_maps() {
        let mut map = HashMap::new();
        map.insert(Symbol::good("bread"), 3u32);
        let json = serde_json::to_string(&map).unwrap();
        let back: HashMap<Symbol, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(&Symbol::good("bread")), Some(&3));
    }
}
