//! Strongly typed repository identifiers.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw numeric value.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(
    /// Content item identifier.
    ContentId
);

id_type!(
    /// Folder identifier.
    FolderId
);

id_type!(
    /// Template variant identifier.
    VariantId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_numeric() {
        assert_eq!(ContentId(42).to_string(), "42");
        assert_eq!(VariantId(7).to_string(), "7");
    }

    #[test]
    fn test_from_str_trims_whitespace() {
        assert_eq!(" 100 ".parse::<ContentId>().unwrap(), ContentId(100));
        assert!("abc".parse::<FolderId>().is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let yaml = serde_yaml::to_string(&ContentId(5)).unwrap();
        assert_eq!(yaml.trim(), "5");
        let id: ContentId = serde_yaml::from_str("9").unwrap();
        assert_eq!(id.get(), 9);
    }
}
