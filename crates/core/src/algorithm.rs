//! Resize algorithms accepted by the processing backend.
//!
//! The wire tag is the lower-case name (`nearest`, `bilinear`, ...). The
//! human-facing labels shown on a job card (`Nearest Neighbor`, `Lanczos3`)
//! parse to the same values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Nearest,
    #[default]
    Bilinear,
    Bicubic,
    Lanczos2,
    Lanczos3,
}

/// All algorithms in the order a card offers them.
pub const ALL_ALGORITHMS: &[Algorithm] = &[
    Algorithm::Nearest,
    Algorithm::Bilinear,
    Algorithm::Bicubic,
    Algorithm::Lanczos2,
    Algorithm::Lanczos3,
];

impl Algorithm {
    /// Tag sent in the `algorithm` field of a resize request.
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
            Self::Bicubic => "bicubic",
            Self::Lanczos2 => "lanczos2",
            Self::Lanczos3 => "lanczos3",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Nearest => "Nearest Neighbor",
            Self::Bilinear => "Bilinear",
            Self::Bicubic => "Bicubic",
            Self::Lanczos2 => "Lanczos2",
            Self::Lanczos3 => "Lanczos3",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for Algorithm {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "nearest" | "nearestneighbor" => Ok(Self::Nearest),
            "bilinear" => Ok(Self::Bilinear),
            "bicubic" => Ok(Self::Bicubic),
            "lanczos2" => Ok(Self::Lanczos2),
            "lanczos3" => Ok(Self::Lanczos3),
            _ => Err(CoreError::InvalidAlgorithm(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_match_backend_names() {
        let tags: Vec<&str> = ALL_ALGORITHMS.iter().map(|a| a.as_tag()).collect();
        assert_eq!(tags, ["nearest", "bilinear", "bicubic", "lanczos2", "lanczos3"]);
    }

    #[test]
    fn labels_parse_back() {
        for alg in ALL_ALGORITHMS {
            assert_eq!(alg.label().parse::<Algorithm>().unwrap(), *alg);
            assert_eq!(alg.as_tag().parse::<Algorithm>().unwrap(), *alg);
        }
    }

    #[test]
    fn serde_uses_wire_tag() {
        let json = serde_json::to_string(&Algorithm::Lanczos3).unwrap();
        assert_eq!(json, "\"lanczos3\"");
    }

    #[test]
    fn unknown_algorithm_rejected() {
        let err = "box".parse::<Algorithm>().unwrap_err();
        assert!(err.to_string().contains("Unknown resize algorithm"));
    }

    #[test]
    fn default_is_bilinear() {
        assert_eq!(Algorithm::default(), Algorithm::Bilinear);
    }
}
