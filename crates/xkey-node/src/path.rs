use std::fmt;
use std::str::FromStr;

use crate::error::KeyError;

/// First hardened child index.
pub const HARDENED_OFFSET: u32 = 1 << 31;

/// One path segment: an index and whether it carried the `'` marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathSegment {
    pub index: u32,
    pub hardened: bool,
}

/// A parsed derivation path such as `m/44'/4343'/0'`.
///
/// Grammar: `^(m/)?(\d+'?/)*\d+'?$`. A bare `m` is not a path. Segment
/// indices are kept as written; whether the marker matters is up to the
/// curve doing the deriving.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivationPath {
    absolute: bool,
    segments: Vec<PathSegment>,
}

impl DerivationPath {
    /// Whether the path starts at the master node (`m/`).
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl FromStr for DerivationPath {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (absolute, rest) = match s.strip_prefix("m/") {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let segments = rest
            .split('/')
            .map(|part| parse_segment(part).ok_or_else(|| KeyError::InvalidPath(s.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { absolute, segments })
    }
}

fn parse_segment(part: &str) -> Option<PathSegment> {
    let (digits, hardened) = match part.strip_suffix('\'') {
        Some(digits) => (digits, true),
        None => (part, false),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // grammatical but wider than u32
    let index = digits.parse::<u32>().ok()?;
    Some(PathSegment { index, hardened })
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute {
            write!(f, "m/")?;
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", segment.index)?;
            if segment.hardened {
                write!(f, "'")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<DerivationPath, KeyError> {
        s.parse()
    }

    #[test]
    fn parses_absolute_path() {
        let path = parse("m/44'/4343'/0'/0'/0'").unwrap();
        assert!(path.is_absolute());
        assert_eq!(path.segments().len(), 5);
        assert_eq!(
            path.segments()[1],
            PathSegment {
                index: 4343,
                hardened: true
            }
        );
    }

    #[test]
    fn parses_relative_mixed_markers() {
        let path = parse("0'/1/2'").unwrap();
        assert!(!path.is_absolute());
        let hardened: Vec<bool> = path.segments().iter().map(|s| s.hardened).collect();
        assert_eq!(hardened, vec![true, false, true]);
    }

    #[test]
    fn accepts_index_beyond_hardened_range() {
        let path = parse("4294967295").unwrap();
        assert_eq!(path.segments()[0].index, u32::MAX);
    }

    #[test]
    fn rejects_bad_grammar() {
        for bad in [
            "", "m", "m/", "/0", "0/", "0//1", "m/0'/x", "0''", "m/m/0", "M/0", " 0", "0 ",
            "-1", "+1", "0'1", "4294967296", "m/0/",
        ] {
            assert!(
                matches!(parse(bad), Err(KeyError::InvalidPath(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn display_reproduces_input() {
        for s in ["m/0'", "0/1'/2", "m/2147483647'/1'"] {
            assert_eq!(parse(s).unwrap().to_string(), s);
        }
    }
}
