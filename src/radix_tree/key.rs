use std::borrow::Borrow;
use std::cmp;
use std::fmt;

/// An edge label: the characters consumed while walking into a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPrefix {
    chars: Box<[char]>,
}

impl KeyPrefix {
    pub fn new(chars: &[char]) -> KeyPrefix {
        KeyPrefix {
            chars: Box::from(chars),
        }
    }

    pub fn empty() -> KeyPrefix {
        KeyPrefix { chars: Box::from([]) }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        self.chars.borrow()
    }

    pub fn first(&self) -> Option<char> {
        self.chars.first().copied()
    }

    /// Concatenate two labels, used when merging a removed single-child node
    /// into its parent (spec.md §4.3 remove, single-child merge case).
    pub fn concat(&self, other: &KeyPrefix) -> KeyPrefix {
        let mut merged = Vec::with_capacity(self.len() + other.len());
        merged.extend_from_slice(&self.chars);
        merged.extend_from_slice(&other.chars);
        KeyPrefix::new(&merged)
    }

    pub fn split_at(&self, idx: usize) -> (KeyPrefix, KeyPrefix) {
        let (left, right) = self.chars.split_at(idx);
        (KeyPrefix::new(left), KeyPrefix::new(right))
    }

    /// Classify how `probe` relates to this edge label. See `KeyMatchResult`.
    pub fn match_with<'a>(&self, probe: &'a [char]) -> KeyMatchResult<'a> {
        let shared = common_prefix_len(&self.chars, probe);

        if shared == self.len() && shared == probe.len() {
            KeyMatchResult::Complete
        } else if shared == self.len() {
            // whole edge consumed, key has unconsumed characters left
            KeyMatchResult::Partial(&probe[shared..])
        } else if shared == probe.len() {
            // probe is a strict prefix of the edge: key ends mid-edge
            KeyMatchResult::LongerPrefix(shared)
        } else {
            KeyMatchResult::Incomplete(shared, &probe[shared..])
        }
    }
}

impl fmt::Display for KeyPrefix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for c in self.chars.iter() {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

fn common_prefix_len(a: &[char], b: &[char]) -> usize {
    let max_len = cmp::min(a.len(), b.len());
    let mut idx = 0;
    while idx < max_len && a[idx] == b[idx] {
        idx += 1;
    }
    idx
}

/// Result of matching an unconsumed key probe against a single edge label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMatchResult<'a> {
    /// Edge fully matches a strict prefix of the probe. Carries the
    /// remaining, as-yet-unmatched suffix of the probe.
    Partial(&'a [char]),
    /// Edge and probe are identical.
    Complete,
    /// The probe is a strict prefix of the edge; `usize` is the split index
    /// into the edge at which the probe ends (spec.md's KEY_ENDS_MID_EDGE).
    LongerPrefix(usize),
    /// Edge and probe diverge before either is exhausted (or diverge at
    /// index 0). Carries the split index and the unmatched probe suffix.
    Incomplete(usize, &'a [char]),
}
