use serde::{Deserialize, Serialize};
use std::fmt;

/// Zero-based offset into a sequence.
pub type Position = usize;

/// A nucleotide over the canonical alphabet, plus a sentinel for anything else.
///
/// `Unknown` never matches any base, itself included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Base {
    A,
    C,
    G,
    T,
    Unknown,
}

impl Base {
    /// Normalize an input byte. Lowercase is accepted; every other symbol maps to `Unknown`.
    pub fn from_ascii(byte: u8) -> Self {
        match byte.to_ascii_uppercase() {
            b'A' => Base::A,
            b'C' => Base::C,
            b'G' => Base::G,
            b'T' => Base::T,
            _ => Base::Unknown,
        }
    }

    pub fn to_ascii(self) -> u8 {
        match self {
            Base::A => b'A',
            Base::C => b'C',
            Base::G => b'G',
            Base::T => b'T',
            Base::Unknown => b'N',
        }
    }

    /// Watson-Crick pairing partner. `Unknown` stays `Unknown`.
    pub fn complement(self) -> Self {
        match self {
            Base::A => Base::T,
            Base::T => Base::A,
            Base::C => Base::G,
            Base::G => Base::C,
            Base::Unknown => Base::Unknown,
        }
    }

    /// Symbol equality under the wildcard rule: `Unknown` matches nothing.
    #[inline]
    pub fn matches(self, other: Base) -> bool {
        self != Base::Unknown && self == other
    }

    pub fn is_canonical(self) -> bool {
        self != Base::Unknown
    }
}

impl From<u8> for Base {
    fn from(byte: u8) -> Self {
        Base::from_ascii(byte)
    }
}

impl From<Base> for char {
    fn from(base: Base) -> Self {
        base.to_ascii() as char
    }
}

/// Encode raw text into bases.
pub fn bases_from_ascii(text: &[u8]) -> Vec<Base> {
    text.iter().map(|&b| Base::from_ascii(b)).collect()
}

/// Render bases as `ACGTN` text.
pub fn bases_to_string(bases: &[Base]) -> String {
    bases.iter().map(|&b| char::from(b)).collect()
}

/// Reverse complement of a base slice.
pub fn reverse_complement(bases: &[Base]) -> Vec<Base> {
    bases.iter().rev().map(|b| b.complement()).collect()
}

/// A named nucleotide sequence as loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub id: String,
    pub description: Option<String>,
    bases: Vec<Base>,
}

impl Sequence {
    pub fn new(id: impl Into<String>, bases: Vec<Base>) -> Self {
        Self {
            id: id.into(),
            description: None,
            bases,
        }
    }

    /// Build a sequence from raw text, normalizing case and unknown symbols.
    pub fn from_ascii(id: impl Into<String>, text: &[u8]) -> Self {
        Self::new(id, bases_from_ascii(text))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn bases(&self) -> &[Base] {
        &self.bases
    }

    pub fn into_bases(self) -> Vec<Base> {
        self.bases
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Fraction of positions holding the unknown sentinel.
    pub fn unknown_fraction(&self) -> f64 {
        if self.bases.is_empty() {
            return 0.0;
        }
        let unknown = self.bases.iter().filter(|b| !b.is_canonical()).count();
        unknown as f64 / self.bases.len() as f64
    }

    pub fn reverse_complement(&self) -> Sequence {
        Sequence {
            id: format!("{}_rc", self.id),
            description: self.description.clone(),
            bases: reverse_complement(&self.bases),
        }
    }
}

impl AsRef<[Base]> for Sequence {
    fn as_ref(&self) -> &[Base] {
        &self.bases
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bases_to_string(&self.bases))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    pub fn is_reverse(self) -> bool {
        matches!(self, Strand::Reverse)
    }
}

impl From<bool> for Strand {
    fn from(forward: bool) -> Self {
        if forward {
            Strand::Forward
        } else {
            Strand::Reverse
        }
    }
}

impl From<Strand> for bool {
    fn from(strand: Strand) -> Self {
        matches!(strand, Strand::Forward)
    }
}

impl From<Strand> for char {
    fn from(strand: Strand) -> Self {
        match strand {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

/// A reference segment that recurs back to back in the query.
///
/// `repeat_count` counts the copies that follow the first match in the query,
/// so a segment seen three times in a row reports `repeat_count == 2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatPattern {
    /// Start of the canonical copy in the reference
    pub reference_position: Position,
    /// Segment length
    pub length: usize,
    /// Consecutive copies after the first one in the query
    pub repeat_count: usize,
    /// Copies in the query are reverse complements of the reference segment
    pub is_reverse: bool,
    /// The segment as it reads in the query (reverse-complemented when `is_reverse`)
    #[serde(with = "bases_text")]
    pub anchor_sequence: Vec<Base>,
    /// Start of the first detected copy in the query
    pub query_position: Position,
}

impl RepeatPattern {
    /// Information content used for ranking: `length * repeat_count`.
    pub fn score(&self) -> usize {
        self.length * self.repeat_count
    }

    pub fn strand(&self) -> Strand {
        Strand::from(!self.is_reverse)
    }

    pub fn reference_end(&self) -> Position {
        self.reference_position + self.length
    }

    /// End of the whole run in the query, first copy included.
    pub fn query_end(&self) -> Position {
        self.query_position + self.length * (self.repeat_count + 1)
    }

    pub fn anchor_string(&self) -> String {
        bases_to_string(&self.anchor_sequence)
    }
}

/// Serialize base vectors as plain `ACGTN` strings.
mod bases_text {
    use super::{bases_from_ascii, bases_to_string, Base};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bases: &[Base], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&bases_to_string(bases))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Base>, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(bases_from_ascii(text.as_bytes()))
    }
}
