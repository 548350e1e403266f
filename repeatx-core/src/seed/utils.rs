//! Shared utilities for seeding: polynomial rolling hash and window verification

use crate::types::Base;

/// Polynomial base for the rolling hash
pub const HASH_BASE: u64 = 31;

/// Mersenne prime 2^61 - 1; products are reduced through `u128`
pub const HASH_MODULUS: u64 = (1 << 61) - 1;

/// Hash code of a base. Codes are distinct and non-zero; `Unknown` still
/// contributes so windows containing it hash deterministically.
#[inline]
pub fn symbol_code(base: Base) -> u64 {
    match base {
        Base::A => 3,
        Base::C => 5,
        Base::G => 7,
        Base::T => 11,
        Base::Unknown => 13,
    }
}

#[inline]
fn mul_mod(a: u64, b: u64) -> u64 {
    ((a as u128 * b as u128) % HASH_MODULUS as u128) as u64
}

fn pow_mod(mut base: u64, mut exp: u64) -> u64 {
    let mut result = 1u64;
    base %= HASH_MODULUS;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base);
        }
        base = mul_mod(base, base);
        exp >>= 1;
    }
    result
}

/// Rolling hash over a fixed-length window:
/// `h = sum(code(s[i]) * BASE^(L-1-i)) mod M`
pub struct RollingHash {
    window: usize,
    hash: u64,
    /// BASE^(L-1), the weight of the outgoing symbol
    power: u64,
}

impl RollingHash {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            hash: 0,
            power: pow_mod(HASH_BASE, window.saturating_sub(1) as u64),
        }
    }

    /// Hash of a complete window in one pass.
    pub fn of_window(window: &[Base]) -> u64 {
        let mut hasher = Self::new(window.len());
        for &base in window {
            hasher.push(base);
        }
        hasher.hash()
    }

    /// Append a symbol while filling the first window.
    pub fn push(&mut self, base: Base) -> u64 {
        self.hash = (mul_mod(self.hash, HASH_BASE) + symbol_code(base)) % HASH_MODULUS;
        self.hash
    }

    /// Drop the oldest symbol and append a new one.
    pub fn roll(&mut self, outgoing: Base, incoming: Base) -> u64 {
        let weighted = mul_mod(symbol_code(outgoing), self.power);
        let trimmed = (self.hash + HASH_MODULUS - weighted) % HASH_MODULUS;
        self.hash = (mul_mod(trimmed, HASH_BASE) + symbol_code(incoming)) % HASH_MODULUS;
        self.hash
    }

    pub fn reset(&mut self) {
        self.hash = 0;
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

/// Iterator over `(start, hash)` for every full window of a sequence.
pub struct WindowHashes<'a> {
    sequence: &'a [Base],
    hasher: RollingHash,
    range_start: usize,
    next_start: usize,
    end: usize,
}

impl<'a> WindowHashes<'a> {
    pub fn new(sequence: &'a [Base], window: usize) -> Self {
        Self::with_range(sequence, window, 0, usize::MAX)
    }

    /// Windows starting in `start..end` only. The first hash costs O(window),
    /// every following one O(1).
    pub fn with_range(sequence: &'a [Base], window: usize, start: usize, end: usize) -> Self {
        let last_start = if window == 0 || window > sequence.len() {
            0
        } else {
            sequence.len() - window + 1
        };
        let end = end.min(last_start);
        let mut hasher = RollingHash::new(window);
        if start < end {
            for &base in &sequence[start..start + window] {
                hasher.push(base);
            }
        }
        Self {
            sequence,
            hasher,
            range_start: start,
            next_start: start,
            end,
        }
    }
}

impl<'a> Iterator for WindowHashes<'a> {
    type Item = (usize, u64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_start >= self.end {
            return None;
        }
        let start = self.next_start;
        if start > self.range_start {
            let window = self.hasher.window();
            self.hasher
                .roll(self.sequence[start - 1], self.sequence[start + window - 1]);
        }
        self.next_start += 1;
        Some((start, self.hasher.hash()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.next_start);
        (remaining, Some(remaining))
    }
}

/// Fraction of positions where two equal-length windows match (unknowns never match).
pub fn identity_fraction(a: &[Base], b: &[Base]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let matches = a.iter().zip(b).filter(|(x, y)| x.matches(**y)).count();
    matches as f64 / a.len() as f64
}

/// Verify a hash hit: exact comparison at threshold 1.0, identity fraction otherwise.
pub fn windows_agree(a: &[Base], b: &[Base], similarity_threshold: f64) -> bool {
    if a.len() != b.len() {
        return false;
    }
    if similarity_threshold >= 1.0 {
        a.iter().zip(b).all(|(x, y)| x.matches(*y))
    } else {
        identity_fraction(a, b) >= similarity_threshold
    }
}
