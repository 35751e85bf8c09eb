//! Fixed-width integer vector packed into 64-bit words.
//!
//! The suffix array, the LCP side tables, and the n-gram offset lists all
//! store integers bounded by the corpus length, so a fixed width of
//! `ceil(log2(max + 1))` bits per element cuts them to a fraction of a
//! `Vec<u64>`. Values are packed back to back with no padding; an element
//! may straddle a word boundary.
//!
//! Out-of-range indexes are a programming error and panic via the indexing
//! asserts; they are never surfaced as recoverable failures.
//!
//! # Persisted layout
//!
//! `u64 n_elements, u8 width, u64 bitmap_bits, u64 words[ceil(bitmap_bits/64)]`,
//! all little-endian.

use std::io::{self, Read, Write};

use crate::wire;

/// Upper bound on deserialized element counts, to keep a corrupt header from
/// forcing a giant allocation before the data is even read.
const MAX_ELEMENTS: u64 = 1 << 40;

/// Number of bits needed to store values up to and including `max_value`.
///
/// Never returns zero; a vector of zeros still occupies one bit per element
/// so that element boundaries stay well-defined.
#[inline]
pub fn width_for(max_value: u64) -> u8 {
    let bits = 64 - max_value.leading_zeros() as u8;
    bits.max(1)
}

/// Bit-packed vector of `width`-bit unsigned integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitPackedArray {
    words: Vec<u64>,
    n_elements: u64,
    width: u8,
}

impl BitPackedArray {
    /// An all-zero vector of `n_elements` values of `width` bits each.
    pub fn new(n_elements: u64, width: u8) -> Self {
        assert!(width >= 1 && width <= 64, "width {} out of range", width);
        let bits = n_elements * u64::from(width);
        BitPackedArray {
            words: vec![0u64; bits.div_ceil(64) as usize],
            n_elements,
            width,
        }
    }

    /// Pack `values` at the given width. Values wider than `width` bits are
    /// a programming error.
    pub fn from_values(values: &[u64], width: u8) -> Self {
        let mut packed = BitPackedArray::new(values.len() as u64, width);
        for (i, &value) in values.iter().enumerate() {
            packed.set(i as u64, value);
        }
        packed
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.n_elements
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_elements == 0
    }

    #[inline]
    pub fn width(&self) -> u8 {
        self.width
    }

    #[inline]
    fn mask(&self) -> u64 {
        if self.width == 64 {
            u64::MAX
        } else {
            (1u64 << self.width) - 1
        }
    }

    /// Store `value` at index `i`. The slot is assumed to still hold zero
    /// (construction is write-once, as every builder in this crate does).
    #[inline]
    pub fn set(&mut self, i: u64, value: u64) {
        debug_assert!(i < self.n_elements, "index {} out of bounds", i);
        debug_assert!(value <= self.mask(), "value {} exceeds width {}", value, self.width);
        let start = i * u64::from(self.width);
        let word = (start / 64) as usize;
        let bit = (start % 64) as u32;
        self.words[word] |= value << bit;
        let spill = bit + u32::from(self.width);
        if spill > 64 {
            self.words[word + 1] |= value >> (64 - bit);
        }
    }

    /// Read the value at index `i`.
    #[inline]
    pub fn get(&self, i: u64) -> u64 {
        debug_assert!(i < self.n_elements, "index {} out of bounds", i);
        let start = i * u64::from(self.width);
        let word = (start / 64) as usize;
        let bit = (start % 64) as u32;
        let mut value = self.words[word] >> bit;
        let spill = bit + u32::from(self.width);
        if spill > 64 {
            value |= self.words[word + 1] << (64 - bit);
        }
        value & self.mask()
    }

    /// Convenience accessor for usize-indexed callers.
    #[inline]
    pub fn at(&self, i: usize) -> usize {
        self.get(i as u64) as usize
    }

    /// Iterate the unpacked values in index order.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.n_elements).map(move |i| self.get(i))
    }

    /// Write `(n_elements, width, bitmap_bits, words...)`.
    pub fn serialize<W: Write>(&self, out: &mut W) -> io::Result<usize> {
        wire::write_u64(out, self.n_elements)?;
        wire::write_u8(out, self.width)?;
        let bits = self.n_elements * u64::from(self.width);
        wire::write_u64(out, bits)?;
        for &word in &self.words {
            wire::write_u64(out, word)?;
        }
        Ok(8 + 1 + 8 + self.words.len() * 8)
    }

    /// Read back what `serialize` wrote, validating the header fields
    /// against each other before allocating.
    pub fn deserialize<R: Read>(input: &mut R) -> io::Result<Self> {
        let n_elements = wire::read_u64(input)?;
        let width = wire::read_u8(input)?;
        let bits = wire::read_u64(input)?;

        if n_elements > MAX_ELEMENTS {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("bit-packed array claims {} elements", n_elements),
            ));
        }
        if !(1..=64).contains(&width) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("bit-packed array width {} out of range", width),
            ));
        }
        if bits != n_elements * u64::from(width) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "bitmap bit count {} does not match {} elements of width {}",
                    bits, n_elements, width
                ),
            ));
        }

        let n_words = bits.div_ceil(64) as usize;
        let mut words = vec![0u64; n_words];
        for word in &mut words {
            *word = wire::read_u64(input)?;
        }
        Ok(BitPackedArray {
            words,
            n_elements,
            width,
        })
    }
}
