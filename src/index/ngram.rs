//! N-gram index: fixed-width windows mapped to bit-packed offset lists.
//!
//! Every corpus position owns one key: the `n` bytes starting there, padded
//! with sentinel bytes past the end of the text so positions within `n - 1`
//! bytes of the end still participate (short queries must be able to find
//! them). The window that would start *at* the sentinel is skipped.
//!
//! Queries of exactly `n` bytes are a single map lookup. Shorter queries
//! walk the keys `>=` the query for as long as they start with it. Longer
//! queries look up their length-`n` prefix and filter the survivors by
//! comparing the tail against the corpus.
//!
//! # Persisted layout
//!
//! `u64 n, bytes T[n], u32 ngram_size, u64 map_size`, then per entry:
//! `bytes[ngram_size]` key followed by its `BitPackedArray` of offsets.

use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::ops::Bound;
use std::sync::Arc;

use crate::bitpacked::{width_for, BitPackedArray};
use crate::error::Result;
use crate::text::{Corpus, SENTINEL};
use crate::wire;

/// Default window width: trigrams.
pub const DEFAULT_NGRAM_SIZE: u32 = 3;

/// N-gram index over a shared corpus.
#[derive(Debug)]
pub struct NGramIndex {
    corpus: Arc<Corpus>,
    ngram_size: u32,
    map: BTreeMap<Vec<u8>, BitPackedArray>,
}

impl NGramIndex {
    /// Enumerate every window and group start offsets per key.
    pub fn build(corpus: Arc<Corpus>, ngram_size: u32) -> Self {
        let n = ngram_size as usize;
        let len = corpus.len();
        let width = width_for(len as u64);

        let mut grouped: BTreeMap<Vec<u8>, Vec<u64>> = BTreeMap::new();
        // Skip the window that would start at the sentinel itself.
        for i in 0..len - 1 {
            let mut key = Vec::with_capacity(n);
            for k in 0..n {
                key.push(if i + k < len {
                    corpus.char_at(i + k)
                } else {
                    SENTINEL
                });
            }
            grouped.entry(key).or_default().push(i as u64);
        }

        let map = grouped
            .into_iter()
            .map(|(key, offsets)| (key, BitPackedArray::from_values(&offsets, width)))
            .collect();
        NGramIndex {
            corpus,
            ngram_size,
            map,
        }
    }

    #[inline]
    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    #[inline]
    pub fn ngram_size(&self) -> u32 {
        self.ngram_size
    }

    /// Keys that start with `query`, in lexicographic order.
    fn keys_with_prefix<'a>(
        &'a self,
        query: &'a [u8],
    ) -> impl Iterator<Item = (&'a Vec<u8>, &'a BitPackedArray)> {
        self.map
            .range::<[u8], _>((Bound::Included(query), Bound::Unbounded))
            .take_while(move |(key, _)| key.starts_with(query))
    }

    /// All offsets where `query` occurs, ascending.
    pub fn search(&self, query: &[u8]) -> Result<Vec<usize>> {
        let n = self.ngram_size as usize;
        let mut offsets = Vec::new();

        if query.len() == n {
            if let Some(list) = self.map.get(query) {
                offsets.extend(list.iter().map(|v| v as usize));
            }
        } else if query.len() < n {
            for (_, list) in self.keys_with_prefix(query) {
                offsets.extend(list.iter().map(|v| v as usize));
            }
            offsets.sort_unstable();
        } else if let Some(list) = self.map.get(&query[..n]) {
            offsets.extend(
                list.iter()
                    .map(|v| v as usize)
                    .filter(|&offset| self.corpus.matches_at(query, offset)),
            );
        }

        Ok(offsets)
    }

    pub fn count(&self, query: &[u8]) -> Result<usize> {
        let n = self.ngram_size as usize;
        let count = if query.len() == n {
            self.map.get(query).map_or(0, |list| list.len() as usize)
        } else if query.len() < n {
            self.keys_with_prefix(query)
                .map(|(_, list)| list.len() as usize)
                .sum()
        } else {
            match self.map.get(&query[..n]) {
                Some(list) => list
                    .iter()
                    .filter(|&v| self.corpus.matches_at(query, v as usize))
                    .count(),
                None => 0,
            }
        };
        Ok(count)
    }

    pub fn contains(&self, query: &[u8]) -> Result<bool> {
        let n = self.ngram_size as usize;
        let found = if query.len() == n {
            self.map.contains_key(query)
        } else if query.len() < n {
            self.keys_with_prefix(query).next().is_some()
        } else {
            match self.map.get(&query[..n]) {
                Some(list) => list
                    .iter()
                    .any(|v| self.corpus.matches_at(query, v as usize)),
                None => false,
            }
        };
        Ok(found)
    }

    #[inline]
    pub fn char_at(&self, i: usize) -> u8 {
        self.corpus.char_at(i)
    }

    /// Write `(n, T, ngram_size, map_size, entries...)`.
    pub fn serialize<W: Write>(&self, out: &mut W) -> io::Result<usize> {
        let n = self.corpus.len();
        wire::write_u64(out, n as u64)?;
        wire::write_bytes(out, self.corpus.bytes())?;
        wire::write_u32(out, self.ngram_size)?;
        wire::write_u64(out, self.map.len() as u64)?;
        let mut written = 8 + n + 4 + 8;

        for (key, offsets) in &self.map {
            wire::write_bytes(out, key)?;
            written += key.len();
            written += offsets.serialize(out)?;
        }
        Ok(written)
    }

    /// Read back what [`NGramIndex::serialize`] wrote.
    pub fn deserialize<R: Read>(input: &mut R) -> io::Result<Self> {
        let n = wire::read_u64(input)? as usize;
        if n == 0 {
            return Err(invalid("n-gram corpus is empty"));
        }
        let bytes = wire::read_bytes(input, n)?;
        let corpus = Arc::new(Corpus::from_stored(bytes).map_err(|e| invalid(&e.to_string()))?);

        let ngram_size = wire::read_u32(input)?;
        if ngram_size == 0 || ngram_size > 1024 {
            return Err(invalid("n-gram size out of range"));
        }
        let map_size = wire::read_u64(input)?;
        if map_size as usize > n {
            return Err(invalid("n-gram map larger than the corpus"));
        }

        let mut map = BTreeMap::new();
        for _ in 0..map_size {
            let key = wire::read_bytes(input, ngram_size as usize)?;
            let offsets = BitPackedArray::deserialize(input)?;
            for offset in offsets.iter() {
                if offset as usize >= n {
                    return Err(invalid("n-gram offset out of range"));
                }
            }
            if map.insert(key, offsets).is_some() {
                return Err(invalid("duplicate n-gram key"));
            }
        }

        Ok(NGramIndex {
            corpus,
            ngram_size,
            map,
        })
    }
}

fn invalid(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}
