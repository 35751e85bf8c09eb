//! Plain suffix-array index: range-find by double binary search.
//!
//! `search` locates the smallest rank whose suffix is `>=` the query and the
//! first rank whose suffix is strictly greater (prefix-compare over the
//! first `|q|` bytes, wrapping modulo the corpus length; the sentinel keeps
//! every comparison finite). The ranks in between are exactly the suffixes
//! that start with the query. The suffix array itself is bit-packed to
//! `ceil(log2(n + 1))` bits per entry.
//!
//! # Persisted layout
//!
//! `u64 n, bytes T[n], BitPackedArray SA`.

use std::cmp::Ordering;
use std::io::{self, Read, Write};
use std::sync::Arc;

use crate::bitpacked::{width_for, BitPackedArray};
use crate::error::Result;
use crate::sais::suffix_array;
use crate::text::Corpus;
use crate::wire;

/// Suffix-array index over a shared corpus.
#[derive(Debug)]
pub struct SuffixArrayIndex {
    corpus: Arc<Corpus>,
    sa: BitPackedArray,
}

impl SuffixArrayIndex {
    /// Construct the suffix array and pack it.
    pub fn build(corpus: Arc<Corpus>) -> Self {
        let sa = suffix_array(&corpus);
        let packed = BitPackedArray::from_values(
            &sa.iter().map(|&v| v as u64).collect::<Vec<_>>(),
            width_for(corpus.len() as u64),
        );
        SuffixArrayIndex { corpus, sa: packed }
    }

    /// Assemble from already-built parts (deserialization, augmented index).
    pub(crate) fn from_parts(corpus: Arc<Corpus>, sa: BitPackedArray) -> Self {
        SuffixArrayIndex { corpus, sa }
    }

    #[inline]
    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    #[inline]
    pub(crate) fn sa(&self) -> &BitPackedArray {
        &self.sa
    }

    /// Half-open rank range `[lo, hi)` of suffixes starting with `query`.
    fn rank_range(&self, query: &[u8]) -> (usize, usize) {
        let n = self.corpus.len();

        // Smallest rank with suffix >= query
        let mut lo = 0;
        let mut hi = n;
        while lo < hi {
            let mid = (lo + hi) / 2;
            if self.corpus.compare_at(query, self.sa.at(mid)) == Ordering::Greater {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        let first = lo;

        // Smallest rank with suffix strictly > query
        let mut hi = n;
        while lo < hi {
            let mid = (lo + hi) / 2;
            if self.corpus.compare_at(query, self.sa.at(mid)) == Ordering::Less {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }

        (first, hi)
    }

    /// All offsets where `query` occurs, ascending.
    pub fn search(&self, query: &[u8]) -> Result<Vec<usize>> {
        let (lo, hi) = self.rank_range(query);
        let mut offsets: Vec<usize> = (lo..hi).map(|rank| self.sa.at(rank)).collect();
        offsets.sort_unstable();
        Ok(offsets)
    }

    pub fn count(&self, query: &[u8]) -> Result<usize> {
        let (lo, hi) = self.rank_range(query);
        Ok(hi - lo)
    }

    pub fn contains(&self, query: &[u8]) -> Result<bool> {
        let (lo, hi) = self.rank_range(query);
        Ok(hi > lo)
    }

    #[inline]
    pub fn char_at(&self, i: usize) -> u8 {
        self.corpus.char_at(i)
    }

    /// Write `(n, T, SA)`.
    pub fn serialize<W: Write>(&self, out: &mut W) -> io::Result<usize> {
        let n = self.corpus.len();
        wire::write_u64(out, n as u64)?;
        wire::write_bytes(out, self.corpus.bytes())?;
        let sa_size = self.sa.serialize(out)?;
        Ok(8 + n + sa_size)
    }

    /// Read back what [`SuffixArrayIndex::serialize`] wrote.
    pub fn deserialize<R: Read>(input: &mut R) -> io::Result<Self> {
        let (corpus, sa) = read_corpus_and_sa(input)?;
        Ok(SuffixArrayIndex::from_parts(corpus, sa))
    }
}

/// Shared head of the plain and augmented layouts.
pub(crate) fn read_corpus_and_sa<R: Read>(
    input: &mut R,
) -> io::Result<(Arc<Corpus>, BitPackedArray)> {
    let n = wire::read_u64(input)? as usize;
    if n == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "suffix array corpus is empty",
        ));
    }
    let bytes = wire::read_bytes(input, n)?;
    let corpus = Corpus::from_stored(bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

    let sa = BitPackedArray::deserialize(input)?;
    if sa.len() as usize != n {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("suffix array has {} entries for corpus of {}", sa.len(), n),
        ));
    }
    for rank in 0..n {
        if sa.at(rank) >= n {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "suffix array entry out of range",
            ));
        }
    }
    Ok((Arc::new(corpus), sa))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn index_for(input: &[u8]) -> SuffixArrayIndex {
        SuffixArrayIndex::build(Arc::new(Corpus::from_bytes(input).unwrap()))
    }

    #[test]
    fn abracadabra_scenarios() {
        let index = index_for(b"abracadabra");
        assert_eq!(index.search(b"abra").unwrap(), vec![0, 7]);
        assert_eq!(index.search(b"a").unwrap(), vec![0, 3, 5, 7, 10]);
        assert_eq!(index.count(b"abra").unwrap(), 2);
        assert!(index.contains(b"cad").unwrap());
        assert!(!index.contains(b"cab").unwrap());
    }

    #[test]
    fn query_spanning_the_sentinel_has_no_match() {
        let index = index_for(b"abracadabra");
        // "ra" occurs at the very end; extending past it cannot match
        assert_eq!(index.search(b"ra").unwrap(), vec![2, 9]);
        assert!(index.search(b"rab").unwrap().is_empty());
    }

    #[test]
    fn whole_corpus_query() {
        let index = index_for(b"banana");
        assert_eq!(index.search(b"banana").unwrap(), vec![0]);
        assert!(index.search(b"bananax").unwrap().is_empty());
    }

    #[test]
    fn sentinel_only_corpus_is_always_empty() {
        let index = index_for(b"");
        assert!(index.search(b"a").unwrap().is_empty());
        assert_eq!(index.count(b"abc").unwrap(), 0);
    }

    #[test]
    fn serialize_round_trip() {
        let index = index_for(b"mississippi");
        let mut buf = Vec::new();
        let written = index.serialize(&mut buf).unwrap();
        assert_eq!(written, buf.len());

        let restored = SuffixArrayIndex::deserialize(&mut Cursor::new(buf)).unwrap();
        for query in [b"ss".as_slice(), b"issi", b"i", b"zzz"] {
            assert_eq!(restored.search(query).unwrap(), index.search(query).unwrap());
        }
    }

    #[test]
    fn deserialize_rejects_out_of_range_entries() {
        let index = index_for(b"ab");
        let mut buf = Vec::new();
        index.serialize(&mut buf).unwrap();
        // corpus is "ab\0" (n = 3); the packed SA words start after the
        // u64 n + 3 corpus bytes + the bit-packed header (8 + 1 + 8)
        let sa_words_at = 8 + 3 + 17;
        buf[sa_words_at] = 0xFF;
        assert!(SuffixArrayIndex::deserialize(&mut Cursor::new(buf)).is_err());
    }
}
