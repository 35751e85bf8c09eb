//! Augmented suffix-array index: Manber–Myers search in O(m + log n).
//!
//! Two side tables are precomputed over the full recursive bisection of the
//! rank range `[0, n)`: for each interior midpoint `c` of a split `[l, r)`,
//! `LCP_L[c - 1]` holds the common prefix of the suffixes at ranks `l` and
//! `c`, and `LCP_R[c - 1]` the common prefix at ranks `c` and `r` (the top
//! fence at rank `n` is virtual, with LCP zero). During the binary search
//! the tables let each probe skip the `min(l, r)` bytes already known to
//! match, so total compare cost is O(m + log n) instead of O(m log n).
//!
//! The adjacent-pair LCP convention (`lcp[k]` pairs ranks `k` and `k + 1`)
//! feeds the bisection; the rank-order convention belongs to the tree
//! builder. Both live in `crate::lcp`.
//!
//! # Persisted layout
//!
//! The plain layout (`u64 n, bytes T[n], BitPackedArray SA`) followed by the
//! two side tables as `BitPackedArray`s (LCP-L, then LCP-R).

use std::io::{self, Read, Write};
use std::sync::Arc;

use crate::bitpacked::{width_for, BitPackedArray};
use crate::error::Result;
use crate::index::suffix_array::{read_corpus_and_sa, SuffixArrayIndex};
use crate::lcp::lcp_adjacent;
use crate::sais::suffix_array;
use crate::text::Corpus;

/// Suffix-array index with precomputed LCP-interval side tables.
#[derive(Debug)]
pub struct AugmentedSuffixArrayIndex {
    base: SuffixArrayIndex,
    lcp_l: BitPackedArray,
    lcp_r: BitPackedArray,
}

impl AugmentedSuffixArrayIndex {
    /// Construct the suffix array, the adjacent LCPs, and the bisection
    /// tables.
    pub fn build(corpus: Arc<Corpus>) -> Self {
        let n = corpus.len();
        let sa = suffix_array(&corpus);

        // Adjacent LCPs, extended with the virtual top fence at rank n.
        let mut adjacent = lcp_adjacent(&corpus, &sa);
        adjacent.push(0);

        let max_lcp = adjacent.iter().copied().max().unwrap_or(0) as u64;
        let width = width_for(max_lcp + 1);
        let mut lcp_l = vec![0u64; n - 1];
        let mut lcp_r = vec![0u64; n - 1];
        if n > 1 {
            precompute(&adjacent, &mut lcp_l, &mut lcp_r, 0, n);
        }

        let sa_packed = BitPackedArray::from_values(
            &sa.iter().map(|&v| v as u64).collect::<Vec<_>>(),
            width_for(n as u64),
        );
        AugmentedSuffixArrayIndex {
            base: SuffixArrayIndex::from_parts(corpus, sa_packed),
            lcp_l: BitPackedArray::from_values(&lcp_l, width),
            lcp_r: BitPackedArray::from_values(&lcp_r, width),
        }
    }

    #[inline]
    pub fn corpus(&self) -> &Arc<Corpus> {
        self.base.corpus()
    }

    /// Rank of the first suffix `>=` the query (a suffix with the query as
    /// prefix counts as `>=`), or `n` if the query is greater than every
    /// suffix. Maintains `l` / `r`, the query's LCP with the suffixes at the
    /// current endpoints.
    fn first_occurrence(&self, query: &[u8]) -> usize {
        let corpus = self.corpus();
        let n = corpus.len();
        let sa = self.base.sa();

        let head = corpus.lcp_with(query, sa.at(0));
        if head == query.len() || query[head] <= corpus.char_at((sa.at(0) + head) % n) {
            return 0;
        }
        let mut l = head;
        let mut r = 0usize; // virtual fence at rank n

        let mut lp = 0usize;
        let mut rp = n;
        while rp - lp > 1 {
            let mp = (lp + rp) / 2;
            // Matched prefix length at the midpoint, reusing whichever
            // endpoint already matched further
            let skip = if l >= r {
                let side = self.lcp_l.at(mp - 1);
                if side >= l {
                    l + corpus.lcp_with(&query[l..], (sa.at(mp) + l) % n)
                } else {
                    side
                }
            } else {
                let side = self.lcp_r.at(mp - 1);
                if side >= r {
                    r + corpus.lcp_with(&query[r..], (sa.at(mp) + r) % n)
                } else {
                    side
                }
            };

            if skip == query.len() || query[skip] <= corpus.char_at((sa.at(mp) + skip) % n) {
                rp = mp;
                r = skip;
            } else {
                lp = mp;
                l = skip;
            }
        }

        rp
    }

    /// Half-open rank range of suffixes starting with `query`: the first
    /// occurrence of the query paired with the first occurrence of its
    /// successor string.
    fn rank_range(&self, query: &[u8]) -> (usize, usize) {
        let lo = self.first_occurrence(query);
        let hi = match successor(query) {
            Some(next) => self.first_occurrence(&next),
            // Query was all 0xFF bytes: nothing sorts between it and the top
            None => self.corpus().len(),
        };
        (lo, hi.max(lo))
    }

    /// All offsets where `query` occurs, ascending.
    pub fn search(&self, query: &[u8]) -> Result<Vec<usize>> {
        let (lo, hi) = self.rank_range(query);
        let sa = self.base.sa();
        let mut offsets: Vec<usize> = (lo..hi).map(|rank| sa.at(rank)).collect();
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
        self.corpus().char_at(i)
    }

    /// Plain layout followed by the LCP-L and LCP-R tables.
    pub fn serialize<W: Write>(&self, out: &mut W) -> io::Result<usize> {
        let mut written = self.base.serialize(out)?;
        written += self.lcp_l.serialize(out)?;
        written += self.lcp_r.serialize(out)?;
        Ok(written)
    }

    /// Read back what [`AugmentedSuffixArrayIndex::serialize`] wrote.
    pub fn deserialize<R: Read>(input: &mut R) -> io::Result<Self> {
        let (corpus, sa) = read_corpus_and_sa(input)?;
        let n = corpus.len();
        let lcp_l = BitPackedArray::deserialize(input)?;
        let lcp_r = BitPackedArray::deserialize(input)?;
        if lcp_l.len() as usize != n - 1 || lcp_r.len() as usize != n - 1 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "LCP side tables do not match corpus length",
            ));
        }
        Ok(AugmentedSuffixArrayIndex {
            base: SuffixArrayIndex::from_parts(corpus, sa),
            lcp_l,
            lcp_r,
        })
    }
}

/// Fill the side tables over the bisection of `[l, r)`, returning the LCP of
/// the two fence suffixes. `adjacent[k]` pairs ranks `k` and `k + 1`; the
/// entry at `n - 1` is the virtual top fence. Recursion depth is O(log n).
fn precompute(adjacent: &[usize], lcp_l: &mut [u64], lcp_r: &mut [u64], l: usize, r: usize) -> u64 {
    if l == r - 1 {
        return adjacent[l] as u64;
    }
    let c = (l + r) / 2;
    lcp_l[c - 1] = precompute(adjacent, lcp_l, lcp_r, l, c);
    lcp_r[c - 1] = precompute(adjacent, lcp_l, lcp_r, c, r);
    lcp_l[c - 1].min(lcp_r[c - 1])
}

/// The smallest byte string greater than every string that has `query` as a
/// prefix: increment the last byte, carrying left over 0xFF bytes. `None`
/// when every byte carries out.
fn successor(query: &[u8]) -> Option<Vec<u8>> {
    let mut next = query.to_vec();
    while let Some(&last) = next.last() {
        if last == u8::MAX {
            next.pop();
        } else {
            *next.last_mut().expect("nonempty") = last + 1;
            return Some(next);
        }
    }
    None
}
