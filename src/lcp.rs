//! Kasai-style LCP construction from the corpus and its suffix array.
//!
//! One linear walk in text order, carrying a monotone counter that drops by
//! at most one per step. Scratch is a single inverse-suffix-array vector.
//!
//! Two indexing conventions coexist on purpose:
//!
//! - [`lcp_tree`] stores the value at `isa[i]`, i.e. `lcp[r]` is the common
//!   prefix of the suffixes ranked `r - 1` and `r`, with `lcp[0] = 0`. This
//!   is the shape the bottom-up suffix-tree builder consumes.
//! - [`lcp_adjacent`] stores the same values shifted down one slot:
//!   `lcp[k]` is the common prefix of the suffixes ranked `k` and `k + 1`
//!   (length `n - 1`). This is the shape the LCP-interval bisection of the
//!   augmented suffix-array index consumes.

use crate::text::Corpus;

/// Inverse permutation of the suffix array: `isa[sa[r]] = r`.
pub fn inverse(sa: &[usize]) -> Vec<usize> {
    let mut isa = vec![0usize; sa.len()];
    for (rank, &pos) in sa.iter().enumerate() {
        isa[pos] = rank;
    }
    isa
}

/// LCP array in rank order: `lcp[r] = |lcp(T[sa[r-1]..], T[sa[r]..])|`,
/// `lcp[0] = 0`.
pub fn lcp_tree(corpus: &Corpus, sa: &[usize]) -> Vec<usize> {
    let n = corpus.len();
    let text = corpus.bytes();
    let isa = inverse(sa);

    let mut lcp = vec![0usize; n];
    let mut run = 0usize;
    // Skip the sentinel position: its suffix has rank 0 and no predecessor.
    for i in 0..n - 1 {
        let rank = isa[i];
        let j = sa[rank - 1];
        while i + run < n - 1 && j + run < n - 1 && text[i + run] == text[j + run] {
            run += 1;
        }
        lcp[rank] = run;
        run = run.saturating_sub(1);
    }
    lcp
}

/// Adjacent-pair LCPs: `lcp[k] = |lcp(T[sa[k]..], T[sa[k+1]..])|`, length
/// `n - 1`.
pub fn lcp_adjacent(corpus: &Corpus, sa: &[usize]) -> Vec<usize> {
    let mut lcp = lcp_tree(corpus, sa);
    lcp.remove(0);
    lcp
}
