//! On-disk persistence: build, write, reload, and query through real files
//! under the per-backend file-suffix conventions.

use super::common::{corpus, ALL_KINDS};
use pullstar::TextIndex;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

#[test]
fn indexes_reload_from_disk_identically() {
    let dir = tempfile::tempdir().unwrap();
    let shared = corpus(b"abracadabra");

    for kind in ALL_KINDS {
        let index = TextIndex::build(shared.clone(), kind).unwrap();

        let path = dir
            .path()
            .join(format!("corpus{}", kind.file_suffix()));
        let mut out = BufWriter::new(File::create(&path).unwrap());
        index.serialize(&mut out).unwrap();
        out.flush().unwrap();

        let mut reader = BufReader::new(File::open(&path).unwrap());
        let restored = TextIndex::deserialize(kind, &mut reader).unwrap();

        for query in [b"abra".as_slice(), b"a", b"bra", b"cad", b"zzz"] {
            assert_eq!(
                restored.search(query).unwrap(),
                index.search(query).unwrap(),
                "query {:?} on {:?}",
                query,
                kind
            );
        }
    }
}

#[test]
fn file_suffixes_do_not_collide() {
    let suffixes: Vec<_> = ALL_KINDS.iter().map(|k| k.file_suffix()).collect();
    let mut unique = suffixes.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), suffixes.len());
}

#[test]
fn loading_an_empty_file_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    for kind in ALL_KINDS {
        let path = dir.path().join(format!("empty{}", kind.file_suffix()));
        File::create(&path).unwrap();
        let mut reader = BufReader::new(File::open(&path).unwrap());
        assert!(TextIndex::deserialize(kind, &mut reader).is_err());
    }
}
