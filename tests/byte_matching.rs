//! Byte-matching primitive against a bytewise oracle.
//!
//! Ports the `LZMA_byteMatching` suite: the chunked ctz comparator must
//! agree with a plain byte loop on every mismatch offset, start length,
//! and limit, including limits shorter than one 4-byte chunk and start
//! lengths already past the limit.

use lzfind::find::compare::find_matching_bytes_len;

// Bytewise reference comparator.
fn org_find_match(start: usize, pb: &[u8], cur: &[u8], limit: usize) -> usize {
    let mut len = start;
    while len < limit {
        if pb[len] != cur[len] {
            break;
        }
        len += 1;
    }
    len
}

fn check(start: usize, pb: &[u8], cur: &[u8], limit: usize) {
    assert_eq!(
        find_matching_bytes_len(start, limit, pb, cur),
        org_find_match(start, pb, cur, limit),
        "start={} limit={} pb={:?}",
        start,
        limit,
        std::str::from_utf8(pb)
    );
}

#[test]
fn match_common() {
    // all-equal inputs at every start length (trailing NUL included, as
    // in the C fixture's string literals)
    let len_limit = 9;
    for len in 0..8 {
        check(len, b"abcd1234\0", b"abcd1234\0", len_limit);
    }
}

#[test]
fn mismatch_common() {
    let cur = b"abcd1234\0";
    check(0, b"abcd0234\0", cur, 9);
    check(0, b"abcd1034\0", cur, 9);
    check(0, b"abcd1204\0", cur, 9);
    check(0, b"abcd1230\0", cur, 9);
}

#[test]
fn mismatch_at_four_returns_four() {
    // "abcd1234" vs "abcd0234" diverges at index 4
    assert_eq!(find_matching_bytes_len(0, 8, b"abcd0234", b"abcd1234"), 4);
}

#[test]
fn short_str_common() {
    let cur = b"abcd1234\0";
    check(0, b"abc\0", cur, 3);
    check(0, b"ab\0", cur, 2);
    check(0, b"a\0", cur, 1);
}

#[test]
fn len_limit_common() {
    let cur = b"abcd1234\0";
    check(0, b"abcd1xyz\0", cur, 5);
    check(0, b"abcd0xyz\0", cur, 5);
}

#[test]
fn long_str_common() {
    let cur = b"qwertyuiopasdfghjklzxcvbnm\0";
    check(0, b"qwertyuiopasdfghjklzxcvbnm\0", cur, 9);
    check(0, b"qwertyuiopasfghjkl0xcvbnm\0", cur, 9);
}

#[test]
fn rem_bytes_common() {
    // limit below one chunk: the scalar tail does all the work
    let cur = b"qwer\0";
    check(1, b"xwer\0", cur, 4);
    check(1, b"qxer\0", cur, 4);
    check(1, b"qwxr\0", cur, 4);
    check(1, b"qwex\0", cur, 4);
}

#[test]
fn len_limit_short_common() {
    for limit in 0..4 {
        check(0, b"abcd1234\0", b"abcd1234\0", limit);
    }
}

#[test]
fn len_greater_than_limit_common() {
    // start length already past the limit: returned unchanged
    check(7, b"abcd1234\0", b"abcd1234\0", 5);
}
