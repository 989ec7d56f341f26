//! Bulk byte-equality primitives shared by the dictionary walkers.
//!
//! Translated from LzFind.c:
//!   - Lines 1310–1331: `AOCL_FIND_MATCHING_BYTES_LEN` → [`find_matching_bytes_len`]
//!   - Lines 1843–1848: `UPDATE_maxLen`                → [`update_max_len`]

use super::types::get_u32;

/// Extend a match from `len` toward `limit`, comparing `data1` and `data2`
/// in 4-byte chunks and locating the first differing byte with
/// count-trailing-zeros on the XOR.  Never reads past `limit` in 1-byte
/// mode; the 4-byte loop stops at `limit - 4`.
///
/// Returns the byte index of the first mismatch, or at least `len` if the
/// inputs already differ there (the caller guarantees `data1[..len] ==
/// data2[..len]` when it matters).
///
/// Equivalent to `AOCL_FIND_MATCHING_BYTES_LEN`.
#[inline]
pub fn find_matching_bytes_len(
    mut len: usize,
    limit: usize,
    data1: &[u8],
    data2: &[u8],
) -> usize {
    if limit >= 4 {
        let len_limit4 = limit - 4;
        while len <= len_limit4 {
            let c1 = get_u32(data2, len);
            let c2 = get_u32(data1, len);
            let d = c1 ^ c2;
            if d != 0 {
                return len + (d.trailing_zeros() >> 3) as usize;
            }
            len += 4;
        }
    }
    while len < limit {
        if data2[len] != data1[len] {
            break;
        }
        len += 1;
    }
    len
}

/// Extend `max_len` toward `len_limit` by comparing the cursor bytes at
/// `cur` against the candidate at distance `d2`, one byte at a time.
///
/// Equivalent to `UPDATE_maxLen`.
#[inline(always)]
pub(crate) fn update_max_len(
    buf: &[u8],
    cur: usize,
    d2: u32,
    max_len: u32,
    len_limit: u32,
) -> u32 {
    let cand = cur - d2 as usize;
    let mut c = max_len as usize;
    let lim = len_limit as usize;
    while c != lim {
        if buf[cand + c] != buf[cur + c] {
            break;
        }
        c += 1;
    }
    c as u32
}
