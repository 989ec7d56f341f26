//! Interleaved (reference-layout) hash-chain walkers.
//!
//! The dictionary is a set of singly linked lists woven through one
//! `cyclicBufferSize`-slot array: `son[x]` holds the position of the next
//! older chain member, or `0` when no link exists.  Root nodes come from
//! the hash head table.  Link values are positions, not indices; each
//! access translates position deltas to cyclic slots.
//!
//! ```text
//! abcdef...1234....abcdexy...123...abcd....
//! <----------------<---------------
//!          <-----------------
//! ```
//!
//! Translated from LzFind.c:
//!   - Lines 1094–1174: `Hc_GetMatchesSpec`      → [`hc_get_matches_spec`]
//!   - Lines 1490–1550: `AOCL_Hc_GetMatchesSpec` → [`hc_get_matches_spec_guarded`]

use super::types::prefetch_read;

/// Walk the chain rooted at `cur_match`, recording every strictly longer
/// match as a `(len, delta - 1)` pair in `d`, and insert `pos` by linking
/// the old root at the current cyclic slot.  Requires `len_limit >
/// max_len`.  Returns the number of `u32` values written.
///
/// `cut_value` caps the nodes examined; the walk also stops at the chain
/// end (position 0) or once `delta` leaves the cyclic range.
///
/// Equivalent to `Hc_GetMatchesSpec`.
pub fn hc_get_matches_spec(
    len_limit: u32,
    mut cur_match: u32,
    pos: u32,
    buf: &[u8],
    cur: usize,
    son: &mut [u32],
    cyclic_buffer_pos: u32,
    cyclic_buffer_size: u32,
    mut cut_value: u32,
    d: &mut [u32],
    mut max_len: u32,
) -> usize {
    let lim = len_limit as usize; // do not check for length beyond this
    son[cyclic_buffer_pos as usize] = cur_match; // add cur_match to dictionary
    let mut dn = 0usize;
    loop {
        if cur_match == 0 {
            break;
        }
        let delta = pos.wrapping_sub(cur_match);
        if delta >= cyclic_buffer_size {
            // offset is beyond the search buffer
            break;
        }
        {
            let next_slot = cyclic_buffer_pos
                + (if delta > cyclic_buffer_pos {
                    cyclic_buffer_size
                } else {
                    0
                })
                - delta;
            cur_match = son[next_slot as usize]; // next older position in this chain
            let cand = cur - delta as usize;
            // cur[0..max_len-1] already matched at emission time; check
            // from cur[max_len] first and the front byte before scanning
            if buf[cur + max_len as usize] == buf[cand + max_len as usize]
                && buf[cand] == buf[cur]
            {
                let mut len = 0usize;
                while buf[cur + len] == buf[cand + len] {
                    len += 1;
                    if len == lim {
                        // reached len_limit: no need to match further
                        d[dn] = lim as u32;
                        d[dn + 1] = delta - 1;
                        return dn + 2;
                    }
                }
                if (max_len as usize) < len {
                    max_len = len as u32;
                    d[dn] = len as u32;
                    d[dn + 1] = delta - 1;
                    dn += 2;
                }
            }
        }
        cut_value -= 1;
        if cut_value == 0 {
            break;
        }
    }
    dn
}

/// [`hc_get_matches_spec`] with the chain-entry check hoisted out of the
/// loop and a prefetch hint on the cursor.
///
/// Equivalent to `AOCL_Hc_GetMatchesSpec` (changes wrt the reference:
/// `curMatch > 0 && delta < cyclicBufferSize` before entering the loop,
/// `__builtin_prefetch(cur)`).
pub fn hc_get_matches_spec_guarded(
    len_limit: u32,
    mut cur_match: u32,
    pos: u32,
    buf: &[u8],
    cur: usize,
    son: &mut [u32],
    cyclic_buffer_pos: u32,
    cyclic_buffer_size: u32,
    mut cut_value: u32,
    d: &mut [u32],
    mut max_len: u32,
) -> usize {
    let lim = len_limit as usize;
    son[cyclic_buffer_pos as usize] = cur_match;
    let mut dn = 0usize;

    let mut delta = pos.wrapping_sub(cur_match);
    if cur_match > 0 && delta < cyclic_buffer_size {
        prefetch_read(buf, cur);
        loop {
            {
                let next_slot = cyclic_buffer_pos
                    + (if delta > cyclic_buffer_pos {
                        cyclic_buffer_size
                    } else {
                        0
                    })
                    - delta;
                cur_match = son[next_slot as usize];
                let cand = cur - delta as usize;
                // a match of max_len exists already; check cur[max_len]
                // first so shorter candidates cost one compare
                if buf[cur + max_len as usize] == buf[cand + max_len as usize] {
                    let mut len = 0usize;
                    loop {
                        if buf[cur + len] != buf[cand + len] {
                            break;
                        }
                        len += 1;
                        if len == lim {
                            d[dn] = lim as u32;
                            d[dn + 1] = delta - 1;
                            return dn + 2;
                        }
                    }
                    if (max_len as usize) < len {
                        max_len = len as u32;
                        d[dn] = len as u32;
                        d[dn + 1] = delta - 1;
                        dn += 2;
                    }
                }
            }

            if cur_match == 0 {
                break;
            }
            delta = pos.wrapping_sub(cur_match);
            // an empty link reads as position 0, pushing delta out of the
            // cyclic range: search completed
            if delta >= cyclic_buffer_size {
                break;
            }
            cut_value -= 1;
            if cut_value == 0 {
                break;
            }
        }
    }
    dn
}
