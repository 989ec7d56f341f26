//! Hash-mask computation and the H4/H5 collision guarantee.
//!
//! Ports the `LZMA_hashMaskLimit` and `LZMA_hashMaskCollision` suites.

use lzfind::find::hash::hash5_calc_nofix3;
use lzfind::find::{build_crc_table, K_HASH_GUARANTEE};
use lzfind::compute_hash_mask;

// Mask must be of the form 00..011..1 (or all zeros / all ones).
fn is_contiguous(mask: u32) -> bool {
    mask.leading_zeros() + (!mask).trailing_zeros() == 32
}

fn assert_mask_valid(mask: u32, block_cnt: u32) {
    assert!(mask < block_cnt, "mask {:#x} >= block_cnt {:#x}", mask, block_cnt);
    assert!(is_contiguous(mask));
}

fn assert_mask_invalid(mask: u32, block_cnt: u32) {
    assert!(mask >= block_cnt);
    assert!(is_contiguous(mask));
}

#[test]
fn pow2_size() {
    let sz = 1u32 << 20;
    let block_cnt = sz / 8;
    assert_mask_valid(compute_hash_mask(sz, block_cnt), block_cnt);
}

#[test]
fn pow2_size_mask_value() {
    // the concrete case: 2^20 blocks sized from input (1<<20)-1 gives the
    // full 20-bit mask
    let block_cnt = 1u32 << 20;
    let mask = compute_hash_mask((1 << 20) - 1, block_cnt);
    assert_eq!(mask, 0xFFFFF);
    assert!(mask < block_cnt);
}

#[test]
fn pow_gt2_size() {
    let sz = (1u32 << 20) + 1;
    let block_cnt = sz / 8;
    assert_mask_valid(compute_hash_mask(sz, block_cnt), block_cnt);
}

#[test]
fn pow_lt2_size() {
    let sz = (1u32 << 20) - 1;
    let block_cnt = sz / 8;
    assert_mask_valid(compute_hash_mask(sz, block_cnt), block_cnt);
}

#[test]
fn block_cnt_greater_than_size() {
    let sz = 1u32 << 20;
    let block_cnt = sz >> 1;
    assert_mask_valid(compute_hash_mask(sz, block_cnt), block_cnt);
}

#[test]
fn random_size() {
    let sz = 0x1F5_03F0u32;
    let block_cnt = (sz << 1) - 123;
    assert_mask_valid(compute_hash_mask(sz, block_cnt), block_cnt);
}

#[test]
fn min_size() {
    let sz = K_HASH_GUARANTEE - 1;
    let block_cnt = K_HASH_GUARANTEE;
    assert_mask_valid(compute_hash_mask(sz, block_cnt), block_cnt);
}

#[test]
fn neg_min_size() {
    // block counts below the guarantee cannot produce a usable mask
    let sz = K_HASH_GUARANTEE - 1;
    let block_cnt = K_HASH_GUARANTEE - 1;
    assert_mask_invalid(compute_hash_mask(sz, block_cnt), block_cnt);
}

#[test]
fn max_size() {
    let sz = u32::MAX;
    let block_cnt = sz;
    assert_mask_valid(compute_hash_mask(sz, block_cnt), block_cnt);
}

#[test]
fn size_zero() {
    let sz = 0;
    let block_cnt = K_HASH_GUARANTEE;
    assert_mask_valid(compute_hash_mask(sz, block_cnt), block_cnt);
}

// ─────────────────────────────────────────────────────────────────────────────
// Collision guarantee: two cursors colliding on H5 share bytes 1 and 2
// whenever the mask keeps at least 16 bits.
// ─────────────────────────────────────────────────────────────────────────────

// Returns true iff every (b1, b2) pair hashing to the reference value has
// b1 == cur[1] and b2 == cur[2].
fn collision_guarantee_holds(cur: [u8; 5], crc: &[u32; 256], mask: u32) -> bool {
    let (_, reference) = hash5_calc_nofix3(crc, &cur, mask);
    for b1 in 0..=255u8 {
        for b2 in 0..=255u8 {
            let probe = [cur[0], b1, b2, cur[3], cur[4]];
            let (_, hv) = hash5_calc_nofix3(crc, &probe, mask);
            if hv == reference && (b1, b2) != (cur[1], cur[2]) {
                return false;
            }
        }
    }
    true
}

#[test]
fn h5_collisions_share_bytes_1_and_2() {
    let crc = build_crc_table();
    let cur = *b"xabyz";
    assert!(collision_guarantee_holds(cur, &crc, (1 << 19) - 1));
    assert!(collision_guarantee_holds(cur, &crc, u32::MAX));
    assert!(collision_guarantee_holds(cur, &crc, (1 << 16) - 1));
}

#[test]
fn h5_guarantee_breaks_below_16_bits() {
    // a 15-bit mask folds bit 15 away: the (b1, b2) pair differing only
    // in that bit collides
    let crc = build_crc_table();
    let cur = *b"xabyz";
    assert!(!collision_guarantee_holds(cur, &crc, (1 << 15) - 1));
}
