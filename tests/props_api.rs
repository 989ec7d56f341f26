//! Encoder-properties presets, normalization, validation, and the
//! 5-byte stream header.
//!
//! Ports the `LZMA_encPropsInit`, `LZMA_encPropsNormalize`,
//! `LZMA_encPropsGetDictSize`, and `LZMA_encSetProps` suites.

use anyhow::Result;
use lzfind::props::{MAX_SIZE_FOR_CE_HC_OFF, MIN_SIZE_FOR_CE_HC_ON};
use lzfind::{parse_props_bytes, EncProps, LzFindError};

#[test]
fn init_defaults() {
    let p = EncProps::default();
    assert_eq!(p.level, 5);
    assert_eq!(p.dict_size, 0);
    assert_eq!(p.mc, 0);
    assert_eq!(p.write_end_mark, 0);
    assert_eq!(p.lc, -1);
    assert_eq!(p.lp, -1);
    assert_eq!(p.pb, -1);
    assert_eq!(p.algo, -1);
    assert_eq!(p.fb, -1);
    assert_eq!(p.bt_mode, -1);
    assert_eq!(p.num_hash_bytes, -1);
    assert_eq!(p.src_len, 0);
    assert_eq!(p.cache_efficient_strategy, -1);
}

fn validate_defaults(p: &EncProps, level: i32) {
    assert_eq!(p.level, level);
    assert_eq!(p.lc, 3);
    assert_eq!(p.lp, 0);
    assert_eq!(p.pb, 2);
    if level < 5 {
        assert_eq!(p.algo, 0);
        assert_eq!(p.bt_mode, 0);
        assert_eq!(p.num_hash_bytes, 5);
    } else {
        assert_eq!(p.algo, 1);
        assert_eq!(p.bt_mode, 1);
        assert_eq!(p.num_hash_bytes, 4);
    }
    if level < 7 {
        assert_eq!(p.fb, 32);
        if p.bt_mode == 0 {
            assert_eq!(p.mc, 16);
        } else {
            assert_eq!(p.mc, 32);
        }
    } else {
        assert_eq!(p.fb, 64);
        assert_eq!(p.mc, 48);
    }
}

#[test]
fn normalize_defaults_per_level() {
    for level in 0..=9 {
        let mut p = EncProps {
            level,
            ..EncProps::default()
        };
        p.normalize_opt();
        validate_defaults(&p, level);

        let mut q = EncProps {
            level,
            ..EncProps::default()
        };
        q.normalize();
        validate_defaults(&q, level);
    }
}

#[test]
fn dict_size_presets() {
    // reference settings
    let reference: [u32; 10] = [
        65536, 262144, 1048576, 4194304, 8388608, 16777216, 33554432, 33554432, 67108864, 67108864,
    ];
    for level in 0..=9usize {
        let mut p = EncProps {
            level: level as i32,
            ..EncProps::default()
        };
        p.normalize();
        assert_eq!(p.dict_size, reference[level], "level {}", level);
    }

    // cache-efficient settings
    let optimized: [u32; 10] = [
        524288, 1048576, 2097152, 8388608, 16777216, 16777216, 33554432, 33554432, 67108864,
        67108864,
    ];
    for level in 0..=9usize {
        let mut p = EncProps {
            level: level as i32,
            cache_efficient_strategy: 1,
            ..EncProps::default()
        };
        p.normalize_opt();
        assert_eq!(p.dict_size, optimized[level], "level {}", level);
    }

    // cache-efficient strategy explicitly off: reference sizes
    for level in 0..=9usize {
        let mut p = EncProps {
            level: level as i32,
            cache_efficient_strategy: 0,
            ..EncProps::default()
        };
        p.normalize_opt();
        assert_eq!(p.dict_size, reference[level], "level {}", level);
    }
}

fn resolved_ces(bt_mode: i32, src_len: u64, num_hash_bytes: i32, ces: i32) -> i32 {
    let mut p = EncProps {
        bt_mode,
        src_len,
        num_hash_bytes,
        cache_efficient_strategy: ces,
        ..EncProps::default()
    };
    p.normalize_opt();
    p.cache_efficient_strategy
}

#[test]
fn cache_efficient_strategy_resolution() {
    assert_eq!(resolved_ces(1, MIN_SIZE_FOR_CE_HC_ON, 5, -1), 0); // btMode
    assert_eq!(resolved_ces(0, 0, 5, -1), 0); // unknown size
    assert_eq!(resolved_ces(0, MAX_SIZE_FOR_CE_HC_OFF - 1, 5, -1), 0);
    assert_eq!(resolved_ces(0, MAX_SIZE_FOR_CE_HC_OFF, 5, -1), 0); // mid range, 5-byte hash
    assert_eq!(resolved_ces(0, MAX_SIZE_FOR_CE_HC_OFF, 4, -1), 1); // mid range, 4-byte hash
    assert_eq!(resolved_ces(0, MIN_SIZE_FOR_CE_HC_ON, 5, -1), 1);
    assert_eq!(resolved_ces(0, MIN_SIZE_FOR_CE_HC_ON, 5, 1), 1); // explicit on
    assert_eq!(resolved_ces(0, MIN_SIZE_FOR_CE_HC_ON, 5, 0), 0); // explicit off
}

#[test]
fn reduce_size_caps_the_dictionary() {
    let mut p = EncProps {
        reduce_size: 1 << 16,
        ..EncProps::default()
    };
    p.normalize();
    assert_eq!(p.dict_size, 1 << 16);

    let mut q = EncProps {
        reduce_size: 1 << 16,
        ..EncProps::default()
    };
    q.normalize_opt();
    assert_eq!(q.dict_size, 1 << 16);
}

#[test]
fn reduce_size_floor_is_4k() {
    let k_reduce_min = 1u32 << 12;
    let mut p = EncProps {
        reduce_size: 1 << 10,
        ..EncProps::default()
    };
    p.normalize();
    assert_eq!(p.dict_size, k_reduce_min);

    let mut q = EncProps {
        reduce_size: 1 << 10,
        ..EncProps::default()
    };
    q.normalize_opt();
    assert_eq!(q.dict_size, k_reduce_min);
}

#[test]
fn user_settings_pass_through() {
    let user = EncProps {
        level: 4,
        dict_size: 1 << 16,
        lc: 2,
        lp: 1,
        pb: 1,
        algo: 1,
        fb: 32,
        bt_mode: 1,
        num_hash_bytes: 5,
        mc: 32,
        ..EncProps::default()
    };

    let mut p = user.clone();
    p.normalize();
    let mut q = user.clone();
    q.normalize_opt();
    for r in [&p, &q] {
        assert_eq!(r.level, 4);
        assert_eq!(r.dict_size, 1 << 16);
        assert_eq!(r.lc, 2);
        assert_eq!(r.lp, 1);
        assert_eq!(r.pb, 1);
        assert_eq!(r.algo, 1);
        assert_eq!(r.fb, 32);
        assert_eq!(r.bt_mode, 1);
        assert_eq!(r.num_hash_bytes, 5);
        assert_eq!(r.mc, 32);
    }
}

#[test]
fn minimum_dict_size_for_fixed_block_chains() {
    use lzfind::find::{K_HASH_GUARANTEE, HASH_CHAIN_SLOT_SZ_16, HASH_CHAIN_SLOT_SZ_8};

    let mut p = EncProps {
        bt_mode: 0,
        dict_size: K_HASH_GUARANTEE,
        level: 1,
        cache_efficient_strategy: 1,
        ..EncProps::default()
    };
    p.normalize_opt();
    assert_eq!(p.dict_size, K_HASH_GUARANTEE * HASH_CHAIN_SLOT_SZ_8 as u32);

    let mut q = EncProps {
        bt_mode: 0,
        dict_size: K_HASH_GUARANTEE,
        level: 2,
        cache_efficient_strategy: 1,
        ..EncProps::default()
    };
    q.normalize_opt();
    assert_eq!(q.dict_size, K_HASH_GUARANTEE * HASH_CHAIN_SLOT_SZ_16 as u32);
}

#[test]
fn get_dict_size_reports_user_value() {
    let p = EncProps {
        dict_size: 1 << 20,
        ..EncProps::default()
    };
    assert_eq!(p.get_dict_size(), 1 << 20);
}

#[test]
fn validation_rejects_out_of_range_fields() {
    type Mutate = fn(&mut EncProps);
    type Expect = fn(&LzFindError) -> bool;
    let cases: [(Mutate, Expect); 8] = [
        (|p| p.lc = 9, |e| matches!(e, LzFindError::InvalidLc(9))),
        (|p| p.lp = 5, |e| matches!(e, LzFindError::InvalidLp(5))),
        (|p| p.pb = 5, |e| matches!(e, LzFindError::InvalidPb(5))),
        (|p| p.fb = 4, |e| matches!(e, LzFindError::InvalidFb(4))),
        (|p| p.fb = 274, |e| matches!(e, LzFindError::InvalidFb(274))),
        (
            |p| p.mc = (1 << 30) + 1,
            |e| matches!(e, LzFindError::InvalidMc(_)),
        ),
        (
            |p| p.num_hash_bytes = 6,
            |e| matches!(e, LzFindError::InvalidNumHashBytes(6)),
        ),
        (
            |p| p.dict_size = 1 << 10,
            |e| matches!(e, LzFindError::InvalidDictSize(_)),
        ),
    ];
    for (mutate, expect) in cases {
        let mut p = EncProps::default();
        mutate(&mut p);
        p.normalize();
        let err = p.validate().unwrap_err();
        assert!(expect(&err), "unexpected error: {err}");
    }
}

#[test]
fn header_roundtrip() -> Result<()> {
    let mut p = EncProps {
        lc: 1,
        lp: 2,
        pb: 2,
        dict_size: 1 << 22,
        ..EncProps::default()
    };
    p.normalize();
    let bytes = p.write_props_bytes()?;
    assert_eq!(bytes[0], (2 * 5 + 2) * 9 + 1);
    assert_eq!(&bytes[1..5], &(1u32 << 22).to_le_bytes());

    let h = parse_props_bytes(&bytes)?;
    assert_eq!((h.lc, h.lp, h.pb, h.dict_size), (1, 2, 2, 1 << 22));
    Ok(())
}

#[test]
fn header_parse_errors() {
    assert!(matches!(
        parse_props_bytes(&[93, 0, 0]),
        Err(LzFindError::PropsTruncated)
    ));
    assert!(matches!(
        parse_props_bytes(&[230, 0, 0, 1, 0]),
        Err(LzFindError::PropsUnsupported)
    ));
}
