//! Error type for match-finder construction and encoder-properties handling.
//!
//! The C sources report failures through `SRes` codes (`SZ_ERROR_PARAM`,
//! `SZ_ERROR_MEM`) and NULL returns from `MatchFinder_Create` /
//! `LzmaEnc_SetProps`.  The Rust port folds those into one library error
//! enum; stream-read failures are *not* represented here: they latch on
//! the window (see [`crate::find::MatchFinder::stream_result`]) exactly as
//! `p->result` does in C.

use thiserror::Error;

/// Errors returned by dictionary construction and properties validation.
#[derive(Debug, Error)]
pub enum LzFindError {
    /// `lc` outside `0..=8`.
    #[error("invalid literal-context bits lc={0} (expected 0..=8)")]
    InvalidLc(i32),

    /// `lp` outside `0..=4`.
    #[error("invalid literal-position bits lp={0} (expected 0..=4)")]
    InvalidLp(i32),

    /// `pb` outside `0..=4`.
    #[error("invalid position-state bits pb={0} (expected 0..=4)")]
    InvalidPb(i32),

    /// `fb` outside `5..=273`.
    #[error("invalid fast-bytes fb={0} (expected 5..=273)")]
    InvalidFb(i32),

    /// `mc` outside `1..=2^30`.
    #[error("invalid cut-value mc={0} (expected 1..=1073741824)")]
    InvalidMc(u32),

    /// `numHashBytes` outside `2..=5`.
    #[error("invalid hash width numHashBytes={0} (expected 2..=5)")]
    InvalidNumHashBytes(i32),

    /// `btMode` not 0 or 1.
    #[error("invalid btMode={0} (expected 0 or 1)")]
    InvalidBtMode(i32),

    /// Dictionary size outside `[4 KiB, 3 GiB]`.
    #[error("invalid dictionary size {0} (expected 4 KiB..=3 GiB)")]
    InvalidDictSize(u32),

    /// Window sizing would overflow 32-bit arithmetic, or the configured
    /// history leaves too little headroom under 4 GiB to be usable.
    /// Corresponds to `GetBlockSize` returning 0.
    #[error("window configuration overflows 32-bit block sizing")]
    WindowTooLarge,

    /// An allocation for the window or a dictionary table failed.  All
    /// previously allocated arrays of the dictionary have been released.
    #[error("dictionary allocation failed")]
    Alloc,

    /// Encoded properties byte is >= 225, i.e. `(pb*5 + lp)*9 + lc` does
    /// not decompose into valid fields.
    #[error("unsupported LZMA properties byte")]
    PropsUnsupported,

    /// Properties header shorter than the required 5 bytes.
    #[error("LZMA properties header truncated")]
    PropsTruncated,
}
