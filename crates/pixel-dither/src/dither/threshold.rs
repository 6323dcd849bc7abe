//! Threshold maps for ordered and pattern dithering.
//!
//! Every map yields a rank `r` in `0..levels` for a pixel position; the
//! perturbation threshold is `r / (levels - 1) - 0.5`, in [-0.5, 0.5].

use super::DitherMethod;

#[rustfmt::skip]
const BAYER_4: [[u8; 4]; 4] = [
    [ 0,  8,  2, 10],
    [12,  4, 14,  6],
    [ 3, 11,  1,  9],
    [15,  7, 13,  5],
];

const BAYER_8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

// Two clustered dots per tile on a 45° screen
const HALFTONE_8: [[u8; 8]; 8] = [
    [24, 10, 12, 26, 35, 47, 49, 37],
    [8, 0, 2, 14, 45, 59, 61, 51],
    [22, 6, 4, 16, 43, 57, 63, 53],
    [30, 20, 18, 28, 33, 41, 55, 39],
    [34, 46, 48, 36, 25, 11, 13, 27],
    [44, 58, 60, 50, 9, 1, 3, 15],
    [42, 56, 62, 52, 23, 7, 5, 17],
    [32, 40, 54, 38, 31, 21, 19, 29],
];

const LINE_PERIOD: usize = 4;

/// `(rank, levels)` at `(x, y)`, or `None` for non-ordered methods.
fn rank(method: DitherMethod, x: usize, y: usize) -> Option<(usize, usize)> {
    let p = LINE_PERIOD;
    let r = match method {
        DitherMethod::Bayer4 => (BAYER_4[y % 4][x % 4] as usize, 16),
        DitherMethod::Bayer8 => (BAYER_8[y % 8][x % 8] as usize, 64),
        DitherMethod::Halftone => (HALFTONE_8[y % 8][x % 8] as usize, 64),
        DitherMethod::DiagonalLines => ((x + y) % p, p),
        DitherMethod::CrossHatch => {
            let diag = (x + y) % p;
            // (x - y) mod p without underflow
            let anti = (x % p + p - y % p) % p;
            (diag.min(anti), p)
        }
        DitherMethod::Grid => ((x % p).min(y % p), p),
        _ => return None,
    };
    Some(r)
}

/// Perturbation threshold in [-0.5, 0.5] for `(x, y)`, tiled across the image.
pub fn ordered_threshold(method: DitherMethod, x: usize, y: usize) -> Option<f64> {
    rank(method, x, y).map(|(r, levels)| r as f64 / (levels - 1) as f64 - 0.5)
}
