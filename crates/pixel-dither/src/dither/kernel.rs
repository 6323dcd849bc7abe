//! Error diffusion kernels.
//!
//! Each kernel lists the not-yet-visited neighbors that receive a share of a
//! pixel's quantization residual. All five kernels here propagate the full
//! residual (weights sum to the divisor).

/// An error diffusion kernel.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// `(dx, dy, weight)`: `dx` is flipped on reversed rows, `dy` is always
    /// below or on the current row.
    pub entries: &'static [(i32, i32, u8)],
    /// Each neighbor receives `residual * weight / divisor`.
    pub divisor: u8,
    /// Rows reached below the current one; the error buffer holds `max_dy + 1`.
    pub max_dy: usize,
}

/// ```text
///        X   7
///    3   5   1     / 16
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)],
    divisor: 16,
    max_dy: 1,
};

/// ```text
///            X   8   4
///    2   4   8   4   2     / 32
/// ```
pub const BURKES: Kernel = Kernel {
    entries: &[
        (1, 0, 8),
        (2, 0, 4),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 8),
        (1, 1, 4),
        (2, 1, 2),
    ],
    divisor: 32,
    max_dy: 1,
};

/// ```text
///            X   8   4
///    2   4   8   4   2
///    1   2   4   2   1     / 42
/// ```
pub const STUCKI: Kernel = Kernel {
    entries: &[
        (1, 0, 8),
        (2, 0, 4),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 8),
        (1, 1, 4),
        (2, 1, 2),
        (-2, 2, 1),
        (-1, 2, 2),
        (0, 2, 4),
        (1, 2, 2),
        (2, 2, 1),
    ],
    divisor: 42,
    max_dy: 2,
};

/// Sierra two-row.
///
/// ```text
///            X   4   3
///    1   2   3   2   1     / 16
/// ```
pub const SIERRA_TWO_ROW: Kernel = Kernel {
    entries: &[
        (1, 0, 4),
        (2, 0, 3),
        (-2, 1, 1),
        (-1, 1, 2),
        (0, 1, 3),
        (1, 1, 2),
        (2, 1, 1),
    ],
    divisor: 16,
    max_dy: 1,
};

/// ```text
///        X   2
///    1   1         / 4
/// ```
pub const SIERRA_LITE: Kernel = Kernel {
    entries: &[(1, 0, 2), (-1, 1, 1), (0, 1, 1)],
    divisor: 4,
    max_dy: 1,
};

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [(&str, Kernel); 5] = [
        ("floyd-steinberg", FLOYD_STEINBERG),
        ("burkes", BURKES),
        ("stucki", STUCKI),
        ("sierra-2", SIERRA_TWO_ROW),
        ("sierra-lite", SIERRA_LITE),
    ];

    #[test]
    fn test_full_propagation() {
        for (name, kernel) in ALL {
            let sum: u32 = kernel.entries.iter().map(|e| e.2 as u32).sum();
            assert_eq!(sum, kernel.divisor as u32, "{name} does not propagate 100%");
        }
    }

    #[test]
    fn test_max_dy_matches_entries() {
        for (name, kernel) in ALL {
            let actual = kernel
                .entries
                .iter()
                .map(|e| e.1 as usize)
                .max()
                .unwrap_or(0);
            assert_eq!(actual, kernel.max_dy, "{name} max_dy mismatch");
        }
    }

    #[test]
    fn test_only_forward_neighbors() {
        for (name, kernel) in ALL {
            for &(dx, dy, _) in kernel.entries {
                assert!(dy > 0 || dx > 0, "{name} diffuses into a visited pixel");
            }
        }
    }
}
