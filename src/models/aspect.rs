/// Width that keeps the `src_w:src_h` ratio at `target_h` rows, rounded to
/// the nearest column and never 0.
pub fn aspect_fit_width(src_w: u32, src_h: u32, target_h: u32) -> u32 {
    scale_side(src_w, src_h, target_h)
}

/// Height that keeps the `src_w:src_h` ratio at `target_w` columns.
pub fn aspect_fit_height(src_w: u32, src_h: u32, target_w: u32) -> u32 {
    scale_side(src_h, src_w, target_w)
}

fn scale_side(side: u32, reference: u32, target: u32) -> u32 {
    if reference == 0 {
        return target.max(1);
    }
    let (side, reference, target) = (u64::from(side), u64::from(reference), u64::from(target));
    let scaled = (side * target + reference / 2) / reference;
    scaled.clamp(1, u64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_ratio() {
        assert_eq!(aspect_fit_width(320, 200, 100), 160);
        assert_eq!(aspect_fit_height(320, 200, 160), 100);
    }

    #[test]
    fn test_rounds_to_nearest() {
        // 3:2 at one row is 1.5 columns
        assert_eq!(aspect_fit_width(3, 2, 1), 2);
        assert_eq!(aspect_fit_width(10, 3, 1), 3);
    }

    #[test]
    fn test_never_zero() {
        assert_eq!(aspect_fit_width(1, 100, 10), 1);
        assert_eq!(aspect_fit_width(0, 10, 10), 1);
        assert_eq!(aspect_fit_width(10, 0, 8), 8);
    }
}
