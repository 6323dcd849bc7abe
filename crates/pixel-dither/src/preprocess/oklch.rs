//! Oklch, the polar form of Oklab, used for hue-preserving saturation.

use crate::color::Oklab;

/// Lightness, chroma and hue (radians). Achromatic colors get hue 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Oklch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

impl Oklch {
    /// Multiply chroma by `factor`, never below zero.
    #[inline]
    pub fn scale_chroma(self, factor: f64) -> Self {
        Self {
            c: (self.c * factor).max(0.0),
            ..self
        }
    }
}

impl From<Oklab> for Oklch {
    fn from(lab: Oklab) -> Self {
        Self {
            l: lab.l,
            c: lab.a.hypot(lab.b),
            h: lab.b.atan2(lab.a),
        }
    }
}

impl From<Oklch> for Oklab {
    fn from(lch: Oklch) -> Self {
        let (sin, cos) = lch.h.sin_cos();
        Oklab::new(lch.l, lch.c * cos, lch.c * sin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for lab in [
            Oklab::new(0.5, 0.1, 0.0),
            Oklab::new(0.5, -0.1, -0.1),
            Oklab::new(0.2, -0.02, 0.05),
        ] {
            let back = Oklab::from(Oklch::from(lab));
            assert!((back.l - lab.l).abs() < 1e-12);
            assert!((back.a - lab.a).abs() < 1e-12);
            assert!((back.b - lab.b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_gray_has_no_chroma() {
        let lch = Oklch::from(Oklab::new(0.5, 0.0, 0.0));
        assert_eq!(lch.c, 0.0);
        assert!(!lch.h.is_nan());
        assert_eq!(lch.scale_chroma(3.0).c, 0.0);
    }

    #[test]
    fn test_scale_chroma_keeps_hue() {
        let base = Oklch {
            l: 0.6,
            c: 0.1,
            h: 1.0,
        };
        assert_eq!(base.scale_chroma(-2.0).c, 0.0);
        let lch = base.scale_chroma(1.5);
        assert!((lch.c - 0.15).abs() < 1e-12);
        assert_eq!(lch.h, 1.0);
        assert_eq!(lch.l, 0.6);
    }
}
