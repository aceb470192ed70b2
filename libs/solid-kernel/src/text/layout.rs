//! # Text Layout
//!
//! Places glyph outlines along a baseline and aligns the result.
//!
//! Glyphs arrive in font units from a [`GlyphSource`]. Layout scales them by
//! `size / units_per_em`, advances a pen (rightwards for LTR, leftwards for
//! RTL), then shifts everything so the advance box and the ascender /
//! descender lines meet the requested alignment.

use config::constants::MISSING_GLYPH_ADVANCE_EM;
use glam::DVec2;
use tracing::debug;

use super::{Direction, HAlign, TextParams, VAlign};
use crate::error::{KernelError, Result};
use crate::geometry::Ring;

/// Vertical metrics of a font, in font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Font units per em.
    pub units_per_em: f64,
    /// Ascender height above the baseline.
    pub ascender: f64,
    /// Descender depth, negative below the baseline.
    pub descender: f64,
}

/// One glyph's flattened contours and advance, in font units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphOutline {
    /// Horizontal advance.
    pub advance: f64,
    /// Closed contours relative to the glyph origin.
    pub contours: Vec<Vec<DVec2>>,
}

/// Per-glyph access to a font.
pub trait GlyphSource {
    /// Vertical metrics.
    fn metrics(&self) -> FontMetrics;

    /// Outline of `ch`, or `None` if the font has no glyph for it.
    fn glyph(&self, ch: char, curve_steps: usize) -> Option<GlyphOutline>;
}

/// Lays out `text` and returns every contour as a ring in model units.
///
/// Control characters are skipped. Characters without a glyph advance by a
/// fraction of an em. Contours that collapse during flattening are dropped.
pub fn layout_text(
    source: &dyn GlyphSource,
    text: &str,
    params: &TextParams,
    curve_steps: usize,
) -> Result<Vec<Ring>> {
    let metrics = source.metrics();
    if metrics.units_per_em <= 0.0 {
        return Err(KernelError::resource("font reports zero units per em"));
    }
    let scale = params.size / metrics.units_per_em;

    // Pen positions in font units.
    let mut placed: Vec<(f64, GlyphOutline)> = Vec::new();
    let mut pen = 0.0;
    for ch in text.chars().filter(|c| !c.is_control()) {
        let glyph = source.glyph(ch, curve_steps).unwrap_or_else(|| {
            debug!(?ch, "no glyph, advancing blank");
            GlyphOutline {
                advance: MISSING_GLYPH_ADVANCE_EM * metrics.units_per_em,
                contours: Vec::new(),
            }
        });
        match params.direction {
            Direction::Ltr => {
                let advance = glyph.advance;
                placed.push((pen, glyph));
                pen += advance;
            }
            Direction::Rtl => {
                pen -= glyph.advance;
                placed.push((pen, glyph));
            }
        }
    }

    let (box_min, box_max) = match params.direction {
        Direction::Ltr => (0.0, pen),
        Direction::Rtl => (pen, 0.0),
    };
    let dx = match params.halign {
        HAlign::Leading => -box_min,
        HAlign::Center => -(box_min + box_max) / 2.0,
        HAlign::Trailing => -box_max,
    };
    let dy = match params.valign {
        VAlign::Baseline => 0.0,
        VAlign::Top => -metrics.ascender,
        VAlign::Bottom => -metrics.descender,
        VAlign::Center => -(metrics.ascender + metrics.descender) / 2.0,
    };

    let mut rings = Vec::new();
    for (x, glyph) in placed {
        let offset = DVec2::new(x + dx, dy);
        for contour in glyph.contours {
            let points = contour.iter().map(|&p| (p + offset) * scale).collect();
            match Ring::new(points) {
                Ok(ring) => rings.push(ring),
                Err(err) => debug!(%err, "dropping degenerate contour"),
            }
        }
    }
    Ok(rings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Every glyph is a unit-em box of full advance, except `' '` (blank)
    /// and `'?'` (missing).
    struct BoxFont;

    impl GlyphSource for BoxFont {
        fn metrics(&self) -> FontMetrics {
            FontMetrics {
                units_per_em: 100.0,
                ascender: 80.0,
                descender: -20.0,
            }
        }

        fn glyph(&self, ch: char, _curve_steps: usize) -> Option<GlyphOutline> {
            match ch {
                '?' => None,
                ' ' => Some(GlyphOutline {
                    advance: 50.0,
                    contours: vec![],
                }),
                _ => Some(GlyphOutline {
                    advance: 100.0,
                    contours: vec![vec![
                        DVec2::new(10.0, 0.0),
                        DVec2::new(90.0, 0.0),
                        DVec2::new(90.0, 70.0),
                        DVec2::new(10.0, 70.0),
                    ]],
                }),
            }
        }
    }

    fn params(size: f64) -> TextParams {
        TextParams {
            size,
            ..Default::default()
        }
    }

    fn x_span(rings: &[Ring]) -> (f64, f64) {
        rings
            .iter()
            .map(Ring::bounds)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (min, max)| {
                (lo.min(min.x), hi.max(max.x))
            })
    }

    #[test]
    fn test_ltr_advances_right() {
        let rings = layout_text(&BoxFont, "ab", &params(10.0), 8).unwrap();
        assert_eq!(rings.len(), 2);
        assert_relative_eq!(rings[0].bounds().0.x, 1.0);
        assert_relative_eq!(rings[1].bounds().0.x, 11.0);
    }

    #[test]
    fn test_rtl_advances_left() {
        let p = TextParams {
            direction: Direction::Rtl,
            ..params(10.0)
        };
        let rings = layout_text(&BoxFont, "ab", &p, 8).unwrap();
        // Leading alignment puts the box start at zero: 'b' leftmost.
        assert_relative_eq!(rings[1].bounds().0.x, 1.0);
        assert_relative_eq!(rings[0].bounds().0.x, 11.0);
    }

    #[test]
    fn test_blank_and_missing_glyphs_advance() {
        let rings = layout_text(&BoxFont, "a ?b\n", &params(10.0), 8).unwrap();
        assert_eq!(rings.len(), 2);
        // 10 + 5 + 3 units of pen before 'b'.
        assert_relative_eq!(rings[1].bounds().0.x, 18.0 + 1.0);
    }

    #[test]
    fn test_horizontal_alignment() {
        let center = TextParams {
            halign: HAlign::Center,
            ..params(10.0)
        };
        let (lo, hi) = x_span(&layout_text(&BoxFont, "ab", &center, 8).unwrap());
        assert_relative_eq!(lo, -9.0);
        assert_relative_eq!(hi, 9.0);

        let trailing = TextParams {
            halign: HAlign::Trailing,
            ..params(10.0)
        };
        let (_, hi) = x_span(&layout_text(&BoxFont, "ab", &trailing, 8).unwrap());
        assert_relative_eq!(hi, -1.0);
    }

    #[test]
    fn test_vertical_alignment() {
        let cases = [
            (VAlign::Baseline, 0.0),
            (VAlign::Top, -8.0),
            (VAlign::Bottom, 2.0),
            (VAlign::Center, -3.0),
        ];
        for (valign, expected_min_y) in cases {
            let p = TextParams {
                valign,
                ..params(10.0)
            };
            let rings = layout_text(&BoxFont, "a", &p, 8).unwrap();
            assert_relative_eq!(rings[0].bounds().0.y, expected_min_y, epsilon = 1e-12);
        }
    }
}
