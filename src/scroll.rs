//! The scroll-offset formula mapping a navigation marker's index to a
//! horizontal scroll position.
//!
//! Markers are indexed oldest-first. Index `0` maps to the full scroll
//! extent, the newest index (`count - 1`) maps to `0`, and the indices in
//! between interpolate linearly. Ratios are rounded to three decimals so the
//! page and [`ScrollFormula::offset`] agree on the exact coefficients.

use std::fmt::Write;

/// The piecewise scroll-offset function for a page with `count` documents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollFormula {
    count: usize,
}

impl ScrollFormula {
    pub fn new(count: usize) -> ScrollFormula {
        ScrollFormula { count }
    }

    /// Returns the fraction of the scroll extent for `index`, rounded to three
    /// decimals. Out-of-range indices and single-document pages yield `0.0`.
    pub fn ratio(&self, index: usize) -> f64 {
        if self.count <= 1 || index >= self.count {
            return 0.0;
        }
        let last = (self.count - 1) as f64;
        round3((last - index as f64) / last)
    }

    /// Returns the target scroll offset for `index` given the container's
    /// maximum scroll extent. This is the same computation the page's
    /// `scrollOffset` function performs with the table from
    /// [`ScrollFormula::to_js_array`].
    pub fn offset(&self, index: usize, max_scroll: f64) -> f64 {
        max_scroll * self.ratio(index)
    }

    /// The rounded ratios for every index, oldest first.
    pub fn ratios(&self) -> Vec<f64> {
        (0..self.count).map(|i| self.ratio(i)).collect()
    }

    /// Formats [`ScrollFormula::ratios`] as the body of a JavaScript array
    /// literal, e.g. `1.000, 0.500, 0.000`. The page's `scrollOffset`
    /// function indexes into this table.
    pub fn to_js_array(&self) -> String {
        let mut out = String::new();
        for (i, ratio) in self.ratios().into_iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            // Writing to a `String` can't fail.
            let _ = write!(out, "{:.3}", ratio);
        }
        out
    }
}

// Rounds through the decimal formatter so the value is exactly the literal
// that gets written into the page (ties round to even).
fn round3(value: f64) -> f64 {
    format!("{:.3}", value).parse().unwrap_or(value)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_endpoints() {
        for count in 2..20 {
            let formula = ScrollFormula::new(count);
            assert_eq!(800.0, formula.offset(0, 800.0));
            assert_eq!(0.0, formula.offset(count - 1, 800.0));
        }
    }

    #[test]
    fn test_midpoint_of_five() {
        let formula = ScrollFormula::new(5);
        assert_eq!(0.5, formula.ratio(2));
        assert_eq!(500.0, formula.offset(2, 1000.0));
    }

    #[test]
    fn test_rounding_to_three_decimals() {
        let formula = ScrollFormula::new(4);
        assert_eq!(vec![1.0, 0.667, 0.333, 0.0], formula.ratios());
        assert_eq!("1.000, 0.667, 0.333, 0.000", formula.to_js_array());
    }

    #[test]
    fn test_monotonically_decreasing() {
        let ratios = ScrollFormula::new(12).ratios();
        for pair in ratios.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }

    #[test]
    fn test_single_document() {
        let formula = ScrollFormula::new(1);
        assert_eq!(0.0, formula.offset(0, 800.0));
        assert_eq!("0.000", formula.to_js_array());
    }

    #[test]
    fn test_out_of_range() {
        let formula = ScrollFormula::new(3);
        assert_eq!(0.0, formula.offset(3, 800.0));
        assert_eq!(0.0, formula.offset(usize::MAX, 800.0));
    }

    #[test]
    fn test_empty() {
        assert_eq!("", ScrollFormula::new(0).to_js_array());
    }
}
