//! Stock and price resolution across the company hierarchy.
//!
//! A branch that has no stock or price row for a product inherits its parent's row; the
//! inherited price is marked up by the configured profit margin. Only one level of
//! hierarchy exists, so there is no grandparent lookup.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionSource {
    /// The company's own rows.
    Own,
    /// The parent company's rows, price marked up.
    Parent,
    /// No row at either level.
    None,
}

/// Stock and price rows held by one company for one product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompanyRows {
    /// Boxes on hand, if a stock row exists.
    pub boxes: Option<Decimal>,
    /// Sell price, if a price row exists.
    pub sell_price: Option<Decimal>,
}

impl CompanyRows {
    /// True if neither row exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_none() && self.sell_price.is_none()
    }
}

/// Effective stock and price for a (company, product) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockResolution {
    /// Boxes available; zero when nothing was found.
    pub boxes: Decimal,
    /// Effective sell price; `None` when no price row exists at either level.
    pub sell_price: Option<Decimal>,
    /// Which level supplied the result.
    pub source: ResolutionSource,
}

/// Applies a percentage markup: `price * (1 + margin / 100)`. No rounding.
#[must_use]
pub fn apply_margin(price: Decimal, margin_percent: Decimal) -> Decimal {
    price * (Decimal::ONE + margin_percent / Decimal::ONE_HUNDRED)
}

/// Resolves effective stock and price.
///
/// `parent` is `None` for parent companies. The own company's rows always win. If the
/// company has only one of its two rows, that row governs its part and the missing part
/// is taken from the parent; the source is still [`ResolutionSource::Own`].
#[must_use]
pub fn resolve(
    own: CompanyRows,
    parent: Option<CompanyRows>,
    margin_percent: Decimal,
) -> StockResolution {
    let parent = parent.unwrap_or_default();
    let inherited_price = parent.sell_price.map(|p| apply_margin(p, margin_percent));

    if !own.is_empty() {
        return StockResolution {
            boxes: own.boxes.or(parent.boxes).unwrap_or(Decimal::ZERO),
            sell_price: own.sell_price.or(inherited_price),
            source: ResolutionSource::Own,
        };
    }

    if !parent.is_empty() {
        return StockResolution {
            boxes: parent.boxes.unwrap_or(Decimal::ZERO),
            sell_price: inherited_price,
            source: ResolutionSource::Parent,
        };
    }

    StockResolution {
        boxes: Decimal::ZERO,
        sell_price: None,
        source: ResolutionSource::None,
    }
}

/// True when `boxes` is at or below `threshold`.
#[must_use]
pub fn is_low_stock(boxes: Decimal, threshold: Decimal) -> bool {
    boxes <= threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn rows(boxes: Option<Decimal>, price: Option<Decimal>) -> CompanyRows {
        CompanyRows {
            boxes,
            sell_price: price,
        }
    }

    #[test]
    fn test_own_row_wins() {
        let r = resolve(
            rows(Some(dec!(3)), Some(dec!(50))),
            Some(rows(Some(dec!(100)), Some(dec!(40)))),
            dec!(10),
        );
        assert_eq!(r.boxes, dec!(3));
        assert_eq!(r.sell_price, Some(dec!(50)));
        assert_eq!(r.source, ResolutionSource::Own);
    }

    #[test]
    fn test_parent_fallback_applies_margin() {
        let r = resolve(
            CompanyRows::default(),
            Some(rows(Some(dec!(100)), Some(dec!(40)))),
            dec!(25),
        );
        assert_eq!(r.boxes, dec!(100));
        assert_eq!(r.sell_price, Some(dec!(50)));
        assert_eq!(r.source, ResolutionSource::Parent);
    }

    #[test]
    fn test_nothing_anywhere_is_not_an_error() {
        let r = resolve(CompanyRows::default(), None, dec!(10));
        assert_eq!(r.boxes, Decimal::ZERO);
        assert_eq!(r.sell_price, None);
        assert_eq!(r.source, ResolutionSource::None);
    }

    #[test]
    fn test_own_stock_without_price_inherits_price() {
        let r = resolve(
            rows(Some(dec!(2)), None),
            Some(rows(Some(dec!(100)), Some(dec!(10)))),
            dec!(50),
        );
        assert_eq!(r.boxes, dec!(2));
        assert_eq!(r.sell_price, Some(dec!(15)));
        assert_eq!(r.source, ResolutionSource::Own);
    }

    #[test]
    fn test_zero_own_stock_still_wins() {
        let r = resolve(
            rows(Some(Decimal::ZERO), Some(dec!(9))),
            Some(rows(Some(dec!(100)), Some(dec!(10)))),
            dec!(0),
        );
        assert_eq!(r.boxes, Decimal::ZERO);
        assert_eq!(r.source, ResolutionSource::Own);
    }

    #[test]
    fn test_margin_not_rounded() {
        assert_eq!(apply_margin(dec!(10), dec!(33.333)), dec!(13.33330));
    }

    #[test]
    fn test_low_stock_inclusive() {
        assert!(is_low_stock(dec!(10), dec!(10)));
        assert!(!is_low_stock(dec!(10.5), dec!(10)));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Without own rows, price is `P * (1 + M/100)` and stock is the parent's.
        #[test]
        fn prop_parent_fallback(
            price_cents in 1i64..10_000_000i64,
            margin_bp in 0i64..50_000i64,
            boxes in 0i64..100_000i64,
        ) {
            let price = Decimal::new(price_cents, 2);
            let margin = Decimal::new(margin_bp, 2);
            let parent_boxes = Decimal::new(boxes, 1);

            let r = resolve(
                CompanyRows::default(),
                Some(rows(Some(parent_boxes), Some(price))),
                margin,
            );

            prop_assert_eq!(r.source, ResolutionSource::Parent);
            prop_assert_eq!(r.boxes, parent_boxes);
            prop_assert_eq!(
                r.sell_price,
                Some(price * (Decimal::ONE + margin / Decimal::ONE_HUNDRED))
            );
        }

        /// A full own pair is returned unchanged whatever the parent holds.
        #[test]
        fn prop_own_pair_untouched(
            own_boxes in 0i64..100_000i64,
            own_price in 1i64..1_000_000i64,
            parent_price in 1i64..1_000_000i64,
            margin in 0i64..500i64,
        ) {
            let own = rows(Some(Decimal::from(own_boxes)), Some(Decimal::new(own_price, 2)));
            let r = resolve(
                own,
                Some(rows(Some(Decimal::ONE), Some(Decimal::new(parent_price, 2)))),
                Decimal::from(margin),
            );
            prop_assert_eq!(r.boxes, Decimal::from(own_boxes));
            prop_assert_eq!(r.sell_price, Some(Decimal::new(own_price, 2)));
        }
    }
}
