//! Validated price-watch thresholds.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lowest watchable turnip price in bells.
pub const MIN_WATCH_PRICE: u32 = 1;
/// Highest turnip price the game can produce.
pub const MAX_WATCH_PRICE: u32 = 660;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WatchPriceError {
    #[error("price is not a number")]
    NotANumber,
    #[error("price must be greater than 0")]
    TooLow,
    #[error("price cannot exceed {MAX_WATCH_PRICE}")]
    TooHigh,
}

/// A user's minimum acceptable turnip price, always within `1..=660`.
///
/// Construction always validates, so a stored value can be trusted. The
/// store persists it as its decimal string and re-parses on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WatchPrice(u32);

impl WatchPrice {
    /// Validate a raw price value.
    pub fn new(price: u32) -> Result<Self, WatchPriceError> {
        if price < MIN_WATCH_PRICE {
            Err(WatchPriceError::TooLow)
        } else if price > MAX_WATCH_PRICE {
            Err(WatchPriceError::TooHigh)
        } else {
            Ok(WatchPrice(price))
        }
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    /// True when an island's price meets this threshold.
    #[inline]
    pub fn matches(self, turnip_price: u32) -> bool {
        turnip_price >= self.0
    }
}

impl FromStr for WatchPrice {
    type Err = WatchPriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let price: u32 = s.trim().parse().map_err(|_| {
            // A parseable negative number still reads as "too low" to the user.
            if s.trim().starts_with('-') && s.trim()[1..].chars().all(|c| c.is_ascii_digit()) {
                WatchPriceError::TooLow
            } else {
                WatchPriceError::NotANumber
            }
        })?;
        WatchPrice::new(price)
    }
}

impl fmt::Display for WatchPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_accepts_full_range() {
        assert_eq!(WatchPrice::new(1).unwrap().get(), 1);
        assert_eq!(WatchPrice::new(100).unwrap().get(), 100);
        assert_eq!(WatchPrice::new(660).unwrap().get(), 660);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(WatchPrice::new(0), Err(WatchPriceError::TooLow));
        assert_eq!(WatchPrice::new(661), Err(WatchPriceError::TooHigh));
    }

    #[test]
    fn test_parse() {
        assert_eq!("500".parse::<WatchPrice>().unwrap().get(), 500);
        assert_eq!(" 42 ".parse::<WatchPrice>().unwrap().get(), 42);
        assert_eq!("".parse::<WatchPrice>(), Err(WatchPriceError::NotANumber));
        assert_eq!("abc".parse::<WatchPrice>(), Err(WatchPriceError::NotANumber));
        assert_eq!("-5".parse::<WatchPrice>(), Err(WatchPriceError::TooLow));
        assert_eq!("0".parse::<WatchPrice>(), Err(WatchPriceError::TooLow));
        assert_eq!("9999".parse::<WatchPrice>(), Err(WatchPriceError::TooHigh));
    }

    #[test]
    fn test_matches_is_at_least() {
        let price = WatchPrice::new(400).unwrap();
        assert!(price.matches(400));
        assert!(price.matches(660));
        assert!(!price.matches(399));
    }
}
