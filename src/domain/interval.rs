use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::utils::TimeUtils;

/// Futures kline interval names as the exchange spells them.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    Debug,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
pub enum Interval {
    #[default]
    Min1,
    Min5,
    Min15,
    Min30,
    Min60,
    Hour4,
    Hour8,
    Day1,
    Week1,
    Month1,
}

impl Interval {
    /// Bar width in seconds. A month is counted as 30 days.
    pub fn seconds(&self) -> i64 {
        match self {
            Interval::Min1 => TimeUtils::S_IN_MIN,
            Interval::Min5 => TimeUtils::S_IN_MIN * 5,
            Interval::Min15 => TimeUtils::S_IN_MIN * 15,
            Interval::Min30 => TimeUtils::S_IN_MIN * 30,
            Interval::Min60 => TimeUtils::S_IN_H,
            Interval::Hour4 => TimeUtils::S_IN_H * 4,
            Interval::Hour8 => TimeUtils::S_IN_H * 8,
            Interval::Day1 => TimeUtils::S_IN_D,
            Interval::Week1 => TimeUtils::S_IN_D * 7,
            Interval::Month1 => TimeUtils::S_IN_D * 30,
        }
    }

    pub fn is_intraday(&self) -> bool {
        self.seconds() < TimeUtils::S_IN_D
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_exchange_names() {
        assert_eq!(Interval::from_str("Hour4").unwrap(), Interval::Hour4);
        assert!(Interval::from_str("4h").is_err());
        assert_eq!(Interval::Min15.to_string(), "Min15");
    }

    #[test]
    fn widths_are_strictly_increasing() {
        let widths: Vec<i64> = Interval::iter().map(|i| i.seconds()).collect();
        assert_eq!(widths.first(), Some(&60));
        assert_eq!(widths.last(), Some(&2_592_000));
        assert!(widths.windows(2).all(|w| w[0] < w[1]));
    }
}
