//! Badge flags carried by every product.
//!
//! The wire format ships eight separate 0/1 integers. Internally they live in a
//! single bitset so the wire schema and the display schema cannot drift apart:
//! every flag is defined exactly once, in [`BadgeFlag::ALL`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the eight boolean product attributes used for badges and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeFlag {
    HighestConsumption,
    HighestRated,
    HighestStock,
    FrequentlySold,
    NewArrival,
    LowDemand,
    OutOfStock,
    OldStock,
}

impl BadgeFlag {
    /// All flags in wire order.
    pub const ALL: [Self; 8] = [
        Self::HighestConsumption,
        Self::HighestRated,
        Self::HighestStock,
        Self::FrequentlySold,
        Self::NewArrival,
        Self::LowDemand,
        Self::OutOfStock,
        Self::OldStock,
    ];

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Short key used inside the wire record's `f` object.
    #[must_use]
    pub const fn wire_code(self) -> &'static str {
        match self {
            Self::HighestConsumption => "hc",
            Self::HighestRated => "hr",
            Self::HighestStock => "hs",
            Self::FrequentlySold => "fs",
            Self::NewArrival => "na",
            Self::LowDemand => "ld",
            Self::OutOfStock => "os",
            Self::OldStock => "osk",
        }
    }

    /// Field-style name, e.g. `isNewArrival`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::HighestConsumption => "isHighestConsumption",
            Self::HighestRated => "isHighestRated",
            Self::HighestStock => "isHighestStock",
            Self::FrequentlySold => "isFrequentlySold",
            Self::NewArrival => "isNewArrival",
            Self::LowDemand => "isLowDemand",
            Self::OutOfStock => "isOutOfStock",
            Self::OldStock => "isOldStock",
        }
    }

    /// Human-readable badge label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::HighestConsumption => "Highest consumption",
            Self::HighestRated => "Highest rated",
            Self::HighestStock => "Highest stock",
            Self::FrequentlySold => "Frequently sold",
            Self::NewArrival => "New arrival",
            Self::LowDemand => "Low demand",
            Self::OutOfStock => "Out of stock",
            Self::OldStock => "Old stock",
        }
    }

    const fn kebab(self) -> &'static str {
        match self {
            Self::HighestConsumption => "highest-consumption",
            Self::HighestRated => "highest-rated",
            Self::HighestStock => "highest-stock",
            Self::FrequentlySold => "frequently-sold",
            Self::NewArrival => "new-arrival",
            Self::LowDemand => "low-demand",
            Self::OutOfStock => "out-of-stock",
            Self::OldStock => "old-stock",
        }
    }
}

impl fmt::Display for BadgeFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kebab())
    }
}

impl FromStr for BadgeFlag {
    type Err = String;

    /// Accepts the wire code (`na`), the field name (`isNewArrival`) or the
    /// kebab name (`new-arrival`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|flag| {
                wanted.eq_ignore_ascii_case(flag.wire_code())
                    || wanted.eq_ignore_ascii_case(flag.name())
                    || wanted.eq_ignore_ascii_case(flag.kebab())
            })
            .ok_or_else(|| format!("unknown badge flag: {wanted}"))
    }
}

/// Compact set of [`BadgeFlag`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgeFlags(u8);

impl BadgeFlags {
    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn contains(self, flag: BadgeFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn insert(&mut self, flag: BadgeFlag) {
        self.0 |= flag.bit();
    }

    /// Flips membership of `flag`.
    pub fn toggle(&mut self, flag: BadgeFlag) {
        self.0 ^= flag.bit();
    }

    /// True when the two sets share at least one flag.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Iterates set flags in wire order.
    pub fn iter(self) -> impl Iterator<Item = BadgeFlag> {
        BadgeFlag::ALL.into_iter().filter(move |flag| self.contains(*flag))
    }

    #[must_use]
    pub const fn is_highest_consumption(self) -> bool {
        self.contains(BadgeFlag::HighestConsumption)
    }

    #[must_use]
    pub const fn is_highest_rated(self) -> bool {
        self.contains(BadgeFlag::HighestRated)
    }

    #[must_use]
    pub const fn is_highest_stock(self) -> bool {
        self.contains(BadgeFlag::HighestStock)
    }

    #[must_use]
    pub const fn is_frequently_sold(self) -> bool {
        self.contains(BadgeFlag::FrequentlySold)
    }

    #[must_use]
    pub const fn is_new_arrival(self) -> bool {
        self.contains(BadgeFlag::NewArrival)
    }

    #[must_use]
    pub const fn is_low_demand(self) -> bool {
        self.contains(BadgeFlag::LowDemand)
    }

    #[must_use]
    pub const fn is_out_of_stock(self) -> bool {
        self.contains(BadgeFlag::OutOfStock)
    }

    #[must_use]
    pub const fn is_old_stock(self) -> bool {
        self.contains(BadgeFlag::OldStock)
    }
}

impl FromIterator<BadgeFlag> for BadgeFlags {
    fn from_iter<I: IntoIterator<Item = BadgeFlag>>(iter: I) -> Self {
        let mut flags = Self::empty();
        for flag in iter {
            flags.insert(flag);
        }
        flags
    }
}
