//! Sort engine.

use crate::domain::Product;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Column a product list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Category,
    Name,
    Rating,
    Stock,
    FinalPrice,
    HsnCode,
}

impl SortField {
    pub const ALL: [Self; 6] = [
        Self::Category,
        Self::Name,
        Self::Rating,
        Self::Stock,
        Self::FinalPrice,
        Self::HsnCode,
    ];

    const fn key(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Name => "name",
            Self::Rating => "rating",
            Self::Stock => "stock",
            Self::FinalPrice => "price",
            Self::HsnCode => "hsn",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "finalprice" | "final-price" | "rate" => Ok(Self::FinalPrice),
            "hsncode" | "hsn-code" => Ok(Self::HsnCode),
            key => Self::ALL
                .into_iter()
                .find(|field| field.key() == key)
                .ok_or_else(|| format!("unknown sort field: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

/// Current sort selection. `field: None` keeps arrival order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    pub field: Option<SortField>,
    pub direction: SortDirection,
}

impl SortState {
    /// Selects `field`: the current field flips direction, a new one starts ascending.
    pub fn select(&mut self, field: SortField) {
        if self.field == Some(field) {
            self.direction = self.direction.flipped();
        } else {
            self.field = Some(field);
            self.direction = SortDirection::Asc;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

enum SortKey {
    Text(String),
    Number(f64),
}

impl SortKey {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            // A field always yields one kind of key.
            (Self::Text(_), Self::Number(_)) => Ordering::Less,
            (Self::Number(_), Self::Text(_)) => Ordering::Greater,
        }
    }
}

fn sort_key(product: &Product, field: SortField) -> Option<SortKey> {
    let text = |v: &Option<String>| v.as_deref().map(|s| SortKey::Text(s.to_lowercase()));
    match field {
        SortField::Category => text(&product.category),
        SortField::Name => text(&product.name),
        SortField::HsnCode => text(&product.hsn_code),
        SortField::Rating => product.rating.map(SortKey::Number),
        SortField::Stock => product.quantity_in_stock.map(SortKey::Number),
        SortField::FinalPrice => product.final_rate.map(SortKey::Number),
    }
}

/// Returns `products` sorted by `field`, leaving the input untouched.
///
/// Text compares case-insensitively. Products without a value for the field
/// come last in either direction. Equal keys keep their input order.
#[must_use]
pub fn sort_products(products: &[Product], field: Option<SortField>, direction: SortDirection) -> Vec<Product> {
    let Some(field) = field else {
        return products.to_vec();
    };
    let _span = tracing::debug_span!("sort_products", %field, %direction, count = products.len()).entered();

    let mut keyed: Vec<(Option<SortKey>, &Product)> =
        products.iter().map(|p| (sort_key(p, field), p)).collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => match direction {
            SortDirection::Asc => a.compare(b),
            SortDirection::Desc => b.compare(a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed.into_iter().map(|(_, p)| p.clone()).collect()
}
