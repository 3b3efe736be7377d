//! Portfolio holdings with validated fields.

use crate::error::{Result, TabulateError};
use crate::record::{FromRow, Row, expect_float, expect_int, expect_text, take_values};
use crate::value::{FieldType, Value};
use std::fmt;

/// One portfolio holding: `name`, `shares`, `price`.
///
/// `shares` and `price` are never negative. Setters validate before
/// storing, so a rejected value leaves the previous one in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Stock {
    name: String,
    shares: i64,
    price: f64,
}

/// Result of [`Stock::sell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleOutcome {
    NothingToSell,
    /// Requested more than held; everything was sold.
    SoldAll(i64),
    Sold(i64),
}

impl fmt::Display for SaleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleOutcome::NothingToSell => f.write_str("No shares to sell"),
            SaleOutcome::SoldAll(n) => write!(f, "Sold all {n} shares"),
            SaleOutcome::Sold(n) => write!(f, "Sold {n} shares"),
        }
    }
}

impl Stock {
    pub fn new(name: impl Into<String>, shares: i64, price: f64) -> Result<Self> {
        let mut stock = Self {
            name: name.into(),
            shares: 0,
            price: 0.0,
        };
        stock.set_shares(shares)?;
        stock.set_price(price)?;
        Ok(stock)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shares(&self) -> i64 {
        self.shares
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn set_shares(&mut self, shares: i64) -> Result<()> {
        if shares < 0 {
            return Err(TabulateError::InvalidFieldValue {
                field: "shares",
                reason: format!("shares must be >= 0, got {shares}"),
            });
        }
        self.shares = shares;
        Ok(())
    }

    pub fn set_price(&mut self, price: f64) -> Result<()> {
        if !price.is_finite() || price < 0.0 {
            return Err(TabulateError::InvalidFieldValue {
                field: "price",
                reason: format!("price must be >= 0, got {price}"),
            });
        }
        self.price = price;
        Ok(())
    }

    /// `shares * price`, rounded to cents.
    pub fn cost(&self) -> f64 {
        (self.shares as f64 * self.price * 100.0).round() / 100.0
    }

    /// Reduce the holding by `volume` shares, never going below zero.
    pub fn sell(&mut self, volume: i64) -> Result<SaleOutcome> {
        if volume < 0 {
            return Err(TabulateError::InvalidFieldValue {
                field: "shares",
                reason: format!("cannot sell a negative volume ({volume})"),
            });
        }
        if self.shares == 0 {
            return Ok(SaleOutcome::NothingToSell);
        }
        if volume > self.shares {
            let sold = self.shares;
            self.shares = 0;
            return Ok(SaleOutcome::SoldAll(sold));
        }
        self.shares -= volume;
        Ok(SaleOutcome::Sold(volume))
    }
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stock('{}', {}, {})", self.name, self.shares, self.price)
    }
}

impl FromRow for Stock {
    const FIELDS: &'static [&'static str] = &["name", "shares", "price"];
    const TYPES: &'static [FieldType] = &[FieldType::Text, FieldType::Integer, FieldType::Decimal];

    fn from_values(values: Vec<Value>) -> Result<Self> {
        let [name, shares, price] = take_values(values)?;
        Stock::new(
            expect_text("name", name)?,
            expect_int("shares", shares)?,
            expect_float("price", price)?,
        )
    }

    fn to_row(&self) -> Row {
        Row::new()
            .with("name", self.name.as_str())
            .with("shares", self.shares)
            .with("price", self.price)
    }
}
