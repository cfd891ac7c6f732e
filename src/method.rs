//! Payment method model and balance operations.
//!
//! Maintains the invariant `0 <= balance <= limit` at all times: the only
//! way to lower a balance is [`PaymentMethod::spend`], which refuses any
//! amount the method cannot afford.

use crate::decimal::{DiscountRate, Money};
use crate::error::{EngineError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Reserved id of the loyalty points instrument.
pub const POINTS_METHOD_ID: &str = "PUNKTY";

/// Raw payment method record as read from the payment methods document.
///
/// `discount` is an integer percentage (`"10"` means 10%) and `limit` a
/// decimal amount; both accept a JSON string or number.
#[derive(Debug, Deserialize)]
pub struct PaymentMethodRecord {
    pub id: String,

    pub discount: Decimal,

    pub limit: Decimal,
}

impl PaymentMethodRecord {
    /// Validates the raw record and converts it into a [`PaymentMethod`].
    pub fn parse(self, index: usize) -> Result<PaymentMethod> {
        PaymentMethod::new(self.id, self.discount, Money::new(self.limit)).map_err(|e| {
            match e {
                EngineError::InvalidRecord { kind, message, .. } => {
                    EngineError::InvalidRecord { kind, index, message }
                }
                other => other,
            }
        })
    }
}

/// Whether a method is the points instrument or an ordinary funding source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Virtual currency with no external replenishment.
    Points,

    /// Card or any other ordinary funding source.
    Card,
}

/// Spending state of one funding source.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentMethod {
    pub id: String,

    /// Set once from the id at construction.
    kind: MethodKind,

    /// Discount granted on orders this method pays in full.
    pub discount: DiscountRate,

    /// Budget available before the run. Kept exact, never rounded.
    limit: Money,

    /// Remaining budget. Only decreases, through [`PaymentMethod::spend`].
    balance: Money,
}

impl PaymentMethod {
    /// Creates a method with a full balance.
    ///
    /// `discount_percent` is a percentage in `[0, 100]`; `limit` must not be
    /// negative and is taken as is.
    pub fn new(id: impl Into<String>, discount_percent: Decimal, limit: Money) -> Result<Self> {
        let id = id.into();
        let invalid = |message: &str| EngineError::InvalidRecord {
            kind: "payment method",
            index: 0,
            message: message.to_string(),
        };

        if id.trim().is_empty() {
            return Err(invalid("id must not be empty"));
        }
        let discount = DiscountRate::from_percent(discount_percent)
            .ok_or_else(|| invalid("discount must be a percentage between 0 and 100"))?;
        if limit.is_negative() {
            return Err(invalid("limit must not be negative"));
        }

        let kind = if id == POINTS_METHOD_ID {
            MethodKind::Points
        } else {
            MethodKind::Card
        };

        Ok(PaymentMethod {
            id,
            kind,
            discount,
            limit,
            balance: limit,
        })
    }

    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    /// Budget available before the run.
    pub fn limit(&self) -> Money {
        self.limit
    }

    /// Returns `true` for the points instrument.
    pub fn is_points(&self) -> bool {
        self.kind == MethodKind::Points
    }

    /// Remaining budget.
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Returns `true` if `balance - amount >= 0`.
    pub fn can_afford(&self, amount: Money) -> bool {
        !(self.balance - amount).is_negative()
    }

    /// Deducts `amount` from the balance.
    ///
    /// Returns `false`, leaving the balance untouched, if the method cannot
    /// afford it or `amount` is negative.
    pub fn spend(&mut self, amount: Money) -> bool {
        if amount.is_negative() || !self.can_afford(amount) {
            return false;
        }

        self.balance -= amount;
        true
    }

    /// Total spent so far: `limit - balance`.
    pub fn spent(&self) -> Money {
        self.limit - self.balance
    }

    /// Verifies the invariant: `0 <= balance <= limit`.
    #[cfg(debug_assertions)]
    pub fn check_invariant(&self) -> bool {
        !self.balance.is_negative() && self.balance <= self.limit
    }
}
