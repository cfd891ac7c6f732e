//! Order models for JSON parsing and internal representation.

use crate::decimal::Money;
use crate::error::{EngineError, Result};
use crate::method::PaymentMethod;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashSet;

/// Raw order record as read from the orders document.
///
/// `value` accepts either a JSON string (`"150.00"`) or a number.
#[derive(Debug, Deserialize)]
pub struct OrderRecord {
    pub id: String,

    pub value: Decimal,

    /// Ids of the payment methods that grant their discount on this order.
    #[serde(default)]
    pub promotions: Option<Vec<String>>,
}

impl OrderRecord {
    /// Validates the raw record and converts it into an [`Order`].
    ///
    /// `index` is the position in the input array, used for error reporting.
    pub fn parse(self, index: usize) -> Result<Order> {
        let invalid = |message: &str| EngineError::InvalidRecord {
            kind: "order",
            index,
            message: message.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id must not be empty"));
        }

        let value = Money::from_input(self.value);
        if value.is_negative() {
            return Err(invalid("value must not be negative"));
        }

        Ok(Order {
            id: self.id,
            value,
            promotions: self.promotions.unwrap_or_default().into_iter().collect(),
        })
    }
}

/// An order to be paid in full. Immutable for the lifetime of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,

    /// Value rounded half-up to 2 decimal places.
    pub value: Money,

    /// Method ids eligible for a promotional discount on this order.
    pub promotions: HashSet<String>,
}

impl Order {
    /// Creates an order; `value` is rounded half-up to 2 decimal places.
    pub fn new<I, S>(id: impl Into<String>, value: Money, promotions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Order {
            id: id.into(),
            value: Money::from_input(value.value()),
            promotions: promotions.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if paying in full with `method_id` earns its discount.
    pub fn is_eligible(&self, method_id: &str) -> bool {
        self.promotions.contains(method_id)
    }

    /// Discount this order earns when paid in full by `method`.
    pub fn discount_with(&self, method: &PaymentMethod) -> Money {
        if self.is_eligible(&method.id) {
            self.value.apply_rate(method.discount)
        } else {
            Money::ZERO
        }
    }
}
