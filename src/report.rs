//! Allocation results and their output format.

use crate::decimal::Money;
use crate::error::Result;
use csv::{QuoteStyle, WriterBuilder};
use std::fmt;
use std::io::Write;

/// The phase of the allocation that settled an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Paid in full with points.
    FullPoints,

    /// Paid in full by one discounted method.
    FullMethod,

    /// Paid partly with points, the rest by one method.
    PartialPoints,

    /// Paid with whatever was left, no discount.
    BestEffort,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::FullPoints => "full points",
            Phase::FullMethod => "full method",
            Phase::PartialPoints => "partial points",
            Phase::BestEffort => "best effort",
        };
        f.write_str(name)
    }
}

/// An amount committed from one method toward one order.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub method_id: String,
    pub amount: Money,
}

/// How one order was paid.
///
/// `total_paid() + discount` equals the order value exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub order_id: String,
    pub phase: Phase,
    pub payments: Vec<Payment>,
    pub discount: Money,
}

impl Settlement {
    /// Sum of all amounts committed toward the order.
    pub fn total_paid(&self) -> Money {
        self.payments.iter().map(|p| p.amount).sum()
    }
}

/// Total spent by one method over the run.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSpend {
    pub method_id: String,
    pub amount: Money,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// One entry per input method, in input order, zero spends included.
    pub spend: Vec<MethodSpend>,

    /// One entry per order, in the order they were settled.
    pub settlements: Vec<Settlement>,
}

impl Allocation {
    /// Amount spent by the method with the given id.
    pub fn spend_for(&self, method_id: &str) -> Option<Money> {
        self.spend
            .iter()
            .find(|s| s.method_id == method_id)
            .map(|s| s.amount)
    }

    /// Settlement of the order with the given id.
    pub fn settlement_for(&self, order_id: &str) -> Option<&Settlement> {
        self.settlements.iter().find(|s| s.order_id == order_id)
    }

    /// Sum of all discounts captured.
    pub fn total_discount(&self) -> Money {
        self.settlements.iter().map(|s| s.discount).sum()
    }

    /// Writes one `<id> <amount>` line per method.
    ///
    /// Lines follow the input order of the methods. Amounts have exactly 2
    /// decimal places.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = WriterBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .from_writer(writer);

        for spend in &self.spend {
            let amount = spend.amount.to_string();
            csv_writer.write_record([spend.method_id.as_str(), amount.as_str()])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn spend(id: &str, amount: &str) -> MethodSpend {
        MethodSpend {
            method_id: id.to_string(),
            amount: money(amount),
        }
    }

    fn sample() -> Allocation {
        Allocation {
            spend: vec![spend("PUNKTY", "100"), spend("mZysk", "165.00"), spend("BosBankrut", "0")],
            settlements: vec![Settlement {
                order_id: "ORDER1".to_string(),
                phase: Phase::PartialPoints,
                payments: vec![
                    Payment {
                        method_id: "PUNKTY".to_string(),
                        amount: money("90.00"),
                    },
                    Payment {
                        method_id: "mZysk".to_string(),
                        amount: money("0.00"),
                    },
                ],
                discount: money("10.00"),
            }],
        }
    }

    #[test]
    fn test_output_format() {
        let mut output = Vec::new();
        sample().write_output(&mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert_eq!(output_str, "PUNKTY 100.00\nmZysk 165.00\nBosBankrut 0.00\n");
    }

    #[test]
    fn test_output_never_quotes_ids() {
        let allocation = Allocation {
            spend: vec![spend("my card", "12.5"), spend("say \"hi\"", "0")],
            settlements: Vec::new(),
        };
        let mut output = Vec::new();
        allocation.write_output(&mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert_eq!(output_str, "my card 12.50\nsay \"hi\" 0.00\n");
    }

    #[test]
    fn test_lookups() {
        let allocation = sample();
        assert_eq!(allocation.spend_for("mZysk"), Some(money("165")));
        assert_eq!(allocation.spend_for("missing"), None);
        assert_eq!(allocation.total_discount(), money("10"));

        let settlement = allocation.settlement_for("ORDER1").unwrap();
        assert_eq!(settlement.total_paid() + settlement.discount, money("100"));
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::BestEffort.to_string(), "best effort");
    }
}
