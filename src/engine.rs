//! Core payment allocation engine.
//!
//! Splits the payment of every order across the card methods and the points
//! instrument in four greedy phases. Each phase works on the orders the
//! previous phases left unpaid; an order is never revisited once settled.
//!
//! 1. Full payment with points, largest orders first, stopping at the first
//!    order the points cannot cover.
//! 2. Full payment with one card, strongest discount first, each card taking
//!    the eligible orders that earn it the largest discount.
//! 3. Partial payment with points: at least 10% of the order in points earns
//!    a flat 10% discount, the rest is paid by one card.
//! 4. Whatever is left: all remaining points plus one card, no discount.
//!
//! Phases 3 and 4 search the cards weakest discount first so the strongest
//! cards keep their budget for the discounted phases.

use crate::decimal::{DiscountRate, Money};
use crate::error::{EngineError, Result};
use crate::method::PaymentMethod;
use crate::order::Order;
use crate::report::{Allocation, MethodSpend, Payment, Phase, Settlement};
use log::{debug, info, warn};

/// Allocates payment for `orders` and commits the spend to `methods`.
///
/// On success every order is paid in full and the returned [`Allocation`]
/// holds the spend of every method, in the order of `methods`. If any order
/// cannot be paid, returns [`EngineError::InfeasibleAllocation`]; the
/// balances then reflect the orders settled before the failure was detected.
pub fn allocate(orders: &[Order], methods: &mut [PaymentMethod]) -> Result<Allocation> {
    PaymentOptimizer::new(methods)?.allocate(orders)
}

/// A single allocation run over a set of payment methods.
///
/// The optimizer borrows the methods exclusively for the run. Concurrent runs
/// must each own their own copy of the methods.
pub struct PaymentOptimizer<'m> {
    methods: &'m mut [PaymentMethod],

    /// Index of the points instrument, if any.
    points: Option<usize>,

    /// Indices of the card methods, strongest discount first. Ties keep the
    /// input order.
    candidates: Vec<usize>,

    settlements: Vec<Settlement>,
}

impl<'m> PaymentOptimizer<'m> {
    /// Prepares a run. Fails if more than one points instrument is given.
    pub fn new(methods: &'m mut [PaymentMethod]) -> Result<Self> {
        let mut points = None;
        let mut candidates = Vec::with_capacity(methods.len());

        for (index, method) in methods.iter().enumerate() {
            if !method.is_points() {
                candidates.push(index);
            } else if points.replace(index).is_some() {
                return Err(EngineError::DuplicateId {
                    kind: "payment method",
                    id: method.id.clone(),
                });
            }
        }

        candidates.sort_by(|&a, &b| methods[b].discount.cmp(&methods[a].discount));

        Ok(PaymentOptimizer {
            methods,
            points,
            candidates,
            settlements: Vec::new(),
        })
    }

    /// Runs all four phases over `orders`.
    pub fn allocate(mut self, orders: &[Order]) -> Result<Allocation> {
        let mut remaining: Vec<&Order> = orders.iter().collect();
        remaining.sort_by(|a, b| b.value.cmp(&a.value));

        self.pay_in_full_with_points(&mut remaining);
        self.pay_in_full_with_cards(&mut remaining);
        self.pay_partially_with_points(&mut remaining);
        self.pay_with_leftovers(&mut remaining);

        #[cfg(debug_assertions)]
        self.check_invariants();

        if !remaining.is_empty() {
            let unsettled: Vec<String> = remaining.iter().map(|o| o.id.clone()).collect();
            warn!(
                "{} of {} orders could not be paid: {}",
                unsettled.len(),
                orders.len(),
                unsettled.join(", ")
            );
            return Err(EngineError::InfeasibleAllocation { unsettled });
        }

        let allocation = self.into_allocation();
        info!(
            "Allocated {} orders, total discount {}",
            allocation.settlements.len(),
            allocation.total_discount()
        );
        Ok(allocation)
    }

    /// Phase 1: pay whole orders with points until the first one they cannot cover.
    fn pay_in_full_with_points(&mut self, remaining: &mut Vec<&Order>) {
        let Some(points) = self.points else {
            return;
        };

        let mut settled = 0;
        for order in remaining.iter() {
            let discount = order.value.apply_rate(self.methods[points].discount);
            let paid = order.value - discount;
            if !self.methods[points].spend(paid) {
                debug!(
                    "Points cannot cover order {} ({}), {} order(s) left for later phases",
                    order.id,
                    paid,
                    remaining.len() - settled
                );
                break;
            }

            let payment = self.payment(points, paid);
            self.settle(order, Phase::FullPoints, vec![payment], discount);
            settled += 1;
        }

        remaining.drain(..settled);
    }

    /// Phase 2: let each card, strongest first, pay in full the eligible
    /// orders that earn it the largest discount.
    fn pay_in_full_with_cards(&mut self, remaining: &mut Vec<&Order>) {
        for position in 0..self.candidates.len() {
            if remaining.is_empty() {
                return;
            }
            let card = self.candidates[position];

            let mut ranked: Vec<(usize, &Order, Money)> = remaining
                .iter()
                .enumerate()
                .map(|(slot, &order)| (slot, order, order.discount_with(&self.methods[card])))
                .collect();
            ranked.sort_by(|a, b| b.2.cmp(&a.2));

            // Indexed by position in `remaining`; ids are not assumed unique.
            let mut settled = vec![false; remaining.len()];
            for (slot, order, discount) in ranked {
                if !self.methods[card].can_afford(Money::ZERO) {
                    break;
                }
                if !order.is_eligible(&self.methods[card].id) {
                    continue;
                }

                let paid = order.value - discount;
                if !self.methods[card].spend(paid) {
                    continue;
                }

                let payment = self.payment(card, paid);
                self.settle(order, Phase::FullMethod, vec![payment], discount);
                settled[slot] = true;
            }

            let mut settled = settled.into_iter();
            remaining.retain(|_| !settled.next().unwrap_or(false));
        }
    }

    /// Phase 3: pay between 10% and 90% of each order with points for the
    /// flat 10% discount, the rest with the weakest card that can afford it.
    fn pay_partially_with_points(&mut self, remaining: &mut Vec<&Order>) {
        let Some(points) = self.points else {
            return;
        };

        remaining.retain(|order| !self.try_partial_points(order, points));
    }

    fn try_partial_points(&mut self, order: &Order, points: usize) -> bool {
        let ten_percent = order.value.apply_rate(DiscountRate::TEN_PERCENT);
        let points_used = order
            .value
            .apply_rate(DiscountRate::NINETY_PERCENT)
            .min(self.methods[points].balance());
        if points_used < ten_percent {
            return false;
        }

        let rest = order.value - points_used - ten_percent;
        let Some(card) = self.weakest_affordable(rest) else {
            debug!(
                "No card can cover {} of order {} after {} in points",
                rest, order.id, points_used
            );
            return false;
        };

        self.commit(points, points_used);
        self.commit(card, rest);
        let payments = vec![self.payment(points, points_used), self.payment(card, rest)];
        self.settle(order, Phase::PartialPoints, payments, ten_percent);
        true
    }

    /// Phase 4: spend whatever points are left, then the weakest card that
    /// can cover the rest. No discount.
    fn pay_with_leftovers(&mut self, remaining: &mut Vec<&Order>) {
        remaining.retain(|order| !self.try_leftovers(order));
    }

    fn try_leftovers(&mut self, order: &Order) -> bool {
        let points_used = self
            .points
            .map(|points| self.methods[points].balance().min(order.value))
            .unwrap_or(Money::ZERO);

        let rest = order.value - points_used;
        let card = if rest.is_zero() {
            None
        } else {
            match self.weakest_affordable(rest) {
                Some(card) => Some(card),
                None => {
                    debug!("No card can cover {} of order {}", rest, order.id);
                    return false;
                }
            }
        };

        let mut payments = Vec::with_capacity(2);
        if let Some(points) = self.points.filter(|_| !points_used.is_zero()) {
            self.commit(points, points_used);
            payments.push(self.payment(points, points_used));
        }
        if let Some(card) = card {
            self.commit(card, rest);
            payments.push(self.payment(card, rest));
        }

        self.settle(order, Phase::BestEffort, payments, Money::ZERO);
        true
    }

    /// First card, weakest discount first, whose balance covers `amount`.
    fn weakest_affordable(&self, amount: Money) -> Option<usize> {
        self.candidates
            .iter()
            .rev()
            .copied()
            .find(|&card| self.methods[card].can_afford(amount))
    }

    /// Deducts an amount whose affordability was already checked.
    fn commit(&mut self, method: usize, amount: Money) {
        let spent = self.methods[method].spend(amount);
        debug_assert!(
            spent,
            "{} cannot afford {}",
            self.methods[method].id, amount
        );
    }

    fn payment(&self, method: usize, amount: Money) -> Payment {
        Payment {
            method_id: self.methods[method].id.clone(),
            amount,
        }
    }

    fn settle(&mut self, order: &Order, phase: Phase, payments: Vec<Payment>, discount: Money) {
        debug!(
            "Order {} settled ({}): {} paid, {} discount, via {}",
            order.id,
            phase,
            payments.iter().map(|p| p.amount).sum::<Money>(),
            discount,
            payments
                .iter()
                .map(|p| p.method_id.as_str())
                .collect::<Vec<_>>()
                .join(" + ")
        );

        self.settlements.push(Settlement {
            order_id: order.id.clone(),
            phase,
            payments,
            discount,
        });
    }

    #[cfg(debug_assertions)]
    fn check_invariants(&self) {
        for method in self.methods.iter() {
            debug_assert!(
                method.check_invariant(),
                "balance of {} out of range: {}",
                method.id,
                method.balance()
            );
        }
    }

    fn into_allocation(self) -> Allocation {
        let spend = self
            .methods
            .iter()
            .map(|method| MethodSpend {
                method_id: method.id.clone(),
                amount: method.spent(),
            })
            .collect();

        Allocation {
            spend,
            settlements: self.settlements,
        }
    }
}
