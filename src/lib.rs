//! # Payment Optimizer
//!
//! Splits the payment of a batch of orders across card payment methods and a
//! loyalty points instrument, capturing as much promotional discount as a
//! phased greedy heuristic allows.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: Inputs rounded half-up to 2 decimal places,
//!   exact arithmetic afterwards via `rust_decimal`
//! - **Strict invariants**: `0 <= balance <= limit` for every method, and
//!   every settled order is paid exactly its value minus its discount
//! - **Explicit failure**: A batch that cannot be fully paid is an
//!   [`EngineError::InfeasibleAllocation`], never a partial result
//! - **Deterministic output**: Spend listed in the input order of the methods
//!
//! ## Example
//!
//! ```no_run
//! use payment_optimizer::{allocate, load_orders, load_payment_methods};
//! use std::io::Cursor;
//!
//! let orders = load_orders(Cursor::new(r#"[{"id": "ORDER1", "value": "100.00"}]"#)).unwrap();
//! let mut methods = load_payment_methods(Cursor::new(
//!     r#"[{"id": "PUNKTY", "discount": "15", "limit": "100.00"}]"#,
//! ))
//! .unwrap();
//!
//! let allocation = allocate(&orders, &mut methods).unwrap();
//! allocation.write_output(std::io::stdout()).unwrap();
//! ```

pub mod decimal;
pub mod engine;
pub mod error;
pub mod input;
pub mod method;
pub mod order;
pub mod report;

pub use decimal::{DiscountRate, Money};
pub use engine::{allocate, PaymentOptimizer};
pub use error::{EngineError, Result};
pub use input::{
    load_orders, load_orders_from_path, load_payment_methods, load_payment_methods_from_path,
};
pub use method::{MethodKind, PaymentMethod, PaymentMethodRecord, POINTS_METHOD_ID};
pub use order::{Order, OrderRecord};
pub use report::{Allocation, MethodSpend, Payment, Phase, Settlement};
