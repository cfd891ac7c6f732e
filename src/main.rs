//! Payment Optimizer CLI
//!
//! Reads an orders document and a payment methods document, allocates the
//! payments and prints the amount spent per payment method.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- orders.json paymentmethods.json
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` to trace every settled order

use payment_optimizer::{
    allocate, load_orders_from_path, load_payment_methods_from_path, EngineError, Result,
};
use std::env;
use std::io;
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        return Err(EngineError::MissingArgument);
    }

    let orders = load_orders_from_path(&args[1])?;
    let mut methods = load_payment_methods_from_path(&args[2])?;

    let allocation = allocate(&orders, &mut methods)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    allocation.write_output(handle)?;

    Ok(())
}
