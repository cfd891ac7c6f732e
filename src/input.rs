//! Loaders for the orders and payment methods documents.
//!
//! Both documents are JSON arrays. Every record is validated and ids are
//! checked for uniqueness before any allocation starts, so a bad input never
//! produces partial output.

use crate::error::{EngineError, Result};
use crate::method::{PaymentMethod, PaymentMethodRecord};
use crate::order::{Order, OrderRecord};
use log::debug;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Reads and validates an orders document.
pub fn load_orders<R: Read>(reader: R) -> Result<Vec<Order>> {
    let records: Vec<OrderRecord> = serde_json::from_reader(reader)?;
    let orders = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.parse(index))
        .collect::<Result<Vec<_>>>()?;

    ensure_unique("order", orders.iter().map(|o| o.id.as_str()))?;
    debug!("Loaded {} orders", orders.len());
    Ok(orders)
}

/// Reads and validates a payment methods document.
pub fn load_payment_methods<R: Read>(reader: R) -> Result<Vec<PaymentMethod>> {
    let records: Vec<PaymentMethodRecord> = serde_json::from_reader(reader)?;
    let methods = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.parse(index))
        .collect::<Result<Vec<_>>>()?;

    ensure_unique("payment method", methods.iter().map(|m| m.id.as_str()))?;
    debug!("Loaded {} payment methods", methods.len());
    Ok(methods)
}

pub fn load_orders_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Order>> {
    load_orders(BufReader::new(File::open(path)?))
}

pub fn load_payment_methods_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<PaymentMethod>> {
    load_payment_methods(BufReader::new(File::open(path)?))
}

fn ensure_unique<'a>(kind: &'static str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(EngineError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_load_orders() {
        let json = r#"[
            {"id": "ORDER1", "value": "100.00", "promotions": ["mZysk"]},
            {"id": "ORDER2", "value": "200.00", "promotions": ["BosBankrut"]},
            {"id": "ORDER3", "value": "150.00"}
        ]"#;

        let orders = load_orders(Cursor::new(json)).unwrap();
        assert_eq!(orders.len(), 3);
        assert_eq!(orders[1].id, "ORDER2");
        assert!(orders[2].promotions.is_empty());
    }

    #[test]
    fn test_load_payment_methods_preserves_order() {
        let json = r#"[
            {"id": "PUNKTY", "discount": "15", "limit": "100.00"},
            {"id": "mZysk", "discount": "10", "limit": "180.00"},
            {"id": "BosBankrut", "discount": "5", "limit": "200.00"}
        ]"#;

        let methods = load_payment_methods(Cursor::new(json)).unwrap();
        let ids: Vec<_> = methods.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["PUNKTY", "mZysk", "BosBankrut"]);
        assert!(methods[0].is_points());
    }

    #[test]
    fn test_duplicate_order_id_rejected() {
        let json = r#"[{"id": "A", "value": "1"}, {"id": "A", "value": "2"}]"#;
        let err = load_orders(Cursor::new(json)).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateId { kind: "order", .. }));
    }

    #[test]
    fn test_duplicate_points_method_rejected() {
        let json = r#"[
            {"id": "PUNKTY", "discount": "15", "limit": "100.00"},
            {"id": "PUNKTY", "discount": "20", "limit": "50.00"}
        ]"#;
        let err = load_payment_methods(Cursor::new(json)).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateId { .. }));
    }

    #[test]
    fn test_malformed_document_is_json_error() {
        let err = load_orders(Cursor::new("{not json")).unwrap_err();
        assert!(matches!(err, EngineError::Json(_)));
    }

    #[test]
    fn test_invalid_number_is_json_error() {
        let json = r#"[{"id": "mZysk", "discount": "ten", "limit": "1"}]"#;
        let err = load_payment_methods(Cursor::new(json)).unwrap_err();
        assert!(matches!(err, EngineError::Json(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_orders_from_path("does/not/exist.json").unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
