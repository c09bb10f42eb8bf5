//! Fruit stand deployment
//!
//! Prices a quantity of fruit from a fixed per-unit price table.

use crate::deployment::Deployment;
use crate::number::Number;
use serde_json::Value;
use std::collections::HashMap;
use toystand_common::config::ModelConfig;
use toystand_common::error::{Result, ToyStandError};
use toystand_proto::Payload;
use tracing::info;

/// Per-unit prices
pub const PRICE_LIST: &[(&str, i64)] = &[
    ("APPLE", 1),
    ("BANANA", 2),
    ("ORANGE", 3),
    ("MANGO", 3),
    ("STRAWBERRY", 4),
];

/// Price for fruit missing from [`PRICE_LIST`]
pub const DEFAULT_UNIT_PRICE: i64 = 1;

/// Fruit stand deployment
#[derive(Debug, Clone)]
pub struct FruitStand {
    model: ModelConfig,
    prices: HashMap<&'static str, i64>,
}

impl FruitStand {
    /// Create the deployment and its price table
    pub fn new(model: ModelConfig) -> Self {
        info!("Initializing FruitStand");
        info!("Using model URL: {}", model.model_url);

        let stand = Self {
            model,
            prices: PRICE_LIST.iter().copied().collect(),
        };
        stand.setup();

        info!("FruitStand initialized successfully");
        stand
    }

    fn setup(&self) {
        info!("Setting up fruit stand with model reference: {}", self.model.model_url);
    }

    /// Unit price for a fruit code; anything unlisted costs the default
    pub fn unit_price(&self, fruit: &Value) -> i64 {
        fruit
            .as_str()
            .and_then(|name| self.prices.get(name))
            .copied()
            .unwrap_or(DEFAULT_UNIT_PRICE)
    }

    /// Total price for a payload
    pub fn total_price(&self, payload: &Payload) -> Result<Number> {
        let quantity = Number::from_value(&payload.value)?;
        Ok(quantity.mul(self.unit_price(&payload.code))?)
    }
}

impl Deployment for FruitStand {
    fn name(&self) -> &str {
        "FruitStand"
    }

    fn route(&self) -> &str {
        "fruit-stand"
    }

    fn call(&self, body: &Value) -> Result<Value> {
        info!("Received request with data: {}", body);

        let payload = Payload::from_value(body).ok_or_else(|| {
            ToyStandError::invalid_input(format!("expected [fruit, quantity], got {}", body))
        })?;

        let total_price = self.total_price(&payload)?;
        info!(
            "Calculated total price {} for {} of {}",
            total_price, payload.value, payload.code
        );

        Ok(total_price.to_value()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deployment::DeploymentHandle;
    use serde_json::json;
    use toystand_proto::Reply;

    fn stand() -> FruitStand {
        FruitStand::new(ModelConfig::default())
    }

    #[test]
    fn test_listed_fruit() {
        let stand = stand();
        assert_eq!(stand.call(&json!(["APPLE", 3])).unwrap(), json!(3));
        assert_eq!(stand.call(&json!(["BANANA", 3])).unwrap(), json!(6));
        assert_eq!(stand.call(&json!(["MANGO", 2])).unwrap(), json!(6));
        assert_eq!(stand.call(&json!(["STRAWBERRY", 2])).unwrap(), json!(8));
    }

    #[test]
    fn test_unknown_fruit_uses_default_price() {
        let stand = stand();
        assert_eq!(stand.call(&json!(["KIWI", 5])).unwrap(), json!(5));
        assert_eq!(stand.call(&json!(["apple", 5])).unwrap(), json!(5));
        assert_eq!(stand.call(&json!([7, 5])).unwrap(), json!(5));
    }

    #[test]
    fn test_fractional_quantity() {
        assert_eq!(stand().call(&json!(["ORANGE", 1.5])).unwrap(), json!(4.5));
    }

    #[test]
    fn test_non_numeric_quantity_is_an_error_record() {
        let handle = DeploymentHandle::new(stand());
        for quantity in [json!("three"), json!(null), json!([1]), json!(true)] {
            match handle.handle(&json!(["APPLE", quantity])) {
                Reply::Error(record) => assert!(!record.error.is_empty()),
                other => panic!("expected error record, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_non_pair_payload_is_rejected() {
        let err = stand().call(&json!(["APPLE"])).unwrap_err();
        assert!(matches!(err, ToyStandError::InvalidInput(_)));
    }

    #[test]
    fn test_large_quantity_stays_exact() {
        let stand = stand();
        assert_eq!(
            stand.call(&json!(["APPLE", 10000000000000000000u64])).unwrap(),
            json!(10000000000000000000u64)
        );
        assert_eq!(
            stand.call(&json!(["BANANA", 9223372036854775807u64])).unwrap(),
            json!(18446744073709551614u64)
        );
    }

    #[test]
    fn test_total_past_json_integer_range_is_an_error() {
        let err = stand().call(&json!(["BANANA", 9223372036854775808u64])).unwrap_err();
        assert!(matches!(err, ToyStandError::Computation(_)));
    }

    #[test]
    fn test_overflow_is_a_computation_error() {
        let err = stand().call(&json!(["STRAWBERRY", i64::MAX])).unwrap_err();
        assert!(matches!(err, ToyStandError::Computation(_)));
    }

    #[test]
    fn test_price_table_is_unchanged_by_requests() {
        let handle = DeploymentHandle::new(stand());
        let body = json!(["STRAWBERRY", 2]);
        for _ in 0..5 {
            assert_eq!(handle.handle(&body), Reply::Value(json!(8)));
        }
    }
}
