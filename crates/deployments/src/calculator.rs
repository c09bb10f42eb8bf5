//! Pizza calculator deployment
//!
//! Applies a fixed operand of 5 to the requested number and answers
//! `"<result> pizzas please!"`.

use crate::deployment::Deployment;
use crate::number::Number;
use serde_json::Value;
use toystand_common::config::ModelConfig;
use toystand_common::error::{Result, ToyStandError};
use toystand_proto::Payload;
use tracing::info;

/// Fixed right-hand operand for every operation
pub const OPERAND: i64 = 5;

/// Supported operation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operation {
    /// Parse an operation code; unknown codes yield `None`
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "ADD" => Some(Operation::Add),
            "SUB" => Some(Operation::Sub),
            "MUL" => Some(Operation::Mul),
            "DIV" => Some(Operation::Div),
            _ => None,
        }
    }

    /// Apply the operation with [`OPERAND`] on the right
    pub fn apply(self, number: Number) -> Result<Number> {
        let result = match self {
            Operation::Add => number.add(OPERAND)?,
            Operation::Sub => number.sub(OPERAND)?,
            Operation::Mul => number.mul(OPERAND)?,
            Operation::Div => number.div(OPERAND),
        };
        Ok(result)
    }
}

/// Calculator deployment
#[derive(Debug, Clone)]
pub struct Calculator {
    model: ModelConfig,
}

impl Calculator {
    /// Create the deployment
    pub fn new(model: ModelConfig) -> Self {
        info!("Initializing Calculator");
        info!("Using model URL: {}", model.model_url);

        let calculator = Self { model };
        calculator.setup();

        info!("Calculator initialized successfully");
        calculator
    }

    fn setup(&self) {
        info!("Setting up calculator with model reference: {}", self.model.model_url);
    }

    /// Compute the display string for a payload
    pub fn compute(&self, payload: &Payload) -> Result<String> {
        // Unknown operations never look at the number.
        let result = match payload.code_str().and_then(Operation::parse) {
            Some(op) => op.apply(Number::from_value(&payload.value)?)?,
            None => Number::Int(0),
        };

        Ok(format!("{} pizzas please!", result))
    }
}

impl Deployment for Calculator {
    fn name(&self) -> &str {
        "Calculator"
    }

    fn route(&self) -> &str {
        "calculator"
    }

    fn call(&self, body: &Value) -> Result<Value> {
        info!("Received request with data: {}", body);

        let payload = Payload::from_value(body).ok_or_else(|| {
            ToyStandError::invalid_input(format!(
                "expected [operation, number], got {}",
                body
            ))
        })?;

        let response = self.compute(&payload)?;
        info!(
            "Calculated result for {} {}: {}",
            payload.code, payload.value, response
        );

        Ok(Value::String(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deployment::DeploymentHandle;
    use serde_json::json;
    use toystand_proto::Reply;

    fn calculator() -> Calculator {
        Calculator::new(ModelConfig::default())
    }

    fn call(op: &str, number: Value) -> Value {
        calculator().call(&json!([op, number])).unwrap()
    }

    #[test]
    fn test_operations_on_integers() {
        for n in [i64::MIN, -12, -1, 0, 3, 7, 100, i64::MAX] {
            let wide = i128::from(n);
            assert_eq!(call("ADD", json!(n)), json!(format!("{} pizzas please!", wide + 5)));
            assert_eq!(call("SUB", json!(n)), json!(format!("{} pizzas please!", wide - 5)));
            assert_eq!(call("MUL", json!(n)), json!(format!("{} pizzas please!", wide * 5)));
        }
    }

    #[test]
    fn test_division_is_real() {
        assert_eq!(call("DIV", json!(7)), json!("1.4 pizzas please!"));
        assert_eq!(call("DIV", json!(10)), json!("2.0 pizzas please!"));
        assert_eq!(call("DIV", json!(-3)), json!("-0.6 pizzas please!"));
    }

    #[test]
    fn test_float_operands_stay_float() {
        assert_eq!(call("ADD", json!(2.5)), json!("7.5 pizzas please!"));
        assert_eq!(call("MUL", json!(1.0)), json!("5.0 pizzas please!"));
    }

    #[test]
    fn test_unknown_operation_defaults_to_zero() {
        assert_eq!(call("FOO", json!(3)), json!("0 pizzas please!"));
        assert_eq!(call("add", json!(3)), json!("0 pizzas please!"));
        assert_eq!(call("FOO", json!("not a number")), json!("0 pizzas please!"));

        let reply = calculator().call(&json!([42, 3])).unwrap();
        assert_eq!(reply, json!("0 pizzas please!"));
    }

    #[test]
    fn test_non_pair_payload_is_rejected() {
        let calc = calculator();
        assert!(matches!(
            calc.call(&json!([3])),
            Err(ToyStandError::InvalidInput(_))
        ));
        assert!(calc.call(&json!(["ADD", 1, 2])).is_err());
        assert!(calc.call(&json!("ADD")).is_err());
    }

    #[test]
    fn test_non_numeric_operand_is_rejected() {
        let err = calculator().call(&json!(["ADD", "three"])).unwrap_err();
        assert!(matches!(err, ToyStandError::InvalidInput(_)));
    }

    #[test]
    fn test_integers_past_i64_bounds_stay_exact() {
        assert_eq!(
            call("ADD", json!(9223372036854775808u64)),
            json!("9223372036854775813 pizzas please!")
        );
        assert_eq!(
            call("SUB", json!(i64::MIN)),
            json!("-9223372036854775813 pizzas please!")
        );
        assert_eq!(
            call("MUL", json!(i64::MAX)),
            json!("46116860184273879035 pizzas please!")
        );
        assert_eq!(
            call("MUL", json!(u64::MAX)),
            json!("92233720368547758075 pizzas please!")
        );
    }

    #[test]
    fn test_exponent_range_division() {
        assert_eq!(
            call("DIV", json!(100000000000000000u64)),
            json!("2e+16 pizzas please!")
        );
        assert_eq!(call("DIV", json!(0.0002)), json!("4e-05 pizzas please!"));
    }

    #[test]
    fn test_handle_returns_error_record() {
        let handle = DeploymentHandle::new(calculator());
        match handle.handle(&json!([5])) {
            Reply::Error(record) => assert!(!record.error.is_empty()),
            other => panic!("expected error record, got {:?}", other),
        }
    }

    #[test]
    fn test_repeated_requests_are_identical() {
        let handle = DeploymentHandle::new(calculator());
        let body = json!(["DIV", 7]);
        let first = handle.handle(&body);
        for _ in 0..5 {
            assert_eq!(handle.handle(&body), first);
        }
    }
}
