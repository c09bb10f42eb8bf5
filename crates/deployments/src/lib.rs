//! ToyStand Deployments
//!
//! The business logic served by the gateway: a pizza calculator and a
//! fruit stand, each behind the [`Deployment`] contract.

pub mod calculator;
pub mod deployment;
pub mod fruit;
pub mod number;

pub use calculator::Calculator;
pub use deployment::{Deployment, DeploymentHandle};
pub use fruit::FruitStand;
pub use number::Number;

use toystand_common::config::ModelConfig;
use toystand_common::error::{Result, ToyStandError};

/// Construct the deployment served under `route`
pub fn build_deployment(route: &str, model: &ModelConfig) -> Result<DeploymentHandle> {
    match route {
        "calculator" => Ok(DeploymentHandle::new(Calculator::new(model.clone()))),
        "fruit-stand" => Ok(DeploymentHandle::new(FruitStand::new(model.clone()))),
        other => Err(ToyStandError::config(format!("Unknown deployment: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toystand_common::config::KNOWN_DEPLOYMENTS;

    #[test]
    fn test_every_known_deployment_builds() {
        let model = ModelConfig::default();
        for route in KNOWN_DEPLOYMENTS {
            let handle = build_deployment(route, &model).unwrap();
            assert_eq!(handle.route(), *route);
        }
    }

    #[test]
    fn test_unknown_deployment() {
        assert!(build_deployment("pizza-oven", &ModelConfig::default()).is_err());
    }
}
