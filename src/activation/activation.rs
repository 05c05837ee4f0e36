use serde::{Serialize, Deserialize};

/// Element-wise activation applied after each layer's linear transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    #[default]
    Sigmoid,
    Tanh,
    #[serde(rename = "relu")]
    ReLU,
    Identity,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Identity => x,
        }
    }

    /// Derivative evaluated at the pre-activation `x`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            },
            ActivationFunction::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Identity => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_centered_at_half() {
        let s = ActivationFunction::Sigmoid;
        assert_eq!(s.function(0.0), 0.5);
        assert_eq!(s.derivative(0.0), 0.25);
        assert!(s.function(40.0) <= 1.0);
        assert!(s.function(-40.0) >= 0.0);
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let h = 1e-6;
        for act in [ActivationFunction::Sigmoid, ActivationFunction::Tanh, ActivationFunction::Identity] {
            for &x in &[-2.0, -0.3, 0.7, 1.9] {
                let numeric = (act.function(x + h) - act.function(x - h)) / (2.0 * h);
                assert!((numeric - act.derivative(x)).abs() < 1e-6, "{act:?} at {x}");
            }
        }
    }

    #[test]
    fn serializes_in_snake_case() {
        assert_eq!(serde_json::to_string(&ActivationFunction::ReLU).unwrap(), "\"relu\"");
        let parsed: ActivationFunction = serde_json::from_str("\"sigmoid\"").unwrap();
        assert_eq!(parsed, ActivationFunction::Sigmoid);
    }
}
