mod common;

use common::{weather_decoder, Tagged};
use perceptrs::train::{Perceptron, PerceptronParams, StrategyKind};

#[test]
fn test_iterations_validation() {
    let mut params = PerceptronParams::default();

    // iterations must be positive
    let result = params.set("iterations", "0");
    assert!(result.is_err());
    assert_eq!(
        result.unwrap_err().to_string(),
        "invalid parameter: iterations must be at least 1"
    );

    assert!(params.set("iterations", "1").is_ok());
    assert!(params.set("iterations", "10").is_ok());
    assert_eq!(params.iterations(), 10);
}

#[test]
fn test_step_size_validation() {
    let mut params = PerceptronParams::default();

    let result = params.set("step_size", "-1.0");
    assert!(result.is_err());
    assert_eq!(
        result.unwrap_err().to_string(),
        "invalid parameter: step_size must be positive and finite"
    );
    assert!(params.set("step_size", "0").is_err());
    assert!(params.set("step_size", "inf").is_err());

    assert!(params.set("step_size", "0.1").is_ok());
    assert!(params.set("step_size", "1e-3").is_ok());
    let step: f64 = params.get("step_size").unwrap().parse().unwrap();
    assert!((step - 1e-3).abs() < f64::EPSILON);
}

#[test]
fn test_invalid_parameter_values() {
    let mut params = PerceptronParams::default();

    // Invalid number format
    assert!(params.set("iterations", "not_an_int").is_err());
    assert!(params.set("iterations", "1.5").is_err());
    assert!(params.set("step_size", "abc").is_err());
}

#[test]
fn test_unknown_parameter() {
    let mut params = PerceptronParams::default();

    let result = params.set("unknown_param", "1.0");
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("unknown parameter"));
    assert!(params.get("c2").is_err());
}

#[test]
fn test_builder_validation() {
    let model: Perceptron<Tagged> = Perceptron::new(weather_decoder())
        .with_iterations(3)
        .unwrap()
        .with_step_size(0.5)
        .unwrap();
    assert_eq!(model.params().iterations(), 3);
    assert_eq!(model.params().step_size(), 0.5);

    assert!(Perceptron::<Tagged>::new(weather_decoder())
        .with_iterations(0)
        .is_err());
}

#[test]
fn test_strategy_names() {
    assert_eq!(
        "averaged".parse::<StrategyKind>().unwrap(),
        StrategyKind::Averaged
    );
    let err = "voted".parse::<StrategyKind>().unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid parameter: unknown update strategy: voted"
    );
}
