#![cfg(feature = "serde")]

use nalgebra::Point3;
use warpo::prelude::{solve, LandmarkPair, TpsCoefficients};

#[test]
fn test_coefficient_bundle_round_trips() {
    let pairs = vec![
        LandmarkPair::new(Point3::new(0., 0., 0.), Point3::new(1., 0., 0.)),
        LandmarkPair::new(Point3::new(1., 1., 1.), Point3::new(1., 1., 2.)),
    ];
    let coef = solve(&pairs, 1.0);

    let json = serde_json::to_string_pretty(&coef).unwrap();
    let restored: TpsCoefficients<f64> = serde_json::from_str(&json).unwrap();
    assert_eq!(coef, restored);
}
