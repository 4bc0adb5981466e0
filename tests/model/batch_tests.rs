use crate::test_helpers::{add_noise, assert_results_close};
use ndarray::Array1;
use peakfit_rs::lineshapes::gauss;
use peakfit_rs::model::Kwargs;
use peakfit_rs::models::gaussian_model;
use peakfit_rs::parameters::ParameterSet;
use peakfit_rs::PeakFitError;

#[test]
fn test_fit_batch_preserves_order() {
    let model = gaussian_model();
    let x = Array1::linspace(-10.0, 10.0, 500);
    let centers = [-2.0, -0.5, 0.75, 1.5, 3.0];

    let datasets: Vec<Array1<f64>> = centers
        .iter()
        .enumerate()
        .map(|(i, &cen)| add_noise(&gauss(&x, 4.0, cen, 2.0), 0.01, i as u64))
        .collect();

    let kwargs = Kwargs::new()
        .var("x", x)
        .value("amp", 3.0)
        .value("cen", 0.0)
        .value("wid", 2.5);

    let results = model.fit_batch(&datasets, None, &kwargs);
    assert_eq!(results.len(), centers.len());

    for (result, &cen) in results.iter().zip(centers.iter()) {
        let result = result.as_ref().unwrap();
        assert!(result.success, "{}", result.message);
        assert_results_close(result, &[("amp", 4.0), ("cen", cen), ("wid", 2.0)], 1e-2);
    }
}

#[test]
fn test_fit_batch_matches_sequential_fits() {
    let model = gaussian_model();
    let x = Array1::linspace(-10.0, 10.0, 300);
    let datasets: Vec<Array1<f64>> = (0..4)
        .map(|seed| add_noise(&gauss(&x, 7.0, 1.0, 3.0), 0.05, seed))
        .collect();

    let mut params = ParameterSet::new();
    params.add_param("amp", 5.0).unwrap();
    params.add_param("cen", 2.0).unwrap();
    params.add_param_with_bounds("wid", 4.0, 0.0, f64::INFINITY).unwrap();
    let kwargs = Kwargs::new().var("x", x);

    let batch = model.fit_batch(&datasets, Some(&params), &kwargs);

    for (data, result) in datasets.iter().zip(batch) {
        let sequential = model.fit(data, Some(&params), &kwargs).unwrap();
        let parallel = result.unwrap();
        assert_eq!(parallel.values, sequential.values);
        assert_eq!(parallel.nfev, sequential.nfev);
    }
}

#[test]
fn test_fit_batch_reports_errors_per_dataset() {
    let model = gaussian_model();
    let datasets = vec![Array1::zeros(10), Array1::zeros(20)];

    // no independent variable supplied
    let results = model.fit_batch(&datasets, None, &Kwargs::new());

    assert_eq!(results.len(), 2);
    for result in results {
        assert!(matches!(result, Err(PeakFitError::MissingIndependentVariable(_))));
    }
}
