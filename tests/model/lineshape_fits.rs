use crate::test_helpers::{add_noise, assert_results_close};
use ndarray::Array1;
use peakfit_rs::lineshapes;
use peakfit_rs::model::{Kwargs, Model};
use peakfit_rs::models::{self, ModelRegistry};
use peakfit_rs::parameters::Parameter;
use peakfit_rs::PeakFitError;

fn x() -> Array1<f64> {
    Array1::linspace(-20.0, 20.0, 801)
}

/// Fit noise-free data from `truth`, starting at `guess`
fn recover(model: &Model, data: &Array1<f64>, guess: Kwargs, truth: &[(&str, f64)]) {
    let result = model.fit(data, None, &guess).unwrap();
    assert!(result.success, "{}: {}", model.name(), result.message);
    assert_results_close(&result, truth, 1e-3);
}

#[test]
fn test_gaussian_model() {
    let x = x();
    let data = lineshapes::gauss(&x, 7.0, 1.0, 3.0);
    let guess = Kwargs::new().var("x", x).value("amp", 5.0).value("cen", 2.0).value("wid", 4.0);
    recover(
        &models::gaussian_model(),
        &data,
        guess,
        &[("amp", 7.0), ("cen", 1.0), ("wid", 3.0)],
    );
}

#[test]
fn test_gaussian_area_model() {
    let x = x();
    let data = lineshapes::gauss_area(&x, 20.0, -2.0, 2.5);
    let guess = Kwargs::new().var("x", x).value("amp", 15.0).value("cen", -1.0).value("wid", 2.0);
    recover(
        &models::gaussian_area_model(),
        &data,
        guess,
        &[("amp", 20.0), ("cen", -2.0), ("wid", 2.5)],
    );
}

#[test]
fn test_lorentzian_model() {
    let x = x();
    let data = lineshapes::loren(&x, 4.0, 0.5, 1.5);
    let guess = Kwargs::new().var("x", x).value("amp", 3.0).value("cen", 0.0).value("wid", 2.0);
    recover(
        &models::lorentzian_model(),
        &data,
        guess,
        &[("amp", 4.0), ("cen", 0.5), ("wid", 1.5)],
    );
}

#[test]
fn test_lorentzian_area_model() {
    let x = x();
    let data = lineshapes::loren_area(&x, 12.0, 3.0, 2.0);
    let guess = Kwargs::new().var("x", x).value("amp", 10.0).value("cen", 2.5).value("wid", 1.5);
    recover(
        &models::lorentzian_area_model(),
        &data,
        guess,
        &[("amp", 12.0), ("cen", 3.0), ("wid", 2.0)],
    );
}

#[test]
fn test_pseudo_voigt_model() {
    let x = x();
    let data = lineshapes::pvoigt(&x, 6.0, 1.0, 2.0, 0.3);
    let guess = Kwargs::new()
        .var("x", x)
        .value("amp", 5.0)
        .value("cen", 1.5)
        .value("wid", 2.5)
        .spec("frac", Parameter::with_bounds("frac", 0.5, 0.0, 1.0).unwrap());
    recover(
        &models::pseudo_voigt_model(),
        &data,
        guess,
        &[("amp", 6.0), ("cen", 1.0), ("wid", 2.0), ("frac", 0.3)],
    );
}

#[test]
fn test_pseudo_voigt_area_model() {
    let x = x();
    let data = lineshapes::pvoigt_area(&x, 15.0, -1.0, 1.5, 0.6);
    let guess = Kwargs::new()
        .var("x", x)
        .value("amp", 12.0)
        .value("cen", -0.5)
        .value("wid", 2.0)
        .spec("frac", Parameter::with_bounds("frac", 0.5, 0.0, 1.0).unwrap());
    recover(
        &models::pseudo_voigt_area_model(),
        &data,
        guess,
        &[("amp", 15.0), ("cen", -1.0), ("wid", 1.5), ("frac", 0.6)],
    );
}

#[test]
fn test_pearson7_model() {
    let x = x();
    let data = lineshapes::pearson7(&x, 5.0, 0.25, 2.0, 2.0);
    let guess = Kwargs::new()
        .var("x", x)
        .value("amp", 4.0)
        .value("cen", 0.5)
        .value("wid", 2.5)
        .spec("expon", Parameter::new("expon", 1.5).with_min(0.6).unwrap());
    recover(
        &models::pearson7_model(),
        &data,
        guess,
        &[("amp", 5.0), ("cen", 0.25), ("wid", 2.0), ("expon", 2.0)],
    );
}

#[test]
fn test_pearson7_area_model() {
    let x = x();
    let data = lineshapes::pearson7_area(&x, 10.0, 2.0, 1.5, 2.5);
    let guess = Kwargs::new()
        .var("x", x)
        .value("amp", 8.0)
        .value("cen", 2.5)
        .value("wid", 2.0)
        .spec("expon", Parameter::new("expon", 2.0).with_min(0.6).unwrap());
    recover(
        &models::pearson7_area_model(),
        &data,
        guess,
        &[("amp", 10.0), ("cen", 2.0), ("wid", 1.5), ("expon", 2.5)],
    );
}

#[test]
fn test_builtin_defaults_start_the_fit() {
    let x = x();
    let data = add_noise(&lineshapes::gauss(&x, 1.5, 0.5, 1.2), 0.005, 7);

    // amp = 1, cen = 0, wid = 1 from the model
    let result = models::gaussian_model()
        .fit(&data, None, &Kwargs::new().var("x", x))
        .unwrap();

    assert!(result.success, "{}", result.message);
    assert_results_close(&result, &[("amp", 1.5), ("cen", 0.5), ("wid", 1.2)], 1e-2);
    assert_eq!(result.init_value("amp"), Some(1.0));
}

#[test]
fn test_registry_lookup_and_fit() {
    let registry = ModelRegistry::with_lineshapes();
    assert_eq!(registry.len(), 8);
    assert_eq!(
        registry.names(),
        vec![
            "gauss",
            "gauss_area",
            "loren",
            "loren_area",
            "pearson7",
            "pearson7_area",
            "pvoigt",
            "pvoigt_area"
        ]
    );

    let model = registry.get("loren").unwrap();
    assert_eq!(model.param_names(), &["amp", "cen", "wid"]);

    let x = x();
    let data = lineshapes::loren(&x, 2.0, -1.0, 0.8);
    let result = model.fit(&data, None, &Kwargs::new().var("x", x)).unwrap();
    assert_results_close(&result, &[("amp", 2.0), ("cen", -1.0), ("wid", 0.8)], 1e-3);
}

#[test]
fn test_registry_register() {
    let mut registry = ModelRegistry::new();
    assert!(registry.is_empty());

    registry.register("peak", models::gaussian_model()).unwrap();
    let err = registry.register("peak", models::lorentzian_model()).unwrap_err();
    assert!(matches!(err, PeakFitError::InvalidInput(_)));

    // the first registration is kept
    assert_eq!(registry.get("peak").unwrap().name(), "gauss");
    assert!(registry.remove("peak").is_some());
    assert!(!registry.contains("peak"));
}
