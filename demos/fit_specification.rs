//! Example showing how a record type is turned into a fit specification
//!
//! A Gaussian peak with a tied height field and a fixed background is
//! declared as a record. The generated specification provides the fitting
//! vector, its bounds and the conversions a least-squares solver needs.

use fitparams_rs::error::Result;
use fitparams_rs::fields::{field_value, FieldDecl, FieldValues, RecordLayout};
use fitparams_rs::problem::{CurveFitProblem, Problem};
use fitparams_rs::record::FitRecord;
use fitparams_rs::spec::FitSpec;
use ndarray::{array, Array1, Array2};

/// A Gaussian peak: f(x) = amplitude * exp(-(x - center)^2 / (2 * sigma^2)) + background
#[derive(Debug, Clone)]
struct Gaussian {
    amplitude: f64,
    center: f64,
    sigma: f64,
    // Tied to `amplitude`, reported alongside it
    height: f64,
    background: f64,
}

impl Gaussian {
    fn eval(&self, x: f64) -> f64 {
        self.amplitude * (-((x - self.center).powi(2)) / (2.0 * self.sigma.powi(2))).exp()
            + self.background
    }
}

impl FitRecord for Gaussian {
    fn layout() -> RecordLayout {
        RecordLayout::new(vec![
            FieldDecl::bounded("amplitude", Some(0.0), None).unwrap(),
            FieldDecl::regular("center"),
            FieldDecl::bounded("sigma", Some(0.01), Some(5.0))
                .unwrap()
                .with_default(1.0),
            FieldDecl::same_as("height", "amplitude"),
            FieldDecl::constant("background", 0.1),
        ])
        .unwrap()
    }

    fn from_values(values: &FieldValues) -> Result<Self> {
        Ok(Self {
            amplitude: field_value(values, "amplitude")?,
            center: field_value(values, "center")?,
            sigma: field_value(values, "sigma")?,
            height: field_value(values, "height")?,
            background: values.get("background").copied().unwrap_or(0.1),
        })
    }

    fn field_value(&self, name: &str) -> Option<f64> {
        match name {
            "amplitude" => Some(self.amplitude),
            "center" => Some(self.center),
            "sigma" => Some(self.sigma),
            "height" => Some(self.height),
            "background" => Some(self.background),
            _ => None,
        }
    }
}

fn gaussian_model(x: &Array1<f64>, peak: &Gaussian) -> Result<Array1<f64>> {
    Ok(x.mapv(|xi| peak.eval(xi)))
}

fn main() -> Result<()> {
    let spec = FitSpec::<Gaussian>::generate()?;

    println!("Fit specification:");
    println!("  Fields: {}", spec.special_param_count());
    println!("  Fitting parameters: {:?}", spec.fitting_params());
    println!("  Initialization order: {:?}", spec.init_order());
    for (name, kind) in spec.fitting_field_kinds() {
        println!("  {:<10} {:?}", name, kind);
    }

    let (lower, upper) = spec.dense_bounds();
    println!("  Lower bounds: {}", lower);
    println!("  Upper bounds: {}", upper);

    // The layout can be stored next to the data it describes
    println!("\nLayout as JSON:\n{}", Gaussian::layout().to_json()?);

    // Synthetic data from known parameters
    let truth = spec.array_to_instance(&[3.0, 1.0, 0.5])?;
    let x = Array1::linspace(-5.0, 5.0, 100);
    let y = gaussian_model(&x, &truth)?;

    let problem = CurveFitProblem::new(spec.clone(), x, y, gaussian_model)?;

    let initial = problem.initial_params(None)?;
    println!("\nInitial parameters:");
    for (label, value) in problem.labels().iter().zip(initial.iter()) {
        println!("  {:<10} {:.6}", label, value);
    }
    println!("  Cost: {:.6}", problem.eval_cost(&initial)?);

    let fitted = array![3.0, 1.0, 0.5];
    println!("\nAt the true parameters:");
    println!("  Cost: {:.6e}", problem.eval_cost(&fitted)?);
    println!("  Record: {:?}", problem.instance(&fitted)?);

    // A solver would report its own covariance; a diagonal one stands in here
    let pcov = Array2::from_diag(&array![0.01, 0.0025, 0.0004]);
    let result = problem.fit_result(&fitted, pcov, None)?;
    println!("\nStandard errors:");
    for label in result.cov.fields() {
        if let Some(err) = result.cov.std_error(label) {
            println!("  {:<10} {:.4}", label, err);
        }
    }

    Ok(())
}
