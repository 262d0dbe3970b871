//! Demonstrates timing a whole run together with the public methods of a model.
//!
//! - `Timer`: a registry of named stopwatches owned by the model
//! - `#[timed]`: wraps each public method so its calls are measured
//! - `Report`: a snapshot printed at the end
//!
//! Run with: `cargo run --example method_timer_basic`.

use std::hint::black_box;

use method_timer::{Timed, Timer, timed};

#[derive(Debug, Default, Timed)]
struct LinearModel {
    timer: Timer,
    slope: f64,
    intercept: f64,
}

#[timed]
impl LinearModel {
    pub fn fit(&mut self, xs: &[f64], ys: &[f64]) {
        #[expect(
            clippy::cast_precision_loss,
            reason = "sample counts in this example are tiny"
        )]
        let n = xs.len() as f64;

        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;

        let covariance: f64 = xs
            .iter()
            .zip(ys)
            .map(|(x, y)| (x - mean_x) * (y - mean_y))
            .sum();
        let variance: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();

        self.slope = covariance / variance;
        self.intercept = mean_y - self.slope * mean_x;
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

fn main() -> Result<(), method_timer::Error> {
    println!("=== Method Timing Example ===");
    println!();

    let mut model = LinearModel::default();
    model.timer().start_main()?;

    let xs: Vec<f64> = (0..100_000).map(f64::from).collect();
    let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();

    for _ in 0..3 {
        model.fit(black_box(&xs), black_box(&ys));
    }

    for x in 0..1000 {
        black_box(model.predict(f64::from(x)));
    }

    model.timer().stop_main()?;

    println!("Learned y = {:.2}x + {:.2}", model.slope, model.intercept);
    println!("Whole run took {:?}", model.timer().elapsed());
    println!();

    model.timer().print_to_stdout();

    Ok(())
}
