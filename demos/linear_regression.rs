//! Linear regression on synthetic data drawn from `y = 2·x₀ − 3.4·x₁ + 4.2 + ε`.
//!
//! Run with `RUST_LOG=debug cargo run --example linear_regression` for per-epoch logs.

use scratchnet::{
    dataset::synthetic,
    loss::MSELoss,
    metrics::MeanSquaredError,
    model::{InferenceModel, Init, LinearRegression},
    optimizer::SGD,
    trainer::Trainer,
    CpuBackend, Tensor1D,
};

const TRUE_W: [f32; 2] = [2.0, -3.4];
const TRUE_B: f32 = 4.2;

fn main() -> scratchnet::Result<()> {
    env_logger::init();

    let train = synthetic::linear(&TRUE_W, TRUE_B, 1000, 0.01, 0)?;
    let valid = synthetic::linear(&TRUE_W, TRUE_B, 200, 0.01, 1)?;

    let init = Init::Normal { std: 0.01, seed: 0 };
    let model = LinearRegression::<CpuBackend>::with_init(2, init)?;
    let trainer = Trainer::builder(MSELoss, SGD::new(0.03))
        .batch_size(10)
        .max_epochs(3)
        .build();

    let (fitted, _history) = trainer.fit(model, &train, &valid, &MeanSquaredError)?;

    let w = fitted.weights();
    println!(
        "error in estimating w: [{:.5}, {:.5}]",
        TRUE_W[0] as f64 - w[0],
        TRUE_W[1] as f64 - w[1]
    );
    println!("error in estimating b: {:.5}", TRUE_B as f64 - fitted.bias());

    let y = fitted.predict(&Tensor1D::new(vec![1.0, 1.0]));
    println!(
        "prediction at (1, 1): {:.4} (true {:.4})",
        y.to_f64(),
        2.0 - 3.4 + 4.2
    );
    Ok(())
}
