//! Softmax regression on the handwritten-digit benchmark.
//!
//! Expects the four uncompressed IDX files (`train-images-idx3-ubyte`, ...) in the directory
//! named by `MNIST_DIR`, defaulting to `data/mnist`. Nothing is downloaded.

use std::env;

use scratchnet::{
    dataset::{load_mnist, Dataset, Split},
    loss::CrossEntropyLoss,
    metrics::Accuracy,
    model::{Init, SoftmaxRegression},
    optimizer::SGD,
    trainer::Trainer,
    NdarrayBackend,
};

const NUM_CLASSES: usize = 10;

fn main() -> scratchnet::Result<()> {
    env_logger::init();

    let dir = env::var("MNIST_DIR").unwrap_or_else(|_| "data/mnist".to_string());
    let train = load_mnist(&dir, Split::Train)?;
    let test = load_mnist(&dir, Split::Test)?;
    println!(
        "loaded {} training and {} test images of {} pixels",
        train.len(),
        test.len(),
        train.num_features()
    );

    let model = SoftmaxRegression::<NdarrayBackend>::with_init(
        train.num_features(),
        NUM_CLASSES,
        Init::Normal { std: 0.01, seed: 0 },
    )?;
    let trainer = Trainer::builder(CrossEntropyLoss::new(NUM_CLASSES), SGD::new(0.1))
        .batch_size(256)
        .max_epochs(10)
        .build();

    let (_fitted, history) = trainer.fit(model, &train, &test, &Accuracy)?;
    if let Some(last) = history.last() {
        println!("final test accuracy: {:.4}", last.eval_metric);
    }
    Ok(())
}
