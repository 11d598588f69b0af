use gradflow_core::{NdArray, Variable};

// Helpers shared by the integration tests. Each test binary uses a subset.

#[allow(dead_code)]
pub fn scalar(value: f64) -> Variable {
    Variable::from_array(NdArray::scalar(value))
}

#[allow(dead_code)]
pub fn vector(data: Vec<f64>) -> Variable {
    let len = data.len();
    Variable::from_array(NdArray::new_f64(data, vec![len]).expect("Test array creation failed"))
}

#[allow(dead_code)]
pub fn grad_item(v: &Variable) -> f64 {
    v.grad()
        .expect("variable has no gradient")
        .item()
        .expect("gradient is not a single element")
}

/// Opt-in log output: RUST_LOG=trace cargo test
#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
