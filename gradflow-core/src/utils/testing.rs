use crate::array::NdArray;

/// Checks if an array is approximately equal to the expected shape and data.
/// Elements are compared as f64 whatever the dtype.
/// Panics if shapes differ or data differs by more than `tolerance`.
pub fn check_array_near(actual: &NdArray, expected_shape: &[usize], expected_data: &[f64], tolerance: f64) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");

    let actual_data_vec = actual.to_f64_vec();
    assert_eq!(
        actual_data_vec.len(),
        expected_data.len(),
        "Data length mismatch"
    );

    for (i, (a, e)) in actual_data_vec.iter().zip(expected_data.iter()).enumerate() {
        let diff = (a - e).abs();
        if diff > tolerance {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i, a, e, diff, tolerance
            );
        }
    }
}

/// Helper to create a leaf variable from f64 data for testing purposes.
pub fn create_test_variable(data: Vec<f64>, shape: Vec<usize>) -> crate::variable::Variable {
    let array = NdArray::new_f64(data, shape).expect("Failed to create test array");
    crate::variable::Variable::from_array(array)
}

/// Helper to create a 0-d leaf variable.
pub fn scalar_variable(value: f64) -> crate::variable::Variable {
    crate::variable::Variable::from_array(NdArray::scalar(value))
}
