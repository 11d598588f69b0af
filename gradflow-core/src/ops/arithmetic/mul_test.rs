use super::*;
use crate::autograd::grad_check::check_grad;
use crate::utils::testing::{check_array_near, create_test_variable};

#[test]
fn test_mul_forward_and_backward() -> Result<(), GradFlowError> {
    let a = create_test_variable(vec![1.0, 2.0, 3.0], vec![3]);
    let b = create_test_variable(vec![4.0, 5.0, 6.0], vec![3]);
    let c = mul_op(&a, &b)?;
    check_array_near(&c.data().unwrap(), &[3], &[4.0, 10.0, 18.0], 0.0);

    c.backward()?;
    check_array_near(&a.grad().unwrap(), &[3], &[4.0, 5.0, 6.0], 0.0);
    check_array_near(&b.grad().unwrap(), &[3], &[1.0, 2.0, 3.0], 0.0);
    Ok(())
}

#[test]
fn test_mul_self_is_square() -> Result<(), GradFlowError> {
    let x = create_test_variable(vec![1.5, -2.0], vec![2]);
    let y = mul_op(&x, &x)?;
    y.backward()?;
    check_array_near(&x.grad().unwrap(), &[2], &[3.0, -4.0], 1e-12);
    Ok(())
}

#[test]
fn test_mul_grad_check() {
    let a = create_test_variable(vec![0.5, -1.5, 2.0, 0.0], vec![2, 2]);
    let b = create_test_variable(vec![1.0, 0.25, -3.0, 4.0], vec![2, 2]);
    check_grad(
        |inputs: &[Variable]| mul_op(&inputs[0], &inputs[1]),
        &[a, b],
        1e-6,
        1e-4,
    )
    .unwrap();
}
