use approx::assert_abs_diff_eq;
use gradflow_core::ops::{add_op, exp_op, mul_op, square_op};
use gradflow_core::{BackwardOptions, GradFlowError, TraversalOrder, Variable};

mod common;
use common::{grad_item, init_logger, scalar, vector};

#[test]
fn test_chain_square_exp_square() -> Result<(), GradFlowError> {
    init_logger();
    let x = scalar(0.5);
    let a = square_op(&x)?;
    let b = exp_op(&a)?;
    let y = square_op(&b)?;
    y.backward()?;

    // d/dx (e^{x^2})^2 = 4x e^{2x^2}
    let expected = 4.0 * 0.5 * (2.0 * 0.25f64).exp();
    assert_abs_diff_eq!(grad_item(&x), 3.2974426293, epsilon = 0.01);
    assert_abs_diff_eq!(grad_item(&x), expected, epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_chain_same_result_in_both_orders() -> Result<(), GradFlowError> {
    for order in [TraversalOrder::Generation, TraversalOrder::Stack] {
        let x = scalar(0.5);
        let y = square_op(&exp_op(&square_op(&x)?)?)?;
        y.backward_with(BackwardOptions::with_order(order))?;
        assert_abs_diff_eq!(grad_item(&x), 2.0 * 0.5f64.exp(), epsilon = 1e-12);
    }
    Ok(())
}

#[test]
fn test_fan_out_on_leaf() -> Result<(), GradFlowError> {
    let x = scalar(3.0);
    let y = add_op(&x, &x)?;
    y.backward()?;
    assert_eq!(grad_item(&x), 2.0);
    Ok(())
}

#[test]
fn test_nested_fan_out_after_clear() -> Result<(), GradFlowError> {
    let x = scalar(3.0);
    let y = add_op(&x, &x)?;
    y.backward()?;
    assert_eq!(grad_item(&x), 2.0);

    x.clear_grad();
    let y = add_op(&add_op(&x, &x)?, &x)?;
    y.backward()?;
    assert_eq!(grad_item(&x), 3.0);
    Ok(())
}

#[test]
fn test_nested_fan_out_stack_order() -> Result<(), GradFlowError> {
    let x = scalar(3.0);
    let y = add_op(&add_op(&x, &x)?, &x)?;
    y.backward_with(BackwardOptions::with_order(TraversalOrder::Stack))?;
    assert_eq!(grad_item(&x), 3.0);
    Ok(())
}

#[test]
fn test_without_clear_grad_contributions_carry_over() -> Result<(), GradFlowError> {
    let x = scalar(3.0);
    add_op(&x, &x)?.backward()?;
    add_op(&add_op(&x, &x)?, &x)?.backward()?;
    assert_eq!(grad_item(&x), 5.0);

    x.clear_grad();
    add_op(&add_op(&x, &x)?, &x)?.backward()?;
    assert_eq!(grad_item(&x), 3.0);
    Ok(())
}

#[test]
fn test_interior_fan_out_generation_order_is_exact() -> Result<(), GradFlowError> {
    // y = a + a with a = x^2, so dy/dx = 4x.
    let x = scalar(2.0);
    let a = square_op(&x)?;
    let y = add_op(&a, &a)?;
    y.backward()?;
    assert_eq!(grad_item(&a), 2.0);
    assert_eq!(grad_item(&x), 8.0);
    Ok(())
}

#[test]
fn test_interior_fan_out_stack_order_over_counts() -> Result<(), GradFlowError> {
    // Stack order runs the square node once per consumer edge.
    let x = scalar(2.0);
    let a = square_op(&x)?;
    let y = add_op(&a, &a)?;
    y.backward_with(BackwardOptions::with_order(TraversalOrder::Stack))?;
    assert_eq!(grad_item(&a), 2.0);
    assert_eq!(grad_item(&x), 16.0);
    Ok(())
}

#[test]
fn test_deep_diamond() -> Result<(), GradFlowError> {
    // a = x^2, y = exp(a) * a^2
    // dy/dx = (exp(a) * a^2 + exp(a) * 2a) * 2x
    let x_val = 0.7f64;
    let x = scalar(x_val);
    let a = square_op(&x)?;
    let left = exp_op(&a)?;
    let right = square_op(&a)?;
    let y = mul_op(&left, &right)?;
    y.backward()?;

    let a_val = x_val * x_val;
    let expected = (a_val.exp() * a_val * a_val + a_val.exp() * 2.0 * a_val) * 2.0 * x_val;
    assert_abs_diff_eq!(grad_item(&x), expected, epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_vector_gradients() -> Result<(), GradFlowError> {
    let x = vector(vec![1.0, 2.0, 3.0]);
    let y = add_op(&square_op(&x)?, &x)?;
    y.backward()?;
    assert_eq!(x.grad().unwrap().get_f64_data()?, vec![3.0, 5.0, 7.0]);
    Ok(())
}

#[test]
fn test_interior_gradients_are_kept() -> Result<(), GradFlowError> {
    let x = scalar(1.0);
    let a = exp_op(&x)?;
    let y = square_op(&a)?;
    y.backward()?;
    assert_eq!(grad_item(&y), 1.0);
    assert_abs_diff_eq!(grad_item(&a), 2.0 * 1.0f64.exp(), epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_backward_on_leaf_is_a_no_op_beyond_seeding() -> Result<(), GradFlowError> {
    let x: Variable = scalar(4.0);
    x.backward()?;
    assert_eq!(grad_item(&x), 1.0);
    Ok(())
}
