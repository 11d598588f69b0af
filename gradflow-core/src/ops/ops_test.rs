use super::*;
use crate::array::{Data, NdArray};
use crate::utils::testing::{check_array_near, create_test_variable, scalar_variable};

/// An operation that provides neither rule.
#[derive(Debug)]
struct Unimplemented;

impl Operation for Unimplemented {
    fn name(&self) -> &'static str {
        "unimplemented"
    }

    fn arity(&self) -> usize {
        1
    }
}

/// Splits an array into (x, 2x); backward sums gy0 + 2 * gy1.
#[derive(Debug)]
struct SplitDouble;

impl Operation for SplitDouble {
    fn name(&self) -> &'static str {
        "split_double"
    }

    fn arity(&self) -> usize {
        1
    }

    fn forward(&self, xs: &[NdArray]) -> Result<Vec<Data>, GradFlowError> {
        Ok(vec![xs[0].clone().into(), xs[0].mul_scalar(2.0).into()])
    }

    fn backward(&self, _xs: &[NdArray], gys: &[NdArray]) -> Result<Vec<NdArray>, GradFlowError> {
        Ok(vec![gys[0].add(&gys[1].mul_scalar(2.0))?])
    }
}

/// Returns the sum of its input as a bare scalar.
#[derive(Debug)]
struct SumToScalar;

impl Operation for SumToScalar {
    fn name(&self) -> &'static str {
        "sum_to_scalar"
    }

    fn arity(&self) -> usize {
        1
    }

    fn forward(&self, xs: &[NdArray]) -> Result<Vec<Data>, GradFlowError> {
        Ok(vec![Data::Scalar(xs[0].to_f64_vec().iter().sum())])
    }

    fn backward(&self, xs: &[NdArray], gys: &[NdArray]) -> Result<Vec<NdArray>, GradFlowError> {
        let g = gys[0].item()?;
        Ok(vec![crate::array::full(xs[0].shape(), xs[0].dtype(), g)])
    }
}

/// Backward returns one gradient for two inputs.
#[derive(Debug)]
struct ShortBackward;

impl Operation for ShortBackward {
    fn name(&self) -> &'static str {
        "short_backward"
    }

    fn arity(&self) -> usize {
        2
    }

    fn forward(&self, xs: &[NdArray]) -> Result<Vec<Data>, GradFlowError> {
        Ok(vec![xs[0].add(&xs[1])?.into()])
    }

    fn backward(&self, _xs: &[NdArray], gys: &[NdArray]) -> Result<Vec<NdArray>, GradFlowError> {
        Ok(vec![gys[0].clone()])
    }
}

/// Forward produces nothing.
#[derive(Debug)]
struct NoOutputs;

impl Operation for NoOutputs {
    fn name(&self) -> &'static str {
        "no_outputs"
    }

    fn arity(&self) -> usize {
        1
    }

    fn forward(&self, _xs: &[NdArray]) -> Result<Vec<Data>, GradFlowError> {
        Ok(vec![])
    }
}

#[test]
fn test_apply_binary_on_one_input_fails() {
    let x = scalar_variable(1.0);
    let err = apply(Add, &[&x]).unwrap_err();
    assert_eq!(
        err,
        GradFlowError::ArityMismatch {
            operation: "add".to_string(),
            expected: 2,
            actual: 1
        }
    );
}

#[test]
fn test_apply_unary_on_two_inputs_fails() {
    let x = scalar_variable(1.0);
    let y = scalar_variable(2.0);
    let err = apply(Square, &[&x, &y]).unwrap_err();
    assert!(matches!(err, GradFlowError::ArityMismatch { expected: 1, actual: 2, .. }));
}

#[test]
fn test_apply_requires_data() {
    let empty = Variable::empty();
    let err = square_op(&empty).unwrap_err();
    assert_eq!(
        err,
        GradFlowError::MissingData {
            operation: "square".to_string()
        }
    );
}

#[test]
fn test_default_rules_are_not_implemented() -> Result<(), GradFlowError> {
    let x = scalar_variable(1.0);
    let err = apply(Unimplemented, &[&x]).unwrap_err();
    assert_eq!(
        err,
        GradFlowError::NotImplemented {
            operation: "unimplemented".to_string(),
            method: "forward"
        }
    );
    let err = Unimplemented
        .backward(&[NdArray::scalar(1.0)], &[NdArray::scalar(1.0)])
        .unwrap_err();
    assert!(matches!(err, GradFlowError::NotImplemented { method: "backward", .. }));
    Ok(())
}

#[test]
fn test_failed_forward_leaves_inputs_untouched() {
    let a = create_test_variable(vec![1.0, 2.0], vec![2]);
    let b = create_test_variable(vec![1.0, 2.0, 3.0], vec![3]);
    assert!(add_op(&a, &b).is_err());
    assert!(a.is_leaf() && b.is_leaf());
    assert!(a.grad().is_none() && b.grad().is_none());
    assert_eq!(a.generation(), 0);
}

#[test]
fn test_zero_outputs_is_an_arity_error() {
    let x = scalar_variable(1.0);
    let err = apply(NoOutputs, &[&x]).unwrap_err();
    assert!(matches!(err, GradFlowError::ArityMismatch { expected: 1, actual: 0, .. }));
}

#[test]
fn test_scalar_results_are_normalised() -> Result<(), GradFlowError> {
    let x = create_test_variable(vec![1.0, 2.0, 3.0], vec![3]);
    let s = apply(SumToScalar, &[&x])?.into_one()?;
    let data = s.data().unwrap();
    assert!(data.is_scalar());
    assert_eq!(data.item()?, 6.0);

    s.backward()?;
    check_array_near(&x.grad().unwrap(), &[3], &[1.0, 1.0, 1.0], 0.0);
    Ok(())
}

#[test]
fn test_single_output_is_returned_directly() -> Result<(), GradFlowError> {
    let x = scalar_variable(2.0);
    let outputs = apply(Square, &[&x])?;
    assert!(matches!(outputs, Outputs::One(_)));
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs.iter().count(), 1);
    assert_eq!(outputs.into_vec().len(), 1);
    Ok(())
}

#[test]
fn test_multi_output_operation() -> Result<(), GradFlowError> {
    let x = scalar_variable(3.0);
    let outputs = apply(SplitDouble, &[&x])?;
    assert_eq!(outputs.len(), 2);
    assert!(outputs.clone().into_one().is_err());

    let ys = outputs.into_vec();
    let creator = ys[0].grad_fn().unwrap();
    assert_eq!(ys[1].grad_fn(), Some(creator.clone()));
    assert_eq!(creator.num_outputs(), 2);
    assert_eq!(creator.outputs(), vec![Some(ys[0].clone()), Some(ys[1].clone())]);

    // Only the second output is differentiated; the first contributes zeros.
    ys[1].backward()?;
    assert_eq!(x.grad().unwrap().item()?, 2.0);

    // Both outputs combined: d(y0 + y1)/dx = 1 + 2.
    x.clear_grad();
    let total = add_op(&ys[0], &ys[1])?;
    ys[1].clear_grad();
    total.backward()?;
    assert_eq!(x.grad().unwrap().item()?, 3.0);
    Ok(())
}

#[test]
fn test_dropped_sibling_output_contributes_zeros() -> Result<(), GradFlowError> {
    let x = scalar_variable(3.0);
    let mut ys = apply(SplitDouble, &[&x])?.into_vec();
    let second = ys.pop().unwrap();
    drop(ys);
    assert!(second.grad_fn().unwrap().outputs()[0].is_none());

    // y = (2x)^2, dy/dx = 8x
    let y = square_op(&second)?;
    y.backward()?;
    check_array_near(&x.grad().unwrap(), &[], &[24.0], 1e-12);
    Ok(())
}

#[test]
fn test_backward_gradient_count_is_checked() -> Result<(), GradFlowError> {
    let a = scalar_variable(1.0);
    let b = scalar_variable(2.0);
    let y = apply(ShortBackward, &[&a, &b])?.into_one()?;
    let err = y.backward().unwrap_err();
    assert_eq!(
        err,
        GradFlowError::ArityMismatch {
            operation: "short_backward".to_string(),
            expected: 2,
            actual: 1
        }
    );
    Ok(())
}

#[test]
fn test_apply_boxed() -> Result<(), GradFlowError> {
    let x = scalar_variable(2.0);
    let op: Box<dyn Operation> = Box::new(Exp);
    let y = apply_boxed(op, &[&x])?.into_one()?;
    assert_eq!(y.grad_fn().unwrap().name(), "exp");
    Ok(())
}
