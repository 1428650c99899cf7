use num_traits::Float;
use core::marker::PhantomData;
use crate::solver::LinAlg;

/// `num_traits::Float`-generic [`LinAlg`] implementation
/// 
/// All numeric operations are written in pure Rust.
#[derive(Clone)]
pub struct FloatGeneric<F>
{
    ph_f: PhantomData<F>,
}

impl<F: Float> LinAlg for FloatGeneric<F>
{
    type F = F;

    fn norm(x: &[F]) -> F
    {
        let mut sum = F::zero();
        for u in x {
            sum = sum + *u * *u;
        }
        sum.sqrt()
    }

    fn norm_inf(x: &[F]) -> F
    {
        x.iter().fold(F::zero(), |acc, u| acc.max(u.abs()))
    }

    fn dot(x: &[F], y: &[F]) -> F
    {
        assert_eq!(x.len(), y.len());

        let mut sum = F::zero();
        for (u, v) in x.iter().zip(y) {
            sum = sum + *u * *v;
        }
        sum
    }
    
    fn copy(x: &[F], y: &mut[F])
    {
        assert_eq!(x.len(), y.len());
    
        for (u, v) in x.iter().zip(y) {
            *v = *u;
        }
    }

    fn scale(alpha: F, x: &mut[F])
    {
        for u in x {
            *u = alpha * *u;
        }
    }
    
    fn add(alpha: F, x: &[F], y: &mut[F])
    {
        assert_eq!(x.len(), y.len());
    
        for (u, v) in x.iter().zip(y) {
            *v = *v + alpha * *u;
        }
    }

    fn adds(s: F, y: &mut[F])
    {
        for v in y {
            *v = *v + s;
        }
    }

    fn transform_di(alpha: F, mat: &[F], x: &[F], beta: F, y: &mut[F])
    {
        assert_eq!(mat.len(), x.len());
        assert_eq!(mat.len(), y.len());

        for (i, v) in y.iter_mut().enumerate() {
            *v = alpha * mat[i] * x[i] + beta * *v;
        }
    }
}

//

#[test]
fn test_floatgeneric1()
{
    use float_eq::assert_float_eq;

    type L = FloatGeneric<f64>;

    let x = [3., -4.];
    let mut y = [1., 1.];

    assert_float_eq!(L::norm(&x), 5., abs <= 1e-15);
    assert_float_eq!(L::norm_inf(&x), 4., abs <= 1e-15);
    assert_float_eq!(L::dot(&x, &y), -1., abs <= 1e-15);
    assert_float_eq!(L::norm_diff(&x, &y), (4_f64 + 25.).sqrt(), abs <= 1e-15);

    L::add(2., &x, &mut y);
    assert_float_eq!(y, [7., -7.], abs_all <= 1e-15);

    L::transform_di(1., &[0.5, 2.], &x, -1., &mut y);
    assert_float_eq!(y, [-5.5, -1.], abs_all <= 1e-15);

    L::adds(1., &mut y);
    L::scale(-2., &mut y);
    assert_float_eq!(y, [9., 0.], abs_all <= 1e-15);
}
