//! Linear algebra

use num_traits::{Float, Zero};

/// Linear algebra trait.
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// Dense vector kernels used by the splitting iteration.
/// Every slice argument paired with another shall have the same length.
pub trait LinAlg
{
    /// Floating point data type used as scalars.
    type F: Float;

    /// Calculate 2-norm (or euclidean norm) \\(\\|x\\|_2=\sqrt{\sum_i x_i^2}\\).
    /// 
    /// Returns the calculated norm.
    /// * `x` is a vector \\(x\\).
    fn norm(x: &[Self::F]) -> Self::F;

    /// Calculate infinity-norm \\(\\|x\\|_\infty=\max_i |x_i|\\).
    /// 
    /// Returns the calculated norm, zero for an empty vector.
    /// * `x` is a vector \\(x\\).
    fn norm_inf(x: &[Self::F]) -> Self::F;

    /// Calculate inner product \\(x^T y\\).
    /// 
    /// Returns the calculated product.
    fn dot(x: &[Self::F], y: &[Self::F]) -> Self::F;

    /// Copy from a vector to another vector.
    /// 
    /// * `x` is a slice to copy.
    /// * `y` is a slice being copied to.
    fn copy(x: &[Self::F], y: &mut [Self::F]);

    /// Calculate \\(\alpha x\\).
    /// 
    /// * `alpha` is a scalar \\(\alpha\\).
    /// * `x` is a vector \\(x\\) before entry, \\(\alpha x\\) on exit.
    fn scale(alpha: Self::F, x: &mut [Self::F]);

    /// Calculate \\(\alpha x + y\\).
    /// 
    /// * `alpha` is a scalar \\(\alpha\\).
    /// * `x` is a vector \\(x\\).
    /// * `y` is a vector \\(y\\) before entry, \\(\alpha x + y\\) on exit.
    fn add(alpha: Self::F, x: &[Self::F], y: &mut [Self::F]);

    /// Calculate \\(s\mathbb{1} + y\\).
    /// 
    /// * `s` is a scalar \\(s\\).
    /// * `y` is a vector \\(y\\) before entry, \\(s\mathbb{1} + y\\) on exit.
    fn adds(s: Self::F, y: &mut [Self::F]);

    /// Calculate \\(\alpha D x + \beta y\\),
    /// where \\(D={\bf diag}(d)\\) is a diagonal matrix.
    /// 
    /// * `alpha` is a scalar \\(\alpha\\).
    /// * `mat` is a diagonal vector \\(d\\) of \\(D\\).
    /// * `x` is a vector \\(x\\).
    /// * `beta` is a scalar \\(\beta\\).
    /// * `y` is a vector \\(y\\) before entry, \\(\alpha D x + \beta y\\) on exit.
    fn transform_di(alpha: Self::F, mat: &[Self::F], x: &[Self::F], beta: Self::F, y: &mut [Self::F]);

    /// Calculate 2-norm of the difference \\(\\|x - y\\|_2\\).
    fn norm_diff(x: &[Self::F], y: &[Self::F]) -> Self::F
    {
        assert_eq!(x.len(), y.len());

        let mut sum = Self::F::zero();
        for (u, v) in x.iter().zip(y) {
            let d = *u - *v;
            sum = sum + d * d;
        }
        sum.sqrt()
    }
}

/// Splits a slice into consecutive immutable sub-slices of given lengths.
/// 
/// `splitm!(x, (x_x; n), (x_y; m))` binds `x_x` to `&x[0..n]` and `x_y` to `&x[n..n+m]`.
#[macro_export]
macro_rules! splitm {
    ($slice:expr, $( ($var:ident; $len:expr) ),+ ) => {
        let _splitm_rest: &[_] = &$slice[..];
        $(
            let ($var, _splitm_rest) = _splitm_rest.split_at($len);
        )*
    };
}

/// Splits a slice into consecutive mutable sub-slices of given lengths.
/// 
/// Mutable counterpart of [`splitm!`].
#[macro_export]
macro_rules! splitm_mut {
    ($slice:expr, $( ($var:ident; $len:expr) ),+ ) => {
        let _splitm_rest: &mut [_] = &mut $slice[..];
        $(
            let ($var, _splitm_rest) = _splitm_rest.split_at_mut($len);
        )*
    };
}
