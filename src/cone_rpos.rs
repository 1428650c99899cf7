use num_traits::{Float, Zero};
use core::marker::PhantomData;
use crate::solver::{Cone, LinAlg};

//

/// Nonnegative orthant cone
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// \\[
/// \mathbb{R}\_+^n = \mathbb{R}\_+ \times \cdots \times \mathbb{R}\_+ =
/// \left\lbrace x \in \mathbb{R}^n
/// \ \middle|\ x_i \ge 0,\ i=1,\ldots,n
/// \right\rbrace
/// \\]
pub struct ConeRPos<L: LinAlg>
{
    ph_l: PhantomData<L>,
}

impl<L: LinAlg> ConeRPos<L>
{
    /// Creates an instance.
    /// 
    /// Returns [`ConeRPos`] instance.
    pub fn new() -> Self
    {
        ConeRPos {
            ph_l: PhantomData,
        }
    }
}

impl<L: LinAlg> Default for ConeRPos<L>
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl<L: LinAlg> Cone<L> for ConeRPos<L>
{
    fn proj(&mut self, _dual_cone: bool, x: &mut [L::F])
    {
        for e in x {
            *e = e.max(L::F::zero());
        }
    }

    fn product_group<G: Fn(&mut [L::F]) + Copy>(&self, _dp: &mut [L::F], _group: G)
    {
        // do nothing
    }
}

//

#[test]
fn test_rpos1()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;

    let mut c = ConeRPos::<FloatGeneric<f64>>::new();

    let mut x = [1., -2., 0., -0.5];
    c.proj(false, &mut x);
    assert_float_eq!(x, [1., 0., 0., 0.], abs_all <= 1e-15);

    let mut y = [-1., 3.];
    c.proj(true, &mut y);
    assert_float_eq!(y, [0., 3.], abs_all <= 1e-15);
}
