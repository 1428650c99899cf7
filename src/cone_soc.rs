use num_traits::{Zero, One};
use core::marker::PhantomData;
use crate::solver::{Cone, LinAlg};

//

/// Second-order (or quadratic) cone
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// \\[
/// \mathcal{Q}^n =
/// \left\lbrace x \in \mathbb{R}^n
/// \ \middle|\ \sqrt{x_2^2+\cdots+x_n^2} \le x_1
/// \right\rbrace
/// \\]
/// 
/// Self-dual. The whole slice passed to [`Cone::proj`] is one cone.
pub struct ConeSOC<L: LinAlg>
{
    ph_l: PhantomData<L>,
}

impl<L: LinAlg> ConeSOC<L>
{
    /// Creates an instance.
    /// 
    /// Returns [`ConeSOC`] instance.
    pub fn new() -> Self
    {
        ConeSOC {
            ph_l: PhantomData,
        }
    }
}

impl<L: LinAlg> Default for ConeSOC<L>
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl<L: LinAlg> Cone<L> for ConeSOC<L>
{
    fn proj(&mut self, _dual_cone: bool, x: &mut [L::F])
    {
        let f0 = L::F::zero();
        let f1 = L::F::one();
        let f2 = f1 + f1;

        if let Some((s, v)) = x.split_first_mut() {
            let val_s = *s;
            let norm_v = L::norm(v);

            if norm_v <= -val_s {
                L::scale(f0, v);
                *s = f0;
            }
            else if norm_v <= val_s {
                // as they are
            }
            else {
                let alpha = (f1 + val_s / norm_v) / f2;
                L::scale(alpha, v);
                *s = (norm_v + val_s) / f2;
            }
        }
    }

    fn product_group<G: Fn(&mut [L::F]) + Copy>(&self, dp: &mut [L::F], group: G)
    {
        group(dp);
    }
}

//

#[test]
fn test_soc1()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;

    let mut c = ConeSOC::<FloatGeneric<f64>>::new();

    // outside: projected onto the boundary
    let mut x = [0., 3., 4.];
    c.proj(false, &mut x);
    assert_float_eq!(x, [2.5, 1.5, 2.], abs_all <= 1e-15);

    // polar: projected to zero
    let mut x = [-5., 3., 4.];
    c.proj(false, &mut x);
    assert_float_eq!(x, [0., 0., 0.], abs_all <= 1e-15);

    // interior: unchanged
    let mut x = [6., 3., -4.];
    c.proj(true, &mut x);
    assert_float_eq!(x, [6., 3., -4.], abs_all <= 1e-15);
}
