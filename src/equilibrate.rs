use num_traits::{Float, Zero, One, NumCast};
use crate::solver::{Cone, LinAlg};
use crate::csc::CscMatrix;

//

/// Diagonal equilibration of problem data
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// Replaces \\((A, b, c)\\) with
/// \\[
/// \hat{A} = D A E, \quad \hat{b} = \sigma_b D b, \quad \hat{c} = \sigma_c E c,
/// \\]
/// where \\(D, E\\) come from Ruiz passes \\(d_i = 1/\sqrt{\\|A_{i:}\\|_\infty}\\), \\(e_j = 1/\sqrt{\\|A_{:j}\\|_\infty}\\).
/// Rows of one cone group share the mean of their factors so the cone is preserved under \\(D\\).
/// A solution \\((\hat{x}, \hat{y}, \hat{s})\\) of the scaled problem maps back by
/// \\(x = E \hat{x} / \sigma_b\\), \\(y = D \hat{y} / \sigma_c\\), \\(s = D^{-1} \hat{s} / \sigma_b\\).
pub struct Equilibration<L: LinAlg>
{
    d: Vec<L::F>,
    e: Vec<L::F>,
    sc_b: L::F,
    sc_c: L::F,
}

impl<L: LinAlg> Equilibration<L>
{
    /// No scaling.
    pub fn identity(m: usize, n: usize) -> Self
    {
        let f1 = L::F::one();

        Equilibration {
            d: vec![f1; m],
            e: vec![f1; n],
            sc_b: f1,
            sc_c: f1,
        }
    }

    /// Scales the problem data in place.
    /// 
    /// Returns [`Equilibration`] to unscale a solution with.
    /// * `a`, `b`, `c` are \\(A, b, c\\) before entry, \\(\hat{A}, \hat{b}, \hat{c}\\) on exit.
    /// * `cone` gives the row groups sharing one factor.
    /// * `iters` is the number of Ruiz passes.
    /// * `scale` multiplies \\(\sigma_b\\) and \\(\sigma_c\\).
    pub fn new<C: Cone<L>>(a: &mut CscMatrix<L::F>, b: &mut [L::F], c: &mut [L::F], cone: &C, iters: usize, scale: L::F) -> Self
    {
        let f1 = L::F::one();
        let (m, n) = a.size();
        assert_eq!(b.len(), m);
        assert_eq!(c.len(), n);

        let min_scale = <L::F as NumCast>::from(1e-4).unwrap();
        let max_scale = <L::F as NumCast>::from(1e4).unwrap();

        let mut eq = Self::identity(m, n);

        for _ in 0.. iters {
            let factor = |norm: &L::F| {
                if *norm > L::F::zero() {
                    norm.max(min_scale).min(max_scale).sqrt().recip()
                }
                else {
                    f1
                }
            };

            let mut d_pass: Vec<L::F> = a.row_norms_inf().iter().map(factor).collect();
            let e_pass: Vec<L::F> = a.col_norms_inf().iter().map(factor).collect();

            cone.product_group(&mut d_pass, |g: &mut [L::F]| {
                if let Some(cnt) = <L::F as NumCast>::from(g.len()) {
                    let mean = g.iter().fold(L::F::zero(), |acc, v| acc + *v) / cnt;
                    g.iter_mut().for_each(|v| *v = mean);
                }
            });

            a.scale_rows(&d_pass);
            a.scale_cols(&e_pass);
            for (acc, v) in eq.d.iter_mut().zip(&d_pass) {
                *acc = *acc * *v;
            }
            for (acc, v) in eq.e.iter_mut().zip(&e_pass) {
                *acc = *acc * *v;
            }
        }

        for (v, d) in b.iter_mut().zip(&eq.d) {
            *v = *v * *d;
        }
        for (v, e) in c.iter_mut().zip(&eq.e) {
            *v = *v * *e;
        }

        let mean_col_norm = Self::mean(a.col_sq_norms().into_iter().map(|s| s.sqrt()), n);
        let mut row_sq = vec![L::F::zero(); m];
        for (r, v) in a.row_idx().iter().zip(a.values()) {
            row_sq[*r] = row_sq[*r] + *v * *v;
        }
        let mean_row_norm = Self::mean(row_sq.into_iter().map(|s| s.sqrt()), m);

        eq.sc_b = scale * mean_col_norm / L::norm(b).max(min_scale);
        eq.sc_c = scale * mean_row_norm / L::norm(c).max(min_scale);
        if !(eq.sc_b > L::F::zero()) {
            eq.sc_b = f1;
        }
        if !(eq.sc_c > L::F::zero()) {
            eq.sc_c = f1;
        }
        L::scale(eq.sc_b, b);
        L::scale(eq.sc_c, c);

        log::debug!("equilibrated with {} passes", iters);

        eq
    }

    fn mean<I: Iterator<Item=L::F>>(it: I, len: usize) -> L::F
    {
        let sum = it.fold(L::F::zero(), |acc, v| acc + v);
        match <L::F as NumCast>::from(len) {
            Some(cnt) if len > 0 => sum / cnt,
            _ => L::F::zero(),
        }
    }

    /// \\(x = E \hat{x} / \sigma_b\\)
    pub fn unscale_x(&self, x_hat: &[L::F]) -> Vec<L::F>
    {
        x_hat.iter().zip(&self.e).map(|(x, e)| *x * *e / self.sc_b).collect()
    }

    /// \\(y = D \hat{y} / \sigma_c\\)
    pub fn unscale_y(&self, y_hat: &[L::F]) -> Vec<L::F>
    {
        y_hat.iter().zip(&self.d).map(|(y, d)| *y * *d / self.sc_c).collect()
    }

    /// \\(s = D^{-1} \hat{s} / \sigma_b\\)
    pub fn unscale_s(&self, s_hat: &[L::F]) -> Vec<L::F>
    {
        s_hat.iter().zip(&self.d).map(|(s, d)| *s / (*d * self.sc_b)).collect()
    }
}

//

#[cfg(test)]
mod tests
{
    use float_eq::assert_float_eq;
    use crate::{FloatGeneric, ConeProduct, ConeBlock};
    use super::*;

    type L = FloatGeneric<f64>;

    #[test]
    fn test_equilibrate_roundtrip()
    {
        let _ = env_logger::builder().is_test(true).try_init();

        let a = CscMatrix::from_rowmaj(4, 3, &[
            100., 0., 1.,
            0., 0.01, 2.,
            3., 40., 0.,
            0., 5., 0.5,
        ]).unwrap();
        let cone = ConeProduct::<L>::new(&[ConeBlock::NonnegativeOrthant(1), ConeBlock::SecondOrder(3)]);

        let x = [1., -2., 0.5];
        let s = [2., 3., 1., -1.];
        let y = [0.5, 1., -0.2, 0.3];

        // b = A x + s, r = A' y + c for an arbitrary dual residual r
        let mut b = a.multiply(&x).unwrap();
        L::add(1., &s, &mut b);
        let c = vec![1., 2., -3.];

        let mut a_hat = a.clone();
        let mut b_hat = b.clone();
        let mut c_hat = c.clone();
        let eq = Equilibration::<L>::new(&mut a_hat, &mut b_hat, &mut c_hat, &cone, 10, 1.);

        // second-order rows share one factor
        assert_float_eq!(eq.d[1], eq.d[2], rmax <= 1e-15);
        assert_float_eq!(eq.d[2], eq.d[3], rmax <= 1e-15);

        // scaled images of (x, s, y)
        let x_hat: Vec<f64> = x.iter().zip(&eq.e).map(|(v, e)| v * eq.sc_b / e).collect();
        let s_hat: Vec<f64> = s.iter().zip(&eq.d).map(|(v, d)| v * eq.sc_b * d).collect();
        let y_hat: Vec<f64> = y.iter().zip(&eq.d).map(|(v, d)| v * eq.sc_c / d).collect();

        // primal equation holds in the scaled problem
        let mut p = a_hat.multiply(&x_hat).unwrap();
        L::add(1., &s_hat, &mut p);
        L::add(-1., &b_hat, &mut p);
        assert_float_eq!(L::norm(&p), 0., abs <= 1e-10);

        // dual residual scales by sc_c E
        let mut r = a.multiply_transpose(&y).unwrap();
        L::add(1., &c, &mut r);
        let mut r_hat = a_hat.multiply_transpose(&y_hat).unwrap();
        L::add(1., &c_hat, &mut r_hat);
        for j in 0.. 3 {
            assert_float_eq!(r_hat[j], eq.sc_c * eq.e[j] * r[j], abs <= 1e-10);
        }

        // unscaling recovers the originals
        assert_float_eq!(eq.unscale_x(&x_hat), x.to_vec(), abs_all <= 1e-12);
        assert_float_eq!(eq.unscale_s(&s_hat), s.to_vec(), abs_all <= 1e-12);
        assert_float_eq!(eq.unscale_y(&y_hat), y.to_vec(), abs_all <= 1e-12);

        // objectives are related by the scalars
        let cx = L::dot(&c, &x);
        let cx_hat = L::dot(&c_hat, &x_hat);
        assert_float_eq!(cx_hat, cx * eq.sc_c * eq.sc_b, rmax <= 1e-12);
    }

    #[test]
    fn test_equilibrate_identity()
    {
        let eq = Equilibration::<L>::identity(2, 1);

        assert_float_eq!(eq.unscale_x(&[3.]), vec![3.], abs_all <= 0.);
        assert_float_eq!(eq.unscale_y(&[1., 2.]), vec![1., 2.], abs_all <= 0.);
        assert_float_eq!(eq.unscale_s(&[1., 2.]), vec![1., 2.], abs_all <= 0.);
    }
}
