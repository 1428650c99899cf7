use num_traits::One;
use core::marker::PhantomData;
use crate::solver::{LinAlg, LinSys, SolverError};
use crate::csc::CscMatrix;
use crate::ldl::LdlFactor;
use crate::splitm_mut;

//

/// Direct linear system
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// Factorizes the quasi-definite matrix
/// \\[
/// \begin{bmatrix} I & A^T \\\\ A & -I \end{bmatrix}
/// \\]
/// once, and solves with the sign of the \\(y\\) block of the right-hand side flipped.
pub struct LinSysDirect<L: LinAlg>
{
    ph_l: PhantomData<L>,
    n: usize,
    m: usize,
    ldl: LdlFactor<L::F>,
}

impl<L: LinAlg> LinSysDirect<L>
{
    /// Creates an instance.
    /// 
    /// Returns [`LinSysDirect`] instance,
    /// or `Err` with [`SolverError::SetupFailed`] if the factorization fails.
    /// * `a` is \\(A\\).
    pub fn new(a: &CscMatrix<L::F>) -> Result<Self, SolverError>
    {
        let f1 = L::F::one();
        let (m, n) = a.size();

        let at = a.transpose();

        let nnz = n + m + a.nnz();
        let mut rows = Vec::with_capacity(nnz);
        let mut cols = Vec::with_capacity(nnz);
        let mut vals = Vec::with_capacity(nnz);

        for j in 0.. n {
            rows.push(j);
            cols.push(j);
            vals.push(f1);
        }
        for i in 0.. m {
            for (j, v) in at.col(i) {
                rows.push(j);
                cols.push(n + i);
                vals.push(v);
            }
            rows.push(n + i);
            cols.push(n + i);
            vals.push(-f1);
        }

        let kkt = CscMatrix::from_triplets(n + m, n + m, &rows, &cols, &vals)
            .or(Err(SolverError::SetupFailed))?;
        let ldl = LdlFactor::new(&kkt)?;

        Ok(LinSysDirect {
            ph_l: PhantomData,
            n, m, ldl,
        })
    }
}

impl<L: LinAlg> LinSys<L> for LinSysDirect<L>
{
    fn solve(&mut self, w: &mut [L::F], _iter: Option<usize>)
    {
        assert_eq!(w.len(), self.n + self.m);

        {
            splitm_mut!(w, (_w_x; self.n), (w_y; self.m));
            L::scale(-L::F::one(), w_y);
        }
        self.ldl.solve(w);
    }
}

//

#[test]
fn test_linsys_direct1()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;

    type L = FloatGeneric<f64>;

    let a = CscMatrix::from_rowmaj(3, 2, &[
        1., 2.,
        0., 3.,
        -1., 1.,
    ]).unwrap();

    let mut ls = LinSysDirect::<L>::new(&a).unwrap();

    let w = [1., 2., -1., 0.5, 3.];
    let mut z = w;
    ls.solve(&mut z, None);

    // z_x + A' z_y = w_x, -A z_x + z_y = w_y
    let mut r = a.multiply_transpose(&z[2..]).unwrap();
    L::add(1., &z[..2], &mut r);
    assert_float_eq!(r, w[..2].to_vec(), abs_all <= 1e-12);

    let mut r = a.multiply(&z[..2]).unwrap();
    L::scale(-1., &mut r);
    L::add(1., &z[2..], &mut r);
    assert_float_eq!(r, w[2..].to_vec(), abs_all <= 1e-12);
}
