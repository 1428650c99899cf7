use num_traits::{Float, Zero, One, NumCast};
use crate::solver::{LinAlg, LinSys, Operator};
use crate::splitm_mut;

//

/// Indirect linear system
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// Eliminates \\(z_y\\) and solves the reduced system
/// \\[
/// (I + A^T A) z_x = w_x - A^T w_y, \qquad z_y = w_y + A z_x
/// \\]
/// by conjugate gradients with a Jacobi preconditioner \\(1 + \\|A_{:j}\\|_2^2\\),
/// warm-started from the previous solution.
/// \\(A\\) is accessed only through [`Operator`].
/// 
/// The inner tolerance is \\(\\|{\rm rhs}\\|_2 \max(10^{-9}, 0.1 / (k+1)^r)\\) at outer iteration \\(k\\)
/// with a rate \\(r\\), and \\(\\|{\rm rhs}\\|_2 \cdot 10^{-9}\\) without an iteration hint.
/// Running out of inner iterations is not a failure: the best iterate so far is taken.
pub struct LinSysIndirect<'a, L: LinAlg, O: Operator<L>>
{
    op_a: &'a O,
    precond: Vec<L::F>,
    max_iter: usize,
    rate: L::F,

    x: Vec<L::F>,
    x_best: Vec<L::F>,
    rhs: Vec<L::F>,
    r: Vec<L::F>,
    z: Vec<L::F>,
    p: Vec<L::F>,
    q: Vec<L::F>,
    t: Vec<L::F>,

    total_iters: usize,
}

impl<'a, L: LinAlg, O: Operator<L>> LinSysIndirect<'a, L, O>
{
    /// Creates an instance.
    /// 
    /// Returns [`LinSysIndirect`] instance.
    /// * `op_a` is \\(A\\).
    /// * `col_sq_norms` is \\(\\|A_{:j}\\|_2^2\\) for each column, used for preconditioning.
    /// * `max_iter` is the inner iteration budget per solve.
    /// * `rate` is the tightening exponent of the inner tolerance.
    pub fn new(op_a: &'a O, col_sq_norms: &[L::F], max_iter: usize, rate: L::F) -> Self
    {
        let f0 = L::F::zero();
        let f1 = L::F::one();
        let (m, n) = op_a.size();
        assert_eq!(col_sq_norms.len(), n);

        LinSysIndirect {
            op_a,
            precond: col_sq_norms.iter().map(|s| (f1 + *s).recip()).collect(),
            max_iter,
            rate,
            x: vec![f0; n],
            x_best: vec![f0; n],
            rhs: vec![f0; n],
            r: vec![f0; n],
            z: vec![f0; n],
            p: vec![f0; n],
            q: vec![f0; n],
            t: vec![f0; m],
            total_iters: 0,
        }
    }

    fn tolerance(&self, iter: Option<usize>) -> L::F
    {
        let floor = <L::F as NumCast>::from(1e-9).unwrap();

        match iter {
            None => floor,
            Some(k) => {
                let decay = <L::F as NumCast>::from(0.1).unwrap() / <L::F as NumCast>::from(k + 1).unwrap().powf(self.rate);
                decay.max(floor)
            }
        }
    }

    // q = (I + A'A) p
    fn op_normal(op_a: &O, p: &[L::F], t: &mut [L::F], q: &mut [L::F])
    {
        let f0 = L::F::zero();
        let f1 = L::F::one();

        op_a.op(f1, p, f0, t);
        L::copy(p, q);
        op_a.trans_op(f1, t, f1, q);
    }

    // preconditioned conjugate gradients from self.x; returns the number of iterations
    fn cg(&mut self, tol: L::F) -> usize
    {
        let f0 = L::F::zero();
        let f1 = L::F::one();

        Self::op_normal(self.op_a, &self.x, &mut self.t, &mut self.q);
        L::copy(&self.rhs, &mut self.r);
        L::add(-f1, &self.q, &mut self.r);

        let mut norm_r = L::norm(&self.r);
        let mut best = norm_r;
        L::copy(&self.x, &mut self.x_best);

        if norm_r <= tol {
            return 0;
        }

        L::transform_di(f1, &self.precond, &self.r, f0, &mut self.z);
        L::copy(&self.z, &mut self.p);
        let mut rz = L::dot(&self.r, &self.z);

        let mut i = 0;
        while i < self.max_iter {
            i += 1;

            Self::op_normal(self.op_a, &self.p, &mut self.t, &mut self.q);
            let pq = L::dot(&self.p, &self.q);
            if !(pq > f0) || !pq.is_finite() {
                log::trace!("cg breakdown at {}", i);
                break;
            }

            let alpha = rz / pq;
            L::add(alpha, &self.p, &mut self.x);
            L::add(-alpha, &self.q, &mut self.r);

            norm_r = L::norm(&self.r);
            if norm_r < best {
                best = norm_r;
                L::copy(&self.x, &mut self.x_best);
            }
            if norm_r <= tol {
                break;
            }

            L::transform_di(f1, &self.precond, &self.r, f0, &mut self.z);
            let rz_new = L::dot(&self.r, &self.z);
            let beta = rz_new / rz;
            rz = rz_new;

            L::scale(beta, &mut self.p);
            L::add(f1, &self.z, &mut self.p);
        }

        if best > tol {
            log::trace!("cg stopped at {} above tolerance", i);
        }
        L::copy(&self.x_best, &mut self.x);

        i
    }
}

impl<'a, L: LinAlg, O: Operator<L>> LinSys<L> for LinSysIndirect<'a, L, O>
{
    fn solve(&mut self, w: &mut [L::F], iter: Option<usize>)
    {
        let f1 = L::F::one();
        let (m, n) = self.op_a.size();
        assert_eq!(w.len(), n + m);

        splitm_mut!(w, (w_x; n), (w_y; m));

        // rhs = w_x - A' w_y
        L::copy(w_x, &mut self.rhs);
        self.op_a.trans_op(-f1, w_y, f1, &mut self.rhs);

        let tol = L::norm(&self.rhs) * self.tolerance(iter);
        self.total_iters += self.cg(tol);

        // z_y = w_y + A z_x
        L::copy(&self.x, w_x);
        self.op_a.op(f1, &self.x, f1, w_y);
    }

    fn inner_iters(&self) -> usize
    {
        self.total_iters
    }
}

//

#[test]
fn test_linsys_indirect1()
{
    use float_eq::assert_float_eq;
    use crate::{FloatGeneric, CscMatrix, LinSysDirect};

    type L = FloatGeneric<f64>;

    let a = CscMatrix::from_rowmaj(3, 2, &[
        1., 2.,
        0., 3.,
        -1., 1.,
    ]).unwrap();

    let mut direct = LinSysDirect::<L>::new(&a).unwrap();
    let mut indirect = LinSysIndirect::<L, _>::new(&a, &a.col_sq_norms(), 100, 2.);

    for k in 0.. 3 {
        let w = [1., 2., -1., 0.5, 3. + k as f64];

        let mut zd = w;
        direct.solve(&mut zd, None);

        let mut zi = w;
        indirect.solve(&mut zi, None);

        assert_float_eq!(zi, zd, abs_all <= 1e-6);
    }

    // late outer iterations reach the tolerance floor
    let w = [0., 1., 1., -2., 0.];
    let mut zd = w;
    direct.solve(&mut zd, Some(10_000));
    let mut zi = w;
    indirect.solve(&mut zi, Some(10_000));
    assert_float_eq!(zi, zd, abs_all <= 1e-6);

    assert!(indirect.inner_iters() > 0);
    assert!(indirect.inner_iters() <= 3 * 100);
}
