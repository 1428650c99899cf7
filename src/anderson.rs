use num_traits::{Float, Zero, One, NumCast};
use crate::solver::LinAlg;

//

/// Type-II Anderson acceleration
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// For a fixed-point map \\(z \mapsto g(z)\\) with residual \\(f = g(z) - z\\),
/// keeps the last differences \\(\Delta F, \Delta G\\) of residuals and map outputs, and extrapolates
/// \\[
/// z^+ = g(z) - \Delta G \gamma, \quad
/// \gamma = \arg\min_\gamma \\|f - \Delta F \gamma\\|_2^2 + \lambda \\|\gamma\\|_2^2.
/// \\]
pub struct Anderson<L: LinAlg>
{
    mem: usize,
    dim: usize,
    d_f: Vec<L::F>,
    d_g: Vec<L::F>,
    cols: usize,
    head: usize,
    prev_f: Vec<L::F>,
    prev_g: Vec<L::F>,
    has_prev: bool,
    f: Vec<L::F>,
    gram: Vec<L::F>,
    gamma: Vec<L::F>,
}

impl<L: LinAlg> Anderson<L>
{
    /// Creates an instance.
    /// 
    /// * `mem` is the number of differences kept.
    /// * `dim` is the dimension of the iterate.
    pub fn new(mem: usize, dim: usize) -> Self
    {
        let f0 = L::F::zero();

        Anderson {
            mem, dim,
            d_f: vec![f0; mem * dim],
            d_g: vec![f0; mem * dim],
            cols: 0,
            head: 0,
            prev_f: vec![f0; dim],
            prev_g: vec![f0; dim],
            has_prev: false,
            f: vec![f0; dim],
            gram: vec![f0; mem * mem],
            gamma: vec![f0; mem],
        }
    }

    /// Forgets all history.
    pub fn reset(&mut self)
    {
        self.cols = 0;
        self.head = 0;
        self.has_prev = false;
    }

    /// Records one step \\(z \mapsto g(z)\\) and extrapolates.
    /// 
    /// Returns `true` with `out` set to the accelerated iterate,
    /// or `false` (leaving `out` untouched) if there is not enough history
    /// or the least squares problem is numerically unusable.
    /// * `z` is the iterate before the step.
    /// * `g` is the iterate after the step.
    pub fn update(&mut self, z: &[L::F], g: &[L::F], out: &mut [L::F]) -> bool
    {
        assert_eq!(z.len(), self.dim);
        assert_eq!(g.len(), self.dim);
        assert_eq!(out.len(), self.dim);

        let f1 = L::F::one();

        if self.mem == 0 {
            return false;
        }

        L::copy(g, &mut self.f);
        L::add(-f1, z, &mut self.f);

        if self.has_prev {
            let col = self.head;
            let range = col * self.dim..(col + 1) * self.dim;

            let df = &mut self.d_f[range.clone()];
            L::copy(&self.f, df);
            L::add(-f1, &self.prev_f, df);

            let dg = &mut self.d_g[range];
            L::copy(g, dg);
            L::add(-f1, &self.prev_g, dg);

            self.head = (self.head + 1) % self.mem;
            self.cols = (self.cols + 1).min(self.mem);
        }
        L::copy(&self.f, &mut self.prev_f);
        L::copy(g, &mut self.prev_g);
        self.has_prev = true;

        if self.cols == 0 {
            return false;
        }

        if !self.solve_gamma() {
            log::trace!("anderson: least squares failed");
            return false;
        }

        L::copy(g, out);
        for j in 0.. self.cols {
            let dg = &self.d_g[j * self.dim..(j + 1) * self.dim];
            L::add(-self.gamma[j], dg, out);
        }

        out.iter().all(|v| v.is_finite())
    }

    // (dF' dF + lambda I) gamma = dF' f
    fn solve_gamma(&mut self) -> bool
    {
        let k = self.cols;
        let dim = self.dim;
        let f0 = L::F::zero();

        let mut trace = f0;
        for i in 0.. k {
            let di = &self.d_f[i * dim..(i + 1) * dim];
            for j in 0..= i {
                let dj = &self.d_f[j * dim..(j + 1) * dim];
                let v = L::dot(di, dj);
                self.gram[i * k + j] = v;
                self.gram[j * k + i] = v;
            }
            trace = trace + self.gram[i * k + i];
            self.gamma[i] = L::dot(di, &self.f);
        }

        let lambda = <L::F as NumCast>::from(1e-10).unwrap() * trace + L::F::min_positive_value();
        for i in 0.. k {
            self.gram[i * k + i] = self.gram[i * k + i] + lambda;
        }

        cholesky_solve(&mut self.gram[..k * k], k, &mut self.gamma[..k])
    }
}

// Dense Cholesky solve in place; false if not positive definite.
fn cholesky_solve<F: Float>(a: &mut [F], k: usize, b: &mut [F]) -> bool
{
    let f0 = F::zero();

    for j in 0.. k {
        let mut d = a[j * k + j];
        for p in 0.. j {
            d = d - a[j * k + p] * a[j * k + p];
        }
        if !(d > f0) || !d.is_finite() {
            return false;
        }
        let d = d.sqrt();
        a[j * k + j] = d;

        for i in (j + 1).. k {
            let mut v = a[i * k + j];
            for p in 0.. j {
                v = v - a[i * k + p] * a[j * k + p];
            }
            a[i * k + j] = v / d;
        }
    }

    // L w = b
    for i in 0.. k {
        let mut v = b[i];
        for p in 0.. i {
            v = v - a[i * k + p] * b[p];
        }
        b[i] = v / a[i * k + i];
    }
    // L' x = w
    for i in (0.. k).rev() {
        let mut v = b[i];
        for p in (i + 1).. k {
            v = v - a[p * k + i] * b[p];
        }
        b[i] = v / a[i * k + i];
    }

    true
}

//

#[cfg(test)]
mod tests
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;
    use super::*;

    type L = FloatGeneric<f64>;

    // slowly contracting affine map
    fn g(z: &[f64]) -> Vec<f64>
    {
        vec![
            0.95 * z[0] + 0.04 * z[1] + 1.,
            -0.03 * z[0] + 0.97 * z[1] - 0.5,
            0.5 * z[2] + 0.2,
        ]
    }

    fn residual(z: &[f64]) -> f64
    {
        L::norm_diff(&g(z), z)
    }

    #[test]
    fn test_anderson_linear()
    {
        let mut plain = vec![0.; 3];
        for _ in 0.. 30 {
            plain = g(&plain);
        }
        assert!(residual(&plain) > 1e-3);

        let mut aa = Anderson::<L>::new(5, 3);
        let mut z = vec![0.; 3];
        let mut out = vec![0.; 3];
        for _ in 0.. 30 {
            let gz = g(&z);
            if aa.update(&z, &gz, &mut out) {
                z.copy_from_slice(&out);
            }
            else {
                z = gz;
            }
        }
        assert_float_eq!(residual(&z), 0., abs <= 1e-8);
    }

    #[test]
    fn test_anderson_reset()
    {
        let mut aa = Anderson::<L>::new(2, 3);
        let mut out = vec![0.; 3];

        let z0 = vec![0.; 3];
        let g0 = g(&z0);
        assert!(!aa.update(&z0, &g0, &mut out));
        assert!(aa.update(&g0, &g(&g0), &mut out));

        aa.reset();
        assert!(!aa.update(&z0, &g0, &mut out));

        let mut none = Anderson::<L>::new(0, 3);
        assert!(!none.update(&z0, &g0, &mut out));
    }

    #[test]
    fn test_cholesky()
    {
        let mut a = [4., 2., 2., 3.];
        let mut b = [2., 1.];
        assert!(cholesky_solve(&mut a, 2, &mut b));
        assert_float_eq!(b, [0.5, 0.], abs_all <= 1e-15);

        let mut a = [1., 2., 2., 1.];
        let mut b = [1., 1.];
        assert!(!cholesky_solve(&mut a, 2, &mut b));
    }
}
