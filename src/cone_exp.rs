use num_traits::{Float, One};
use core::marker::PhantomData;
use crate::solver::{Cone, LinAlg};

//

/// Exponential cone
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// \\[
/// \mathcal{K}\_{\rm exp} =
/// {\bf cl} \left\lbrace (x, y, z) \in \mathbb{R}^3
/// \ \middle|\ y > 0,\ y e^{x/y} \le z
/// \right\rbrace
/// \\]
/// 
/// A slice passed to [`Cone::proj`] is a product of \\(\mathcal{K}\_{\rm exp}\\),
/// three consecutive elements per sub-cone; its length shall be a multiple of 3.
/// The dual cone is handled by Moreau decomposition,
/// \\(\Pi_{\mathcal{K}^*}(x) = x + \Pi_\mathcal{K}(-x)\\).
pub struct ConeExp<L: LinAlg>
{
    ph_l: PhantomData<L>,
    fallbacks: usize,
}

impl<L: LinAlg> ConeExp<L>
{
    /// Creates an instance.
    /// 
    /// Returns [`ConeExp`] instance.
    pub fn new() -> Self
    {
        ConeExp {
            ph_l: PhantomData,
            fallbacks: 0,
        }
    }

    /// Number of sub-cone projections so far
    /// whose root finding failed and fell back to the degenerate face.
    pub fn fallbacks(&self) -> usize
    {
        self.fallbacks
    }
}

impl<L: LinAlg> Default for ConeExp<L>
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl<L: LinAlg> Cone<L> for ConeExp<L>
{
    fn proj(&mut self, dual_cone: bool, x: &mut [L::F])
    {
        assert_eq!(x.len() % 3, 0);

        for v in x.chunks_exact_mut(3) {
            if !dual_cone {
                if !proj_exp(v) {
                    self.fallbacks += 1;
                }
            }
            else {
                let mut w = [-v[0], -v[1], -v[2]];
                if !proj_exp(&mut w) {
                    self.fallbacks += 1;
                }
                L::add(L::F::one(), &w, v);
            }
        }
    }

    fn product_group<G: Fn(&mut [L::F]) + Copy>(&self, dp: &mut [L::F], group: G)
    {
        for g in dp.chunks_exact_mut(3) {
            group(g);
        }
    }
}

//

// Stationarity of the distance along the boundary ray y (rho, 1, e^rho).
fn stationarity<F: Float>(rho: F, v: &[F]) -> (F, F)
{
    let f1 = F::one();
    let f2 = f1 + f1;
    let (r, s, t) = (v[0], v[1], v[2]);

    let ep = rho.exp();
    let em = (-rho).exp();

    let h = ep * ((rho - f1) * r + s) - em * (r - rho * s) - (rho * rho - rho + f1) * t;
    let dh = ep * (rho * r + s) + em * (r + s - rho * s) - (f2 * rho - f1) * t;

    (h, dh)
}

// Safeguarded Newton iteration inside a sign-changing bracket.
fn newton_bracket<F: Float>(mut lo: F, mut hi: F, h_lo: F, v: &[F]) -> Option<F>
{
    let f1 = F::one();
    let f2 = f1 + f1;
    let tol = F::epsilon() * F::from(4).unwrap();

    let neg_lo = h_lo < F::zero();
    let mut rho = (lo + hi) / f2;

    for _ in 0.. 100 {
        let (h, dh) = stationarity(rho, v);
        if !h.is_finite() {
            return None;
        }
        if h == F::zero() {
            return Some(rho);
        }

        if (h < F::zero()) == neg_lo {
            lo = rho;
        }
        else {
            hi = rho;
        }

        let mut next = rho - h / dh;
        if !(next > lo && next < hi) {
            next = (lo + hi) / f2;
        }

        let scale = f1.max(rho.abs());
        if (next - rho).abs() <= tol * scale || hi - lo <= tol * scale {
            return Some(next);
        }
        rho = next;
    }

    None
}

fn sq_dist<F: Float>(p: &[F; 3], v: &[F]) -> F
{
    p.iter().zip(v).fold(F::zero(), |acc, (a, b)| acc + (*a - *b) * (*a - *b))
}

/// Projects one point onto the exponential cone in place.
/// 
/// The result is the closest of the Newton candidates, the degenerate face,
/// and the primal and dual heuristic points, all of which lie in the cone.
/// Returns `false` if no root of the stationarity equation was found,
/// so that only the face and the heuristic points were compared.
fn proj_exp<F: Float>(v: &mut [F]) -> bool
{
    let f0 = F::zero();
    let f1 = F::one();
    let (r, s, t) = (v[0], v[1], v[2]);

    let thresh = F::epsilon() * F::from(1e4).unwrap() * f1.max(t.abs());

    // in the cone
    if (s > f0 && s * (r / s).exp() - t <= thresh) || (r <= f0 && s == f0 && t >= f0) {
        return true;
    }

    // in the polar cone
    if (r > f0 && r * (s / r).exp() + f1.exp() * t <= thresh) || (r == f0 && s <= f0 && t <= f0) {
        v[0] = f0;
        v[1] = f0;
        v[2] = f0;
        return true;
    }

    // analytic
    if r < f0 && s < f0 {
        v[1] = f0;
        v[2] = t.max(f0);
        return true;
    }

    // the face spanned by (-1, 0, 0) and (0, 0, 1)
    let face = [r.min(f0), f0, t.max(f0)];
    let mut best = face;
    let mut best_dist = sq_dist(&face, v);
    let mut found = false;

    let consider = |p: [F; 3], best: &mut [F; 3], best_dist: &mut F| {
        let dist = sq_dist(&p, v);
        if dist.is_finite() && dist < *best_dist {
            *best = p;
            *best_dist = dist;
        }
    };

    // primal heuristic: raise t onto the boundary
    if s > f0 {
        consider([r, s, t.max(s * (r / s).exp())], &mut best, &mut best_dist);
    }

    // dual heuristic: v minus a point of the polar cone
    if r > f0 {
        let q_t = t.min(-r * (s / r - f1).exp());
        consider([f0, f0, t - q_t], &mut best, &mut best_dist);
    }

    // cubic grid over the range where e^rho stays representable
    let n_grid = 32;
    let rho_max = F::max_value().ln() / (f1 + f1);
    let grid = |i: i32| {
        let g = F::from(i).unwrap() / F::from(n_grid).unwrap();
        rho_max * g * g * g
    };

    let mut lo = grid(-n_grid);
    let mut h_lo = stationarity(lo, v).0;
    for i in (-n_grid + 1)..= n_grid {
        let hi = grid(i);
        let h_hi = stationarity(hi, v).0;

        if h_lo.is_finite() && h_hi.is_finite() && h_lo * h_hi <= f0 {
            if let Some(rho) = newton_bracket(lo, hi, h_lo, v) {
                found = true;

                let w = [rho, f1, rho.exp()];
                let ww = w[0] * w[0] + w[1] * w[1] + w[2] * w[2];
                let y = ((w[0] * r + w[1] * s + w[2] * t) / ww).max(f0);
                consider([y * w[0], y * w[1], y * w[2]], &mut best, &mut best_dist);
            }
        }

        lo = hi;
        h_lo = h_hi;
    }

    v.copy_from_slice(&best);
    if !found {
        log::trace!("exponential cone projection found no root, took the closest heuristic point");
    }
    found
}

//

#[cfg(test)]
mod tests
{
    use float_eq::assert_float_eq;
    use rand::prelude::*;
    use rand_xoshiro::Xoshiro256StarStar;
    use crate::FloatGeneric;
    use crate::solver::{Cone, LinAlg};
    use super::*;

    type L = FloatGeneric<f64>;

    fn rand_vec(rng: &mut Xoshiro256StarStar, n: usize) -> Vec<f64>
    {
        (0.. n).map(|_| rng.gen_range(-3.0..3.0)).collect()
    }

    #[test]
    fn test_exp_cases()
    {
        let mut c = ConeExp::<L>::new();

        // in the cone: (0, 1, 1) satisfies 1 * e^0 <= 1
        let mut x = [0., 1., 2.];
        c.proj(false, &mut x);
        assert_float_eq!(x, [0., 1., 2.], abs_all <= 1e-15);

        // in the polar cone
        let mut x = [1., 0., -1.];
        c.proj(false, &mut x);
        assert_float_eq!(x, [0., 0., 0.], abs_all <= 1e-15);

        // analytic case
        let mut x = [-1., -2., 3.];
        c.proj(false, &mut x);
        assert_float_eq!(x, [-1., 0., 3.], abs_all <= 1e-15);

        // general case lands on the boundary
        let mut x = [1., 1., 1.];
        c.proj(false, &mut x);
        assert!(x[1] > 0.);
        assert_float_eq!(x[1] * (x[0] / x[1]).exp(), x[2], rmax <= 1e-9);

        assert_eq!(c.fallbacks(), 0);
    }

    #[test]
    fn test_exp_moreau()
    {
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        let mut c = ConeExp::<L>::new();

        for _ in 0.. 500 {
            let v = rand_vec(&mut rng, 6);

            let mut p = v.clone();
            c.proj(false, &mut p);

            // idempotence
            let mut pp = p.clone();
            c.proj(false, &mut pp);
            assert_float_eq!(pp, p, abs_all <= 1e-8);

            // v = p + q with q in the polar cone, p orthogonal to q
            let mut q = v.clone();
            L::add(-1., &p, &mut q);
            assert_float_eq!(L::dot(&p, &q), 0., abs <= 1e-8);

            let mut qq = q.clone();
            c.proj(false, &mut qq);
            assert_float_eq!(L::norm(&qq), 0., abs <= 1e-6);

            // dual cone projection equals -(polar projection of -v) and lies in the dual cone
            let mut d = v.clone();
            c.proj(true, &mut d);
            let mut dd = d.clone();
            c.proj(true, &mut dd);
            assert_float_eq!(dd, d, abs_all <= 1e-8);
        }

        assert_eq!(c.fallbacks(), 0);
    }

    #[test]
    fn test_exp_tiny_s()
    {
        let mut c = ConeExp::<L>::new();

        // r / s far below the range where e^rho is representable
        let v = [-8.6136, 0.023319, -2.5370];
        let mut p = v;
        c.proj(false, &mut p);

        let face_dist = v[1] * v[1] + v[2] * v[2];
        let dist = (0.. 3).map(|i| (p[i] - v[i]).powi(2)).sum::<f64>();
        assert!(dist < face_dist);
        assert_float_eq!(p, [v[0], v[1], 0.], abs_all <= 1e-12);

        let mut q = v.to_vec();
        L::add(-1., &p, &mut q);
        c.proj(false, &mut q);
        assert_float_eq!(L::norm(&q), 0., abs <= 1e-12);
    }

    #[test]
    fn test_exp_moreau_scaled()
    {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut rng = Xoshiro256StarStar::seed_from_u64(2);
        let mut c = ConeExp::<L>::new();

        for _ in 0.. 2000 {
            let v: Vec<f64> = (0.. 3).map(|_| {
                let mag = 10f64.powf(rng.gen_range(-6.0..6.0));
                if rng.gen::<bool>() {mag} else {-mag}
            }).collect();
            let nv = L::norm(&v);

            let mut p = v.clone();
            c.proj(false, &mut p);

            let mut pp = p.clone();
            c.proj(false, &mut pp);
            assert_float_eq!(pp, p, abs_all <= 1e-8 * nv);

            let mut q = v.clone();
            L::add(-1., &p, &mut q);
            assert_float_eq!(L::dot(&p, &q), 0., abs <= 1e-8 * nv * nv);

            c.proj(false, &mut q);
            assert_float_eq!(L::norm(&q), 0., abs <= 1e-6 * nv);
        }
    }
}
