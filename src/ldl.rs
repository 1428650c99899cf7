//! Sparse LDL' factorization of symmetric quasi-definite matrices.

use num_traits::Float;
use std::collections::BTreeSet;
use crate::csc::CscMatrix;
use crate::solver::SolverError;

//

/// Fill-reducing minimum degree ordering of a symmetric sparsity pattern.
/// 
/// Returns `perm` such that `perm[k]` is the original index eliminated `k`-th.
/// * `upper` is the upper triangle of a square matrix; the diagonal is ignored.
pub fn minimum_degree<F: Float>(upper: &CscMatrix<F>) -> Vec<usize>
{
    let (n, _) = upper.size();

    let mut adj = vec![BTreeSet::new(); n];
    for c in 0.. n {
        for (r, _) in upper.col(c) {
            if r != c {
                adj[r].insert(c);
                adj[c].insert(r);
            }
        }
    }

    let mut queue: BTreeSet<(usize, usize)> = (0.. n).map(|v| (adj[v].len(), v)).collect();
    let mut perm = Vec::with_capacity(n);

    while let Some((_, v)) = queue.pop_first() {
        perm.push(v);

        let neighbors: Vec<usize> = adj[v].iter().copied().collect();
        for &u in &neighbors {
            queue.remove(&(adj[u].len(), u));
            adj[u].remove(&v);
        }

        // eliminating v makes its neighbors a clique
        for (i, &u) in neighbors.iter().enumerate() {
            for &w in &neighbors[i + 1..] {
                adj[u].insert(w);
                adj[w].insert(u);
            }
        }

        for &u in &neighbors {
            queue.insert((adj[u].len(), u));
        }
        adj[v].clear();
    }

    perm
}

/// Symmetric permutation \\(P K P^T\\) of an upper triangle, again as an upper triangle.
/// 
/// * `pinv` maps an original index to its permuted index.
fn permute_upper<F: Float>(upper: &CscMatrix<F>, pinv: &[usize]) -> Result<CscMatrix<F>, SolverError>
{
    let (n, _) = upper.size();
    let nnz = upper.nnz();

    let mut rows = Vec::with_capacity(nnz);
    let mut cols = Vec::with_capacity(nnz);
    let mut vals = Vec::with_capacity(nnz);

    for c in 0.. n {
        for (r, v) in upper.col(c) {
            let (pr, pc) = (pinv[r], pinv[c]);
            rows.push(pr.min(pc));
            cols.push(pr.max(pc));
            vals.push(v);
        }
    }

    CscMatrix::from_triplets(n, n, &rows, &cols, &vals)
}

//

/// LDL' factors of \\(P K P^T\\)
/// 
/// Built once by [`LdlFactor::new`] (ordering, elimination tree, numeric factorization),
/// then solves \\(K x = b\\) repeatedly.
pub struct LdlFactor<F>
{
    n: usize,
    perm: Vec<usize>,
    l_p: Vec<usize>,
    l_i: Vec<usize>,
    l_x: Vec<F>,
    d_inv: Vec<F>,
    work: Vec<F>,
}

impl<F: Float> LdlFactor<F>
{
    /// Factorizes a symmetric quasi-definite matrix.
    /// 
    /// Returns [`LdlFactor`] instance,
    /// or `Err` with [`SolverError::SetupFailed`] if a pivot is zero or not finite.
    /// * `upper` is the upper triangle of \\(K\\) including its diagonal.
    pub fn new(upper: &CscMatrix<F>) -> Result<Self, SolverError>
    {
        let (n, n_col) = upper.size();
        if n != n_col {
            log::error!("LDL: matrix must be square, ({}, {})", n, n_col);
            return Err(SolverError::SetupFailed);
        }
        for c in 0.. n {
            if upper.col(c).any(|(r, _)| r > c) {
                log::error!("LDL: entry below the diagonal at column {}", c);
                return Err(SolverError::SetupFailed);
            }
        }

        let perm = minimum_degree(upper);
        let mut pinv = vec![0; n];
        for (k, &p) in perm.iter().enumerate() {
            pinv[p] = k;
        }
        let kp = permute_upper(upper, &pinv).or(Err(SolverError::SetupFailed))?;

        let (etree, l_nz) = Self::etree(&kp);

        let mut l_p = vec![0; n + 1];
        for i in 0.. n {
            l_p[i + 1] = l_p[i] + l_nz[i];
        }
        log::debug!("LDL: n {}, nnz(K) {}, nnz(L) {}", n, upper.nnz(), l_p[n]);

        let mut factor = LdlFactor {
            n,
            perm,
            l_i: vec![0; l_p[n]],
            l_x: vec![F::zero(); l_p[n]],
            l_p,
            d_inv: vec![F::zero(); n],
            work: vec![F::zero(); n],
        };
        factor.factor(&kp, &etree)?;

        Ok(factor)
    }

    // elimination tree and column counts of L
    fn etree(kp: &CscMatrix<F>) -> (Vec<Option<usize>>, Vec<usize>)
    {
        let (n, _) = kp.size();

        let mut etree = vec![None; n];
        let mut l_nz = vec![0; n];
        let mut flag = vec![usize::MAX; n];

        for j in 0.. n {
            flag[j] = j;
            for (r, _) in kp.col(j) {
                let mut i = r;
                while flag[i] != j {
                    if etree[i].is_none() {
                        etree[i] = Some(j);
                    }
                    l_nz[i] += 1;
                    flag[i] = j;
                    match etree[i] {
                        Some(p) => i = p,
                        None => break,
                    }
                }
            }
        }

        (etree, l_nz)
    }

    // up-looking numeric factorization
    fn factor(&mut self, kp: &CscMatrix<F>, etree: &[Option<usize>]) -> Result<(), SolverError>
    {
        let n = self.n;
        let f0 = F::zero();

        let mut y_vals = vec![f0; n];
        let mut y_used = vec![false; n];
        let mut y_idx = Vec::with_capacity(n);
        let mut elim = Vec::with_capacity(n);
        let mut next_space: Vec<usize> = self.l_p[0.. n].to_vec();

        for k in 0.. n {
            let mut d = f0;
            y_idx.clear();

            // nonzero pattern of row k of L by walking up the elimination tree
            for (b, v) in kp.col(k) {
                if b == k {
                    d = v;
                    continue;
                }
                y_vals[b] = v;

                if !y_used[b] {
                    y_used[b] = true;
                    elim.clear();
                    elim.push(b);

                    let mut next = etree[b];
                    while let Some(e) = next {
                        if e >= k || y_used[e] {
                            break;
                        }
                        y_used[e] = true;
                        elim.push(e);
                        next = etree[e];
                    }
                    while let Some(e) = elim.pop() {
                        y_idx.push(e);
                    }
                }
            }

            for &c in y_idx.iter().rev() {
                let y_c = y_vals[c];
                for j in self.l_p[c].. next_space[c] {
                    let li = self.l_i[j];
                    y_vals[li] = y_vals[li] - self.l_x[j] * y_c;
                }

                let l_kc = y_c * self.d_inv[c];
                self.l_i[next_space[c]] = k;
                self.l_x[next_space[c]] = l_kc;
                next_space[c] += 1;

                d = d - y_c * l_kc;
                y_vals[c] = f0;
                y_used[c] = false;
            }

            if d == f0 || !d.is_finite() {
                log::error!("LDL: zero or non-finite pivot at {}", k);
                return Err(SolverError::SetupFailed);
            }
            self.d_inv[k] = d.recip();
        }

        Ok(())
    }

    /// Dimension of \\(K\\).
    pub fn dim(&self) -> usize
    {
        self.n
    }

    /// Solves \\(K x = b\\) in place.
    /// 
    /// * `x` is \\(b\\) before entry, \\(x\\) on exit.
    pub fn solve(&mut self, x: &mut [F])
    {
        assert_eq!(x.len(), self.n);

        let w = &mut self.work;
        for (k, &p) in self.perm.iter().enumerate() {
            w[k] = x[p];
        }

        for i in 0.. self.n {
            let wi = w[i];
            for j in self.l_p[i].. self.l_p[i + 1] {
                let li = self.l_i[j];
                w[li] = w[li] - self.l_x[j] * wi;
            }
        }
        for (wi, di) in w.iter_mut().zip(&self.d_inv) {
            *wi = *wi * *di;
        }
        for i in (0.. self.n).rev() {
            let mut wi = w[i];
            for j in self.l_p[i].. self.l_p[i + 1] {
                wi = wi - self.l_x[j] * w[self.l_i[j]];
            }
            w[i] = wi;
        }

        for (k, &p) in self.perm.iter().enumerate() {
            x[p] = w[k];
        }
    }
}

//

#[cfg(test)]
mod tests
{
    use float_eq::assert_float_eq;
    use super::*;

    // y = K x with K given by its upper triangle
    fn symv(upper: &CscMatrix<f64>, x: &[f64]) -> Vec<f64>
    {
        let (n, _) = upper.size();
        let mut y = vec![0.; n];
        for c in 0.. n {
            for (r, v) in upper.col(c) {
                y[r] += v * x[c];
                if r != c {
                    y[c] += v * x[r];
                }
            }
        }
        y
    }

    #[test]
    fn test_ldl_quasidef()
    {
        let _ = env_logger::builder().is_test(true).try_init();

        // [[I, A'], [A, -I]] for A = [[1, 2], [0, 3], [4, 0]]
        let upper = CscMatrix::from_rowmaj(5, 5, &[
            1., 0., 1., 0., 4.,
            0., 1., 2., 3., 0.,
            0., 0., -1., 0., 0.,
            0., 0., 0., -1., 0.,
            0., 0., 0., 0., -1.,
        ]).unwrap();

        let mut ldl = LdlFactor::new(&upper).unwrap();
        assert_eq!(ldl.dim(), 5);

        let b = [1., -2., 3., 0.5, -1.];
        let mut x = b;
        ldl.solve(&mut x);

        let kx = symv(&upper, &x);
        assert_float_eq!(kx, b.to_vec(), abs_all <= 1e-12);

        // reusable
        let mut x2 = [0., 0., 1., 0., 0.];
        ldl.solve(&mut x2);
        assert_float_eq!(symv(&upper, &x2), vec![0., 0., 1., 0., 0.], abs_all <= 1e-12);
    }

    #[test]
    fn test_ldl_arrow()
    {
        // arrow matrix: minimum degree keeps the hub to the end, so L has no fill
        let n = 6;
        let mut dense = vec![0.; n * n];
        for i in 0.. n {
            dense[i * n + i] = 4.;
            if i > 0 {
                dense[i] = 1.;
            }
        }
        let upper = CscMatrix::from_rowmaj(n, n, &dense).unwrap();

        let perm = minimum_degree(&upper);
        assert!(perm[n - 2..].contains(&0));

        let mut ldl = LdlFactor::new(&upper).unwrap();
        assert_eq!(ldl.l_p[n], n - 1);

        let b: Vec<f64> = (0.. n).map(|i| i as f64).collect();
        let mut x = b.clone();
        ldl.solve(&mut x);
        assert_float_eq!(symv(&upper, &x), b, abs_all <= 1e-12);
    }

    #[test]
    fn test_ldl_singular()
    {
        let upper = CscMatrix::from_rowmaj(2, 2, &[
            1., 1.,
            0., 1.,
        ]).unwrap();

        assert_eq!(LdlFactor::new(&upper).err(), Some(SolverError::SetupFailed));

        let lower = CscMatrix::from_rowmaj(2, 2, &[
            1., 0.,
            1., 1.,
        ]).unwrap();

        assert_eq!(LdlFactor::new(&lower).err(), Some(SolverError::SetupFailed));
    }
}
