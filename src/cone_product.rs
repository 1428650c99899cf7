use num_traits::Float;
use crate::solver::{Cone, LinAlg, SolverError};
use crate::problem::ConeBlock;
use crate::{FloatGeneric, ConeZero, ConeRPos, ConeSOC, ConeExp};

//

/// Product of cone blocks
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// \\(\mathcal{K} = \mathcal{K}_1 \times \cdots \times \mathcal{K}_q\\) following a list of [`ConeBlock`]s.
/// Projections and groupings are applied block by block over consecutive sub-slices.
pub struct ConeProduct<L: LinAlg>
{
    blocks: Vec<ConeBlock>,
    zero: ConeZero<L>,
    rpos: ConeRPos<L>,
    soc: ConeSOC<L>,
    exp: ConeExp<L>,
}

impl<L: LinAlg> ConeProduct<L>
{
    /// Creates an instance.
    /// 
    /// Returns [`ConeProduct`] instance.
    /// * `blocks` is the ordered cone blocks.
    pub fn new(blocks: &[ConeBlock]) -> Self
    {
        ConeProduct {
            blocks: blocks.to_vec(),
            zero: ConeZero::new(),
            rpos: ConeRPos::new(),
            soc: ConeSOC::new(),
            exp: ConeExp::new(),
        }
    }

    /// Total dimension.
    pub fn dim(&self) -> usize
    {
        self.blocks.iter().map(ConeBlock::dim).sum()
    }

    /// Number of exponential cone projections that fell back to the degenerate face.
    pub fn exp_fallbacks(&self) -> usize
    {
        self.exp.fallbacks()
    }
}

impl<L: LinAlg> Cone<L> for ConeProduct<L>
{
    fn proj(&mut self, dual_cone: bool, x: &mut [L::F])
    {
        assert_eq!(x.len(), self.dim());

        let mut rest = x;
        for blk in self.blocks.iter() {
            let (xb, r) = core::mem::take(&mut rest).split_at_mut(blk.dim());
            rest = r;

            match blk {
                ConeBlock::Zero(_) => self.zero.proj(dual_cone, xb),
                ConeBlock::NonnegativeOrthant(_) => self.rpos.proj(dual_cone, xb),
                ConeBlock::SecondOrder(_) => self.soc.proj(dual_cone, xb),
                ConeBlock::Exponential(_) => self.exp.proj(dual_cone, xb),
                ConeBlock::ExponentialDual(_) => self.exp.proj(!dual_cone, xb),
            }
        }
    }

    fn product_group<G: Fn(&mut [L::F]) + Copy>(&self, dp: &mut [L::F], group: G)
    {
        assert_eq!(dp.len(), self.dim());

        let mut rest = dp;
        for blk in self.blocks.iter() {
            let (db, r) = core::mem::take(&mut rest).split_at_mut(blk.dim());
            rest = r;

            match blk {
                ConeBlock::Zero(_) => self.zero.product_group(db, group),
                ConeBlock::NonnegativeOrthant(_) => self.rpos.product_group(db, group),
                ConeBlock::SecondOrder(_) => self.soc.product_group(db, group),
                ConeBlock::Exponential(_) | ConeBlock::ExponentialDual(_) => self.exp.product_group(db, group),
            }
        }
    }
}

//

fn check_dim<F>(v: &[F], cone: &[ConeBlock]) -> Result<(), SolverError>
{
    let dim: usize = cone.iter().map(ConeBlock::dim).sum();
    if v.len() != dim {
        log::error!("Vector length {} must equal the cone dimension {}", v.len(), dim);
        return Err(SolverError::Dimension);
    }
    Ok(())
}

/// Euclidean projection of `v` onto the product cone given by `cone`.
/// 
/// Returns the projected vector, or `Err` with [`SolverError::Dimension`] on length mismatch.
pub fn project<F: Float>(v: &[F], cone: &[ConeBlock]) -> Result<Vec<F>, SolverError>
{
    check_dim(v, cone)?;

    let mut p = v.to_vec();
    ConeProduct::<FloatGeneric<F>>::new(cone).proj(false, &mut p);
    Ok(p)
}

/// Euclidean projection of `v` onto the polar of the product cone given by `cone`,
/// by Moreau decomposition `v - project(v, cone)`.
/// 
/// Returns the projected vector, or `Err` with [`SolverError::Dimension`] on length mismatch.
pub fn project_dual<F: Float>(v: &[F], cone: &[ConeBlock]) -> Result<Vec<F>, SolverError>
{
    let p = project(v, cone)?;
    Ok(v.iter().zip(&p).map(|(vi, pi)| *vi - *pi).collect())
}

//

#[cfg(test)]
mod tests
{
    use float_eq::assert_float_eq;
    use rand::prelude::*;
    use rand_xoshiro::Xoshiro256StarStar;
    use super::*;

    type L = FloatGeneric<f64>;

    #[test]
    fn test_product_moreau()
    {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);

        let cone = [
            ConeBlock::Zero(2),
            ConeBlock::NonnegativeOrthant(3),
            ConeBlock::SecondOrder(4),
            ConeBlock::Exponential(2),
            ConeBlock::ExponentialDual(1),
        ];

        for _ in 0.. 200 {
            let v: Vec<f64> = (0.. 18).map(|_| rng.gen_range(-3.0..3.0)).collect();

            let p = project(&v, &cone).unwrap();
            let q = project_dual(&v, &cone).unwrap();

            // v = p + q
            let mut sum = p.clone();
            L::add(1., &q, &mut sum);
            assert_float_eq!(sum, v.clone(), abs_all <= 1e-12);

            // orthogonality
            assert_float_eq!(L::dot(&p, &q), 0., abs <= 1e-8);

            // idempotence of both
            assert_float_eq!(project(&p, &cone).unwrap(), p.clone(), abs_all <= 1e-8);
            assert_float_eq!(project_dual(&q, &cone).unwrap(), q.clone(), abs_all <= 1e-6);

            // zero block projects to zero, orthant block nonnegative
            assert_float_eq!(p[0.. 2].to_vec(), vec![0., 0.], abs_all <= 0.);
            assert!(p[2.. 5].iter().all(|e| *e >= 0.));
        }
    }

    #[test]
    fn test_product_group()
    {
        let cone = [
            ConeBlock::NonnegativeOrthant(2),
            ConeBlock::SecondOrder(2),
            ConeBlock::Exponential(1),
        ];
        let c = ConeProduct::<L>::new(&cone);

        let mut dp = [1., 2., 3., 5., 1., 2., 6.];
        c.product_group(&mut dp, |g: &mut [f64]| {
            let mean = g.iter().sum::<f64>() / g.len() as f64;
            g.iter_mut().for_each(|e| *e = mean);
        });
        assert_float_eq!(dp, [1., 2., 4., 4., 3., 3., 3.], abs_all <= 1e-15);
    }

    #[test]
    fn test_product_dim()
    {
        let cone = [ConeBlock::Exponential(1)];

        assert_eq!(project(&[1., 2.], &cone), Err(SolverError::Dimension));
        assert_eq!(project_dual(&[1., 2., 3., 4.], &cone), Err(SolverError::Dimension));
    }
}
