use float_eq::assert_float_eq;
use conesplit::prelude::*;
use conesplit::*;

type La = FloatGeneric<f64>;

type ASolver = Solver<La>;

// A = diag(-1, -1, 1, 1), b = (0, 0, 1, 1), c = (1, 1, -1, -1)
// with a nonnegative row followed by one exponential cone.
// (x1, 1 - x2, 1 - x3) stays in K_exp as x1 decreases, so the ray x = (0, -1, 0, 0) is unbounded.
fn mixed() -> Problem<f64>
{
    let a = CscMatrix::from_triplets(4, 4,
        &[0, 1, 2, 3],
        &[0, 1, 2, 3],
        &[-1., -1., 1., 1.],
    ).unwrap();

    Problem::new(a, vec![0., 0., 1., 1.], vec![1., 1., -1., -1.],
        vec![ConeBlock::NonnegativeOrthant(1), ConeBlock::Exponential(1)])
}

fn solver(strategy: LinSysStrategy) -> ASolver
{
    ASolver::new().par(|p| {
        p.strategy = strategy;
        p.max_iter = Some(100_000);
    })
}

//

#[test]
fn test_mixed_unbounded()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let problem = mixed();
    let r1 = solver(LinSysStrategy::Direct).solve(&problem).unwrap();
    println!("{:?}", r1);

    assert_eq!(r1.status, SolverStatus::Unbounded);
    assert_eq!(r1.objective, f64::NEG_INFINITY);

    let x = &r1.iterate.x;
    let s = &r1.iterate.s;
    let cx: f64 = problem.c().iter().zip(x).map(|(c, x)| c * x).sum();
    assert_float_eq!(cx, -1., abs <= 1e-9);

    // A x + s ~ 0
    let mut ax = problem.a().multiply(x).unwrap();
    ax.iter_mut().zip(s).for_each(|(p, s)| *p += s);
    assert_float_eq!(ax, vec![0.; 4], abs_all <= 1e-3);

    // bitwise reproducible
    let r2 = solver(LinSysStrategy::Direct).solve(&problem).unwrap();
    assert_eq!(r1.status, r2.status);
    assert_eq!(r1.info.iter, r2.info.iter);
    assert_eq!(r1.iterate, r2.iterate);

    // the strategy affects accuracy, not the outcome
    let r3 = solver(LinSysStrategy::Indirect).solve(&problem).unwrap();
    assert_eq!(r3.status, SolverStatus::Unbounded);
}

#[test]
fn test_mixed_unbounded_defaults()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let problem = mixed();

    let r1 = ASolver::new().solve(&problem).unwrap();
    println!("{:?}", r1);
    assert_eq!(r1.status, SolverStatus::Unbounded);
    assert_eq!(r1.objective, f64::NEG_INFINITY);

    let r2 = solve(&problem, &SolverParam::default()).unwrap();
    assert_eq!(r2.status, SolverStatus::Unbounded);
    assert_eq!(r1.info.iter, r2.info.iter);
    assert_eq!(r1.iterate, r2.iterate);
}

#[test]
fn test_mixed_unbounded_short()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let problem = mixed();

    for strategy in [LinSysStrategy::Direct, LinSysStrategy::Indirect] {
        let par = ASolver::new().par(|p| {
            p.strategy = strategy;
            p.max_iter = Some(500);
            p.eps_acc = 1e-6;
        }).par;

        let rslt = solve(&problem, &par).unwrap();
        println!("{:?}", rslt);

        assert_eq!(rslt.status, SolverStatus::Unbounded);
        assert!(rslt.info.iter < 500);
    }
}

//

#[test]
fn test_mixed_bounded()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // minimize t subject to x >= 1, (x, 1, t) in K_exp
    let a = CscMatrix::from_rowmaj(4, 2, &[
        -1., 0.,
        -1., 0.,
        0., 0.,
        0., -1.,
    ]).unwrap();
    let problem = Problem::new(a, vec![-1., 0., 1., 0.], vec![0., 1.],
        vec![ConeBlock::NonnegativeOrthant(1), ConeBlock::Exponential(1)]);

    for strategy in [LinSysStrategy::Direct, LinSysStrategy::Indirect] {
        let rslt = solver(strategy).par(|p| {
            p.eps_acc = 1e-6;
        }).solve(&problem).unwrap();
        println!("{:?}", rslt);

        assert_eq!(rslt.status, SolverStatus::Solved);
        let x = rslt.x.unwrap();
        assert_float_eq!(x[0], 1., abs <= 1e-3);
        assert_float_eq!(x[1], 1_f64.exp(), abs <= 1e-3);
    }
}
