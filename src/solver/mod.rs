mod linalg;
mod operator;
mod cone;
mod linsys;
mod solver_error;
mod solver_param;
mod solution;
mod engine;
mod solver;

pub use linalg::*;
pub use operator::*;
pub use cone::*;
pub use linsys::*;
pub use solver_error::*;
pub use solver_param::*;
pub use solution::*;
pub use solver::*;
