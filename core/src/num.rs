pub(crate) mod bigrat;
pub(crate) mod continued_fraction;
mod convergence;

pub use convergence::ConvergencePolicy;
