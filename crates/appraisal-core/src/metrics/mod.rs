pub mod evaluator;
pub mod payback;
