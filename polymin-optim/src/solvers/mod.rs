pub mod bfgs;
pub mod conjugate_gradient;
pub mod newton;
pub mod steepest_descent;
