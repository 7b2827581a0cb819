//! Finite-difference matrix and right-hand side assembly
//!
//! Every assembler emits one CSR row per active grid point, in active-index
//! order, with the diagonal entry stored first.

mod adi;
mod dirichlet;
mod neumann;
mod parabolic;
mod stencil;

pub use adi::*;
pub use dirichlet::*;
pub use neumann::*;
pub use parabolic::*;
pub use stencil::FivePointStencil;
