pub mod dense;
pub mod recurrent;

pub use dense::{Dense, DenseGradients, DenseTrace};
pub use recurrent::{RnnGradients, RnnTrace, SimpleRnn};
