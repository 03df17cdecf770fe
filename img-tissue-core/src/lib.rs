pub mod affine;
pub mod animator;
pub mod coord;
pub mod ease;
pub mod error;
pub mod mesh;
pub mod projector;
pub mod scheduler;
pub mod settings;
pub mod surface;
pub mod tissue;
pub mod triangle;

/// Scalar type.
pub type Scalar = f64;

pub mod prelude {
    pub use crate::{
        affine::*, animator::*, coord::*, ease::*, error::*, mesh::grid::*, mesh::split::*,
        mesh::*, projector::*, scheduler::*, settings::*, surface::recording::*, surface::*,
        tissue::*, triangle::*, Scalar,
    };
}
