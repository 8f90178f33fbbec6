pub mod box_shape;
pub mod cylinder;
pub mod grid;

pub use box_shape::create_box_edges;
pub use cylinder::{CylinderOptions, create_cylinder_edges};
pub use grid::create_grid;
