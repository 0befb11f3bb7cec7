pub mod grid;
pub mod location;
pub mod route;

pub use grid::*;
pub use location::*;
pub use route::*;
