pub mod geom;
pub mod ids;
pub mod params;

pub use geom::*;
pub use ids::*;
pub use params::*;
