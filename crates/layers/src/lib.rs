pub mod catalog;
pub mod layer;
pub mod raster;
pub mod symbology;
pub mod terrain;
pub mod vector;
pub mod visibility;

pub use catalog::*;
pub use layer::*;
pub use raster::*;
pub use symbology::*;
pub use terrain::*;
pub use vector::*;
pub use visibility::*;
