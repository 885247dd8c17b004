pub mod crs;
pub mod ecef;
pub mod geodesy;
pub mod projection;
pub mod vec;

pub use crs::*;
pub use ecef::*;
pub use geodesy::*;
pub use projection::*;
pub use vec::*;
