pub mod camera;
pub mod error;
pub mod host;
pub mod pipeline;
pub mod selection;
pub mod target;

pub use camera::*;
pub use error::*;
pub use host::*;
pub use pipeline::*;
pub use selection::*;
pub use target::*;
