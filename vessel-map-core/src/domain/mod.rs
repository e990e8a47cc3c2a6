mod coordinates;
mod geojson;
mod overlay;
mod vessel;

pub use coordinates::*;
pub use geojson::*;
pub use overlay::*;
pub use vessel::*;
