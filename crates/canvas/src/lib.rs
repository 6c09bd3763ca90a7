pub mod feature;
pub mod layer;
pub mod map;
pub mod style;
pub mod view;

pub use feature::*;
pub use layer::*;
pub use map::*;
pub use style::*;
pub use view::*;
