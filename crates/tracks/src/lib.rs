pub mod popover;
pub mod renderer;
pub mod store;
pub mod style;

pub use popover::*;
pub use renderer::*;
pub use store::*;
pub use style::*;
