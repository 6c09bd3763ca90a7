pub mod latch;
pub mod notice;
pub mod observed;
pub mod timer;

pub use latch::*;
pub use notice::*;
pub use observed::*;
pub use timer::*;
