pub mod draw;
pub mod list;

pub use draw::*;
pub use list::*;
