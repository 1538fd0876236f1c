pub mod user;
pub mod wrapped;

pub use user::*;
pub use wrapped::*;
