pub mod extract;
pub mod list;
pub mod pack;

pub use extract::run as extract;
pub use list::run as list;
pub use pack::run as pack;
