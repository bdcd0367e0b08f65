pub mod list;
pub mod switch;

pub use list::list_packages;
pub use switch::switch;
