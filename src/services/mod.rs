pub mod cart_store;
pub mod cart_view;
pub mod navigation;
pub mod product_list;

pub use cart_store::*;
pub use cart_view::*;
pub use navigation::*;
pub use product_list::*;
