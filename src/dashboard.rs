mod figure;
pub mod server;
mod view;

pub use self::view::View;
