pub mod read;
pub mod window;

// re-exports
pub use self::read::{AlignedRead, ReadFilter};
pub use self::window::Window;
