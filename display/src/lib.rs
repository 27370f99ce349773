pub use display::{Display, DisplayError, DEFAULT_SCALE};

mod display;
