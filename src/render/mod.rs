//! Rendering: cell styles, the off-screen surface and the terminal driver.

pub mod driver;
pub mod style;
pub mod surface;

pub use driver::Driver;
pub use style::{parse_style, CellStyle, NamedColor};
pub use surface::{junction, Cell, Surface};
