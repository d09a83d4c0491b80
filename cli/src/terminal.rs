pub mod colors;
pub mod format;
pub mod logging;
pub mod redraw;
pub mod spinner;
pub mod table;
