use comfy_table::Color;

pub const HEADER: Color = Color::Green;
pub const ROW_NUMBER: Color = Color::Cyan;
pub const ADDRESS: Color = Color::Blue;

pub const STATE_UP: Color = Color::DarkGreen;
pub const STATE_BUSY: Color = Color::DarkBlue;
pub const STATE_TRANSITIONAL: Color = Color::DarkYellow;
pub const STATE_DOWN: Color = Color::DarkRed;

pub const PROBE_SUCCESS: Color = Color::DarkGreen;
pub const PROBE_FAILURE: Color = Color::DarkRed;
pub const PROBE_TIMEOUT: Color = Color::DarkYellow;
