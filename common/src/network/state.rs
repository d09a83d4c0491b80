use std::fmt;

/// Lifecycle state reported by the inventory for one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InstanceState {
    Running,
    Rebooting,
    Pending,
    Stopping,
    ShuttingDown,
    Stopped,
    Terminated,
    #[default]
    Unknown,
}

/// Colour family a state is drawn with. The terminal layer maps these to
/// concrete colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateTone {
    Up,
    Busy,
    Transitional,
    Down,
    Plain,
}

impl InstanceState {
    /// Maps an inventory state name onto the enum. Unrecognised names are
    /// [`InstanceState::Unknown`], never an error.
    pub fn from_name(name: &str) -> Self {
        match name {
            "running" => Self::Running,
            "rebooting" => Self::Rebooting,
            "pending" => Self::Pending,
            "stopping" => Self::Stopping,
            "shutting-down" => Self::ShuttingDown,
            "stopped" => Self::Stopped,
            "terminated" => Self::Terminated,
            _ => Self::Unknown,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Self::Running => 'R',
            Self::Rebooting => 'B',
            Self::Pending => 'P',
            Self::Stopping => '-',
            Self::ShuttingDown => 'G',
            Self::Stopped => '.',
            Self::Terminated => 'T',
            Self::Unknown => 'U',
        }
    }

    pub fn tone(self) -> StateTone {
        match self {
            Self::Running => StateTone::Up,
            Self::Rebooting => StateTone::Busy,
            Self::Pending | Self::Stopping | Self::ShuttingDown => StateTone::Transitional,
            Self::Stopped | Self::Terminated => StateTone::Down,
            Self::Unknown => StateTone::Plain,
        }
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
