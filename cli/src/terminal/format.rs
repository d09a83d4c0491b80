use comfy_table::{Attribute, Cell};
use jumpr_common::network::probe::{ProbeOutcome, ProbeResult};
use jumpr_common::network::state::{InstanceState, StateTone};

use crate::terminal::colors;

pub fn state_cell(state: InstanceState) -> Cell {
    let cell = Cell::new(state.glyph());
    match state.tone() {
        StateTone::Up => cell.fg(colors::STATE_UP).add_attribute(Attribute::Bold),
        StateTone::Busy => cell.fg(colors::STATE_BUSY),
        StateTone::Transitional => cell.fg(colors::STATE_TRANSITIONAL),
        StateTone::Down => cell.fg(colors::STATE_DOWN),
        StateTone::Plain => cell,
    }
}

pub fn probe_cell(result: ProbeResult) -> Cell {
    match (result.outcome, result.latency) {
        (ProbeOutcome::Success, Some(latency)) => {
            Cell::new(format!("✓ {}ms", latency.as_millis())).fg(colors::PROBE_SUCCESS)
        }
        (ProbeOutcome::Success, None) => Cell::new("✓").fg(colors::PROBE_SUCCESS),
        (ProbeOutcome::Failure, _) => Cell::new("✗").fg(colors::PROBE_FAILURE),
        (ProbeOutcome::Timeout, _) => Cell::new("~").fg(colors::PROBE_TIMEOUT),
        (ProbeOutcome::Unknown, _) => Cell::new("?").add_attribute(Attribute::Dim),
    }
}
