//! Plain data row types written by output backends.

/// One agent at one snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub agent_id:      u32,
    pub tick:          u64,
    /// Simulated time after the tick, in seconds.
    pub time_secs:     f64,
    pub x:             f64,
    pub y:             f64,
    pub z:             f64,
    pub radius:        f64,
    pub activated:     bool,
    /// Field concentration sampled at the agent's position.
    pub concentration: f64,
}

/// One non-zero field cell at one snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldCellRow {
    pub tick:          u64,
    pub x:             u32,
    pub y:             u32,
    pub z:             u32,
    pub concentration: f64,
}

/// Summary statistics for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:               u64,
    pub elapsed_secs:       f64,
    pub activated_agents:   u64,
    pub emitted_quantity:   f64,
    pub total_quantity:     f64,
    pub peak_concentration: f64,
    pub substeps:           u32,
}
