use crate::error::PxglError;

/// The relaxation strategy, selected once at init and bound to every
/// `visit` dispatch for the run (`spec.md` §4.4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SsspKind {
    /// Immediate, fire-and-forget relax dispatch (`spec.md` §4.4.1).
    Chaotic,
    /// Per-locality priority queues draining in distance order
    /// (`spec.md` §4.4.2).
    DistributedControl,
    /// Bucket-by-bucket phase loop (`spec.md` §4.4.3).
    DeltaStepping,
}

/// How the driver recognizes quiescence (`spec.md` §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerminationMode {
    /// The two-phase active/finished detector (`termination::Detector`).
    Count,
    /// A single and-LCO over the source vertex's direct dispatch tree.
    AndLco,
    /// The host runtime's structured-parallel "process" primitive.
    Process,
}

/// Tuning knobs for one `sssp` invocation (`spec.md` §4.4, §6.3).
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SsspConfig {
    #[cfg_attr(feature = "clap", arg(value_enum, long, default_value = "chaotic"))]
    pub kind: SsspKind,

    #[cfg_attr(feature = "clap", arg(value_enum, long, default_value = "count"))]
    pub termination: TerminationMode,

    /// Bucket width for delta-stepping; required when `kind` is
    /// `DeltaStepping`, ignored otherwise.
    #[cfg_attr(feature = "clap", arg(long))]
    pub delta: Option<u64>,

    /// Priority queues per locality for distributed control.
    #[cfg_attr(feature = "clap", arg(long))]
    pub num_pq: Option<u32>,

    /// How many drained queue entries a distributed-control drain task
    /// processes before yielding.
    #[cfg_attr(feature = "clap", arg(long))]
    pub drain_freq: Option<u32>,
}

impl SsspConfig {
    pub const DEFAULT_NUM_PQ: u32 = 4;
    pub const DEFAULT_DRAIN_FREQ: u32 = 64;

    pub fn chaotic(termination: TerminationMode) -> Self {
        Self {
            kind: SsspKind::Chaotic,
            termination,
            delta: None,
            num_pq: None,
            drain_freq: None,
        }
    }

    pub fn distributed_control(num_pq: u32, drain_freq: u32) -> Self {
        Self {
            kind: SsspKind::DistributedControl,
            termination: TerminationMode::Count,
            delta: None,
            num_pq: Some(num_pq),
            drain_freq: Some(drain_freq),
        }
    }

    pub fn delta_stepping(delta: u64) -> Self {
        Self {
            kind: SsspKind::DeltaStepping,
            termination: TerminationMode::Count,
            delta: Some(delta),
            num_pq: None,
            drain_freq: None,
        }
    }

    /// Rejects configurations the engine cannot honor (`spec.md` §7,
    /// §9 Open Questions).
    pub fn validate(&self) -> Result<(), PxglError> {
        if self.kind == SsspKind::DistributedControl && self.termination != TerminationMode::Count {
            return Err(PxglError::InvalidConfiguration(
                "distributed control requires count termination".into(),
            ));
        }
        if self.kind == SsspKind::DeltaStepping && self.delta.is_none() {
            return Err(PxglError::InvalidConfiguration(
                "delta-stepping requires a delta".into(),
            ));
        }
        if self.kind == SsspKind::DeltaStepping && self.termination == TerminationMode::AndLco {
            return Err(PxglError::InvalidConfiguration(
                "and-LCO termination cannot express delta-stepping's phase barrier".into(),
            ));
        }
        if self.termination == TerminationMode::AndLco && self.kind != SsspKind::Chaotic {
            return Err(PxglError::InvalidConfiguration(
                "and-LCO termination is only defined for the chaotic strategy".into(),
            ));
        }
        if self.termination == TerminationMode::Process && self.kind != SsspKind::Chaotic {
            return Err(PxglError::InvalidConfiguration(
                "process termination is only defined for the chaotic strategy".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distributed_control_requires_count_termination() {
        let mut config = SsspConfig::distributed_control(4, 64);
        config.termination = TerminationMode::AndLco;
        assert!(matches!(config.validate(), Err(PxglError::InvalidConfiguration(_))));
    }

    #[test]
    fn delta_stepping_requires_a_delta() {
        let mut config = SsspConfig::delta_stepping(4);
        config.delta = None;
        assert!(matches!(config.validate(), Err(PxglError::InvalidConfiguration(_))));
    }

    #[test]
    fn delta_stepping_rejects_and_lco_termination() {
        let mut config = SsspConfig::delta_stepping(4);
        config.termination = TerminationMode::AndLco;
        assert!(matches!(config.validate(), Err(PxglError::InvalidConfiguration(_))));
    }

    #[test]
    fn chaotic_with_count_termination_is_valid() {
        assert!(SsspConfig::chaotic(TerminationMode::Count).validate().is_ok());
    }

    #[test]
    fn chaotic_with_and_lco_termination_is_valid() {
        assert!(SsspConfig::chaotic(TerminationMode::AndLco).validate().is_ok());
    }

    #[test]
    fn process_termination_requires_the_chaotic_strategy() {
        let mut config = SsspConfig::distributed_control(4, 64);
        config.termination = TerminationMode::Process;
        assert!(matches!(config.validate(), Err(PxglError::InvalidConfiguration(_))));
    }
}
