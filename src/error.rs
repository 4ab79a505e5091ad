use std::fmt;

/// Why a timed ability refused to activate.
///
/// These never abort a tick: the simulation logs them and carries on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActivationError {
    OnCooldown { remaining: f32 },
    AtFullHealth,
    EncounterOver,
}

impl fmt::Display for ActivationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnCooldown { remaining } => {
                write!(f, "ability on cooldown: {remaining} ticks remaining")
            }
            Self::AtFullHealth => write!(f, "health already at maximum"),
            Self::EncounterOver => write!(f, "encounter already ended"),
        }
    }
}

impl std::error::Error for ActivationError {}

/// Failure loading or validating a tuning file.
#[derive(Debug)]
pub enum TuningError {
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "tuning parse error: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}
