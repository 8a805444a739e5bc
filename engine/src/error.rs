use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid dice notation '{0}' (expected <count>D<sides>, e.g. 1D6)")]
    InvalidDice(String),

    #[error("unknown skill '{0}'")]
    UnknownSkill(String),

    #[error("unknown actor '{0}'")]
    UnknownActor(String),

    #[error("'{actor}' has no weapon named '{weapon}'")]
    UnknownWeapon { actor: String, weapon: String },

    #[error("'{0}' carries no weapons")]
    Unarmed(String),

    #[error("unknown builtin content '{0}'")]
    UnknownContent(String),

    #[error("not enough skill points: {requested} requested, {available} available")]
    PointsExhausted { requested: i32, available: i32 },

    #[error("occupation skill '{0}' was never raised above its base")]
    SkillNotRaised(String),

    #[error("credit rating {value} is outside {min}-{max}")]
    CreditOutOfRange { value: i32, min: i32, max: i32 },

    #[error("{0} interest points left unspent")]
    InterestUnspent(i32),
}

pub type Result<T> = std::result::Result<T, EngineError>;
