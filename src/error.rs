//! Error types for the solver engine, request validation and orchestration.

use thiserror::Error;

/// Errors raised by the frame solver engine.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("node '{0}' not found in model")]
    NodeNotFound(String),

    #[error("member '{0}' not found in model")]
    MemberNotFound(String),

    #[error("material '{0}' not found in model")]
    MaterialNotFound(String),

    #[error("section '{0}' not found in model")]
    SectionNotFound(String),

    #[error("duplicate name '{0}' already exists")]
    DuplicateName(String),

    #[error("member '{0}' has zero length")]
    ZeroLengthMember(String),

    #[error("singular stiffness matrix - the model has no unique solution")]
    Singular,

    #[error("kinematically unstable model: no stiffness at node '{node}' DOF {dof}")]
    Unstable { node: String, dof: &'static str },

    #[error("model not analyzed for combination '{0}'")]
    NotAnalyzed(String),

    #[error("analysis failed: {0}")]
    Other(String),
}

impl SolverError {
    /// Whether this failure means the linear system is numerically singular
    /// or the model is kinematically unstable. These are the failures the
    /// escalation controller is allowed to recover from by stabilizing the
    /// model; everything else is a genuine error.
    pub fn is_ill_posed(&self) -> bool {
        match self {
            SolverError::Singular | SolverError::Unstable { .. } => true,
            SolverError::Other(msg) => is_ill_posed_message(msg),
            _ => false,
        }
    }
}

/// Fallback classifier for error text that carries no structured kind.
/// Structured variants are always checked first; this only inspects
/// free-form messages wrapped in [`SolverError::Other`].
pub fn is_ill_posed_message(msg: &str) -> bool {
    let msg = msg.to_ascii_lowercase();
    msg.contains("singular") || msg.contains("unstable") || msg.contains("instability")
}

/// Result type for solver operations.
pub type SolverResult<T> = Result<T, SolverError>;

/// Request-level validation failures, surfaced to the client before any
/// solver interaction.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("duplicate node id '{0}'")]
    DuplicateNode(String),

    #[error("duplicate member id '{0}'")]
    DuplicateMember(String),

    #[error("member '{member}' references unknown node '{node}'")]
    UnknownMemberNode { member: String, node: String },

    #[error("member '{0}' must connect two distinct nodes")]
    DegenerateMember(String),

    #[error("support references unknown node '{0}'")]
    UnknownSupportNode(String),

    #[error("load case '{case}' references unknown member '{member}'")]
    UnknownLoadMember { case: String, member: String },

    #[error("combination '{combo}' references unknown load case '{case}'")]
    UnknownComboCase { combo: String, case: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_variants_classify_as_ill_posed() {
        assert!(SolverError::Singular.is_ill_posed());
        assert!(SolverError::Unstable {
            node: "N1".to_string(),
            dof: "RX"
        }
        .is_ill_posed());
        assert!(!SolverError::NodeNotFound("N1".to_string()).is_ill_posed());
        assert!(!SolverError::ZeroLengthMember("M1".to_string()).is_ill_posed());
    }

    #[test]
    fn message_fallback_matches_singular_and_unstable_text() {
        assert!(SolverError::Other("matrix is SINGULAR to working precision".into()).is_ill_posed());
        assert!(SolverError::Other("model appears unstable".into()).is_ill_posed());
        assert!(!SolverError::Other("out of memory".into()).is_ill_posed());
    }
}
