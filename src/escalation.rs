//! Escalating solve controller.
//!
//! A solve is attempted up to three times, each attempt building a fresh
//! model with progressively stronger stabilization:
//!
//! 1. the model exactly as given, with instability warnings treated as
//!    errors;
//! 2. every support's rotations forced fixed, still strict;
//! 3. additionally, weak ground springs on every node, with instability
//!    warnings suppressed.
//!
//! Any first-attempt failure escalates. The second attempt escalates only
//! when its failure is classified as ill-posed; other errors surface
//! directly. The third attempt is terminal.

use crate::error::SolverError;

/// Which stabilization stage produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Exact,
    FixedRotations,
    GroundSprings,
}

impl Tier {
    /// Human-readable note attached to the response when the result came
    /// from a stabilized model.
    pub fn note(self) -> &'static str {
        match self {
            Tier::Exact => "",
            Tier::FixedRotations => {
                "Model was unstable as given; support rotations were fixed to obtain a solution."
            }
            Tier::GroundSprings => {
                "Model was unstable; weak ground springs were added to all nodes. \
                 Results are approximate."
            }
        }
    }
}

/// Stabilization measures an attempt should apply when building its model.
#[derive(Debug, Clone, Copy, Default)]
pub struct StabilizationProfile {
    /// Force RX/RY/RZ fixed at every supported node.
    pub force_fixed_rotations: bool,
    /// Attach a weak elastic spring to every DOF of every node.
    pub ground_springs: bool,
    /// Treat free DOFs without stiffness as hard errors.
    pub strict_stability: bool,
}

impl StabilizationProfile {
    fn for_tier(tier: Tier) -> Self {
        match tier {
            Tier::Exact => Self {
                force_fixed_rotations: false,
                ground_springs: false,
                strict_stability: true,
            },
            Tier::FixedRotations => Self {
                force_fixed_rotations: true,
                ground_springs: false,
                strict_stability: true,
            },
            Tier::GroundSprings => Self {
                force_fixed_rotations: true,
                ground_springs: true,
                strict_stability: false,
            },
        }
    }
}

/// A successful solve together with the tier that produced it.
#[derive(Debug)]
pub struct Solution<T> {
    pub value: T,
    pub tier: Tier,
}

/// Run `attempt` under the escalation policy. The closure builds and solves
/// a fresh model for the given tier.
pub fn run<T, F>(mut attempt: F) -> Result<Solution<T>, SolverError>
where
    F: FnMut(Tier, &StabilizationProfile) -> Result<T, SolverError>,
{
    let first = match attempt(Tier::Exact, &StabilizationProfile::for_tier(Tier::Exact)) {
        Ok(value) => {
            return Ok(Solution {
                value,
                tier: Tier::Exact,
            })
        }
        Err(e) => e,
    };
    log::warn!("solve failed as given ({first}), retrying with fixed support rotations");

    let second = match attempt(
        Tier::FixedRotations,
        &StabilizationProfile::for_tier(Tier::FixedRotations),
    ) {
        Ok(value) => {
            return Ok(Solution {
                value,
                tier: Tier::FixedRotations,
            })
        }
        Err(e) => e,
    };
    if !second.is_ill_posed() {
        return Err(second);
    }
    log::warn!("solve still ill-posed ({second}), retrying with ground springs");

    let value = attempt(
        Tier::GroundSprings,
        &StabilizationProfile::for_tier(Tier::GroundSprings),
    )?;
    Ok(Solution {
        value,
        tier: Tier::GroundSprings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_success_stays_exact() {
        let mut calls = 0;
        let solution = run(|tier, profile| {
            calls += 1;
            assert_eq!(tier, Tier::Exact);
            assert!(!profile.force_fixed_rotations);
            assert!(!profile.ground_springs);
            assert!(profile.strict_stability);
            Ok::<_, SolverError>(42)
        })
        .unwrap();
        assert_eq!(calls, 1);
        assert_eq!(solution.value, 42);
        assert_eq!(solution.tier, Tier::Exact);
        assert!(solution.tier.note().is_empty());
    }

    #[test]
    fn any_first_failure_escalates_once() {
        // The first error need not be ill-posed to trigger the retry.
        let mut calls = 0;
        let solution = run(|tier, profile| {
            calls += 1;
            match tier {
                Tier::Exact => Err(SolverError::Other("numerics went sideways".to_string())),
                Tier::FixedRotations => {
                    assert!(profile.force_fixed_rotations);
                    assert!(!profile.ground_springs);
                    Ok(7)
                }
                Tier::GroundSprings => unreachable!(),
            }
        })
        .unwrap();
        assert_eq!(calls, 2);
        assert_eq!(solution.tier, Tier::FixedRotations);
        assert!(!solution.tier.note().is_empty());
    }

    #[test]
    fn ill_posed_second_failure_reaches_springs() {
        let solution = run(|tier, profile| match tier {
            Tier::Exact | Tier::FixedRotations => Err(SolverError::Singular),
            Tier::GroundSprings => {
                assert!(profile.force_fixed_rotations);
                assert!(profile.ground_springs);
                assert!(!profile.strict_stability);
                Ok("done")
            }
        })
        .unwrap();
        assert_eq!(solution.tier, Tier::GroundSprings);
        assert!(solution.tier.note().contains("approximate"));
    }

    #[test]
    fn non_ill_posed_second_failure_surfaces() {
        let err = run(|tier, _| match tier {
            Tier::Exact => Err(SolverError::Singular),
            Tier::FixedRotations => {
                Err::<(), _>(SolverError::NodeNotFound("N9".to_string()))
            }
            Tier::GroundSprings => unreachable!(),
        })
        .unwrap_err();
        assert!(matches!(err, SolverError::NodeNotFound(_)));
    }

    #[test]
    fn third_failure_is_terminal() {
        let err = run(|_, _| Err::<(), _>(SolverError::Singular)).unwrap_err();
        assert!(matches!(err, SolverError::Singular));
    }

    #[test]
    fn substring_classification_escalates_other_errors() {
        let solution = run(|tier, _| match tier {
            Tier::Exact | Tier::FixedRotations => {
                Err(SolverError::Other("matrix is singular to working precision".to_string()))
            }
            Tier::GroundSprings => Ok(1),
        })
        .unwrap();
        assert_eq!(solution.tier, Tier::GroundSprings);
    }
}
