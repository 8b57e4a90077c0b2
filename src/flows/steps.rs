//! Onboarding step machine — tracks which screen the user is on.

use serde::{Deserialize, Serialize};

/// The steps of the onboarding flow.
///
/// Progresses linearly: Register → Location → ProfilePhoto →
/// PoseVerification → AgeVerification → Preferences → Counsellors →
/// Complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    Register,
    Location,
    ProfilePhoto,
    PoseVerification,
    AgeVerification,
    Preferences,
    Counsellors,
    Complete,
}

impl OnboardingStep {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: OnboardingStep) -> bool {
        use OnboardingStep::*;
        matches!(
            (self, target),
            (Register, Location)
                | (Location, ProfilePhoto)
                | (ProfilePhoto, PoseVerification)
                | (PoseVerification, AgeVerification)
                | (AgeVerification, Preferences)
                | (Preferences, Counsellors)
                | (Counsellors, Complete)
        )
    }

    /// Whether this step is terminal (onboarding is done).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// The next step in the linear progression, if any.
    pub fn next(&self) -> Option<OnboardingStep> {
        use OnboardingStep::*;
        match self {
            Register => Some(Location),
            Location => Some(ProfilePhoto),
            ProfilePhoto => Some(PoseVerification),
            PoseVerification => Some(AgeVerification),
            AgeVerification => Some(Preferences),
            Preferences => Some(Counsellors),
            Counsellors => Some(Complete),
            Complete => None,
        }
    }
}

impl Default for OnboardingStep {
    fn default() -> Self {
        Self::Register
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Register => "register",
            Self::Location => "location",
            Self::ProfilePhoto => "profile_photo",
            Self::PoseVerification => "pose_verification",
            Self::AgeVerification => "age_verification",
            Self::Preferences => "preferences",
            Self::Counsellors => "counsellors",
            Self::Complete => "complete",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OnboardingStep; 8] = [
        OnboardingStep::Register,
        OnboardingStep::Location,
        OnboardingStep::ProfilePhoto,
        OnboardingStep::PoseVerification,
        OnboardingStep::AgeVerification,
        OnboardingStep::Preferences,
        OnboardingStep::Counsellors,
        OnboardingStep::Complete,
    ];

    #[test]
    fn next_walks_all_steps() {
        let mut current = OnboardingStep::default();
        for expected in &ALL[1..] {
            let next = current.next().unwrap();
            assert_eq!(next, *expected);
            assert!(current.can_transition_to(next));
            current = next;
        }
        assert!(current.next().is_none());
        assert!(current.is_terminal());
    }

    #[test]
    fn invalid_transitions() {
        use OnboardingStep::*;
        // Skip steps
        assert!(!Register.can_transition_to(ProfilePhoto));
        assert!(!Location.can_transition_to(Preferences));
        // Go backward
        assert!(!Preferences.can_transition_to(Location));
        // Terminal
        assert!(!Complete.can_transition_to(Register));
        // Self-transition
        assert!(!Location.can_transition_to(Location));
    }

    #[test]
    fn only_complete_is_terminal() {
        for step in ALL {
            assert_eq!(step.is_terminal(), step == OnboardingStep::Complete);
        }
    }

    #[test]
    fn display_matches_serde() {
        for step in ALL {
            let display = format!("{step}");
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(format!("\"{display}\""), json);
        }
    }
}
