use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Per-user onboarding progress. `onboarding_step` records the LAST completed
/// step (0 = nothing done, 3 = all steps), so the client resumes at step + 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct OnboardingProgress {
    pub user_id: String,
    pub onboarding_step: i32,
    pub onboarding_completed: bool,
    pub welcome_seen: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateOnboardingRequest {
    pub step: i32,
    #[serde(default)]
    pub completed: bool,
}
