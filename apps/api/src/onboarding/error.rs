use thiserror::Error;

/// The core operation a failure came from; selects the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CompleteOnboarding,
    OnboardingStatus,
}

impl Operation {
    fn failure_message(self) -> &'static str {
        match self {
            Operation::CompleteOnboarding => {
                "Error while onboarding the user. Please try again later."
            }
            Operation::OnboardingStatus => {
                "Error while getting the user onboarding status. Please try again later."
            }
        }
    }
}

/// Everything a caller of the onboarding core can observe. Underlying causes
/// are logged where they happen and never carried in here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OnboardingError {
    #[error("Unauthorized")]
    NotAuthenticated,

    #[error("User not found")]
    UserNotFound,

    #[error("{}", .0.failure_message())]
    OnboardingFailed(Operation),
}
