pub mod onboarding;
pub mod oversight;
