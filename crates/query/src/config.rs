/// What to do when an assignment computes a value JSON cannot represent
/// (`NaN`, `inf`, `-inf`), e.g. after a division by zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NonFiniteNumbers {
    /// Store an explicit JSON `null` in the target field. (Default)
    #[default]
    StoreNull,
    /// Fail the statement; the document is left untouched.
    Reject,
}

/// Evaluation settings shared by every statement an [`Engine`](crate::Engine) applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub non_finite: NonFiniteNumbers,
}

impl EngineConfig {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_non_finite(mut self, policy: NonFiniteNumbers) -> Self {
        self.non_finite = policy;
        self
    }
}
