//! Analysis stages reported while a request is in flight.

// ---------------------------------------------------------------------------
// AnalysisStage
// ---------------------------------------------------------------------------

/// Stages of one analysis request.
///
/// ```text
/// Idle ──analyze──▶ Classifying ──reply──▶ Parsing ──▶ Synthesizing ──▶ Done
///                        │                              (skipped when
///                        └──model error──▶ Failed        speech is off)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisStage {
    /// No request running.
    #[default]
    Idle,
    /// Waiting for the hosted model.
    Classifying,
    /// Turning the reply into a result.
    Parsing,
    /// Waiting for the speech service.
    Synthesizing,
    /// Report ready.
    Done,
    /// The request failed with a user-visible error.
    Failed,
}

impl AnalysisStage {
    /// Returns `true` while a request is waiting on work.
    ///
    /// ```
    /// use smartbin::pipeline::AnalysisStage;
    ///
    /// assert!(!AnalysisStage::Idle.is_busy());
    /// assert!(AnalysisStage::Classifying.is_busy());
    /// assert!(AnalysisStage::Synthesizing.is_busy());
    /// assert!(!AnalysisStage::Done.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            AnalysisStage::Classifying | AnalysisStage::Parsing | AnalysisStage::Synthesizing
        )
    }

    /// Progress line for the status display.
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisStage::Idle => "Idle",
            AnalysisStage::Classifying => "Checking municipal guidelines…",
            AnalysisStage::Parsing => "Reading the verdict…",
            AnalysisStage::Synthesizing => "Preparing audio…",
            AnalysisStage::Done => "Done",
            AnalysisStage::Failed => "Failed",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
