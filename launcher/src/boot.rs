//! Start-up sequencing
//!
//! Each stage runs once. The display and the runtime pieces it depends on are
//! mandatory: their failure is logged and handed back so the caller can stop.
//! Peripherals (theme, touch, diagnostics) are best effort: failure is logged
//! and the stage is skipped.

use core::fmt::{self, Debug, Display, Formatter};
use core::future::Future;

use log::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Fatal,
    BestEffort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Graphics,
    Display,
    Theme,
    Touch,
    EventLoop,
    Diagnostics,
    Ui,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Graphics,
        Stage::Display,
        Stage::Theme,
        Stage::Touch,
        Stage::EventLoop,
        Stage::Diagnostics,
        Stage::Ui,
    ];

    pub const fn policy(self) -> Policy {
        match self {
            Stage::Theme | Stage::Touch | Stage::Diagnostics => Policy::BestEffort,
            Stage::Graphics | Stage::Display | Stage::EventLoop | Stage::Ui => Policy::Fatal,
        }
    }

    /// Headline printed when the stage fails
    pub const fn failure_message(self) -> &'static str {
        match self {
            Stage::Graphics => "Graphics runtime error:",
            Stage::Display => "Display configuration error:",
            Stage::Theme => "Theme init warning:",
            Stage::Touch => "Touch Driver Failure:",
            Stage::EventLoop => "Event loop start error:",
            Stage::Diagnostics => "Diagnostic check warning:",
            Stage::Ui => "UI load error:",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Graphics => "graphics",
            Stage::Display => "display",
            Stage::Theme => "theme",
            Stage::Touch => "touch",
            Stage::EventLoop => "event loop",
            Stage::Diagnostics => "diagnostics",
            Stage::Ui => "ui",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Skipped,
    Failed,
    /// The stage ran more than once without failing
    Repeated,
}

/// Outcome of every stage that has run so far.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BootReport {
    outcomes: [Option<Outcome>; Stage::ALL.len()],
}

impl BootReport {
    pub fn outcome(&self, stage: Stage) -> Option<Outcome> {
        self.outcomes[stage.index()]
    }

    pub fn is_complete(&self) -> bool {
        Stage::ALL
            .iter()
            .all(|stage| self.outcome(*stage).is_some())
    }

    /// A re-run keeps the worst result seen for the stage.
    fn record(&mut self, stage: Stage, outcome: Outcome) {
        let slot = &mut self.outcomes[stage.index()];
        *slot = Some(match (*slot, outcome) {
            (None, outcome) => outcome,
            (Some(Outcome::Failed), _) | (Some(_), Outcome::Failed) => Outcome::Failed,
            (Some(Outcome::Skipped), _) | (Some(_), Outcome::Skipped) => Outcome::Skipped,
            (Some(_), _) => Outcome::Repeated,
        });
    }
}

/// A mandatory stage failed.
#[derive(Debug)]
pub struct BootError<E> {
    pub stage: Stage,
    pub source: E,
}

impl<E: Debug> Display for BootError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.stage.failure_message(), self.source)
    }
}

#[derive(Debug, Default)]
pub struct Boot {
    report: BootReport,
}

impl Boot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self) -> &BootReport {
        &self.report
    }

    /// Run a mandatory stage.
    pub fn require<T, E: Debug>(
        &mut self,
        stage: Stage,
        step: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, BootError<E>> {
        debug_assert_eq!(stage.policy(), Policy::Fatal, "{} is best effort", stage);
        self.warn_if_repeated(stage);
        match step() {
            Ok(value) => {
                self.report.record(stage, Outcome::Done);
                Ok(value)
            }
            Err(source) => {
                error!("{}", stage.failure_message());
                error!("{:?}", source);
                self.report.record(stage, Outcome::Failed);
                Err(BootError { stage, source })
            }
        }
    }

    /// Run a best-effort stage, `None` if it failed.
    pub fn attempt<T, E: Debug>(
        &mut self,
        stage: Stage,
        step: impl FnOnce() -> Result<T, E>,
    ) -> Option<T> {
        debug_assert_eq!(stage.policy(), Policy::BestEffort, "{} is mandatory", stage);
        self.warn_if_repeated(stage);
        let result = step();
        self.settle(stage, result)
    }

    pub async fn attempt_async<T, E: Debug>(
        &mut self,
        stage: Stage,
        step: impl Future<Output = Result<T, E>>,
    ) -> Option<T> {
        debug_assert_eq!(stage.policy(), Policy::BestEffort, "{} is mandatory", stage);
        self.warn_if_repeated(stage);
        let result = step.await;
        self.settle(stage, result)
    }

    pub fn log_summary(&self) {
        for stage in Stage::ALL {
            match self.report.outcome(stage) {
                Some(outcome) => info!("boot: {:<12} {:?}", stage, outcome),
                None => info!("boot: {:<12} not run", stage),
            }
        }
    }

    fn settle<T, E: Debug>(&mut self, stage: Stage, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => {
                self.report.record(stage, Outcome::Done);
                Some(value)
            }
            Err(e) => {
                warn!("{}", stage.failure_message());
                warn!("{:?}", e);
                self.report.record(stage, Outcome::Skipped);
                None
            }
        }
    }

    fn warn_if_repeated(&self, stage: Stage) {
        if self.report.outcome(stage).is_some() {
            warn!("{} stage already ran", stage);
        }
    }
}
