pub mod analyze;
pub mod capture;
pub mod compare;
pub mod inspect;

pub use analyze::AnalyzeCommand;
pub use capture::CaptureCommand;
pub use compare::CompareCommand;
pub use inspect::InspectCommand;
