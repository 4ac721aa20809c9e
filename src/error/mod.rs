/// Failure handling for the mount state machine
///
/// - Error classification, including detection of refused elevation in
///   command output
/// - An elevation gate that fails fast once authorization was refused
///
/// The error type itself, [`crate::EngineError`], lives at the crate root.
pub mod classification;
pub mod elevation_gate;

pub use classification::{ErrorClass, ErrorClassifier, REFUSAL_MARKERS};
pub use elevation_gate::ElevationGate;
