pub mod orchestrator;

pub use orchestrator::SessionOrchestrator;
