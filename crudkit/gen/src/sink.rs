//! Observability for generation runs.
//!
//! The transformation stages never log. The pipeline reports what happened
//! as [`GenerationEvent`]s to an [`EventSink`] supplied by the caller:
//! [`TracingSink`] forwards them to `tracing`, and a `Vec<GenerationEvent>`
//! collects them for inspection in tests.

use std::fmt;

use crudkit_define::OperationKind;
use tracing::{debug, info};

use crate::augment::SchemaChange;

/// One step of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationEvent {
    SchemaLoaded { path: String, types: usize },
    SchemaChanged(SchemaChange),
    SchemaSealed,
    OperationsLoaded { path: String, count: usize },
    ModelBuilt { operation: String, kind: OperationKind },
    FileWritten { path: String },
    FilePrinted { file_name: String },
}

impl fmt::Display for GenerationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaLoaded { path, types } => {
                write!(f, "loaded schema {path} ({types} user types)")
            }
            Self::SchemaChanged(change) => write!(f, "added {change}"),
            Self::SchemaSealed => write!(f, "augmented schema validated"),
            Self::OperationsLoaded { path, count } => {
                write!(f, "loaded {count} operations from {path}")
            }
            Self::ModelBuilt { operation, kind } => write!(f, "built model for {kind} {operation}"),
            Self::FileWritten { path } => write!(f, "wrote {path}"),
            Self::FilePrinted { file_name } => write!(f, "printed {file_name}"),
        }
    }
}

/// Receives events from the pipeline.
pub trait EventSink {
    fn record(&mut self, event: GenerationEvent);
}

/// Emits events through `tracing`: schema changes at `debug`, everything
/// else at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&mut self, event: GenerationEvent) {
        match &event {
            GenerationEvent::SchemaChanged(_) => debug!("{event}"),
            GenerationEvent::ModelBuilt { operation, kind } => {
                info!(operation = %operation, kind = %kind, "{event}");
            }
            _ => info!("{event}"),
        }
    }
}

impl EventSink for Vec<GenerationEvent> {
    fn record(&mut self, event: GenerationEvent) {
        self.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_collects_in_order() {
        let mut events: Vec<GenerationEvent> = Vec::new();
        events.record(GenerationEvent::SchemaSealed);
        events.record(GenerationEvent::FileWritten {
            path: "out/mod.rs".to_string(),
        });
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], GenerationEvent::SchemaSealed);
    }

    #[test]
    fn events_display_readably() {
        let change = GenerationEvent::SchemaChanged(SchemaChange::InputType {
            name: "Movie_Data".to_string(),
        });
        assert_eq!(change.to_string(), "added input type Movie_Data");

        let built = GenerationEvent::ModelBuilt {
            operation: "GetMovie".to_string(),
            kind: OperationKind::Query,
        };
        assert_eq!(built.to_string(), "built model for query GetMovie");
    }

    #[tracing_test::traced_test]
    #[test]
    fn tracing_sink_logs_events() {
        let mut sink = TracingSink;
        sink.record(GenerationEvent::SchemaSealed);
        sink.record(GenerationEvent::ModelBuilt {
            operation: "GetMovie".to_string(),
            kind: OperationKind::Query,
        });

        assert!(logs_contain("augmented schema validated"));
        assert!(logs_contain("built model for query GetMovie"));
    }
}
