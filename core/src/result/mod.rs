//! Result normalization
//!
//! Turns the untyped JSON documents returned by the backend into
//! presentation-ready view models without trusting any field.

pub mod finding;
pub mod history;
pub mod model;
pub mod value;
pub mod view;

pub use finding::NormalizedFinding;
pub use history::{HistoryRecord, HistoryRow};
pub use model::{ScrapeResult, MAPS_SOURCE_TAG};
pub use view::{
    format_cost, format_duration, FindingsView, GenericCard, Kpis, LeadCard, Outcome, ResultView,
    StepView, NOT_AVAILABLE, NO_ITEMS_HINT,
};
