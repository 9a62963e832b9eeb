pub mod aggregator;
pub mod correction;
pub mod grid;
pub mod summary;

pub use aggregator::AngularAggregator;
pub use correction::{CorrectionRule, CorrectionTable};
pub use grid::{GridLoader, GridPanel, PanelAxis, PanelSeries};
pub use summary::AngularSummary;
