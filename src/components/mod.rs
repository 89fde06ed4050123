//! Presentational components. Each one reads the [`Studio`](crate::runtime::Studio)
//! from context and reports user input back to it as events.

mod constraint_list;
mod dataset_panel;
mod editor;
pub mod force_graph;
mod motif_view;
mod notifications;
mod results_table;
mod saved_patterns;

pub use constraint_list::ConstraintList;
pub use dataset_panel::DatasetPanel;
pub use editor::MotifEditor;
pub use motif_view::MotifView;
pub use notifications::Toasts;
pub use results_table::ResultsTable;
pub use saved_patterns::SavedPatterns;
