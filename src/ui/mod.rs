/// User interface module
///
/// One file per screen, plus the dashboard chart:
/// - Collection summaries at a glance (dashboard.rs)
/// - Country distribution bar chart (chart.rs)
/// - Searchable, sortable coin grid (collection.rs)
/// - Two-step capture and review wizard (add.rs)
/// - Single coin details (details.rs)

pub mod add;
pub mod chart;
pub mod collection;
pub mod dashboard;
pub mod details;
