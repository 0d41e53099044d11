//! Single-user usage document: persistence, bill images, export and the
//! HTTP surface a front end calls.

pub mod bills;
pub mod domain;
pub mod export;
pub mod insights;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use bills::BillImageStore;
pub use domain::{month_label, CurrentMonth, UsageDocument, UsageEntry, UserProfile};
pub use export::{export_filename, history_csv, write_history_csv};
pub use insights::{ApplianceShare, MonthHighlight, TrendDirection, UsageInsights};
pub use router::{
    error_response, status_for, usage_router, usage_routes, UsageRecordedView, UsageSubmission,
};
pub use service::{
    Clock, DashboardSnapshot, FixedClock, SystemClock, UsageService, UsageServiceError,
};
pub use store::{JsonFileStore, StoreError, UsageStore};
