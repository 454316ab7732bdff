pub mod catalog;
pub mod error;
pub mod report;
pub mod resolver;
pub mod settings;
pub mod trigger;

pub mod prelude {
    pub use crate::catalog::{CloudCatalog, Farm, JobCatalog, NodeCatalog};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::report::{DashboardView, LabelView, NodeView, ReportBuilder};
    pub use crate::resolver::{JobsGroup, ResolverContext};
    pub use crate::settings::ReportSettings;
    pub use crate::trigger::{TriggerGraph, TriggeredJob, is_supported_label};
}
