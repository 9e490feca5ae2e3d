pub mod comments;
pub mod config;
pub mod defaults;
pub mod error;
pub mod migrate;
pub mod model;
pub mod network;
pub mod password;
pub mod planner;
pub mod serializer;
pub mod template;

pub use error::PlanError;
pub use model::Plan;
pub use planner::{write_plan_template, FilePlanner, PlanReadWriter, Planner};
pub use template::{build_plan, PlanTemplateOptions};

#[macro_export]
macro_rules! exit {
    ($err:expr, $($arg:tt)*) => {
        {
            tracing::error!($($arg)*);
            anyhow::bail!($err)
        }
    };
}
