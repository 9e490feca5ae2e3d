use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::PathBuf,
};

use tracing::info;

use crate::{
    error::PlanError,
    model::Plan,
    serializer::{from_yaml, to_annotated_yaml},
    template::{build_plan, PlanTemplateOptions},
};

pub trait PlanReadWriter {
    /// Loads the plan, upgrading deprecated fields and filling defaults.
    fn read(self: &Self) -> Result<Plan, PlanError>;
    /// Saves the plan with field documentation.
    fn write(self: &Self, plan: &Plan) -> Result<(), PlanError>;
}

pub trait Planner: PlanReadWriter {
    fn plan_exists(self: &Self) -> bool;
}

/// A plan stored in a single file.
#[derive(Debug, Clone)]
pub struct FilePlanner {
    pub file: PathBuf,
}

impl FilePlanner {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }
}

impl PlanReadWriter for FilePlanner {
    fn read(&self) -> Result<Plan, PlanError> {
        let text = fs::read_to_string(&self.file).map_err(|e| PlanError::read(&self.file, e))?;
        let plan = from_yaml(&text)?;
        info!("read plan file {}", self.file.display());
        Ok(plan)
    }

    /// The file is truncated before writing and is not replaced atomically;
    /// after an error its contents must be treated as corrupt.
    fn write(&self, plan: &Plan) -> Result<(), PlanError> {
        let text = to_annotated_yaml(plan)?;
        let file = File::create(&self.file).map_err(|e| PlanError::write(&self.file, e))?;
        let mut out = BufWriter::new(file);
        out.write_all(text.as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| PlanError::write(&self.file, e))?;
        info!("wrote plan file {}", self.file.display());
        Ok(())
    }
}

impl Planner for FilePlanner {
    fn plan_exists(&self) -> bool {
        self.file.exists()
    }
}

/// Builds a plan from `options` and saves it through `writer`.
pub fn write_plan_template(
    options: &PlanTemplateOptions,
    writer: &dyn PlanReadWriter,
) -> Result<(), PlanError> {
    let plan = build_plan(options)
        .map_err(|e| e.context("error generating installation plan template"))?;
    writer
        .write(&plan)
        .map_err(|e| e.context("error writing installation plan template"))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct MemoryPlanner {
        written: RefCell<Option<Plan>>,
    }

    impl PlanReadWriter for MemoryPlanner {
        fn read(&self) -> Result<Plan, PlanError> {
            Ok(self.written.borrow().clone().unwrap_or_default())
        }

        fn write(&self, plan: &Plan) -> Result<(), PlanError> {
            *self.written.borrow_mut() = Some(plan.clone());
            Ok(())
        }
    }

    #[test]
    fn template_is_written_through_any_writer() {
        let planner = MemoryPlanner::default();
        let options = PlanTemplateOptions {
            etcd_nodes: 1,
            master_nodes: 1,
            worker_nodes: 1,
            admin_password: "password1234567890".into(),
            ..Default::default()
        };
        write_plan_template(&options, &planner).unwrap();

        let plan = planner.read().unwrap();
        assert_eq!(plan.cluster.admin_password, "password1234567890");
        assert_eq!(plan.worker.nodes.len(), 1);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let planner = FilePlanner::new(dir.path().join("missing.yaml"));
        assert!(!planner.plan_exists());
        assert!(matches!(planner.read(), Err(PlanError::Read { .. })));
    }

    #[test]
    fn unwritable_location_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let planner = FilePlanner::new(dir.path().join("no-such-dir").join("plan.yaml"));
        let err = planner.write(&Plan::default()).unwrap_err();
        assert!(matches!(err, PlanError::Write { .. }));
    }
}
