use std::collections::HashSet;
use std::sync::Arc;

use docflow_config::{ConfigDefaults, FragmentDef, TaskDef, resolve_task};
use docflow_task::{RetryPolicy, TaskError, TaskNode, TaskSpec};
use docflow_workflow::Fragment;
use tracing::{info, instrument};

use crate::error::ResolveError;

/// Resolver transforms a FragmentDef into a constructed Fragment.
pub trait Resolver: Send + Sync {
  /// Resolve a fragment definition.
  ///
  /// This process:
  /// 1. Rejects duplicate task ids
  /// 2. Fills every task's options from the defaults
  /// 3. Builds each task node with its retry and access policies
  /// 4. Chains the nodes in definition order
  fn resolve(&self, def: FragmentDef) -> Result<Fragment, ResolveError>;
}

/// Standard resolver implementation that fills gaps from [`ConfigDefaults`].
pub struct StandardResolver {
  defaults: ConfigDefaults,
}

impl StandardResolver {
  /// Create a new resolver with the given defaults.
  pub fn new(defaults: ConfigDefaults) -> Self {
    Self { defaults }
  }

  /// Check that every task id is unique.
  fn validate_task_ids(&self, tasks: &[TaskDef]) -> Result<(), ResolveError> {
    let mut task_ids = HashSet::new();
    for task in tasks {
      if !task_ids.insert(task.task_id.as_str()) {
        return Err(ResolveError::DuplicateTaskId {
          task_id: task.task_id.clone(),
        });
      }
    }
    Ok(())
  }

  /// Resolve a single task definition into a node.
  fn resolve_task(&self, def: TaskDef, partition: Option<&str>) -> Result<TaskNode, ResolveError> {
    let settings = resolve_task(def, partition, &self.defaults)?;
    let task_error = |source: TaskError| ResolveError::Task {
      task_id: settings.task_id.clone(),
      source,
    };

    let spec = TaskSpec::from_settings(&settings).map_err(task_error)?;
    let retry = RetryPolicy::from_settings(&settings.retry).map_err(task_error)?;
    TaskNode::new(&settings.task_id, spec, retry).map_err(task_error)
  }
}

impl Default for StandardResolver {
  fn default() -> Self {
    Self::new(ConfigDefaults::default())
  }
}

impl Resolver for StandardResolver {
  #[instrument(name = "fragment_resolve", skip_all, fields(fragment_id = %def.fragment_id))]
  fn resolve(&self, def: FragmentDef) -> Result<Fragment, ResolveError> {
    if def.tasks.is_empty() {
      return Err(ResolveError::NoTasks {
        fragment_id: def.fragment_id,
      });
    }

    self.validate_task_ids(&def.tasks)?;

    let partition = def.partition.as_deref();
    let mut nodes = Vec::with_capacity(def.tasks.len());
    for task in def.tasks {
      nodes.push(Arc::new(self.resolve_task(task, partition)?));
    }

    let fragment = Fragment::chain(&nodes).map_err(|source| ResolveError::Workflow {
      fragment_id: def.fragment_id.clone(),
      source,
    })?;

    info!(
      fragment_id = %def.fragment_id,
      name = %def.name,
      nodes = fragment.nodes().len(),
      "fragment_resolved"
    );

    Ok(fragment)
  }
}
