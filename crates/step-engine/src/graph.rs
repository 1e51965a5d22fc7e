//! The step graph store
//!
//! `StepGraph` owns every step of one workflow, keyed by id in insertion
//! order. It is the single source of truth for graph content; diagrams
//! and parameter indices are projections derived from it. Edge wiring
//! goes through `WorkflowEditor`, which layers the connection protocol
//! on top of this store.

use indexmap::IndexMap;
use uuid::Uuid;

use crate::error::{GraphError, Result};
use crate::types::{
    EdgeKind, NextSteps, Position, Step, StepId, StepTemplate, StepType, END_STEP, START_STEP,
};

/// Insertion-ordered store of the steps in one workflow
#[derive(Debug, Clone)]
pub struct StepGraph {
    steps: IndexMap<StepId, Step>,
}

impl StepGraph {
    /// Create a graph seeded with its Start and End boundary steps
    pub fn new() -> Self {
        let mut steps = IndexMap::new();
        steps.insert(
            START_STEP.to_string(),
            boundary_step(START_STEP, StepType::Start, 60, 60),
        );
        steps.insert(
            END_STEP.to_string(),
            boundary_step(END_STEP, StepType::End, 60, 420),
        );
        Self { steps }
    }

    /// Build a graph from persisted steps, checking boundary presence
    pub fn from_steps(steps: Vec<Step>) -> Result<Self> {
        let mut map = IndexMap::with_capacity(steps.len());
        for step in steps {
            if map.contains_key(&step.id) {
                return Err(GraphError::DuplicateStep(step.id));
            }
            map.insert(step.id.clone(), step);
        }
        if !map.contains_key(START_STEP) {
            return Err(GraphError::MissingBoundary(START_STEP));
        }
        if !map.contains_key(END_STEP) {
            return Err(GraphError::MissingBoundary(END_STEP));
        }
        Ok(Self { steps: map })
    }

    /// Instantiate a step from a library template at a canvas position
    ///
    /// Assigns a fresh random id and copies the template's display and
    /// parameter definitions. Boundary kinds cannot be instantiated; a
    /// graph has exactly the one Start and one End it was seeded with.
    pub fn create_step(&mut self, template: &StepTemplate, position: Position) -> Result<&Step> {
        if template.step_type.is_boundary() {
            return Err(GraphError::BoundaryStep(template.friendly_name.clone()));
        }
        let id = Uuid::new_v4().simple().to_string();
        let step = Step {
            id: id.clone(),
            step_type: template.step_type,
            operation: template.operation.clone(),
            friendly_name: template.friendly_name.clone(),
            position_x: position.x.round() as i64,
            position_y: position.y.round() as i64,
            input_groups: template.input_groups.clone(),
            output: template.output.clone(),
            next: NextSteps::default(),
        };
        log::debug!("created step {} ({})", id, step.friendly_name);
        self.steps.insert(id.clone(), step);
        self.steps
            .get(&id)
            .ok_or_else(|| GraphError::unknown(&id))
    }

    /// Remove a step, returning it
    ///
    /// Boundary steps are not removable. This only removes the step
    /// itself; `WorkflowEditor::remove_step` additionally detaches
    /// every edge and index entry referencing it.
    pub fn remove_step(&mut self, id: &str) -> Result<Step> {
        if let Some(step) = self.steps.get(id) {
            if step.is_boundary() {
                return Err(GraphError::BoundaryStep(step.id.clone()));
            }
        } else {
            return Err(GraphError::unknown(id));
        }
        // shift_remove keeps insertion order for the survivors
        self.steps
            .shift_remove(id)
            .ok_or_else(|| GraphError::unknown(id))
    }

    /// Update a step's canvas position
    pub fn move_step(&mut self, id: &str, position: Position) -> Result<()> {
        let step = self
            .steps
            .get_mut(id)
            .ok_or_else(|| GraphError::unknown(id))?;
        step.set_position(position);
        Ok(())
    }

    /// Look up a step by id
    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.get(id)
    }

    /// Look up a step by id (mutable)
    pub fn step_mut(&mut self, id: &str) -> Option<&mut Step> {
        self.steps.get_mut(id)
    }

    /// Whether a step with this id exists
    pub fn contains(&self, id: &str) -> bool {
        self.steps.contains_key(id)
    }

    /// Iterate steps in insertion order
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.values()
    }

    /// Number of steps, boundaries included
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the graph holds no steps at all
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Enumerate every wired edge as (source id, kind, target id)
    pub fn edges(&self) -> impl Iterator<Item = (&str, EdgeKind, &str)> {
        self.steps.values().flat_map(|s| {
            let pass = s
                .next
                .default_step
                .as_deref()
                .map(|t| (s.id.as_str(), EdgeKind::Pass, t));
            let fail = s
                .next
                .failed_step
                .as_deref()
                .map(|t| (s.id.as_str(), EdgeKind::Fail, t));
            pass.into_iter().chain(fail)
        })
    }

    /// Steps whose pass or fail edge targets the given id
    pub fn inbound_sources<'a>(&'a self, target_id: &'a str) -> impl Iterator<Item = &'a Step> + 'a {
        self.steps.values().filter(move |s| {
            s.next.default_step.as_deref() == Some(target_id)
                || s.next.failed_step.as_deref() == Some(target_id)
        })
    }

    /// Steps in insertion order, cloned for serialization
    pub fn to_steps(&self) -> Vec<Step> {
        self.steps.values().cloned().collect()
    }
}

impl Default for StepGraph {
    fn default() -> Self {
        Self::new()
    }
}

fn boundary_step(id: &str, step_type: StepType, x: i64, y: i64) -> Step {
    Step {
        id: id.to_string(),
        step_type,
        operation: String::new(),
        friendly_name: id.to_string(),
        position_x: x,
        position_y: y,
        input_groups: Vec::new(),
        output: Vec::new(),
        next: NextSteps::default(),
    }
}
