//! The editing command gateway
//!
//! Every gesture that changes a workflow funnels through
//! `WorkflowEditor`: step creation, removal and movement, input
//! rebinding, and the pass/fail connection protocol. The editor keeps
//! the derived parameter index consistent with the graph and tracks
//! whether unsaved changes exist.
//!
//! Rejected operations leave graph and index untouched, so callers can
//! discard the gesture without any repair work.

use crate::error::{GraphError, Result};
use crate::graph::StepGraph;
use crate::params::ParameterFlowIndex;
use crate::types::{
    EdgeKind, InputSource, Position, Step, StepId, StepTemplate, END_STEP, START_STEP,
};

/// One editing session's mutable graph state
#[derive(Debug, Clone)]
pub struct WorkflowEditor {
    graph: StepGraph,
    index: ParameterFlowIndex,
    modified: bool,
}

impl WorkflowEditor {
    /// Start a session on a fresh graph holding only its boundaries
    pub fn new() -> Self {
        Self {
            graph: StepGraph::new(),
            index: ParameterFlowIndex::new(),
            modified: false,
        }
    }

    /// Start a session on loaded document steps
    pub fn from_steps(steps: Vec<Step>) -> Result<Self> {
        let graph = StepGraph::from_steps(steps)?;
        let mut index = ParameterFlowIndex::new();
        index.rebuild(&graph);
        Ok(Self {
            graph,
            index,
            modified: false,
        })
    }

    /// The underlying graph
    pub fn graph(&self) -> &StepGraph {
        &self.graph
    }

    /// The derived parameter index
    pub fn params(&self) -> &ParameterFlowIndex {
        &self.index
    }

    /// Whether changes exist that have not been saved
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Record that the current contents were persisted
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// Instantiate a template as a new step at a canvas position
    pub fn create_step(&mut self, template: &StepTemplate, position: Position) -> Result<Step> {
        let step = self.graph.create_step(template, position)?.clone();
        self.modified = true;
        Ok(step)
    }

    /// Remove a step together with every edge that references it
    ///
    /// Inbound edges are cleared on their source steps; sources that
    /// lose their last edge also lose their parameter index entries, as
    /// does the removed step itself.
    pub fn remove_step(&mut self, id: &str) -> Result<Step> {
        let removed = self.graph.remove_step(id)?;

        let inbound: Vec<(StepId, EdgeKind)> = self
            .graph
            .edges()
            .filter(|(_, _, target)| *target == id)
            .map(|(source, kind, _)| (source.to_string(), kind))
            .collect();
        for (source_id, kind) in inbound {
            self.clear_edge(&source_id, kind);
        }

        // The removed step's own outgoing edges die with it
        self.index.on_source_detached(id);
        self.modified = true;
        log::debug!("removed step {} and its edges", id);
        Ok(removed)
    }

    /// Move a step on the canvas
    pub fn move_step(&mut self, id: &str, position: Position) -> Result<()> {
        self.graph.move_step(id, position)?;
        self.modified = true;
        Ok(())
    }

    /// Wire a pass or fail edge between two steps
    ///
    /// Rejects self edges, unknown endpoints, fail edges out of Start,
    /// any edge into Start, and any edge out of End. A slot that is
    /// already wired is rewired to the new target. Wiring the same edge
    /// twice is a no-op beyond marking the document modified.
    pub fn connect(&mut self, source_id: &str, target_id: &str, kind: EdgeKind) -> Result<()> {
        if source_id == target_id {
            return Err(GraphError::SelfEdge(source_id.to_string()));
        }
        if !self.graph.contains(source_id) {
            return Err(GraphError::unknown(source_id));
        }
        if !self.graph.contains(target_id) {
            return Err(GraphError::unknown(target_id));
        }
        if target_id == START_STEP {
            return Err(GraphError::StartTarget);
        }
        if source_id == END_STEP {
            return Err(GraphError::EndSource);
        }
        if source_id == START_STEP && kind == EdgeKind::Fail {
            return Err(GraphError::StartFailEdge);
        }

        if let Some(source) = self.graph.step_mut(source_id) {
            source.next.set_target(kind, Some(target_id.to_string()));
            self.index.on_edge_added(source);
        }
        self.modified = true;
        log::debug!("connected {} -{:?}-> {}", source_id, kind, target_id);
        Ok(())
    }

    /// Clear a pass or fail edge off a step
    ///
    /// Clearing an empty slot is a no-op. When the source loses its
    /// last edge, its parameter index entries are dropped with it.
    pub fn disconnect(&mut self, source_id: &str, kind: EdgeKind) -> Result<()> {
        if !self.graph.contains(source_id) {
            return Err(GraphError::unknown(source_id));
        }
        let had_edge = self
            .graph
            .step(source_id)
            .and_then(|s| s.next.target(kind))
            .is_some();
        if had_edge {
            self.clear_edge(source_id, kind);
            self.modified = true;
            log::debug!("disconnected {:?} edge from {}", kind, source_id);
        }
        Ok(())
    }

    /// Rebind one input parameter of a step
    ///
    /// `source` and `value` replace the field's current binding; pass
    /// `None` to clear. Display fields and defaults are untouched.
    pub fn bind_input(
        &mut self,
        step_id: &str,
        group: &str,
        input: &str,
        source: Option<InputSource>,
        value: Option<String>,
    ) -> Result<()> {
        let step = self
            .graph
            .step_mut(step_id)
            .ok_or_else(|| GraphError::unknown(step_id))?;
        let field = step
            .input_groups
            .iter_mut()
            .filter(|g| g.name == group)
            .flat_map(|g| g.inputs.iter_mut())
            .find(|i| i.name == input)
            .ok_or_else(|| GraphError::UnknownInput {
                step: step_id.to_string(),
                input: input.to_string(),
            })?;
        field.input_type = source;
        field.value = value;
        self.modified = true;
        Ok(())
    }

    fn clear_edge(&mut self, source_id: &str, kind: EdgeKind) {
        if let Some(source) = self.graph.step_mut(source_id) {
            source.next.set_target(kind, None);
            if source.next.is_empty() {
                self.index.on_source_detached(source_id);
            }
        }
    }
}

impl Default for WorkflowEditor {
    fn default() -> Self {
        Self::new()
    }
}
