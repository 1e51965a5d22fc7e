//! Derived index of addressable upstream parameters
//!
//! Once a step is wired into the flow, downstream configuration forms
//! may bind their inputs to any of its parameters. This index keeps
//! those choices available incrementally as edges change instead of
//! rescanning the graph, and preserves insertion order so the option
//! lists stay stable in the UI.
//!
//! The index is a read-side projection only. Edges live in the graph;
//! this never becomes a second source of truth for wiring.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::graph::StepGraph;
use crate::types::{Step, IMPLICIT_OUTPUTS};

/// A selectable parameter reference with its display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamOption {
    /// Composite reference: "stepId.paramName"
    pub id: String,
    /// Display label: "step friendly name" plus the parameter name
    pub label: String,
}

/// Incrementally maintained maps of addressable upstream parameters
#[derive(Debug, Clone, Default)]
pub struct ParameterFlowIndex {
    input_options: IndexMap<String, ParamOption>,
    output_options: IndexMap<String, ParamOption>,
}

impl ParameterFlowIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source step that gained an outgoing edge
    ///
    /// Boundary steps expose no addressable parameters. Upserts are
    /// idempotent, so wiring a second edge from the same source changes
    /// nothing.
    pub fn on_edge_added(&mut self, source: &Step) {
        if source.is_boundary() {
            return;
        }
        for name in source.input_names() {
            upsert(&mut self.input_options, &source.id, &source.friendly_name, name);
        }
        for name in source.output_names() {
            upsert(&mut self.output_options, &source.id, &source.friendly_name, name);
        }
        for name in IMPLICIT_OUTPUTS {
            upsert(&mut self.output_options, &source.id, &source.friendly_name, name);
        }
    }

    /// Drop every entry contributed by a source that lost its last edge
    ///
    /// Entries survive as long as the source has either a pass or a
    /// fail edge; downstream steps still see its parameters through the
    /// remaining one.
    pub fn on_source_detached(&mut self, source_id: &str) {
        let prefix = format!("{}.", source_id);
        self.input_options.retain(|key, _| !key.starts_with(&prefix));
        self.output_options.retain(|key, _| !key.starts_with(&prefix));
    }

    /// Rebuild from scratch for every source that currently has an edge
    ///
    /// Used after loading a document, so the index matches what the
    /// same wiring would have produced incrementally.
    pub fn rebuild(&mut self, graph: &StepGraph) {
        self.clear();
        for step in graph.steps() {
            if !step.next.is_empty() {
                self.on_edge_added(step);
            }
        }
    }

    /// Addressable upstream inputs, in insertion order
    pub fn input_options(&self) -> impl Iterator<Item = &ParamOption> {
        self.input_options.values()
    }

    /// Addressable upstream outputs, in insertion order
    pub fn output_options(&self) -> impl Iterator<Item = &ParamOption> {
        self.output_options.values()
    }

    /// Look up an input option by composite reference
    pub fn input_option(&self, key: &str) -> Option<&ParamOption> {
        self.input_options.get(key)
    }

    /// Look up an output option by composite reference
    pub fn output_option(&self, key: &str) -> Option<&ParamOption> {
        self.output_options.get(key)
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.input_options.clear();
        self.output_options.clear();
    }
}

fn upsert(
    map: &mut IndexMap<String, ParamOption>,
    source_id: &str,
    friendly_name: &str,
    param: &str,
) {
    let key = format!("{}.{}", source_id, param);
    if map.contains_key(&key) {
        return;
    }
    let label = format!("{} {}", friendly_name, param);
    map.insert(key.clone(), ParamOption { id: key, label });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        InputField, InputGroup, NextSteps, OutputField, StepType, END_STEP, START_STEP,
    };

    fn script_step(id: &str, name: &str, inputs: &[&str], outputs: &[&str]) -> Step {
        Step {
            id: id.to_string(),
            step_type: StepType::Script,
            operation: format!("ops/{}", id),
            friendly_name: name.to_string(),
            position_x: 0,
            position_y: 0,
            input_groups: vec![InputGroup {
                name: "input_params".to_string(),
                inputs: inputs.iter().map(|i| InputField::named(*i)).collect(),
            }],
            output: outputs.iter().map(|o| OutputField::named(*o)).collect(),
            next: NextSteps::default(),
        }
    }

    fn boundary(id: &str, step_type: StepType) -> Step {
        Step {
            id: id.to_string(),
            step_type,
            operation: String::new(),
            friendly_name: id.to_string(),
            position_x: 0,
            position_y: 0,
            input_groups: Vec::new(),
            output: Vec::new(),
            next: NextSteps::default(),
        }
    }

    #[test]
    fn test_edge_added_indexes_params() {
        let mut index = ParameterFlowIndex::new();
        let step = script_step("a1", "Copy Files", &["host"], &["result"]);
        index.on_edge_added(&step);

        let input = index.input_option("a1.host").unwrap();
        assert_eq!(input.label, "Copy Files host");

        let output = index.output_option("a1.result").unwrap();
        assert_eq!(output.id, "a1.result");
        assert_eq!(output.label, "Copy Files result");
    }

    #[test]
    fn test_implicit_outputs_always_present() {
        let mut index = ParameterFlowIndex::new();
        let step = script_step("a1", "Copy Files", &[], &[]);
        index.on_edge_added(&step);

        assert_eq!(index.output_options().count(), 3);
        assert!(index.output_option("a1.operation_output").is_some());
        assert!(index.output_option("a1.operation_error").is_some());
        assert!(index.output_option("a1.operation_returncode").is_some());
        assert_eq!(index.input_options().count(), 0);
    }

    #[test]
    fn test_boundary_sources_are_skipped() {
        let mut index = ParameterFlowIndex::new();
        index.on_edge_added(&boundary(START_STEP, StepType::Start));
        index.on_edge_added(&boundary(END_STEP, StepType::End));
        assert_eq!(index.input_options().count(), 0);
        assert_eq!(index.output_options().count(), 0);
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let mut index = ParameterFlowIndex::new();
        let step = script_step("a1", "Copy Files", &["host"], &["result"]);
        index.on_edge_added(&step);
        index.on_edge_added(&step);

        assert_eq!(index.input_options().count(), 1);
        assert_eq!(index.output_options().count(), 4);
    }

    #[test]
    fn test_detach_removes_only_that_source() {
        let mut index = ParameterFlowIndex::new();
        index.on_edge_added(&script_step("a1", "Copy", &["host"], &[]));
        index.on_edge_added(&script_step("b2", "Verify", &["path"], &[]));

        index.on_source_detached("a1");
        assert!(index.input_option("a1.host").is_none());
        assert!(index.output_option("a1.operation_output").is_none());
        assert!(index.input_option("b2.path").is_some());
        assert_eq!(index.output_options().count(), 3);
    }

    #[test]
    fn test_detach_matches_whole_id_prefix() {
        let mut index = ParameterFlowIndex::new();
        index.on_edge_added(&script_step("a", "Short", &["x"], &[]));
        index.on_edge_added(&script_step("ab", "Longer", &["x"], &[]));

        index.on_source_detached("a");
        assert!(index.input_option("a.x").is_none());
        assert!(index.input_option("ab.x").is_some());
    }

    #[test]
    fn test_insertion_order_is_stable() {
        let mut index = ParameterFlowIndex::new();
        index.on_edge_added(&script_step("b2", "Second", &[], &["beta"]));
        index.on_edge_added(&script_step("a1", "First", &[], &["alpha"]));

        let keys: Vec<_> = index.output_options().map(|o| o.id.clone()).collect();
        assert_eq!(keys[0], "b2.beta");
        assert!(keys.iter().position(|k| k == "b2.beta").unwrap()
            < keys.iter().position(|k| k == "a1.alpha").unwrap());
    }
}
