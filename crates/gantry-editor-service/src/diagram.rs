//! Diagram projection and sync
//!
//! The canvas never owns workflow truth: every gesture is forwarded to
//! `WorkflowEditor` first and the visual change is committed only after
//! the model accepts it. A rejected gesture leaves the diagram exactly
//! as it was, so there is nothing to undo.

use step_engine::{EdgeKind, GraphError, Position, Step, StepTemplate, StepType, WorkflowEditor};

/// Longest label shown before trimming
const MAX_LABEL_CHARS: usize = 70;
/// Kept prefix of an over-long label
const TRIMMED_LABEL_CHARS: usize = 65;

/// The outline a node is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    /// Ordinary step card
    Card,
    /// Rounded Start/End terminal
    Terminal,
}

/// Icon shown on a step card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepIcon {
    Script,
    Ansible,
    RemoteAnsible,
    Rest,
    ViprRest,
    Workflow,
}

impl StepIcon {
    /// The icon for a step kind; boundaries carry none
    pub fn for_type(step_type: StepType) -> Option<Self> {
        match step_type {
            StepType::Script => Some(StepIcon::Script),
            StepType::LocalAnsible => Some(StepIcon::Ansible),
            StepType::RemoteAnsible => Some(StepIcon::RemoteAnsible),
            StepType::Rest => Some(StepIcon::Rest),
            StepType::ViprRest => Some(StepIcon::ViprRest),
            StepType::WorkflowReference => Some(StepIcon::Workflow),
            StepType::Start | StepType::End => None,
        }
    }
}

/// One rendered node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramNode {
    pub id: String,
    /// Display label, trimmed when over-long
    pub label: String,
    pub shape: NodeShape,
    pub icon: Option<StepIcon>,
    pub x: i64,
    pub y: i64,
    /// Whether a pass connector may start here
    pub pass_endpoint: bool,
    /// Whether a fail connector may start here
    pub fail_endpoint: bool,
    /// Whether connectors may land here
    pub accepts_connections: bool,
}

/// One rendered connector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

/// The full visual projection of a workflow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagram {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

impl Diagram {
    /// Find a node by step id
    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Screen-to-canvas translation for pointer gestures
///
/// Pan and zoom live in the host shell; the sync engine only needs the
/// inverse mapping to place dropped and dragged steps.
pub trait CanvasTransform {
    fn to_canvas(&self, point: Position) -> Position;
}

/// Transform for an unpanned canvas at 1.0 zoom
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl CanvasTransform for IdentityTransform {
    fn to_canvas(&self, point: Position) -> Position {
        point
    }
}

/// Transform compensating the host's pan offset and zoom factor
#[derive(Debug, Clone, Copy)]
pub struct PannedZoomTransform {
    /// Screen position of the canvas origin
    pub origin: Position,
    /// Current zoom factor, 1.0 is unzoomed
    pub zoom: f64,
}

impl CanvasTransform for PannedZoomTransform {
    fn to_canvas(&self, point: Position) -> Position {
        Position::new(
            (point.x - self.origin.x) / self.zoom,
            (point.y - self.origin.y) / self.zoom,
        )
    }
}

/// Keeps a `Diagram` in step with the model it projects
///
/// Edges are re-derived from the graph after every wiring change, so an
/// incrementally maintained diagram always equals a fresh `rebuild` of
/// the same editor.
#[derive(Debug, Clone, Default)]
pub struct DiagramSync {
    diagram: Diagram,
}

impl DiagramSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Project a loaded editor into a fresh diagram
    pub fn rebuilt(editor: &WorkflowEditor) -> Self {
        let mut sync = Self::new();
        sync.rebuild(editor);
        sync
    }

    /// The current projection
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Re-render every node and edge from the graph
    pub fn rebuild(&mut self, editor: &WorkflowEditor) {
        self.diagram.nodes = editor.graph().steps().map(node_for).collect();
        self.refresh_edges(editor);
    }

    /// Drop a library template onto the canvas, returning the new id
    pub fn drop_template(
        &mut self,
        editor: &mut WorkflowEditor,
        template: &StepTemplate,
        drop_point: Position,
        transform: &dyn CanvasTransform,
    ) -> Result<String, GraphError> {
        let step = editor.create_step(template, transform.to_canvas(drop_point))?;
        self.diagram.nodes.push(node_for(&step));
        Ok(step.id)
    }

    /// Drag a step to a new position
    pub fn step_moved(
        &mut self,
        editor: &mut WorkflowEditor,
        id: &str,
        point: Position,
        transform: &dyn CanvasTransform,
    ) -> Result<(), GraphError> {
        let position = transform.to_canvas(point);
        editor.move_step(id, position)?;
        if let Some(node) = self.diagram.nodes.iter_mut().find(|n| n.id == id) {
            node.x = position.x.round() as i64;
            node.y = position.y.round() as i64;
        }
        Ok(())
    }

    /// Draw a connector between two steps
    pub fn connector_drawn(
        &mut self,
        editor: &mut WorkflowEditor,
        source: &str,
        target: &str,
        kind: EdgeKind,
    ) -> Result<(), GraphError> {
        editor.connect(source, target, kind)?;
        self.refresh_edges(editor);
        Ok(())
    }

    /// Remove a connector off a step
    pub fn connector_removed(
        &mut self,
        editor: &mut WorkflowEditor,
        source: &str,
        kind: EdgeKind,
    ) -> Result<(), GraphError> {
        editor.disconnect(source, kind)?;
        self.refresh_edges(editor);
        Ok(())
    }

    /// Delete a step and everything attached to it
    pub fn step_removed(&mut self, editor: &mut WorkflowEditor, id: &str) -> Result<(), GraphError> {
        editor.remove_step(id)?;
        self.diagram.nodes.retain(|n| n.id != id);
        self.refresh_edges(editor);
        Ok(())
    }

    fn refresh_edges(&mut self, editor: &WorkflowEditor) {
        self.diagram.edges = editor
            .graph()
            .edges()
            .map(|(source, kind, target)| DiagramEdge {
                source: source.to_string(),
                target: target.to_string(),
                kind,
            })
            .collect();
    }
}

fn node_for(step: &Step) -> DiagramNode {
    let is_start = step.step_type == StepType::Start;
    let is_end = step.step_type == StepType::End;
    DiagramNode {
        id: step.id.clone(),
        label: trimmed_label(&step.friendly_name),
        shape: if step.is_boundary() {
            NodeShape::Terminal
        } else {
            NodeShape::Card
        },
        icon: StepIcon::for_type(step.step_type),
        x: step.position_x,
        y: step.position_y,
        pass_endpoint: !is_end,
        fail_endpoint: !is_end && !is_start,
        accepts_connections: !is_start,
    }
}

fn trimmed_label(name: &str) -> String {
    if name.chars().count() > MAX_LABEL_CHARS {
        let kept: String = name.chars().take(TRIMMED_LABEL_CHARS).collect();
        format!("{}...", kept)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use step_engine::{InputGroup, END_STEP, START_STEP};

    fn template(name: &str) -> StepTemplate {
        StepTemplate {
            operation: format!("ops/{}", name),
            step_type: StepType::Script,
            friendly_name: name.to_string(),
            input_groups: vec![InputGroup {
                name: "input_params".to_string(),
                inputs: Vec::new(),
            }],
            output: Vec::new(),
        }
    }

    fn drop_step(sync: &mut DiagramSync, editor: &mut WorkflowEditor, name: &str) -> String {
        sync.drop_template(editor, &template(name), Position::default(), &IdentityTransform)
            .unwrap()
    }

    #[test]
    fn test_boundaries_render_as_terminals() {
        let editor = WorkflowEditor::new();
        let sync = DiagramSync::rebuilt(&editor);
        let diagram = sync.diagram();
        assert_eq!(diagram.nodes.len(), 2);

        let start = diagram.node(START_STEP).unwrap();
        assert_eq!(start.shape, NodeShape::Terminal);
        assert!(start.icon.is_none());
        assert!(start.pass_endpoint);
        assert!(!start.fail_endpoint);
        assert!(!start.accepts_connections);

        let end = diagram.node(END_STEP).unwrap();
        assert_eq!(end.shape, NodeShape::Terminal);
        assert!(!end.pass_endpoint);
        assert!(!end.fail_endpoint);
        assert!(end.accepts_connections);
    }

    #[test]
    fn test_drop_translates_through_transform() {
        let mut editor = WorkflowEditor::new();
        let mut sync = DiagramSync::rebuilt(&editor);
        let transform = PannedZoomTransform {
            origin: Position::new(100.0, 50.0),
            zoom: 2.0,
        };

        let id = sync
            .drop_template(
                &mut editor,
                &template("copy-files"),
                Position::new(300.0, 250.0),
                &transform,
            )
            .unwrap();

        let node = sync.diagram().node(&id).unwrap();
        assert_eq!((node.x, node.y), (100, 100));
        assert_eq!(node.shape, NodeShape::Card);
        assert_eq!(node.icon, Some(StepIcon::Script));
        assert!(node.pass_endpoint && node.fail_endpoint && node.accepts_connections);

        let step = editor.graph().step(&id).unwrap();
        assert_eq!((step.position_x, step.position_y), (100, 100));
    }

    #[test]
    fn test_rejected_gesture_leaves_diagram_untouched() {
        let mut editor = WorkflowEditor::new();
        let mut sync = DiagramSync::rebuilt(&editor);
        let a = drop_step(&mut sync, &mut editor, "a");
        let before = sync.diagram().clone();

        assert!(sync
            .connector_drawn(&mut editor, &a, &a, EdgeKind::Pass)
            .is_err());
        assert!(sync
            .connector_drawn(&mut editor, &a, START_STEP, EdgeKind::Pass)
            .is_err());
        assert!(sync.step_removed(&mut editor, "missing").is_err());
        assert_eq!(sync.diagram(), &before);
    }

    #[test]
    fn test_connectors_follow_the_graph() {
        let mut editor = WorkflowEditor::new();
        let mut sync = DiagramSync::rebuilt(&editor);
        let a = drop_step(&mut sync, &mut editor, "a");

        sync.connector_drawn(&mut editor, START_STEP, &a, EdgeKind::Pass)
            .unwrap();
        sync.connector_drawn(&mut editor, &a, END_STEP, EdgeKind::Pass)
            .unwrap();
        sync.connector_drawn(&mut editor, &a, END_STEP, EdgeKind::Fail)
            .unwrap();
        assert_eq!(sync.diagram().edges.len(), 3);

        sync.connector_removed(&mut editor, &a, EdgeKind::Fail)
            .unwrap();
        assert_eq!(sync.diagram().edges.len(), 2);
        assert!(sync
            .diagram()
            .edges
            .iter()
            .all(|e| e.kind != EdgeKind::Fail));
    }

    #[test]
    fn test_step_removed_drops_node_and_edges() {
        let mut editor = WorkflowEditor::new();
        let mut sync = DiagramSync::rebuilt(&editor);
        let a = drop_step(&mut sync, &mut editor, "a");
        sync.connector_drawn(&mut editor, START_STEP, &a, EdgeKind::Pass)
            .unwrap();
        sync.connector_drawn(&mut editor, &a, END_STEP, EdgeKind::Pass)
            .unwrap();

        sync.step_removed(&mut editor, &a).unwrap();
        assert!(sync.diagram().node(&a).is_none());
        assert!(sync.diagram().edges.is_empty());
        assert_eq!(sync.diagram().nodes.len(), 2);
    }

    #[test]
    fn test_incremental_diagram_equals_rebuild() {
        let mut editor = WorkflowEditor::new();
        let mut sync = DiagramSync::rebuilt(&editor);

        let a = drop_step(&mut sync, &mut editor, "a");
        let b = drop_step(&mut sync, &mut editor, "b");
        sync.connector_drawn(&mut editor, START_STEP, &a, EdgeKind::Pass)
            .unwrap();
        sync.connector_drawn(&mut editor, &a, &b, EdgeKind::Pass)
            .unwrap();
        sync.connector_drawn(&mut editor, &b, END_STEP, EdgeKind::Pass)
            .unwrap();
        sync.step_moved(
            &mut editor,
            &a,
            Position::new(320.0, 240.0),
            &IdentityTransform,
        )
        .unwrap();
        sync.connector_removed(&mut editor, &a, EdgeKind::Pass)
            .unwrap();

        assert_eq!(sync.diagram(), DiagramSync::rebuilt(&editor).diagram());
    }

    #[test]
    fn test_long_labels_are_trimmed() {
        let mut editor = WorkflowEditor::new();
        let mut sync = DiagramSync::rebuilt(&editor);
        let long_name = "n".repeat(80);
        let id = drop_step(&mut sync, &mut editor, &long_name);

        let label = &sync.diagram().node(&id).unwrap().label;
        assert_eq!(label.chars().count(), 68);
        assert!(label.ends_with("..."));

        // At the threshold the label is left alone
        let exact = "m".repeat(70);
        let id = drop_step(&mut sync, &mut editor, &exact);
        assert_eq!(sync.diagram().node(&id).unwrap().label, exact);
    }
}
