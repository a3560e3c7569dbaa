//! Rendering adapter.
//!
//! [`render`] turns the diagram and its selection flags into an ordered list
//! of [`DrawCommand`]s: every concept (text, then a highlight outline if
//! selected), then every link as a filled arrow. The output depends only on
//! its inputs, so repeated calls on an unchanged diagram are identical.
//!
//! [`DrawList`] keeps the last rendered list and can mirror it into a Slint
//! `VecModel` through a constructor closure:
//!
//! ```ignore
//! let mut draw_list = DrawList::new(config.render_style());
//! let model = Rc::new(VecModel::<DrawItem>::default());
//! draw_list.bind_model(model.clone(), |cmd| DrawItem::from(cmd));
//! window.set_draw_items(ModelRc::from(model));
//!
//! // after each transition
//! draw_list.update(&diagram);
//! ```

use crate::config::CanvasConfig;
use crate::graph::{Diagram, Selectable};
use crate::hit_test::compute_arrow;
use crate::path::{polygon_path_commands, ArrowStyle, Point, Rect};
use slint::{Color, Model, VecModel};
use std::rc::Rc;
use tracing::debug;

/// One primitive draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Draw `text` with its top-left corner at `at`.
    Text { text: String, at: Point },
    /// Stroke the outline of `rect`.
    StrokeRect { rect: Rect, color: Color },
    /// Fill the closed polygon through `points`.
    FillPolygon { points: Vec<Point>, color: Color },
}

impl DrawCommand {
    /// SVG path commands for shape commands, `None` for text.
    pub fn path_commands(&self) -> Option<String> {
        match self {
            DrawCommand::Text { .. } => None,
            DrawCommand::StrokeRect { rect, .. } => Some(polygon_path_commands(&[
                rect.origin,
                Point::new(rect.max_x(), rect.min_y()),
                Point::new(rect.max_x(), rect.max_y()),
                Point::new(rect.min_x(), rect.max_y()),
            ])),
            DrawCommand::FillPolygon { points, .. } => Some(polygon_path_commands(points)),
        }
    }
}

/// Visual parameters the adapter needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub highlight_color: Color,
    pub arrow: ArrowStyle,
}

impl Default for RenderStyle {
    fn default() -> Self {
        CanvasConfig::default().render_style()
    }
}

impl CanvasConfig {
    pub fn render_style(&self) -> RenderStyle {
        RenderStyle {
            highlight_color: self.highlight_color,
            arrow: self.arrow,
        }
    }
}

/// Produce the draw commands for `diagram`.
///
/// Links whose arrow cannot be computed are left out.
pub fn render(diagram: &Diagram, style: &RenderStyle) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(diagram.concepts().len() + diagram.links().len());

    for concept in diagram.concepts() {
        let rect = concept.rect();
        commands.push(DrawCommand::Text {
            text: concept.text().to_owned(),
            at: rect.origin,
        });
        if concept.is_selected() {
            commands.push(DrawCommand::StrokeRect {
                rect,
                color: style.highlight_color,
            });
        }
    }

    for link in diagram.links() {
        match compute_arrow(diagram, link) {
            Ok(arrow) => commands.push(DrawCommand::FillPolygon {
                points: arrow.polygon(&style.arrow),
                color: link.color(),
            }),
            Err(err) => debug!(link = %link.id(), error = %err, "arrow omitted"),
        }
    }

    commands
}

/// Internal trait for auto-syncing to Slint models.
trait ModelSyncer {
    fn sync(&self, commands: &[DrawCommand]);
}

struct ConcreteModelSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<P, F> ModelSyncer for ConcreteModelSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(&DrawCommand) -> P,
{
    fn sync(&self, commands: &[DrawCommand]) {
        // Update existing rows or add new ones
        for (i, command) in commands.iter().enumerate() {
            let item = (self.constructor)(command);
            if i < self.model.row_count() {
                self.model.set_row_data(i, item);
            } else {
                self.model.push(item);
            }
        }
        // Remove excess rows
        while self.model.row_count() > commands.len() {
            self.model.remove(self.model.row_count() - 1);
        }
    }
}

/// Last rendered draw list, optionally mirrored into a Slint model.
pub struct DrawList {
    style: RenderStyle,
    commands: Vec<DrawCommand>,
    syncer: Option<Box<dyn ModelSyncer>>,
}

impl DrawList {
    pub fn new(style: RenderStyle) -> Self {
        Self {
            style,
            commands: Vec::new(),
            syncer: None,
        }
    }

    /// Bind to a Slint model for automatic synchronization.
    ///
    /// After binding, every [`update`](Self::update) rewrites the model rows.
    pub fn bind_model<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&DrawCommand) -> P + 'static,
    {
        let syncer = ConcreteModelSyncer { model, constructor };
        syncer.sync(&self.commands);
        self.syncer = Some(Box::new(syncer));
    }

    /// Re-render `diagram` and sync the bound model, if any.
    pub fn update(&mut self, diagram: &Diagram) {
        self.commands = render(diagram, &self.style);
        if let Some(syncer) = &self.syncer {
            syncer.sync(&self.commands);
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: RenderStyle) {
        self.style = style;
    }
}
