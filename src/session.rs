//! Session state: the active tool, the annotation log, the stroke state
//! machine and the background slot. Everything the canvas paints comes from
//! here, so repainting the log reproduces the surface exactly.

use std::path::Path;

use egui::Color32;

use crate::background::{Background, BackgroundError, SURFACE_HEIGHT, SURFACE_WIDTH};
use crate::tools::{Tool, ToolKind};

/// One recorded draw operation, in surface-local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Annotation {
    /// A single stroke segment. `end` is absent for a press that never moved;
    /// such a record paints nothing on replay.
    Line {
        x1: f32,
        y1: f32,
        end: Option<(f32, f32)>,
        color: Color32,
        width: f32,
    },
    /// Bounding box of a filled circle centered on the click point.
    Stamp {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Color32,
        size: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum StrokeState {
    Idle,
    Stroking { anchor: (f32, f32) },
}

pub struct Session {
    active_tool: Tool,
    log: Vec<Annotation>,
    stroke: StrokeState,
    background: Option<Background>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            active_tool: Tool::default(),
            log: Vec::new(),
            stroke: StrokeState::Idle,
            background: None,
        }
    }

    pub fn active_tool(&self) -> Tool {
        self.active_tool
    }

    /// Annotations in recorded order; later entries paint over earlier ones.
    pub fn annotations(&self) -> &[Annotation] {
        &self.log
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    pub fn select_tool(&mut self, tool: Tool) {
        self.active_tool = tool;
        log::info!("selected tool: {}", tool.key());
    }

    /// String-keyed selection for boundaries where keys arrive as text.
    /// Unknown keys leave the active tool unchanged.
    pub fn select_tool_key(&mut self, key: &str) {
        match Tool::from_key(key) {
            Some(tool) => self.select_tool(tool),
            None => log::debug!("ignoring unknown tool key {key:?}"),
        }
    }

    /// Primary-button press. Line tools open a stroke; the stamp tool places
    /// one circle and keeps no state between presses.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        let tool = self.active_tool;
        match tool.kind() {
            ToolKind::Stamp => self.place_stamp(x, y, tool),
            ToolKind::Line => {
                self.log.push(Annotation::Line {
                    x1: x,
                    y1: y,
                    end: None,
                    color: tool.color(),
                    width: tool.size(),
                });
                self.stroke = StrokeState::Stroking { anchor: (x, y) };
            }
        }
    }

    /// Primary-button drag. Commits one segment per move event, anchor to the
    /// new position, so replay redraws the stroke as its constituent
    /// segments. A drag while idle (or with the stamp tool) does nothing.
    pub fn pointer_drag(&mut self, x: f32, y: f32) {
        if self.active_tool.kind() != ToolKind::Line {
            return;
        }
        let StrokeState::Stroking { anchor } = self.stroke else {
            return;
        };

        // The first move of a stroke completes the record opened on press;
        // every later move commits a fresh segment.
        let completed_open = match self.log.last_mut() {
            Some(Annotation::Line { end: end @ None, .. }) => {
                *end = Some((x, y));
                true
            }
            _ => false,
        };
        if !completed_open {
            self.log.push(Annotation::Line {
                x1: anchor.0,
                y1: anchor.1,
                end: Some((x, y)),
                color: self.active_tool.color(),
                width: self.active_tool.size(),
            });
        }
        self.stroke = StrokeState::Stroking { anchor: (x, y) };
    }

    /// Primary-button release. Returns the state machine to idle; the log is
    /// untouched, line segments are self-contained.
    pub fn pointer_up(&mut self) {
        self.stroke = StrokeState::Idle;
    }

    fn place_stamp(&mut self, x: f32, y: f32, tool: Tool) {
        let half = tool.size() / 2.0;
        self.log.push(Annotation::Stamp {
            x1: x - half,
            y1: y - half,
            x2: x + half,
            y2: y + half,
            color: tool.color(),
            size: tool.size(),
        });
    }

    /// Erases everything: the annotation log, the stroke state and the
    /// displayed background. No confirmation, no undo.
    pub fn clear(&mut self) {
        self.log.clear();
        self.stroke = StrokeState::Idle;
        self.background = None;
    }

    /// Replaces the background wholesale on success. The annotation log is
    /// NOT cleared: prior annotations replay over the new image. On failure
    /// the session is left exactly as it was.
    pub fn load_background(&mut self, path: &Path) -> Result<(), BackgroundError> {
        let bg = Background::load(path, SURFACE_WIDTH, SURFACE_HEIGHT)?;
        log::info!(
            "loaded background {} ({}x{})",
            path.display(),
            bg.width,
            bg.height
        );
        self.background = Some(bg);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_session() -> Session {
        let mut session = Session::new();
        session.select_tool(Tool::Marker1);
        session
    }

    #[test]
    fn default_tool_is_the_first_marker() {
        assert_eq!(Session::new().active_tool(), Tool::Marker1);
    }

    #[test]
    fn unknown_tool_key_leaves_active_tool_unchanged() {
        let mut session = Session::new();
        session.select_tool(Tool::Marker2);
        session.select_tool_key("spraycan");
        assert_eq!(session.active_tool(), Tool::Marker2);
    }

    #[test]
    fn known_tool_key_selects_the_tool() {
        let mut session = Session::new();
        session.select_tool_key("circle");
        assert_eq!(session.active_tool(), Tool::Circle);
    }

    #[test]
    fn press_opens_a_stroke_with_no_end_point() {
        let mut session = line_session();
        session.pointer_down(10.0, 20.0);
        assert_eq!(
            session.annotations(),
            &[Annotation::Line {
                x1: 10.0,
                y1: 20.0,
                end: None,
                color: Color32::RED,
                width: 2.0,
            }]
        );
    }

    #[test]
    fn drag_commits_one_segment_per_move_event() {
        let mut session = line_session();
        session.pointer_down(0.0, 0.0);
        session.pointer_drag(3.0, 4.0);
        session.pointer_drag(6.0, 8.0);
        session.pointer_drag(9.0, 12.0);

        let log = session.annotations();
        assert_eq!(log.len(), 3);
        assert_eq!(
            log[0],
            Annotation::Line {
                x1: 0.0,
                y1: 0.0,
                end: Some((3.0, 4.0)),
                color: Color32::RED,
                width: 2.0,
            }
        );
        assert_eq!(
            log[1],
            Annotation::Line {
                x1: 3.0,
                y1: 4.0,
                end: Some((6.0, 8.0)),
                color: Color32::RED,
                width: 2.0,
            }
        );
        assert_eq!(
            log[2],
            Annotation::Line {
                x1: 6.0,
                y1: 8.0,
                end: Some((9.0, 12.0)),
                color: Color32::RED,
                width: 2.0,
            }
        );
    }

    #[test]
    fn replay_reproduces_every_live_segment() {
        let mut session = line_session();
        let stroke = [(0.0, 0.0), (2.0, 1.0), (4.0, 3.0), (8.0, 3.5)];
        session.pointer_down(stroke[0].0, stroke[0].1);
        for &(x, y) in &stroke[1..] {
            session.pointer_drag(x, y);
        }
        session.pointer_up();
        session.pointer_down(10.0, 10.0);
        session.pointer_drag(11.0, 12.0);

        let committed: Vec<_> = session
            .annotations()
            .iter()
            .filter_map(|ann| match *ann {
                Annotation::Line {
                    x1,
                    y1,
                    end: Some(end),
                    ..
                } => Some(((x1, y1), end)),
                _ => None,
            })
            .collect();

        let expected = vec![
            ((0.0, 0.0), (2.0, 1.0)),
            ((2.0, 1.0), (4.0, 3.0)),
            ((4.0, 3.0), (8.0, 3.5)),
            ((10.0, 10.0), (11.0, 12.0)),
        ];
        assert_eq!(committed, expected);
    }

    #[test]
    fn drag_while_idle_is_a_no_op() {
        let mut session = line_session();
        session.pointer_drag(5.0, 5.0);
        assert!(session.annotations().is_empty());

        // A press that was released leaves its open record, and a later drag
        // without a new press must not complete it.
        session.pointer_down(1.0, 1.0);
        session.pointer_up();
        session.pointer_drag(5.0, 5.0);
        assert_eq!(
            session.annotations(),
            &[Annotation::Line {
                x1: 1.0,
                y1: 1.0,
                end: None,
                color: Color32::RED,
                width: 2.0,
            }]
        );
    }

    #[test]
    fn stamp_box_is_exactly_size_by_size_centered() {
        let mut session = Session::new();
        session.select_tool(Tool::Circle);
        session.pointer_down(100.0, 40.0);
        session.pointer_down(-12.0, -7.5);

        let log = session.annotations();
        assert_eq!(
            log[0],
            Annotation::Stamp {
                x1: 85.0,
                y1: 25.0,
                x2: 115.0,
                y2: 55.0,
                color: Color32::GREEN,
                size: 30.0,
            }
        );
        // Off-surface points are recorded without clamping.
        assert_eq!(
            log[1],
            Annotation::Stamp {
                x1: -27.0,
                y1: -22.5,
                x2: 3.0,
                y2: 7.5,
                color: Color32::GREEN,
                size: 30.0,
            }
        );
    }

    #[test]
    fn stamp_tool_ignores_drag() {
        let mut session = Session::new();
        session.select_tool(Tool::Circle);
        session.pointer_down(10.0, 10.0);
        session.pointer_drag(50.0, 50.0);
        assert_eq!(session.annotations().len(), 1);
    }

    #[test]
    fn clear_empties_log_and_background() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        image::RgbaImage::new(8, 8).save(&path).unwrap();

        let mut session = line_session();
        session.pointer_down(0.0, 0.0);
        session.pointer_drag(5.0, 5.0);
        session.load_background(&path).unwrap();
        assert!(session.background().is_some());

        session.clear();
        assert!(session.annotations().is_empty());
        assert!(session.background().is_none());
    }

    #[test]
    fn failed_load_leaves_session_untouched() {
        let mut session = line_session();
        session.pointer_down(1.0, 1.0);
        session.pointer_drag(2.0, 2.0);
        let before = session.annotations().to_vec();

        let result = session.load_background(Path::new("/definitely/not/here.png"));
        assert!(result.is_err());
        assert_eq!(session.annotations(), before.as_slice());
        assert!(session.background().is_none());
    }

    #[test]
    fn load_keeps_annotation_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        image::RgbaImage::new(16, 10).save(&path).unwrap();

        let mut session = line_session();
        session.pointer_down(0.0, 0.0);
        session.pointer_drag(5.0, 5.0);

        session.load_background(&path).unwrap();
        // Annotations persist across reloads and replay over the new image.
        assert_eq!(session.annotations().len(), 1);
        let bg = session.background().unwrap();
        assert_eq!((bg.width, bg.height), (16, 10));

        session.load_background(&path).unwrap();
        assert_eq!(session.annotations().len(), 1);
    }
}
