use egui::Color32;

/// Which primitive a tool paints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolKind {
    /// Dragging paints short segments chained through the pointer path.
    Line,
    /// Each press places one fixed-size filled circle.
    Stamp,
}

/// The closed set of drawing tools.
///
/// Each tool carries its own color and size; the table is static and not
/// user-extensible at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    Marker1,
    Marker2,
    Circle,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Marker1, Tool::Marker2, Tool::Circle];

    /// Resolves a tool identifier. Unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<Tool> {
        match key {
            "marker1" => Some(Tool::Marker1),
            "marker2" => Some(Tool::Marker2),
            "circle" => Some(Tool::Circle),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Tool::Marker1 => "marker1",
            Tool::Marker2 => "marker2",
            Tool::Circle => "circle",
        }
    }

    /// Toolbar button text.
    pub fn label(self) -> &'static str {
        match self {
            Tool::Marker1 => "Marker Type 1",
            Tool::Marker2 => "Marker Type 2",
            Tool::Circle => "Draw Circle",
        }
    }

    pub fn kind(self) -> ToolKind {
        match self {
            Tool::Marker1 | Tool::Marker2 => ToolKind::Line,
            Tool::Circle => ToolKind::Stamp,
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            Tool::Marker1 => Color32::RED,
            Tool::Marker2 => Color32::BLUE,
            Tool::Circle => Color32::GREEN,
        }
    }

    /// Stroke width for line tools, circle diameter for the stamp tool.
    pub fn size(self) -> f32 {
        match self {
            Tool::Marker1 => 2.0,
            Tool::Marker2 => 4.0,
            Tool::Circle => 30.0,
        }
    }
}

impl Default for Tool {
    fn default() -> Self {
        Tool::Marker1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_key_resolves_known_tools() {
        assert_eq!(Tool::from_key("marker1"), Some(Tool::Marker1));
        assert_eq!(Tool::from_key("marker2"), Some(Tool::Marker2));
        assert_eq!(Tool::from_key("circle"), Some(Tool::Circle));
    }

    #[test]
    fn from_key_rejects_unknown_keys() {
        assert_eq!(Tool::from_key("eraser"), None);
        assert_eq!(Tool::from_key("Marker1"), None);
        assert_eq!(Tool::from_key(""), None);
    }

    #[test]
    fn keys_round_trip() {
        for tool in Tool::ALL {
            assert_eq!(Tool::from_key(tool.key()), Some(tool));
        }
    }
}
