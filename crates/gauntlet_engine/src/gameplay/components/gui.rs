//! Immediate-mode GUI components
//!
//! GUI components emit draw commands into a per-frame list during the
//! scene's `render_gui` pass; the render collaborator consumes the list
//! and owns batching, fonts, and rasterization.

use serde::{Deserialize, Serialize};

use crate::assets::cache::AssetHandle;
use crate::assets::types::Texture2D;
use crate::foundation::math::{Vec2, Vec4};
use crate::gameplay::component::{Component, GameObjectRef};

/// Screen-space rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuiRect {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl GuiRect {
    /// Rectangle from a top-left corner and a size
    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self {
            min: position,
            max: position + size,
        }
    }

    /// Width and height
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Screen-space placement for GUI siblings on the same object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectTransform {
    /// Top-left corner in pixels
    pub position: Vec2,
    /// Size in pixels
    pub size: Vec2,
}

impl Default for RectTransform {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            size: Vec2::new(100.0, 100.0),
        }
    }
}

impl RectTransform {
    /// The rectangle this transform describes
    pub fn rect(&self) -> GuiRect {
        GuiRect::from_position_size(self.position, self.size)
    }
}

impl Component for RectTransform {}

/// One emitted GUI primitive
#[derive(Debug, Clone, PartialEq)]
pub enum GuiDrawCommand {
    /// Filled, optionally textured rectangle
    Panel {
        /// Target rectangle
        rect: GuiRect,
        /// Fill color (RGBA)
        color: Vec4,
        /// Optional texture, stretched over the rectangle
        texture: Option<AssetHandle<Texture2D>>,
    },
    /// Text run laid out inside a rectangle
    Text {
        /// Layout rectangle
        rect: GuiRect,
        /// Text to lay out
        text: String,
        /// Fill color (RGBA)
        color: Vec4,
    },
}

/// Per-frame list of GUI primitives, in emission order
#[derive(Debug, Default)]
pub struct GuiDrawList {
    commands: Vec<GuiDrawCommand>,
}

impl GuiDrawList {
    /// Empty list for a new frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command
    pub fn push(&mut self, command: GuiDrawCommand) {
        self.commands.push(command);
    }

    /// Emitted commands in emission order
    pub fn commands(&self) -> &[GuiDrawCommand] {
        &self.commands
    }

    /// Number of emitted commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing was emitted
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn owner_rect(owner: &GameObjectRef) -> GuiRect {
    owner
        .upgrade()
        .and_then(|object| object.get_component::<RectTransform>())
        .map(|rect| rect.read().unwrap().rect())
        .unwrap_or(GuiRect {
            min: Vec2::zeros(),
            max: Vec2::zeros(),
        })
}

/// Filled background panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuiPanel {
    /// Fill color (RGBA)
    pub color: Vec4,
    /// Optional texture, stretched over the panel
    pub texture: Option<AssetHandle<Texture2D>>,
}

impl Default for GuiPanel {
    fn default() -> Self {
        Self {
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            texture: None,
        }
    }
}

impl Component for GuiPanel {
    fn render_gui(&mut self, owner: &GameObjectRef, out: &mut GuiDrawList) {
        out.push(GuiDrawCommand::Panel {
            rect: owner_rect(owner),
            color: self.color,
            texture: self.texture.clone(),
        });
    }
}

/// Text label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuiText {
    /// Text to display
    pub text: String,
    /// Fill color (RGBA)
    pub color: Vec4,
}

impl GuiText {
    /// Label with the default white fill
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

impl Component for GuiText {
    fn render_gui(&mut self, owner: &GameObjectRef, out: &mut GuiDrawList) {
        out.push(GuiDrawCommand::Text {
            rect: owner_rect(owner),
            text: self.text.clone(),
            color: self.color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Weak;

    #[test]
    fn test_rect_from_position_size() {
        let rect = GuiRect::from_position_size(Vec2::new(10.0, 20.0), Vec2::new(256.0, 128.0));
        assert_eq!(rect.max, Vec2::new(266.0, 148.0));
        assert_eq!(rect.size(), Vec2::new(256.0, 128.0));
    }

    #[test]
    fn test_panel_emits_one_command() {
        let mut panel = GuiPanel::default();
        let mut list = GuiDrawList::new();
        panel.render_gui(&Weak::new(), &mut list);

        assert_eq!(list.len(), 1);
        assert!(matches!(list.commands()[0], GuiDrawCommand::Panel { .. }));
    }

    #[test]
    fn test_text_carries_content() {
        let mut text = GuiText::new("Press E");
        let mut list = GuiDrawList::new();
        text.render_gui(&Weak::new(), &mut list);

        assert!(matches!(
            &list.commands()[0],
            GuiDrawCommand::Text { text, .. } if text == "Press E"
        ));
    }
}
