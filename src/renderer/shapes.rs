//! Display list generation
//!
//! Turns a `GameState` into a flat list of draw commands. Backends only
//! replay the list, so everything drawn can be checked without a canvas.

use glam::Vec2;

use crate::sim::{Fruit, GameState};

/// Label font
pub const LABEL_FONT_FAMILY: &str = "Arial";
/// Label ink
pub const LABEL_COLOR: &str = "black";

/// One draw command in field units
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Wipe the whole field
    Clear { width: f32, height: f32 },
    /// Filled circle
    Circle {
        center: Vec2,
        radius: f32,
        color: &'static str,
    },
    /// Text centered on `center`
    Label {
        center: Vec2,
        text: &'static str,
        font_px: f32,
        color: &'static str,
    },
}

/// Circle and label for one fruit
pub fn fruit(fruit: &Fruit) -> [DrawCmd; 2] {
    let kind = fruit.kind();
    [
        DrawCmd::Circle {
            center: fruit.pos,
            radius: kind.radius,
            color: kind.color.as_css(),
        },
        DrawCmd::Label {
            center: fruit.pos,
            text: kind.label,
            font_px: kind.radius / 2.0,
            color: LABEL_COLOR,
        },
    ]
}

/// Full frame: clear, then every fruit in spawn order
pub fn display_list(state: &GameState) -> Vec<DrawCmd> {
    let mut cmds = Vec::with_capacity(1 + state.fruits.len() * 2);
    cmds.push(DrawCmd::Clear {
        width: state.tuning.field_width,
        height: state.tuning.field_height,
    });
    for f in &state.fruits {
        cmds.extend(fruit(f));
    }
    cmds
}

/// CSS font shorthand for a label
pub fn label_font(font_px: f32) -> String {
    format!("{}px {}", font_px, LABEL_FONT_FAMILY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::{spawn_fruit, start};
    use crate::tuning::Tuning;

    #[test]
    fn test_display_list_draws_each_fruit() {
        let mut state = GameState::new(9, Tuning::default());
        start(&mut state);
        spawn_fruit(&mut state, 300.0, 4).unwrap();

        let cmds = display_list(&state);
        assert_eq!(cmds.len(), 3);
        assert_eq!(
            cmds[0],
            DrawCmd::Clear {
                width: 800.0,
                height: 1200.0
            }
        );
        assert_eq!(
            cmds[1],
            DrawCmd::Circle {
                center: Vec2::new(300.0, 0.0),
                radius: 80.0,
                color: "blue"
            }
        );
        assert_eq!(
            cmds[2],
            DrawCmd::Label {
                center: Vec2::new(300.0, 0.0),
                text: "F5.6",
                font_px: 40.0,
                color: "black"
            }
        );
    }

    #[test]
    fn test_empty_field_only_clears() {
        let state = GameState::new(9, Tuning::default());
        assert_eq!(display_list(&state).len(), 1);
        assert_eq!(label_font(27.5), "27.5px Arial");
    }
}
