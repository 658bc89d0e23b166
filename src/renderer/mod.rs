//! Rendering module
//!
//! `shapes` builds a backend-independent display list; `canvas` draws it
//! with the browser's 2D context.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use shapes::{DrawCmd, display_list};

/// Text for the score display
pub fn score_text(score: u64) -> String {
    format!("Score: {}", score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_text() {
        assert_eq!(score_text(0), "Score: 0");
        assert_eq!(score_text(1240), "Score: 1240");
    }
}
