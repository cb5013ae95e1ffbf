use crate::game::oracle::LegalityOracle;
use crate::game::utils::color_to_string;
use crate::models::config::PromptTemplates;

/// Picks and fills the prompt for the model's next move
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    templates: PromptTemplates,
}

impl PromptBuilder {
    pub fn new(templates: PromptTemplates) -> Self {
        PromptBuilder { templates }
    }

    pub fn build<O: LegalityOracle>(&self, board: &O, failures: u32) -> String {
        if board.is_starting_position() {
            return self.templates.start.clone();
        }

        let side = color_to_string(board.side_to_move());
        let movetext = board.render_movetext();

        if failures == 0 {
            fill(&self.templates.normal, &side, &movetext, "")
        } else {
            let legal = board
                .legal_moves()
                .into_iter()
                .map(|mv| board.san(mv))
                .collect::<Vec<_>>()
                .join(", ");
            fill(&self.templates.failed, &side, &movetext, &legal)
        }
    }
}

fn fill(template: &str, side: &str, movetext: &str, legal: &str) -> String {
    template
        .replace("{side}", side)
        .replace("{legal}", legal)
        .replace("{movetext}", movetext)
}
