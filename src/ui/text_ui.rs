use strum_macros::{EnumIter, EnumString};

use crate::ui::{BoardView, Graphics};

#[derive(Default, Debug, Copy, Clone, Eq, PartialEq, EnumIter, EnumString, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum DisplayType {
    #[default]
    Unicode,
    Ascii,
    /// ASCII with row and column indices, useful to check raw coordinates.
    Indices,
    /// Only the token of the last move, one per line.
    Uci,
}

#[derive(Debug, Default)]
pub struct TextUI {
    typ: DisplayType,
}

impl TextUI {
    pub fn new(typ: DisplayType) -> Self {
        Self { typ }
    }
}

impl Graphics for TextUI {
    fn as_string(&self, view: &BoardView) -> String {
        let diagram = match self.typ {
            DisplayType::Uci => {
                return view
                    .last_move
                    .map_or(String::new(), |mov| format!("{mov}\n"));
            }
            DisplayType::Unicode => view.board.as_unicode_diagram(),
            DisplayType::Ascii => view.board.render(),
            DisplayType::Indices => view.board.render_with_indices(),
        };
        let header = match view.last_move {
            None => "Starting new game!".to_string(),
            Some(mov) => format!(
                "Ply {0}: {1} played {mov}",
                view.ply,
                view.board.active_player()
            ),
        };
        format!("{header}\n{diagram}\n")
    }
}
