use crate::output::Message;
use crate::output::Message::Error;
use crate::ui::{BoardView, Graphics};

/// Shows nothing, only errors still get through.
#[derive(Debug, Default)]
pub struct NoGraphics {}

impl Graphics for NoGraphics {
    fn as_string(&self, _: &BoardView) -> String {
        String::new()
    }

    fn show(&mut self, _: &BoardView) {
        // do nothing
    }

    fn display_message(&mut self, typ: Message, message: &str) {
        if typ == Error {
            crate::output::display_message(typ, message);
        }
    }
}
