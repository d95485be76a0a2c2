use std::fmt::Debug;
use std::thread;
use std::thread::JoinHandle;

use anyhow::{anyhow, Context};
use crossbeam_channel::{bounded, unbounded, Sender};

use crate::games::chess::moves::ChessMove;
use crate::games::chess::Chessboard;
use crate::general::common::Res;
use crate::output;
use crate::output::Message;

pub mod no_graphic;
pub mod pretty;
pub mod text_ui;

/// Everything a [`Graphics`] gets to see: a copy of the board, never the board itself.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct BoardView {
    pub board: Chessboard,
    pub last_move: Option<ChessMove>,
    pub ply: usize,
}

pub trait Graphics: Debug + Send + 'static {
    fn as_string(&self, view: &BoardView) -> String;

    fn show(&mut self, view: &BoardView) {
        print!("{}", self.as_string(view));
    }

    fn display_message(&mut self, typ: Message, message: &str) {
        output::display_message(typ, message);
    }
}

pub type AnyGraphics = Box<dyn Graphics>;

enum Request {
    Show(BoardView, Sender<()>),
    Message(Message, String),
}

/// Handle to the thread that owns the [`Graphics`].
///
/// Dropping the handle closes the request channel, which ends the thread, and then joins it.
#[derive(Debug)]
pub struct Presentation {
    requests: Option<Sender<Request>>,
    thread: Option<JoinHandle<()>>,
}

impl Presentation {
    pub fn spawn(mut graphics: AnyGraphics) -> Res<Self> {
        let (sender, receiver) = unbounded::<Request>();
        let thread = thread::Builder::new()
            .name("presentation".to_string())
            .spawn(move || {
                for request in receiver {
                    match request {
                        Request::Show(view, ack) => {
                            graphics.show(&view);
                            // the orchestrator might have given up waiting, that's fine
                            _ = ack.send(());
                        }
                        Request::Message(typ, message) => graphics.display_message(typ, &message),
                    }
                }
            })
            .context("Couldn't start the presentation thread")?;
        Ok(Self {
            requests: Some(sender),
            thread: Some(thread),
        })
    }

    fn send(&self, request: Request) -> Res<()> {
        self.requests
            .as_ref()
            .ok_or_else(|| anyhow!("The presentation has already been shut down"))?
            .send(request)
            .map_err(|_| anyhow!("The presentation thread has stopped"))
    }

    /// Posts the view and blocks until the presentation thread has shown it.
    pub fn show_and_wait(&self, view: BoardView) -> Res<()> {
        let (ack_sender, ack_receiver) = bounded(0);
        self.send(Request::Show(view, ack_sender))?;
        ack_receiver
            .recv()
            .map_err(|_| anyhow!("The presentation thread stopped before showing ply {}", view.ply))
    }

    /// Doesn't wait for the message to be displayed.
    pub fn display_message(&self, typ: Message, message: &str) -> Res<()> {
        self.send(Request::Message(typ, message.to_string()))
    }
}

impl Drop for Presentation {
    fn drop(&mut self) {
        drop(self.requests.take());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                output::display_message(Message::Error, "The presentation thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::{Arc, Mutex};

    use crate::games::chess::moves::ChessMove;
    use crate::games::chess::Chessboard;
    use crate::output::Message;
    use crate::ui::{BoardView, Graphics, Presentation};

    #[derive(Debug, Default)]
    struct Recorder {
        shown: Arc<Mutex<Vec<String>>>,
        messages: Arc<Mutex<Vec<String>>>,
    }

    impl Graphics for Recorder {
        fn as_string(&self, view: &BoardView) -> String {
            format!(
                "{0}:{1}",
                view.ply,
                view.last_move.map_or("-".to_string(), |m| m.to_string())
            )
        }

        fn show(&mut self, view: &BoardView) {
            let text = self.as_string(view);
            self.shown.lock().unwrap().push(text);
        }

        fn display_message(&mut self, _: Message, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    #[derive(Debug)]
    struct Broken;

    impl Graphics for Broken {
        fn as_string(&self, _: &BoardView) -> String {
            panic!("can't render anything")
        }
    }

    #[test]
    fn rendezvous_test() {
        let recorder = Recorder::default();
        let shown = recorder.shown.clone();
        let messages = recorder.messages.clone();
        let presentation = Presentation::spawn(Box::new(recorder)).unwrap();
        let mut board = Chessboard::default();
        presentation.show_and_wait(BoardView::default()).unwrap();
        assert_eq!(*shown.lock().unwrap(), vec!["0:-".to_string()]);
        for (ply, token) in ["e2e4", "e7e5"].into_iter().enumerate() {
            let mov = ChessMove::from_str(token).unwrap();
            board.apply(mov).unwrap();
            let view = BoardView {
                board,
                last_move: Some(mov),
                ply: ply + 1,
            };
            presentation.show_and_wait(view).unwrap();
            // the view has been shown as soon as `show_and_wait` returns
            assert_eq!(shown.lock().unwrap().last().unwrap(), &format!("{}:{token}", ply + 1));
        }
        presentation
            .display_message(Message::Info, "game over")
            .unwrap();
        drop(presentation);
        assert_eq!(shown.lock().unwrap().len(), 3);
        assert_eq!(*messages.lock().unwrap(), vec!["game over".to_string()]);
    }

    #[test]
    fn dead_presentation_test() {
        let presentation = Presentation::spawn(Box::new(Broken)).unwrap();
        assert!(presentation.show_and_wait(BoardView::default()).is_err());
        assert!(presentation.show_and_wait(BoardView::default()).is_err());
    }
}
