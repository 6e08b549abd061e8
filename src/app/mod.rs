mod state;

pub use state::{App, DialogState, EditorHit, Focus};
