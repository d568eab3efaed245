//! locus-tui: interactive terminal front-end for locate-style path indexes.

pub mod actions;
pub mod app;
pub mod keymap;
pub mod session;
pub mod state;
pub mod ui;
pub mod worker;

pub use app::run;
pub use keymap::{Keymap, QueryEdit, SessionCommand};
pub use session::{Session, SessionOutcome, SessionSettings};
pub use state::{Mode, SessionState};
pub use worker::{CommandTool, QueryError, QueryRunner, QueryTool};
