pub mod chrome_session;
pub mod scripted;
pub mod ui_driver;

pub use chrome_session::{ChromeDriver, ChromeSession};
pub use scripted::{Action, Script, ScriptedDriver, ScriptedSession};
pub use ui_driver::{SessionFactory, UiSession};
