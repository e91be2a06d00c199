pub mod markdown;
pub mod terminal;

pub use markdown::{to_html, transcript_to_html};
pub use terminal::TerminalView;
