// Deck assembly: input files, lyrics cleanup, songbook import and the slide planner.

pub mod catalog_import;
pub mod lyrics;
pub mod planner;
pub mod worklist;

pub use planner::{default_slide_layout, BackgroundCycle, Deck, DeckPlanner};
pub use worklist::{Catalog, Worklist};
