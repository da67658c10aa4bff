pub mod cards;
pub mod games;

pub use cards::{CardService, PageQuery};
pub use games::GameService;
