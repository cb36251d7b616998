pub mod analysis;
pub mod bar;
pub mod event;
pub mod indicator;
pub mod watchlist;

pub use analysis::*;
pub use bar::*;
pub use event::*;
pub use indicator::*;
pub use watchlist::*;
