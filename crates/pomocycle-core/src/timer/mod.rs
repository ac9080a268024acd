mod countdown;
mod cycle;
mod interval;
mod ticker;

pub use countdown::{CountdownEngine, TickResult};
pub use cycle::{next_interval, SessionCycle};
pub use interval::IntervalType;
pub use ticker::{IntervalTicker, TickSource, TickerHandle};
