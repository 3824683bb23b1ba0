pub mod colony;
pub mod construction;
pub mod convergence;
pub mod driver;
pub mod pheromone;

pub use colony::*;
pub use construction::*;
pub use convergence::*;
pub use pheromone::*;
