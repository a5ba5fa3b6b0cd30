pub mod validation;
pub mod distribution;
pub mod investor_accounts;
pub mod initialize_honorary_position;
pub mod crank_distribute_page;

pub use validation::*;
pub use distribution::*;
pub use investor_accounts::*;
pub use initialize_honorary_position::*;
pub use crank_distribute_page::*;
