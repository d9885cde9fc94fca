pub use minimize::MinimizedDfa;
pub use model::Dfa;

mod minimize;
mod model;
mod sim;
mod subset;
