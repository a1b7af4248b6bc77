mod dest;
mod token;

pub use dest::Destination;
pub use token::{FileTokenSource, StaticTokenSource, TokenSource};
