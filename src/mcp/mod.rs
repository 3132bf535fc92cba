pub mod server;
pub mod stdio;
pub mod tools;

pub use server::TandoorMcp;
pub use stdio::serve_stdio;
