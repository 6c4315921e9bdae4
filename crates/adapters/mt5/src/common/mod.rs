pub mod credential;
pub mod enums;
pub mod models;
pub mod parse;
pub mod testing;
pub mod urls;

pub use credential::*;
pub use enums::*;
pub use models::*;
pub use parse::*;
pub use urls::*;
