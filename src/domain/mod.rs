pub mod coin;
pub mod effects;
pub mod ingredient;
pub mod object;

pub use coin::*;
pub use effects::*;
pub use ingredient::*;
pub use object::*;
