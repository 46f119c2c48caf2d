pub mod fs;
pub mod jsonc;
