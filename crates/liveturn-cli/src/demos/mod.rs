//! One module per subcommand.

pub mod audio;
pub mod canvas;
pub mod chat;
pub mod lights;

mod prompt;

#[cfg(test)]
mod testing;
