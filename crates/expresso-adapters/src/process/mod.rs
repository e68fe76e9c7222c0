//! Process runner adapters.

mod local;
mod scripted;

pub use local::LocalProcessRunner;
pub use scripted::{Invocation, ScriptedProcessRunner};
