//! Rules for specific games.

pub mod g1817;
pub mod ireland;

pub use g1817::G1817Rules;
pub use ireland::IrelandRules;
