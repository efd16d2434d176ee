//! One-time password ledger.

mod ledger;

#[cfg(test)]
mod tests;

pub use ledger::{IssuedCode, OtpLedger};
