//! Some strategies for use with `guessing_rs`.
//!
//! Each strategy consists of a struct implementing
//! [`Strategy`](guessing_rs::Strategy) and a guesser type holding the state
//! of one game. Everything you need to configure the strategy should exist
//! as a method.

mod random;
pub use random::{Random, RandomGuesser};

mod sequential;
pub use sequential::{Sequential, SequentialGuesser};

mod signed;
pub use signed::{SignedSequential, SignedSequentialGuesser};
