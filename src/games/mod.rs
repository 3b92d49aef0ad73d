//! Concrete rules implementations built on the reference battle snapshot.

pub mod duel;
