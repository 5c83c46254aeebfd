mod support;

pub(crate) use support::*;

mod decoupling_tests;
mod equivalence_tests;
mod observer_order_tests;
mod runtime_tests;
