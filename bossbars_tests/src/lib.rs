/*! # Bossbars Tests

Integration scenarios for the bossbars crates, driven by a [`Stepper`](stepper::Stepper)
that advances a registry frame by frame.
*/

#[cfg(test)]
mod scenarios;
pub mod stepper;
