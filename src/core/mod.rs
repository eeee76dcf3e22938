//! Core onboarding logic.
//!
//! This module contains the gate state types, the tutorial walkthrough, and
//! the sequencer that moves a session through language selection,
//! permissions and the tutorial.

pub mod sequencer;
pub mod state;
pub mod tutorial;

pub use sequencer::{initial_gate, Sequencer};
pub use state::{
    ActiveGate, EventType, GateFlag, GateFlags, SequencerSnapshot, TraceEvent, TutorialAction,
};
pub use tutorial::{
    default_steps, ArrowDirection, Progress, StepPosition, TutorialStep, Walkthrough,
};
