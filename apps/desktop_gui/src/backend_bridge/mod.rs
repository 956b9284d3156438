//! Backend bridge: command types and the worker thread that runs the workflow.

pub mod commands;
pub mod runtime;
