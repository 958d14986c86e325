//! Command implementations

pub mod classify;

pub mod doctor;

pub mod run;
