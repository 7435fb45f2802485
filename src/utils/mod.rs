//! Small helpers shared by the panels

pub mod string;
