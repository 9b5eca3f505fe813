//! Unit tests for the reminder context.
