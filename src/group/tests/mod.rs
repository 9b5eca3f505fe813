//! Unit tests for the group context.
