//! Unit tests for the sync bounded context.

mod support;
