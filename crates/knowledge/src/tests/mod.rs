//! Scenario tests for retrieval ranking and the response pipeline.

mod support;
