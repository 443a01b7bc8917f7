//! Unit test suite for promise_runtime
