mod cleanup_tests;
mod support;
