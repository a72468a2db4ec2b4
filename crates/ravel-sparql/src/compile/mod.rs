mod compiler;

#[cfg(test)]
mod compiler_tests;

pub use compiler::QueryCompiler;
