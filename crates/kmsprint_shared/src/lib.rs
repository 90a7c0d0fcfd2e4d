mod args;

pub use args::DumpArgs;
