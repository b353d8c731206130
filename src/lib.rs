pub mod api;
pub mod config;
pub mod markup;
pub mod state;
#[cfg(test)]
pub mod test_support;
pub mod types;
pub mod util;
