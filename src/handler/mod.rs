pub mod webhook;

#[cfg(test)]
mod tests;

pub use webhook::router;
