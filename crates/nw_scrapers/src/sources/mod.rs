pub mod newsapi;

pub use newsapi::NewsApiSource;
