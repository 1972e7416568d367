mod cache;
mod pipeline;
mod properties;
