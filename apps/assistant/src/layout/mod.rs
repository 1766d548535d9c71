pub mod font_metrics;
pub mod renderer;
