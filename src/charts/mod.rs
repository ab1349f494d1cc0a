//! Charts module - chart registry and rendering

mod plotter;
mod renderer;

pub use plotter::{PlotError, PlotKind, PlotEntry, Plotter, RenderFn, PLOT_REGISTRY};
pub use renderer::{
    draw_corner_bars, draw_floor_ceiling_scatter, draw_histogram, ChartCanvas, RenderError,
    CEILING_GREATER_LABEL, FLOOR_GREATER_LABEL,
};
