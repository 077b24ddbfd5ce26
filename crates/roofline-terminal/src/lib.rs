//! Terminal rendering for roofline diagrams.
//!
//! A [`RooflinePlot`] draws one [`roofline_core::Diagram`] on log-log axes
//! into a [`CellBuffer`]: ceiling lines as braille dots, loops as markers
//! coloured by self time, plus title, ticks, annotations and a colorbar.
//! [`TerminalWriter`] streams the buffer out through crossterm in the
//! detected [`ColorMode`].
//!
//! ```
//! use roofline_core::{Cohort, Diagram};
//! use roofline_terminal::{ColorMode, PlotStyle, RooflinePlot, TerminalWriter};
//!
//! let diagram = Diagram {
//!     cohort: Cohort::Scalar,
//!     points: vec![],
//!     memory_lines: vec![],
//!     compute_lines: vec![],
//!     memory_domain_max: 1.0,
//! };
//! let style = PlotStyle::scalar();
//! let buffer = RooflinePlot::new(&diagram, &style).render(60, 16).unwrap();
//!
//! let mut writer = TerminalWriter::new(Vec::new(), ColorMode::Mono);
//! writer.write_buffer(&buffer).unwrap();
//! let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
//! assert!(text.starts_with(' '));
//! assert!(text.contains("Roofline for Scalar loops"));
//! ```

mod buffer;
mod color;
mod error;
mod plot;
mod scale;
mod style;
mod theme;
mod writer;

pub use buffer::{Cell, CellBuffer};
pub use color::{Color, ColorMode, ColorParseError};
pub use error::RenderError;
pub use plot::{format_weight, RooflinePlot, MIN_HEIGHT, MIN_WIDTH, POINT_MARKER};
pub use scale::{format_tick, LogScale};
pub use style::{Annotation, PlotConfig, PlotStyle};
pub use theme::{Gradient, Theme};
pub use writer::TerminalWriter;
