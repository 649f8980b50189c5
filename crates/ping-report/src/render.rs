//! Chart rendering to standalone HTML files.

use std::path::PathBuf;

use askama::Template;
use thiserror::Error;
use tracing::{debug, warn};

use ping_log::LogFile;

use crate::timeline::{LogSummary, PlotMode, Timeline};
use crate::views::ChartView;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub mode: PlotMode,
    pub filter_window: usize,
    pub output_dir: PathBuf,
}

/// A chart written to disk.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub output: PathBuf,
    pub summary: LogSummary,
}

#[derive(Template)]
#[template(path = "timeline.html")]
struct TimelinePage<'a> {
    chart: &'a ChartView,
    source: &'a str,
}

pub fn render_html(chart: &ChartView, source: &str) -> Result<String, RenderError> {
    Ok(TimelinePage { chart, source }.render()?)
}

/// Render one log to `<output_dir>/<stem>.html`. Empty logs yield `None`.
pub fn render_log(log: &LogFile, options: &RenderOptions) -> Result<Option<Rendered>, RenderError> {
    let file = log
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let Some(summary) = LogSummary::from_records(file.clone(), &log.records) else {
        return Ok(None);
    };

    let timeline = Timeline::build(&log.records, options.mode, options.filter_window);
    if timeline.is_empty() {
        warn!(
            file = %file,
            samples = summary.samples,
            filter = options.filter_window,
            "filter window wider than the log, chart will be empty"
        );
    }

    let chart = ChartView::new(&timeline, &summary);
    let html = render_html(&chart, &file)?;

    std::fs::create_dir_all(&options.output_dir).map_err(|source| RenderError::Write {
        path: options.output_dir.clone(),
        source,
    })?;
    let output = options.output_dir.join(format!("{}.html", log.stem()));
    std::fs::write(&output, html).map_err(|source| RenderError::Write {
        path: output.clone(),
        source,
    })?;

    debug!(output = ?output, points = timeline.points.len(), "chart written");
    Ok(Some(Rendered { output, summary }))
}
