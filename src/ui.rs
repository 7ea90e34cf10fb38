use crate::app::App;
use crate::braille::BrailleCanvas;
use crate::view::SceneLayers;
use quake_globe::SeverityTier;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

/// Render the UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Split into globe area and status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Globe
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_globe(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
}

fn render_globe(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Quake Globe ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layers = app.render_layers(inner.width as usize, inner.height as usize);
    frame.render_widget(GlobeWidget { layers }, inner);
}

/// Custom widget that stacks the braille layers, each in its own colour
struct GlobeWidget {
    layers: SceneLayers,
}

fn tier_color(tier: SeverityTier) -> Color {
    let [r, g, b] = tier.color();
    Color::Rgb(r, g, b)
}

fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
    for row in 0..area.height {
        for col in 0..area.width {
            // Empty cells stay transparent so lower layers show through
            if let Some(ch) = canvas.glyph(col as usize, row as usize) {
                buf[(area.x + col, area.y + row)].set_char(ch).set_fg(color);
            }
        }
    }
}

impl Widget for GlobeWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Back to front: grid, coastlines, then markers with the most severe on top
        render_layer(&self.layers.surface, Color::DarkGray, area, buf);
        render_layer(&self.layers.coastlines, Color::Cyan, area, buf);

        let tiers = [SeverityTier::Minor, SeverityTier::Moderate, SeverityTier::Severe];
        for (canvas, tier) in self.layers.markers.iter().zip(tiers) {
            render_layer(canvas, tier_color(tier), area, buf);
        }
    }
}

fn toggle_span(on: bool, on_label: &'static str, off_label: &'static str) -> Span<'static> {
    Span::styled(
        if on { on_label } else { off_label },
        Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
    )
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let settings = &app.renderer.settings;
    let dim = Style::default().fg(Color::DarkGray);

    let status = Line::from(vec![
        Span::styled(" ", dim),
        Span::styled(app.mode_label(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", dim),
        Span::styled(app.date_label(), Style::default().fg(Color::Cyan)),
        Span::styled(
            if app.playback.is_paused() { " (paused)" } else { "" },
            Style::default().fg(Color::Red),
        ),
        Span::styled(" | ", dim),
        Span::styled(
            format!("{} quakes", app.surface.len()),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(" | ", dim),
        Span::styled(app.speed_label(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", dim),
        toggle_span(settings.show_wireframe, "[W]ire ", "[w]ire "),
        toggle_span(settings.show_coastlines, "[C]oast ", "[c]oast "),
        Span::styled(
            "| g:globe/map spc:pause []:speed hjkl:rotate +/-:zoom r:reset q:quit",
            dim,
        ),
    ]);

    let paragraph = Paragraph::new(status);
    frame.render_widget(paragraph, area);
}
