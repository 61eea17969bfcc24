// UI module - split into cohesive submodules for maintainability
pub mod formatting;
pub mod theme;

mod feed;
mod modals;

// Re-export main render function
pub use self::render_main::render;

// Main render logic
mod render_main {
    use ratatui::{
        layout::Alignment,
        style::{Modifier, Style},
        text::{Line, Span},
        widgets::{Block, Borders, Clear, Paragraph},
        Frame,
    };

    use super::feed::render_feed;
    use super::modals::render_comment_modal;
    use super::theme::{detect_color_scheme, theme_for};
    use crate::app::App;

    /// Render the UI
    pub fn render(app: &mut App, frame: &mut Frame) {
        let area = frame.area();

        let theme = theme_for(detect_color_scheme());

        frame.render_widget(Clear, area);

        let background = Block::default().style(Style::default().bg(theme.container_bg));
        frame.render_widget(background, area);

        const MIN_WIDTH: u16 = 60;
        const MIN_HEIGHT: u16 = 20;

        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            let warning = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Terminal Too Small",
                    Style::default()
                        .fg(theme.text)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    format!("Minimum size: {}x{}", MIN_WIDTH, MIN_HEIGHT),
                    Style::default().fg(theme.text),
                )),
                Line::from(Span::styled(
                    format!("Current size: {}x{}", area.width, area.height),
                    Style::default().fg(theme.border),
                )),
            ])
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border)),
            );

            frame.render_widget(warning, area);
            return;
        }

        if app.feed.loading {
            // The screen stays here until a load commits; failed loads
            // never leave it
            let loading = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Loading feed…",
                    Style::default()
                        .fg(theme.text)
                        .add_modifier(Modifier::BOLD),
                )),
            ])
            .alignment(Alignment::Center);
            frame.render_widget(loading, area);
            return;
        }

        render_feed(frame, app, &theme, area);

        if app.composer.is_open() {
            render_comment_modal(frame, app, &theme, area);
        }
    }
}
