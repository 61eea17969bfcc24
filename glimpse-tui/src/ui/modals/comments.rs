use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use super::super::formatting::{commenter_label, relative_time};
use super::super::theme::ThemeBundle;
use super::utils::centered_rect;
use crate::app::App;

/// Render the comment modal for the post the composer is scoped to.
pub fn render_comment_modal(frame: &mut Frame, app: &mut App, theme: &ThemeBundle, area: Rect) {
    let Some(post_id) = app.composer.selected_post else {
        return;
    };

    let modal_area = centered_rect(70, 80, area);
    frame.render_widget(Clear, modal_area);

    let outer_block = Block::default()
        .title(" Comments ")
        .borders(Borders::ALL)
        .border_style(
            Style::default()
                .fg(theme.border)
                .add_modifier(Modifier::BOLD),
        )
        .style(Style::default().bg(theme.container_bg));

    let inner = outer_block.inner(modal_area);
    frame.render_widget(outer_block, modal_area);

    let modal_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Comment list
            Constraint::Length(3), // Input
            Constraint::Length(3), // Instructions
        ])
        .split(inner);

    render_comment_list(frame, app, theme, post_id, modal_chunks[0]);

    // Input area backed by the composer textarea
    let input_block = Block::default()
        .borders(Borders::ALL)
        .title(" Add a comment ")
        .border_style(Style::default().fg(theme.border));
    let input_inner = input_block.inner(modal_chunks[1]);
    frame.render_widget(input_block, modal_chunks[1]);
    frame.render_widget(&app.composer.textarea, input_inner);

    let instructions = Paragraph::new("Type to comment | Enter: Submit | Esc: Close")
        .style(Style::default().fg(theme.button_text).bg(theme.button_bg))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        );
    frame.render_widget(instructions, modal_chunks[2]);
}

fn render_comment_list(
    frame: &mut Frame,
    app: &App,
    theme: &ThemeBundle,
    post_id: i64,
    area: Rect,
) {
    let now = Utc::now();
    let comments = app.feed.comments.get(&post_id);

    let items: Vec<ListItem> = match comments {
        Some(comments) if !comments.is_empty() => comments
            .iter()
            .map(|comment| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        commenter_label(comment, &app.feed.user_details),
                        Style::default().fg(theme.text),
                    ),
                    Span::raw(" "),
                    Span::styled(
                        comment.content.clone(),
                        Style::default()
                            .fg(theme.text)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {}", relative_time(comment.created_at, now)),
                        Style::default().fg(theme.border),
                    ),
                ]))
            })
            .collect(),
        _ => vec![ListItem::new(Line::from(Span::styled(
            "No comments yet",
            Style::default().fg(theme.border),
        )))],
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(list, area);
}
